//! Test doubles and assertions for suites built on contractflow.

mod assertions;
mod mocks;

pub use assertions::{
    assert_error_at, assert_failed, assert_passed, assert_status_mismatch, compare_contracts,
    ContractComparison,
};
pub use mocks::{
    FailingExchangeProvider, InFlightExchangeProvider, RecordingExchangeProvider,
    SlowExchangeProvider, StaticExchangeProvider,
};
