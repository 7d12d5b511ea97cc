//! Mock providers.
//!
//! This module provides:
//! - [`MockRule`] and [`MatchPredicate`] describing what to answer
//! - [`MockDispatchEngine`] answering requests and recording calls
//! - [`MockScenario`] and [`MockManager`] for organising engines in tests
//! - canned payloads for the user and order APIs

mod engine;
mod manager;
mod responses;
mod rule;
mod scenario;

pub use engine::{CallRecord, DispatchOutcome, MockDispatchEngine, MockState};
pub use manager::MockManager;
pub use responses::{canned_response, user_api_engine, ResponseCategory};
pub use rule::{MatchPredicate, MockRule};
pub use scenario::MockScenario;
