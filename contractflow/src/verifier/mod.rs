//! Consumer-driven verification.
//!
//! This module provides:
//! - [`ConsumerVerifier`] running every consumer interaction against a provider
//! - [`ProviderVerification`] with per-consumer results and compliance
//! - [`VerificationSnapshot`] for detecting regressions between runs

mod consumer_verifier;
mod report;
mod snapshot;

pub use consumer_verifier::ConsumerVerifier;
pub use report::{ConsumerSummary, InteractionRecord, ProviderVerification, Regression};
pub use snapshot::{SnapshotEntry, VerificationSnapshot};
