//! # Contractflow
//!
//! A contract verification engine for HTTP API providers.
//!
//! Contractflow checks that a provider's responses honour the contracts
//! declared for it, either by the provider itself or by the consumers that
//! depend on it:
//!
//! - **Schemas**: tagged schema variants with path-located validation errors
//! - **Contracts**: named endpoint expectations held in explicit registries
//! - **Matching**: method and path-pattern routing with specificity ranking
//! - **Mocks**: rule-based mock engines with an append-only call history
//! - **Verification**: status, header and body checks collected into results
//! - **Consumer-driven contracts**: concurrent verification with cancellation
//!   and regression detection against earlier snapshots
//!
//! The engine never performs I/O on its own. Exchanges come from an injected
//! [`ExchangeProvider`](validator::ExchangeProvider).
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use contractflow::prelude::*;
//!
//! let engine = MockDispatchEngine::new("UserAPI");
//! engine.add_mock(MockRule::new("GET", "/api/users/{id}").respond(200, json!({"id": 1})));
//!
//! let report = ConsumerVerifier::new()
//!     .verify_provider(&[consumer_contract], &engine)
//!     .await?;
//! assert!(report.is_compliant());
//! ```

#![forbid(unsafe_code)]
#![warn(
    clippy::all,
    clippy::pedantic,
    missing_docs,
    rust_2018_idioms
)]
#![allow(
    clippy::module_name_repetitions,
    clippy::must_use_candidate,
    clippy::missing_errors_doc,
    clippy::missing_panics_doc
)]

pub mod cancellation;
pub mod config;
pub mod contracts;
pub mod core;
pub mod errors;
pub mod events;
pub mod matcher;
pub mod mocks;
pub mod observability;
pub mod schema;
pub mod testing;
pub mod validator;
pub mod verifier;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::cancellation::CancellationToken;
    pub use crate::config::{ContractflowConfig, LoggingConfig, ValidationConfig, VerifierConfig};
    pub use crate::contracts::{
        ConsumerContract, ConsumerContractRegistry, Contract, ContractBuilder, ContractRegistry,
        Interaction, InteractionRequest, InteractionResponse,
    };
    pub use crate::core::{Exchange, HttpRequest};
    pub use crate::errors::{ContractflowError, Result, TransportError};
    pub use crate::events::{EventSink, LoggingEventSink, NoOpEventSink};
    pub use crate::matcher::{MatchOutcome, PathPattern, RequestMatcher};
    pub use crate::mocks::{MockDispatchEngine, MockRule, MockScenario};
    pub use crate::schema::{infer_schema, validate, ObjectSchema, Schema, ValidationError};
    pub use crate::validator::{ContractValidator, ExchangeProvider, VerificationResult};
    pub use crate::verifier::{ConsumerVerifier, ProviderVerification, VerificationSnapshot};
}
