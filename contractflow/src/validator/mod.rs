//! Contract validation against completed exchanges.
//!
//! This module provides:
//! - [`ContractValidator`] checking status, headers and body independently
//! - [`VerificationResult`] with structured failure detail
//! - [`ExchangeProvider`], the boundary to whatever performs the request
//! - [`ContractRunner`] for exercising whole batches of contracts

mod contract_validator;
mod provider;
mod result;
mod runner;

pub use contract_validator::ContractValidator;
#[cfg(test)]
pub use provider::MockExchangeProvider;
#[cfg(feature = "http")]
pub use provider::HttpExchangeProvider;
pub use provider::{exchange_with_timeout, ExchangeProvider, FnExchangeProvider};
pub use result::{HeaderMismatch, StatusMismatch, VerificationResult};
pub use runner::{ContractRunner, ValidationSummary};
