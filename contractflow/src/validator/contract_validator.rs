//! Checking exchanges against contracts.

use tracing::{debug, error, warn};

use super::result::{HeaderMismatch, StatusMismatch, VerificationResult};
use crate::config::ValidationConfig;
use crate::contracts::Contract;
use crate::core::Exchange;
use crate::errors::TransportError;
use crate::schema::{SchemaValidator, ValidationError};

/// Validates completed exchanges against contracts.
///
/// Status, header and body checks run independently. A failing status does
/// not skip the body check, so a single result reports every category.
#[derive(Debug, Clone, Default)]
pub struct ContractValidator {
    schemas: SchemaValidator,
}

impl ContractValidator {
    /// Creates a permissive validator.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a validator from configuration.
    #[must_use]
    pub fn with_config(config: ValidationConfig) -> Self {
        Self {
            schemas: SchemaValidator::with_config(config),
        }
    }

    /// Returns the underlying schema validator.
    #[must_use]
    pub fn schema_validator(&self) -> &SchemaValidator {
        &self.schemas
    }

    /// Checks one exchange against one contract.
    #[must_use]
    pub fn validate_contract(&self, contract: &Contract, exchange: &Exchange) -> VerificationResult {
        let status_mismatch = (exchange.status != contract.expected_status).then_some(StatusMismatch {
            expected: contract.expected_status,
            actual: exchange.status,
        });

        let header_mismatches: Vec<HeaderMismatch> = contract
            .expected_headers
            .iter()
            .filter_map(|(name, expected)| {
                let actual = exchange.header(name);
                (actual != Some(expected.as_str())).then(|| HeaderMismatch {
                    name: name.clone(),
                    expected: expected.clone(),
                    actual: actual.map(ToString::to_string),
                })
            })
            .collect();

        let errors = contract
            .response_schema
            .as_ref()
            .map(|schema| self.schemas.validate(&exchange.body, schema))
            .unwrap_or_default();

        let result = VerificationResult::from_checks(&contract.name, status_mismatch, header_mismatches, errors);
        if result.passed {
            debug!(contract = %contract.name, status = exchange.status, "Contract satisfied");
        } else {
            warn!(
                contract = %contract.name,
                status = exchange.status,
                failures = result.failure_count(),
                "Contract violated"
            );
        }
        result
    }

    /// Folds an exchange attempt into a result. Transport failures always fail.
    #[must_use]
    pub fn evaluate(
        &self,
        contract: &Contract,
        exchange: Result<Exchange, TransportError>,
    ) -> VerificationResult {
        match exchange {
            Ok(exchange) => self.validate_contract(contract, &exchange),
            Err(err) => {
                error!(contract = %contract.name, error = %err, kind = err.kind(), "Exchange failed");
                VerificationResult::transport_failure(&contract.name, err)
            }
        }
    }

    /// Checks a request body against the contract's request schema.
    ///
    /// A missing body is checked as `null`. Contracts without a request
    /// schema accept anything.
    #[must_use]
    pub fn validate_request(&self, contract: &Contract, body: Option<&serde_json::Value>) -> Vec<ValidationError> {
        let Some(schema) = &contract.request_schema else {
            return Vec::new();
        };
        self.schemas.validate(body.unwrap_or(&serde_json::Value::Null), schema)
    }
}
