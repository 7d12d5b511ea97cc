//! Exercising provider contracts end to end.

use futures::stream::{self, StreamExt};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, info};

use super::contract_validator::ContractValidator;
use super::provider::{exchange_with_timeout, ExchangeProvider};
use super::result::VerificationResult;
use crate::cancellation::CancellationToken;
use crate::config::{ContractflowConfig, VerifierConfig};
use crate::contracts::Contract;

/// Aggregate outcome of a batch of contract runs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationSummary {
    /// Contracts in the batch.
    pub total: usize,
    /// Contracts that passed.
    pub passed: usize,
    /// Contracts that failed.
    pub failed: usize,
    /// Percentage of executed contracts that passed.
    pub success_rate: f64,
    /// Results in input order.
    pub results: Vec<VerificationResult>,
    /// Contracts skipped because the batch was cancelled.
    pub not_run: Vec<String>,
    /// Cancellation reason, when the batch was cut short.
    pub cancelled: Option<String>,
}

impl ValidationSummary {
    fn new(total: usize, results: Vec<VerificationResult>, not_run: Vec<String>, cancelled: Option<String>) -> Self {
        let passed = results.iter().filter(|r| r.passed).count();
        let failed = results.len() - passed;
        #[allow(clippy::cast_precision_loss)]
        let success_rate = if results.is_empty() {
            0.0
        } else {
            passed as f64 / results.len() as f64 * 100.0
        };
        Self {
            total,
            passed,
            failed,
            success_rate,
            results,
            not_run,
            cancelled,
        }
    }

    /// True when every contract ran and passed.
    #[must_use]
    pub fn all_passed(&self) -> bool {
        self.failed == 0 && self.not_run.is_empty()
    }

    /// Results that failed.
    #[must_use]
    pub fn failures(&self) -> Vec<&VerificationResult> {
        self.results.iter().filter(|r| !r.passed).collect()
    }
}

/// Synthesises requests for contracts, obtains exchanges and validates them.
#[derive(Debug, Clone, Default)]
pub struct ContractRunner {
    validator: ContractValidator,
    config: VerifierConfig,
}

impl ContractRunner {
    /// Creates a runner with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a runner from configuration.
    #[must_use]
    pub fn with_config(config: &ContractflowConfig) -> Self {
        Self {
            validator: ContractValidator::with_config(config.validation.clone()),
            config: config.verifier.clone(),
        }
    }

    /// Returns the verifier settings.
    #[must_use]
    pub fn config(&self) -> &VerifierConfig {
        &self.config
    }

    /// Runs a single contract.
    pub async fn run<P: ExchangeProvider + ?Sized>(&self, contract: &Contract, provider: &P) -> VerificationResult {
        let request = contract.sample_request();
        debug!(contract = %contract.name, request = %request, "Running contract");
        let exchange = exchange_with_timeout(provider, &request, self.config.exchange_timeout()).await;
        self.validator.evaluate(contract, exchange)
    }

    /// Runs a batch concurrently, reporting results in input order.
    ///
    /// Once `cancel` fires, no further exchanges start; contracts that never
    /// ran are listed in [`ValidationSummary::not_run`].
    pub async fn run_all<P: ExchangeProvider + ?Sized>(
        &self,
        contracts: &[Arc<Contract>],
        provider: &P,
        cancel: &CancellationToken,
    ) -> ValidationSummary {
        info!(contracts = contracts.len(), concurrency = self.config.concurrency(), "Running contracts");

        let outcomes: Vec<Option<VerificationResult>> = stream::iter(contracts)
            .map(|contract| async move {
                if let Err(err) = cancel.check() {
                    debug!(contract = %contract.name, error = %err, "Skipped after cancellation");
                    return None;
                }
                Some(self.run(contract, provider).await)
            })
            .buffered(self.config.concurrency())
            .collect()
            .await;

        let mut results = Vec::with_capacity(outcomes.len());
        let mut not_run = Vec::new();
        for (contract, outcome) in contracts.iter().zip(outcomes) {
            match outcome {
                Some(result) => results.push(result),
                None => not_run.push(contract.name.clone()),
            }
        }

        let summary = ValidationSummary::new(contracts.len(), results, not_run, cancel.reason());
        info!(
            passed = summary.passed,
            failed = summary.failed,
            not_run = summary.not_run.len(),
            "Contract run finished"
        );
        summary
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{Exchange, HttpRequest};
    use crate::errors::TransportError;
    use crate::schema::{ObjectSchema, Schema};
    use crate::testing::{InFlightExchangeProvider, SlowExchangeProvider};
    use crate::validator::{FnExchangeProvider, MockExchangeProvider};
    use serde_json::json;
    use std::time::Duration;

    fn runner(config: VerifierConfig) -> ContractRunner {
        ContractRunner::with_config(&ContractflowConfig {
            verifier: config,
            ..ContractflowConfig::default()
        })
    }

    fn contracts() -> Vec<Arc<Contract>> {
        vec![
            Arc::new(
                Contract::builder("GetUser", "GET", "/api/users/{id}")
                    .response_schema(ObjectSchema::new().required_property("id", Schema::integer()).build())
                    .build()
                    .unwrap(),
            ),
            Arc::new(Contract::builder("Health", "GET", "/health").status(204).build().unwrap()),
        ]
    }

    fn provider() -> impl ExchangeProvider {
        FnExchangeProvider::new(|request: &HttpRequest| match request.path.as_str() {
            "/api/users/1" => Ok(Exchange::new(200, json!({"id": 1}))),
            "/health" => Ok(Exchange::empty(200)),
            _ => Err(TransportError::connection("unknown route")),
        })
    }

    #[tokio::test]
    async fn test_run_renders_path_params() {
        let mut mock = MockExchangeProvider::new();
        mock.expect_exchange()
            .withf(|request: &HttpRequest| request.path == "/api/users/1")
            .times(1)
            .returning(|_| Ok(Exchange::new(200, json!({"id": 1}))));

        let result = ContractRunner::new().run(&contracts()[0], &mock).await;
        assert!(result.passed);
    }

    #[tokio::test]
    async fn test_run_all_summary() {
        let summary = ContractRunner::new()
            .run_all(&contracts(), &provider(), &CancellationToken::new())
            .await;

        assert_eq!(summary.total, 2);
        assert_eq!(summary.passed, 1);
        assert_eq!(summary.failed, 1);
        assert!((summary.success_rate - 50.0).abs() < f64::EPSILON);
        assert_eq!(summary.results[0].contract, "GetUser");
        assert_eq!(summary.failures()[0].contract, "Health");
        assert!(!summary.all_passed());
    }

    #[tokio::test]
    async fn test_run_all_cancelled_before_start() {
        let cancel = CancellationToken::new();
        cancel.cancel("deploy aborted");

        let summary = ContractRunner::new().run_all(&contracts(), &provider(), &cancel).await;

        assert!(summary.results.is_empty());
        assert_eq!(summary.not_run, vec!["GetUser", "Health"]);
        assert_eq!(summary.cancelled.as_deref(), Some("deploy aborted"));
        assert!((summary.success_rate - 0.0).abs() < f64::EPSILON);
    }

    #[tokio::test]
    async fn test_run_all_times_out_hanging_provider() {
        let runner = runner(VerifierConfig::new().with_exchange_timeout(Some(Duration::from_millis(20))));
        let provider = SlowExchangeProvider::new(provider(), Duration::from_secs(5));

        let summary = runner.run_all(&contracts(), &provider, &CancellationToken::new()).await;

        assert_eq!(summary.failed, 2);
        assert!(summary
            .results
            .iter()
            .all(|r| r.transport_error == Some(TransportError::Timeout { after_ms: 20 })));
    }

    #[tokio::test]
    async fn test_run_all_respects_max_concurrency() {
        let runner = runner(VerifierConfig::new().with_max_concurrency(3));
        let provider = InFlightExchangeProvider::new(SlowExchangeProvider::new(provider(), Duration::from_millis(20)));
        let batch: Vec<Arc<Contract>> = (0..8).map(|_| Arc::clone(&contracts()[0])).collect();

        let summary = runner.run_all(&batch, &provider, &CancellationToken::new()).await;

        assert_eq!(summary.passed, 8);
        assert_eq!(provider.peak(), 3);
    }
}
