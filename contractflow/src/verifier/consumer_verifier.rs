//! Consumer-driven verification of a provider.
//!
//! Every interaction of every consumer is an independent unit. Units are
//! dispatched concurrently up to the configured limit and merged back by
//! consumer, preserving each consumer's declared interaction order.

use futures::stream::{self, StreamExt};
use std::collections::BTreeSet;
use std::sync::Arc;
use tracing::{debug, info, warn, Instrument};

use super::report::{InteractionRecord, ProviderVerification, Regression};
use super::snapshot::VerificationSnapshot;
use crate::cancellation::CancellationToken;
use crate::config::{ContractflowConfig, VerifierConfig};
use crate::contracts::{ConsumerContract, ConsumerContractRegistry, Contract, ShapeOptions};
use crate::core::HttpRequest;
use crate::errors::Result;
use crate::events::{EventSink, NoOpEventSink, VerificationEvent};
use crate::observability::{SpanTimer, VerificationSpanAttributes};
use crate::validator::{exchange_with_timeout, ContractValidator, ExchangeProvider, VerificationResult};

/// One interaction prepared for dispatch.
struct Unit {
    consumer: String,
    provider: String,
    description: String,
    fingerprint: String,
    contract: Contract,
    request: HttpRequest,
}

/// Verifies a provider against the interactions its consumers rely on.
pub struct ConsumerVerifier {
    validator: ContractValidator,
    config: VerifierConfig,
    events: Arc<dyn EventSink>,
    previous: Option<VerificationSnapshot>,
}

impl std::fmt::Debug for ConsumerVerifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConsumerVerifier")
            .field("config", &self.config)
            .field("has_previous", &self.previous.is_some())
            .finish_non_exhaustive()
    }
}

impl Default for ConsumerVerifier {
    fn default() -> Self {
        Self::new()
    }
}

impl ConsumerVerifier {
    /// Creates a verifier with default settings and no event sink.
    #[must_use]
    pub fn new() -> Self {
        Self {
            validator: ContractValidator::new(),
            config: VerifierConfig::default(),
            events: Arc::new(NoOpEventSink),
            previous: None,
        }
    }

    /// Creates a verifier from configuration.
    #[must_use]
    pub fn with_config(config: &ContractflowConfig) -> Self {
        Self {
            validator: ContractValidator::with_config(config.validation.clone()),
            config: config.verifier.clone(),
            ..Self::new()
        }
    }

    /// Sets the event sink.
    #[must_use]
    pub fn with_event_sink(mut self, sink: Arc<dyn EventSink>) -> Self {
        self.events = sink;
        self
    }

    /// Enables regression detection against a previous run.
    #[must_use]
    pub fn with_previous_snapshot(mut self, snapshot: VerificationSnapshot) -> Self {
        self.previous = Some(snapshot);
        self
    }

    /// Verifies every consumer contract against the provider.
    ///
    /// Fails before any exchange if an interaction does not form a valid
    /// contract. Validation outcomes never fail; they are in the report.
    pub async fn verify_provider<P: ExchangeProvider + ?Sized>(
        &self,
        contracts: &[ConsumerContract],
        provider: &P,
    ) -> Result<ProviderVerification> {
        self.verify_provider_with_cancel(contracts, provider, &CancellationToken::new())
            .await
    }

    /// Verifies the registry's contracts that target `provider_name`.
    pub async fn verify_registered<P: ExchangeProvider + ?Sized>(
        &self,
        registry: &ConsumerContractRegistry,
        provider_name: &str,
        provider: &P,
    ) -> Result<ProviderVerification> {
        let contracts = registry.for_provider(provider_name);
        self.verify_provider(&contracts, provider).await
    }

    /// Verifies with early abort.
    ///
    /// Once `cancel` fires no further exchanges start. Results gathered so
    /// far are kept; the rest are listed under `not_run`.
    pub async fn verify_provider_with_cancel<P: ExchangeProvider + ?Sized>(
        &self,
        contracts: &[ConsumerContract],
        provider: &P,
        cancel: &CancellationToken,
    ) -> Result<ProviderVerification> {
        let units = self.prepare(contracts)?;
        let run_id = uuid::Uuid::now_v7().to_string();
        let consumer_count = contracts
            .iter()
            .map(|c| c.consumer_name.as_str())
            .collect::<BTreeSet<_>>()
            .len();

        info!(run_id = %run_id, consumers = consumer_count, interactions = units.len(), "Verification started");
        self.events
            .emit(VerificationEvent::Started {
                consumers: consumer_count,
                interactions: units.len(),
            })
            .await;

        let outcomes: Vec<Option<VerificationResult>> = stream::iter(&units)
            .map(|unit| self.run_unit(unit, provider, cancel, &run_id))
            .buffered(self.config.concurrency())
            .collect()
            .await;

        let report = self.assemble(contracts, &units, outcomes, cancel.reason());
        self.finish(&report).await;
        Ok(report)
    }

    fn prepare(&self, contracts: &[ConsumerContract]) -> Result<Vec<Unit>> {
        let options = ShapeOptions::from(&self.config);
        let mut units = Vec::new();
        for consumer in contracts {
            for interaction in &consumer.interactions {
                units.push(Unit {
                    consumer: consumer.consumer_name.clone(),
                    provider: consumer.provider_name.clone(),
                    description: interaction.description.clone(),
                    fingerprint: interaction.fingerprint(),
                    contract: interaction.to_contract(&consumer.consumer_name, options)?,
                    request: interaction.http_request(),
                });
            }
        }
        Ok(units)
    }

    async fn run_unit<P: ExchangeProvider + ?Sized>(
        &self,
        unit: &Unit,
        provider: &P,
        cancel: &CancellationToken,
        run_id: &str,
    ) -> Option<VerificationResult> {
        if let Err(err) = cancel.check() {
            debug!(
                consumer = %unit.consumer,
                interaction = %unit.description,
                error = %err,
                "Skipped after cancellation"
            );
            return None;
        }

        let attributes = VerificationSpanAttributes::new()
            .with_run_id(run_id)
            .with_provider(&unit.provider)
            .with_consumer(&unit.consumer)
            .with_contract(&unit.description)
            .with_request(&unit.request.method, &unit.request.path);
        let span = tracing::debug_span!(
            "interaction",
            consumer = %unit.consumer,
            interaction = %unit.description,
            request = %unit.request,
        );

        let timer = SpanTimer::start(&unit.description);
        let exchange = exchange_with_timeout(provider, &unit.request, self.config.exchange_timeout())
            .instrument(span)
            .await;
        let result = self.validator.evaluate(&unit.contract, exchange);
        let duration_ms = timer.finish();

        let attributes = attributes.with_outcome(result.passed);
        debug!(attributes = ?attributes.to_otel_attributes(), duration_ms, "Interaction verified");
        self.events.try_emit(VerificationEvent::InteractionVerified {
            consumer: unit.consumer.clone(),
            interaction: unit.description.clone(),
            passed: result.passed,
            duration_ms,
        });
        Some(result)
    }

    fn assemble(
        &self,
        contracts: &[ConsumerContract],
        units: &[Unit],
        outcomes: Vec<Option<VerificationResult>>,
        cancelled: Option<String>,
    ) -> ProviderVerification {
        let mut report = ProviderVerification {
            cancelled,
            ..ProviderVerification::default()
        };
        for contract in contracts {
            report.results.entry(contract.consumer_name.clone()).or_default();
            report.interactions.entry(contract.consumer_name.clone()).or_default();
            report.consumers.entry(contract.consumer_name.clone()).or_default();
        }

        for (unit, outcome) in units.iter().zip(outcomes) {
            let summary = report.consumers.entry(unit.consumer.clone()).or_default();
            summary.total += 1;
            let Some(result) = outcome else {
                summary.not_run += 1;
                report
                    .not_run
                    .entry(unit.consumer.clone())
                    .or_default()
                    .push(unit.description.clone());
                continue;
            };

            if result.passed {
                summary.passed += 1;
            } else {
                summary.failed += 1;
                if let Some(regression) = self.regression(unit) {
                    warn!(
                        consumer = %regression.consumer,
                        interaction = %regression.interaction,
                        "Previously passing interaction now fails"
                    );
                    report.regressions.push(regression);
                }
            }
            report.results.entry(unit.consumer.clone()).or_default().push(result);
            report
                .interactions
                .entry(unit.consumer.clone())
                .or_default()
                .push(InteractionRecord {
                    interaction: unit.description.clone(),
                    fingerprint: unit.fingerprint.clone(),
                });
        }

        for summary in report.consumers.values_mut() {
            summary.compliant = summary.failed == 0 && summary.not_run == 0;
        }
        report.breaking_change = !report.regressions.is_empty();
        report
    }

    fn regression(&self, unit: &Unit) -> Option<Regression> {
        let entry = self.previous.as_ref()?.entry(&unit.consumer, &unit.fingerprint)?;
        entry.passed.then(|| Regression {
            consumer: unit.consumer.clone(),
            interaction: unit.description.clone(),
            fingerprint: unit.fingerprint.clone(),
        })
    }

    async fn finish(&self, report: &ProviderVerification) {
        for (consumer, summary) in &report.consumers {
            if summary.compliant {
                info!(consumer = %consumer, passed = summary.passed, "Consumer verified");
            } else {
                warn!(
                    consumer = %consumer,
                    passed = summary.passed,
                    failed = summary.failed,
                    not_run = summary.not_run,
                    "Consumer not compliant"
                );
            }
            self.events
                .emit(VerificationEvent::ConsumerVerified {
                    consumer: consumer.clone(),
                    passed: summary.passed,
                    failed: summary.failed,
                })
                .await;
        }

        if let Some(reason) = &report.cancelled {
            let not_run = report.not_run.values().map(Vec::len).sum();
            info!(reason = %reason, not_run, "Verification cancelled");
            self.events
                .emit(VerificationEvent::Cancelled {
                    reason: reason.clone(),
                    not_run,
                })
                .await;
        }

        info!(
            passed = report.passed(),
            failed = report.failed(),
            breaking_change = report.breaking_change,
            "Verification completed"
        );
        self.events
            .emit(VerificationEvent::Completed {
                passed: report.passed(),
                failed: report.failed(),
                breaking_change: report.breaking_change,
            })
            .await;
    }
}
