//! Aggregated outcomes of a provider verification.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::snapshot::{SnapshotEntry, VerificationSnapshot};
use crate::validator::VerificationResult;

/// Per-consumer tally.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConsumerSummary {
    /// Interactions declared by the consumer.
    pub total: usize,
    /// Interactions that passed.
    pub passed: usize,
    /// Interactions that failed.
    pub failed: usize,
    /// Interactions skipped because the run was cancelled.
    pub not_run: usize,
    /// True only when every declared interaction ran and passed.
    pub compliant: bool,
}

/// An interaction that passed in the previous snapshot and fails now.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Regression {
    /// Consumer owning the interaction.
    pub consumer: String,
    /// Interaction description.
    pub interaction: String,
    /// Fingerprint of the unchanged interaction definition.
    pub fingerprint: String,
}

/// One executed interaction, as stored in the report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InteractionRecord {
    /// Interaction description.
    pub interaction: String,
    /// Fingerprint of the interaction definition.
    pub fingerprint: String,
}

/// Outcome of verifying a provider against its consumers.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProviderVerification {
    /// Results per consumer, in declared interaction order.
    pub results: BTreeMap<String, Vec<VerificationResult>>,
    /// Executed interactions per consumer, parallel to `results`.
    pub interactions: BTreeMap<String, Vec<InteractionRecord>>,
    /// Tallies per consumer.
    pub consumers: BTreeMap<String, ConsumerSummary>,
    /// Interactions never run, per consumer.
    pub not_run: BTreeMap<String, Vec<String>>,
    /// Cancellation reason, when the run was cut short.
    pub cancelled: Option<String>,
    /// Interactions that regressed since the previous snapshot.
    pub regressions: Vec<Regression>,
    /// True when any regression was found.
    pub breaking_change: bool,
}

impl ProviderVerification {
    /// True when every consumer is compliant.
    #[must_use]
    pub fn is_compliant(&self) -> bool {
        self.consumers.values().all(|s| s.compliant)
    }

    /// True when the consumer's interactions all ran and passed.
    #[must_use]
    pub fn is_compliant_for(&self, consumer: &str) -> bool {
        self.consumers.get(consumer).is_some_and(|s| s.compliant)
    }

    /// Total results that passed.
    #[must_use]
    pub fn passed(&self) -> usize {
        self.consumers.values().map(|s| s.passed).sum()
    }

    /// Total results that failed.
    #[must_use]
    pub fn failed(&self) -> usize {
        self.consumers.values().map(|s| s.failed).sum()
    }

    /// Records the outcome of this run for later regression checks.
    #[must_use]
    pub fn snapshot(&self) -> VerificationSnapshot {
        let consumers = self
            .results
            .iter()
            .map(|(consumer, results)| {
                let records = self.interactions.get(consumer).map_or(&[][..], Vec::as_slice);
                let entries = records
                    .iter()
                    .zip(results)
                    .map(|(record, result)| SnapshotEntry {
                        interaction: record.interaction.clone(),
                        fingerprint: record.fingerprint.clone(),
                        passed: result.passed,
                    })
                    .collect();
                (consumer.clone(), entries)
            })
            .collect();
        VerificationSnapshot { consumers }
    }

    /// Serializes the report to pretty JSON.
    pub fn to_json_string(&self) -> crate::errors::Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
