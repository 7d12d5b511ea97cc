//! Persisted pass/fail state of a previous verification run.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;
use tracing::debug;

use crate::errors::Result;

/// The recorded outcome of one interaction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SnapshotEntry {
    /// Interaction description.
    pub interaction: String,
    /// Fingerprint of the interaction definition.
    pub fingerprint: String,
    /// Whether it passed.
    pub passed: bool,
}

/// Outcomes of a run keyed by consumer, used for regression detection.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerificationSnapshot {
    /// Entries per consumer, in declared interaction order.
    pub consumers: BTreeMap<String, Vec<SnapshotEntry>>,
}

impl VerificationSnapshot {
    /// Creates an empty snapshot.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Looks up the entry for an interaction definition.
    #[must_use]
    pub fn entry(&self, consumer: &str, fingerprint: &str) -> Option<&SnapshotEntry> {
        self.consumers
            .get(consumer)?
            .iter()
            .find(|e| e.fingerprint == fingerprint)
    }

    /// Serializes to pretty JSON.
    pub fn to_json_string(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Parses from JSON.
    pub fn from_json_str(raw: &str) -> Result<Self> {
        Ok(serde_json::from_str(raw)?)
    }

    /// Writes the snapshot to a file.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        std::fs::write(path, self.to_json_string()?)?;
        debug!(path = %path.display(), consumers = self.consumers.len(), "Snapshot saved");
        Ok(())
    }

    /// Reads a snapshot from a file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let raw = std::fs::read_to_string(path)?;
        Self::from_json_str(&raw)
    }
}
