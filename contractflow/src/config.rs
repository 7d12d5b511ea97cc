//! Configuration types for validation, verification and logging.
//!
//! Every field has a serde default so partial documents load cleanly.

use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

use crate::errors::Result;

/// Top-level configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContractflowConfig {
    /// Schema validation settings.
    #[serde(default)]
    pub validation: ValidationConfig,
    /// Verification dispatch settings.
    #[serde(default)]
    pub verifier: VerifierConfig,
    /// Logging settings.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl ContractflowConfig {
    /// Creates a configuration with defaults.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses a JSON document.
    pub fn from_json_str(raw: &str) -> Result<Self> {
        Ok(serde_json::from_str(raw)?)
    }

    /// Reads and parses a JSON file.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let raw = std::fs::read_to_string(path)?;
        Self::from_json_str(&raw)
    }
}

/// Configuration for schema validation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationConfig {
    /// Flag object fields the schema does not declare.
    #[serde(default)]
    pub strict: bool,
    /// Check string formats such as `email`.
    #[serde(default = "default_check_formats")]
    pub check_formats: bool,
}

fn default_check_formats() -> bool {
    true
}

impl Default for ValidationConfig {
    fn default() -> Self {
        Self {
            strict: false,
            check_formats: default_check_formats(),
        }
    }
}

/// Configuration for contract and consumer verification runs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerifierConfig {
    /// Maximum verification units dispatched at once.
    #[serde(default = "default_max_concurrency")]
    pub max_concurrency: usize,
    /// Per-exchange timeout in milliseconds. `None` leaves timing to the transport.
    #[serde(default = "default_exchange_timeout_ms")]
    pub exchange_timeout_ms: Option<u64>,
    /// Require every field present in a consumer's example body.
    #[serde(default = "default_true")]
    pub require_example_fields: bool,
    /// Read example strings such as `"integer"` as type names.
    #[serde(default = "default_true")]
    pub type_placeholders: bool,
}

fn default_max_concurrency() -> usize {
    4
}

#[allow(clippy::unnecessary_wraps)]
fn default_exchange_timeout_ms() -> Option<u64> {
    Some(5000)
}

fn default_true() -> bool {
    true
}

impl Default for VerifierConfig {
    fn default() -> Self {
        Self {
            max_concurrency: default_max_concurrency(),
            exchange_timeout_ms: default_exchange_timeout_ms(),
            require_example_fields: default_true(),
            type_placeholders: default_true(),
        }
    }
}

impl VerifierConfig {
    /// Creates a configuration with defaults.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the concurrency limit.
    #[must_use]
    pub fn with_max_concurrency(mut self, limit: usize) -> Self {
        self.max_concurrency = limit;
        self
    }

    /// Sets the exchange timeout.
    #[must_use]
    pub fn with_exchange_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.exchange_timeout_ms = timeout.map(|t| u64::try_from(t.as_millis()).unwrap_or(u64::MAX));
        self
    }

    /// Concurrency limit, never below one.
    #[must_use]
    pub fn concurrency(&self) -> usize {
        self.max_concurrency.max(1)
    }

    /// The exchange timeout as a duration.
    #[must_use]
    pub fn exchange_timeout(&self) -> Option<Duration> {
        self.exchange_timeout_ms.map(Duration::from_millis)
    }
}

/// Configuration for the tracing subscriber.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Default filter directive; `RUST_LOG` takes precedence.
    #[serde(default = "default_level")]
    pub level: String,
    /// Emit JSON lines instead of human-readable output.
    #[serde(default)]
    pub json: bool,
}

fn default_level() -> String {
    "info".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_level(),
            json: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let config = ContractflowConfig::default();
        assert!(!config.validation.strict);
        assert!(config.validation.check_formats);
        assert_eq!(config.verifier.max_concurrency, 4);
        assert_eq!(config.verifier.exchange_timeout(), Some(Duration::from_millis(5000)));
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn test_partial_document() {
        let config = ContractflowConfig::from_json_str(
            r#"{"validation": {"strict": true}, "verifier": {"exchange_timeout_ms": null}}"#,
        )
        .unwrap();

        assert!(config.validation.strict);
        assert!(config.validation.check_formats);
        assert_eq!(config.verifier.exchange_timeout(), None);
        assert!(config.verifier.require_example_fields);
    }

    #[test]
    fn test_concurrency_floor() {
        let config = VerifierConfig::new().with_max_concurrency(0);
        assert_eq!(config.concurrency(), 1);
    }

    #[test]
    fn test_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"logging": {{"level": "debug", "json": true}}}}"#).unwrap();

        let config = ContractflowConfig::from_json_file(file.path()).unwrap();
        assert_eq!(config.logging.level, "debug");
        assert!(config.logging.json);
    }

    #[test]
    fn test_invalid_document() {
        assert!(ContractflowConfig::from_json_str("{not json").is_err());
    }
}
