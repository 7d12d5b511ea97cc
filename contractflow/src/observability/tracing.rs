//! Span attributes and timing for verification units.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::time::Instant;

/// Identity of one verification unit, as span attributes.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerificationSpanAttributes {
    /// Verification run ID.
    pub run_id: Option<String>,
    /// Provider under test.
    pub provider: Option<String>,
    /// Consumer owning the interaction.
    pub consumer: Option<String>,
    /// Contract or interaction name.
    pub contract: Option<String>,
    /// Request method.
    pub method: Option<String>,
    /// Request path.
    pub path: Option<String>,
    /// Outcome, `passed` or `failed`.
    pub outcome: Option<String>,
}

impl VerificationSpanAttributes {
    /// Creates empty attributes.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the run ID.
    #[must_use]
    pub fn with_run_id(mut self, id: impl Into<String>) -> Self {
        self.run_id = Some(id.into());
        self
    }

    /// Sets the provider name.
    #[must_use]
    pub fn with_provider(mut self, provider: impl Into<String>) -> Self {
        self.provider = Some(provider.into());
        self
    }

    /// Sets the consumer name.
    #[must_use]
    pub fn with_consumer(mut self, consumer: impl Into<String>) -> Self {
        self.consumer = Some(consumer.into());
        self
    }

    /// Sets the contract name.
    #[must_use]
    pub fn with_contract(mut self, contract: impl Into<String>) -> Self {
        self.contract = Some(contract.into());
        self
    }

    /// Sets the request line.
    #[must_use]
    pub fn with_request(mut self, method: impl Into<String>, path: impl Into<String>) -> Self {
        self.method = Some(method.into());
        self.path = Some(path.into());
        self
    }

    /// Records the outcome.
    #[must_use]
    pub fn with_outcome(mut self, passed: bool) -> Self {
        self.outcome = Some(if passed { "passed" } else { "failed" }.to_string());
        self
    }

    /// Converts to OpenTelemetry attributes.
    #[must_use]
    pub fn to_otel_attributes(&self) -> HashMap<String, String> {
        let fields = [
            ("verification.run_id", &self.run_id),
            ("verification.provider", &self.provider),
            ("verification.consumer", &self.consumer),
            ("verification.contract", &self.contract),
            ("http.request.method", &self.method),
            ("url.path", &self.path),
            ("verification.outcome", &self.outcome),
        ];
        fields
            .into_iter()
            .filter_map(|(key, value)| value.as_ref().map(|v| (key.to_string(), v.clone())))
            .collect()
    }
}

/// Simple span timing helper.
#[derive(Debug)]
pub struct SpanTimer {
    start: Instant,
    name: String,
}

impl SpanTimer {
    /// Starts a new span timer.
    #[must_use]
    pub fn start(name: impl Into<String>) -> Self {
        Self {
            start: Instant::now(),
            name: name.into(),
        }
    }

    /// Returns the elapsed time in milliseconds.
    #[must_use]
    pub fn elapsed_ms(&self) -> f64 {
        self.start.elapsed().as_secs_f64() * 1000.0
    }

    /// Returns the span name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Finishes the span and returns the duration.
    #[must_use]
    pub fn finish(self) -> f64 {
        self.elapsed_ms()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_otel_attributes_skip_unset() {
        let attrs = VerificationSpanAttributes::new()
            .with_consumer("MobileApp")
            .with_request("GET", "/api/users/1")
            .with_outcome(false)
            .to_otel_attributes();

        assert_eq!(attrs.len(), 4);
        assert_eq!(attrs.get("verification.consumer"), Some(&"MobileApp".to_string()));
        assert_eq!(attrs.get("verification.outcome"), Some(&"failed".to_string()));
        assert!(!attrs.contains_key("verification.run_id"));
    }

    #[test]
    fn test_span_timer() {
        let timer = SpanTimer::start("interaction");
        assert_eq!(timer.name(), "interaction");
        assert!(timer.finish() >= 0.0);
    }
}
