//! Verification results.
//!
//! Results serialize with every field present, so downstream tooling can
//! rely on a stable shape regardless of outcome.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::errors::TransportError;
use crate::schema::ValidationError;

/// The provider answered with a different status than expected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusMismatch {
    /// Status the contract expects.
    pub expected: u16,
    /// Status the provider returned.
    pub actual: u16,
}

impl fmt::Display for StatusMismatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "expected status {}, got {}", self.expected, self.actual)
    }
}

/// An expected header was absent or carried a different value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeaderMismatch {
    /// Header name as declared by the contract.
    pub name: String,
    /// Expected value.
    pub expected: String,
    /// Actual value, `None` when the header was absent.
    pub actual: Option<String>,
}

impl fmt::Display for HeaderMismatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.actual {
            Some(actual) => write!(f, "header '{}': expected '{}', got '{actual}'", self.name, self.expected),
            None => write!(f, "header '{}' missing (expected '{}')", self.name, self.expected),
        }
    }
}

/// Outcome of checking one exchange against one contract.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerificationResult {
    /// Contract or interaction being verified.
    pub contract: String,
    /// True only when every check passed.
    pub passed: bool,
    /// Status check failure.
    pub status_mismatch: Option<StatusMismatch>,
    /// Header check failures, in declaration order.
    pub header_mismatches: Vec<HeaderMismatch>,
    /// Body schema violations, in validation order.
    pub errors: Vec<ValidationError>,
    /// Set when no exchange could be obtained.
    pub transport_error: Option<TransportError>,
}

impl VerificationResult {
    /// Assembles a result from independent check outcomes.
    #[must_use]
    pub fn from_checks(
        contract: impl Into<String>,
        status_mismatch: Option<StatusMismatch>,
        header_mismatches: Vec<HeaderMismatch>,
        errors: Vec<ValidationError>,
    ) -> Self {
        let passed = status_mismatch.is_none() && header_mismatches.is_empty() && errors.is_empty();
        Self {
            contract: contract.into(),
            passed,
            status_mismatch,
            header_mismatches,
            errors,
            transport_error: None,
        }
    }

    /// A failed result for an exchange that never completed.
    #[must_use]
    pub fn transport_failure(contract: impl Into<String>, error: TransportError) -> Self {
        Self {
            contract: contract.into(),
            passed: false,
            status_mismatch: None,
            header_mismatches: Vec::new(),
            errors: Vec::new(),
            transport_error: Some(error),
        }
    }

    /// Number of individual failures recorded.
    #[must_use]
    pub fn failure_count(&self) -> usize {
        usize::from(self.status_mismatch.is_some())
            + self.header_mismatches.len()
            + self.errors.len()
            + usize::from(self.transport_error.is_some())
    }

    /// One human-readable line per failure.
    #[must_use]
    pub fn failure_messages(&self) -> Vec<String> {
        let mut messages = Vec::with_capacity(self.failure_count());
        if let Some(err) = &self.transport_error {
            messages.push(err.to_string());
        }
        if let Some(mismatch) = &self.status_mismatch {
            messages.push(mismatch.to_string());
        }
        messages.extend(self.header_mismatches.iter().map(ToString::to_string));
        messages.extend(self.errors.iter().map(ToString::to_string));
        messages
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{FieldPath, ViolationKind};

    #[test]
    fn test_passed_requires_every_check() {
        let ok = VerificationResult::from_checks("GetUser", None, Vec::new(), Vec::new());
        assert!(ok.passed);
        assert_eq!(ok.failure_count(), 0);

        let status = Some(StatusMismatch { expected: 200, actual: 404 });
        let failed = VerificationResult::from_checks("GetUser", status, Vec::new(), Vec::new());
        assert!(!failed.passed);
        assert_eq!(failed.failure_messages(), vec!["expected status 200, got 404"]);
    }

    #[test]
    fn test_failure_messages_cover_all_categories() {
        let header = HeaderMismatch {
            name: "Content-Type".to_string(),
            expected: "application/json".to_string(),
            actual: None,
        };
        let error = ValidationError::new(FieldPath::root().key("id"), ViolationKind::MissingField, "missing required field 'id'");
        let result = VerificationResult::from_checks(
            "GetUser",
            Some(StatusMismatch { expected: 200, actual: 500 }),
            vec![header],
            vec![error],
        );

        assert_eq!(result.failure_count(), 3);
        let messages = result.failure_messages();
        assert!(messages[1].contains("Content-Type"));
        assert!(messages[2].starts_with("$.id"));
    }

    #[test]
    fn test_transport_failure_is_never_a_pass() {
        let result = VerificationResult::transport_failure("GetUser", TransportError::Timeout { after_ms: 100 });
        assert!(!result.passed);
        assert_eq!(result.failure_count(), 1);
    }

    #[test]
    fn test_serialized_shape_is_stable() {
        let result = VerificationResult::from_checks("GetUser", None, Vec::new(), Vec::new());
        let json = serde_json::to_value(&result).unwrap();

        for key in ["contract", "passed", "status_mismatch", "header_mismatches", "errors", "transport_error"] {
            assert!(json.get(key).is_some(), "missing {key}");
        }
        let back: VerificationResult = serde_json::from_value(json).unwrap();
        assert_eq!(back, result);
    }
}
