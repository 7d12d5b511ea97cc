//! Assertion helpers for verification results.

use crate::contracts::Contract;
use crate::schema::ViolationKind;
use crate::validator::VerificationResult;

/// Panics unless the result passed.
#[track_caller]
pub fn assert_passed(result: &VerificationResult) {
    assert!(
        result.passed,
        "expected '{}' to pass, failures: {:?}",
        result.contract,
        result.failure_messages()
    );
}

/// Panics unless the result failed.
#[track_caller]
pub fn assert_failed(result: &VerificationResult) {
    assert!(!result.passed, "expected '{}' to fail", result.contract);
}

/// Panics unless the result records exactly this status mismatch.
#[track_caller]
pub fn assert_status_mismatch(result: &VerificationResult, expected: u16, actual: u16) {
    match result.status_mismatch {
        Some(m) if m.expected == expected && m.actual == actual => {}
        other => panic!(
            "expected status mismatch {expected} -> {actual} on '{}', found {other:?}",
            result.contract
        ),
    }
}

/// Panics unless a violation of `kind` was recorded at `path` (e.g. `$.users[0].id`).
#[track_caller]
pub fn assert_error_at(result: &VerificationResult, path: &str, kind: ViolationKind) {
    let found = result
        .errors
        .iter()
        .any(|e| e.kind == kind && e.path.to_string() == path);
    assert!(
        found,
        "expected {kind:?} at {path} on '{}', errors: {:?}",
        result.contract,
        result.errors.iter().map(ToString::to_string).collect::<Vec<_>>()
    );
}

/// Differences between two contracts' method, path and status.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContractComparison {
    /// True when nothing differs.
    pub compatible: bool,
    /// Human-readable differences.
    pub differences: Vec<String>,
}

/// Compares the request line and expected status of two contracts.
#[must_use]
pub fn compare_contracts(left: &Contract, right: &Contract) -> ContractComparison {
    let mut differences = Vec::new();
    if left.method != right.method {
        differences.push(format!("Method mismatch: {} vs {}", left.method, right.method));
    }
    if left.path != right.path {
        differences.push(format!("Path mismatch: {} vs {}", left.path, right.path));
    }
    if left.expected_status != right.expected_status {
        differences.push(format!(
            "Status mismatch: {} vs {}",
            left.expected_status, right.expected_status
        ));
    }
    ContractComparison {
        compatible: differences.is_empty(),
        differences,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Exchange;
    use crate::validator::ContractValidator;
    use crate::contracts::fixtures;
    use serde_json::json;

    #[test]
    fn test_assertions_on_failed_result() {
        let contract = fixtures::list_users_contract().unwrap();
        let exchange = Exchange::new(500, json!({"users": [{"id": "1"}], "count": 1}));
        let result = ContractValidator::new().validate_contract(&contract, &exchange);

        assert_failed(&result);
        assert_status_mismatch(&result, 200, 500);
        assert_error_at(&result, "$.users[0].id", ViolationKind::TypeMismatch);
    }

    #[test]
    #[should_panic(expected = "expected 'GetUser' to pass")]
    fn test_assert_passed_panics() {
        let contract = fixtures::get_user_contract().unwrap();
        let result = ContractValidator::new().validate_contract(&contract, &Exchange::empty(404));
        assert_passed(&result);
    }

    #[test]
    fn test_compare_contracts() {
        let get_user = fixtures::get_user_contract().unwrap();
        let create_user = fixtures::create_user_contract().unwrap();

        assert!(compare_contracts(&get_user, &get_user).compatible);
        let comparison = compare_contracts(&get_user, &create_user);
        assert!(!comparison.compatible);
        assert_eq!(comparison.differences.len(), 3);
    }
}
