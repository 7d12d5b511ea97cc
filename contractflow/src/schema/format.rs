//! Format-lite string checks.

use regex::Regex;
use std::sync::LazyLock;

use super::types::StringFormat;

#[allow(clippy::expect_used)]
static EMAIL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").expect("valid email regex"));

#[allow(clippy::expect_used)]
static URI: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z][A-Za-z0-9+.\-]*:[^\s]+$").expect("valid uri regex"));

/// Returns true when `value` conforms to `format`. Unknown formats always conform.
#[must_use]
pub fn conforms(format: &StringFormat, value: &str) -> bool {
    match format {
        StringFormat::Email => EMAIL.is_match(value),
        StringFormat::Uuid => uuid::Uuid::parse_str(value).is_ok(),
        StringFormat::DateTime => chrono::DateTime::parse_from_rfc3339(value).is_ok(),
        StringFormat::Date => chrono::NaiveDate::parse_from_str(value, "%Y-%m-%d").is_ok(),
        StringFormat::Uri => URI.is_match(value),
        StringFormat::Other(_) => true,
    }
}

/// A literal that conforms to `format`, used when synthesising samples.
#[must_use]
pub fn example_for(format: &StringFormat) -> &'static str {
    examples_for(format)[0]
}

/// Conforming literals for `format`, preferred first, shortest last.
#[must_use]
pub fn examples_for(format: &StringFormat) -> &'static [&'static str] {
    match format {
        StringFormat::Email => &["test@example.com", "a@b.co"],
        StringFormat::Uuid => &["00000000-0000-4000-8000-000000000000"],
        StringFormat::DateTime => &["2024-01-01T00:00:00Z"],
        StringFormat::Date => &["2024-01-01"],
        StringFormat::Uri => &["https://example.com", "a:b"],
        StringFormat::Other(_) => &["test_value"],
    }
}
