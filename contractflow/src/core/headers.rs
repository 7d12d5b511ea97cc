//! Header maps and method normalisation.

use std::collections::BTreeMap;

/// Header map. Ordered so serialized reports are stable.
pub type Headers = BTreeMap<String, String>;

/// Looks up a header by name, ignoring ASCII case.
#[must_use]
pub fn header_value<'a>(headers: &'a Headers, name: &str) -> Option<&'a str> {
    headers
        .iter()
        .find(|(key, _)| key.eq_ignore_ascii_case(name))
        .map(|(_, value)| value.as_str())
}

/// Upper-cases and trims an HTTP method.
#[must_use]
pub fn normalize_method(method: &str) -> String {
    method.trim().to_ascii_uppercase()
}
