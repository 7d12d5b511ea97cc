//! A completed request/response exchange.

use super::headers::{header_value, Headers};
use serde::{Deserialize, Serialize};

/// The response half of an already-performed HTTP exchange.
///
/// Produced by the transport collaborator (real HTTP, a mock engine, or a
/// test double) and consumed by the contract validator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Exchange {
    /// HTTP status code.
    pub status: u16,
    /// Response headers.
    #[serde(default)]
    pub headers: Headers,
    /// Response body. `Null` when the response had no body.
    #[serde(default)]
    pub body: serde_json::Value,
}

impl Exchange {
    /// Creates an exchange with a status and body.
    #[must_use]
    pub fn new(status: u16, body: serde_json::Value) -> Self {
        Self {
            status,
            headers: Headers::new(),
            body,
        }
    }

    /// Creates a bodiless exchange.
    #[must_use]
    pub fn empty(status: u16) -> Self {
        Self::new(status, serde_json::Value::Null)
    }

    /// Adds a header.
    #[must_use]
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name.into(), value.into());
        self
    }

    /// Looks up a header ignoring case.
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        header_value(&self.headers, name)
    }

    /// True for 2xx statuses.
    #[must_use]
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_exchange_builder() {
        let exchange = Exchange::new(201, json!({"id": 3})).with_header("Location", "/api/users/3");

        assert!(exchange.is_success());
        assert_eq!(exchange.header("location"), Some("/api/users/3"));
        assert_eq!(exchange.body["id"], 3);
    }

    #[test]
    fn test_exchange_deserialize_defaults() {
        let exchange: Exchange = serde_json::from_value(json!({"status": 204})).unwrap();
        assert!(exchange.headers.is_empty());
        assert!(exchange.body.is_null());
    }
}
