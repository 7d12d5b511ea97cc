//! Contract definitions and their builder.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::core::{normalize_method, Headers, HttpRequest};
use crate::errors::{ContractflowError, Result};
use crate::matcher::{PathPattern, RouteCandidate};
use crate::schema::{sample_value, Schema};

/// A declared expectation of an API endpoint's behaviour.
///
/// Contracts are built once through [`ContractBuilder`] and shared
/// immutably after registration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Contract {
    /// Unique name; the contract's identity.
    pub name: String,
    /// Upper-cased HTTP method.
    pub method: String,
    /// Path pattern, e.g. `/api/users/{id}`.
    pub path: PathPattern,
    /// Free-form description.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub description: String,
    /// Expected request body shape.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub request_schema: Option<Schema>,
    /// Expected response body shape.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub response_schema: Option<Schema>,
    /// Expected HTTP status.
    pub expected_status: u16,
    /// Headers the response must carry, compared by value.
    #[serde(default)]
    pub expected_headers: Headers,
    /// Concrete path used when the contract is exercised against a provider.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub example_path: Option<String>,
}

impl Contract {
    /// Starts building a contract.
    #[must_use]
    pub fn builder(name: impl Into<String>, method: &str, path: &str) -> ContractBuilder {
        ContractBuilder::new(name, method, path)
    }

    /// Checks the model invariants.
    pub fn check(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(ContractflowError::invalid_contract(&self.name, "name must not be empty"));
        }
        if self.method.is_empty() || !self.method.chars().all(|c| c.is_ascii_alphabetic()) {
            return Err(ContractflowError::invalid_contract(
                &self.name,
                format!("'{}' is not an HTTP method", self.method),
            ));
        }
        if !(100..=599).contains(&self.expected_status) {
            return Err(ContractflowError::invalid_contract(
                &self.name,
                format!("status {} is outside 100-599", self.expected_status),
            ));
        }
        if let Some(example) = &self.example_path {
            if !self.path.matches(example) {
                return Err(ContractflowError::invalid_contract(
                    &self.name,
                    format!("example path '{example}' does not match '{}'", self.path),
                ));
            }
        }
        for schema in self.request_schema.iter().chain(self.response_schema.iter()) {
            schema.check()?;
        }
        Ok(())
    }

    /// The concrete path used to exercise this contract.
    ///
    /// Falls back to rendering the pattern with every parameter set to `1`.
    #[must_use]
    pub fn concrete_path(&self) -> String {
        self.example_path
            .clone()
            .unwrap_or_else(|| self.path.render(&BTreeMap::new(), "1"))
    }

    /// Builds the request used to exercise this contract.
    ///
    /// Carries a sample body when a request schema is declared.
    #[must_use]
    pub fn sample_request(&self) -> HttpRequest {
        let request = HttpRequest::new(&self.method, &self.concrete_path());
        match &self.request_schema {
            Some(schema) => request.with_body(sample_value(schema)),
            None => request,
        }
    }

    /// Renders the contract as a JSON document with JSON-Schema-like schemas.
    #[must_use]
    pub fn to_json(&self) -> serde_json::Value {
        serde_json::json!({
            "name": self.name,
            "method": self.method,
            "path": self.path.as_str(),
            "description": self.description,
            "request_schema": self.request_schema.as_ref().map(Schema::to_json),
            "response_schema": self.response_schema.as_ref().map(Schema::to_json),
            "expected_status": self.expected_status,
            "headers": self.expected_headers,
        })
    }
}

impl RouteCandidate for Contract {
    fn method(&self) -> &str {
        &self.method
    }

    fn pattern(&self) -> &PathPattern {
        &self.path
    }
}

/// Builder for [`Contract`].
#[derive(Debug, Clone)]
pub struct ContractBuilder {
    contract: Contract,
}

impl ContractBuilder {
    /// Creates a builder expecting status 200.
    #[must_use]
    pub fn new(name: impl Into<String>, method: &str, path: &str) -> Self {
        Self {
            contract: Contract {
                name: name.into(),
                method: normalize_method(method),
                path: PathPattern::parse(path),
                description: String::new(),
                request_schema: None,
                response_schema: None,
                expected_status: 200,
                expected_headers: Headers::new(),
                example_path: None,
            },
        }
    }

    /// Sets the description.
    #[must_use]
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.contract.description = description.into();
        self
    }

    /// Sets the request schema.
    #[must_use]
    pub fn request_schema(mut self, schema: Schema) -> Self {
        self.contract.request_schema = Some(schema);
        self
    }

    /// Sets the response schema.
    #[must_use]
    pub fn response_schema(mut self, schema: Schema) -> Self {
        self.contract.response_schema = Some(schema);
        self
    }

    /// Sets the expected status.
    #[must_use]
    pub fn status(mut self, status: u16) -> Self {
        self.contract.expected_status = status;
        self
    }

    /// Adds an expected response header.
    #[must_use]
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.contract.expected_headers.insert(name.into(), value.into());
        self
    }

    /// Sets the concrete path used when exercising the contract.
    #[must_use]
    pub fn example_path(mut self, path: impl Into<String>) -> Self {
        self.contract.example_path = Some(path.into());
        self
    }

    /// Validates and returns the contract.
    pub fn build(self) -> Result<Contract> {
        self.contract.check()?;
        Ok(self.contract)
    }
}
