//! Named, reusable bundles of mock rules.

use serde::{Deserialize, Serialize};
use tracing::info;

use super::engine::MockDispatchEngine;
use super::rule::MockRule;

/// A testing scenario: a named set of rules applied together.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MockScenario {
    /// Scenario name.
    pub name: String,
    /// Rules in application order.
    pub rules: Vec<MockRule>,
}

impl MockScenario {
    /// Creates an empty scenario.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            rules: Vec::new(),
        }
    }

    /// Adds a plain method/path rule.
    #[must_use]
    pub fn add_mock(self, method: &str, path: &str, body: serde_json::Value, status: u16) -> Self {
        self.with_rule(MockRule::new(method, path).respond(status, body))
    }

    /// Adds a prepared rule.
    #[must_use]
    pub fn with_rule(mut self, rule: MockRule) -> Self {
        self.rules.push(rule);
        self
    }

    /// Registers every rule on the engine and returns how many were added.
    pub fn apply_to(&self, engine: &MockDispatchEngine) -> usize {
        for rule in &self.rules {
            engine.add_mock(rule.clone());
        }
        info!(scenario = %self.name, engine = %engine.name(), mocks = self.rules.len(), "Scenario applied");
        self.rules.len()
    }
}
