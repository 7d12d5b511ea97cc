//! The mock dispatch engine.
//!
//! An engine holds an ordered rule list and an append-only call history.
//! Rule lookups work on a snapshot of the list and never block appends;
//! history appends are serialized under a single lock, which also assigns
//! call ordinals.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use parking_lot::{Mutex, RwLock};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::{debug, info};

use super::rule::MockRule;
use crate::contracts::{ConsumerContract, ShapeOptions};
use crate::core::{normalize_method, Exchange, HttpRequest};
use crate::errors::TransportError;
use crate::matcher::RequestMatcher;
use crate::validator::ExchangeProvider;

/// Lifecycle of an engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MockState {
    /// No rules yet.
    Idle,
    /// Rules registered, not serving.
    Configured,
    /// Handed to a listener and answering requests.
    Serving,
}

/// One request seen by the engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CallRecord {
    /// Position in the history, starting at 1.
    pub ordinal: u64,
    /// Request method.
    pub method: String,
    /// Request path.
    pub path: String,
    /// Query parameters.
    pub query: BTreeMap<String, String>,
    /// Request body.
    pub body: Option<serde_json::Value>,
    /// Rule that answered, `None` on a miss.
    pub matched_rule_id: Option<String>,
    /// When the call was recorded.
    pub recorded_at: DateTime<Utc>,
}

/// Result of dispatching one request.
#[derive(Debug, Clone, PartialEq)]
pub enum DispatchOutcome {
    /// A rule matched.
    Matched {
        /// The matching rule.
        rule_id: String,
        /// Its response.
        response: Exchange,
    },
    /// No rule matched; the response explains why.
    Miss {
        /// A 404 response describing the request.
        response: Exchange,
    },
}

impl DispatchOutcome {
    /// True when a rule matched.
    #[must_use]
    pub fn is_match(&self) -> bool {
        matches!(self, Self::Matched { .. })
    }

    /// The response to send back.
    #[must_use]
    pub fn into_response(self) -> Exchange {
        match self {
            Self::Matched { response, .. } | Self::Miss { response } => response,
        }
    }
}

#[derive(Debug, Default)]
struct History {
    next_ordinal: u64,
    records: Vec<CallRecord>,
}

/// Simulates a provider by answering requests from registered rules.
#[derive(Debug)]
pub struct MockDispatchEngine {
    name: String,
    rules: RwLock<Arc<Vec<MockRule>>>,
    history: Mutex<History>,
    state: RwLock<MockState>,
}

impl MockDispatchEngine {
    /// Creates an idle engine.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        let name = name.into();
        info!(engine = %name, "Mock engine created");
        Self {
            name,
            rules: RwLock::new(Arc::new(Vec::new())),
            history: Mutex::new(History::default()),
            state: RwLock::new(MockState::Idle),
        }
    }

    /// Seeds an engine with the stub every interaction of a consumer implies.
    #[must_use]
    pub fn from_consumer_contract(contract: &ConsumerContract, options: ShapeOptions) -> Self {
        let engine = Self::new(&contract.provider_name);
        for interaction in &contract.interactions {
            engine.add_mock(MockRule::from_interaction(interaction, options));
        }
        engine
    }

    /// Engine name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Current lifecycle state.
    #[must_use]
    pub fn state(&self) -> MockState {
        *self.state.read()
    }

    /// Registers a rule and returns its id. Earlier rules win ties.
    pub fn add_mock(&self, rule: MockRule) -> String {
        let id = rule.id.clone();
        debug!(engine = %self.name, rule_id = %id, method = %rule.method, path = %rule.path, "Mock added");
        {
            let mut rules = self.rules.write();
            let mut next = Vec::with_capacity(rules.len() + 1);
            next.extend(rules.iter().cloned());
            next.push(rule);
            *rules = Arc::new(next);
        }
        let mut state = self.state.write();
        if *state == MockState::Idle {
            *state = MockState::Configured;
        }
        id
    }

    /// Snapshot of the registered rules.
    #[must_use]
    pub fn rules(&self) -> Arc<Vec<MockRule>> {
        Arc::clone(&self.rules.read())
    }

    /// Marks the engine as serving.
    pub fn start(&self) {
        *self.state.write() = MockState::Serving;
        info!(engine = %self.name, rules = self.rules.read().len(), "Mock engine serving");
    }

    /// Stops serving. Rules are kept.
    pub fn stop(&self) {
        let idle = self.rules.read().is_empty();
        *self.state.write() = if idle { MockState::Idle } else { MockState::Configured };
        info!(engine = %self.name, "Mock engine stopped");
    }

    /// Answers a request and records it, whether or not a rule matched.
    ///
    /// Works in any state; listeners call this once per incoming request.
    pub fn handle(&self, request: &HttpRequest) -> DispatchOutcome {
        let rules = self.rules();
        let matched = RequestMatcher::new().find(request, rules.as_slice()).candidate();

        let outcome = match matched {
            Some(rule) => DispatchOutcome::Matched {
                rule_id: rule.id.clone(),
                response: rule.response(),
            },
            None => DispatchOutcome::Miss {
                response: Exchange::new(
                    404,
                    serde_json::json!({
                        "error": "no mock matched",
                        "method": request.method,
                        "path": request.path,
                    }),
                ),
            },
        };

        let matched_rule_id = match &outcome {
            DispatchOutcome::Matched { rule_id, .. } => Some(rule_id.clone()),
            DispatchOutcome::Miss { .. } => None,
        };
        debug!(
            engine = %self.name,
            request = %request,
            rule_id = matched_rule_id.as_deref().unwrap_or("-"),
            "Mock request handled"
        );
        self.record(request, matched_rule_id);
        outcome
    }

    fn record(&self, request: &HttpRequest, matched_rule_id: Option<String>) {
        let mut history = self.history.lock();
        history.next_ordinal += 1;
        let ordinal = history.next_ordinal;
        history.records.push(CallRecord {
            ordinal,
            method: request.method.clone(),
            path: request.path.clone(),
            query: request.query.clone(),
            body: request.body.clone(),
            matched_rule_id,
            recorded_at: Utc::now(),
        });
    }

    /// Recorded calls for one method and path, in arrival order.
    #[must_use]
    pub fn calls_for(&self, method: &str, path: &str) -> Vec<CallRecord> {
        let method = normalize_method(method);
        self.history
            .lock()
            .records
            .iter()
            .filter(|r| r.method == method && r.path == path)
            .cloned()
            .collect()
    }

    /// Number of recorded calls.
    #[must_use]
    pub fn call_count(&self) -> usize {
        self.history.lock().records.len()
    }

    /// All recorded calls, in arrival order.
    #[must_use]
    pub fn history(&self) -> Vec<CallRecord> {
        self.history.lock().records.clone()
    }

    /// Clears the call history. Rules persist.
    pub fn reset(&self) {
        *self.history.lock() = History::default();
        debug!(engine = %self.name, "Mock history cleared");
    }
}

#[async_trait]
impl ExchangeProvider for MockDispatchEngine {
    async fn exchange(&self, request: &HttpRequest) -> Result<Exchange, TransportError> {
        Ok(self.handle(request).into_response())
    }
}
