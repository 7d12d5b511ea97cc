//! A set of named mock engines with activation state.

use dashmap::{DashMap, DashSet};
use std::sync::Arc;
use tracing::info;

use super::engine::{DispatchOutcome, MockDispatchEngine};
use crate::core::HttpRequest;

/// Holds named mock engines and tracks which are active.
#[derive(Debug, Default)]
pub struct MockManager {
    engines: DashMap<String, Arc<MockDispatchEngine>>,
    active: DashSet<String>,
}

impl MockManager {
    /// Creates an empty manager.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers an engine under its own name, replacing any previous one.
    pub fn register(&self, engine: MockDispatchEngine) -> Arc<MockDispatchEngine> {
        let engine = Arc::new(engine);
        let name = engine.name().to_string();
        info!(engine = %name, "Mock registered");
        self.engines.insert(name, Arc::clone(&engine));
        engine
    }

    /// Fetches an engine by name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<Arc<MockDispatchEngine>> {
        self.engines.get(name).map(|e| Arc::clone(e.value()))
    }

    /// Activates a registered engine. Returns false for unknown names.
    pub fn activate(&self, name: &str) -> bool {
        if !self.engines.contains_key(name) {
            return false;
        }
        self.active.insert(name.to_string());
        info!(engine = %name, "Mock activated");
        true
    }

    /// Deactivates an engine. Returns false if it was not active.
    pub fn deactivate(&self, name: &str) -> bool {
        let removed = self.active.remove(name).is_some();
        if removed {
            info!(engine = %name, "Mock deactivated");
        }
        removed
    }

    /// True when the engine is active.
    #[must_use]
    pub fn is_active(&self, name: &str) -> bool {
        self.active.contains(name)
    }

    /// Names of active engines, sorted.
    #[must_use]
    pub fn active_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.active.iter().map(|n| n.key().clone()).collect();
        names.sort();
        names
    }

    /// Dispatches to a named engine if it is active.
    #[must_use]
    pub fn handle(&self, name: &str, request: &HttpRequest) -> Option<DispatchOutcome> {
        if !self.is_active(name) {
            return None;
        }
        self.get(name).map(|engine| engine.handle(request))
    }

    /// Clears the call history of every engine.
    pub fn clear_all_history(&self) {
        for engine in self.engines.iter() {
            engine.value().reset();
        }
        info!(engines = self.engines.len(), "All mock history cleared");
    }

    /// Number of registered engines.
    #[must_use]
    pub fn len(&self) -> usize {
        self.engines.len()
    }

    /// True when no engines are registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.engines.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mocks::MockRule;

    fn manager() -> MockManager {
        let manager = MockManager::new();
        let engine = MockDispatchEngine::new("UserAPI");
        engine.add_mock(MockRule::new("GET", "/api/users"));
        manager.register(engine);
        manager.register(MockDispatchEngine::new("OrderAPI"));
        manager
    }

    #[test]
    fn test_activation() {
        let manager = manager();
        assert!(!manager.activate("Billing"));
        assert!(manager.activate("UserAPI"));
        assert!(manager.is_active("UserAPI"));
        assert_eq!(manager.active_names(), vec!["UserAPI"]);

        assert!(manager.deactivate("UserAPI"));
        assert!(!manager.deactivate("UserAPI"));
    }

    #[test]
    fn test_handle_requires_active_engine() {
        let manager = manager();
        let request = HttpRequest::get("/api/users");
        assert!(manager.handle("UserAPI", &request).is_none());

        manager.activate("UserAPI");
        assert!(manager.handle("UserAPI", &request).unwrap().is_match());
    }

    #[test]
    fn test_clear_all_history() {
        let manager = manager();
        manager.activate("UserAPI");
        let _ = manager.handle("UserAPI", &HttpRequest::get("/api/users"));
        let _ = manager.get("OrderAPI").unwrap().handle(&HttpRequest::get("/"));

        manager.clear_all_history();
        assert_eq!(manager.get("UserAPI").unwrap().call_count(), 0);
        assert_eq!(manager.get("OrderAPI").unwrap().call_count(), 0);
        assert_eq!(manager.len(), 2);
    }
}
