//! In-memory contract registries.

use parking_lot::RwLock;
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;
use tracing::{debug, info};

use super::consumer::ConsumerContract;
use super::definition::Contract;
use crate::core::HttpRequest;
use crate::errors::{ContractflowError, Result};
use crate::matcher::RequestMatcher;

#[derive(Debug, Default)]
struct Entries {
    by_name: HashMap<String, Arc<Contract>>,
    order: Vec<String>,
}

/// Registry of provider contracts keyed by name.
///
/// Reads proceed concurrently; writes are serialized by the internal lock.
/// Listing preserves registration order.
#[derive(Debug, Default)]
pub struct ContractRegistry {
    entries: RwLock<Entries>,
}

impl ContractRegistry {
    /// Creates a new empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a contract, rejecting duplicate names and invalid definitions.
    pub fn register(&self, contract: Contract) -> Result<Arc<Contract>> {
        contract.check()?;

        let mut entries = self.entries.write();
        if entries.by_name.contains_key(&contract.name) {
            return Err(ContractflowError::duplicate(&contract.name));
        }

        let name = contract.name.clone();
        let contract = Arc::new(contract);
        entries.by_name.insert(name.clone(), Arc::clone(&contract));
        entries.order.push(name);

        info!(
            contract = %contract.name,
            method = %contract.method,
            path = %contract.path,
            "Contract registered"
        );
        Ok(contract)
    }

    /// Fetches a contract by name.
    pub fn get(&self, name: &str) -> Result<Arc<Contract>> {
        self.entries
            .read()
            .by_name
            .get(name)
            .cloned()
            .ok_or_else(|| ContractflowError::not_found(name))
    }

    /// Returns all contracts in registration order.
    #[must_use]
    pub fn list(&self) -> Vec<Arc<Contract>> {
        let entries = self.entries.read();
        entries
            .order
            .iter()
            .filter_map(|name| entries.by_name.get(name).cloned())
            .collect()
    }

    /// Removes a contract. Removing an absent name is not an error.
    pub fn remove(&self, name: &str) -> Option<Arc<Contract>> {
        let mut entries = self.entries.write();
        let removed = entries.by_name.remove(name);
        if removed.is_some() {
            entries.order.retain(|n| n != name);
            debug!(contract = %name, "Contract removed");
        }
        removed
    }

    /// Returns contracts declared on exactly this path pattern.
    #[must_use]
    pub fn by_path(&self, pattern: &str) -> Vec<Arc<Contract>> {
        self.list()
            .into_iter()
            .filter(|c| c.path.as_str() == pattern)
            .collect()
    }

    /// Finds the most specific contract covering a concrete request.
    #[must_use]
    pub fn find_for(&self, request: &HttpRequest) -> Option<(Arc<Contract>, BTreeMap<String, String>)> {
        let contracts = self.list();
        let matched = RequestMatcher::new().find(request, &contracts).into_option()?;
        Some((Arc::clone(matched.candidate), matched.params))
    }

    /// Remove all registered entries.
    pub fn clear(&self) {
        let mut entries = self.entries.write();
        entries.by_name.clear();
        entries.order.clear();
    }

    /// Returns the number of registered contracts.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.read().order.len()
    }

    /// Returns true if the registry is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.read().order.is_empty()
    }
}

/// Registry of consumer-driven contracts.
#[derive(Debug, Default)]
pub struct ConsumerContractRegistry {
    contracts: RwLock<Vec<Arc<ConsumerContract>>>,
}

impl ConsumerContractRegistry {
    /// Creates a new empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a consumer contract.
    pub fn register(&self, contract: ConsumerContract) -> Arc<ConsumerContract> {
        let contract = Arc::new(contract);
        info!(
            consumer = %contract.consumer_name,
            provider = %contract.provider_name,
            interactions = contract.interactions.len(),
            "Consumer contract registered"
        );
        self.contracts.write().push(Arc::clone(&contract));
        contract
    }

    /// Returns every contract targeting a provider, in registration order.
    #[must_use]
    pub fn for_provider(&self, provider: &str) -> Vec<ConsumerContract> {
        self.contracts
            .read()
            .iter()
            .filter(|c| c.provider_name == provider)
            .map(|c| (**c).clone())
            .collect()
    }

    /// Returns every registered contract.
    #[must_use]
    pub fn all(&self) -> Vec<Arc<ConsumerContract>> {
        self.contracts.read().clone()
    }

    /// Returns the number of registered contracts.
    #[must_use]
    pub fn len(&self) -> usize {
        self.contracts.read().len()
    }

    /// Returns true if the registry is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.contracts.read().is_empty()
    }
}
