//! In-memory fleet registry.
//!
//! Collaborators receive this handle by explicit injection. A container
//! that has vanished between scheduling and probing is reported as absence
//! (`None`), not an error; the caller skips its pass.

use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::debug;

use crate::types::{ContainerState, Credentials};

/// Thread-safe registry of fleet members. Cheap to clone.
#[derive(Clone, Default)]
pub struct ContainerRegistry {
    containers: Arc<RwLock<HashMap<String, ContainerState>>>,
    credentials: Arc<Credentials>,
}

impl ContainerRegistry {
    /// Create a registry with the fleet's shared probe credentials.
    pub fn new(credentials: Credentials) -> Self {
        Self {
            containers: Arc::new(RwLock::new(HashMap::new())),
            credentials: Arc::new(credentials),
        }
    }

    /// Probe credentials shared across the fleet.
    pub fn credentials(&self) -> &Credentials {
        &self.credentials
    }

    /// Insert or replace a container record.
    pub fn insert(&self, state: ContainerState) {
        debug!(name = %state.name(), "container registered");
        self.containers
            .write()
            .insert(state.name().to_string(), state);
    }

    /// Snapshot of a container's current state.
    pub fn get(&self, name: &str) -> Option<ContainerState> {
        self.containers.read().get(name).cloned()
    }

    /// Apply a mutation to a container under the registry lock.
    ///
    /// Returns `None` when the container has vanished.
    pub fn update<R>(&self, name: &str, f: impl FnOnce(&mut ContainerState) -> R) -> Option<R> {
        self.containers.write().get_mut(name).map(f)
    }

    /// Remove a container record. Returns true if it existed.
    pub fn remove(&self, name: &str) -> bool {
        let existed = self.containers.write().remove(name).is_some();
        if existed {
            debug!(%name, "container removed");
        }
        existed
    }

    /// Names of all registered containers.
    pub fn names(&self) -> Vec<String> {
        self.containers.read().keys().cloned().collect()
    }

    /// Number of registered containers.
    pub fn len(&self) -> usize {
        self.containers.read().len()
    }

    /// Whether the registry has no containers at all.
    pub fn is_empty(&self) -> bool {
        self.containers.read().is_empty()
    }
}
