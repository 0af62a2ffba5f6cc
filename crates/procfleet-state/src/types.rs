//! Domain types for the ProcFleet registry.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Recorded outcome of bringing a container to a running state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProvisionStatus {
    /// No provisioning outcome recorded yet.
    #[default]
    Pending,
    Success,
    Failed,
}

/// Registry-scoped credentials used for authenticated probes.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

/// Recorded state of one fleet member.
///
/// Fields are private; mutation goes through setters that write (and bump
/// the mutation counter) only when the new value differs from the stored
/// one. `registered_management_url` is a distinct slot recording the last
/// URL published to the registry's discovery index, which can lag behind
/// `management_url` until a reconciliation pass republishes it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContainerState {
    name: String,
    management_url: Option<String>,
    alive: bool,
    provision_status: ProvisionStatus,
    provision_error: Option<String>,
    jmx_domains: BTreeSet<String>,
    registered_management_url: Option<String>,
    #[serde(skip)]
    mutations: u64,
}

impl ContainerState {
    /// Create a fresh record for a newly provisioned container.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            management_url: None,
            alive: false,
            provision_status: ProvisionStatus::Pending,
            provision_error: None,
            jmx_domains: BTreeSet::new(),
            registered_management_url: None,
            mutations: 0,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn management_url(&self) -> Option<&str> {
        self.management_url.as_deref()
    }

    pub fn alive(&self) -> bool {
        self.alive
    }

    pub fn provision_status(&self) -> ProvisionStatus {
        self.provision_status
    }

    pub fn provision_error(&self) -> Option<&str> {
        self.provision_error.as_deref()
    }

    /// Discovered management namespaces, last observed by a valid probe.
    pub fn jmx_domains(&self) -> &BTreeSet<String> {
        &self.jmx_domains
    }

    pub fn registered_management_url(&self) -> Option<&str> {
        self.registered_management_url.as_deref()
    }

    /// Number of field writes applied so far. Stands in for the observer
    /// churn a registry would see; a no-op pass leaves it unchanged.
    pub fn mutation_count(&self) -> u64 {
        self.mutations
    }

    pub fn set_management_url(&mut self, url: Option<String>) {
        if self.management_url != url {
            self.management_url = url;
            self.mutations += 1;
        }
    }

    pub fn set_alive(&mut self, alive: bool) {
        if self.alive != alive {
            self.alive = alive;
            self.mutations += 1;
        }
    }

    pub fn set_provision_status(&mut self, status: ProvisionStatus) {
        if self.provision_status != status {
            self.provision_status = status;
            self.mutations += 1;
        }
    }

    pub fn set_provision_error(&mut self, error: Option<String>) {
        if self.provision_error != error {
            self.provision_error = error;
            self.mutations += 1;
        }
    }

    pub fn set_jmx_domains(&mut self, domains: BTreeSet<String>) {
        if self.jmx_domains != domains {
            self.jmx_domains = domains;
            self.mutations += 1;
        }
    }

    pub fn set_registered_management_url(&mut self, url: Option<String>) {
        if self.registered_management_url != url {
            self.registered_management_url = url;
            self.mutations += 1;
        }
    }
}
