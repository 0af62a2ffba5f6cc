//! Liveness reconciliation for fleet members.
//!
//! One pass per container per scheduler tick: probe the recorded management
//! endpoint and apply the minimal set of mutations that converges the
//! container's provisioning/liveness/registration fields with the observed
//! reality. The reconciler is stateless between passes; everything it knows
//! lives in the registry. The caller serializes passes per container (the
//! monitor runs one loop per container), so no mutual exclusion is needed
//! here beyond the registry lock.

use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, info};

use procfleet_config::agent;
use procfleet_state::{ContainerRegistry, ContainerState, ProvisionStatus};

use crate::probe::{build_probe_url, probe_namespaces, ProbeOutcome};

/// Invoked with (container name, url) when a container's registered
/// management URL changes.
pub type RegisterCallback = Arc<dyn Fn(&str, &str) + Send + Sync>;

/// Converges recorded container state with live probes of management
/// endpoints.
pub struct LivenessReconciler {
    registry: ContainerRegistry,
    client: reqwest::Client,
    on_register: Option<RegisterCallback>,
}

impl LivenessReconciler {
    /// Create a reconciler over the given registry.
    ///
    /// The client's timeout configuration bounds each probe; the reconciler
    /// adds no timeout or retry of its own.
    pub fn new(registry: ContainerRegistry, client: reqwest::Client) -> Self {
        Self {
            registry,
            client,
            on_register: None,
        }
    }

    /// Set a callback fired when a container's registered URL changes.
    pub fn with_register_callback(mut self, callback: RegisterCallback) -> Self {
        self.on_register = Some(callback);
        self
    }

    /// Run one reconciliation pass for the named container.
    ///
    /// A vanished container, or one with no management URL recorded, is a
    /// no-op: zero mutations, zero network calls.
    pub async fn check(&self, name: &str) {
        let Some(container) = self.registry.get(name) else {
            debug!(%name, "container not in registry, skipping pass");
            return;
        };
        let management_url = match container.management_url() {
            Some(url) if !url.trim().is_empty() => url.to_string(),
            _ => return,
        };

        let probe_url = build_probe_url(&management_url, self.registry.credentials());
        debug!(%name, url = %management_url, "probing management endpoint");
        let outcome = probe_namespaces(&self.client, &probe_url).await;

        let registered = self
            .registry
            .update(name, |state| apply_probe_outcome(state, &outcome))
            .flatten();

        // Fire the callback outside the registry lock.
        if let Some(url) = registered {
            info!(%name, %url, "management url registered");
            if let Some(cb) = &self.on_register {
                cb(name, &url);
            }
        }
    }

    /// Record a freshly discovered management URL, then run a normal pass.
    ///
    /// The write is on-change; recording the same URL twice mutates nothing.
    pub async fn check_with_url(&self, name: &str, management_url: &str) {
        let found = self.registry.update(name, |state| {
            state.set_management_url(Some(management_url.to_string()));
        });
        if found.is_some() {
            self.check(name).await;
        }
    }

    /// Derive the container's management URL from its launch environment
    /// (agent launch argument), record it, and run a pass.
    pub async fn check_from_environment(
        &self,
        name: &str,
        environment: &HashMap<String, String>,
        default_host: &str,
    ) {
        match agent::find_url_from_environment(environment, default_host) {
            Some(url) => self.check_with_url(name, &url).await,
            None => self.check(name).await,
        }
    }
}

/// Apply one probe outcome to a container's recorded state.
///
/// Returns the management URL to (re)publish when the registered URL
/// changed; the caller notifies the registry's discovery index. Every
/// write goes through the write-on-change setters, so a pass that observes
/// nothing new mutates nothing.
pub fn apply_probe_outcome(
    state: &mut ContainerState,
    outcome: &ProbeOutcome,
) -> Option<String> {
    match outcome {
        ProbeOutcome::Valid(domains) => {
            let mut registered = None;
            if state.provision_status() != ProvisionStatus::Success || !state.alive() {
                state.set_provision_status(ProvisionStatus::Success);
                state.set_provision_error(None);
                state.set_alive(true);
                let url = state.management_url().map(str::to_string);
                if url.as_deref() != state.registered_management_url() {
                    state.set_registered_management_url(url.clone());
                    registered = url;
                }
            }
            if state.jmx_domains() != domains {
                state.set_jmx_domains(domains.clone());
            }
            registered
        }
        ProbeOutcome::Invalid => {
            // A failed probe alone never flips a live container to dead;
            // liveness is asserted by a separate heartbeat. The last good
            // namespace set and any recorded provisioning error are kept.
            if state.provision_status() != ProvisionStatus::Failed {
                state.set_provision_status(ProvisionStatus::Failed);
            }
            None
        }
    }
}
