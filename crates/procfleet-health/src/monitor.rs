//! Keep-alive monitor — one background polling task per container.
//!
//! Each monitored container gets its own loop, which is also the
//! serialization guarantee the state model assumes: at most one
//! reconciliation pass in flight per container.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{watch, RwLock};
use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::reconciler::LivenessReconciler;

/// Handle to one container's polling loop.
struct PollSlot {
    handle: JoinHandle<()>,
    shutdown_tx: watch::Sender<bool>,
}

/// Fans liveness reconciliation out across the fleet.
pub struct KeepAliveMonitor {
    reconciler: Arc<LivenessReconciler>,
    slots: Arc<RwLock<HashMap<String, PollSlot>>>,
}

impl KeepAliveMonitor {
    pub fn new(reconciler: Arc<LivenessReconciler>) -> Self {
        Self {
            reconciler,
            slots: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Start polling a container at the given interval.
    ///
    /// Starting an already monitored container replaces its loop; the old
    /// one is shut down first.
    pub async fn start(&self, name: &str, interval: Duration) {
        let (shutdown_tx, mut shutdown_rx) = watch::channel(false);
        let reconciler = Arc::clone(&self.reconciler);
        let container = name.to_string();

        let handle = tokio::spawn(async move {
            debug!(name = %container, "keep-alive loop starting");
            loop {
                tokio::select! {
                    _ = tokio::time::sleep(interval) => {
                        reconciler.check(&container).await;
                    }
                    _ = shutdown_rx.changed() => {
                        debug!(name = %container, "keep-alive loop shutting down");
                        break;
                    }
                }
            }
        });

        let mut slots = self.slots.write().await;
        if let Some(old) = slots.insert(name.to_string(), PollSlot { handle, shutdown_tx }) {
            let _ = old.shutdown_tx.send(true);
            old.handle.abort();
        }
        info!(%name, ?interval, "keep-alive monitor started");
    }

    /// Stop polling a container. Returns true if a loop was running.
    pub async fn stop(&self, name: &str) -> bool {
        let mut slots = self.slots.write().await;
        match slots.remove(name) {
            Some(slot) => {
                let _ = slot.shutdown_tx.send(true);
                slot.handle.abort();
                info!(%name, "keep-alive monitor stopped");
                true
            }
            None => false,
        }
    }

    /// Stop every polling loop (graceful shutdown).
    pub async fn stop_all(&self) {
        let mut slots = self.slots.write().await;
        for (name, slot) in slots.drain() {
            let _ = slot.shutdown_tx.send(true);
            slot.handle.abort();
            debug!(%name, "keep-alive monitor stopped");
        }
        info!("all keep-alive monitors stopped");
    }

    /// Names of containers with an active polling loop.
    pub async fn active(&self) -> Vec<String> {
        self.slots.read().await.keys().cloned().collect()
    }

    /// Whether a container currently has a polling loop.
    pub async fn is_monitoring(&self, name: &str) -> bool {
        self.slots.read().await.contains_key(name)
    }
}
