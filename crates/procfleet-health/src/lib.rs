//! procfleet-health — liveness reconciliation for managed worker processes.
//!
//! One reconciliation pass probes a container's recorded management URL and
//! converges the registry's provisioning/liveness fields with the observed
//! reality. The monitor fans passes out across the fleet.
//!
//! # Architecture
//!
//! ```text
//! KeepAliveMonitor
//!   └── Per-container background task
//!       └── LivenessReconciler::check
//!           ├── build_probe_url() — credentials into the authority
//!           ├── probe_namespaces() → ProbeOutcome
//!           └── apply_probe_outcome() — write-on-change transitions
//! ```
//!
//! Probe failures are classified, logged and folded into container state;
//! nothing here aborts caller control flow. Each scheduler tick is itself
//! the retry mechanism: there is no retry inside a pass, and the injected
//! HTTP client's timeout configuration bounds a hung probe.

pub mod monitor;
pub mod probe;
pub mod reconciler;

pub use monitor::KeepAliveMonitor;
pub use probe::{build_probe_url, probe_namespaces, ProbeOutcome};
pub use reconciler::{apply_probe_outcome, LivenessReconciler, RegisterCallback};
