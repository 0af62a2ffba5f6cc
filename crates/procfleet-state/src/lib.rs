//! procfleet-state — container state and the in-memory fleet registry.
//!
//! [`ContainerState`] records what the fleet believes about one managed
//! worker process: its management URL, liveness, provisioning outcome and
//! discovered management namespaces. All mutation goes through
//! write-on-change setters so registry observers are not churned by no-op
//! reconciliation passes.
//!
//! [`ContainerRegistry`] is the shared handle collaborators receive by
//! explicit injection; it owns the container records and the fleet's
//! probe credentials.

pub mod registry;
pub mod types;

pub use registry::ContainerRegistry;
pub use types::{ContainerState, Credentials, ProvisionStatus};
