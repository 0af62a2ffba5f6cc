//! procfleet-config — launch configuration templating for managed processes.
//!
//! A managed worker process is launched with three templated strings (agent
//! launch argument, JVM arguments, process arguments) and an environment
//! mapping. This crate resolves `${env:KEY}` placeholders in those strings
//! and derives the process's management URL from its agent launch argument.
//!
//! Everything here is pure, synchronous computation over caller-owned data:
//! safe to run concurrently for different [`ProcessConfig`] instances
//! without coordination.

pub mod agent;
pub mod process;
pub mod substitute;

pub use process::ProcessConfig;
pub use substitute::{
    name_prefix_override, proxy_port_override, substitute_environment, update_proxy_port,
    EnvOverride,
};
