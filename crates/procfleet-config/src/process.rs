//! Mutable launch configuration for a managed worker process.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Launch configuration for a managed worker process.
///
/// The three template strings and the environment mapping move as one
/// logical unit: a substitution pass rewrites all of them together, so the
/// strings and the stored environment never disagree about a resolved
/// value.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProcessConfig {
    /// Agent launch argument (e.g. `-javaagent:jolokia.jar=port=8778`).
    pub agent_argument: Option<String>,
    /// JVM arguments passed ahead of the main class.
    pub jvm_arguments: Option<String>,
    /// Arguments passed to the process entry point.
    pub process_arguments: Option<String>,
    /// Environment variables the process is launched with.
    pub environment: HashMap<String, String>,
}

impl ProcessConfig {
    /// Replace the stored environment mapping wholesale.
    pub fn update_environment(&mut self, environment: &HashMap<String, String>) {
        self.environment = environment.clone();
    }
}
