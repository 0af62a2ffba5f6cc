//! Management-agent launch-argument codec.
//!
//! The agent launch argument looks like
//! `-javaagent:jolokia-agent.jar=port=8778,host=0.0.0.0` — a jar path
//! followed by comma-separated `key=value` properties. This module parses
//! those properties and synthesizes the canonical management URL the fleet
//! registry advertises for the container.

use std::collections::HashMap;

/// Substring identifying the management agent in a launch argument.
pub const AGENT_MARKER: &str = "jolokia";

/// Port assumed when the launch argument carries no `port` property.
pub const DEFAULT_AGENT_PORT: &str = "8778";

/// Bind-all placeholder host; not a reachable endpoint.
pub const BIND_ALL_HOST: &str = "0.0.0.0";

/// Environment variable carrying the process's agent launch argument.
pub const AGENT_ENV_VAR: &str = "PROCFLEET_JAVA_AGENT";

/// Returns true if the launch argument carries the management agent.
///
/// Blank or absent input simply means "no agent", never an error.
pub fn has_management_agent(agent_argument: Option<&str>) -> bool {
    matches!(agent_argument, Some(s) if !s.trim().is_empty() && s.contains(AGENT_MARKER))
}

/// Parse the `key=value` properties after the first `=` of the launch
/// argument.
///
/// Trailing quote characters are trimmed from the whole string first.
/// Pairs without a value token are dropped silently (configuration noise,
/// not a fault); the last occurrence of a duplicate key wins.
pub fn agent_properties(agent_argument: &str) -> HashMap<String, String> {
    let mut text = agent_argument.trim();
    while text.ends_with('"') || text.ends_with('\'') {
        text = &text[..text.len() - 1];
    }
    let mut properties = HashMap::new();
    if let Some(start) = text.find('=') {
        for expression in text[start + 1..].split(',') {
            let mut tokens = expression.split('=');
            if let (Some(key), Some(value)) = (tokens.next(), tokens.next()) {
                properties.insert(key.to_string(), value.to_string());
            }
        }
    }
    properties
}

/// Synthesize the management URL from an agent launch argument.
///
/// Returns `None` when the argument does not carry the agent. A `0.0.0.0`
/// host means bind-all, which is not a usable endpoint, so it is replaced
/// by `default_host` (the container's externally reachable address). Host
/// and port are not validated; malformed input propagates into a malformed
/// URL.
pub fn synthesize_url(agent_argument: &str, default_host: &str) -> Option<String> {
    if !has_management_agent(Some(agent_argument)) {
        return None;
    }
    let properties = agent_properties(agent_argument);
    let port = properties
        .get("port")
        .map(String::as_str)
        .unwrap_or(DEFAULT_AGENT_PORT);
    let mut host = properties
        .get("host")
        .map(String::as_str)
        .unwrap_or(BIND_ALL_HOST);
    if host == BIND_ALL_HOST {
        host = default_host;
    }
    Some(format!("http://{host}:{port}/jolokia/"))
}

/// Read the agent launch argument from an environment mapping.
pub fn agent_argument_from_env(environment: &HashMap<String, String>) -> Option<&str> {
    environment.get(AGENT_ENV_VAR).map(String::as_str)
}

/// Returns true if the environment mapping advertises a management agent.
pub fn has_management_agent_in_env(environment: &HashMap<String, String>) -> bool {
    has_management_agent(agent_argument_from_env(environment))
}

/// Derive the management URL for a process from its environment mapping.
pub fn find_url_from_environment(
    environment: &HashMap<String, String>,
    default_host: &str,
) -> Option<String> {
    agent_argument_from_env(environment).and_then(|agent| synthesize_url(agent, default_host))
}
