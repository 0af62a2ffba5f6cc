//! `${env:KEY}` placeholder substitution for launch configuration.
//!
//! Substitution resolves each key exactly once against the supplied
//! environment mapping, with named overrides taking precedence over raw
//! environment values. Overrides whose key the environment does not carry
//! still replace their placeholder, which lets a caller inject values for
//! variables that do not yet exist on the target process. Nothing here
//! errors: an unknown placeholder simply stays in the text.

use std::collections::HashMap;

use crate::process::ProcessConfig;

/// Override key for the externally assigned agent proxy port.
pub const PROXY_PORT_KEY: &str = "PROCFLEET_AGENT_PROXY_PORT";

/// Override key for the container name advertised by the agent.
pub const CONTAINER_NAME_KEY: &str = "PROCFLEET_CONTAINER_NAME";

type ResolveFn = Box<dyn Fn(Option<&str>) -> String + Send + Sync>;

/// A named environment override.
///
/// Wins over the raw environment value for its key; resolves from `None`
/// when the key is absent from the environment entirely.
pub struct EnvOverride {
    key: String,
    resolve: ResolveFn,
}

impl EnvOverride {
    /// Create an override for `key` backed by a resolve function.
    pub fn new(
        key: impl Into<String>,
        resolve: impl Fn(Option<&str>) -> String + Send + Sync + 'static,
    ) -> Self {
        Self {
            key: key.into(),
            resolve: Box::new(resolve),
        }
    }

    /// The environment key this override applies to.
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Resolve the override against the current value, if any.
    pub fn resolve(&self, current: Option<&str>) -> String {
        (self.resolve)(current)
    }
}

/// Override binding an externally assigned proxy port to
/// [`PROXY_PORT_KEY`], regardless of any current value.
pub fn proxy_port_override(port: u16) -> EnvOverride {
    EnvOverride::new(PROXY_PORT_KEY, move |_| port.to_string())
}

/// Override prefixing the advertised container name with `{prefix}--`.
///
/// A blank prefix passes the current value through unchanged.
pub fn name_prefix_override(prefix: &str) -> EnvOverride {
    let prefix = prefix.trim().to_string();
    EnvOverride::new(CONTAINER_NAME_KEY, move |current| {
        let current = current.unwrap_or_default();
        if prefix.is_empty() {
            current.to_string()
        } else {
            format!("{prefix}--{current}")
        }
    })
}

fn placeholder(key: &str) -> String {
    format!("${{env:{key}}}")
}

/// Substitute `${env:KEY}` placeholders in all three template strings and
/// persist the resolved environment mapping back into `config`.
///
/// Each key is processed once; replacement values are not re-scanned, so a
/// value containing another placeholder token is not recursively expanded.
/// Order of replacement across keys is unspecified. Override values are
/// written into the stored environment mapping as well, and override keys
/// absent from the environment are inserted with their resolved defaults,
/// keeping the strings and the mapping consistent.
pub fn substitute_environment(
    config: &mut ProcessConfig,
    environment: &HashMap<String, String>,
    overrides: &[EnvOverride],
) {
    let by_key: HashMap<&str, &EnvOverride> = overrides.iter().map(|o| (o.key(), o)).collect();

    let mut resolved = environment.clone();
    for (key, value) in environment {
        if let Some(o) = by_key.get(key.as_str()) {
            resolved.insert(key.clone(), o.resolve(Some(value)));
        }
    }
    for (key, o) in &by_key {
        if !environment.contains_key(*key) {
            resolved.insert((*key).to_string(), o.resolve(None));
        }
    }

    substitute_target(&mut config.agent_argument, &resolved);
    substitute_target(&mut config.jvm_arguments, &resolved);
    substitute_target(&mut config.process_arguments, &resolved);
    config.update_environment(&resolved);
}

/// Rewrite the agent argument's proxy-port placeholder for a newly assigned
/// port and refresh the stored environment mapping.
pub fn update_proxy_port(
    config: &mut ProcessConfig,
    environment: &HashMap<String, String>,
    port: u16,
) {
    if let Some(agent) = config.agent_argument.as_mut() {
        if !agent.trim().is_empty() {
            *agent = agent.replace(&placeholder(PROXY_PORT_KEY), &port.to_string());
        }
    }
    config.update_environment(environment);
}

/// Replace every resolved key's placeholder in one target string.
/// Blank or absent targets are skipped entirely.
fn substitute_target(target: &mut Option<String>, resolved: &HashMap<String, String>) {
    let Some(text) = target.as_mut() else {
        return;
    };
    if text.trim().is_empty() {
        return;
    }
    for (key, value) in resolved {
        *text = text.replace(&placeholder(key), value);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn env(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    fn config_with(agent: &str, jvm: &str, args: &str) -> ProcessConfig {
        ProcessConfig {
            agent_argument: Some(agent.to_string()),
            jvm_arguments: Some(jvm.to_string()),
            process_arguments: Some(args.to_string()),
            environment: HashMap::new(),
        }
    }

    #[test]
    fn raw_environment_values_are_substituted_in_all_targets() {
        let mut config = config_with(
            "-javaagent:j.jar=port=${env:PORT}",
            "-Dhost=${env:HOST}",
            "--listen ${env:HOST}:${env:PORT}",
        );
        let environment = env(&[("PORT", "8778"), ("HOST", "10.0.0.2")]);

        substitute_environment(&mut config, &environment, &[]);

        assert_eq!(
            config.agent_argument.as_deref(),
            Some("-javaagent:j.jar=port=8778")
        );
        assert_eq!(config.jvm_arguments.as_deref(), Some("-Dhost=10.0.0.2"));
        assert_eq!(
            config.process_arguments.as_deref(),
            Some("--listen 10.0.0.2:8778")
        );
        assert_eq!(config.environment, environment);
    }

    #[test]
    fn blank_targets_are_left_unset() {
        let mut config = ProcessConfig {
            agent_argument: None,
            jvm_arguments: Some("   ".to_string()),
            process_arguments: None,
            environment: HashMap::new(),
        };
        substitute_environment(&mut config, &env(&[("A", "1")]), &[]);

        assert_eq!(config.agent_argument, None);
        assert_eq!(config.jvm_arguments.as_deref(), Some("   "));
        assert_eq!(config.process_arguments, None);
    }

    #[test]
    fn substitution_is_idempotent_once_tokens_are_gone() {
        let mut config = config_with("${env:A}", "x", "y");
        let environment = env(&[("A", "1")]);

        substitute_environment(&mut config, &environment, &[]);
        let first = config.clone();
        substitute_environment(&mut config, &environment, &[]);

        assert_eq!(config, first);
    }

    #[test]
    fn override_injects_value_for_key_absent_from_environment() {
        let mut config = config_with("${env:A}-${env:B}", "", "");
        let overrides = [EnvOverride::new("B", |_| "2".to_string())];

        substitute_environment(&mut config, &env(&[("A", "1")]), &overrides);

        assert_eq!(config.agent_argument.as_deref(), Some("1-2"));
        // The injected key lands in the stored mapping too.
        assert_eq!(config.environment.get("B").map(String::as_str), Some("2"));
    }

    #[test]
    fn override_wins_over_raw_environment_value() {
        let mut config = config_with("${env:A}", "", "");
        let overrides = [EnvOverride::new("A", |_| "override".to_string())];

        substitute_environment(&mut config, &env(&[("A", "raw")]), &overrides);

        assert_eq!(config.agent_argument.as_deref(), Some("override"));
        assert_eq!(
            config.environment.get("A").map(String::as_str),
            Some("override")
        );
    }

    #[test]
    fn override_sees_the_current_environment_value() {
        let mut config = config_with("${env:A}", "", "");
        let overrides = [EnvOverride::new("A", |current| {
            format!("{}!", current.unwrap_or(""))
        })];

        substitute_environment(&mut config, &env(&[("A", "raw")]), &overrides);

        assert_eq!(config.agent_argument.as_deref(), Some("raw!"));
    }

    #[test]
    fn unknown_placeholders_stay_in_the_text() {
        let mut config = config_with("${env:MISSING}", "", "");
        substitute_environment(&mut config, &env(&[("A", "1")]), &[]);
        assert_eq!(config.agent_argument.as_deref(), Some("${env:MISSING}"));
    }

    #[test]
    fn replacement_values_are_not_recursively_expanded() {
        // A resolves to a token for a key nobody supplies; the token must
        // survive as literal text.
        let mut config = config_with("${env:A}", "", "");
        substitute_environment(&mut config, &env(&[("A", "${env:NOPE}")]), &[]);
        assert_eq!(config.agent_argument.as_deref(), Some("${env:NOPE}"));
    }

    #[test]
    fn proxy_port_override_always_resolves_to_the_port() {
        let o = proxy_port_override(4242);
        assert_eq!(o.key(), PROXY_PORT_KEY);
        assert_eq!(o.resolve(None), "4242");
        assert_eq!(o.resolve(Some("9999")), "4242");
    }

    #[test]
    fn name_prefix_override_prefixes_with_double_dash() {
        let o = name_prefix_override("staging");
        assert_eq!(o.key(), CONTAINER_NAME_KEY);
        assert_eq!(o.resolve(Some("worker-1")), "staging--worker-1");
    }

    #[test]
    fn blank_prefix_passes_value_through() {
        let o = name_prefix_override("  ");
        assert_eq!(o.resolve(Some("worker-1")), "worker-1");
        assert_eq!(o.resolve(None), "");
    }

    #[test]
    fn update_proxy_port_rewrites_only_the_agent_argument() {
        let token = format!("${{env:{PROXY_PORT_KEY}}}");
        let mut config = config_with(
            &format!("-javaagent:j.jar=port={token}"),
            &format!("-Dport={token}"),
            "",
        );
        let environment = env(&[("X", "1")]);

        update_proxy_port(&mut config, &environment, 9090);

        assert_eq!(
            config.agent_argument.as_deref(),
            Some("-javaagent:j.jar=port=9090")
        );
        // JVM arguments keep their token; only the agent argument is touched.
        assert_eq!(config.jvm_arguments.as_deref(), Some(&*format!("-Dport={token}")));
        assert_eq!(config.environment, environment);
    }
}
