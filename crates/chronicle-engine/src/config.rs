//! Configuration loading for the Chronicle gateway.
//!
//! The canonical configuration lives in `chronicle.yaml` next to the
//! binary. Every field has a default, and a missing file simply yields
//! the default configuration, so a bare `chronicle-engine` run works out
//! of the box.

use std::path::Path;

use serde::Deserialize;

/// Errors that can occur when loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Failed to read the configuration file from disk.
    #[error("failed to read config file: {source}")]
    Io {
        /// The underlying I/O error.
        #[from]
        source: std::io::Error,
    },

    /// Failed to parse YAML content.
    #[error("failed to parse config YAML: {source}")]
    Yaml {
        /// The underlying YAML parse error.
        source: serde_yml::Error,
    },
}

impl From<serde_yml::Error> for ConfigError {
    fn from(source: serde_yml::Error) -> Self {
        Self::Yaml { source }
    }
}

/// Top-level gateway configuration, mirroring `chronicle.yaml`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct EngineConfig {
    /// Push channel listener settings.
    #[serde(default)]
    pub push: PushConfig,

    /// Pull API listener settings.
    #[serde(default)]
    pub pull: PullConfig,

    /// Command queue settings.
    #[serde(default)]
    pub commands: CommandConfig,

    /// Pagination limits for the paginated list endpoints.
    #[serde(default)]
    pub pagination: PaginationConfig,

    /// Demo simulation settings.
    #[serde(default)]
    pub demo: DemoConfig,
}

impl EngineConfig {
    /// Load configuration from a YAML file, falling back to defaults
    /// when the file does not exist.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] if an existing file cannot be read, or
    /// [`ConfigError::Yaml`] if its content is not valid YAML.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            tracing::info!(path = %path.display(), "no config file, using defaults");
            return Ok(Self::default());
        }
        let contents = std::fs::read_to_string(path)?;
        Ok(Self::parse(&contents)?)
    }

    /// Parse configuration from a YAML string.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Yaml`] if the string is not valid YAML.
    pub fn parse(yaml: &str) -> Result<Self, serde_yml::Error> {
        serde_yml::from_str(yaml)
    }
}

/// Push channel listener configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct PushConfig {
    /// Address to bind the push listener to.
    #[serde(default = "default_host")]
    pub host: String,

    /// TCP port for the push listener.
    #[serde(default = "default_push_port")]
    pub port: u16,
}

impl Default for PushConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_push_port(),
        }
    }
}

/// Pull API listener configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct PullConfig {
    /// Address to bind the HTTP listener to.
    #[serde(default = "default_host")]
    pub host: String,

    /// TCP port for the HTTP listener.
    #[serde(default = "default_pull_port")]
    pub port: u16,
}

impl Default for PullConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_pull_port(),
        }
    }
}

/// Command queue configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct CommandConfig {
    /// How long a submitter waits for one command to execute, in
    /// milliseconds. A timed-out command still runs; only the reply is
    /// dropped.
    #[serde(default = "default_submit_timeout_ms")]
    pub submit_timeout_ms: u64,
}

impl Default for CommandConfig {
    fn default() -> Self {
        Self {
            submit_timeout_ms: default_submit_timeout_ms(),
        }
    }
}

/// Pagination limits configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct PaginationConfig {
    /// Limit applied when a request does not name one.
    #[serde(default = "default_page_limit")]
    pub default_limit: usize,

    /// Hard cap on the requested limit.
    #[serde(default = "default_page_cap")]
    pub max_limit: usize,
}

impl Default for PaginationConfig {
    fn default() -> Self {
        Self {
            default_limit: default_page_limit(),
            max_limit: default_page_cap(),
        }
    }
}

/// Demo simulation configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct DemoConfig {
    /// Real-time milliseconds between demo turn boundaries.
    #[serde(default = "default_turn_interval_ms")]
    pub turn_interval_ms: u64,
}

impl Default for DemoConfig {
    fn default() -> Self {
        Self {
            turn_interval_ms: default_turn_interval_ms(),
        }
    }
}

fn default_host() -> String {
    String::from("0.0.0.0")
}

const fn default_push_port() -> u16 {
    4000
}

const fn default_pull_port() -> u16 {
    4001
}

const fn default_submit_timeout_ms() -> u64 {
    5000
}

const fn default_page_limit() -> usize {
    100
}

const fn default_page_cap() -> usize {
    1000
}

const fn default_turn_interval_ms() -> u64 {
    10_000
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn empty_yaml_yields_defaults() {
        let config = EngineConfig::parse("{}").unwrap();
        assert_eq!(config, EngineConfig::default());
        assert_eq!(config.push.port, 4000);
        assert_eq!(config.pull.port, 4001);
        assert_eq!(config.commands.submit_timeout_ms, 5000);
        assert_eq!(config.pagination.default_limit, 100);
    }

    #[test]
    fn partial_yaml_overrides_only_named_fields() {
        let yaml = "
push:
  port: 9100
commands:
  submit_timeout_ms: 250
";
        let config = EngineConfig::parse(yaml).unwrap();
        assert_eq!(config.push.port, 9100);
        assert_eq!(config.push.host, "0.0.0.0");
        assert_eq!(config.commands.submit_timeout_ms, 250);
        assert_eq!(config.pull, PullConfig::default());
    }
}
