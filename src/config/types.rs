//! Core configuration types and loading.

use serde::Deserialize;
use std::path::Path;
use thiserror::Error;

use super::defaults::{default_log_filter, default_server_name};
use super::limits::LimitsConfig;
use super::listen::ListenConfig;
use super::registry::RegistryConfig;

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Server configuration.
///
/// Every section is optional; an empty file yields the built-in defaults.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    /// Server information.
    #[serde(default)]
    pub server: ServerConfig,
    /// Network listen configuration.
    #[serde(default)]
    pub listen: ListenConfig,
    /// Per-connection limits.
    #[serde(default)]
    pub limits: LimitsConfig,
    /// Username registry policy.
    #[serde(default)]
    pub registry: RegistryConfig,
    /// Logging configuration.
    #[serde(default)]
    pub log: LogConfig,
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }

    /// Load configuration from `path` if the file exists, otherwise fall back
    /// to the built-in defaults.
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        match Self::load(path) {
            Err(ConfigError::Io(e)) if e.kind() == std::io::ErrorKind::NotFound => {
                Ok(Self::default())
            }
            other => other,
        }
    }
}

/// Server identity configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Server name used in logs (default: "chitthi").
    #[serde(default = "default_server_name")]
    pub name: String,
    /// Prometheus metrics HTTP port (default: 0 = disabled).
    #[serde(default)]
    pub metrics_port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            name: default_server_name(),
            metrics_port: 0,
        }
    }
}

/// Log output format.
#[derive(Debug, Clone, Copy, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Human-readable lines.
    #[default]
    Pretty,
    /// One JSON object per event.
    Json,
}

/// Logging configuration.
///
/// `RUST_LOG` takes precedence over `filter` when set.
#[derive(Debug, Clone, Deserialize)]
pub struct LogConfig {
    /// Default `tracing` filter directive (default: "info").
    #[serde(default = "default_log_filter")]
    pub filter: String,
    /// Output format (default: "pretty").
    #[serde(default)]
    pub format: LogFormat,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            filter: default_log_filter(),
            format: LogFormat::default(),
        }
    }
}
