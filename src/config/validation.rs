//! Configuration validation.
//!
//! Validates configuration at startup to catch common errors early.

use super::Config;
use thiserror::Error;

/// Validation errors for configuration.
#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("server.name must not be empty")]
    MissingServerName,
    #[error("limits.max_line_len must be at least 1")]
    ZeroLineLength,
    #[error("server.metrics_port {0} collides with the listen port")]
    MetricsPortCollision(u16),
    #[error("log.filter is not a valid filter directive: {0}")]
    InvalidLogFilter(String),
}

/// Validate a configuration, returning all errors found.
pub fn validate(config: &Config) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.server.name.trim().is_empty() {
        errors.push(ValidationError::MissingServerName);
    }

    if config.limits.max_line_len == 0 {
        errors.push(ValidationError::ZeroLineLength);
    }

    let metrics_port = config.server.metrics_port;
    if metrics_port != 0 && metrics_port == config.listen.address.port() {
        errors.push(ValidationError::MetricsPortCollision(metrics_port));
    }

    if let Err(e) = tracing_subscriber::EnvFilter::try_new(&config.log.filter) {
        errors.push(ValidationError::InvalidLogFilter(e.to_string()));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
