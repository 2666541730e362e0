//! Per-connection limits configuration.

use super::defaults::{default_max_line_len, default_registration_timeout};
use serde::Deserialize;
use std::time::Duration;

/// Per-connection limits.
#[derive(Debug, Clone, Deserialize)]
pub struct LimitsConfig {
    /// Maximum inbound line length in bytes, excluding the terminator (default: 4096).
    /// Longer lines are dropped and answered with an error.
    #[serde(default = "default_max_line_len")]
    pub max_line_len: usize,
    /// Seconds a new connection may take to send its username (default: 0 = no limit).
    #[serde(default = "default_registration_timeout")]
    pub registration_timeout: u64,
}

impl Default for LimitsConfig {
    fn default() -> Self {
        Self {
            max_line_len: default_max_line_len(),
            registration_timeout: default_registration_timeout(),
        }
    }
}

impl LimitsConfig {
    /// The registration deadline, or `None` when disabled.
    pub fn registration_deadline(&self) -> Option<Duration> {
        (self.registration_timeout > 0).then(|| Duration::from_secs(self.registration_timeout))
    }
}
