//! Username registry configuration.

use serde::Deserialize;

/// What happens when a username that is already online registers again.
#[derive(Debug, Clone, Copy, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum DuplicatePolicy {
    /// Refuse the newcomer; the existing session keeps the name.
    #[default]
    Reject,
    /// Last writer wins. The previous session stays connected but can no
    /// longer be reached by name.
    Replace,
    /// Last writer wins and the previous session is told why and closed.
    Kick,
}

/// Username registry configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RegistryConfig {
    /// Duplicate username policy: "reject", "replace" or "kick" (default: "reject").
    #[serde(default)]
    pub duplicate_policy: DuplicatePolicy,
}
