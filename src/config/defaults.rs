//! Default value functions for configuration.
//!
//! Separated into its own module for clarity and reuse.

use std::net::{Ipv4Addr, SocketAddr};

// =============================================================================
// Server Defaults
// =============================================================================

pub fn default_server_name() -> String {
    "chitthi".to_string()
}

// =============================================================================
// Listen Defaults
// =============================================================================

/// Port the relay has always listened on.
pub const DEFAULT_PORT: u16 = 8888;

pub fn default_listen_address() -> SocketAddr {
    SocketAddr::from((Ipv4Addr::UNSPECIFIED, DEFAULT_PORT))
}

// =============================================================================
// Limits Defaults
// =============================================================================

pub fn default_max_line_len() -> usize {
    chitthi_proto::DEFAULT_MAX_LINE_LEN
}

/// Registration is not timed out unless configured.
pub fn default_registration_timeout() -> u64 {
    0
}

// =============================================================================
// Log Defaults
// =============================================================================

pub fn default_log_filter() -> String {
    "info".to_string()
}
