//! Unified error handling for chitthi.
//!
//! Routing misses and protocol violations are not errors: they are answered
//! with reply lines. The types here cover the outcomes that end a connection
//! or refuse a registration.

use chitthi_proto::ProtocolError;
use thiserror::Error;

// ============================================================================
// Registry Errors
// ============================================================================

/// Errors returned when claiming a username.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    #[error("username in use: {0}")]
    NameInUse(String),
}

// ============================================================================
// Connection Errors
// ============================================================================

/// Errors that end a connection abnormally.
///
/// Every variant is handled inside the connection task; none of them reach
/// the gateway loop or other sessions.
#[derive(Debug, Error)]
pub enum ConnectionError {
    /// Stream setup failed right after accept.
    #[error("connection setup failed: {0}")]
    Setup(#[source] std::io::Error),

    /// Reading or writing the line transport failed.
    #[error("transport error: {0}")]
    Transport(#[from] ProtocolError),
}

impl ConnectionError {
    /// Get a static error code string for logging and metrics labeling.
    #[inline]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::Setup(_) => "setup",
            Self::Transport(_) => "transport",
        }
    }

    /// Whether this is the peer going away rather than a server-side fault.
    pub fn is_disconnect(&self) -> bool {
        use std::io::ErrorKind::*;
        match self {
            Self::Transport(ProtocolError::Io(e)) => matches!(
                e.kind(),
                ConnectionReset | ConnectionAborted | BrokenPipe | UnexpectedEof
            ),
            _ => false,
        }
    }
}
