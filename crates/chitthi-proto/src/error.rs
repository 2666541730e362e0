//! Error types for the chitthi line protocol.

use thiserror::Error;

/// Convenience type alias for Results using [`ProtocolError`].
pub type Result<T, E = ProtocolError> = std::result::Result<T, E>;

/// Protocol-level errors.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ProtocolError {
    /// I/O error during reading or writing.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// An outgoing line contained an embedded newline and would split into
    /// two frames on the wire.
    #[error("outgoing line contains a newline")]
    EmbeddedNewline,
}
