//! Tracing subscriber setup.

use crate::config::{LogConfig, LogFormat};
use tracing_subscriber::EnvFilter;

/// Install the global tracing subscriber.
///
/// `RUST_LOG` wins over the configured filter when it is set and valid.
/// Returns an error if a global subscriber is already installed.
pub fn init(config: &LogConfig) -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.filter))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true);

    match config.format {
        LogFormat::Pretty => builder.try_init(),
        LogFormat::Json => builder.json().try_init(),
    }
    .map_err(|e| anyhow::anyhow!("failed to install tracing subscriber: {e}"))
}

/// Standardized span constructors.
pub mod spans {
    use tracing::{Span, field, info_span};

    /// Create a span for a client connection.
    ///
    /// The `user` field starts empty and is recorded once registration
    /// succeeds.
    pub fn connection(session: &str, addr: &str) -> Span {
        info_span!("connection", session = %session, addr = %addr, user = field::Empty)
    }
}
