//! Connection lifecycle states.
//!
//! ```text
//! ┌───────────┐   accept    ┌─────────────┐  name claimed  ┌────────┐
//! │ Connected ├────────────►│ Registering ├───────────────►│ Online │
//! └───────────┘             └──────┬──────┘                └───┬────┘
//!                                  │ empty name / EOF /        │ /exit / EOF /
//!                                  │ timeout / name in use     │ I/O error / kicked
//!                                  │                           ▼
//!                                  │                      ┌─────────┐
//!                                  │                      │ Closing │
//!                                  │                      └────┬────┘
//!                                  ▼                           ▼
//!                             ┌────────────────────────────────────┐
//!                             │               Closed               │
//!                             └────────────────────────────────────┘
//! ```

use std::fmt;

/// Phase of a single connection's session.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SessionPhase {
    /// Socket accepted, nothing read yet.
    #[default]
    Connected,
    /// Waiting for the username line.
    Registering,
    /// Name claimed in the registry; processing message lines.
    Online,
    /// Releasing the registry entry and flushing output.
    Closing,
    /// Terminal.
    Closed,
}

impl SessionPhase {
    /// Whether moving from `self` to `next` is a legal lifecycle step.
    pub fn can_transition_to(self, next: SessionPhase) -> bool {
        use SessionPhase::*;
        matches!(
            (self, next),
            (Connected, Registering)
                | (Connected, Closed)
                | (Registering, Online)
                | (Registering, Closed)
                | (Online, Closing)
                | (Closing, Closed)
        )
    }
}

impl fmt::Display for SessionPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SessionPhase::Connected => "connected",
            SessionPhase::Registering => "registering",
            SessionPhase::Online => "online",
            SessionPhase::Closing => "closing",
            SessionPhase::Closed => "closed",
        };
        f.write_str(name)
    }
}
