//! State management module.
//!
//! Contains the username [`Registry`], the session handles it stores, and the
//! per-connection lifecycle phases.

mod machine;
mod registry;
mod session;

pub use machine::SessionPhase;
pub use registry::Registry;
pub use session::{OutboundLine, OutboundQueue, SendError, SessionHandle, SessionId};
