//! Connection - Handles an individual client connection.
//!
//! Each Connection runs in its own Tokio task:
//!
//! ```text
//! Phase 1: Registration (one line, optional deadline)
//!    ↓
//! Phase 2: Online loop (tokio::select!, biased)
//!    ┌──────────────────────────────────────────────┐
//!    │  close token ──► leave loop                  │
//!    │  outbound queue ──► Framed (write, flush)    │
//!    │  Framed (read) ──► dispatch ──► Router       │
//!    └──────────────────────────────────────────────┘
//!    ↓
//! Phase 3: Cleanup (release name, drain queue, shut down socket)
//! ```
//!
//! Every line this session receives after registration, including its own
//! error replies, passes through its outbound queue so output order matches
//! queue order.

mod dispatch;
mod event_loop;
mod handshake;

use crate::config::LimitsConfig;
use crate::error::ConnectionError;
use crate::handlers::Router;
use crate::state::{SessionId, SessionPhase};
use chitthi_proto::LineCodec;
use std::net::SocketAddr;
use tokio::net::TcpStream;
use tokio_util::codec::Framed;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

/// A client connection handler.
pub struct Connection {
    id: SessionId,
    addr: SocketAddr,
    framed: Framed<TcpStream, LineCodec>,
    router: Router,
    limits: LimitsConfig,
    shutdown: CancellationToken,
    phase: SessionPhase,
}

impl Connection {
    /// Wrap an accepted stream.
    ///
    /// Fails if the socket cannot be configured; nothing is registered in
    /// that case and the caller simply drops the stream.
    pub fn new(
        id: SessionId,
        stream: TcpStream,
        addr: SocketAddr,
        router: Router,
        limits: LimitsConfig,
        shutdown: CancellationToken,
    ) -> Result<Self, ConnectionError> {
        stream.set_nodelay(true).map_err(ConnectionError::Setup)?;
        let codec = LineCodec::with_max_len(limits.max_line_len);
        Ok(Self {
            id,
            addr,
            framed: Framed::new(stream, codec),
            router,
            limits,
            shutdown,
            phase: SessionPhase::Connected,
        })
    }

    fn transition(&mut self, next: SessionPhase) {
        if !self.phase.can_transition_to(next) {
            warn!(from = %self.phase, to = %next, "Unexpected session phase change");
        }
        debug!(from = %self.phase, to = %next, "Session phase");
        self.phase = next;
    }

    /// Drive the session from registration to close.
    pub async fn run(mut self) -> Result<(), ConnectionError> {
        self.transition(SessionPhase::Registering);

        let session = match self.register().await {
            Ok(Some(session)) => session,
            Ok(None) => {
                self.transition(SessionPhase::Closed);
                return Ok(());
            }
            Err(e) => {
                self.transition(SessionPhase::Closed);
                return Err(e);
            }
        };

        self.transition(SessionPhase::Online);
        let handshake::Session {
            name,
            handle,
            mut outbound,
            guard,
        } = session;

        let result = self.online_loop(&name, &handle, &mut outbound).await;
        match &result {
            Ok(exit) => info!(user = %name, reason = exit.as_str(), "Session closing"),
            Err(e) => debug!(user = %name, error = %e, "Session closing after error"),
        }

        self.transition(SessionPhase::Closing);
        drop(guard);
        drop(handle);
        if result.is_ok() {
            self.drain(&mut outbound).await;
        }
        self.transition(SessionPhase::Closed);

        result.map(|_| ())
    }
}

impl std::fmt::Debug for Connection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Connection")
            .field("id", &self.id)
            .field("addr", &self.addr)
            .field("phase", &self.phase)
            .finish()
    }
}
