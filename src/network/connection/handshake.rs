//! Registration: the first line a client sends is its username.

use super::Connection;
use crate::config::DuplicatePolicy;
use crate::error::{ConnectionError, RegistryError};
use crate::state::{OutboundQueue, Registry, SessionHandle, SessionId};
use chitthi_proto::{Frame, Reply, parse_username};
use futures_util::{SinkExt, StreamExt};
use std::sync::Arc;
use tracing::{Span, debug, info, warn};

/// A successfully registered session.
pub(super) struct Session {
    pub(super) name: String,
    pub(super) handle: SessionHandle,
    pub(super) outbound: OutboundQueue,
    pub(super) guard: RegistrationGuard,
}

/// Releases the registry entry when dropped.
///
/// Removal only succeeds while the entry still belongs to this session, so a
/// session displaced by a newer registration leaves its successor in place.
pub(super) struct RegistrationGuard {
    registry: Arc<Registry>,
    name: String,
    id: SessionId,
}

impl Drop for RegistrationGuard {
    fn drop(&mut self) {
        if self.registry.release(&self.name, self.id) {
            info!(user = %self.name, "User offline");
        } else {
            debug!(user = %self.name, "Name already held by a newer session");
        }
        crate::metrics::set_online_users(self.registry.len());
    }
}

/// What the registration line produced.
enum FirstLine {
    Name(String),
    Hangup,
}

impl Connection {
    /// Read the username line and claim it.
    ///
    /// Returns `Ok(None)` when the connection should close without ever
    /// having registered.
    pub(super) async fn register(&mut self) -> Result<Option<Session>, ConnectionError> {
        let name = match self.read_first_line().await? {
            FirstLine::Name(name) => name,
            FirstLine::Hangup => return Ok(None),
        };

        let closer = self.shutdown.child_token();
        let (handle, outbound) = SessionHandle::channel(self.id, closer);
        let registry = Arc::clone(self.router.registry());

        match registry.claim(&name, handle.clone()) {
            Ok(displaced) => {
                if let Some(previous) = displaced {
                    self.displace(&name, &previous, registry.policy());
                }
            }
            Err(RegistryError::NameInUse(name)) => {
                info!(user = %name, "Username already taken");
                self.framed
                    .send(Reply::NameInUse { name: &name }.to_string())
                    .await?;
                return Ok(None);
            }
        }

        crate::metrics::set_online_users(registry.len());
        Span::current().record("user", name.as_str());
        info!(user = %name, "User online");

        let guard = RegistrationGuard {
            registry,
            name: name.clone(),
            id: self.id,
        };
        Ok(Some(Session {
            name,
            handle,
            outbound,
            guard,
        }))
    }

    async fn read_first_line(&mut self) -> Result<FirstLine, ConnectionError> {
        let shutdown = self.shutdown.clone();
        let deadline = self.limits.registration_deadline();

        let frame = tokio::select! {
            biased;
            _ = shutdown.cancelled() => {
                debug!("Shutdown before registration");
                return Ok(FirstLine::Hangup);
            }
            frame = async {
                match deadline {
                    Some(limit) => tokio::time::timeout(limit, self.framed.next()).await.ok(),
                    None => Some(self.framed.next().await),
                }
            } => frame,
        };

        let Some(frame) = frame else {
            info!(addr = %self.addr, "Registration timed out");
            return Ok(FirstLine::Hangup);
        };

        match frame {
            None => {
                debug!("Client disconnected before registering");
                Ok(FirstLine::Hangup)
            }
            Some(Err(e)) => Err(e.into()),
            Some(Ok(Frame::Overlong { len })) => {
                warn!(len, "Overlong registration line");
                let max = self.framed.codec().max_len();
                self.framed.send(Reply::LineTooLong { max }.to_string()).await?;
                Ok(FirstLine::Hangup)
            }
            Some(Ok(Frame::Line(line))) => match parse_username(&line) {
                Some(name) => Ok(FirstLine::Name(name.to_string())),
                None => {
                    debug!("Empty username");
                    Ok(FirstLine::Hangup)
                }
            },
        }
    }

    /// Apply the duplicate policy to the session that just lost its name.
    fn displace(&self, name: &str, previous: &SessionHandle, policy: DuplicatePolicy) {
        match policy {
            DuplicatePolicy::Kick => {
                info!(user = %name, previous = %previous.id(), "Kicking previous session");
                if previous.send(Reply::Replaced { name }.to_string()).is_err() {
                    debug!(user = %name, "Previous session could not be told");
                }
                previous.close();
            }
            DuplicatePolicy::Replace => {
                info!(user = %name, previous = %previous.id(), "Name taken over by new session");
            }
            DuplicatePolicy::Reject => {}
        }
    }
}
