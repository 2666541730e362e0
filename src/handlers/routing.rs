//! Directed message routing.
//!
//! A directed message produces at most two lines:
//!
//! ```text
//! sender    <- [You] to [<recipient>]: <body>
//! recipient <- [Message from <sender>]: <body>
//! ```
//!
//! or, when the recipient is not registered (or its session has already
//! stopped reading), the sender receives
//! `ERROR: User <recipient> is not online.` after the echo.
//!
//! Session queues are unbounded, so routing never waits on another session's
//! socket and never drops a line that a live session would read.

use crate::state::{Registry, SessionHandle};
use chitthi_proto::Reply;
use std::sync::Arc;
use tracing::{debug, warn};

/// Outcome of routing one directed message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Delivery {
    /// The recipient's queue accepted the message.
    Delivered,
    /// No live session is registered under the recipient name.
    RecipientOffline,
    /// The sender is not registered; nothing was sent.
    SenderMissing,
}

impl Delivery {
    /// Static label for logs and metrics.
    pub fn as_str(self) -> &'static str {
        match self {
            Delivery::Delivered => "delivered",
            Delivery::RecipientOffline => "recipient_offline",
            Delivery::SenderMissing => "sender_missing",
        }
    }
}

/// Resolves recipients and queues reply lines.
#[derive(Debug, Clone)]
pub struct Router {
    registry: Arc<Registry>,
}

impl Router {
    pub fn new(registry: Arc<Registry>) -> Self {
        Self { registry }
    }

    pub fn registry(&self) -> &Arc<Registry> {
        &self.registry
    }

    /// Route `body` from the session registered as `sender` to `recipient`.
    pub fn deliver(&self, sender: &str, recipient: &str, body: &str) -> Delivery {
        let Some(from) = self.registry.lookup(sender) else {
            warn!(user = %sender, "Sender is not registered; message discarded");
            crate::metrics::record_routed(Delivery::SenderMissing.as_str());
            return Delivery::SenderMissing;
        };
        self.deliver_from(&from, sender, recipient, body)
    }

    /// Route a message whose sender handle is already known.
    ///
    /// Connections call this with their own handle so that the echo always
    /// reaches the session that typed the message, even after its name has
    /// been taken over by a newer registration.
    pub fn deliver_from(
        &self,
        from: &SessionHandle,
        sender: &str,
        recipient: &str,
        body: &str,
    ) -> Delivery {
        push(from, sender, Reply::Echo { recipient, body });

        let delivered = self
            .registry
            .lookup(recipient)
            .is_some_and(|to| push(&to, recipient, Reply::Incoming { sender, body }));

        let outcome = if delivered {
            Delivery::Delivered
        } else {
            push(from, sender, Reply::NotOnline { recipient });
            Delivery::RecipientOffline
        };

        debug!(from = %sender, to = %recipient, outcome = outcome.as_str(), "Routed message");
        crate::metrics::record_routed(outcome.as_str());
        outcome
    }
}

/// Queue a reply for `target`. A session that already stopped reading is
/// logged and reported as `false`.
fn push(target: &SessionHandle, name: &str, reply: Reply<'_>) -> bool {
    match target.send(reply.to_string()) {
        Ok(()) => true,
        Err(e) => {
            debug!(user = %name, session = %target.id(), error = %e, "Line not queued");
            false
        }
    }
}
