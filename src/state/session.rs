//! Send-capable session handles.
//!
//! The registry never stores a connection. It stores a [`SessionHandle`]: the
//! sending half of the session's outbound queue plus a token that asks the
//! owning connection task to close. Dropping every handle does not end the
//! session; only the connection task decides when it is done.
//!
//! The queue is unbounded. Queueing never waits and never drops a line; the
//! only back-pressure is the owning connection's socket, which it writes in
//! queue order.

use std::fmt;
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use uuid::Uuid;

/// Unique identifier for one connection's session.
pub type SessionId = Uuid;

/// A line waiting in a session's outbound queue.
pub type OutboundLine = Arc<str>;

/// Receiving end of a session's outbound queue, owned by its connection.
pub type OutboundQueue = mpsc::UnboundedReceiver<OutboundLine>;

/// The session has stopped reading its queue; the line was not queued.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("session closed")]
pub struct SendError;

/// Cheap, cloneable reference to a live session.
#[derive(Clone)]
pub struct SessionHandle {
    id: SessionId,
    tx: mpsc::UnboundedSender<OutboundLine>,
    closer: CancellationToken,
}

impl SessionHandle {
    /// Create a handle together with the receiving end of its queue.
    pub fn channel(id: SessionId, closer: CancellationToken) -> (Self, OutboundQueue) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { id, tx, closer }, rx)
    }

    pub fn id(&self) -> SessionId {
        self.id
    }

    /// Queue one line for this session without waiting.
    pub fn send(&self, line: impl Into<OutboundLine>) -> Result<(), SendError> {
        self.tx.send(line.into()).map_err(|_| SendError)
    }

    /// Ask the owning connection to close.
    pub fn close(&self) {
        self.closer.cancel();
    }

    /// Resolves once [`close`](Self::close) has been called.
    pub async fn closed(&self) {
        self.closer.cancelled().await
    }

    /// Whether the session is closing or gone.
    pub fn is_closed(&self) -> bool {
        self.closer.is_cancelled() || self.tx.is_closed()
    }
}

impl fmt::Debug for SessionHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionHandle")
            .field("id", &self.id)
            .field("closed", &self.is_closed())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn handle(closer: CancellationToken) -> (SessionHandle, OutboundQueue) {
        SessionHandle::channel(Uuid::new_v4(), closer)
    }

    #[tokio::test]
    async fn send_queues_in_order() {
        let (handle, mut rx) = handle(CancellationToken::new());

        handle.send("first").unwrap();
        handle.send(String::from("second")).unwrap();

        assert_eq!(&*rx.recv().await.unwrap(), "first");
        assert_eq!(&*rx.recv().await.unwrap(), "second");
    }

    #[tokio::test]
    async fn send_never_drops_for_a_slow_reader() {
        let (handle, mut rx) = handle(CancellationToken::new());

        for i in 0..10_000 {
            handle.send(format!("line {i}")).unwrap();
        }

        for i in 0..10_000 {
            assert_eq!(rx.recv().await.unwrap().to_string(), format!("line {i}"));
        }
    }

    #[tokio::test]
    async fn send_reports_closed_queue() {
        let (handle, rx) = handle(CancellationToken::new());
        drop(rx);

        assert_eq!(handle.send("a"), Err(SendError));
        assert!(handle.is_closed());
    }

    #[tokio::test]
    async fn close_cancels_token() {
        let closer = CancellationToken::new();
        let (handle, _rx) = handle(closer.clone());

        assert!(!handle.is_closed());
        handle.clone().close();
        assert!(closer.is_cancelled());
        assert!(handle.is_closed());
    }
}
