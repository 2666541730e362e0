//! The online loop and the final drain.

use super::Connection;
use super::dispatch::Flow;
use crate::error::ConnectionError;
use crate::state::{OutboundLine, OutboundQueue, SessionHandle};
use chitthi_proto::{Frame, ProtocolError};
use futures_util::{SinkExt, StreamExt};
use std::time::Duration;
use tokio::io::AsyncWriteExt;
use tracing::{debug, warn};

/// Upper bound on flushing queued lines once a session is closing.
const DRAIN_TIMEOUT: Duration = Duration::from_secs(2);

/// Why the online loop ended without an I/O error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum LoopExit {
    /// The client sent `/exit`.
    Exit,
    /// The client closed its side of the stream.
    EndOfStream,
    /// The session's close token fired (kicked by a newer registration).
    Closed,
    /// The server is shutting down.
    Shutdown,
}

impl LoopExit {
    pub(super) fn as_str(self) -> &'static str {
        match self {
            LoopExit::Exit => "exit",
            LoopExit::EndOfStream => "end_of_stream",
            LoopExit::Closed => "closed",
            LoopExit::Shutdown => "shutdown",
        }
    }
}

enum Step {
    Close,
    Write(OutboundLine),
    Read(Frame),
    EndOfStream,
}

impl Connection {
    pub(super) async fn online_loop(
        &mut self,
        name: &str,
        handle: &SessionHandle,
        outbound: &mut OutboundQueue,
    ) -> Result<LoopExit, ConnectionError> {
        loop {
            let step = tokio::select! {
                biased;
                _ = handle.closed() => Step::Close,
                Some(line) = outbound.recv() => Step::Write(line),
                frame = self.framed.next() => match frame {
                    Some(Ok(frame)) => Step::Read(frame),
                    Some(Err(e)) => return Err(e.into()),
                    None => Step::EndOfStream,
                },
            };

            match step {
                Step::Close if self.shutdown.is_cancelled() => return Ok(LoopExit::Shutdown),
                Step::Close => return Ok(LoopExit::Closed),
                Step::EndOfStream => return Ok(LoopExit::EndOfStream),
                Step::Write(line) => self.write_batch(line, outbound).await?,
                Step::Read(frame) => {
                    if self.dispatch(name, handle, frame) == Flow::Exit {
                        return Ok(LoopExit::Exit);
                    }
                }
            }
        }
    }

    /// Write `first` plus whatever else is already queued, then flush once.
    async fn write_batch(
        &mut self,
        first: OutboundLine,
        outbound: &mut OutboundQueue,
    ) -> Result<(), ConnectionError> {
        self.framed.feed(first).await?;
        while let Ok(line) = outbound.try_recv() {
            self.framed.feed(line).await?;
        }
        SinkExt::<OutboundLine>::flush(&mut self.framed).await?;
        Ok(())
    }

    /// Write out lines still queued, then shut down the write half.
    ///
    /// The queue is closed first so nothing new can arrive. Bounded by
    /// [`DRAIN_TIMEOUT`] so a client that stopped reading cannot hold the
    /// task open.
    pub(super) async fn drain(&mut self, outbound: &mut OutboundQueue) {
        outbound.close();
        let flush = async {
            while let Some(line) = outbound.recv().await {
                self.framed.feed(line).await?;
            }
            SinkExt::<OutboundLine>::flush(&mut self.framed).await?;
            self.framed
                .get_mut()
                .shutdown()
                .await
                .map_err(ProtocolError::from)?;
            Ok::<_, ConnectionError>(())
        };

        match tokio::time::timeout(DRAIN_TIMEOUT, flush).await {
            Ok(Ok(())) => {}
            Ok(Err(e)) => debug!(error = %e, "Drain failed"),
            Err(_) => warn!("Timed out flushing queued lines"),
        }
    }
}
