//! Per-line handling once a session is online.

use super::Connection;
use crate::state::SessionHandle;
use chitthi_proto::{Command, Frame, Reply};
use tracing::debug;

/// Whether the online loop keeps going after a line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum Flow {
    Continue,
    Exit,
}

impl Connection {
    pub(super) fn dispatch(&self, name: &str, handle: &SessionHandle, frame: Frame) -> Flow {
        let line = match frame {
            Frame::Line(line) => line,
            Frame::Overlong { len } => {
                debug!(len, "Dropped overlong line");
                let max = self.framed.codec().max_len();
                reply(handle, Reply::LineTooLong { max });
                return Flow::Continue;
            }
        };

        match Command::parse(&line) {
            Command::Exit => Flow::Exit,
            Command::Direct { recipient, body } => {
                self.router.deliver_from(handle, name, recipient, body);
                Flow::Continue
            }
            Command::Malformed => {
                reply(handle, Reply::BadFormat);
                Flow::Continue
            }
        }
    }
}

/// Queue an error reply for this session itself.
fn reply(handle: &SessionHandle, reply: Reply<'_>) {
    if let Err(e) = handle.send(reply.to_string()) {
        debug!(error = %e, "Reply not queued");
    }
}
