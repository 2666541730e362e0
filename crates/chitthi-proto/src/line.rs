//! Line-based codec for tokio.
//!
//! This module provides a codec that reads/writes newline-terminated lines.
//! Incoming lines have their `\n` (and an optional preceding `\r`) removed and
//! are decoded as UTF-8, replacing invalid sequences. Outgoing lines are
//! terminated with a single `\n`.

use bytes::{Buf, BufMut, BytesMut};
use tokio_util::codec::{Decoder, Encoder};

use crate::error::{self, ProtocolError};

/// Default maximum line length in bytes, excluding the terminator.
pub const DEFAULT_MAX_LINE_LEN: usize = 4096;

/// A decoded inbound frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Frame {
    /// A complete line with its terminator removed.
    Line(String),
    /// A line longer than the codec limit. The bytes were discarded up to and
    /// including the next newline; `len` is the number of bytes dropped.
    Overlong {
        /// Number of content bytes discarded.
        len: usize,
    },
}

/// Line-based codec that handles newline-terminated messages.
///
/// Overlong lines do not terminate the stream: they are skipped and reported
/// as [`Frame::Overlong`] so the connection can answer and keep reading.
#[derive(Debug)]
pub struct LineCodec {
    /// Index of next byte to check for newline
    next_index: usize,
    /// Maximum line length
    max_len: usize,
    /// Bytes dropped so far while skipping an overlong line
    discarding: Option<usize>,
}

impl LineCodec {
    /// Create a new codec with the default line limit.
    pub fn new() -> Self {
        Self::with_max_len(DEFAULT_MAX_LINE_LEN)
    }

    /// Create a new codec with custom max line length.
    pub fn with_max_len(max_len: usize) -> Self {
        Self {
            next_index: 0,
            max_len,
            discarding: None,
        }
    }

    /// The configured maximum line length.
    pub fn max_len(&self) -> usize {
        self.max_len
    }

    fn finish_line(&self, raw: &[u8]) -> Frame {
        let content = raw.strip_suffix(b"\n").unwrap_or(raw);
        let content = content.strip_suffix(b"\r").unwrap_or(content);
        if content.len() > self.max_len {
            return Frame::Overlong { len: content.len() };
        }
        Frame::Line(String::from_utf8_lossy(content).into_owned())
    }
}

impl Default for LineCodec {
    fn default() -> Self {
        Self::new()
    }
}

impl Decoder for LineCodec {
    type Item = Frame;
    type Error = ProtocolError;

    fn decode(&mut self, src: &mut BytesMut) -> error::Result<Option<Frame>> {
        if let Some(dropped) = self.discarding {
            return match src.iter().position(|b| *b == b'\n') {
                Some(offset) => {
                    src.advance(offset + 1);
                    self.discarding = None;
                    self.next_index = 0;
                    Ok(Some(Frame::Overlong {
                        len: dropped + offset,
                    }))
                }
                None => {
                    self.discarding = Some(dropped + src.len());
                    src.clear();
                    Ok(None)
                }
            };
        }

        // Look for newline starting from where we left off
        if let Some(offset) = src[self.next_index..].iter().position(|b| *b == b'\n') {
            let line = src.split_to(self.next_index + offset + 1);
            self.next_index = 0;
            return Ok(Some(self.finish_line(&line)));
        }

        // One extra byte of slack for a trailing '\r' still waiting for its '\n'.
        if src.len() > self.max_len + 1 {
            self.discarding = Some(src.len());
            self.next_index = 0;
            src.clear();
            return Ok(None);
        }

        self.next_index = src.len();
        Ok(None)
    }

    fn decode_eof(&mut self, src: &mut BytesMut) -> error::Result<Option<Frame>> {
        if let Some(frame) = self.decode(src)? {
            return Ok(Some(frame));
        }

        if let Some(dropped) = self.discarding.take() {
            return Ok(Some(Frame::Overlong { len: dropped }));
        }

        // Unterminated final line
        if src.is_empty() {
            return Ok(None);
        }
        let rest = src.split_to(src.len());
        self.next_index = 0;
        Ok(Some(self.finish_line(&rest)))
    }
}

impl<T: AsRef<str>> Encoder<T> for LineCodec {
    type Error = ProtocolError;

    fn encode(&mut self, line: T, dst: &mut BytesMut) -> error::Result<()> {
        let line = line.as_ref();
        if line.contains('\n') {
            return Err(ProtocolError::EmbeddedNewline);
        }
        dst.reserve(line.len() + 1);
        dst.put_slice(line.as_bytes());
        dst.put_u8(b'\n');
        Ok(())
    }
}
