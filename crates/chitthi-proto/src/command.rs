//! Client-to-server line grammar.
//!
//! After registration every client line is one of:
//!
//! ```text
//! /exit
//! <recipient> <body>        (split on the first space only)
//! ```
//!
//! Anything else is malformed and answered with
//! [`Reply::BadFormat`](crate::Reply::BadFormat).

/// Literal line that ends a session.
pub const EXIT_COMMAND: &str = "/exit";

/// A parsed post-registration client line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command<'a> {
    /// Graceful disconnect request.
    Exit,
    /// Directed message. `body` may contain further spaces and may be empty.
    Direct {
        /// Username of the intended receiver.
        recipient: &'a str,
        /// Message text.
        body: &'a str,
    },
    /// Line with no space that is not `/exit`.
    Malformed,
}

impl<'a> Command<'a> {
    /// Parse one line (terminator already removed).
    pub fn parse(line: &'a str) -> Self {
        if line == EXIT_COMMAND {
            return Command::Exit;
        }
        match line.split_once(' ') {
            Some((recipient, body)) => Command::Direct { recipient, body },
            None => Command::Malformed,
        }
    }
}

/// Extract the username from a registration line.
///
/// Surrounding whitespace is trimmed; an empty or whitespace-only line yields
/// `None`.
pub fn parse_username(line: &str) -> Option<&str> {
    let name = line.trim();
    (!name.is_empty()).then_some(name)
}
