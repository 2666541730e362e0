//! Server-to-client reply lines.

use std::fmt;

/// A line sent from the server to a client.
///
/// The `Display` impl produces the exact wire text without a terminator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reply<'a> {
    /// Confirmation to the sender of a message it just sent.
    Echo {
        /// Addressed recipient.
        recipient: &'a str,
        /// Message text.
        body: &'a str,
    },
    /// Delivery to the recipient.
    Incoming {
        /// Username of the sender.
        sender: &'a str,
        /// Message text.
        body: &'a str,
    },
    /// The addressed recipient is not registered.
    NotOnline {
        /// Addressed recipient.
        recipient: &'a str,
    },
    /// A post-registration line had no space and was not `/exit`.
    BadFormat,
    /// Registration refused because the name is held by another session.
    NameInUse {
        /// Requested username.
        name: &'a str,
    },
    /// This session was displaced by a newer registration of the same name.
    Replaced {
        /// The username that signed in elsewhere.
        name: &'a str,
    },
    /// An inbound line exceeded the configured limit and was dropped.
    LineTooLong {
        /// Configured maximum in bytes.
        max: usize,
    },
}

impl fmt::Display for Reply<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Reply::Echo { recipient, body } => write!(f, "[You] to [{recipient}]: {body}"),
            Reply::Incoming { sender, body } => write!(f, "[Message from {sender}]: {body}"),
            Reply::NotOnline { recipient } => {
                write!(f, "ERROR: User {recipient} is not online.")
            }
            Reply::BadFormat => f.write_str("ERROR: Private message format is [recipient] [message]"),
            Reply::NameInUse { name } => write!(f, "ERROR: Username {name} is already taken."),
            Reply::Replaced { name } => write!(
                f,
                "ERROR: You have been disconnected because {name} signed in elsewhere."
            ),
            Reply::LineTooLong { max } => write!(f, "ERROR: Line too long (max {max} bytes)."),
        }
    }
}
