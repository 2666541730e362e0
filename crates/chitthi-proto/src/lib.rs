//! # chitthi-proto
//!
//! Wire protocol for the chitthi direct-message relay.
//!
//! The protocol is plain newline-delimited text:
//!
//! - The first client line is the username to register.
//! - Every later client line is either `/exit` or `<recipient> <body>`.
//! - The server answers with the fixed reply lines in [`Reply`].
//!
//! ## Quick Start
//!
//! ```rust
//! use chitthi_proto::{Command, Reply};
//!
//! let cmd = Command::parse("bob hello there");
//! assert_eq!(cmd, Command::Direct { recipient: "bob", body: "hello there" });
//!
//! let echo = Reply::Echo { recipient: "bob", body: "hello there" };
//! assert_eq!(echo.to_string(), "[You] to [bob]: hello there");
//! ```

#![deny(clippy::all)]
#![warn(missing_docs)]

pub mod command;
pub mod error;
#[cfg(feature = "tokio")]
pub mod line;
pub mod reply;

pub use command::{Command, EXIT_COMMAND, parse_username};
pub use error::{ProtocolError, Result};
#[cfg(feature = "tokio")]
pub use line::{DEFAULT_MAX_LINE_LEN, Frame, LineCodec};
pub use reply::Reply;
