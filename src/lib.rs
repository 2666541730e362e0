//! chitthi - a line-oriented direct-message relay.
//!
//! Clients connect over TCP, send a username as their first line, and then
//! address each other with `<recipient> <body>` lines. The server keeps no
//! history: a message is routed to whoever is online under that name, or the
//! sender is told the recipient is not online.

pub mod config;
pub mod error;
pub mod handlers;
pub mod http;
pub mod metrics;
pub mod network;
pub mod state;
pub mod telemetry;
