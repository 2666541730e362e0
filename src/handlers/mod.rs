//! Message handling.
//!
//! The [`Router`] resolves a recipient name through the registry and queues
//! the reply lines for every party involved in a directed message.

mod routing;

pub use routing::{Delivery, Router};
