//! Configuration loading and management.
//!
//! This module is split into logical submodules:
//! - [`types`]: Core config struct definitions (Config, ServerConfig, LogConfig)
//! - [`listen`]: Network listener configuration (ListenConfig)
//! - [`limits`]: Per-connection limits (LimitsConfig)
//! - [`registry`]: Username registry policy (RegistryConfig, DuplicatePolicy)
//! - [`validation`]: Startup validation of a loaded config

mod defaults;
mod limits;
mod listen;
mod registry;
mod types;
mod validation;

pub use limits::LimitsConfig;
pub use listen::ListenConfig;
pub use registry::{DuplicatePolicy, RegistryConfig};
pub use types::{Config, ConfigError, LogConfig, LogFormat, ServerConfig};
pub use validation::{ValidationError, validate};
