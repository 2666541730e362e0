//! Network listener configuration.

use super::defaults::default_listen_address;
use serde::Deserialize;
use std::net::SocketAddr;

/// Network listener configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ListenConfig {
    /// Address to bind to (e.g., "0.0.0.0:8888"). Port 0 picks an ephemeral port.
    #[serde(default = "default_listen_address")]
    pub address: SocketAddr,
}

impl Default for ListenConfig {
    fn default() -> Self {
        Self {
            address: default_listen_address(),
        }
    }
}

impl ListenConfig {
    /// Listen on the given port on all interfaces.
    pub fn with_port(port: u16) -> Self {
        let mut address = default_listen_address();
        address.set_port(port);
        Self { address }
    }
}
