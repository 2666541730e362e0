//! Test server management.
//!
//! Runs a chitthi gateway inside the test's runtime, bound to `127.0.0.1:0`.

use super::client::TestClient;
use chitthi::config::{DuplicatePolicy, LimitsConfig, ListenConfig};
use chitthi::network::Gateway;
use chitthi::state::Registry;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::{Instant, sleep};
use tokio_util::sync::CancellationToken;

/// A test server instance.
pub struct TestServer {
    address: String,
    registry: Arc<Registry>,
    shutdown: CancellationToken,
    task: Option<JoinHandle<anyhow::Result<()>>>,
}

#[allow(dead_code)]
impl TestServer {
    /// Spawn a server with default limits and the given duplicate policy.
    pub async fn spawn(policy: DuplicatePolicy) -> anyhow::Result<Self> {
        Self::spawn_with(policy, LimitsConfig::default()).await
    }

    /// Spawn a server with explicit limits.
    pub async fn spawn_with(policy: DuplicatePolicy, limits: LimitsConfig) -> anyhow::Result<Self> {
        let registry = Arc::new(Registry::new(policy));
        let shutdown = CancellationToken::new();
        let listen = ListenConfig {
            address: SocketAddr::from(([127, 0, 0, 1], 0)),
        };

        let gateway = Gateway::bind(&listen, limits, Arc::clone(&registry), shutdown.clone()).await?;
        let address = gateway.local_addr()?.to_string();
        let task = tokio::spawn(gateway.run());

        Ok(Self {
            address,
            registry,
            shutdown,
            task: Some(task),
        })
    }

    /// Get the server address.
    pub fn address(&self) -> &str {
        &self.address
    }

    pub fn registry(&self) -> &Arc<Registry> {
        &self.registry
    }

    /// Wait until `predicate` holds for the registry, or fail after 5s.
    pub async fn wait_for<F>(&self, mut predicate: F) -> anyhow::Result<()>
    where
        F: FnMut(&Registry) -> bool,
    {
        let deadline = Instant::now() + Duration::from_secs(5);
        while !predicate(&self.registry) {
            if Instant::now() >= deadline {
                anyhow::bail!("condition not reached; online: {:?}", self.registry.names());
            }
            sleep(Duration::from_millis(5)).await;
        }
        Ok(())
    }

    /// Connect and register as `name`, returning once the name is online.
    pub async fn login(&self, name: &str) -> anyhow::Result<TestClient> {
        let mut client = TestClient::connect(&self.address).await?;
        client.send_line(name).await?;
        let name = name.trim();
        self.wait_for(|registry| registry.contains(name)).await?;
        Ok(client)
    }

    /// Cancel the root token and wait for the gateway to finish.
    pub async fn shutdown(mut self) -> anyhow::Result<()> {
        self.shutdown.cancel();
        if let Some(task) = self.task.take() {
            tokio::time::timeout(Duration::from_secs(5), task).await???;
        }
        Ok(())
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.shutdown.cancel();
    }
}
