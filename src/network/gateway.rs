//! Gateway - TCP listener that accepts incoming connections.
//!
//! The Gateway binds a socket and spawns one Connection task per client.
//! Accept failures are logged and never stop the loop; only the shutdown
//! token does.

use crate::config::{LimitsConfig, ListenConfig};
use crate::handlers::Router;
use crate::network::Connection;
use crate::state::Registry;
use crate::telemetry::spans;
use anyhow::Context as _;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::{TcpListener, TcpStream};
use tokio_util::sync::CancellationToken;
use tokio_util::task::TaskTracker;
use tracing::{Instrument, debug, error, info, instrument, warn};
use uuid::Uuid;

/// Pause after a failed accept, e.g. when the process is out of descriptors.
const ACCEPT_BACKOFF: Duration = Duration::from_millis(100);

/// The Gateway accepts incoming TCP connections and spawns handlers.
pub struct Gateway {
    listener: TcpListener,
    router: Router,
    limits: LimitsConfig,
    shutdown: CancellationToken,
    tasks: TaskTracker,
}

impl Gateway {
    /// Bind the gateway to the configured address.
    pub async fn bind(
        listen: &ListenConfig,
        limits: LimitsConfig,
        registry: Arc<Registry>,
        shutdown: CancellationToken,
    ) -> anyhow::Result<Self> {
        let listener = TcpListener::bind(listen.address)
            .await
            .with_context(|| format!("failed to bind {}", listen.address))?;
        info!(address = %listener.local_addr()?, "Listener bound");

        Ok(Self {
            listener,
            router: Router::new(registry),
            limits,
            shutdown,
            tasks: TaskTracker::new(),
        })
    }

    /// The bound address. Useful when binding to port 0.
    pub fn local_addr(&self) -> std::io::Result<SocketAddr> {
        self.listener.local_addr()
    }

    /// Accept connections until the shutdown token fires, then wait for
    /// every session to finish.
    #[instrument(skip_all, name = "gateway")]
    pub async fn run(self) -> anyhow::Result<()> {
        loop {
            tokio::select! {
                biased;
                _ = self.shutdown.cancelled() => break,
                accepted = self.listener.accept() => match accepted {
                    Ok((stream, addr)) => self.spawn(stream, addr),
                    Err(e) => {
                        error!(error = %e, "Failed to accept connection");
                        tokio::time::sleep(ACCEPT_BACKOFF).await;
                    }
                },
            }
        }

        drop(self.listener);
        self.tasks.close();
        info!(active = self.tasks.len(), "Listener closed; waiting for sessions");
        self.tasks.wait().await;
        info!("All sessions closed");
        Ok(())
    }

    fn spawn(&self, stream: TcpStream, addr: SocketAddr) {
        crate::metrics::record_connection();
        let id = Uuid::new_v4();
        info!(%addr, session = %id, "Connection accepted");

        let connection = match Connection::new(
            id,
            stream,
            addr,
            self.router.clone(),
            self.limits.clone(),
            self.shutdown.clone(),
        ) {
            Ok(connection) => connection,
            Err(e) => {
                warn!(%addr, error = %e, "Dropping connection");
                return;
            }
        };

        let span = spans::connection(&id.to_string(), &addr.to_string());
        self.tasks.spawn(
            async move {
                match connection.run().await {
                    Ok(()) => {}
                    Err(e) if e.is_disconnect() => debug!(error = %e, "Peer went away"),
                    Err(e) => error!(code = e.error_code(), error = %e, "Connection error"),
                }
                info!("Connection closed");
            }
            .instrument(span),
        );
    }
}
