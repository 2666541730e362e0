//! chitthi server binary.

use chitthi::config::{self, Config};
use chitthi::network::Gateway;
use chitthi::state::Registry;
use chitthi::{http, metrics, telemetry};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};

const DEFAULT_CONFIG_PATH: &str = "chitthi.toml";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load configuration. An explicit path must exist; the default may not.
    let config = match std::env::args().nth(1) {
        Some(path) => Config::load(&path)?,
        None => Config::load_or_default(DEFAULT_CONFIG_PATH)?,
    };

    telemetry::init(&config.log)?;

    if let Err(problems) = config::validate(&config) {
        for problem in &problems {
            error!(error = %problem, "Invalid configuration");
        }
        anyhow::bail!("configuration has {} error(s)", problems.len());
    }

    info!(
        server = %config.server.name,
        address = %config.listen.address,
        policy = ?config.registry.duplicate_policy,
        "Starting chitthi"
    );

    let shutdown = CancellationToken::new();

    // Convention: metrics_port = 0 disables the HTTP endpoint (used by tests).
    let metrics_port = config.server.metrics_port;
    if metrics_port == 0 {
        info!("Metrics disabled");
    } else {
        metrics::init();
        tokio::spawn(http::run_http_server(metrics_port, shutdown.clone()));
        info!(port = metrics_port, "Prometheus HTTP server started");
    }

    let registry = Arc::new(Registry::new(config.registry.duplicate_policy));

    let gateway = Gateway::bind(
        &config.listen,
        config.limits.clone(),
        Arc::clone(&registry),
        shutdown.clone(),
    )
    .await
    .inspect_err(|e| error!(error = %e, "Failed to start listener"))?;

    {
        let shutdown = shutdown.clone();
        tokio::spawn(async move {
            if let Err(e) = tokio::signal::ctrl_c().await {
                warn!(error = %e, "Failed to listen for ctrl-c");
                return;
            }
            info!("Shutdown requested");
            shutdown.cancel();
        });
    }

    gateway.run().await?;

    info!("Server stopped");
    Ok(())
}
