//! Prometheus metrics collection for chitthi.
//!
//! Metrics live in `OnceLock` statics and are only recorded after [`init`]
//! has run, so tests and deployments with metrics disabled pay nothing.
//!
//! - `chitthi_connections_total` - Accepted TCP connections
//! - `chitthi_online_users` - Currently registered usernames
//! - `chitthi_messages_routed_total{outcome}` - Directed messages by routing outcome

use prometheus::{Encoder, IntCounter, IntCounterVec, IntGauge, Opts, Registry, TextEncoder};
use std::sync::OnceLock;

/// Global Prometheus registry for all metrics.
pub static REGISTRY: OnceLock<Registry> = OnceLock::new();

pub fn registry() -> &'static Registry {
    REGISTRY.get_or_init(Registry::new)
}

/// Total accepted connections.
pub static CONNECTIONS_TOTAL: OnceLock<IntCounter> = OnceLock::new();

/// Currently registered users.
pub static ONLINE_USERS: OnceLock<IntGauge> = OnceLock::new();

/// Directed messages by routing outcome.
pub static MESSAGES_ROUTED: OnceLock<IntCounterVec> = OnceLock::new();

/// Initialize the Prometheus metrics registry.
///
/// Must be called once at server startup before any metrics are recorded.
pub fn init() {
    let r = registry();

    macro_rules! register {
        ($metric:ident, $init:expr) => {
            match $init {
                Ok(m) => {
                    if let Err(e) = r.register(Box::new(m.clone())) {
                        tracing::warn!(error = %e, concat!("Failed to register metric ", stringify!($metric)));
                    }
                    let _ = $metric.set(m);
                }
                Err(e) => {
                    tracing::error!(error = %e, concat!("Failed to create metric ", stringify!($metric)));
                }
            }
        };
    }

    register!(CONNECTIONS_TOTAL, IntCounter::new("chitthi_connections_total", "Accepted connections"));
    register!(ONLINE_USERS, IntGauge::new("chitthi_online_users", "Currently registered users"));
    register!(MESSAGES_ROUTED, IntCounterVec::new(Opts::new("chitthi_messages_routed_total", "Directed messages by routing outcome"), &["outcome"]));
}

/// Gather all metrics and encode them in Prometheus text format.
pub fn gather_metrics() -> String {
    let encoder = TextEncoder::new();
    let metric_families = registry().gather();
    let mut buffer = vec![];
    if let Err(e) = encoder.encode(&metric_families, &mut buffer) {
        tracing::error!(error = %e, "Failed to encode Prometheus metrics");
        return String::new();
    }
    match String::from_utf8(buffer) {
        Ok(s) => s,
        Err(e) => {
            tracing::error!(error = %e, "Prometheus metrics were not valid UTF-8");
            String::new()
        }
    }
}

// ============================================================================
// Helper functions for metric updates
// ============================================================================

pub fn record_connection() {
    if let Some(m) = CONNECTIONS_TOTAL.get() {
        m.inc();
    }
}

/// Track the registry size. Set rather than inc/dec so displaced and
/// reclaimed names cannot skew the gauge.
pub fn set_online_users(count: usize) {
    if let Some(m) = ONLINE_USERS.get() {
        m.set(i64::try_from(count).unwrap_or(i64::MAX));
    }
}

pub fn record_routed(outcome: &str) {
    if let Some(m) = MESSAGES_ROUTED.get() {
        m.with_label_values(&[outcome]).inc();
    }
}
