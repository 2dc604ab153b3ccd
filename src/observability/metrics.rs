//! Metrics collection and exposition.
//!
//! # Metrics
//! - `relay_requests_total` (counter): inbound requests by outcome
//! - `relay_attempts_total` (counter): upstream attempts by strategy and result
//! - `relay_request_duration_seconds` (histogram): end-to-end latency
//!
//! # Design Decisions
//! - Recording goes through the `metrics` facade and is a no-op until an exporter is installed
//! - Labels stay low-cardinality: never the target URL

use std::net::SocketAddr;
use std::time::Instant;

use metrics_exporter_prometheus::{BuildError, PrometheusBuilder};

/// Install the Prometheus exporter with its own HTTP listener.
///
/// Must be called from within a Tokio runtime.
pub fn init_metrics(addr: SocketAddr) -> Result<(), BuildError> {
    PrometheusBuilder::new().with_http_listener(addr).install()?;
    tracing::info!(address = %addr, "Metrics exporter listening");
    Ok(())
}

/// Record a finished inbound relay request.
pub fn record_request(outcome: &'static str, start: Instant) {
    ::metrics::counter!("relay_requests_total", "outcome" => outcome).increment(1);
    ::metrics::histogram!("relay_request_duration_seconds").record(start.elapsed().as_secs_f64());
}

/// Record one upstream attempt.
pub fn record_attempt(strategy: &'static str, success: bool) {
    let result = if success { "success" } else { "failure" };
    ::metrics::counter!("relay_attempts_total", "strategy" => strategy, "result" => result)
        .increment(1);
}
