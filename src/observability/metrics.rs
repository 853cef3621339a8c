//! Metrics collection and exposition.
//!
//! # Metrics
//! - `presenter_requests_total` (counter): requests by method, status, domain
//! - `presenter_request_duration_seconds` (histogram): end-to-end latency
//!
//! # Design Decisions
//! - Labels are bounded: method, status code, presented domain
//! - The Prometheus exporter runs its own listener so the main router
//!   never exposes scrape data to the public side

use std::net::SocketAddr;
use std::time::Instant;

use metrics::{counter, histogram};
use metrics_exporter_prometheus::PrometheusBuilder;

/// Install the Prometheus recorder with an HTTP scrape listener.
///
/// Failure to bind is logged, not fatal. The gateway keeps serving pages
/// without metrics.
pub fn init(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics exporter listening"),
        Err(err) => tracing::warn!(address = %addr, error = %err, "Failed to start metrics exporter"),
    }
}

/// Record a completed request.
pub fn record_request(method: &str, status: u16, domain: &str, started: Instant) {
    let labels = [
        ("method", method.to_string()),
        ("status", status.to_string()),
        ("domain", domain.to_string()),
    ];
    counter!("presenter_requests_total", &labels).increment(1);
    histogram!("presenter_request_duration_seconds", &labels)
        .record(started.elapsed().as_secs_f64());
}
