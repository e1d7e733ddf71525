//! Metrics collection and exposition.
//!
//! # Metrics
//! - `form_handlers_requests_total` (counter): requests by route, method, status
//! - `form_handlers_request_duration_seconds` (histogram): latency by route
//! - `form_handlers_uploads_total` (counter): upload attempts by outcome
//! - `form_handlers_posts_total` (counter): outbound form posts by outcome
//!
//! # Design Decisions
//! - Recording is a no-op until a recorder is installed
//! - Prometheus exposition only when enabled in config

use std::net::SocketAddr;
use std::time::Instant;

use metrics_exporter_prometheus::{BuildError, PrometheusBuilder};

/// Install the Prometheus recorder and its scrape listener.
pub fn init_metrics(addr: SocketAddr) -> Result<(), BuildError> {
    PrometheusBuilder::new().with_http_listener(addr).install()?;
    tracing::info!(address = %addr, "Metrics endpoint listening");
    Ok(())
}

/// Record one handled request.
pub fn record_request(route: &str, method: &str, status: u16, start: Instant) {
    ::metrics::counter!(
        "form_handlers_requests_total",
        "route" => route.to_string(),
        "method" => method.to_string(),
        "status" => status.to_string()
    )
    .increment(1);
    ::metrics::histogram!(
        "form_handlers_request_duration_seconds",
        "route" => route.to_string()
    )
    .record(start.elapsed().as_secs_f64());
}

/// Record the outcome of an upload attempt.
pub fn record_upload(outcome: &'static str) {
    ::metrics::counter!("form_handlers_uploads_total", "outcome" => outcome).increment(1);
}

/// Record the outcome of an outbound form post.
pub fn record_post(outcome: &'static str) {
    ::metrics::counter!("form_handlers_posts_total", "outcome" => outcome).increment(1);
}
