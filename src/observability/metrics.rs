//! Metrics collection and exposition.
//!
//! # Metrics
//! - `http_requests_total` (counter): requests by method, route, status
//! - `http_request_latency_ms` (histogram): handler latency
//! - `webhook_verifications_total` (counter): signature checks by outcome
//! - `outbound_requests_total` (counter): requester calls by outcome
//!
//! Without an installed recorder every call is a no-op.

use metrics::{counter, histogram};
use metrics_exporter_prometheus::{BuildError, PrometheusBuilder, PrometheusHandle};
use std::time::Instant;

/// Install the Prometheus recorder and return the render handle.
pub fn init_metrics() -> Result<PrometheusHandle, BuildError> {
    let handle = PrometheusBuilder::new().install_recorder()?;
    tracing::info!("Prometheus recorder installed");
    Ok(handle)
}

pub fn record_request(method: &str, route: &str, status: u16, start: Instant) {
    counter!(
        "http_requests_total",
        "method" => method.to_string(),
        "route" => route.to_string(),
        "status" => status.to_string()
    )
    .increment(1);
    histogram!("http_request_latency_ms", "route" => route.to_string())
        .record(start.elapsed().as_secs_f64() * 1000.0);
}

pub fn record_webhook(outcome: &'static str) {
    counter!("webhook_verifications_total", "outcome" => outcome).increment(1);
}

pub fn record_outbound(outcome: &'static str) {
    counter!("outbound_requests_total", "outcome" => outcome).increment(1);
}
