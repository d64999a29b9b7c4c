//! Metrics collection and exposition.
//!
//! # Metrics
//! - `proxy_requests_total` (counter): requests by endpoint, method, status
//! - `proxy_request_duration_seconds` (histogram): latency by endpoint, method
//! - `proxy_upstream_errors_total` (counter): unreachable upstreams by endpoint
//!
//! # Design Decisions
//! - Recording is a no-op until an exporter is installed
//! - Labels never carry paths or query values (cardinality, credential)

use std::net::SocketAddr;
use std::time::Instant;

use metrics::{counter, histogram};
use metrics_exporter_prometheus::{BuildError, PrometheusBuilder};

/// Install the Prometheus exporter with its own HTTP listener.
pub fn init_metrics(addr: SocketAddr) -> Result<(), BuildError> {
    PrometheusBuilder::new().with_http_listener(addr).install()?;
    tracing::info!(address = %addr, "Metrics exporter listening");
    Ok(())
}

/// Record one finished request.
pub fn record_request(endpoint: &str, method: &str, status: u16, start: Instant) {
    counter!(
        "proxy_requests_total",
        "endpoint" => endpoint.to_string(),
        "method" => method.to_string(),
        "status" => status.to_string()
    )
    .increment(1);

    histogram!(
        "proxy_request_duration_seconds",
        "endpoint" => endpoint.to_string(),
        "method" => method.to_string()
    )
    .record(start.elapsed().as_secs_f64());
}

/// Record an upstream that could not be reached.
pub fn record_upstream_error(endpoint: &str) {
    counter!("proxy_upstream_errors_total", "endpoint" => endpoint.to_string()).increment(1);
}
