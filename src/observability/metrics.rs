//! Metrics collection and exposition.
//!
//! # Metrics
//! - `redirect_requests_total` (counter): redirects by host, status
//! - `redirect_decision_duration_seconds` (histogram): decision latency
//! - `redirect_unknown_host_total` (counter): requests with no matching rule
//! - `redirect_config_reloads_total` (counter): reloads by result
//!
//! Without an installed recorder every call is a no-op, so the library and
//! its tests can record freely.

use std::net::SocketAddr;
use std::time::Instant;

use metrics::{counter, histogram};
use metrics_exporter_prometheus::PrometheusBuilder;

/// Install the Prometheus recorder and its scrape endpoint.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics exporter started"),
        Err(e) => tracing::error!(error = %e, "Failed to install metrics exporter"),
    }
}

pub fn record_redirect(host: &str, status: u16, start: Instant) {
    counter!(
        "redirect_requests_total",
        "host" => host.to_ascii_lowercase(),
        "status" => status.to_string()
    )
    .increment(1);
    histogram!("redirect_decision_duration_seconds").record(start.elapsed().as_secs_f64());
}

pub fn record_unknown_host() {
    counter!("redirect_unknown_host_total").increment(1);
}

pub fn record_config_reload(success: bool) {
    let result = if success { "ok" } else { "rejected" };
    counter!("redirect_config_reloads_total", "result" => result).increment(1);
}
