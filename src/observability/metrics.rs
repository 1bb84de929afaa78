//! Metrics collection and exposition.
//!
//! # Metrics
//! - `proxy_requests_total` (counter): requests by method, status, route
//! - `proxy_request_duration_seconds` (histogram): latency distribution
//! - `proxy_cache_hits_total` / `proxy_cache_misses_total` (counters)
//! - `proxy_cache_entries` (gauge): current response cache size
//! - `proxy_rate_limited_total` (counter): rejected requests by client
//! - `proxy_upstream_errors_total` (counter): upstream non-2xx answers

use std::net::SocketAddr;
use std::time::Instant;

use metrics_exporter_prometheus::PrometheusBuilder;

/// Install the Prometheus exporter and its scrape endpoint.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics endpoint started"),
        Err(e) => tracing::error!(error = %e, "Failed to install metrics exporter"),
    }
}

/// Record one completed request.
pub fn record_request(method: &str, status: u16, route: &str, start_time: Instant) {
    metrics::counter!(
        "proxy_requests_total",
        "method" => method.to_string(),
        "status" => status.to_string(),
        "route" => route.to_string(),
    )
    .increment(1);
    metrics::histogram!(
        "proxy_request_duration_seconds",
        "method" => method.to_string(),
        "route" => route.to_string(),
    )
    .record(start_time.elapsed().as_secs_f64());
}

/// Record a response served from the cache.
pub fn record_cache_hit() {
    metrics::counter!("proxy_cache_hits_total").increment(1);
}

/// Record a response that had to be fetched.
pub fn record_cache_miss() {
    metrics::counter!("proxy_cache_misses_total").increment(1);
}

/// Track the response cache size.
pub fn record_cache_size(size: usize) {
    metrics::gauge!("proxy_cache_entries").set(size as f64);
}

/// Record a rate-limited request.
pub fn record_rate_limited(client: &str) {
    metrics::counter!("proxy_rate_limited_total", "client" => client.to_string()).increment(1);
}

/// Record an upstream non-2xx answer.
pub fn record_upstream_error(status: u16) {
    metrics::counter!("proxy_upstream_errors_total", "status" => status.to_string()).increment(1);
}
