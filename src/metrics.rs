//! Prometheus metrics for request and upstream latency tracking.
//!
//! This module provides:
//! - Per-endpoint request counters labelled by status code
//! - Upstream (connector) call latency
//! - Upstream failure counters

use std::time::Instant;

use metrics::{counter, describe_counter, describe_histogram, histogram};
use metrics_exporter_prometheus::{BuildError, PrometheusBuilder, PrometheusHandle};
use tracing::debug;

// === Metric Name Constants ===

/// HTTP requests counter metric name.
pub const METRIC_HTTP_REQUESTS: &str = "http_requests_total";
/// Upstream request latency metric name.
pub const METRIC_UPSTREAM_LATENCY: &str = "upstream_request_latency_ms";
/// Upstream failures counter metric name.
pub const METRIC_UPSTREAM_FAILURES: &str = "upstream_failures_total";
/// Products returned counter metric name.
pub const METRIC_PRODUCTS_RETURNED: &str = "search_products_returned_total";

/// Initialize all metric descriptions.
/// Call this once at startup to register metrics with descriptions.
pub fn init_metrics() {
    describe_counter!(
        METRIC_HTTP_REQUESTS,
        "Total number of HTTP requests by endpoint and status"
    );
    describe_histogram!(
        METRIC_UPSTREAM_LATENCY,
        "Connector request latency in milliseconds"
    );
    describe_counter!(
        METRIC_UPSTREAM_FAILURES,
        "Total number of failed connector requests"
    );
    describe_counter!(
        METRIC_PRODUCTS_RETURNED,
        "Total number of products returned by /search"
    );

    debug!("Metrics initialized");
}

/// Install the process-wide Prometheus recorder.
pub fn install_recorder() -> Result<PrometheusHandle, BuildError> {
    let handle = PrometheusBuilder::new().install_recorder()?;
    init_metrics();
    Ok(handle)
}

/// Count one handled request.
pub fn record_request(endpoint: &'static str, status: u16) {
    counter!(METRIC_HTTP_REQUESTS, "endpoint" => endpoint, "status" => status.to_string())
        .increment(1);
}

/// Record upstream latency for an operation.
pub fn record_upstream_latency(start: Instant, operation: &'static str) {
    let latency_ms = start.elapsed().as_secs_f64() * 1000.0;
    histogram!(METRIC_UPSTREAM_LATENCY, "operation" => operation).record(latency_ms);
}

/// Increment upstream failure counter.
pub fn inc_upstream_failures(operation: &'static str) {
    counter!(METRIC_UPSTREAM_FAILURES, "operation" => operation).increment(1);
}

/// Add to the products returned counter.
pub fn add_products_returned(count: usize) {
    counter!(METRIC_PRODUCTS_RETURNED).increment(count as u64);
}

/// RAII guard for timing upstream operations.
/// Automatically records latency when dropped.
pub struct LatencyTimer {
    start: Instant,
    operation: &'static str,
}

impl LatencyTimer {
    /// Create a new latency timer for the given operation.
    pub fn new(operation: &'static str) -> Self {
        Self {
            start: Instant::now(),
            operation,
        }
    }

    /// Get elapsed time in milliseconds (without recording).
    pub fn elapsed_ms(&self) -> f64 {
        self.start.elapsed().as_secs_f64() * 1000.0
    }
}

impl Drop for LatencyTimer {
    fn drop(&mut self) {
        record_upstream_latency(self.start, self.operation);
    }
}
