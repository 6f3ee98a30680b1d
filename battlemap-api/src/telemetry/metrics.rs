//! Prometheus Metrics Definitions
//!
//! Defines all BATTLEMAP metrics with appropriate labels and types.
//! Exposes a /metrics endpoint for Prometheus scraping.

use axum::{http::StatusCode, response::IntoResponse};
use once_cell::sync::Lazy;
use prometheus::{
    register_counter_vec, register_histogram_vec, CounterVec, Encoder, HistogramVec, TextEncoder,
};

use crate::error::{ApiError, ApiResult};

/// HTTP request latency buckets (seconds)
/// Covers: 1ms, 5ms, 10ms, 25ms, 50ms, 100ms, 250ms, 500ms, 1s, 2.5s, 5s, 10s
const HTTP_LATENCY_BUCKETS: &[f64] = &[
    0.001, 0.005, 0.010, 0.025, 0.050, 0.100, 0.250, 0.500, 1.0, 2.5, 5.0, 10.0,
];

/// Global metrics instance - initialized once on first use
pub static METRICS: Lazy<ApiResult<BattlemapMetrics>> = Lazy::new(BattlemapMetrics::new);

/// Container for all BATTLEMAP metrics.
#[derive(Clone)]
pub struct BattlemapMetrics {
    /// HTTP request counter - labels: method, path, status
    pub http_requests_total: CounterVec,

    /// HTTP request duration histogram - labels: method, path
    pub http_request_duration_seconds: HistogramVec,

    /// Response cache reads - labels: namespace, result (hit/miss)
    pub cache_reads_total: CounterVec,

    /// Enrichment source attempts - labels: source, outcome
    pub enrichment_sources_total: CounterVec,
}

impl BattlemapMetrics {
    /// Create and register all metrics with Prometheus.
    pub fn new() -> ApiResult<Self> {
        Ok(Self {
            http_requests_total: register_counter_vec!(
                "battlemap_http_requests_total",
                "Total number of HTTP requests",
                &["method", "path", "status"]
            )
            .map_err(|e| ApiError::internal_error(format!("Failed to register http_requests_total: {}", e)))?,

            http_request_duration_seconds: register_histogram_vec!(
                "battlemap_http_request_duration_seconds",
                "HTTP request duration in seconds",
                &["method", "path"],
                HTTP_LATENCY_BUCKETS.to_vec()
            )
            .map_err(|e| ApiError::internal_error(format!("Failed to register http_request_duration_seconds: {}", e)))?,

            cache_reads_total: register_counter_vec!(
                "battlemap_cache_reads_total",
                "Response cache reads by namespace and result",
                &["namespace", "result"]
            )
            .map_err(|e| ApiError::internal_error(format!("Failed to register cache_reads_total: {}", e)))?,

            enrichment_sources_total: register_counter_vec!(
                "battlemap_enrichment_sources_total",
                "Enrichment content source attempts by outcome",
                &["source", "outcome"]
            )
            .map_err(|e| ApiError::internal_error(format!("Failed to register enrichment_sources_total: {}", e)))?,
        })
    }

    /// Record an HTTP request.
    pub fn record_http_request(&self, method: &str, path: &str, status: u16, duration_secs: f64) {
        let status_str = status.to_string();
        self.http_requests_total
            .with_label_values(&[method, path, status_str.as_str()])
            .inc();
        self.http_request_duration_seconds
            .with_label_values(&[method, path])
            .observe(duration_secs);
    }

    /// Record a cache read.
    pub fn record_cache_read(&self, namespace: &str, hit: bool) {
        let result = if hit { "hit" } else { "miss" };
        self.cache_reads_total
            .with_label_values(&[namespace, result])
            .inc();
    }

    /// Record one content source attempt.
    pub fn record_enrichment_source(&self, source: &str, outcome: &str) {
        self.enrichment_sources_total
            .with_label_values(&[source, outcome])
            .inc();
    }
}

/// Handler for GET /metrics endpoint.
///
/// Returns Prometheus text format metrics.
#[utoipa::path(
    get,
    path = "/metrics",
    tag = "Observability",
    responses(
        (status = 200, description = "Prometheus metrics in text format", content_type = "text/plain"),
        (status = 500, description = "Failed to encode metrics"),
    ),
)]
pub async fn metrics_handler() -> impl IntoResponse {
    // Make sure the families exist even before the first request completes.
    if let Err(e) = METRICS.as_ref() {
        tracing::error!(error = %e, "Metrics registry unavailable");
    }

    let encoder = TextEncoder::new();
    let metric_families = prometheus::gather();
    let mut buffer = Vec::new();

    match encoder.encode(&metric_families, &mut buffer) {
        Ok(_) => (
            StatusCode::OK,
            [("content-type", "text/plain; version=0.0.4; charset=utf-8")],
            buffer,
        ),
        Err(e) => {
            tracing::error!(error = %e, "Failed to encode metrics");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                [("content-type", "text/plain")],
                format!("Failed to encode metrics: {}", e).into_bytes(),
            )
        }
    }
}
