//! Axum Middleware for HTTP Request Tracing and Metrics
//!
//! Wraps every request in an `http_request` span, records Prometheus
//! metrics and logs completion.

use axum::{extract::Request, middleware::Next, response::Response};
use once_cell::sync::Lazy;
use regex::Regex;
use std::time::Instant;
use tracing::{info_span, Instrument};

use super::metrics::METRICS;

static ID_PATTERN: Lazy<Regex> = Lazy::new(|| Regex::new(r"/\d+(/|$)").expect("Invalid ID regex"));

/// Normalize path for metrics/spans (replace numeric ids with a placeholder).
///
/// This prevents high-cardinality label explosion in Prometheus.
fn normalize_path(path: &str) -> String {
    // Adjacent ids share a slash, so a second pass catches `/1/2`.
    let once = ID_PATTERN.replace_all(path, "/{id}$1");
    ID_PATTERN.replace_all(&once, "/{id}$1").into_owned()
}

/// Observability middleware for Axum.
///
/// This middleware wraps every request with:
/// 1. A tracing span carrying method, target and route
/// 2. Prometheus metrics recording
/// 3. Request/response logging
pub async fn observability_middleware(request: Request, next: Next) -> Response {
    let start = Instant::now();

    let method = request.method().clone();
    let path = request.uri().path().to_string();
    let normalized_path = normalize_path(&path);

    let span = info_span!(
        "http_request",
        http.method = %method,
        http.target = %path,
        http.route = %normalized_path,
    );

    let response = next.run(request).instrument(span).await;

    let duration = start.elapsed();
    let status = response.status();

    match METRICS.as_ref() {
        Ok(metrics) => metrics.record_http_request(
            method.as_str(),
            &normalized_path,
            status.as_u16(),
            duration.as_secs_f64(),
        ),
        Err(e) => tracing::warn!(error = %e, "Metrics unavailable"),
    }

    tracing::info!(
        method = %method,
        path = %path,
        status = status.as_u16(),
        duration_ms = duration.as_millis(),
        "Request completed"
    );

    response
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_path_numeric_id() {
        assert_eq!(normalize_path("/api/v1/battles/12345"), "/api/v1/battles/{id}");
    }

    #[test]
    fn test_normalize_path_nested_id() {
        assert_eq!(
            normalize_path("/api/battles/42/enrich"),
            "/api/battles/{id}/enrich"
        );
    }

    #[test]
    fn test_normalize_path_adjacent_ids() {
        assert_eq!(normalize_path("/a/1/2"), "/a/{id}/{id}");
    }

    #[test]
    fn test_normalize_path_no_ids() {
        assert_eq!(normalize_path("/api/v1/statistics"), "/api/v1/statistics");
        assert_eq!(normalize_path("/health/ready"), "/health/ready");
        assert_eq!(normalize_path("/"), "/");
    }
}
