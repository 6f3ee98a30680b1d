//! REST API Routes Module
//!
//! Route handlers organized by resource. Every handler receives the shared
//! [`AppState`] and answers JSON unless noted:
//! - Homepage (`/`, HTML)
//! - Legacy battle list and enrichment under `/api/battles`
//! - Cache administration under `/api/cache`
//! - Versioned catalog and statistics under `/api/v1`
//! - Health checks (Kubernetes-compatible)
//! - Metrics and OpenAPI document

pub mod battles;
pub mod cache;
pub mod docs;
pub mod enrich;
pub mod health;
pub mod homepage;
pub mod legacy;
pub mod statistics;

use std::time::Duration;

use axum::{
    http::{header, Method},
    middleware::from_fn,
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use battlemap_core::BattleId;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use utoipa::OpenApi;

use crate::config::ApiConfig;
use crate::error::{ApiError, ApiResult};
use crate::openapi::ApiDoc;
use crate::state::AppState;
use crate::telemetry::{metrics_handler, observability_middleware};

// Re-export route creation functions for convenience
pub use battles::create_router as battles_router;
pub use cache::create_router as cache_router;
pub use docs::create_router as docs_router;
pub use enrich::create_router as enrich_router;
pub use health::create_router as health_router;
pub use homepage::create_router as homepage_router;
pub use legacy::create_router as legacy_router;
pub use statistics::create_router as statistics_router;

// ============================================================================
// PATH HELPERS
// ============================================================================

/// Parse a battle id path segment.
///
/// Ids that are not integers cannot name a battle, so they answer 404 like
/// any other unknown id.
pub fn parse_battle_id(raw: &str) -> ApiResult<BattleId> {
    raw.trim()
        .parse::<BattleId>()
        .map_err(|_| ApiError::battle_not_found(raw))
}

// ============================================================================
// OPENAPI ENDPOINT
// ============================================================================

/// Handler for /openapi.json endpoint.
async fn openapi_json() -> impl IntoResponse {
    Json(ApiDoc::openapi())
}

// ============================================================================
// CORS LAYER
// ============================================================================

/// Build the CORS layer from ApiConfig.
///
/// In development mode (empty origins), allows all origins.
/// In production mode, only allows configured origins.
pub fn build_cors_layer(config: &ApiConfig) -> CorsLayer {
    let cors = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, header::ACCEPT])
        .max_age(Duration::from_secs(config.cors_max_age_secs));

    if config.cors_origins.is_empty() {
        tracing::info!("CORS: Development mode - allowing all origins");
        cors.allow_origin(Any).allow_headers(Any)
    } else {
        tracing::info!(
            "CORS: Production mode - allowing origins: {:?}",
            config.cors_origins
        );
        let origins: Vec<axum::http::HeaderValue> = config
            .cors_origins
            .iter()
            .filter_map(|o| o.parse().ok())
            .collect();

        if config.cors_allow_credentials {
            cors.allow_origin(origins).allow_credentials(true)
        } else {
            cors.allow_origin(origins)
        }
    }
}

// ============================================================================
// ROUTER
// ============================================================================

/// Create the complete API router.
///
/// # Middleware Order (outer to inner)
/// 1. CORS - handles preflight requests
/// 2. Trace - tower-http request spans
/// 3. Observability - metrics and completion logs
pub fn create_api_router(state: AppState, config: &ApiConfig) -> Router {
    let legacy_battles = legacy::create_router(state.clone()).merge(enrich::create_router(state.clone()));

    let router = Router::new()
        .merge(homepage::create_router(state.clone()))
        .nest("/api/battles", legacy_battles)
        .nest("/api/cache", cache::create_router(state.clone()))
        .merge(docs::create_router())
        .nest("/api/v1/battles", battles::create_router(state.clone()))
        .nest("/api/v1/statistics", statistics::create_router(state.clone()))
        .nest("/health", health::create_router(state))
        .route("/metrics", get(metrics_handler))
        .route("/openapi.json", get(openapi_json));

    router
        .layer(from_fn(observability_middleware))
        .layer(TraceLayer::new_for_http())
        .layer(build_cors_layer(config))
}
