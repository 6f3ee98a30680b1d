//! Cache administration.

use axum::{extract::State, response::IntoResponse, routing::post, Json, Router};
use battlemap_storage::CacheNamespace;

use crate::{error::ApiResult, state::AppState, types::MessageResponse};

/// POST /api/cache/clear - Drop cached lists and the homepage
///
/// Single-battle and statistics entries are left to expire on their own.
#[utoipa::path(
    post,
    path = "/api/cache/clear",
    tag = "Cache",
    responses(
        (status = 200, description = "Cache cleared", body = MessageResponse),
    ),
)]
pub async fn clear_cache(State(state): State<AppState>) -> ApiResult<impl IntoResponse> {
    let stats = state.cache.stats().await;
    let removed = state
        .cache
        .invalidate_namespaces(&CacheNamespace::CLEARABLE)
        .await;
    tracing::info!(
        removed,
        entries = stats.entry_count,
        hit_rate = stats.hit_rate(),
        "Cache cleared successfully"
    );
    Ok(Json(MessageResponse::new("Cache cleared successfully")))
}

pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/clear", post(clear_cache))
        .with_state(state)
}
