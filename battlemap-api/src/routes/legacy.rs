//! Legacy battle list used by the map page.
//!
//! Unpaginated, bounded by year only, and defaulting to the common era so
//! BCE battles stay off the map unless asked for.

use axum::{
    extract::{Query, State},
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use battlemap_core::{Battle, BattleFilter};
use battlemap_storage::{CacheKey, CacheNamespace};

use crate::{
    error::{ApiError, ApiResult},
    state::AppState,
    types::LegacyListParams,
};

/// GET /api/battles - All battles within a year range
#[utoipa::path(
    get,
    path = "/api/battles",
    tag = "Legacy",
    params(LegacyListParams),
    responses(
        (status = 200, description = "Battles in the range", body = Vec<Battle>),
        (status = 500, description = "Store failure", body = ApiError),
    ),
)]
pub async fn list_battles(
    State(state): State<AppState>,
    Query(params): Query<LegacyListParams>,
) -> ApiResult<impl IntoResponse> {
    let (start_year, end_year) = params.bounds();
    tracing::info!(start_year, end_year, "Fetching battles between years");

    let key = CacheKey::new(
        CacheNamespace::LegacyList,
        format!("start={}&end={}", start_year, end_year),
    );
    let battles: Vec<Battle> = state
        .cached(key, || async {
            let filter = BattleFilter::new().years(Some(start_year), Some(end_year));
            Ok::<_, ApiError>(state.store.query(&filter).await?)
        })
        .await
        .inspect_err(|e| tracing::error!(error = %e, "Error in legacy list_battles"))?;

    tracing::info!(count = battles.len(), "Found battles in the specified range");
    Ok(Json(battles))
}

/// Create the legacy list router.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(list_battles))
        .with_state(state)
}
