//! Catalog statistics (v1).

use axum::{extract::State, response::IntoResponse, routing::get, Json, Router};
use battlemap_core::BattleStatistics;
use battlemap_storage::{aggregate, CacheKey, CacheNamespace};

use crate::{
    error::{ApiError, ApiResult},
    state::AppState,
};

/// GET /api/v1/statistics - Totals, time span, type and century distributions
#[utoipa::path(
    get,
    path = "/api/v1/statistics",
    tag = "Statistics",
    responses(
        (status = 200, description = "Catalog statistics", body = BattleStatistics),
        (status = 500, description = "Store failure", body = ApiError),
    ),
)]
pub async fn get_statistics(State(state): State<AppState>) -> ApiResult<impl IntoResponse> {
    let stats: BattleStatistics = state
        .cached(CacheKey::singleton(CacheNamespace::Statistics), || async {
            Ok::<_, ApiError>(aggregate(state.store.as_ref()).await?)
        })
        .await
        .inspect_err(|e| tracing::error!(error = %e, "Error in get_statistics"))?;

    Ok(Json(stats))
}

pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(get_statistics))
        .with_state(state)
}
