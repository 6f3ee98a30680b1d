//! Battle Enrichment Route
//!
//! Runs the enrichment pipeline for one battle and persists the result.
//! Source failures degrade the text but never the response; only a missing
//! battle or a failed write is reported as an error.

use axum::{
    extract::{Path, State},
    response::IntoResponse,
    routing::post,
    Json, Router,
};
use battlemap_storage::{CacheKey, CacheNamespace};

use crate::{
    error::{ApiError, ApiResult},
    routes::parse_battle_id,
    state::AppState,
    telemetry::METRICS,
    types::EnrichResponse,
};

/// Message returned after a successful enrichment.
pub const ENRICH_SUCCESS_MESSAGE: &str = "Informations de la bataille enrichies avec succès";

/// POST /api/battles/{id}/enrich - Enrich one battle
#[utoipa::path(
    post,
    path = "/api/battles/{id}/enrich",
    tag = "Enrichment",
    params(
        ("id" = i64, Path, description = "Battle ID")
    ),
    responses(
        (status = 200, description = "Battle enriched and saved", body = EnrichResponse),
        (status = 404, description = "Battle not found", body = ApiError),
        (status = 500, description = "Enrichment could not be saved", body = ApiError),
    ),
)]
pub async fn enrich_battle(
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
) -> ApiResult<impl IntoResponse> {
    let id = parse_battle_id(&raw_id)?;

    let report = state
        .enricher
        .enrich_battle(state.store.as_ref(), id)
        .await
        .map_err(|e| {
            tracing::error!(battle_id = id, error = %e, "Enrichment failed");
            ApiError::from(e)
        })?;

    if let Ok(metrics) = METRICS.as_ref() {
        for outcome in &report.outcomes {
            metrics.record_enrichment_source(&outcome.source, outcome.outcome.kind());
        }
    }

    state
        .cache
        .invalidate(&CacheKey::new(CacheNamespace::Battle, id.to_string()))
        .await;

    Ok(Json(EnrichResponse {
        message: ENRICH_SUCCESS_MESSAGE.to_string(),
        battle: report.battle,
    }))
}

/// Create the enrichment router, mounted beside the legacy list.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/:id/enrich", post(enrich_battle))
        .with_state(state)
}
