//! Battle REST API Routes (v1)
//!
//! Paginated, filterable catalog listing and single-battle lookup. Both
//! answers are served through the response cache.

use axum::{
    extract::{Path, Query, State},
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use battlemap_core::{Battle, BattleFilter};
use battlemap_storage::{CacheKey, CacheNamespace};

use crate::{
    error::{ApiError, ApiResult},
    routes::parse_battle_id,
    state::AppState,
    types::{BattleListResponse, ListBattlesParams, ListQuery},
};

// ============================================================================
// ROUTE HANDLERS
// ============================================================================

/// GET /api/v1/battles - List battles with filters and pagination
#[utoipa::path(
    get,
    path = "/api/v1/battles",
    tag = "Battles",
    params(ListBattlesParams),
    responses(
        (status = 200, description = "One page of battles", body = BattleListResponse),
        (status = 500, description = "Store failure", body = ApiError),
    ),
)]
pub async fn list_battles(
    State(state): State<AppState>,
    Query(params): Query<ListBattlesParams>,
) -> ApiResult<impl IntoResponse> {
    let query = params.normalize();
    let key = CacheKey::new(CacheNamespace::List, query.cache_discriminator());

    let page = state
        .cached(key, || fetch_page(&state, query))
        .await
        .inspect_err(|e| tracing::error!(error = %e, "Error in list_battles"))?;

    Ok(Json(page))
}

async fn fetch_page(state: &AppState, query: ListQuery) -> ApiResult<BattleListResponse> {
    let mut filter = BattleFilter::new().years(query.start_year, query.end_year);
    if let Some(prefix) = query.name_prefix {
        filter = filter.name_prefix(prefix);
    }

    let total = state.store.count(&filter).await?;
    let battles = state
        .store
        .query(&filter.page(query.offset, query.limit))
        .await?;

    tracing::debug!(total, returned = battles.len(), "Fetched battle page");
    Ok(BattleListResponse {
        total,
        offset: query.offset,
        limit: query.limit,
        battles,
    })
}

/// GET /api/v1/battles/{id} - Get one battle
#[utoipa::path(
    get,
    path = "/api/v1/battles/{id}",
    tag = "Battles",
    params(
        ("id" = i64, Path, description = "Battle ID")
    ),
    responses(
        (status = 200, description = "Battle details", body = Battle),
        (status = 404, description = "Battle not found", body = ApiError),
        (status = 500, description = "Store failure", body = ApiError),
    ),
)]
pub async fn get_battle(
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
) -> ApiResult<impl IntoResponse> {
    let id = parse_battle_id(&raw_id)?;
    let key = CacheKey::new(CacheNamespace::Battle, id.to_string());

    let battle = state
        .cached(key, || async {
            state
                .store
                .get(id)
                .await?
                .ok_or_else(|| ApiError::battle_not_found(id))
        })
        .await?;

    Ok(Json(battle))
}

// ============================================================================
// ROUTER
// ============================================================================

/// Create the v1 battle router.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(list_battles))
        .route("/:id", get(get_battle))
        .with_state(state)
}
