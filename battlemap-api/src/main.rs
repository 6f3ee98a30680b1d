//! BATTLEMAP API Server Entry Point
//!
//! Bootstraps configuration, opens the configured store, seeds it when it
//! is empty and starts the Axum HTTP server.

use std::sync::Arc;

use axum::Router;
use battlemap_api::{
    create_api_router, ApiCache, ApiConfig, ApiError, ApiResult, AppState, DbConfig,
    PgBattleStore, StoreBackend,
};
use battlemap_api::telemetry::init_tracing;
use battlemap_enrich::{default_sources, ContentSource, EnrichConfig, Enricher};
use battlemap_seed::{seed_if_empty, SeedConfig};
use battlemap_storage::{BattleStore, InMemoryBattleStore};
use rand::{rngs::StdRng, SeedableRng};

#[tokio::main]
async fn main() -> ApiResult<()> {
    init_tracing()?;

    let api_config = ApiConfig::from_env();
    let store = open_store(api_config.store).await?;

    if let Some(report) = seed_if_empty(
        store.as_ref(),
        StdRng::from_os_rng(),
        &SeedConfig::default(),
        api_config.force_reseed,
    )
    .await?
    {
        tracing::info!(
            deleted = report.deleted,
            inserted = report.inserted,
            "Mock data creation completed"
        );
    }

    let enrich_config = EnrichConfig::from_env();
    let sources: Vec<Arc<dyn ContentSource>> = default_sources(&enrich_config)?
        .into_iter()
        .map(|source| Arc::new(source) as Arc<dyn ContentSource>)
        .collect();
    let enricher = Enricher::new(sources, enrich_config);

    let cache = ApiCache::in_memory(api_config.cache.clone());
    let state = AppState::new(store, cache, enricher);
    let app: Router = create_api_router(state, &api_config);

    let addr = api_config.bind_addr()?;
    tracing::info!(%addr, "Starting BATTLEMAP API server");

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .map_err(|e| ApiError::internal_error(format!("Failed to bind {}: {}", addr, e)))?;
    let server = axum::serve(listener, app);

    tokio::select! {
        result = server => {
            result.map_err(|e| ApiError::internal_error(format!("Server error: {}", e)))?;
        }
        _ = tokio::signal::ctrl_c() => {
            tracing::info!("Shutdown signal received");
        }
    }

    Ok(())
}

async fn open_store(backend: StoreBackend) -> ApiResult<Arc<dyn BattleStore>> {
    match backend {
        StoreBackend::Postgres => {
            let db_config = DbConfig::from_env();
            let store = PgBattleStore::from_config(&db_config)?;
            store.health_check().await?;
            store.ensure_schema().await?;
            tracing::info!(
                host = %db_config.host,
                dbname = %db_config.dbname,
                pool_size = store.pool_size(),
                "Connected to PostgreSQL"
            );
            Ok(Arc::new(store))
        }
        StoreBackend::Memory => {
            tracing::warn!("Using the in-memory store; data is lost on restart");
            Ok(Arc::new(InMemoryBattleStore::new()))
        }
    }
}
