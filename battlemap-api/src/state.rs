//! Shared application state for Axum routers.

use std::future::Future;
use std::sync::Arc;
use std::time::Instant;

use battlemap_enrich::Enricher;
use battlemap_storage::{BattleStore, CacheKey, ResponseCache};
use serde::{de::DeserializeOwned, Serialize};

use crate::error::ApiResult;
use crate::telemetry::METRICS;

/// Response cache used by the handlers.
pub type ApiCache = ResponseCache;

/// Application-wide state shared across all routes.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn BattleStore>,
    pub cache: Arc<ApiCache>,
    pub enricher: Arc<Enricher>,
    pub start_time: Instant,
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("cache", &self.cache)
            .field("enricher", &self.enricher)
            .field("start_time", &self.start_time)
            .finish_non_exhaustive()
    }
}

crate::impl_from_ref!(Arc<dyn BattleStore>, store);
crate::impl_from_ref!(Arc<ApiCache>, cache);
crate::impl_from_ref!(Arc<Enricher>, enricher);
crate::impl_from_ref!(Instant, start_time);

impl AppState {
    pub fn new(store: Arc<dyn BattleStore>, cache: ApiCache, enricher: Enricher) -> Self {
        Self {
            store,
            cache: Arc::new(cache),
            enricher: Arc::new(enricher),
            start_time: Instant::now(),
        }
    }

    /// Serve `key` from the cache, computing it with `fetch` on a miss.
    pub async fn cached<T, F, Fut>(&self, key: CacheKey, fetch: F) -> ApiResult<T>
    where
        T: Serialize + DeserializeOwned,
        F: FnOnce() -> Fut,
        Fut: Future<Output = ApiResult<T>>,
    {
        let namespace = key.namespace();
        let read = self.cache.get_or_fetch(key, fetch).await?;
        if let Ok(metrics) = METRICS.as_ref() {
            metrics.record_cache_read(namespace.as_str(), read.was_cache_hit());
        }
        Ok(read.into_value())
    }
}
