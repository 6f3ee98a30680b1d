//! Read-through response cache.
//!
//! Handlers ask for a value under a [`CacheKey`] and pass the closure that
//! would compute it. A live entry is deserialized and returned; otherwise
//! the closure runs and its successful result is stored for the
//! namespace's TTL. Errors are never cached.

use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use serde::{de::DeserializeOwned, Serialize};
use tokio::time::Instant;

use super::key::{CacheKey, CacheNamespace};
use super::memory_backend::{InMemoryCacheBackend, DEFAULT_MAX_ENTRIES};
use super::traits::{CacheBackend, CacheStats, CachedEntry};

/// Configuration for the response cache.
#[derive(Debug, Clone)]
pub struct CacheConfig {
    /// Maximum number of entries held by the default backend.
    pub max_entries: usize,
    /// Per-namespace TTLs replacing the defaults.
    pub ttl_overrides: HashMap<CacheNamespace, Duration>,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            max_entries: DEFAULT_MAX_ENTRIES,
            ttl_overrides: HashMap::new(),
        }
    }
}

impl CacheConfig {
    /// Create a new cache config with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the entry threshold.
    pub fn with_max_entries(mut self, max: usize) -> Self {
        self.max_entries = max;
        self
    }

    /// Override the TTL of one namespace.
    pub fn with_ttl(mut self, namespace: CacheNamespace, ttl: Duration) -> Self {
        self.ttl_overrides.insert(namespace, ttl);
        self
    }

    /// Effective TTL for a namespace.
    pub fn ttl_for(&self, namespace: CacheNamespace) -> Duration {
        self.ttl_overrides
            .get(&namespace)
            .copied()
            .unwrap_or_else(|| namespace.default_ttl())
    }
}

/// Result of a cache read, carrying hit metadata.
#[derive(Debug, Clone)]
pub struct CacheRead<T> {
    value: T,
    cached_at: Instant,
    was_cache_hit: bool,
}

impl<T> CacheRead<T> {
    fn hit(value: T, cached_at: Instant) -> Self {
        Self {
            value,
            cached_at,
            was_cache_hit: true,
        }
    }

    fn miss(value: T) -> Self {
        Self {
            value,
            cached_at: Instant::now(),
            was_cache_hit: false,
        }
    }

    /// Consume the wrapper and return the underlying value.
    pub fn into_value(self) -> T {
        self.value
    }

    pub fn value(&self) -> &T {
        &self.value
    }

    pub fn was_cache_hit(&self) -> bool {
        self.was_cache_hit
    }

    /// Time since the value was computed.
    pub fn age(&self) -> Duration {
        self.cached_at.elapsed()
    }
}

/// Namespaced read-through cache over a pluggable backend.
#[derive(Clone)]
pub struct ResponseCache {
    backend: Arc<dyn CacheBackend>,
    config: CacheConfig,
}

impl std::fmt::Debug for ResponseCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResponseCache")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl ResponseCache {
    pub fn new(backend: Arc<dyn CacheBackend>, config: CacheConfig) -> Self {
        Self { backend, config }
    }

    /// Cache backed by an [`InMemoryCacheBackend`] sized from the config.
    pub fn in_memory(config: CacheConfig) -> Self {
        let backend = Arc::new(InMemoryCacheBackend::new(config.max_entries));
        Self::new(backend, config)
    }

    pub fn config(&self) -> &CacheConfig {
        &self.config
    }

    /// Return the cached value for `key`, or compute, store and return it.
    pub async fn get_or_fetch<T, E, F, Fut>(&self, key: CacheKey, fetch: F) -> Result<CacheRead<T>, E>
    where
        T: Serialize + DeserializeOwned,
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, E>>,
    {
        if let Some(entry) = self.backend.get(&key).await {
            match serde_json::from_value::<T>(entry.value) {
                Ok(value) => return Ok(CacheRead::hit(value, entry.cached_at)),
                Err(e) => {
                    tracing::warn!(key = %key, error = %e, "Discarding undecodable cache entry");
                    self.backend.delete(&key).await;
                }
            }
        }

        let value = fetch().await?;
        match serde_json::to_value(&value) {
            Ok(json) => {
                let now = Instant::now();
                let entry = CachedEntry {
                    value: json,
                    cached_at: now,
                    expires_at: now + self.config.ttl_for(key.namespace()),
                };
                self.backend.put(key, entry).await;
            }
            Err(e) => {
                tracing::warn!(key = %key, error = %e, "Response not cacheable");
            }
        }
        Ok(CacheRead::miss(value))
    }

    /// Drop one entry.
    pub async fn invalidate(&self, key: &CacheKey) -> bool {
        self.backend.delete(key).await
    }

    /// Drop every entry of the given namespaces. Returns the number removed.
    pub async fn invalidate_namespaces(&self, namespaces: &[CacheNamespace]) -> u64 {
        let mut removed = 0;
        for namespace in namespaces {
            removed += self.backend.invalidate_namespace(*namespace).await;
        }
        removed
    }

    pub async fn stats(&self) -> CacheStats {
        self.backend.stats().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[derive(Debug, PartialEq)]
    struct Boom;

    #[tokio::test(start_paused = true)]
    async fn test_second_read_is_a_hit_until_ttl() -> Result<(), Boom> {
        let cache = ResponseCache::in_memory(CacheConfig::new());
        let counter = AtomicUsize::new(0);
        let calls = &counter;
        let key = CacheKey::new(CacheNamespace::List, "0:2025");
        let fetch = move || async move {
            calls.fetch_add(1, Ordering::SeqCst);
            Ok::<_, Boom>(vec![1, 2, 3])
        };

        let first = cache.get_or_fetch(key.clone(), fetch).await?;
        assert!(!first.was_cache_hit());
        let second = cache.get_or_fetch(key.clone(), fetch).await?;
        assert!(second.was_cache_hit());
        assert_eq!(second.into_value(), vec![1, 2, 3]);
        assert_eq!(calls.load(Ordering::SeqCst), 1);

        tokio::time::advance(Duration::from_secs(301)).await;
        let third = cache.get_or_fetch(key, fetch).await?;
        assert!(!third.was_cache_hit());
        assert_eq!(calls.load(Ordering::SeqCst), 2);
        Ok(())
    }

    #[tokio::test]
    async fn test_errors_are_not_cached() {
        let cache = ResponseCache::in_memory(CacheConfig::new());
        let key = CacheKey::singleton(CacheNamespace::Statistics);

        let failed = cache
            .get_or_fetch(key.clone(), || async { Err::<u64, _>(Boom) })
            .await;
        assert_eq!(failed.map(CacheRead::into_value), Err(Boom));

        let ok = cache.get_or_fetch(key, || async { Ok::<_, Boom>(7u64) }).await;
        assert!(matches!(ok, Ok(ref read) if !read.was_cache_hit()));
    }

    #[tokio::test(start_paused = true)]
    async fn test_ttl_override() -> Result<(), Boom> {
        let config = CacheConfig::new().with_ttl(CacheNamespace::Battle, Duration::from_secs(10));
        assert_eq!(config.ttl_for(CacheNamespace::Battle), Duration::from_secs(10));
        let cache = ResponseCache::in_memory(config);
        let key = CacheKey::new(CacheNamespace::Battle, "1");

        cache.get_or_fetch(key.clone(), || async { Ok::<_, Boom>("a".to_string()) }).await?;
        tokio::time::advance(Duration::from_secs(11)).await;
        let read = cache
            .get_or_fetch(key, || async { Ok::<_, Boom>("b".to_string()) })
            .await?;
        assert_eq!(read.into_value(), "b");
        Ok(())
    }

    #[tokio::test]
    async fn test_invalidate_namespaces() -> Result<(), Boom> {
        let cache = ResponseCache::in_memory(CacheConfig::new());
        for ns in CacheNamespace::ALL {
            cache
                .get_or_fetch(CacheKey::singleton(ns), || async { Ok::<_, Boom>(1u8) })
                .await?;
        }
        let removed = cache.invalidate_namespaces(&CacheNamespace::CLEARABLE).await;
        assert_eq!(removed, 3);
        assert_eq!(cache.stats().await.entry_count, 2);
        Ok(())
    }
}
