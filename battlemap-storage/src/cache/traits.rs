//! Cache backend trait and usage statistics.

use async_trait::async_trait;
use tokio::time::Instant;

use super::key::{CacheKey, CacheNamespace};

/// A stored cache value with its timing metadata.
#[derive(Debug, Clone)]
pub struct CachedEntry {
    /// Serialized response payload.
    pub value: serde_json::Value,
    /// When the entry was written.
    pub cached_at: Instant,
    /// When the entry stops being served.
    pub expires_at: Instant,
}

impl CachedEntry {
    pub fn is_expired(&self, now: Instant) -> bool {
        now >= self.expires_at
    }
}

/// Pluggable cache storage.
///
/// Implementations must be safe for concurrent handlers and must never
/// return an expired entry from [`CacheBackend::get`].
#[async_trait]
pub trait CacheBackend: Send + Sync {
    /// Get a live entry, counting a hit or a miss.
    async fn get(&self, key: &CacheKey) -> Option<CachedEntry>;

    /// Store an entry, replacing any previous one under the same key.
    async fn put(&self, key: CacheKey, entry: CachedEntry);

    /// Remove one entry. Returns whether it existed.
    async fn delete(&self, key: &CacheKey) -> bool;

    /// Remove every entry in a namespace. Returns the number removed.
    async fn invalidate_namespace(&self, namespace: CacheNamespace) -> u64;

    /// Current statistics snapshot.
    async fn stats(&self) -> CacheStats;
}

/// Statistics about cache usage.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CacheStats {
    /// Number of cache hits.
    pub hits: u64,
    /// Number of cache misses.
    pub misses: u64,
    /// Number of entries currently held, including expired ones not yet purged.
    pub entry_count: u64,
    /// Number of evictions due to capacity.
    pub evictions: u64,
}

impl CacheStats {
    /// Calculate the hit rate (0.0 to 1.0).
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }
}
