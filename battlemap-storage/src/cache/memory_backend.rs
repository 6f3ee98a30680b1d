//! DashMap cache backend.

use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;
use dashmap::DashMap;
use tokio::time::Instant;

use super::key::{CacheKey, CacheNamespace};
use super::traits::{CacheBackend, CacheStats, CachedEntry};

/// Default maximum number of entries held at once.
pub const DEFAULT_MAX_ENTRIES: usize = 1000;

/// Process-local cache backend.
///
/// When a write would exceed `max_entries`, expired entries are purged
/// first; if the map is still full, the entries closest to expiry are
/// evicted.
#[derive(Debug)]
pub struct InMemoryCacheBackend {
    entries: DashMap<CacheKey, CachedEntry>,
    max_entries: usize,
    hits: AtomicU64,
    misses: AtomicU64,
    evictions: AtomicU64,
}

impl Default for InMemoryCacheBackend {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_ENTRIES)
    }
}

impl InMemoryCacheBackend {
    pub fn new(max_entries: usize) -> Self {
        Self {
            entries: DashMap::new(),
            max_entries: max_entries.max(1),
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
            evictions: AtomicU64::new(0),
        }
    }

    pub fn max_entries(&self) -> usize {
        self.max_entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn make_room(&self, incoming: &CacheKey) {
        if self.entries.len() < self.max_entries || self.entries.contains_key(incoming) {
            return;
        }

        let now = Instant::now();
        self.entries.retain(|_, entry| !entry.is_expired(now));

        let overflow = (self.entries.len() + 1).saturating_sub(self.max_entries);
        if overflow == 0 {
            return;
        }

        let mut by_expiry: Vec<(CacheKey, Instant)> = self
            .entries
            .iter()
            .map(|e| (e.key().clone(), e.value().expires_at))
            .collect();
        by_expiry.sort_by_key(|(_, expires_at)| *expires_at);
        for (key, _) in by_expiry.into_iter().take(overflow) {
            if self.entries.remove(&key).is_some() {
                self.evictions.fetch_add(1, Ordering::Relaxed);
            }
        }
    }
}

#[async_trait]
impl CacheBackend for InMemoryCacheBackend {
    async fn get(&self, key: &CacheKey) -> Option<CachedEntry> {
        let now = Instant::now();
        let live = match self.entries.get(key) {
            Some(entry) if !entry.is_expired(now) => Some(entry.clone()),
            Some(_) => None,
            None => {
                self.misses.fetch_add(1, Ordering::Relaxed);
                return None;
            }
        };
        match live {
            Some(entry) => {
                self.hits.fetch_add(1, Ordering::Relaxed);
                Some(entry)
            }
            None => {
                self.entries.remove_if(key, |_, entry| entry.is_expired(now));
                self.misses.fetch_add(1, Ordering::Relaxed);
                None
            }
        }
    }

    async fn put(&self, key: CacheKey, entry: CachedEntry) {
        self.make_room(&key);
        self.entries.insert(key, entry);
    }

    async fn delete(&self, key: &CacheKey) -> bool {
        self.entries.remove(key).is_some()
    }

    async fn invalidate_namespace(&self, namespace: CacheNamespace) -> u64 {
        let before = self.entries.len();
        self.entries.retain(|key, _| key.namespace() != namespace);
        before.saturating_sub(self.entries.len()) as u64
    }

    async fn stats(&self) -> CacheStats {
        CacheStats {
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            entry_count: self.entries.len() as u64,
            evictions: self.evictions.load(Ordering::Relaxed),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn entry(ttl_secs: u64) -> CachedEntry {
        let now = Instant::now();
        CachedEntry {
            value: serde_json::json!({"ok": true}),
            cached_at: now,
            expires_at: now + Duration::from_secs(ttl_secs),
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_expired_entry_is_a_miss() {
        let backend = InMemoryCacheBackend::default();
        let key = CacheKey::new(CacheNamespace::Battle, "1");
        backend.put(key.clone(), entry(300)).await;
        assert!(backend.get(&key).await.is_some());

        tokio::time::advance(Duration::from_secs(301)).await;
        assert!(backend.get(&key).await.is_none());

        let stats = backend.stats().await;
        assert_eq!(stats.hits, 1);
        assert_eq!(stats.misses, 1);
        assert_eq!(stats.entry_count, 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_capacity_evicts_soonest_expiring() {
        let backend = InMemoryCacheBackend::new(2);
        let short = CacheKey::new(CacheNamespace::List, "short");
        let long = CacheKey::new(CacheNamespace::Statistics, "");
        let third = CacheKey::new(CacheNamespace::Battle, "3");

        backend.put(short.clone(), entry(300)).await;
        backend.put(long.clone(), entry(3600)).await;
        backend.put(third.clone(), entry(300)).await;

        assert_eq!(backend.len(), 2);
        assert!(backend.get(&short).await.is_none());
        assert!(backend.get(&long).await.is_some());
        assert!(backend.get(&third).await.is_some());
        assert_eq!(backend.stats().await.evictions, 1);
    }

    #[tokio::test]
    async fn test_invalidate_namespace_only_touches_that_namespace() {
        let backend = InMemoryCacheBackend::default();
        backend.put(CacheKey::new(CacheNamespace::List, "a"), entry(300)).await;
        backend.put(CacheKey::new(CacheNamespace::List, "b"), entry(300)).await;
        backend.put(CacheKey::new(CacheNamespace::Battle, "1"), entry(300)).await;

        assert_eq!(backend.invalidate_namespace(CacheNamespace::List).await, 2);
        assert_eq!(backend.len(), 1);
    }
}
