//! BATTLEMAP Storage - Store Trait, In-Memory Store and Response Cache
//!
//! Defines the storage abstraction for battle records. The PostgreSQL
//! implementation lives in battlemap-api next to its connection pool.

pub mod cache;
pub mod memory;
pub mod stats;
pub mod store;

pub use cache::{
    CacheBackend, CacheConfig, CacheKey, CacheNamespace, CacheRead, CacheStats, CachedEntry,
    InMemoryCacheBackend, ResponseCache,
};
pub use memory::InMemoryBattleStore;
pub use stats::aggregate;
pub use store::{BattleStore, StoreResult};
