//! Namespaced response cache.
//!
//! Entries live in one of five [`CacheNamespace`]s, each with its own TTL.
//! Reads go through [`ResponseCache::get_or_fetch`], which returns a
//! [`CacheRead<T>`] so callers can tell hits from fresh computations.
//! Invalidation is explicit and per namespace or per key.

pub mod key;
pub mod memory_backend;
pub mod read_through;
pub mod traits;

pub use key::{CacheKey, CacheNamespace};
pub use memory_backend::{InMemoryCacheBackend, DEFAULT_MAX_ENTRIES};
pub use read_through::{CacheConfig, CacheRead, ResponseCache};
pub use traits::{CacheBackend, CacheStats, CachedEntry};
