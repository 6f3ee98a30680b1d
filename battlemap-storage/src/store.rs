//! Async battle store trait.
//!
//! The API layer, the generator and the enrichment pipeline all talk to
//! storage through this trait, so tests can swap PostgreSQL for the
//! in-memory implementation.

use ::async_trait::async_trait;
use battlemap_core::{Battle, BattleFilter, BattleId, NewBattle, StoreError, YearSpan};

/// Result alias for store operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// Persistence operations over the battle table.
#[async_trait]
pub trait BattleStore: Send + Sync {
    /// Insert a batch of new battles in one transaction.
    ///
    /// Either every record commits or none does. Returns the number of rows
    /// inserted.
    async fn insert_batch(&self, battles: &[NewBattle]) -> StoreResult<u64>;

    /// Battles passing the filter, ordered by id, with offset/limit applied.
    async fn query(&self, filter: &BattleFilter) -> StoreResult<Vec<Battle>>;

    /// Number of battles passing the filter. Offset and limit are ignored.
    async fn count(&self, filter: &BattleFilter) -> StoreResult<u64>;

    /// Get a battle by id.
    async fn get(&self, id: BattleId) -> StoreResult<Option<Battle>>;

    /// Persist every mutable field of an existing battle.
    ///
    /// Returns [`StoreError::NotFound`] if no row has that id.
    async fn update(&self, battle: &Battle) -> StoreResult<()>;

    /// Remove every battle. Returns the number of rows deleted.
    async fn delete_all(&self) -> StoreResult<u64>;

    /// Earliest and latest year, or `None` when the table is empty.
    async fn year_span(&self) -> StoreResult<Option<YearSpan>>;

    /// Row counts grouped by century start year, ascending, empty buckets
    /// absent.
    async fn century_counts(&self) -> StoreResult<Vec<(i64, u64)>>;
}
