//! BATTLEMAP Test Utilities
//!
//! Centralized test infrastructure for the BATTLEMAP workspace:
//! - Proptest generators for battles and filters
//! - Mock content sources for the enrichment pipeline
//! - A fault-injecting store for error-path tests
//! - Test fixtures for common scenarios
//! - Custom assertions for BATTLEMAP-specific validation

// Re-export the in-memory store from its source crate
pub use battlemap_storage::{BattleStore, InMemoryBattleStore, StoreResult};

// Re-export core types for convenience
pub use battlemap_core::{
    Battle, BattleFilter, BattleId, BattleType, FetchError, MediaEntry, MediaKind, NewBattle,
    SourceLinks, StoreError, YearSpan, MAINLAND_FRANCE,
};

use async_trait::async_trait;
use battlemap_enrich::ContentSource;
use std::sync::atomic::{AtomicBool, AtomicI64, AtomicUsize, Ordering};

// ============================================================================
// MOCK CONTENT SOURCES
// ============================================================================

/// What a [`MockContentSource`] answers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MockResponse {
    Text(String),
    Nothing,
    Fail(u16),
}

/// Content source returning a canned response and counting calls.
#[derive(Debug)]
pub struct MockContentSource {
    label: String,
    response: MockResponse,
    calls: AtomicUsize,
}

impl MockContentSource {
    pub fn new(label: impl Into<String>, response: MockResponse) -> Self {
        Self {
            label: label.into(),
            response,
            calls: AtomicUsize::new(0),
        }
    }

    /// Source that always finds `text`.
    pub fn returning_text(label: impl Into<String>, text: impl Into<String>) -> Self {
        Self::new(label, MockResponse::Text(text.into()))
    }

    /// Source that answers with nothing usable.
    pub fn returning_nothing(label: impl Into<String>) -> Self {
        Self::new(label, MockResponse::Nothing)
    }

    /// Source whose every fetch fails with the given HTTP status.
    pub fn failing(label: impl Into<String>, status: u16) -> Self {
        Self::new(label, MockResponse::Fail(status))
    }

    /// Number of fetches so far.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ContentSource for MockContentSource {
    fn label(&self) -> &str {
        &self.label
    }

    async fn fetch_text(&self, _battle: &Battle) -> Result<Option<String>, FetchError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match &self.response {
            MockResponse::Text(text) => Ok(Some(text.clone())),
            MockResponse::Nothing => Ok(None),
            MockResponse::Fail(status) => Err(FetchError::Status {
                source_name: self.label.clone(),
                status: *status,
            }),
        }
    }
}

// ============================================================================
// FAULT-INJECTING STORE
// ============================================================================

/// In-memory store that can be told to fail specific operations.
#[derive(Debug)]
pub struct FaultyStore {
    inner: InMemoryBattleStore,
    /// Batches still allowed before inserts fail; negative means never fail.
    batches_before_failure: AtomicI64,
    fail_updates: AtomicBool,
    fail_reads: AtomicBool,
}

impl FaultyStore {
    pub fn new() -> Self {
        Self {
            inner: InMemoryBattleStore::new(),
            batches_before_failure: AtomicI64::new(-1),
            fail_updates: AtomicBool::new(false),
            fail_reads: AtomicBool::new(false),
        }
    }

    /// The wrapped store, for inspecting what was committed.
    pub fn inner(&self) -> &InMemoryBattleStore {
        &self.inner
    }

    /// Let `n` batches commit, then fail every later one.
    pub fn fail_batches_after(&self, n: u32) {
        self.batches_before_failure.store(i64::from(n), Ordering::SeqCst);
    }

    pub fn fail_updates(&self, fail: bool) {
        self.fail_updates.store(fail, Ordering::SeqCst);
    }

    pub fn fail_reads(&self, fail: bool) {
        self.fail_reads.store(fail, Ordering::SeqCst);
    }

    fn check_reads(&self) -> StoreResult<()> {
        if self.fail_reads.load(Ordering::SeqCst) {
            return Err(StoreError::QueryFailed {
                reason: "injected read failure".to_string(),
            });
        }
        Ok(())
    }
}

#[async_trait]
impl BattleStore for FaultyStore {
    async fn insert_batch(&self, battles: &[NewBattle]) -> StoreResult<u64> {
        let remaining = self.batches_before_failure.load(Ordering::SeqCst);
        if remaining == 0 {
            return Err(StoreError::BatchFailed {
                size: battles.len(),
                reason: "injected batch failure".to_string(),
            });
        }
        if remaining > 0 {
            self.batches_before_failure.fetch_sub(1, Ordering::SeqCst);
        }
        self.inner.insert_batch(battles).await
    }

    async fn query(&self, filter: &BattleFilter) -> StoreResult<Vec<Battle>> {
        self.check_reads()?;
        self.inner.query(filter).await
    }

    async fn count(&self, filter: &BattleFilter) -> StoreResult<u64> {
        self.check_reads()?;
        self.inner.count(filter).await
    }

    async fn get(&self, id: BattleId) -> StoreResult<Option<Battle>> {
        self.check_reads()?;
        self.inner.get(id).await
    }

    async fn update(&self, battle: &Battle) -> StoreResult<()> {
        if self.fail_updates.load(Ordering::SeqCst) {
            return Err(StoreError::TransactionFailed {
                reason: "injected update failure".to_string(),
            });
        }
        self.inner.update(battle).await
    }

    async fn delete_all(&self) -> StoreResult<u64> {
        self.inner.delete_all().await
    }

    async fn year_span(&self) -> StoreResult<Option<YearSpan>> {
        self.check_reads()?;
        self.inner.year_span().await
    }

    async fn century_counts(&self) -> StoreResult<Vec<(i64, u64)>> {
        self.check_reads()?;
        self.inner.century_counts().await
    }
}

impl Default for FaultyStore {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// PROPTEST GENERATORS
// ============================================================================

pub mod generators {
    //! Proptest strategies for BATTLEMAP types.

    use super::*;
    use proptest::prelude::*;

    /// Years across the whole generated range and a little beyond.
    pub fn arb_year() -> impl Strategy<Value = i32> {
        -300i32..2100
    }

    pub fn arb_battle_type() -> impl Strategy<Value = BattleType> {
        prop::sample::select(BattleType::ALL.to_vec())
    }

    /// Latitude/longitude inside mainland France.
    pub fn arb_coordinates() -> impl Strategy<Value = (f64, f64)> {
        (
            MAINLAND_FRANCE.min_latitude..=MAINLAND_FRANCE.max_latitude,
            MAINLAND_FRANCE.min_longitude..=MAINLAND_FRANCE.max_longitude,
        )
    }

    /// Battles with conventional names and no enrichment fields.
    pub fn arb_new_battle() -> impl Strategy<Value = NewBattle> {
        (arb_battle_type(), "[A-Z][a-z]{3,12}", arb_year(), arb_coordinates()).prop_map(
            |(kind, place, year, (latitude, longitude))| NewBattle {
                name: format!("{} de {}", kind.label(), place),
                year,
                latitude,
                longitude,
                description: None,
                participants: Some("Royaume de France contre Royaume d'Angleterre".to_string()),
                outcome: None,
                historical_context: None,
                sources: None,
                image_url: None,
                media_urls: None,
            },
        )
    }

    pub fn arb_new_battles(max: usize) -> impl Strategy<Value = Vec<NewBattle>> {
        prop::collection::vec(arb_new_battle(), 0..=max)
    }
}

// ============================================================================
// TEST FIXTURES
// ============================================================================

pub mod fixtures {
    //! Pre-built test fixtures for common testing scenarios.

    use super::*;

    /// A fresh, unenriched battle.
    pub fn new_battle(name: &str, year: i32) -> NewBattle {
        NewBattle {
            name: name.to_string(),
            year,
            latitude: 46.603354,
            longitude: 1.888334,
            description: Some(format!("Description de {}", name)),
            participants: Some("Royaume de France contre Royaume d'Angleterre".to_string()),
            outcome: Some("Victoire Française".to_string()),
            historical_context: None,
            sources: None,
            image_url: None,
            media_urls: None,
        }
    }

    /// A stored battle with a fixed id.
    pub fn battle(id: BattleId, name: &str, year: i32) -> Battle {
        new_battle(name, year).with_id(id)
    }

    /// Small catalog spanning BCE to the twentieth century.
    ///
    /// Types: 3 Bataille, 2 Siège, 1 Défense. Centuries: -100, 700, 1400 (2),
    /// 1700, 1900.
    pub fn sample_catalog() -> Vec<NewBattle> {
        vec![
            new_battle("Siège d'Alésia", -52),
            new_battle("Bataille de Tours", 732),
            new_battle("Siège d'Orléans", 1429),
            new_battle("Bataille de Castillon", 1453),
            new_battle("Bataille de Fontenoy", 1745),
            new_battle("Défense de Verdun", 1916),
        ]
    }

    /// In-memory store loaded with [`sample_catalog`].
    pub async fn populated_store() -> StoreResult<InMemoryBattleStore> {
        let store = InMemoryBattleStore::new();
        store.insert_batch(&sample_catalog()).await?;
        Ok(store)
    }
}

// ============================================================================
// CUSTOM ASSERTIONS
// ============================================================================

pub mod assertions {
    //! Custom assertion functions for BATTLEMAP-specific validation.

    use super::*;

    /// Assert the battle lies inside the mainland-France bounding box.
    #[track_caller]
    pub fn assert_within_mainland_france(battle: &Battle) {
        assert!(
            battle.is_within_mainland_france(),
            "Battle {} at ({}, {}) is outside mainland France",
            battle.id,
            battle.latitude,
            battle.longitude
        );
    }

    /// Assert the name starts with one known type label and a preposition.
    #[track_caller]
    pub fn assert_conventional_name(name: &str) {
        let kind = BattleType::from_name(name)
            .unwrap_or_else(|| panic!("Name {:?} does not start with a type label", name));
        let rest = &name[kind.label().len()..];
        assert!(
            rest.starts_with(" d'") || rest.starts_with(" de "),
            "Name {:?} lacks a preposition after the type label",
            name
        );
    }

    /// Assert enrichment populated every enrichment field.
    #[track_caller]
    pub fn assert_enriched(battle: &Battle) {
        assert!(battle.historical_context.is_some(), "historical_context not set");
        assert!(
            battle.sources.as_ref().is_some_and(|s| !s.is_empty()),
            "sources not set"
        );
        assert!(
            battle.image_url.as_deref().is_some_and(|u| !u.is_empty()),
            "image_url not set"
        );
        assert!(
            battle.media_urls.as_ref().is_some_and(|m| !m.is_empty()),
            "media_urls not set"
        );
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sample_catalog_names_are_conventional() {
        for battle in fixtures::sample_catalog() {
            assertions::assert_conventional_name(&battle.name);
        }
    }

    #[tokio::test]
    async fn test_faulty_store_fails_after_n_batches() {
        let store = FaultyStore::new();
        store.fail_batches_after(1);
        let batch = vec![fixtures::new_battle("Bataille de Tours", 732)];

        assert_eq!(store.insert_batch(&batch).await, Ok(1));
        assert!(matches!(
            store.insert_batch(&batch).await,
            Err(StoreError::BatchFailed { size: 1, .. })
        ));
        assert_eq!(store.inner().len(), Ok(1));
    }

    #[tokio::test]
    async fn test_mock_source_counts_calls() {
        let source = MockContentSource::failing("Gallica", 500);
        let battle = fixtures::battle(1, "Bataille de Tours", 732);
        assert!(source.fetch_text(&battle).await.is_err());
        assert!(source.fetch_text(&battle).await.is_err());
        assert_eq!(source.calls(), 2);
    }
}
