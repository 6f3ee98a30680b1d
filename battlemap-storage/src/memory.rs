//! In-memory battle store for tests and the `memory` store backend.

use std::collections::BTreeMap;
use std::sync::{Arc, RwLock};

use ::async_trait::async_trait;
use battlemap_core::{
    century_of, Battle, BattleFilter, BattleId, NewBattle, StoreError, YearSpan,
};

use crate::store::{BattleStore, StoreResult};

#[derive(Debug)]
struct Table {
    rows: BTreeMap<BattleId, Battle>,
    /// Like a sequence, never rewound by `delete_all`.
    next_id: BattleId,
}

impl Default for Table {
    fn default() -> Self {
        Self {
            rows: BTreeMap::new(),
            next_id: 1,
        }
    }
}

/// Battle store backed by an ordered map behind a lock.
#[derive(Debug, Default, Clone)]
pub struct InMemoryBattleStore {
    table: Arc<RwLock<Table>>,
}

impl InMemoryBattleStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored battles.
    pub fn len(&self) -> StoreResult<usize> {
        self.read(|t| t.rows.len())
    }

    pub fn is_empty(&self) -> StoreResult<bool> {
        Ok(self.len()? == 0)
    }

    fn read<R>(&self, f: impl FnOnce(&Table) -> R) -> StoreResult<R> {
        let table = self.table.read().map_err(|_| StoreError::LockPoisoned)?;
        Ok(f(&table))
    }

    fn write<R>(&self, f: impl FnOnce(&mut Table) -> R) -> StoreResult<R> {
        let mut table = self.table.write().map_err(|_| StoreError::LockPoisoned)?;
        Ok(f(&mut table))
    }
}

fn paginate<'a>(
    rows: impl Iterator<Item = &'a Battle>,
    filter: &BattleFilter,
) -> Vec<Battle> {
    let offset = usize::try_from(filter.offset).unwrap_or(usize::MAX);
    let limit = filter
        .limit
        .map_or(usize::MAX, |l| usize::try_from(l).unwrap_or(usize::MAX));
    rows.filter(|b| filter.matches(b))
        .skip(offset)
        .take(limit)
        .cloned()
        .collect()
}

#[async_trait]
impl BattleStore for InMemoryBattleStore {
    async fn insert_batch(&self, battles: &[NewBattle]) -> StoreResult<u64> {
        self.write(|table| {
            for battle in battles {
                let id = table.next_id;
                table.next_id += 1;
                table.rows.insert(id, battle.clone().with_id(id));
            }
            battles.len() as u64
        })
    }

    async fn query(&self, filter: &BattleFilter) -> StoreResult<Vec<Battle>> {
        self.read(|table| paginate(table.rows.values(), filter))
    }

    async fn count(&self, filter: &BattleFilter) -> StoreResult<u64> {
        self.read(|table| table.rows.values().filter(|b| filter.matches(b)).count() as u64)
    }

    async fn get(&self, id: BattleId) -> StoreResult<Option<Battle>> {
        self.read(|table| table.rows.get(&id).cloned())
    }

    async fn update(&self, battle: &Battle) -> StoreResult<()> {
        self.write(|table| match table.rows.get_mut(&battle.id) {
            Some(row) => {
                *row = battle.clone();
                Ok(())
            }
            None => Err(StoreError::NotFound { id: battle.id }),
        })?
    }

    async fn delete_all(&self) -> StoreResult<u64> {
        self.write(|table| {
            let deleted = table.rows.len() as u64;
            table.rows.clear();
            deleted
        })
    }

    async fn year_span(&self) -> StoreResult<Option<YearSpan>> {
        self.read(|table| {
            let mut years = table.rows.values().map(|b| b.year);
            let first = years.next()?;
            let (earliest, latest) =
                years.fold((first, first), |(lo, hi), y| (lo.min(y), hi.max(y)));
            Some(YearSpan { earliest, latest })
        })
    }

    async fn century_counts(&self) -> StoreResult<Vec<(i64, u64)>> {
        self.read(|table| {
            let mut buckets: BTreeMap<i64, u64> = BTreeMap::new();
            for battle in table.rows.values() {
                *buckets.entry(century_of(battle.year)).or_default() += 1;
            }
            buckets.into_iter().collect()
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_battle(name: &str, year: i32) -> NewBattle {
        NewBattle {
            name: name.to_string(),
            year,
            latitude: 46.0,
            longitude: 2.0,
            description: None,
            participants: Some("Royaume de France contre Royaume d'Angleterre".to_string()),
            outcome: None,
            historical_context: None,
            sources: None,
            image_url: None,
            media_urls: None,
        }
    }

    #[tokio::test]
    async fn test_insert_assigns_sequential_ids() -> StoreResult<()> {
        let store = InMemoryBattleStore::new();
        let inserted = store
            .insert_batch(&[new_battle("Bataille de Tours", 732), new_battle("Siège d'Orléans", 1429)])
            .await?;
        assert_eq!(inserted, 2);
        let all = store.query(&BattleFilter::new()).await?;
        assert_eq!(all.iter().map(|b| b.id).collect::<Vec<_>>(), vec![1, 2]);
        Ok(())
    }

    #[tokio::test]
    async fn test_ids_not_reused_after_delete_all() -> StoreResult<()> {
        let store = InMemoryBattleStore::new();
        store.insert_batch(&[new_battle("Bataille de Tours", 732)]).await?;
        assert_eq!(store.delete_all().await?, 1);
        store.insert_batch(&[new_battle("Bataille de Caen", 1944)]).await?;
        let all = store.query(&BattleFilter::new()).await?;
        assert_eq!(all[0].id, 2);
        Ok(())
    }

    #[tokio::test]
    async fn test_query_pages_after_filtering() -> StoreResult<()> {
        let store = InMemoryBattleStore::new();
        let batch: Vec<NewBattle> = (0..10)
            .map(|i| new_battle(if i % 2 == 0 { "Assaut de Nice" } else { "Bataille de Lyon" }, 1800 + i))
            .collect();
        store.insert_batch(&batch).await?;

        let filter = BattleFilter::new().name_prefix("Assaut").page(1, 2);
        let page = store.query(&filter).await?;
        assert_eq!(page.iter().map(|b| b.year).collect::<Vec<_>>(), vec![1802, 1804]);
        assert_eq!(store.count(&filter).await?, 5);
        Ok(())
    }

    #[tokio::test]
    async fn test_update_missing_is_not_found() -> StoreResult<()> {
        let store = InMemoryBattleStore::new();
        let ghost = new_battle("Bataille de Reims", 1814).with_id(99);
        assert_eq!(store.update(&ghost).await, Err(StoreError::NotFound { id: 99 }));
        Ok(())
    }

    #[tokio::test]
    async fn test_update_replaces_fields() -> StoreResult<()> {
        let store = InMemoryBattleStore::new();
        store.insert_batch(&[new_battle("Bataille de Reims", 1814)]).await?;
        let mut battle = store.get(1).await?.ok_or(StoreError::NotFound { id: 1 })?;
        battle.historical_context = Some("contexte".to_string());
        store.update(&battle).await?;
        assert_eq!(store.get(1).await?, Some(battle));
        Ok(())
    }

    #[tokio::test]
    async fn test_aggregates_on_empty_store() -> StoreResult<()> {
        let store = InMemoryBattleStore::new();
        assert_eq!(store.year_span().await?, None);
        assert!(store.century_counts().await?.is_empty());
        Ok(())
    }

    #[tokio::test]
    async fn test_century_counts_floor_negative_years() -> StoreResult<()> {
        let store = InMemoryBattleStore::new();
        store
            .insert_batch(&[
                new_battle("Bataille d'Alésia", -52),
                new_battle("Bataille de Gergovie", -150),
                new_battle("Bataille de Bouvines", 1214),
                new_battle("Bataille de Muret", 1213),
            ])
            .await?;
        assert_eq!(
            store.century_counts().await?,
            vec![(-200, 1), (-100, 1), (1200, 2)]
        );
        assert_eq!(
            store.year_span().await?,
            Some(YearSpan { earliest: -150, latest: 1214 })
        );
        Ok(())
    }

    #[tokio::test]
    async fn test_century_counts_at_year_bounds() -> StoreResult<()> {
        let store = InMemoryBattleStore::new();
        store
            .insert_batch(&[
                new_battle("Bataille des confins", i32::MIN),
                new_battle("Bataille du lointain", i32::MAX),
            ])
            .await?;
        assert_eq!(
            store.century_counts().await?,
            vec![(-2_147_483_700, 1), (2_147_483_600, 1)]
        );
        Ok(())
    }
}
