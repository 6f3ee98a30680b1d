//! Seeding runs against the in-memory and fault-injecting stores.

use battlemap_core::{BattleFilter, GenerationPeriod, SeedError, GENERATION_PERIODS};
use battlemap_seed::{seed, seed_if_empty, SeedConfig};
use battlemap_test_utils::assertions::{assert_conventional_name, assert_within_mainland_france};
use battlemap_test_utils::{fixtures, BattleStore, FaultyStore, InMemoryBattleStore};
use rand::rngs::StdRng;
use rand::SeedableRng;

fn small_periods() -> Vec<GenerationPeriod> {
    vec![
        GenerationPeriod {
            start_year: -100,
            end_year: 0,
            count: 7,
            label: "Antiquité",
        },
        GenerationPeriod {
            start_year: 1789,
            end_year: 1815,
            count: 5,
            label: "Période Révolutionnaire",
        },
    ]
}

#[tokio::test]
async fn test_full_seed_inserts_every_period() -> Result<(), SeedError> {
    let store = InMemoryBattleStore::new();
    let report = seed(&store, StdRng::seed_from_u64(42), &SeedConfig::default()).await?;

    assert_eq!(report.deleted, 0);
    assert_eq!(report.inserted, 15_000);
    assert_eq!(store.len(), Ok(15_000));

    let expected: Vec<(&str, u64)> = GENERATION_PERIODS.iter().map(|p| (p.label, p.count)).collect();
    assert_eq!(report.per_period, expected);

    let antiquity = store
        .count(&BattleFilter::new().years(Some(-100), Some(0)))
        .await
        .map_err(SeedError::Probe)?;
    assert_eq!(antiquity, 600);
    Ok(())
}

#[tokio::test]
async fn test_seed_replaces_existing_rows() -> Result<(), SeedError> {
    let store = fixtures::populated_store().await.map_err(SeedError::Probe)?;
    let config = SeedConfig::default().with_periods(small_periods()).with_batch_size(3);

    let report = seed(&store, StdRng::seed_from_u64(7), &config).await?;
    assert_eq!(report.deleted, 6);
    assert_eq!(report.inserted, 12);

    let battles = store
        .query(&BattleFilter::new())
        .await
        .map_err(SeedError::Probe)?;
    assert_eq!(battles.len(), 12);
    for battle in &battles {
        assert!(battle.id > 6, "ids are never reused after a wipe");
        assert!(small_periods().iter().any(|p| p.contains(battle.year)));
        assert_conventional_name(&battle.name);
        assert_within_mainland_france(battle);
        assert!(battle.historical_context.is_none());
    }
    Ok(())
}

#[tokio::test]
async fn test_failed_batch_keeps_committed_batches() {
    let store = FaultyStore::new();
    store.fail_batches_after(2);
    let config = SeedConfig::default().with_periods(small_periods()).with_batch_size(3);

    let result = seed(&store, StdRng::seed_from_u64(1), &config).await;
    match result {
        Err(SeedError::Batch {
            period, inserted, ..
        }) => {
            assert_eq!(period, "Antiquité");
            assert_eq!(inserted, 6);
        }
        other => panic!("expected batch failure, got {:?}", other),
    }
    assert_eq!(store.inner().len(), Ok(6));
}

#[tokio::test]
async fn test_seed_if_empty_skips_populated_store() -> Result<(), SeedError> {
    let store = fixtures::populated_store().await.map_err(SeedError::Probe)?;
    let config = SeedConfig::default().with_periods(small_periods());

    let skipped = seed_if_empty(&store, StdRng::seed_from_u64(3), &config, false).await?;
    assert!(skipped.is_none());
    assert_eq!(store.len(), Ok(6));

    let forced = seed_if_empty(&store, StdRng::seed_from_u64(3), &config, true).await?;
    assert_eq!(forced.map(|r| r.inserted), Some(12));
    assert_eq!(store.len(), Ok(12));
    Ok(())
}

#[tokio::test]
async fn test_seed_if_empty_reports_probe_failure() {
    let store = FaultyStore::new();
    store.fail_reads(true);
    let result = seed_if_empty(&store, StdRng::seed_from_u64(3), &SeedConfig::default(), false).await;
    assert!(matches!(result, Err(SeedError::Probe(_))));
}
