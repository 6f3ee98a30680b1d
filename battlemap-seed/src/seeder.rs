//! Wipe-and-reload seeding.

use battlemap_core::{GenerationPeriod, SeedError, GENERATION_PERIODS};
use battlemap_storage::BattleStore;
use rand::Rng;

use crate::generator::BattleGenerator;

/// Default number of battles per insert transaction.
pub const DEFAULT_BATCH_SIZE: usize = 100;

/// Seeding parameters.
#[derive(Debug, Clone)]
pub struct SeedConfig {
    pub batch_size: usize,
    pub periods: Vec<GenerationPeriod>,
}

impl Default for SeedConfig {
    fn default() -> Self {
        Self {
            batch_size: DEFAULT_BATCH_SIZE,
            periods: GENERATION_PERIODS.to_vec(),
        }
    }
}

impl SeedConfig {
    pub fn with_batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = batch_size;
        self
    }

    pub fn with_periods(mut self, periods: Vec<GenerationPeriod>) -> Self {
        self.periods = periods;
        self
    }

    /// Number of battles a full run inserts.
    pub fn target_total(&self) -> u64 {
        self.periods.iter().map(|p| p.count).sum()
    }
}

/// Outcome of a successful seeding run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeedReport {
    /// Rows removed before generation.
    pub deleted: u64,
    /// Rows inserted across all periods.
    pub inserted: u64,
    /// Rows inserted per period label, in generation order.
    pub per_period: Vec<(&'static str, u64)>,
}

/// Replace the whole catalog with generated battles.
///
/// Deletes every existing row, then inserts each period's battles in
/// batches. A failed batch aborts the run; batches committed before it
/// stay in the store.
pub async fn seed<R>(
    store: &dyn BattleStore,
    rng: R,
    config: &SeedConfig,
) -> Result<SeedReport, SeedError>
where
    R: Rng + Send,
{
    let target = config.target_total();
    tracing::info!(target_total = target, "Deleting existing battles");
    let deleted = store.delete_all().await.map_err(SeedError::Wipe)?;
    tracing::info!(deleted, "Cleared existing data");

    let batch_size = config.batch_size.max(1);
    let mut generator = BattleGenerator::new(rng);
    let mut inserted = 0u64;
    let mut per_period = Vec::with_capacity(config.periods.len());

    for period in &config.periods {
        tracing::info!(period = period.label, count = period.count, "Generating period");
        let mut created = 0u64;

        while created < period.count {
            let size = usize::try_from(period.count - created)
                .map_or(batch_size, |remaining| remaining.min(batch_size));
            let batch = generator.batch(period, size);

            match store.insert_batch(&batch).await {
                Ok(_) => {
                    created += batch.len() as u64;
                    inserted += batch.len() as u64;
                    tracing::info!(
                        inserted,
                        target_total = target,
                        period = period.label,
                        "Batch committed"
                    );
                }
                Err(source) => {
                    tracing::error!(period = period.label, error = %source, "Batch insert failed");
                    return Err(SeedError::Batch {
                        period: period.label.to_string(),
                        inserted,
                        source,
                    });
                }
            }
        }
        per_period.push((period.label, created));
    }

    tracing::info!(inserted, "Seeding complete");
    Ok(SeedReport {
        deleted,
        inserted,
        per_period,
    })
}

/// Seed only when the store is empty, unless `force` is set.
///
/// Returns `None` when seeding was skipped.
pub async fn seed_if_empty<R>(
    store: &dyn BattleStore,
    rng: R,
    config: &SeedConfig,
    force: bool,
) -> Result<Option<SeedReport>, SeedError>
where
    R: Rng + Send,
{
    if !force {
        let existing = store
            .count(&Default::default())
            .await
            .map_err(SeedError::Probe)?;
        if existing > 0 {
            tracing::info!(existing, "Store already populated, skipping seed");
            return Ok(None);
        }
    }
    seed(store, rng, config).await.map(Some)
}
