//! Statistics aggregation over a battle store.

use battlemap_core::{BattleFilter, BattleStatistics, BattleType};

use crate::store::{BattleStore, StoreResult};

/// Compute catalog statistics with a handful of aggregate store calls.
///
/// Type buckets count names starting with each label; a name matching no
/// label contributes to the total only.
pub async fn aggregate(store: &dyn BattleStore) -> StoreResult<BattleStatistics> {
    let total = store.count(&BattleFilter::new()).await?;
    let span = store.year_span().await?;

    let mut type_counts = Vec::with_capacity(BattleType::ALL.len());
    for kind in BattleType::ALL {
        let filter = BattleFilter::new().name_prefix(kind.label());
        type_counts.push((kind, store.count(&filter).await?));
    }

    let centuries = store.century_counts().await?;
    Ok(BattleStatistics::new(total, span, type_counts, centuries))
}
