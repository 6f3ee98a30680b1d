//! Catalog statistics payload.

use crate::{BattleType, YearSpan};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Century bucket of a year: `floor(year / 100) * 100`.
///
/// Negative years round toward negative infinity, so -52 lands in -100.
/// Returned as `i64`: the bucket of a year near `i32::MIN` lies below it.
pub fn century_of(year: i32) -> i64 {
    i64::from(year).div_euclid(100) * 100
}

/// Earliest and latest year; both null on an empty catalog.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct TimeSpan {
    pub earliest: Option<i32>,
    pub latest: Option<i32>,
}

impl From<Option<YearSpan>> for TimeSpan {
    fn from(span: Option<YearSpan>) -> Self {
        match span {
            Some(span) => Self {
                earliest: Some(span.earliest),
                latest: Some(span.latest),
            },
            None => Self::default(),
        }
    }
}

/// Aggregate statistics over the whole catalog.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct BattleStatistics {
    pub total_battles: u64,
    pub time_span: TimeSpan,
    /// Type label to count; zero counts omitted
    pub types_distribution: IndexMap<String, u64>,
    /// Century start year, as a string key, to count
    pub century_distribution: IndexMap<String, u64>,
}

impl BattleStatistics {
    /// Assemble the payload, dropping empty type buckets and ordering
    /// centuries ascending.
    pub fn new(
        total_battles: u64,
        span: Option<YearSpan>,
        type_counts: impl IntoIterator<Item = (BattleType, u64)>,
        century_counts: impl IntoIterator<Item = (i64, u64)>,
    ) -> Self {
        let types_distribution = type_counts
            .into_iter()
            .filter(|(_, count)| *count > 0)
            .map(|(kind, count)| (kind.label().to_string(), count))
            .collect();

        let mut centuries: Vec<(i64, u64)> = century_counts
            .into_iter()
            .filter(|(_, count)| *count > 0)
            .collect();
        centuries.sort_by_key(|(century, _)| *century);
        let century_distribution = centuries
            .into_iter()
            .map(|(century, count)| (century.to_string(), count))
            .collect();

        Self {
            total_battles,
            time_span: span.into(),
            types_distribution,
            century_distribution,
        }
    }
}
