//! BATTLEMAP Core - Entity Types
//!
//! Pure data structures shared by every other crate: the battle record,
//! its structured enrichment fields, the fixed battle type labels and the
//! period tables the generator and the enrichment pipeline both consult.

pub mod error;
pub mod period;
pub mod stats;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

pub use error::{
    EnrichError, FetchError, SeedError, StoreError,
};
pub use period::{
    period_context, period_details, persee_period_keyword, sample_image_url, sample_media,
    GenerationPeriod, MediaEra, PeriodArchive, PeriodDetails, GENERATION_PERIODS,
    TOTAL_GENERATED_BATTLES,
};
pub use stats::{century_of, BattleStatistics, TimeSpan};

// ============================================================================
// IDENTITY TYPES
// ============================================================================

/// Surrogate key assigned by the store. Immutable once assigned.
pub type BattleId = i64;

// ============================================================================
// BATTLE TYPE LABELS
// ============================================================================

/// The five engagement labels a battle name may start with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub enum BattleType {
    Bataille,
    #[serde(rename = "Siège")]
    Siege,
    Escarmouche,
    #[serde(rename = "Défense")]
    Defense,
    Assaut,
}

impl BattleType {
    /// All labels, in the order statistics report them.
    pub const ALL: [BattleType; 5] = [
        BattleType::Bataille,
        BattleType::Siege,
        BattleType::Escarmouche,
        BattleType::Defense,
        BattleType::Assaut,
    ];

    /// The label as it appears at the start of a battle name.
    pub fn label(&self) -> &'static str {
        match self {
            BattleType::Bataille => "Bataille",
            BattleType::Siege => "Siège",
            BattleType::Escarmouche => "Escarmouche",
            BattleType::Defense => "Défense",
            BattleType::Assaut => "Assaut",
        }
    }

    /// Parse an exact label.
    pub fn from_label(label: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|t| t.label() == label)
    }

    /// Detect the type from the leading word of a battle name.
    pub fn from_name(name: &str) -> Option<Self> {
        name.split(' ').next().and_then(Self::from_label)
    }
}

impl std::fmt::Display for BattleType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

// ============================================================================
// GEOGRAPHY
// ============================================================================

/// Latitude/longitude rectangle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
    pub min_latitude: f64,
    pub max_latitude: f64,
    pub min_longitude: f64,
    pub max_longitude: f64,
}

impl BoundingBox {
    pub fn contains(&self, latitude: f64, longitude: f64) -> bool {
        (self.min_latitude..=self.max_latitude).contains(&latitude)
            && (self.min_longitude..=self.max_longitude).contains(&longitude)
    }
}

/// Mainland France. The generator places every battle inside it; the store
/// does not enforce it.
pub const MAINLAND_FRANCE: BoundingBox = BoundingBox {
    min_latitude: 42.333333,
    max_latitude: 51.083333,
    min_longitude: -4.833333,
    max_longitude: 8.233333,
};

// ============================================================================
// ENRICHMENT FIELD TYPES
// ============================================================================

/// Kind of a media entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "lowercase")]
pub enum MediaKind {
    Image,
}

/// One media link attached to a battle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct MediaEntry {
    pub url: String,
    #[serde(rename = "type")]
    pub kind: MediaKind,
}

impl MediaEntry {
    pub fn image(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            kind: MediaKind::Image,
        }
    }
}

/// Ordered mapping of source name to URL.
///
/// Serialized as a plain JSON object; insertion order is preserved so the
/// generic sources always precede the period-specific archive.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SourceLinks(IndexMap<String, String>);

impl SourceLinks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace a link, keeping the original position on replace.
    pub fn insert(&mut self, name: impl Into<String>, url: impl Into<String>) {
        self.0.insert(name.into(), url.into());
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.0.get(name).map(String::as_str)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

// ============================================================================
// BATTLE ENTITY
// ============================================================================

/// A stored battle record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct Battle {
    /// Surrogate key
    pub id: BattleId,
    /// `<Type> <preposition><Place>`
    pub name: String,
    /// Negative for BCE
    pub year: i32,
    pub latitude: f64,
    pub longitude: f64,
    pub description: Option<String>,
    /// `"<A> contre <B>"`
    pub participants: Option<String>,
    pub outcome: Option<String>,
    pub historical_context: Option<String>,
    /// Source name to URL, set by enrichment
    #[cfg_attr(feature = "openapi", schema(value_type = Option<Object>))]
    pub sources: Option<SourceLinks>,
    pub image_url: Option<String>,
    pub media_urls: Option<Vec<MediaEntry>>,
}

impl Battle {
    /// Type label detected from the leading word of the name.
    pub fn battle_type(&self) -> Option<BattleType> {
        BattleType::from_name(&self.name)
    }

    pub fn is_within_mainland_france(&self) -> bool {
        MAINLAND_FRANCE.contains(self.latitude, self.longitude)
    }

    /// True once enrichment has written its text fields.
    pub fn is_enriched(&self) -> bool {
        self.historical_context.is_some() && self.sources.is_some()
    }
}

/// Insert payload: a battle without its surrogate key.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewBattle {
    pub name: String,
    pub year: i32,
    pub latitude: f64,
    pub longitude: f64,
    pub description: Option<String>,
    pub participants: Option<String>,
    pub outcome: Option<String>,
    pub historical_context: Option<String>,
    pub sources: Option<SourceLinks>,
    pub image_url: Option<String>,
    pub media_urls: Option<Vec<MediaEntry>>,
}

impl NewBattle {
    /// Attach the key the store assigned.
    pub fn with_id(self, id: BattleId) -> Battle {
        Battle {
            id,
            name: self.name,
            year: self.year,
            latitude: self.latitude,
            longitude: self.longitude,
            description: self.description,
            participants: self.participants,
            outcome: self.outcome,
            historical_context: self.historical_context,
            sources: self.sources,
            image_url: self.image_url,
            media_urls: self.media_urls,
        }
    }
}

// ============================================================================
// QUERY TYPES
// ============================================================================

/// Filters accepted by store queries. `offset`/`limit` are ignored by counts.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct BattleFilter {
    /// Inclusive lower bound on `year`
    pub start_year: Option<i32>,
    /// Inclusive upper bound on `year`
    pub end_year: Option<i32>,
    /// Case-sensitive prefix of `name`
    pub name_prefix: Option<String>,
    pub offset: u64,
    /// `None` means unbounded
    pub limit: Option<u64>,
}

impl BattleFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn years(mut self, start: Option<i32>, end: Option<i32>) -> Self {
        self.start_year = start;
        self.end_year = end;
        self
    }

    pub fn name_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.name_prefix = Some(prefix.into());
        self
    }

    pub fn page(mut self, offset: u64, limit: u64) -> Self {
        self.offset = offset;
        self.limit = Some(limit);
        self
    }

    /// Whether a record passes the year and name filters.
    pub fn matches(&self, battle: &Battle) -> bool {
        self.start_year.map_or(true, |lo| battle.year >= lo)
            && self.end_year.map_or(true, |hi| battle.year <= hi)
            && self
                .name_prefix
                .as_deref()
                .map_or(true, |prefix| battle.name.starts_with(prefix))
    }
}

/// Earliest and latest year present in the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct YearSpan {
    pub earliest: i32,
    pub latest: i32,
}
