//! Request and response types for the REST surface.
//!
//! Query parameters arrive as raw strings and are parsed leniently: a value
//! that is not an integer behaves as if it were absent.

use battlemap_core::Battle;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

// ============================================================================
// PAGINATION CONSTANTS
// ============================================================================

/// Page size when `limit` is absent or unparseable.
pub const DEFAULT_PAGE_LIMIT: i64 = 100;

/// Upper bound applied to `limit`.
pub const MAX_PAGE_LIMIT: i64 = 1000;

/// Lower year bound of the legacy list when `start_year` is absent.
pub const LEGACY_DEFAULT_START_YEAR: i32 = 0;

/// Upper year bound of the legacy list when `end_year` is absent.
pub const LEGACY_DEFAULT_END_YEAR: i32 = 2025;

/// Parse an optional raw query value, treating garbage as absent.
pub fn lenient_int<T: std::str::FromStr>(raw: Option<&str>) -> Option<T> {
    raw.and_then(|value| value.trim().parse().ok())
}

// ============================================================================
// QUERY PARAMETERS
// ============================================================================

/// Query string of `GET /api/v1/battles`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[derive(utoipa::IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ListBattlesParams {
    /// Inclusive lower year bound
    #[param(value_type = Option<i32>)]
    pub start_year: Option<String>,
    /// Inclusive upper year bound
    #[param(value_type = Option<i32>)]
    pub end_year: Option<String>,
    /// Name prefix, e.g. `Siège`
    #[serde(rename = "type")]
    pub battle_type: Option<String>,
    /// Page size, default 100, at most 1000
    #[param(value_type = Option<i64>)]
    pub limit: Option<String>,
    /// Rows to skip, negative values count as 0
    #[param(value_type = Option<i64>)]
    pub offset: Option<String>,
}

/// Normalized form of [`ListBattlesParams`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListQuery {
    pub start_year: Option<i32>,
    pub end_year: Option<i32>,
    pub name_prefix: Option<String>,
    pub limit: u64,
    pub offset: u64,
}

impl ListBattlesParams {
    pub fn normalize(&self) -> ListQuery {
        let limit = lenient_int::<i64>(self.limit.as_deref())
            .unwrap_or(DEFAULT_PAGE_LIMIT)
            .clamp(0, MAX_PAGE_LIMIT);
        let offset = lenient_int::<i64>(self.offset.as_deref())
            .unwrap_or(0)
            .max(0);
        ListQuery {
            start_year: lenient_int(self.start_year.as_deref()),
            end_year: lenient_int(self.end_year.as_deref()),
            name_prefix: self
                .battle_type
                .as_deref()
                .filter(|prefix| !prefix.is_empty())
                .map(str::to_string),
            limit: limit as u64,
            offset: offset as u64,
        }
    }
}

impl ListQuery {
    /// Cache discriminator; equal queries map to the same entry.
    pub fn cache_discriminator(&self) -> String {
        format!(
            "start={}&end={}&type={}&limit={}&offset={}",
            fmt_bound(self.start_year),
            fmt_bound(self.end_year),
            self.name_prefix.as_deref().unwrap_or(""),
            self.limit,
            self.offset
        )
    }
}

fn fmt_bound(bound: Option<i32>) -> String {
    bound.map(|year| year.to_string()).unwrap_or_default()
}

/// Query string of the legacy `GET /api/battles`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[derive(utoipa::IntoParams)]
#[into_params(parameter_in = Query)]
pub struct LegacyListParams {
    /// Inclusive lower year bound, default 0
    #[param(value_type = Option<i32>)]
    pub start_year: Option<String>,
    /// Inclusive upper year bound, default 2025
    #[param(value_type = Option<i32>)]
    pub end_year: Option<String>,
}

impl LegacyListParams {
    /// Year bounds with the legacy defaults applied.
    pub fn bounds(&self) -> (i32, i32) {
        (
            lenient_int(self.start_year.as_deref()).unwrap_or(LEGACY_DEFAULT_START_YEAR),
            lenient_int(self.end_year.as_deref()).unwrap_or(LEGACY_DEFAULT_END_YEAR),
        )
    }
}

// ============================================================================
// RESPONSES
// ============================================================================

/// One page of the v1 battle list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[derive(utoipa::ToSchema)]
pub struct BattleListResponse {
    /// Rows matching the filters, ignoring pagination
    pub total: u64,
    pub offset: u64,
    /// Effective page size after clamping
    pub limit: u64,
    pub battles: Vec<Battle>,
}

/// Result of `POST /api/battles/{id}/enrich`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[derive(utoipa::ToSchema)]
pub struct EnrichResponse {
    pub message: String,
    pub battle: Battle,
}

/// Plain acknowledgement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[derive(utoipa::ToSchema)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Description of one documented endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[derive(utoipa::ToSchema)]
pub struct EndpointDoc {
    pub description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parameters: Option<IndexMap<String, String>>,
}

/// Body of `GET /api/docs`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[derive(utoipa::ToSchema)]
pub struct ApiDocsResponse {
    pub version: String,
    pub description: String,
    pub endpoints: IndexMap<String, EndpointDoc>,
}
