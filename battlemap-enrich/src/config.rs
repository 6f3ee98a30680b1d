//! Enrichment configuration.

use std::time::Duration;

/// Default User-Agent sent to external sources.
pub const DEFAULT_USER_AGENT: &str = concat!("battlemap/", env!("CARGO_PKG_VERSION"));

/// Characters of extracted text appended per source.
pub const DEFAULT_EXTRACT_LIMIT: usize = 500;

/// Settings for the external fetch step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnrichConfig {
    /// User-Agent header for outgoing requests.
    pub user_agent: String,
    /// Per-request timeout. `None` leaves the client default (no timeout).
    pub fetch_timeout: Option<Duration>,
    /// Maximum characters of extracted text kept per source.
    pub extract_limit: usize,
}

impl Default for EnrichConfig {
    fn default() -> Self {
        Self {
            user_agent: DEFAULT_USER_AGENT.to_string(),
            fetch_timeout: None,
            extract_limit: DEFAULT_EXTRACT_LIMIT,
        }
    }
}

impl EnrichConfig {
    /// Create EnrichConfig from environment variables.
    ///
    /// Environment variables:
    /// - `BATTLEMAP_USER_AGENT`: User-Agent header (default: `battlemap/<version>`)
    /// - `BATTLEMAP_FETCH_TIMEOUT_SECS`: Per-request timeout (default: none)
    /// - `BATTLEMAP_EXTRACT_LIMIT`: Characters kept per source (default: 500)
    pub fn from_env() -> Self {
        let defaults = Self::default();

        let user_agent = std::env::var("BATTLEMAP_USER_AGENT")
            .ok()
            .filter(|s| !s.trim().is_empty())
            .unwrap_or(defaults.user_agent);

        let fetch_timeout = std::env::var("BATTLEMAP_FETCH_TIMEOUT_SECS")
            .ok()
            .and_then(|s| s.parse::<u64>().ok())
            .filter(|secs| *secs > 0)
            .map(Duration::from_secs);

        let extract_limit = std::env::var("BATTLEMAP_EXTRACT_LIMIT")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(defaults.extract_limit);

        Self {
            user_agent,
            fetch_timeout,
            extract_limit,
        }
    }
}
