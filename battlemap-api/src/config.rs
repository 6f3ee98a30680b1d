//! API Configuration Module
//!
//! Configuration for CORS, the bind address, the store backend, startup
//! seeding and the response cache. Values are loaded from environment
//! variables with sensible defaults for development.

use std::net::SocketAddr;
use std::time::Duration;

use battlemap_storage::{CacheConfig, CacheNamespace};

use crate::error::{ApiError, ApiResult};

// ============================================================================
// STORE BACKEND
// ============================================================================

/// Which [`BattleStore`](battlemap_storage::BattleStore) the server runs on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StoreBackend {
    #[default]
    Postgres,
    /// Process-local store, lost on restart.
    Memory,
}

impl StoreBackend {
    fn parse(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "postgres" | "postgresql" | "pg" => Some(StoreBackend::Postgres),
            "memory" | "in-memory" | "mem" => Some(StoreBackend::Memory),
            _ => None,
        }
    }
}

// ============================================================================
// API CONFIGURATION
// ============================================================================

/// API configuration.
#[derive(Debug, Clone)]
pub struct ApiConfig {
    // ========================================================================
    // CORS Configuration
    // ========================================================================
    /// Allowed CORS origins (comma-separated in env var).
    /// Empty means allow all origins.
    pub cors_origins: Vec<String>,

    /// Whether to allow credentials in CORS requests.
    pub cors_allow_credentials: bool,

    /// Max age for CORS preflight cache in seconds.
    pub cors_max_age_secs: u64,

    // ========================================================================
    // Server Configuration
    // ========================================================================
    pub host: String,
    pub port: u16,

    // ========================================================================
    // Data Configuration
    // ========================================================================
    pub store: StoreBackend,

    /// Reseed at startup even when the store already holds battles.
    pub force_reseed: bool,

    pub cache: CacheConfig,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            cors_origins: Vec::new(), // Empty = allow all
            cors_allow_credentials: false,
            cors_max_age_secs: 86400, // 24 hours
            host: "0.0.0.0".to_string(),
            port: 5000,
            store: StoreBackend::default(),
            force_reseed: false,
            cache: CacheConfig::default(),
        }
    }
}

impl ApiConfig {
    /// Create ApiConfig from environment variables.
    ///
    /// Environment variables:
    /// - `BATTLEMAP_CORS_ORIGINS`: Comma-separated allowed origins (empty = allow all)
    /// - `BATTLEMAP_CORS_ALLOW_CREDENTIALS`: "true" or "false" (default: false)
    /// - `BATTLEMAP_CORS_MAX_AGE_SECS`: Preflight cache duration (default: 86400)
    /// - `BATTLEMAP_API_BIND`: Bind host (default: 0.0.0.0)
    /// - `PORT` or `BATTLEMAP_API_PORT`: Bind port (default: 5000)
    /// - `BATTLEMAP_STORE`: "postgres" or "memory" (default: postgres)
    /// - `BATTLEMAP_FORCE_RESEED`: "true" to reseed a populated store (default: false)
    /// - `BATTLEMAP_CACHE_MAX_ENTRIES`: Cache entry threshold (default: 1000)
    /// - `BATTLEMAP_CACHE_TTL_<NAMESPACE>_SECS`: TTL override per namespace,
    ///   e.g. `BATTLEMAP_CACHE_TTL_LIST_SECS`
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build the configuration from any key lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();

        let cors_origins = lookup("BATTLEMAP_CORS_ORIGINS")
            .map(|s| {
                s.split(',')
                    .map(|o| o.trim().to_string())
                    .filter(|o| !o.is_empty())
                    .collect()
            })
            .unwrap_or_default();

        let cors_allow_credentials = lookup("BATTLEMAP_CORS_ALLOW_CREDENTIALS")
            .map(|s| s.to_lowercase() == "true")
            .unwrap_or(false);

        let cors_max_age_secs = lookup("BATTLEMAP_CORS_MAX_AGE_SECS")
            .and_then(|s| s.parse().ok())
            .unwrap_or(defaults.cors_max_age_secs);

        let host = lookup("BATTLEMAP_API_BIND").unwrap_or(defaults.host);
        let port = lookup("PORT")
            .or_else(|| lookup("BATTLEMAP_API_PORT"))
            .and_then(|s| s.parse().ok())
            .unwrap_or(defaults.port);

        let store = match lookup("BATTLEMAP_STORE") {
            Some(value) => StoreBackend::parse(&value).unwrap_or_else(|| {
                tracing::warn!(value = %value, "Unknown BATTLEMAP_STORE, using postgres");
                StoreBackend::Postgres
            }),
            None => defaults.store,
        };

        let force_reseed = lookup("BATTLEMAP_FORCE_RESEED")
            .map(|s| matches!(s.to_lowercase().as_str(), "true" | "1"))
            .unwrap_or(false);

        let mut cache = CacheConfig::new();
        if let Some(max) = lookup("BATTLEMAP_CACHE_MAX_ENTRIES").and_then(|s| s.parse().ok()) {
            cache = cache.with_max_entries(max);
        }
        for namespace in CacheNamespace::ALL {
            let key = format!(
                "BATTLEMAP_CACHE_TTL_{}_SECS",
                namespace.as_str().to_uppercase()
            );
            if let Some(secs) = lookup(&key).and_then(|s| s.parse().ok()) {
                cache = cache.with_ttl(namespace, Duration::from_secs(secs));
            }
        }

        Self {
            cors_origins,
            cors_allow_credentials,
            cors_max_age_secs,
            host,
            port,
            store,
            force_reseed,
            cache,
        }
    }

    /// Resolve the socket address to listen on.
    pub fn bind_addr(&self) -> ApiResult<SocketAddr> {
        let addr = format!("{}:{}", self.host, self.port);
        addr.parse::<SocketAddr>()
            .map_err(|e| ApiError::invalid_input(format!("Invalid bind address {}: {}", addr, e)))
    }

    /// Whether CORS is restricted to configured origins.
    pub fn is_production(&self) -> bool {
        !self.cors_origins.is_empty()
    }
}
