//! Cache namespaces and keys.

use std::fmt;
use std::time::Duration;

/// A group of cache entries sharing a TTL and an invalidation scope.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CacheNamespace {
    /// Landing page HTML
    Homepage,
    /// Unpaginated `/api/battles` responses
    LegacyList,
    /// Paginated `/api/v1/battles` responses
    List,
    /// Single battle by id
    Battle,
    /// `/api/v1/statistics`
    Statistics,
}

impl CacheNamespace {
    pub const ALL: [CacheNamespace; 5] = [
        CacheNamespace::Homepage,
        CacheNamespace::LegacyList,
        CacheNamespace::List,
        CacheNamespace::Battle,
        CacheNamespace::Statistics,
    ];

    /// Namespaces dropped by an explicit cache clear.
    pub const CLEARABLE: [CacheNamespace; 3] = [
        CacheNamespace::LegacyList,
        CacheNamespace::List,
        CacheNamespace::Homepage,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            CacheNamespace::Homepage => "homepage",
            CacheNamespace::LegacyList => "legacy_list",
            CacheNamespace::List => "list",
            CacheNamespace::Battle => "battle",
            CacheNamespace::Statistics => "statistics",
        }
    }

    pub fn default_ttl(&self) -> Duration {
        match self {
            CacheNamespace::Homepage | CacheNamespace::Statistics => Duration::from_secs(3600),
            CacheNamespace::LegacyList | CacheNamespace::List | CacheNamespace::Battle => {
                Duration::from_secs(300)
            }
        }
    }
}

impl fmt::Display for CacheNamespace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Namespace plus a discriminator derived from the request.
///
/// Two requests share an entry only if their normalized parameters are
/// equal, so the discriminator must be built from parsed values rather
/// than the raw query string.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey {
    namespace: CacheNamespace,
    discriminator: String,
}

impl CacheKey {
    pub fn new(namespace: CacheNamespace, discriminator: impl Into<String>) -> Self {
        Self {
            namespace,
            discriminator: discriminator.into(),
        }
    }

    /// Key for a namespace holding a single entry.
    pub fn singleton(namespace: CacheNamespace) -> Self {
        Self::new(namespace, "")
    }

    pub fn namespace(&self) -> CacheNamespace {
        self.namespace
    }

    pub fn discriminator(&self) -> &str {
        &self.discriminator
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.namespace, self.discriminator)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clearable_excludes_battle_and_statistics() {
        assert!(!CacheNamespace::CLEARABLE.contains(&CacheNamespace::Battle));
        assert!(!CacheNamespace::CLEARABLE.contains(&CacheNamespace::Statistics));
    }

    #[test]
    fn test_default_ttls() {
        assert_eq!(CacheNamespace::List.default_ttl(), Duration::from_secs(300));
        assert_eq!(CacheNamespace::Statistics.default_ttl(), Duration::from_secs(3600));
    }

    #[test]
    fn test_key_display() {
        let key = CacheKey::new(CacheNamespace::Battle, "42");
        assert_eq!(key.to_string(), "battle:42");
        assert_eq!(CacheKey::singleton(CacheNamespace::Homepage).to_string(), "homepage:");
    }
}
