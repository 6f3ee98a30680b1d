//! OpenAPI Document for BATTLEMAP API
//!
//! Generated with utoipa from the route annotations and the schema derives
//! on the response types.

use utoipa::OpenApi;

use crate::error::{ApiError, ErrorCode};
use crate::routes::{battles, cache, docs, enrich, health, homepage, legacy, statistics};
use crate::types::{
    ApiDocsResponse, BattleListResponse, EndpointDoc, EnrichResponse, MessageResponse,
};

use battlemap_core::{Battle, BattleStatistics, BattleType, MediaEntry, MediaKind, TimeSpan};

/// OpenAPI document for BATTLEMAP API.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "BATTLEMAP API",
        version = "1.0",
        description = "API publique des batailles historiques françaises",
        license(name = "MIT", url = "https://opensource.org/licenses/MIT")
    ),
    servers(
        (url = "http://localhost:5000", description = "Local Development")
    ),
    tags(
        (name = "Battles", description = "Paginated catalog and single battle lookup"),
        (name = "Statistics", description = "Catalog-wide aggregates"),
        (name = "Legacy", description = "Unpaginated list used by the map page"),
        (name = "Enrichment", description = "Historical context and source links"),
        (name = "Cache", description = "Response cache administration"),
        (name = "Documentation", description = "Human-readable endpoint list"),
        (name = "Homepage", description = "Landing page"),
        (name = "Health", description = "Liveness and readiness probes"),
        (name = "Observability", description = "Prometheus metrics")
    ),
    paths(
        // === v1 Routes ===
        battles::list_battles,
        battles::get_battle,
        statistics::get_statistics,

        // === Legacy Routes ===
        legacy::list_battles,
        enrich::enrich_battle,
        cache::clear_cache,

        // === Documentation & Homepage ===
        docs::get_docs,
        homepage::index,

        // === Health & Metrics ===
        health::ping,
        health::liveness,
        health::readiness,
        crate::telemetry::metrics::metrics_handler,
    ),
    components(
        schemas(
            // Domain types
            Battle,
            BattleType,
            MediaEntry,
            MediaKind,
            BattleStatistics,
            TimeSpan,

            // Response types
            BattleListResponse,
            EnrichResponse,
            MessageResponse,
            ApiDocsResponse,
            EndpointDoc,
            health::HealthResponse,
            health::HealthStatus,
            health::HealthDetails,
            health::ComponentHealth,

            // Errors
            ApiError,
            ErrorCode,
        )
    )
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_openapi_lists_every_route() {
        let doc = ApiDoc::openapi();
        for path in [
            "/api/v1/battles",
            "/api/v1/battles/{id}",
            "/api/v1/statistics",
            "/api/battles",
            "/api/battles/{id}/enrich",
            "/api/cache/clear",
            "/api/docs",
            "/",
            "/health/ready",
            "/metrics",
        ] {
            assert!(doc.paths.paths.contains_key(path), "missing {}", path);
        }
    }

    #[test]
    fn test_openapi_documents_query_parameters() {
        let doc = ApiDoc::openapi();
        let param_names = |path: &str| -> Vec<String> {
            doc.paths.paths[path]
                .get
                .as_ref()
                .and_then(|op| op.parameters.as_ref())
                .map(|params| params.iter().map(|p| p.name.clone()).collect())
                .unwrap_or_default()
        };

        let v1 = param_names("/api/v1/battles");
        for name in ["start_year", "end_year", "type", "limit", "offset"] {
            assert!(v1.iter().any(|p| p == name), "missing v1 param {}", name);
        }
        assert_eq!(param_names("/api/battles"), vec!["start_year", "end_year"]);
    }

    #[test]
    fn test_openapi_serializes() {
        let json = ApiDoc::openapi().to_json().unwrap();
        assert!(json.contains("BattleListResponse"));
    }
}
