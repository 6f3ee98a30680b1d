//! Router-level tests for the catalog, statistics, docs and health routes.
//!
//! Every test drives the full router with `oneshot` over an in-memory store
//! loaded with the six-battle sample catalog.

use std::sync::Arc;

use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
};
use battlemap_storage::{BattleStore, InMemoryBattleStore};
use battlemap_test_utils::{fixtures::new_battle, FaultyStore};
use serde_json::json;
use tower::ServiceExt;

#[path = "support/app.rs"]
mod test_app_support;
use test_app_support::{app_with, get_json, names, sample_app, send};

// ============================================================================
// V1 LIST
// ============================================================================

#[tokio::test]
async fn test_list_defaults() {
    let (app, _) = sample_app().await;
    let (status, body) = get_json(&app, "/api/v1/battles").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["total"], 6);
    assert_eq!(body["offset"], 0);
    assert_eq!(body["limit"], 100);
    assert_eq!(
        names(&body["battles"]),
        vec![
            "Siège d'Alésia",
            "Bataille de Tours",
            "Siège d'Orléans",
            "Bataille de Castillon",
            "Bataille de Fontenoy",
            "Défense de Verdun",
        ]
    );
}

#[tokio::test]
async fn test_list_clamps_limit_to_one_thousand() {
    let store = InMemoryBattleStore::new();
    let battles: Vec<_> = (0..1200)
        .map(|i| new_battle(&format!("Bataille de Test {}", i), 1000 + (i % 900)))
        .collect();
    store.insert_batch(&battles).await.unwrap();
    let app = app_with(Arc::new(store), Vec::new());

    let (status, body) = get_json(&app, "/api/v1/battles?limit=5000").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["limit"], 1000);
    assert_eq!(body["total"], 1200);
    assert_eq!(body["battles"].as_array().map(Vec::len), Some(1000));
}

#[tokio::test]
async fn test_list_pagination_window() {
    let (app, _) = sample_app().await;
    let (_, body) = get_json(&app, "/api/v1/battles?limit=2&offset=1").await;

    assert_eq!(body["total"], 6);
    assert_eq!(
        names(&body["battles"]),
        vec!["Bataille de Tours", "Siège d'Orléans"]
    );
}

#[tokio::test]
async fn test_list_negative_offset_is_zero() {
    let (app, _) = sample_app().await;
    let (status, body) = get_json(&app, "/api/v1/battles?offset=-5").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["offset"], 0);
    assert_eq!(body["battles"].as_array().map(Vec::len), Some(6));
}

#[tokio::test]
async fn test_list_unparseable_integers_use_defaults() {
    let (app, _) = sample_app().await;
    let (status, body) =
        get_json(&app, "/api/v1/battles?limit=abc&offset=zz&start_year=soon").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["limit"], 100);
    assert_eq!(body["offset"], 0);
    assert_eq!(body["total"], 6);
}

#[tokio::test]
async fn test_list_filters_by_type_prefix() {
    let (app, _) = sample_app().await;
    let (_, body) = get_json(&app, "/api/v1/battles?type=Si%C3%A8ge").await;

    assert_eq!(body["total"], 2);
    assert_eq!(
        names(&body["battles"]),
        vec!["Siège d'Alésia", "Siège d'Orléans"]
    );
}

#[tokio::test]
async fn test_list_filters_by_year_range() {
    let (app, _) = sample_app().await;
    let (_, body) = get_json(&app, "/api/v1/battles?start_year=1400&end_year=1500").await;

    assert_eq!(body["total"], 2);
    assert_eq!(
        names(&body["battles"]),
        vec!["Siège d'Orléans", "Bataille de Castillon"]
    );
}

#[tokio::test]
async fn test_list_store_failure_is_500() {
    let faulty = Arc::new(FaultyStore::new());
    faulty.fail_reads(true);
    let app = app_with(faulty, Vec::new());

    let (status, body) = get_json(&app, "/api/v1/battles").await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["code"], "DATABASE_ERROR");
    assert!(body["error"].as_str().is_some());
}

// ============================================================================
// V1 GET BY ID
// ============================================================================

#[tokio::test]
async fn test_get_battle() {
    let (app, _) = sample_app().await;
    let (status, body) = get_json(&app, "/api/v1/battles/3").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["id"], 3);
    assert_eq!(body["name"], "Siège d'Orléans");
    assert_eq!(body["year"], 1429);
    assert_eq!(body["historical_context"], serde_json::Value::Null);
}

#[tokio::test]
async fn test_get_unknown_battle_is_404() {
    let (app, _) = sample_app().await;
    let (status, body) = get_json(&app, "/api/v1/battles/999").await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], "BATTLE_NOT_FOUND");
    assert_eq!(body["error"], "Battle with id 999 not found");
}

#[tokio::test]
async fn test_get_non_numeric_id_is_404() {
    let (app, _) = sample_app().await;
    let (status, body) = get_json(&app, "/api/v1/battles/tours").await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], "BATTLE_NOT_FOUND");
}

// ============================================================================
// LEGACY LIST
// ============================================================================

#[tokio::test]
async fn test_legacy_list_excludes_bce_by_default() {
    let (app, _) = sample_app().await;
    let (status, body) = get_json(&app, "/api/battles").await;

    assert_eq!(status, StatusCode::OK);
    let listed = names(&body);
    assert_eq!(listed.len(), 5);
    assert!(!listed.iter().any(|n| n == "Siège d'Alésia"));
}

#[tokio::test]
async fn test_legacy_list_accepts_negative_start() {
    let (app, _) = sample_app().await;
    let (_, body) = get_json(&app, "/api/battles?start_year=-100&end_year=800").await;

    assert_eq!(names(&body), vec!["Siège d'Alésia", "Bataille de Tours"]);
}

// ============================================================================
// STATISTICS
// ============================================================================

#[tokio::test]
async fn test_statistics_payload() {
    let (app, _) = sample_app().await;
    let (status, body) = get_json(&app, "/api/v1/statistics").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!({
            "total_battles": 6,
            "time_span": {"earliest": -52, "latest": 1916},
            "types_distribution": {"Bataille": 3, "Siège": 2, "Défense": 1},
            "century_distribution": {
                "-100": 1, "700": 1, "1400": 2, "1700": 1, "1900": 1
            }
        })
    );
}

#[tokio::test]
async fn test_statistics_on_empty_catalog() {
    let app = app_with(Arc::new(InMemoryBattleStore::new()), Vec::new());
    let (status, body) = get_json(&app, "/api/v1/statistics").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["total_battles"], 0);
    assert_eq!(body["time_span"]["earliest"], serde_json::Value::Null);
    assert_eq!(body["types_distribution"], json!({}));
    assert_eq!(body["century_distribution"], json!({}));
}

// ============================================================================
// DOCS, HOMEPAGE, OPENAPI
// ============================================================================

#[tokio::test]
async fn test_api_docs() {
    let (app, _) = sample_app().await;
    let (status, body) = get_json(&app, "/api/docs").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["version"], "1.0");
    assert_eq!(
        body["description"],
        "API publique des batailles historiques françaises"
    );
    assert_eq!(
        body["endpoints"]["GET /api/v1/battles"]["parameters"]["limit"],
        "int (optionnel) - Nombre maximum de résultats"
    );
}

#[tokio::test]
async fn test_homepage_is_html() {
    let (app, _) = sample_app().await;
    let (status, body) = send(&app, Method::GET, "/").await;

    assert_eq!(status, StatusCode::OK);
    let html = String::from_utf8(body).unwrap();
    assert!(html.contains("<h1>Carte des batailles françaises</h1>"));
    assert!(html.contains("6 batailles"));
}

#[tokio::test]
async fn test_openapi_document_is_served() {
    let (app, _) = sample_app().await;
    let (status, body) = get_json(&app, "/openapi.json").await;

    assert_eq!(status, StatusCode::OK);
    assert!(body["paths"]["/api/v1/battles/{id}"].is_object());
    assert!(body["components"]["schemas"]["Battle"].is_object());
}

// ============================================================================
// HEALTH & METRICS
// ============================================================================

#[tokio::test]
async fn test_health_ping_and_live() {
    let (app, _) = sample_app().await;

    let (status, body) = send(&app, Method::GET, "/health/ping").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, b"pong");

    let (status, body) = get_json(&app, "/health/live").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
}

#[tokio::test]
async fn test_health_ready_reports_catalog_size() {
    let (app, _) = sample_app().await;
    let (status, body) = get_json(&app, "/health/ready").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["details"]["store"]["battles"], 6);
}

#[tokio::test]
async fn test_health_ready_fails_when_store_is_down() {
    let faulty = Arc::new(FaultyStore::new());
    faulty.fail_reads(true);
    let app = app_with(faulty, Vec::new());

    let (status, body) = get_json(&app, "/health/ready").await;

    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(body["status"], "unhealthy");
    assert!(body["details"]["store"]["error"].as_str().is_some());
}

#[tokio::test]
async fn test_metrics_count_requests_by_normalized_path() {
    let (app, _) = sample_app().await;
    let _ = send(&app, Method::GET, "/api/v1/battles/2").await;

    let (status, body) = send(&app, Method::GET, "/metrics").await;
    let text = String::from_utf8(body).unwrap();

    assert_eq!(status, StatusCode::OK);
    assert!(text.contains("battlemap_http_requests_total"));
    assert!(text.contains("/api/v1/battles/{id}"));
}

// ============================================================================
// CORS
// ============================================================================

#[tokio::test]
async fn test_cors_allows_any_origin_by_default() {
    let (app, _) = sample_app().await;
    let request = Request::builder()
        .uri("/api/v1/statistics")
        .header(header::ORIGIN, "https://carte.example")
        .body(Body::empty())
        .unwrap();

    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response
            .headers()
            .get(header::ACCESS_CONTROL_ALLOW_ORIGIN)
            .and_then(|v| v.to_str().ok()),
        Some("*")
    );
}
