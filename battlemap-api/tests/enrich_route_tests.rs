//! Tests for `POST /api/battles/{id}/enrich`.

use std::sync::Arc;

use axum::http::{Method, StatusCode};
use battlemap_enrich::ContentSource;
use battlemap_storage::BattleStore;
use battlemap_test_utils::{
    assertions::assert_enriched, fixtures::sample_catalog, FaultyStore, MockContentSource,
};

#[path = "support/app.rs"]
mod test_app_support;
use test_app_support::{app_with, post_json, sample_app, send};

async fn faulty_catalog() -> Arc<FaultyStore> {
    let faulty = Arc::new(FaultyStore::new());
    faulty.inner().insert_batch(&sample_catalog()).await.unwrap();
    faulty
}

#[tokio::test]
async fn test_enrich_returns_message_and_battle() {
    let gallica = Arc::new(MockContentSource::returning_text(
        "Gallica",
        "La bataille de Poitiers arrête l'expansion omeyyade.",
    ));
    let persee = Arc::new(MockContentSource::returning_nothing("Persée"));
    let (_, store) = sample_app().await;
    let app = app_with(
        store.clone(),
        vec![
            gallica.clone() as Arc<dyn ContentSource>,
            persee.clone() as Arc<dyn ContentSource>,
        ],
    );

    let (status, body) = post_json(&app, "/api/battles/2/enrich").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body["message"],
        "Informations de la bataille enrichies avec succès"
    );
    assert_eq!(body["battle"]["id"], 2);
    let context = body["battle"]["historical_context"].as_str().unwrap();
    assert!(context.contains("Informations complémentaires de Gallica"));
    assert!(!context.contains("Informations complémentaires de Persée"));
    assert!(body["battle"]["sources"]["wikipedia"].is_string());
    assert!(body["battle"]["media_urls"].as_array().is_some_and(|m| !m.is_empty()));
    assert_eq!(gallica.calls(), 1);
    assert_eq!(persee.calls(), 1);

    let stored = store.get(2).await.unwrap().unwrap();
    assert_enriched(&stored);
}

#[tokio::test]
async fn test_enrich_survives_failing_sources() {
    let (_, store) = sample_app().await;
    let app = app_with(
        store.clone(),
        vec![
            Arc::new(MockContentSource::failing("Gallica", 503)) as Arc<dyn ContentSource>,
            Arc::new(MockContentSource::failing("Persée", 500)) as Arc<dyn ContentSource>,
        ],
    );

    let (status, body) = post_json(&app, "/api/battles/6/enrich").await;

    assert_eq!(status, StatusCode::OK);
    assert!(body["battle"]["historical_context"].is_string());
    assert!(body["battle"]["image_url"].is_string());
    assert_enriched(&store.get(6).await.unwrap().unwrap());
}

#[tokio::test]
async fn test_enrich_unknown_battle_is_404() {
    let (app, _) = sample_app().await;

    let (status, body) = post_json(&app, "/api/battles/999/enrich").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], "BATTLE_NOT_FOUND");

    let (status, _) = post_json(&app, "/api/battles/verdun/enrich").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_enrich_requires_post() {
    let (app, _) = sample_app().await;
    let (status, _) = send(&app, Method::GET, "/api/battles/2/enrich").await;
    assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);
}

#[tokio::test]
async fn test_enrich_persistence_failure_is_500() {
    let faulty = faulty_catalog().await;
    faulty.fail_updates(true);
    let app = app_with(faulty.clone(), Vec::new());

    let (status, body) = post_json(&app, "/api/battles/3/enrich").await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["error"], "Échec de l'enrichissement des informations");
    assert_eq!(body["code"], "ENRICHMENT_FAILED");

    let untouched = faulty.inner().get(3).await.unwrap().unwrap();
    assert!(untouched.historical_context.is_none());
    assert!(untouched.sources.is_none());
}

#[tokio::test]
async fn test_enrich_read_failure_is_500() {
    let faulty = faulty_catalog().await;
    faulty.fail_reads(true);
    let app = app_with(faulty, Vec::new());

    let (status, body) = post_json(&app, "/api/battles/3/enrich").await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["code"], "DATABASE_ERROR");
}

#[tokio::test]
async fn test_enrich_records_source_outcomes() {
    let (_, store) = sample_app().await;
    let app = app_with(
        store,
        vec![Arc::new(MockContentSource::failing("Gallica", 502)) as Arc<dyn ContentSource>],
    );

    post_json(&app, "/api/battles/1/enrich").await;
    let (_, metrics) = send(&app, Method::GET, "/metrics").await;
    let text = String::from_utf8(metrics).unwrap();

    assert!(text.contains("battlemap_enrichment_sources_total"));
    assert!(text.contains("outcome=\"failed\""));
}
