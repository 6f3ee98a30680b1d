#![allow(dead_code)]

use std::sync::Arc;

use axum::{
    body::{to_bytes, Body},
    http::{Method, Request, StatusCode},
    Router,
};
use battlemap_api::{create_api_router, ApiCache, ApiConfig, AppState};
use battlemap_enrich::{ContentSource, EnrichConfig, Enricher};
use battlemap_storage::{BattleStore, CacheConfig};
use battlemap_test_utils::fixtures::populated_store;
use serde_json::Value;
use tower::ServiceExt;

const BODY_LIMIT: usize = 16 * 1024 * 1024;

/// Router over `store`, enriching through `sources`.
pub fn app_with(store: Arc<dyn BattleStore>, sources: Vec<Arc<dyn ContentSource>>) -> Router {
    let enricher = Enricher::new(sources, EnrichConfig::default());
    let state = AppState::new(store, ApiCache::in_memory(CacheConfig::default()), enricher);
    create_api_router(state, &ApiConfig::default())
}

/// Router over the six-battle sample catalog with no external sources.
pub async fn sample_app() -> (Router, Arc<dyn BattleStore>) {
    let store: Arc<dyn BattleStore> = Arc::new(
        populated_store()
            .await
            .expect("Failed to populate sample store"),
    );
    (app_with(store.clone(), Vec::new()), store)
}

/// Send one request and return the status and raw body.
pub async fn send(app: &Router, method: Method, uri: &str) -> (StatusCode, Vec<u8>) {
    let request = Request::builder()
        .method(method)
        .uri(uri)
        .body(Body::empty())
        .expect("Failed to build request");
    let response = app
        .clone()
        .oneshot(request)
        .await
        .expect("Router is infallible");
    let status = response.status();
    let bytes = to_bytes(response.into_body(), BODY_LIMIT)
        .await
        .expect("Failed to read body");
    (status, bytes.to_vec())
}

/// Send one request and decode the JSON body.
pub async fn send_json(app: &Router, method: Method, uri: &str) -> (StatusCode, Value) {
    let (status, body) = send(app, method, uri).await;
    let json = serde_json::from_slice(&body).expect("Response body is not JSON");
    (status, json)
}

pub async fn get_json(app: &Router, uri: &str) -> (StatusCode, Value) {
    send_json(app, Method::GET, uri).await
}

pub async fn post_json(app: &Router, uri: &str) -> (StatusCode, Value) {
    send_json(app, Method::POST, uri).await
}

/// Names of the battles in a JSON array.
pub fn names(battles: &Value) -> Vec<String> {
    battles
        .as_array()
        .map(|items| {
            items
                .iter()
                .filter_map(|b| b["name"].as_str().map(str::to_string))
                .collect()
        })
        .unwrap_or_default()
}
