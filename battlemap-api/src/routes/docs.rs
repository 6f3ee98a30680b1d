//! Human-readable description of the public v1 surface.
//!
//! The machine-readable document lives at `/openapi.json`.

use axum::{response::IntoResponse, routing::get, Json, Router};
use indexmap::IndexMap;

use crate::types::{ApiDocsResponse, EndpointDoc};

/// Build the static documentation payload.
pub fn api_docs() -> ApiDocsResponse {
    let list_parameters: IndexMap<String, String> = [
        ("start_year", "int (optionnel) - Année de début"),
        ("end_year", "int (optionnel) - Année de fin"),
        ("type", "string (optionnel) - Type de bataille"),
        ("limit", "int (optionnel) - Nombre maximum de résultats"),
        ("offset", "int (optionnel) - Décalage pour la pagination"),
    ]
    .into_iter()
    .map(|(name, doc)| (name.to_string(), doc.to_string()))
    .collect();

    let mut endpoints = IndexMap::new();
    endpoints.insert(
        "GET /api/v1/battles".to_string(),
        EndpointDoc {
            description: "Récupérer la liste des batailles".to_string(),
            parameters: Some(list_parameters),
        },
    );
    endpoints.insert(
        "GET /api/v1/battles/{battle_id}".to_string(),
        EndpointDoc {
            description: "Récupérer les détails d'une bataille spécifique".to_string(),
            parameters: None,
        },
    );
    endpoints.insert(
        "GET /api/v1/statistics".to_string(),
        EndpointDoc {
            description: "Obtenir des statistiques sur les batailles".to_string(),
            parameters: None,
        },
    );

    ApiDocsResponse {
        version: "1.0".to_string(),
        description: "API publique des batailles historiques françaises".to_string(),
        endpoints,
    }
}

/// GET /api/docs - Static API description
#[utoipa::path(
    get,
    path = "/api/docs",
    tag = "Documentation",
    responses(
        (status = 200, description = "Endpoint descriptions", body = ApiDocsResponse),
    ),
)]
pub async fn get_docs() -> impl IntoResponse {
    Json(api_docs())
}

pub fn create_router() -> Router {
    Router::new().route("/api/docs", get(get_docs))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_docs_list_the_v1_endpoints_in_order() {
        let docs = api_docs();
        let names: Vec<&str> = docs.endpoints.keys().map(String::as_str).collect();
        assert_eq!(
            names,
            vec![
                "GET /api/v1/battles",
                "GET /api/v1/battles/{battle_id}",
                "GET /api/v1/statistics",
            ]
        );
    }

    #[test]
    fn test_only_the_list_documents_parameters() {
        let json = serde_json::to_value(api_docs()).unwrap();
        let endpoints = &json["endpoints"];
        assert_eq!(
            endpoints["GET /api/v1/battles"]["parameters"]
                .as_object()
                .map(|p| p.len()),
            Some(5)
        );
        assert!(endpoints["GET /api/v1/statistics"].get("parameters").is_none());
    }
}
