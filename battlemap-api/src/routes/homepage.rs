//! Landing page.
//!
//! A small HTML page pointing at the JSON endpoints. The rendered page is
//! cached for an hour and dropped by a cache clear.

use axum::{
    extract::State,
    response::{Html, IntoResponse},
    routing::get,
    Router,
};
use battlemap_core::{BattleFilter, BattleType};
use battlemap_storage::{CacheKey, CacheNamespace};

use crate::{
    error::{ApiError, ApiResult},
    state::AppState,
};

/// Render the landing page for a catalog of `total` battles.
pub fn render_homepage(total: u64) -> String {
    let types = BattleType::ALL
        .iter()
        .map(|kind| format!("<li>{}</li>", kind.label()))
        .collect::<String>();

    format!(
        r#"<!DOCTYPE html>
<html lang="fr">
<head>
<meta charset="utf-8">
<title>Carte des batailles françaises</title>
</head>
<body>
<h1>Carte des batailles françaises</h1>
<p>{total} batailles référencées, de l'Antiquité à nos jours.</p>
<h2>Types de batailles</h2>
<ul>{types}</ul>
<h2>API</h2>
<ul>
<li><a href="/api/v1/battles">/api/v1/battles</a></li>
<li><a href="/api/v1/statistics">/api/v1/statistics</a></li>
<li><a href="/api/docs">/api/docs</a></li>
<li><a href="/openapi.json">/openapi.json</a></li>
</ul>
</body>
</html>
"#
    )
}

/// GET / - Landing page
#[utoipa::path(
    get,
    path = "/",
    tag = "Homepage",
    responses(
        (status = 200, description = "Landing page", content_type = "text/html", body = String),
        (status = 500, description = "Store failure", body = ApiError),
    ),
)]
pub async fn index(State(state): State<AppState>) -> ApiResult<impl IntoResponse> {
    let page: String = state
        .cached(CacheKey::singleton(CacheNamespace::Homepage), || async {
            let total = state.store.count(&BattleFilter::new()).await?;
            Ok::<_, ApiError>(render_homepage(total))
        })
        .await
        .inspect_err(|e| tracing::error!(error = %e, "Error rendering homepage"))?;

    Ok(Html(page))
}

pub fn create_router(state: AppState) -> Router {
    Router::new().route("/", get(index)).with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_homepage_shows_count_and_types() {
        let html = render_homepage(15000);
        assert!(html.contains("15000 batailles"));
        for kind in BattleType::ALL {
            assert!(html.contains(kind.label()));
        }
    }
}
