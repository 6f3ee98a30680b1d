//! External content sources.

use async_trait::async_trait;
use battlemap_core::{persee_period_keyword, Battle, FetchError};
use reqwest::Client;

use crate::config::EnrichConfig;
use crate::extract::extract_text;
use crate::links::{encode_query, GALLICA_SEARCH, PERSEE_SEARCH};

/// A searchable archive that may return text about a battle.
///
/// `Ok(None)` means the source answered but had nothing usable.
#[async_trait]
pub trait ContentSource: Send + Sync {
    /// Human-readable name used in the appended text and in logs.
    fn label(&self) -> &str;

    /// Fetch and extract text about the battle.
    async fn fetch_text(&self, battle: &Battle) -> Result<Option<String>, FetchError>;
}

/// Which search endpoint an [`HttpContentSource`] queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchTarget {
    /// BnF Gallica SRU search, queried with `"<name> <year>"`
    Gallica,
    /// Persée search, queried with `"<name> <period keyword>"`
    Persee,
}

impl SearchTarget {
    pub fn label(&self) -> &'static str {
        match self {
            SearchTarget::Gallica => "Gallica",
            SearchTarget::Persee => "Persée",
        }
    }

    pub fn search_url(&self, battle: &Battle) -> String {
        match self {
            SearchTarget::Gallica => format!(
                "{}{}",
                GALLICA_SEARCH,
                encode_query(&format!("{} {}", battle.name, battle.year))
            ),
            SearchTarget::Persee => format!(
                "{}{}",
                PERSEE_SEARCH,
                encode_query(&format!(
                    "{} {}",
                    battle.name,
                    persee_period_keyword(battle.year)
                ))
            ),
        }
    }
}

/// Content source fetching an HTML search page over HTTP.
pub struct HttpContentSource {
    client: Client,
    target: SearchTarget,
}

impl HttpContentSource {
    /// Build a source sharing an existing client.
    pub fn with_client(client: Client, target: SearchTarget) -> Self {
        Self { client, target }
    }
}

/// HTTP client honoring the configured user agent and timeout.
pub fn build_client(config: &EnrichConfig, source_name: &str) -> Result<Client, FetchError> {
    let mut builder = Client::builder().user_agent(config.user_agent.clone());
    if let Some(timeout) = config.fetch_timeout {
        builder = builder.timeout(timeout);
    }
    builder.build().map_err(|e| FetchError::Request {
        source_name: source_name.to_string(),
        reason: format!("Failed to build HTTP client: {}", e),
    })
}

/// Gallica and Persée sources sharing one client.
pub fn default_sources(config: &EnrichConfig) -> Result<Vec<HttpContentSource>, FetchError> {
    let client = build_client(config, "http")?;
    Ok([SearchTarget::Gallica, SearchTarget::Persee]
        .into_iter()
        .map(|target| HttpContentSource::with_client(client.clone(), target))
        .collect())
}

#[async_trait]
impl ContentSource for HttpContentSource {
    fn label(&self) -> &str {
        self.target.label()
    }

    async fn fetch_text(&self, battle: &Battle) -> Result<Option<String>, FetchError> {
        let source_name = self.label().to_string();
        let url = self.target.search_url(battle);

        let response = self.client.get(&url).send().await.map_err(|e| FetchError::Request {
            source_name: source_name.clone(),
            reason: e.to_string(),
        })?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                source_name,
                status: status.as_u16(),
            });
        }

        let body = response.text().await.map_err(|e| FetchError::Body {
            source_name,
            reason: e.to_string(),
        })?;

        Ok(extract_text(&body))
    }
}

impl std::fmt::Debug for HttpContentSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpContentSource")
            .field("target", &self.target)
            .finish()
    }
}
