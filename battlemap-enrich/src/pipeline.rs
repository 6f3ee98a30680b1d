//! The enrichment pipeline.
//!
//! Every step is best-effort except the final write: the period context
//! and source links are always set, each external source contributes text
//! only when it succeeds, and missing media are backfilled from the era
//! samples. Source failures become [`SourceOutcome::Failed`] values in the
//! report rather than errors.

use std::sync::Arc;

use battlemap_core::{
    period_context, sample_image_url, sample_media, Battle, BattleId, EnrichError, StoreError,
};
use battlemap_storage::BattleStore;

use crate::config::EnrichConfig;
use crate::extract::excerpt;
use crate::links::build_source_links;
use crate::source::ContentSource;

/// What one content source contributed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourceOutcome {
    /// Text was found; holds the excerpt that was appended.
    Extracted(String),
    /// The source answered with nothing usable.
    Empty,
    /// The fetch failed.
    Failed(String),
}

impl SourceOutcome {
    /// Short label for logs and metrics.
    pub fn kind(&self) -> &'static str {
        match self {
            SourceOutcome::Extracted(_) => "extracted",
            SourceOutcome::Empty => "empty",
            SourceOutcome::Failed(_) => "failed",
        }
    }
}

/// Outcome of one source, tagged with its label.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceReport {
    pub source: String,
    pub outcome: SourceOutcome,
}

/// Result of a successful enrichment.
#[derive(Debug, Clone, PartialEq)]
pub struct EnrichmentReport {
    /// The battle as persisted.
    pub battle: Battle,
    /// One entry per configured source, in query order.
    pub outcomes: Vec<SourceReport>,
}

impl EnrichmentReport {
    /// Number of sources that contributed text.
    pub fn extracted_count(&self) -> usize {
        self.outcomes
            .iter()
            .filter(|r| matches!(r.outcome, SourceOutcome::Extracted(_)))
            .count()
    }
}

/// Runs the enrichment steps against a set of content sources.
#[derive(Clone)]
pub struct Enricher {
    sources: Vec<Arc<dyn ContentSource>>,
    config: EnrichConfig,
}

impl std::fmt::Debug for Enricher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Enricher")
            .field(
                "sources",
                &self.sources.iter().map(|s| s.label().to_string()).collect::<Vec<_>>(),
            )
            .field("config", &self.config)
            .finish()
    }
}

impl Enricher {
    pub fn new(sources: Vec<Arc<dyn ContentSource>>, config: EnrichConfig) -> Self {
        Self { sources, config }
    }

    /// Enricher with no external sources; only local steps run.
    pub fn offline(config: EnrichConfig) -> Self {
        Self::new(Vec::new(), config)
    }

    pub fn config(&self) -> &EnrichConfig {
        &self.config
    }

    /// Apply every enrichment step to an in-memory battle.
    ///
    /// Does not touch storage.
    pub async fn enrich(&self, mut battle: Battle) -> (Battle, Vec<SourceReport>) {
        let mut context = period_context(battle.year).to_string();
        battle.sources = Some(build_source_links(&battle.name, battle.year));

        let mut outcomes = Vec::with_capacity(self.sources.len());
        for source in &self.sources {
            let label = source.label().to_string();
            let outcome = match source.fetch_text(&battle).await {
                Ok(Some(text)) if !text.trim().is_empty() => {
                    let snippet = excerpt(&text, self.config.extract_limit);
                    context.push_str(&format!(
                        "\n\nInformations complémentaires de {} :\n{}...",
                        label, snippet
                    ));
                    SourceOutcome::Extracted(snippet)
                }
                Ok(_) => SourceOutcome::Empty,
                Err(e) => {
                    tracing::warn!(
                        battle_id = battle.id,
                        source = %label,
                        error = %e,
                        "Content source failed"
                    );
                    SourceOutcome::Failed(e.to_string())
                }
            };
            outcomes.push(SourceReport {
                source: label,
                outcome,
            });
        }
        battle.historical_context = Some(context);

        if battle.media_urls.as_ref().map_or(true, Vec::is_empty) {
            battle.media_urls = Some(sample_media(battle.year));
        }
        if battle.image_url.as_deref().map_or(true, str::is_empty) {
            battle.image_url = Some(sample_image_url(battle.year).to_string());
        }

        (battle, outcomes)
    }

    /// Load, enrich and persist one battle.
    ///
    /// Fails only when the battle is missing or cannot be read or written;
    /// on failure nothing is persisted.
    pub async fn enrich_battle(
        &self,
        store: &dyn BattleStore,
        id: BattleId,
    ) -> Result<EnrichmentReport, EnrichError> {
        let battle = store
            .get(id)
            .await
            .map_err(|source| EnrichError::Load { id, source })?
            .ok_or(EnrichError::NotFound { id })?;

        tracing::info!(battle_id = id, name = %battle.name, "Enriching battle");
        let (battle, outcomes) = self.enrich(battle).await;

        store.update(&battle).await.map_err(|source| match source {
            StoreError::NotFound { id } => EnrichError::NotFound { id },
            source => EnrichError::Persistence { id, source },
        })?;

        let report = EnrichmentReport { battle, outcomes };
        tracing::info!(
            battle_id = id,
            extracted = report.extracted_count(),
            "Enrichment persisted"
        );
        Ok(report)
    }
}
