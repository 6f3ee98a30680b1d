//! BATTLEMAP Enrich - Enrichment Pipeline
//!
//! Augments a stored battle with a period context paragraph, search links,
//! best-effort text from external archives and fallback media, then
//! persists it in one store update.

pub mod config;
pub mod extract;
pub mod links;
pub mod pipeline;
pub mod source;

pub use config::{EnrichConfig, DEFAULT_EXTRACT_LIMIT, DEFAULT_USER_AGENT};
pub use extract::{excerpt, extract_text};
pub use links::build_source_links;
pub use pipeline::{EnrichmentReport, Enricher, SourceOutcome, SourceReport};
pub use source::{build_client, default_sources, ContentSource, HttpContentSource, SearchTarget};
