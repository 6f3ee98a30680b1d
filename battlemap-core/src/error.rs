//! Error types for BATTLEMAP operations

use crate::BattleId;
use thiserror::Error;

/// Storage layer errors.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum StoreError {
    #[error("Battle {id} not found")]
    NotFound { id: BattleId },

    #[error("Batch insert of {size} battles failed: {reason}")]
    BatchFailed { size: usize, reason: String },

    #[error("Transaction failed: {reason}")]
    TransactionFailed { reason: String },

    #[error("Query failed: {reason}")]
    QueryFailed { reason: String },

    #[error("Connection unavailable: {reason}")]
    Connection { reason: String },

    #[error("Stored value could not be decoded: {reason}")]
    Decode { reason: String },

    #[error("Storage lock poisoned")]
    LockPoisoned,
}

/// Failure of a single external content fetch.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum FetchError {
    #[error("Request to {source_name} failed: {reason}")]
    Request { source_name: String, reason: String },

    #[error("{source_name} answered with status {status}")]
    Status { source_name: String, status: u16 },

    #[error("Could not read body from {source_name}: {reason}")]
    Body { source_name: String, reason: String },
}

/// Enrichment pipeline errors. Per-source fetch failures are not errors;
/// they are reported as outcomes.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum EnrichError {
    #[error("Battle {id} not found")]
    NotFound { id: BattleId },

    #[error("Loading battle {id} failed: {source}")]
    Load {
        id: BattleId,
        #[source]
        source: StoreError,
    },

    #[error("Persisting enrichment of battle {id} failed: {source}")]
    Persistence {
        id: BattleId,
        #[source]
        source: StoreError,
    },
}

/// Mock data generation errors.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SeedError {
    #[error("Checking existing battles failed: {0}")]
    Probe(#[source] StoreError),

    #[error("Clearing existing battles failed: {0}")]
    Wipe(#[source] StoreError),

    #[error("Batch in period {period} failed after {inserted} battles were committed: {source}")]
    Batch {
        period: String,
        inserted: u64,
        #[source]
        source: StoreError,
    },
}

// =============================================================================
// TESTS
// =============================================================================
