//! BATTLEMAP API - REST Layer over the French Battle Catalog
//!
//! Axum routes, the PostgreSQL-backed [`BattleStore`](battlemap_storage::BattleStore),
//! the response cache wiring and the telemetry stack. The binary in
//! `main.rs` seeds the catalog when it is empty and serves the router.

#[macro_use]
pub mod macros;

pub mod config;
pub mod db;
pub mod error;
pub mod openapi;
pub mod routes;
pub mod state;
pub mod telemetry;
pub mod types;

// Re-export commonly used types
pub use config::{ApiConfig, StoreBackend};
pub use db::{DbConfig, PgBattleStore};
pub use error::{ApiError, ApiResult, ErrorCode};
pub use openapi::ApiDoc;
pub use routes::create_api_router;
pub use state::{ApiCache, AppState};
pub use types::*;
