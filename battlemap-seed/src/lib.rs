//! BATTLEMAP Seed - Mock Data Generator
//!
//! Fills an empty catalog with 15000 plausible battles spread over four
//! historical periods. Names, factions, outcomes and media follow the
//! period tables in battlemap-core.

pub mod generator;
pub mod names;
pub mod seeder;

pub use generator::BattleGenerator;
pub use seeder::{seed, seed_if_empty, SeedConfig, SeedReport, DEFAULT_BATCH_SIZE};
