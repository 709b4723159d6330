//! Enemy AI - periodic priority evaluation driving production, building and combat

pub mod census;
pub mod engine;
pub mod state;

pub use census::{decide, next_military_kind, FactionCensus, MILITARY_BUILDINGS};
pub use engine::{AiDecisionEngine, AiServices};
pub use state::AiState;
