pub mod config;
pub mod error;
pub mod types;

pub use config::{AiConfig, CombatConfig, ConfigError, ProductionConfig, SimulationConfig};
pub use error::{Result, SimError};
pub use types::{ActorId, Faction, Seconds, Vec3};
