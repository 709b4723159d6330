//! Skirmish - real-time strategy simulation core
//!
//! Enemy AI, proximity combat, unit production and building upgrades, driven
//! by an explicit `Simulation::tick(dt)` from the host's frame loop.

pub mod ai;
pub mod buildings;
pub mod combat;
pub mod core;
pub mod economy;
pub mod production;
pub mod simulation;
pub mod world;

pub use crate::core::{Result, SimError, SimulationConfig};
pub use crate::simulation::{MatchOutcome, Simulation};
