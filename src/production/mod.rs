//! Unit production - per-building training queues

pub mod queue;

pub use queue::{spawn_position, ProductionError, ProductionQueue, TrainingJob};
