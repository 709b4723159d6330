//! Match orchestration - the simulation context and its event log

pub mod context;
pub mod events;

pub use context::{MatchOutcome, SaveState, Simulation};
pub use events::{EventLog, SimEvent};
