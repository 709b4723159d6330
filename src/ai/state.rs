//! AI states

use serde::{Deserialize, Serialize};

/// Dominant activity of an AI-controlled faction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum AiState {
    Gathering,
    Building,
    Training,
    Combat,
    #[default]
    Idle,
}

impl AiState {
    pub fn name(&self) -> &'static str {
        match self {
            AiState::Gathering => "gathering",
            AiState::Building => "building",
            AiState::Training => "training",
            AiState::Combat => "combat",
            AiState::Idle => "idle",
        }
    }
}

impl std::fmt::Display for AiState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}
