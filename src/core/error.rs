use thiserror::Error;

use crate::buildings::UpgradeError;
use crate::core::config::ConfigError;
use crate::economy::LedgerError;
use crate::production::ProductionError;

#[derive(Error, Debug)]
pub enum SimError {
    #[error("Actor not found: {0}")]
    ActorNotFound(crate::core::types::ActorId),

    #[error("Invalid action: {0}")]
    InvalidAction(String),

    #[error("Match is already over")]
    MatchOver,

    #[error(transparent)]
    Ledger(#[from] LedgerError),

    #[error(transparent)]
    Production(#[from] ProductionError),

    #[error(transparent)]
    Upgrade(#[from] UpgradeError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerdeError(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, SimError>;
