use crate::agent::AgentId;
use stakeout_core::{Amount, ConfigError, LedgerError};
use thiserror::Error;
use uuid::Uuid;

pub type Result<T> = std::result::Result<T, GameError>;

#[derive(Error, Debug)]
pub enum GameError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Insufficient balance: need {need}, have {available}")]
    InsufficientBalance { need: Amount, available: Amount },

    #[error("Ledger error: {0}")]
    Ledger(#[from] LedgerError),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Invalid game state: {0}")]
    InvalidState(String),

    #[error("Agent not found: {0}")]
    AgentNotFound(AgentId),
}

impl GameError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn invalid_state(msg: impl Into<String>) -> Self {
        Self::InvalidState(msg.into())
    }

    /// Rejected before any state was touched.
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            GameError::Validation(_) | GameError::InsufficientBalance { .. } | GameError::Config(_)
        )
    }
}

/// Settlement failures, kept apart from game-logic errors.
#[derive(Error, Debug)]
pub enum SettlementError {
    #[error("Game {0} already settled")]
    AlreadySettled(Uuid),

    #[error("Game {0} is not finished")]
    NotFinished(Uuid),

    #[error("Payout of {amount} failed: {source}")]
    Payout {
        amount: Amount,
        #[source]
        source: LedgerError,
    },
}
