use thiserror::Error;

pub type Result<T> = std::result::Result<T, LedgerError>;

/// Failures of the value-transfer subsystem.
#[derive(Error, Debug)]
pub enum LedgerError {
    #[error("Insufficient funds: need {need}, have {available}")]
    InsufficientFunds { need: u64, available: u64 },

    #[error("Unknown account: {0}")]
    UnknownAccount(String),

    #[error("Invalid amount: {0}")]
    InvalidAmount(String),

    #[error("Transaction rejected: {0}")]
    Rejected(String),

    #[error("Network connection error: {0}")]
    Network(String),

    #[error("Invalid ledger response: {0}")]
    InvalidResponse(String),
}

impl LedgerError {
    pub fn rejected(msg: impl Into<String>) -> Self {
        Self::Rejected(msg.into())
    }

    pub fn network(msg: impl Into<String>) -> Self {
        Self::Network(msg.into())
    }

    pub fn invalid_response(msg: impl Into<String>) -> Self {
        Self::InvalidResponse(msg.into())
    }
}

impl From<reqwest::Error> for LedgerError {
    fn from(err: reqwest::Error) -> Self {
        LedgerError::Network(err.to_string())
    }
}

/// Failures of the statement generator.
#[derive(Error, Debug)]
pub enum ResponderError {
    #[error("Responder provider error: {0}")]
    Provider(String),

    #[error("Agent not found: {0}")]
    AgentNotFound(u32),

    #[error("Network connection error: {0}")]
    Network(String),

    #[error("Responder timed out after {0:?}")]
    Timeout(std::time::Duration),
}

impl ResponderError {
    pub fn provider(msg: impl Into<String>) -> Self {
        Self::Provider(msg.into())
    }
}

impl From<reqwest::Error> for ResponderError {
    fn from(err: reqwest::Error) -> Self {
        ResponderError::Network(err.to_string())
    }
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Unsupported network: {0} (only testnet is supported)")]
    UnsupportedNetwork(String),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

impl ConfigError {
    pub fn invalid(msg: impl Into<String>) -> Self {
        Self::Invalid(msg.into())
    }
}
