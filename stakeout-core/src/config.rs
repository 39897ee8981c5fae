use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Network {
    Testnet,
    Mainnet,
}

impl Network {
    pub fn as_str(&self) -> &'static str {
        match self {
            Network::Testnet => "testnet",
            Network::Mainnet => "mainnet",
        }
    }
}

impl fmt::Display for Network {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Endpoints for the ledger and responder services.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct NetworkConfig {
    pub network: Network,
    pub ledger_url: String,
    pub responder_url: String,
    #[serde(with = "duration_secs")]
    pub request_timeout: Duration,
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            network: Network::Testnet,
            ledger_url: "http://localhost:3000".to_string(),
            responder_url: "http://localhost:3000".to_string(),
            request_timeout: Duration::from_secs(30),
        }
    }
}

impl NetworkConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into();
        Self {
            ledger_url: base_url.clone(),
            responder_url: base_url,
            ..Self::default()
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.network != Network::Testnet {
            return Err(ConfigError::UnsupportedNetwork(self.network.to_string()));
        }

        if self.ledger_url.is_empty() {
            return Err(ConfigError::invalid("Ledger URL cannot be empty"));
        }

        if self.responder_url.is_empty() {
            return Err(ConfigError::invalid("Responder URL cannot be empty"));
        }

        if self.request_timeout.is_zero() {
            return Err(ConfigError::invalid("Request timeout must be greater than 0"));
        }

        Ok(())
    }
}

pub mod duration_secs {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S: Serializer>(value: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_f64(value.as_secs_f64())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        let secs = f64::deserialize(deserializer)?;
        if !secs.is_finite() || secs < 0.0 {
            return Err(serde::de::Error::custom("duration must be a non-negative number of seconds"));
        }
        Ok(Duration::from_secs_f64(secs))
    }
}
