use crate::error::{GameError, Result};
use crate::suspicion::SuspicionConfig;
use serde::{Deserialize, Serialize};
use stakeout_core::config::duration_secs;
use stakeout_core::{Amount, Network};
use std::fmt;
use std::time::Duration;

pub const MIN_ROSTER: usize = 4;
pub const MAX_ROSTER: usize = 6;

/// Default game-controlled address on the test network.
pub const DEFAULT_HOUSE_ADDRESS: &str = "ST1PQHQKV0RJXZFY1DGX8MNSNYVE3VGZJSRTPGZGM";

/// When an eliminated agent's role is made public.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RevealPolicy {
    #[default]
    OnElimination,
    OnGameEnd,
}

/// Credentials for an account that signs transfers.
#[derive(Clone, Default, Serialize, Deserialize)]
pub struct Account {
    pub address: String,
    #[serde(default, skip_serializing)]
    pub private_key: String,
}

impl Account {
    pub fn new(address: impl Into<String>, private_key: impl Into<String>) -> Self {
        Self {
            address: address.into(),
            private_key: private_key.into(),
        }
    }

    pub fn validate(&self, role: &str) -> Result<()> {
        if self.address.trim().is_empty() {
            return Err(GameError::validation(format!("{} address is required", role)));
        }
        if self.private_key.trim().is_empty() {
            return Err(GameError::validation(format!("{} private key is required", role)));
        }
        Ok(())
    }
}

impl fmt::Debug for Account {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Account")
            .field("address", &self.address)
            .field("private_key", &"<redacted>")
            .finish()
    }
}

/// Readability delays between narrated steps. Zero in headless runs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Pacing {
    #[serde(with = "duration_secs")]
    pub statement: Duration,
    #[serde(with = "duration_secs")]
    pub vote: Duration,
    #[serde(with = "duration_secs")]
    pub round: Duration,
}

impl Default for Pacing {
    fn default() -> Self {
        Self {
            statement: Duration::from_millis(2000),
            vote: Duration::from_millis(1500),
            round: Duration::from_millis(3000),
        }
    }
}

impl Pacing {
    pub fn none() -> Self {
        Self {
            statement: Duration::ZERO,
            vote: Duration::ZERO,
            round: Duration::ZERO,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub network: Network,
    pub house: Account,
    pub max_rounds: u32,
    pub vote_interval: u32,
    pub min_bet: Amount,
    /// Winnings as basis points of the bet (18_000 = 1.8x).
    pub payout_bps: u32,
    pub roster_size: usize,
    pub reveal: RevealPolicy,
    #[serde(with = "duration_secs")]
    pub responder_timeout: Duration,
    pub pacing: Pacing,
    pub suspicion: SuspicionConfig,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            network: Network::Testnet,
            house: Account::new(DEFAULT_HOUSE_ADDRESS, ""),
            max_rounds: 8,
            vote_interval: 3,
            min_bet: Amount::from_micro(100_000),
            payout_bps: 18_000,
            roster_size: 5,
            reveal: RevealPolicy::default(),
            responder_timeout: Duration::from_secs(30),
            pacing: Pacing::default(),
            suspicion: SuspicionConfig::default(),
        }
    }
}

impl GameConfig {
    pub fn new(house: Account) -> Self {
        Self {
            house,
            ..Self::default()
        }
    }

    /// No pacing delays, for tests and non-interactive runs.
    pub fn headless(house: Account) -> Self {
        Self {
            house,
            pacing: Pacing::none(),
            ..Self::default()
        }
    }

    pub fn payout_for(&self, bet: Amount) -> Amount {
        bet.scale_bps(self.payout_bps)
    }

    pub fn validate(&self) -> Result<()> {
        if self.network != Network::Testnet {
            return Err(GameError::validation(format!(
                "Only testnet is supported, got {}",
                self.network
            )));
        }

        if self.house.address.trim().is_empty() {
            return Err(GameError::validation("House address cannot be empty"));
        }

        if self.max_rounds == 0 {
            return Err(GameError::validation("Max rounds must be greater than 0"));
        }

        if self.vote_interval == 0 {
            return Err(GameError::validation("Vote interval must be greater than 0"));
        }

        if self.min_bet.is_zero() {
            return Err(GameError::validation("Minimum bet must be greater than 0"));
        }

        if !(MIN_ROSTER..=MAX_ROSTER).contains(&self.roster_size) {
            return Err(GameError::validation(format!(
                "Roster size must be between {} and {}, got {}",
                MIN_ROSTER, MAX_ROSTER, self.roster_size
            )));
        }

        if self.responder_timeout.is_zero() {
            return Err(GameError::validation(
                "Responder timeout must be greater than 0",
            ));
        }

        let s = &self.suspicion;
        if s.noise < 0.0 || s.initial_spread < 0.0 || s.initial_spread > 1.0 {
            return Err(GameError::validation(
                "Suspicion noise and initial spread must be within [0, 1]",
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = GameConfig::default();
        assert_eq!(config.max_rounds, 8);
        assert_eq!(config.vote_interval, 3);
        assert_eq!(config.min_bet.to_string(), "0.1");
        assert_eq!(config.payout_for("0.5".parse().unwrap()).to_string(), "0.9");
        assert_eq!(config.reveal, RevealPolicy::OnElimination);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_rejects_bad_values() {
        let mut config = GameConfig::default();
        config.roster_size = 7;
        assert!(matches!(config.validate(), Err(GameError::Validation(_))));

        let mut config = GameConfig::default();
        config.network = Network::Mainnet;
        assert!(config.validate().is_err());

        let mut config = GameConfig::default();
        config.vote_interval = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_private_key_is_never_serialized_or_printed() {
        let config = GameConfig::new(Account::new("ST-HOUSE", "super-secret"));

        let json = serde_json::to_string(&config).unwrap();
        assert!(!json.contains("super-secret"));
        assert!(!format!("{:?}", config).contains("super-secret"));
    }

    #[test]
    fn test_partial_json_fills_defaults() {
        let config: GameConfig =
            serde_json::from_str(r#"{"max_rounds": 5, "reveal": "on_game_end"}"#).unwrap();
        assert_eq!(config.max_rounds, 5);
        assert_eq!(config.reveal, RevealPolicy::OnGameEnd);
        assert_eq!(config.vote_interval, 3);
        assert_eq!(config.house.address, DEFAULT_HOUSE_ADDRESS);
    }
}
