use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use stakeout_core::NetworkConfig;
use stakeout_game::GameConfig;
use std::path::{Path, PathBuf};

pub const CONFIG_FILE: &str = "stakeout.json";
pub const HOUSE_KEY_ENV: &str = "STAKEOUT_HOUSE_KEY";
pub const PLAYER_KEY_ENV: &str = "STAKEOUT_PLAYER_KEY";

/// Contents of `stakeout.json`. Private keys are never written to disk.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CliConfig {
    pub network: NetworkConfig,
    pub game: GameConfig,
    /// Play against an in-process ledger and canned agents.
    pub offline: bool,
    /// Address used by `play` and `balance` when none is given.
    pub player_address: Option<String>,
}

pub fn default_data_dir() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("stakeout")
}

impl CliConfig {
    pub fn path(data_dir: &Path) -> PathBuf {
        data_dir.join(CONFIG_FILE)
    }

    /// Load the config file, falling back to defaults when it does not exist.
    pub fn load(data_dir: &Path) -> Result<Self> {
        let path = Self::path(data_dir);
        if !path.exists() {
            tracing::debug!("No config at {}, using defaults", path.display());
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(&path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        let config = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse {}", path.display()))?;
        Ok(config)
    }

    pub fn save(&self, data_dir: &Path) -> Result<PathBuf> {
        std::fs::create_dir_all(data_dir)
            .with_context(|| format!("Failed to create {}", data_dir.display()))?;

        let path = Self::path(data_dir);
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(&path, content)
            .with_context(|| format!("Failed to write {}", path.display()))?;
        Ok(path)
    }

    /// Pick up secrets from the environment.
    pub fn apply_env(&mut self) {
        self.apply_house_key(std::env::var(HOUSE_KEY_ENV).ok());
    }

    fn apply_house_key(&mut self, key: Option<String>) {
        if let Some(key) = key.filter(|k| !k.trim().is_empty()) {
            self.game.house.private_key = key;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use stakeout_game::RevealPolicy;
    use tempfile::TempDir;

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = TempDir::new().unwrap();
        let config = CliConfig::load(dir.path()).unwrap();

        assert!(!config.offline);
        assert_eq!(config.game.max_rounds, 8);
        assert!(config.player_address.is_none());
    }

    #[test]
    fn test_save_then_load() {
        let dir = TempDir::new().unwrap();
        let mut config = CliConfig::default();
        config.offline = true;
        config.game.max_rounds = 5;
        config.game.reveal = RevealPolicy::OnGameEnd;
        config.player_address = Some("ST-PLAYER".to_string());

        let path = config.save(dir.path()).unwrap();
        assert_eq!(path, dir.path().join(CONFIG_FILE));

        let loaded = CliConfig::load(dir.path()).unwrap();
        assert!(loaded.offline);
        assert_eq!(loaded.game.max_rounds, 5);
        assert_eq!(loaded.game.reveal, RevealPolicy::OnGameEnd);
        assert_eq!(loaded.player_address.as_deref(), Some("ST-PLAYER"));
    }

    #[test]
    fn test_house_key_is_not_persisted() {
        let dir = TempDir::new().unwrap();
        let mut config = CliConfig::default();
        config.apply_house_key(Some("house-secret".to_string()));
        assert_eq!(config.game.house.private_key, "house-secret");

        let path = config.save(dir.path()).unwrap();
        let raw = std::fs::read_to_string(path).unwrap();
        assert!(!raw.contains("house-secret"));

        let loaded = CliConfig::load(dir.path()).unwrap();
        assert!(loaded.game.house.private_key.is_empty());
    }

    #[test]
    fn test_blank_house_key_is_ignored() {
        let mut config = CliConfig::default();
        config.apply_house_key(Some("  ".to_string()));
        config.apply_house_key(None);
        assert!(config.game.house.private_key.is_empty());
    }

    #[test]
    fn test_partial_file() {
        let dir = TempDir::new().unwrap();
        std::fs::write(
            dir.path().join(CONFIG_FILE),
            r#"{"network": {"ledger_url": "http://ledger:8080"}, "game": {"roster_size": 6}}"#,
        )
        .unwrap();

        let config = CliConfig::load(dir.path()).unwrap();
        assert_eq!(config.network.ledger_url, "http://ledger:8080");
        assert_eq!(config.network.responder_url, "http://localhost:3000");
        assert_eq!(config.game.roster_size, 6);
    }

    #[test]
    fn test_malformed_file_is_an_error() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join(CONFIG_FILE), "{ not json").unwrap();
        assert!(CliConfig::load(dir.path()).is_err());
    }
}
