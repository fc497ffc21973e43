//! Store configuration.
//!
//! All fields have defaults matching the browser build, so an empty JSON
//! object (or no config file at all) gives the original behavior.
//!
//! ```
//! use moneyquest_logic::config::StoreConfig;
//!
//! let config = StoreConfig::from_json_str(r#"{"enforceEquipOwnership": true}"#).unwrap();
//! assert!(config.enforce_equip_ownership);
//! assert!(config.repeat_level_rewards);
//! assert_eq!(config.storage_key, "gameProgress");
//! ```

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::storage::storage_keys;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid config: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct StoreConfig {
    /// Storage key of the progress record.
    pub storage_key: String,
    /// Storage key of the last daily bonus claim date.
    pub daily_bonus_key: String,
    /// Pay coins and stars again when an already completed level is replayed.
    pub repeat_level_rewards: bool,
    /// Refuse to equip items the player does not own.
    pub enforce_equip_ownership: bool,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            storage_key: storage_keys::GAME_PROGRESS.to_string(),
            daily_bonus_key: storage_keys::LAST_DAILY_BONUS.to_string(),
            repeat_level_rewards: true,
            enforce_equip_ownership: false,
        }
    }
}

impl StoreConfig {
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let data = fs::read_to_string(path)?;
        Self::from_json_str(&data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_object_is_default() {
        assert_eq!(StoreConfig::from_json_str("{}").unwrap(), StoreConfig::default());
    }

    #[test]
    fn test_custom_keys() {
        let config =
            StoreConfig::from_json_str(r#"{"storageKey": "slot2", "repeatLevelRewards": false}"#)
                .unwrap();
        assert_eq!(config.storage_key, "slot2");
        assert_eq!(config.daily_bonus_key, storage_keys::LAST_DAILY_BONUS);
        assert!(!config.repeat_level_rewards);
    }

    #[test]
    fn test_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("moneyquest.json");
        fs::write(&path, r#"{"enforceEquipOwnership": true}"#).unwrap();
        assert!(StoreConfig::from_file(&path).unwrap().enforce_equip_ownership);
        assert!(matches!(
            StoreConfig::from_file(dir.path().join("missing.json")),
            Err(ConfigError::Io(_))
        ));
    }

    #[test]
    fn test_wrong_type_rejected() {
        assert!(matches!(
            StoreConfig::from_json_str(r#"{"repeatLevelRewards": "yes"}"#),
            Err(ConfigError::Json(_))
        ));
    }
}
