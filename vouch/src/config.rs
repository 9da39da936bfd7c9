// Copyright (c) 2026 Vouch Foundation

use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::telemetry::TelemetryConfig;

/// Main configuration for a Vouch node
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub consensus: ConsensusConfig,
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub telemetry: TelemetryConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConsensusConfig {
    /// Length of one production slot in seconds
    #[serde(default = "default_slot_length_secs")]
    pub slot_length_secs: u64,

    /// Maximum pending transactions pulled into one block
    #[serde(default = "default_tx_per_block")]
    pub tx_per_block: usize,

    /// Oldest a transaction may be, relative to its block's slot time
    #[serde(default = "default_max_tx_age_secs")]
    pub max_tx_age_secs: i64,

    /// Witness account ids in schedule order
    #[serde(default)]
    pub witnesses: Vec<String>,
}

fn default_slot_length_secs() -> u64 {
    3
}

fn default_tx_per_block() -> usize {
    1000
}

fn default_max_tx_age_secs() -> i64 {
    60
}

impl Default for ConsensusConfig {
    fn default() -> Self {
        Self {
            slot_length_secs: default_slot_length_secs(),
            tx_per_block: default_tx_per_block(),
            max_tx_age_secs: default_max_tx_age_secs(),
            witnesses: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Directory holding the node's databases
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
        }
    }
}

impl StorageConfig {
    /// Directory of the receipt merkle tree store.
    pub fn merkle_db_path(&self) -> PathBuf {
        self.data_dir.join("txr_merkle")
    }
}

impl Config {
    /// Load config from a file
    pub fn load(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config from {}", path.display()))?;

        let config: Self = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config from {}", path.display()))?;
        config.validate()?;
        Ok(config)
    }

    /// Save config to a file
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory {}", parent.display()))?;
        }

        let contents = toml::to_string_pretty(self).context("Failed to serialize config")?;

        fs::write(path, contents)
            .with_context(|| format!("Failed to write config to {}", path.display()))?;
        Ok(())
    }

    pub fn validate(&self) -> Result<()> {
        if self.consensus.slot_length_secs == 0 {
            return Err(anyhow!("consensus.slot_length_secs must be positive"));
        }
        if self.consensus.tx_per_block == 0 {
            return Err(anyhow!("consensus.tx_per_block must be positive"));
        }
        Ok(())
    }
}

/// Get the default data directory path
pub fn default_data_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".vouch")
}

/// Get the default config file path
pub fn default_config_path() -> PathBuf {
    default_data_dir().join("config.toml")
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_config_roundtrip() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let mut config = Config::default();
        config.consensus.witnesses = vec!["VCHa".into(), "VCHb".into()];
        config.storage.data_dir = dir.path().to_path_buf();
        config.save(&path).unwrap();

        let loaded = Config::load(&path).unwrap();
        assert_eq!(loaded.consensus.witnesses, config.consensus.witnesses);
        assert_eq!(loaded.consensus.slot_length_secs, 3);
        assert_eq!(loaded.storage.data_dir, dir.path());
    }

    #[test]
    fn test_defaults_from_empty_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "[consensus]\nwitnesses = [\"VCHx\"]\n").unwrap();

        let config = Config::load(&path).unwrap();
        assert_eq!(config.consensus.tx_per_block, 1000);
        assert_eq!(config.consensus.max_tx_age_secs, 60);
        assert_eq!(config.consensus.witnesses, vec!["VCHx"]);
        assert!(!config.telemetry.enabled);
    }

    #[test]
    fn test_zero_slot_length_rejected() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "[consensus]\nslot_length_secs = 0\n").unwrap();

        assert!(Config::load(&path).is_err());
    }

    #[test]
    fn test_missing_file() {
        assert!(Config::load(Path::new("/nonexistent/vouch.toml")).is_err());
    }
}
