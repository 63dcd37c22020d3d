//! Application configuration management.
//!
//! Configuration holds the backend base URLs, the token storage backend,
//! and the last username used to log in.
//!
//! Configuration is stored at `~/.config/shellgate/config.json`. A missing
//! file yields the compiled-in defaults.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::auth::{FileStorage, KeyringStorage, NoopStorage, TokenStorage};

/// Application name used for config/data directory paths
const APP_NAME: &str = "shellgate";

/// Config file name
const CONFIG_FILE: &str = "config.json";

/// Base URL of the auth API
pub const DEFAULT_API_URL: &str = "http://localhost:8080/api/v1";

/// Base URL of the integration API (secondary login, dashboard)
pub const DEFAULT_INTEGRATION_URL: &str = "http://localhost:8080/api";

/// Where the session token is persisted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageKind {
    #[default]
    File,
    Keyring,
    None,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub api_url: String,
    pub integration_url: String,
    pub storage: StorageKind,
    pub last_username: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            integration_url: DEFAULT_INTEGRATION_URL.to_string(),
            storage: StorageKind::default(),
            last_username: None,
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path()?)
    }

    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_path()?)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if path.exists() {
            let contents = std::fs::read_to_string(path)
                .context("Failed to read config file")?;
            serde_json::from_str(&contents).context("Failed to parse config file")
        } else {
            Ok(Self::default())
        }
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let contents = serde_json::to_string_pretty(self)?;
        std::fs::write(path, contents).context("Failed to write config file")?;
        Ok(())
    }

    fn config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not find config directory"))?;
        Ok(config_dir.join(APP_NAME).join(CONFIG_FILE))
    }

    pub fn data_dir(&self) -> Result<PathBuf> {
        let data_dir = dirs::data_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not find data directory"))?;
        Ok(data_dir.join(APP_NAME))
    }

    /// Build the configured token storage backend
    pub fn token_storage(&self) -> Result<Box<dyn TokenStorage>> {
        Ok(match self.storage {
            StorageKind::File => Box::new(FileStorage::new(self.data_dir()?)),
            StorageKind::Keyring => Box::new(KeyringStorage),
            StorageKind::None => Box::new(NoopStorage),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.api_url, "http://localhost:8080/api/v1");
        assert_eq!(config.integration_url, "http://localhost:8080/api");
        assert_eq!(config.storage, StorageKind::File);
        assert_eq!(config.last_username, None);
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let config: Config = serde_json::from_str(r#"{"storage": "keyring"}"#).unwrap();
        assert_eq!(config.storage, StorageKind::Keyring);
        assert_eq!(config.api_url, DEFAULT_API_URL);
    }

    #[test]
    fn test_storage_kind_names() {
        let kind: StorageKind = serde_json::from_str(r#""none""#).unwrap();
        assert_eq!(kind, StorageKind::None);
        assert!(serde_json::from_str::<StorageKind>(r#""cookies""#).is_err());
    }

    #[test]
    fn test_save_and_load() {
        let dir = std::env::temp_dir().join(format!("shellgate-config-{}", std::process::id()));
        let path = dir.join(CONFIG_FILE);
        let _ = std::fs::remove_dir_all(&dir);

        assert_eq!(Config::load_from(&path).unwrap(), Config::default());

        let config = Config {
            last_username: Some("a@b.com".to_string()),
            storage: StorageKind::None,
            ..Config::default()
        };
        config.save_to(&path).unwrap();
        assert_eq!(Config::load_from(&path).unwrap(), config);

        let _ = std::fs::remove_dir_all(dir);
    }
}
