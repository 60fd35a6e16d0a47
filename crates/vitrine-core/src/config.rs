//! Application configuration management.
//!
//! This module handles loading and saving the client configuration: which
//! API to talk to, where the credential is persisted, and the last identifier
//! used to log in.
//!
//! Configuration is stored at `~/.config/vitrine/config.json`.

use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::warn;

/// Application name used for config/cache directory paths
pub const APP_NAME: &str = "vitrine";

/// Config file name
const CONFIG_FILE: &str = "config.json";

/// Backend served by the storefront API in development.
const DEFAULT_API_BASE_URL: &str = "http://localhost:5000/api";

/// HTTP request timeout in seconds.
const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

/// Keychain entry holding the bearer credential.
const DEFAULT_KEYRING_ENTRY: &str = "credential";

/// Environment variable overriding `api_base_url`
pub const ENV_API_URL: &str = "VITRINE_API_URL";

/// Environment variable overriding `credential_backend`
pub const ENV_CREDENTIAL_BACKEND: &str = "VITRINE_CREDENTIAL_BACKEND";

/// Where the bearer credential is persisted between runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum CredentialBackend {
    /// JSON file in the cache directory
    #[default]
    File,
    /// OS keychain entry
    Keyring,
    /// Process memory only; every run starts anonymous
    Memory,
}

impl FromStr for CredentialBackend {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "file" => Ok(Self::File),
            "keyring" => Ok(Self::Keyring),
            "memory" => Ok(Self::Memory),
            other => Err(anyhow::anyhow!("Unknown credential backend: {}", other)),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub api_base_url: String,
    pub request_timeout_secs: u64,
    pub credential_backend: CredentialBackend,
    pub keyring_entry: String,
    pub log_to_file: bool,
    pub last_identifier: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            request_timeout_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
            credential_backend: CredentialBackend::default(),
            keyring_entry: DEFAULT_KEYRING_ENTRY.to_string(),
            log_to_file: false,
            last_identifier: None,
        }
    }
}

impl Config {
    /// Load the config file (defaults when absent) and apply environment overrides.
    pub fn load() -> Result<Self> {
        let path = Self::config_path()?;
        let mut config = Self::load_from(&path)?;
        config.apply_env_overrides();
        Ok(config)
    }

    pub fn load_from(path: &std::path::Path) -> Result<Self> {
        if path.exists() {
            let contents = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read config file {}", path.display()))?;
            serde_json::from_str(&contents).context("Failed to parse config file")
        } else {
            Ok(Self::default())
        }
    }

    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_path()?)
    }

    pub fn save_to(&self, path: &std::path::Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let contents = serde_json::to_string_pretty(self)?;
        std::fs::write(path, contents)?;
        Ok(())
    }

    /// Persist `identifier` as the last one used. Only that field is written:
    /// the file is re-read so run-time overrides held in memory never land on disk.
    pub fn remember_identifier(identifier: &str) -> Result<()> {
        Self::remember_identifier_at(&Self::config_path()?, identifier)
    }

    pub fn remember_identifier_at(path: &std::path::Path, identifier: &str) -> Result<()> {
        let mut stored = Self::load_from(path)?;
        stored.last_identifier = Some(identifier.to_string());
        stored.save_to(path)
    }

    fn apply_env_overrides(&mut self) {
        if let Ok(url) = std::env::var(ENV_API_URL) {
            if !url.trim().is_empty() {
                self.api_base_url = url.trim().to_string();
            }
        }
        if let Ok(raw) = std::env::var(ENV_CREDENTIAL_BACKEND) {
            match raw.parse() {
                Ok(backend) => self.credential_backend = backend,
                Err(e) => warn!(error = %e, "Ignoring credential backend override"),
            }
        }
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    fn config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not find config directory"))?;
        Ok(config_dir.join(APP_NAME).join(CONFIG_FILE))
    }

    pub fn cache_dir(&self) -> Result<PathBuf> {
        let cache_dir = dirs::cache_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not find cache directory"))?;
        Ok(cache_dir.join(APP_NAME))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.api_base_url, "http://localhost:5000/api");
        assert_eq!(config.request_timeout(), Duration::from_secs(30));
        assert_eq!(config.credential_backend, CredentialBackend::File);
        assert_eq!(config.keyring_entry, "credential");
        assert!(config.last_identifier.is_none());
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let config: Config =
            serde_json::from_str(r#"{"credential_backend": "keyring", "last_identifier": "admin@loja.com"}"#)
                .expect("partial config should parse");
        assert_eq!(config.credential_backend, CredentialBackend::Keyring);
        assert_eq!(config.last_identifier.as_deref(), Some("admin@loja.com"));
        assert_eq!(config.api_base_url, DEFAULT_API_BASE_URL);
    }

    #[test]
    fn test_save_and_load_from_path() {
        let dir = tempfile::tempdir().expect("tempdir should be created");
        let path = dir.path().join("nested").join(CONFIG_FILE);

        let config = Config {
            api_base_url: "https://loja.example/api".to_string(),
            log_to_file: true,
            ..Config::default()
        };
        config.save_to(&path).expect("config should save");

        let loaded = Config::load_from(&path).expect("config should load");
        assert_eq!(loaded.api_base_url, "https://loja.example/api");
        assert!(loaded.log_to_file);
    }

    #[test]
    fn test_remember_identifier_keeps_overrides_off_disk() {
        let dir = tempfile::tempdir().expect("tempdir should be created");
        let path = dir.path().join(CONFIG_FILE);
        Config {
            api_base_url: "https://loja.example/api".to_string(),
            ..Config::default()
        }
        .save_to(&path)
        .expect("config should save");

        // Overrides applied for this run only
        let mut running = Config::load_from(&path).expect("config should load");
        running.api_base_url = "http://127.0.0.1:9999/api".to_string();
        running.credential_backend = CredentialBackend::Memory;

        Config::remember_identifier_at(&path, "admin@loja.com").expect("identifier should save");

        let stored = Config::load_from(&path).expect("config should load");
        assert_eq!(stored.api_base_url, "https://loja.example/api");
        assert_eq!(stored.credential_backend, CredentialBackend::File);
        assert_eq!(stored.last_identifier.as_deref(), Some("admin@loja.com"));
    }

    #[test]
    fn test_missing_file_yields_defaults() {
        let dir = tempfile::tempdir().expect("tempdir should be created");
        let loaded = Config::load_from(&dir.path().join(CONFIG_FILE)).expect("defaults");
        assert_eq!(loaded.api_base_url, DEFAULT_API_BASE_URL);
    }

    #[test]
    fn test_backend_from_str() {
        assert_eq!("file".parse::<CredentialBackend>().ok(), Some(CredentialBackend::File));
        assert_eq!(" Keyring ".parse::<CredentialBackend>().ok(), Some(CredentialBackend::Keyring));
        assert_eq!("MEMORY".parse::<CredentialBackend>().ok(), Some(CredentialBackend::Memory));
        assert!("cookie".parse::<CredentialBackend>().is_err());
    }
}
