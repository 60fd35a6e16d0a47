//! Durable storage for the bearer credential.
//!
//! At most one credential exists at a time. Stores are synchronous and shared:
//! the interceptor only reads, the session controller reads and writes.

use std::fmt;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use keyring::Entry;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::{Config, CredentialBackend, APP_NAME};

/// Credential file name in cache directory
const CREDENTIAL_FILE: &str = "credential.json";

/// Opaque bearer token proving authentication.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Credential(String);

impl Credential {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.trim().is_empty()
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Credential(<{} bytes>)", self.0.len())
    }
}

pub trait CredentialStore: Send + Sync {
    /// Read the stored credential, if any. Empty values read as absent.
    fn get(&self) -> Result<Option<Credential>>;

    /// Replace the stored credential.
    fn set(&self, credential: &Credential) -> Result<()>;

    /// Remove the stored credential. Succeeds when nothing is stored.
    fn clear(&self) -> Result<()>;
}

/// Open the store selected by `config.credential_backend`.
pub fn open_store(config: &Config) -> Result<Arc<dyn CredentialStore>> {
    let store: Arc<dyn CredentialStore> = match config.credential_backend {
        CredentialBackend::File => Arc::new(FileCredentialStore::new(config.cache_dir()?)),
        CredentialBackend::Keyring => Arc::new(KeyringCredentialStore::new(&config.keyring_entry)),
        CredentialBackend::Memory => Arc::new(MemoryCredentialStore::new()),
    };
    debug!(backend = ?config.credential_backend, "Credential store opened");
    Ok(store)
}

// ============================================================================
// File store
// ============================================================================

#[derive(Debug, Serialize, Deserialize)]
struct StoredCredential {
    credential: Credential,
    saved_at: DateTime<Utc>,
}

/// Credential persisted as JSON in the cache directory.
pub struct FileCredentialStore {
    cache_dir: PathBuf,
}

impl FileCredentialStore {
    pub fn new(cache_dir: PathBuf) -> Self {
        Self { cache_dir }
    }

    fn credential_path(&self) -> PathBuf {
        self.cache_dir.join(CREDENTIAL_FILE)
    }
}

impl CredentialStore for FileCredentialStore {
    fn get(&self) -> Result<Option<Credential>> {
        let path = self.credential_path();
        if !path.exists() {
            return Ok(None);
        }

        let contents = std::fs::read_to_string(&path)
            .context("Failed to read credential file")?;
        let stored: StoredCredential = serde_json::from_str(&contents)
            .context("Failed to parse credential file")?;

        if stored.credential.is_empty() {
            return Ok(None);
        }
        debug!(saved_at = %stored.saved_at, "Loaded stored credential");
        Ok(Some(stored.credential))
    }

    fn set(&self, credential: &Credential) -> Result<()> {
        let path = self.credential_path();
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .context("Failed to create credential directory")?;
        }
        let stored = StoredCredential {
            credential: credential.clone(),
            saved_at: Utc::now(),
        };
        let contents = serde_json::to_string_pretty(&stored)?;
        std::fs::write(&path, contents).context("Failed to write credential file")?;
        Ok(())
    }

    fn clear(&self) -> Result<()> {
        let path = self.credential_path();
        if path.exists() {
            std::fs::remove_file(&path).context("Failed to remove credential file")?;
        }
        Ok(())
    }
}

// ============================================================================
// Keyring store
// ============================================================================

/// Credential held in a single OS keychain entry.
pub struct KeyringCredentialStore {
    entry_name: String,
}

impl KeyringCredentialStore {
    pub fn new(entry_name: &str) -> Self {
        Self {
            entry_name: entry_name.to_string(),
        }
    }

    fn entry(&self) -> Result<Entry> {
        Entry::new(APP_NAME, &self.entry_name).context("Failed to create keyring entry")
    }
}

impl CredentialStore for KeyringCredentialStore {
    fn get(&self) -> Result<Option<Credential>> {
        match self.entry()?.get_password() {
            Ok(token) => {
                let credential = Credential::new(token);
                Ok((!credential.is_empty()).then_some(credential))
            }
            Err(keyring::Error::NoEntry) => Ok(None),
            Err(e) => Err(e).context("Failed to retrieve credential from keychain"),
        }
    }

    fn set(&self, credential: &Credential) -> Result<()> {
        self.entry()?
            .set_password(credential.as_str())
            .context("Failed to store credential in keychain")
    }

    fn clear(&self) -> Result<()> {
        match self.entry()?.delete_credential() {
            Ok(()) | Err(keyring::Error::NoEntry) => Ok(()),
            Err(e) => Err(e).context("Failed to delete credential from keychain"),
        }
    }
}

// ============================================================================
// Memory store
// ============================================================================

/// Process-local store; nothing survives a restart.
#[derive(Default)]
pub struct MemoryCredentialStore {
    slot: Mutex<Option<Credential>>,
}

impl MemoryCredentialStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_credential(credential: Credential) -> Self {
        Self {
            slot: Mutex::new(Some(credential)),
        }
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Option<Credential>> {
        // A poisoned slot still holds a valid Option
        self.slot.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl CredentialStore for MemoryCredentialStore {
    fn get(&self) -> Result<Option<Credential>> {
        Ok(self.lock().clone().filter(|c| !c.is_empty()))
    }

    fn set(&self, credential: &Credential) -> Result<()> {
        *self.lock() = Some(credential.clone());
        Ok(())
    }

    fn clear(&self) -> Result<()> {
        *self.lock() = None;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_credential_debug_is_redacted() {
        let credential = Credential::new("eyJhbGciOiJIUzI1NiJ9.secret");
        let shown = format!("{:?}", credential);
        assert!(!shown.contains("secret"));
        assert!(shown.contains("bytes"));
    }

    #[test]
    fn test_memory_store_lifecycle() {
        let store = MemoryCredentialStore::new();
        assert!(store.get().unwrap().is_none());

        store.set(&Credential::new("tok-1")).unwrap();
        assert_eq!(store.get().unwrap(), Some(Credential::new("tok-1")));

        store.set(&Credential::new("tok-2")).unwrap();
        assert_eq!(store.get().unwrap(), Some(Credential::new("tok-2")));

        store.clear().unwrap();
        store.clear().unwrap();
        assert!(store.get().unwrap().is_none());
    }

    #[test]
    fn test_memory_store_empty_reads_absent() {
        let store = MemoryCredentialStore::with_credential(Credential::new("  "));
        assert!(store.get().unwrap().is_none());
    }

    #[test]
    fn test_file_store_survives_reopen() {
        let dir = tempfile::tempdir().expect("tempdir should be created");
        let store = FileCredentialStore::new(dir.path().join("vitrine"));
        assert!(store.get().unwrap().is_none());

        store.set(&Credential::new("tok-1")).unwrap();

        let reopened = FileCredentialStore::new(dir.path().join("vitrine"));
        assert_eq!(reopened.get().unwrap(), Some(Credential::new("tok-1")));

        reopened.clear().unwrap();
        assert!(store.get().unwrap().is_none());
        // Clearing again is a no-op
        reopened.clear().unwrap();
    }

    #[test]
    fn test_file_store_rejects_corrupt_file() {
        let dir = tempfile::tempdir().expect("tempdir should be created");
        std::fs::write(dir.path().join(CREDENTIAL_FILE), "not json").unwrap();
        let store = FileCredentialStore::new(dir.path().to_path_buf());
        assert!(store.get().is_err());
    }

    #[test]
    fn test_file_store_empty_credential_reads_absent() {
        let dir = tempfile::tempdir().expect("tempdir should be created");
        let store = FileCredentialStore::new(dir.path().to_path_buf());
        store.set(&Credential::new("")).unwrap();
        assert!(store.get().unwrap().is_none());
    }

    #[test]
    fn test_open_store_memory_backend() {
        let config = Config {
            credential_backend: CredentialBackend::Memory,
            ..Config::default()
        };
        let store = open_store(&config).expect("memory store should open");
        store.set(&Credential::new("tok-1")).unwrap();
        assert!(store.get().unwrap().is_some());
    }
}
