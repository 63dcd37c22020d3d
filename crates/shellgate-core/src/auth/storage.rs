//! Persistent key/value storage for the session token.
//!
//! Contexts without persistence use `NoopStorage`, which silently drops
//! writes and reads nothing.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Mutex;

use anyhow::{Context, Result};
use keyring::Entry;
use tracing::warn;

/// Storage file name in the data directory
const STORAGE_FILE: &str = "storage.json";

/// Keychain service name for `KeyringStorage`
const SERVICE_NAME: &str = "shellgate";

pub trait TokenStorage: Send {
    fn get(&self, key: &str) -> Result<Option<String>>;
    fn set(&self, key: &str, value: &str) -> Result<()>;
    fn remove(&self, key: &str) -> Result<()>;
}

/// No persistence available
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopStorage;

impl TokenStorage for NoopStorage {
    fn get(&self, _key: &str) -> Result<Option<String>> {
        Ok(None)
    }

    fn set(&self, _key: &str, _value: &str) -> Result<()> {
        Ok(())
    }

    fn remove(&self, _key: &str) -> Result<()> {
        Ok(())
    }
}

/// In-process storage, lost when the process exits
#[derive(Debug, Default)]
pub struct MemoryStorage {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create storage pre-populated with a single entry
    pub fn with_entry(key: &str, value: &str) -> Self {
        let storage = Self::new();
        storage.lock().insert(key.to_string(), value.to_string());
        storage
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<String, String>> {
        // A poisoned map is still a valid map
        self.entries.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl TokenStorage for MemoryStorage {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.lock().get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        self.lock().insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        self.lock().remove(key);
        Ok(())
    }
}

/// JSON key/value file on disk
pub struct FileStorage {
    dir: PathBuf,
}

impl FileStorage {
    pub fn new(dir: PathBuf) -> Self {
        Self { dir }
    }

    fn storage_path(&self) -> PathBuf {
        self.dir.join(STORAGE_FILE)
    }

    fn read_contents(&self) -> Result<Option<String>> {
        let path = self.storage_path();
        if !path.exists() {
            return Ok(None);
        }
        let contents = std::fs::read_to_string(&path)
            .context("Failed to read storage file")?;
        Ok(Some(contents))
    }

    fn load(&self) -> Result<HashMap<String, String>> {
        match self.read_contents()? {
            Some(contents) => {
                serde_json::from_str(&contents).context("Failed to parse storage file")
            }
            None => Ok(HashMap::new()),
        }
    }

    /// Load entries ahead of a write. An unparsable file is replaced
    /// rather than blocking every later write; the flag reports that case.
    fn load_for_write(&self) -> Result<(HashMap<String, String>, bool)> {
        let Some(contents) = self.read_contents()? else {
            return Ok((HashMap::new(), false));
        };
        match serde_json::from_str(&contents) {
            Ok(entries) => Ok((entries, false)),
            Err(e) => {
                warn!(error = %e, path = ?self.storage_path(), "Overwriting corrupt storage file");
                Ok((HashMap::new(), true))
            }
        }
    }

    fn save(&self, entries: &HashMap<String, String>) -> Result<()> {
        let path = self.storage_path();
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let contents = serde_json::to_string_pretty(entries)?;
        std::fs::write(path, contents).context("Failed to write storage file")?;
        Ok(())
    }
}

impl TokenStorage for FileStorage {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.load()?.remove(key))
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        let (mut entries, _) = self.load_for_write()?;
        entries.insert(key.to_string(), value.to_string());
        self.save(&entries)
    }

    fn remove(&self, key: &str) -> Result<()> {
        let (mut entries, corrupt) = self.load_for_write()?;
        if entries.remove(key).is_some() || corrupt {
            self.save(&entries)?;
        }
        Ok(())
    }
}

/// OS keychain, one entry per key
#[derive(Debug, Default, Clone, Copy)]
pub struct KeyringStorage;

impl KeyringStorage {
    fn entry(key: &str) -> Result<Entry> {
        Entry::new(SERVICE_NAME, key).context("Failed to create keyring entry")
    }
}

impl TokenStorage for KeyringStorage {
    fn get(&self, key: &str) -> Result<Option<String>> {
        match Self::entry(key)?.get_password() {
            Ok(value) => Ok(Some(value)),
            Err(keyring::Error::NoEntry) => Ok(None),
            Err(e) => Err(e).context("Failed to read token from keychain"),
        }
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        Self::entry(key)?
            .set_password(value)
            .context("Failed to store token in keychain")
    }

    fn remove(&self, key: &str) -> Result<()> {
        match Self::entry(key)?.delete_credential() {
            Ok(()) | Err(keyring::Error::NoEntry) => Ok(()),
            Err(e) => Err(e).context("Failed to delete token from keychain"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("shellgate-{}-{}", name, std::process::id()));
        let _ = std::fs::remove_dir_all(&dir);
        dir
    }

    #[test]
    fn test_noop_storage_reads_nothing() {
        let storage = NoopStorage;
        storage.set("token", "abc").unwrap();
        assert_eq!(storage.get("token").unwrap(), None);
        storage.remove("token").unwrap();
    }

    #[test]
    fn test_memory_storage() {
        let storage = MemoryStorage::new();
        assert_eq!(storage.get("token").unwrap(), None);
        storage.set("token", "abc").unwrap();
        assert_eq!(storage.get("token").unwrap().as_deref(), Some("abc"));
        storage.remove("token").unwrap();
        assert_eq!(storage.get("token").unwrap(), None);
    }

    #[test]
    fn test_file_storage_persists_across_instances() {
        let dir = temp_dir("file-persist");
        FileStorage::new(dir.clone()).set("token", "abc").unwrap();

        let reopened = FileStorage::new(dir.clone());
        assert_eq!(reopened.get("token").unwrap().as_deref(), Some("abc"));

        reopened.remove("token").unwrap();
        assert_eq!(FileStorage::new(dir.clone()).get("token").unwrap(), None);
        let _ = std::fs::remove_dir_all(dir);
    }

    #[test]
    fn test_file_storage_missing_file() {
        let storage = FileStorage::new(temp_dir("file-missing"));
        assert_eq!(storage.get("token").unwrap(), None);
        // Removing from an absent file is a no-op
        storage.remove("token").unwrap();
        assert!(!storage.storage_path().exists());
    }

    fn corrupt_storage_dir(name: &str) -> PathBuf {
        let dir = temp_dir(name);
        std::fs::create_dir_all(&dir).unwrap();
        std::fs::write(dir.join(STORAGE_FILE), "not json").unwrap();
        dir
    }

    #[test]
    fn test_file_storage_corrupt_file() {
        let dir = corrupt_storage_dir("file-corrupt");
        assert!(FileStorage::new(dir.clone()).get("token").is_err());
        let _ = std::fs::remove_dir_all(dir);
    }

    #[test]
    fn test_file_storage_set_replaces_corrupt_file() {
        let dir = corrupt_storage_dir("file-corrupt-set");
        let storage = FileStorage::new(dir.clone());

        storage.set("token", "t").unwrap();
        assert_eq!(storage.get("token").unwrap().as_deref(), Some("t"));
        let _ = std::fs::remove_dir_all(dir);
    }

    #[test]
    fn test_file_storage_remove_replaces_corrupt_file() {
        let dir = corrupt_storage_dir("file-corrupt-remove");
        let storage = FileStorage::new(dir.clone());

        storage.remove("token").unwrap();
        assert_eq!(storage.get("token").unwrap(), None);
        let _ = std::fs::remove_dir_all(dir);
    }
}
