//! Flat-file credential store implementation
//!
//! Users live in a single JSON object keyed by username. Writes go through
//! a temp file in the same directory and are moved into place, so a crash
//! mid-write leaves the old file intact. Read-modify-write sequences take an
//! exclusive lock on a sidecar file so concurrent registrations cannot drop
//! each other.

use std::collections::BTreeMap;
use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use fs2::FileExt;
use tempfile::NamedTempFile;

use crate::domain::result::{Error, Result};
use crate::domain::UserRecord;
use crate::ports::CredentialStore;

/// Credential store backed by a users.json file
pub struct FileCredentialStore {
    path: PathBuf,
}

impl FileCredentialStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_users(&self) -> Result<BTreeMap<String, UserRecord>> {
        if !self.path.exists() {
            return Ok(BTreeMap::new());
        }
        let content = std::fs::read_to_string(&self.path)?;
        serde_json::from_str(&content).map_err(|e| {
            Error::store(format!(
                "{} is not a valid user store: {}",
                self.path.display(),
                e
            ))
        })
    }

    fn write_users(&self, users: &BTreeMap<String, UserRecord>) -> Result<()> {
        let dir = self.path.parent().ok_or_else(|| {
            Error::store(format!("{} has no parent directory", self.path.display()))
        })?;
        std::fs::create_dir_all(dir)?;

        let mut temp = NamedTempFile::new_in(dir)?;
        let content = serde_json::to_string_pretty(users)?;
        temp.write_all(content.as_bytes())?;
        temp.persist(&self.path).map_err(|e| Error::Io(e.error))?;
        log::debug!("wrote {} users to {}", users.len(), self.path.display());
        Ok(())
    }

    /// Take the sidecar lock. Held for the lifetime of the returned handle.
    fn lock_exclusive(&self) -> Result<File> {
        let lock_path = self.path.with_extension("json.lock");
        if let Some(dir) = lock_path.parent() {
            std::fs::create_dir_all(dir)?;
        }
        let lock = OpenOptions::new()
            .create(true)
            .write(true)
            .open(&lock_path)?;
        lock.lock_exclusive()?;
        Ok(lock)
    }
}

impl CredentialStore for FileCredentialStore {
    fn load_all(&self) -> Result<BTreeMap<String, UserRecord>> {
        self.read_users()
    }

    fn save_all(&self, users: &BTreeMap<String, UserRecord>) -> Result<()> {
        self.write_users(users)
    }

    fn insert_if_absent(&self, username: &str, record: UserRecord) -> Result<bool> {
        let _lock = self.lock_exclusive()?;
        let mut users = self.read_users()?;
        if users.contains_key(username) {
            return Ok(false);
        }
        users.insert(username.to_string(), record);
        self.write_users(&users)?;
        Ok(true)
    }

    fn find(&self, username: &str) -> Result<Option<UserRecord>> {
        Ok(self.read_users()?.get(username).cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn store_in(dir: &TempDir) -> FileCredentialStore {
        FileCredentialStore::new(dir.path().join("users.json"))
    }

    #[test]
    fn test_missing_file_loads_empty() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);
        assert!(store.load_all().unwrap().is_empty());
    }

    #[test]
    fn test_save_and_reload() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);

        let mut users = BTreeMap::new();
        users.insert(
            "alice".to_string(),
            UserRecord::new("hash-a".to_string(), "alice@example.com".to_string()),
        );
        users.insert(
            "bob".to_string(),
            UserRecord::new("hash-b".to_string(), "bob@example.com".to_string()),
        );
        store.save_all(&users).unwrap();

        let loaded = store.load_all().unwrap();
        assert_eq!(loaded.len(), 2);
        assert_eq!(loaded["alice"].email, "alice@example.com");
        assert_eq!(store.find("bob").unwrap().unwrap().password_hash, "hash-b");
        assert!(store.find("carol").unwrap().is_none());
    }

    #[test]
    fn test_insert_if_absent_rejects_duplicates() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);

        let first = UserRecord::new("hash-1".to_string(), "one@example.com".to_string());
        let second = UserRecord::new("hash-2".to_string(), "two@example.com".to_string());

        assert!(store.insert_if_absent("alice", first).unwrap());
        assert!(!store.insert_if_absent("alice", second).unwrap());

        // The losing insert must not overwrite the stored record.
        let loaded = store.load_all().unwrap();
        assert_eq!(loaded.len(), 1);
        assert_eq!(loaded["alice"].password_hash, "hash-1");
    }

    #[test]
    fn test_corrupt_store_is_an_error_not_a_reset() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);
        std::fs::write(store.path(), "{ not json").unwrap();

        assert!(store.load_all().is_err());
        // A rejected load must not be followed by silent truncation.
        assert_eq!(std::fs::read_to_string(store.path()).unwrap(), "{ not json");
    }

    #[test]
    fn test_save_creates_parent_directory() {
        let dir = TempDir::new().unwrap();
        let store = FileCredentialStore::new(dir.path().join("nested").join("users.json"));
        store.save_all(&BTreeMap::new()).unwrap();
        assert!(store.path().exists());
    }
}
