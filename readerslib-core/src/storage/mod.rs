//! Key-value storage adapters
//!
//! Every persisted piece of ReadersLib state lives under a single string key
//! and is stored as a string. Callers serialize JSON themselves.

use crate::error::StorageError;
use std::collections::HashMap;
use std::path::{Component, Path, PathBuf};
use std::sync::RwLock;

/// Result type for storage operations
pub type StorageResult<T> = std::result::Result<T, StorageError>;

/// Key holding the serialized `{username: UserRecord}` map
pub const USERS_KEY: &str = "readerslib_users";

/// Key holding the raw username of the signed-in user
pub const CURRENT_USER_KEY: &str = "readerslib_currentUser";

/// Key holding the catalog cache entry
pub const BOOKS_CACHE_KEY: &str = "readerslib_books_cache";

/// Persistent, synchronous, string-keyed store
///
/// Reads never fail: an unreadable entry is reported as absent. Writes
/// return an error the caller is expected to log and carry on from.
pub trait KeyValueStore: Send + Sync {
    /// Read the value stored under `key`
    fn get(&self, key: &str) -> Option<String>;

    /// Store `value` under `key`, replacing any previous value
    fn set(&self, key: &str, value: &str) -> StorageResult<()>;

    /// Delete `key`; missing keys are ignored
    fn remove(&self, key: &str);
}

/// Store keeping one file per key under a root directory
pub struct FileStore {
    root: PathBuf,
}

impl FileStore {
    /// Create a file store rooted at the given directory
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Resolve a key to its file, rejecting anything but a plain file name
    fn entry_path(&self, key: &str) -> StorageResult<PathBuf> {
        let mut components = Path::new(key).components();
        match (components.next(), components.next()) {
            (Some(Component::Normal(name)), None) => Ok(self.root.join(name)),
            _ => Err(StorageError::InvalidKey(key.to_string())),
        }
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Option<String> {
        let path = self.entry_path(key).ok()?;
        match std::fs::read_to_string(&path) {
            Ok(value) => Some(value),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => None,
            Err(e) => {
                tracing::warn!("Failed to read {:?}: {}", path, e);
                None
            }
        }
    }

    fn set(&self, key: &str, value: &str) -> StorageResult<()> {
        let path = self.entry_path(key)?;
        std::fs::create_dir_all(&self.root)
            .map_err(|e| StorageError::WriteFailed(e.to_string()))?;

        // Write next to the target then rename so readers never see a partial value
        let temp_path = path.with_extension("tmp");
        std::fs::write(&temp_path, value).map_err(|e| StorageError::WriteFailed(e.to_string()))?;
        std::fs::rename(&temp_path, &path).map_err(|e| {
            let _ = std::fs::remove_file(&temp_path);
            StorageError::WriteFailed(e.to_string())
        })
    }

    fn remove(&self, key: &str) {
        let Ok(path) = self.entry_path(key) else {
            return;
        };
        if let Err(e) = std::fs::remove_file(&path) {
            if e.kind() != std::io::ErrorKind::NotFound {
                tracing::warn!("Failed to remove {:?}: {}", path, e);
            }
        }
    }
}

/// In-memory store (for testing)
#[derive(Default)]
pub struct MemoryStore {
    data: RwLock<HashMap<String, String>>,
    read_only: bool,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// A store whose writes always fail, like a browser store over quota
    pub fn read_only() -> Self {
        Self {
            data: RwLock::default(),
            read_only: true,
        }
    }

    /// Seed a value, bypassing the read-only switch
    pub fn with_entry(self, key: &str, value: &str) -> Self {
        self.data
            .write()
            .unwrap_or_else(|e| e.into_inner())
            .insert(key.to_string(), value.to_string());
        self
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.data
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .get(key)
            .cloned()
    }

    fn set(&self, key: &str, value: &str) -> StorageResult<()> {
        if self.read_only {
            return Err(StorageError::WriteFailed("storage quota exceeded".to_string()));
        }
        self.data
            .write()
            .unwrap_or_else(|e| e.into_inner())
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) {
        self.data
            .write()
            .unwrap_or_else(|e| e.into_inner())
            .remove(key);
    }
}

/// Read `key` and parse it as JSON, treating a parse failure as absent
pub(crate) fn get_json<T: serde::de::DeserializeOwned>(
    store: &dyn KeyValueStore,
    key: &str,
) -> Option<T> {
    let raw = store.get(key)?;
    match serde_json::from_str(&raw) {
        Ok(value) => Some(value),
        Err(e) => {
            tracing::warn!("Ignoring corrupt value under {}: {}", key, e);
            None
        }
    }
}

/// Serialize `value` as JSON and store it under `key`
pub(crate) fn set_json<T: serde::Serialize>(
    store: &dyn KeyValueStore,
    key: &str,
    value: &T,
) -> StorageResult<()> {
    let raw = serde_json::to_string(value)?;
    store.set(key, &raw)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_memory_store() {
        let store = MemoryStore::new();

        store.set("greeting", "hello").unwrap();
        assert_eq!(store.get("greeting").as_deref(), Some("hello"));

        store.set("greeting", "bye").unwrap();
        assert_eq!(store.get("greeting").as_deref(), Some("bye"));

        store.remove("greeting");
        assert!(store.get("greeting").is_none());

        // Removing twice is fine
        store.remove("greeting");
    }

    #[test]
    fn test_read_only_store_rejects_writes() {
        let store = MemoryStore::read_only().with_entry("seeded", "1");
        assert!(matches!(
            store.set("k", "v"),
            Err(StorageError::WriteFailed(_))
        ));
        assert_eq!(store.get("seeded").as_deref(), Some("1"));
    }

    #[test]
    fn test_file_store_round_trip() {
        let dir = TempDir::new().unwrap();
        let store = FileStore::new(dir.path().join("data"));

        assert!(store.get(USERS_KEY).is_none());
        store.set(USERS_KEY, "{}").unwrap();
        assert_eq!(store.get(USERS_KEY).as_deref(), Some("{}"));
        assert!(dir.path().join("data").join(USERS_KEY).exists());

        store.remove(USERS_KEY);
        assert!(store.get(USERS_KEY).is_none());
    }

    #[test]
    fn test_file_store_failed_rename_leaves_no_temp_file() {
        let dir = TempDir::new().unwrap();
        let store = FileStore::new(dir.path());
        // A non-empty directory in the way makes the rename fail
        std::fs::create_dir_all(dir.path().join(USERS_KEY).join("blocker")).unwrap();

        assert!(matches!(
            store.set(USERS_KEY, "{}"),
            Err(StorageError::WriteFailed(_))
        ));
        assert!(!dir.path().join(format!("{}.tmp", USERS_KEY)).exists());
    }

    #[test]
    fn test_file_store_rejects_path_traversal() {
        let dir = TempDir::new().unwrap();
        let store = FileStore::new(dir.path());

        assert!(matches!(
            store.set("../escape", "x"),
            Err(StorageError::InvalidKey(_))
        ));
        assert!(matches!(
            store.set("nested/key", "x"),
            Err(StorageError::InvalidKey(_))
        ));
        assert!(store.get("../escape").is_none());
    }

    #[test]
    fn test_get_json_treats_garbage_as_absent() {
        let store = MemoryStore::new().with_entry("broken", "{not json");
        let value: Option<serde_json::Value> = get_json(&store, "broken");
        assert!(value.is_none());
    }
}
