//! User repository
//!
//! All accounts live in one JSON object keyed by username. Every save reads
//! the whole map, replaces one entry and writes the whole map back, so two
//! stale in-memory copies of the same user overwrite each other (last write
//! wins).

use crate::storage::{get_json, set_json, KeyValueStore, StorageResult, USERS_KEY};
use crate::types::UserRecord;
use std::collections::BTreeMap;
use std::sync::Arc;

/// Map of username to user record, as persisted
pub type UserMap = BTreeMap<String, UserRecord>;

#[derive(Clone)]
pub struct UserRepository {
    store: Arc<dyn KeyValueStore>,
}

impl UserRepository {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    /// Every stored user; empty if nothing is stored or the data is corrupt
    pub fn get_all(&self) -> UserMap {
        get_json(self.store.as_ref(), USERS_KEY).unwrap_or_default()
    }

    pub fn get(&self, username: &str) -> Option<UserRecord> {
        self.get_all().remove(username)
    }

    pub fn exists(&self, username: &str) -> bool {
        self.get_all().contains_key(username)
    }

    /// Insert or fully overwrite the record keyed by `record.username`
    pub fn save(&self, record: &UserRecord) -> StorageResult<()> {
        let mut users = self.get_all();
        users.insert(record.username.clone(), record.clone());
        self.write_all(&users)
    }

    /// Delete a user; unknown usernames are a no-op
    pub fn remove(&self, username: &str) -> StorageResult<()> {
        let mut users = self.get_all();
        if users.remove(username).is_none() {
            return Ok(());
        }
        self.write_all(&users)
    }

    fn write_all(&self, users: &UserMap) -> StorageResult<()> {
        set_json(self.store.as_ref(), USERS_KEY, users).inspect_err(|e| {
            tracing::warn!("Failed to save users: {}", e);
        })
    }
}
