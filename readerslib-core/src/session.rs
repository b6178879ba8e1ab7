//! Session pointer and the explicit session context

use crate::storage::{KeyValueStore, StorageResult, CURRENT_USER_KEY};
use crate::types::UserRecord;
use std::sync::Arc;

/// Remembers which username is signed in between runs
///
/// The pointer is not checked against the user repository; see
/// [`crate::Library::restore_session`].
#[derive(Clone)]
pub struct SessionPointer {
    store: Arc<dyn KeyValueStore>,
}

impl SessionPointer {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    pub fn current(&self) -> Option<String> {
        self.store.get(CURRENT_USER_KEY).filter(|u| !u.is_empty())
    }

    /// Point at `username`, or clear the pointer with `None`
    pub fn set_current(&self, username: Option<&str>) -> StorageResult<()> {
        match username {
            Some(username) if !username.is_empty() => {
                self.store.set(CURRENT_USER_KEY, username)
            }
            _ => {
                self.store.remove(CURRENT_USER_KEY);
                Ok(())
            }
        }
    }
}

/// The signed-in user, passed explicitly into every operation
#[derive(Debug, Clone, PartialEq)]
pub struct Session {
    pub user: UserRecord,
}

impl Session {
    pub fn new(user: UserRecord) -> Self {
        Self { user }
    }

    pub fn username(&self) -> &str {
        &self.user.username
    }
}
