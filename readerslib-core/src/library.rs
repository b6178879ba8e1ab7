//! Library service
//!
//! Wires the user repository, session pointer and reconciler together. The
//! signed-in user is always passed in as an explicit [`Session`]; every
//! collection change updates the session's record first and persists it
//! second, so a failed write leaves a usable session plus a warning.

use crate::account::{validate_password, validate_signup, SignupForm};
use crate::cache::CatalogCache;
use crate::catalog::CatalogBrowser;
use crate::config::Config;
use crate::error::{DomainError, Result, ValidationError};
use crate::reconcile;
use crate::repository::UserRepository;
use crate::session::{Session, SessionPointer};
use crate::storage::{FileStore, KeyValueStore};
use crate::types::{BookId, BookSummary, UserRecord};
use chrono::Utc;
use std::fmt;
use std::sync::Arc;

/// Severity of a user-facing message
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
    Info,
    Success,
    Warning,
}

/// A message for the user describing what an operation did
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub kind: NoticeKind,
    pub message: String,
}

impl Notice {
    pub fn info(message: impl Into<String>) -> Self {
        Self {
            kind: NoticeKind::Info,
            message: message.into(),
        }
    }

    pub fn success(message: impl Into<String>) -> Self {
        Self {
            kind: NoticeKind::Success,
            message: message.into(),
        }
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self {
            kind: NoticeKind::Warning,
            message: message.into(),
        }
    }
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

/// Entry point for every account and collection operation
#[derive(Clone)]
pub struct Library {
    users: UserRepository,
    pointer: SessionPointer,
    cache: CatalogCache,
}

impl Library {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self {
            users: UserRepository::new(store.clone()),
            pointer: SessionPointer::new(store.clone()),
            cache: CatalogCache::new(store),
        }
    }

    /// Open the file-backed library in the configured data directory
    pub fn open(config: &Config) -> Self {
        Self::new(Arc::new(FileStore::new(&config.data_dir)))
    }

    pub fn users(&self) -> &UserRepository {
        &self.users
    }

    /// A fresh catalog browser backed by this library's cache
    pub fn browser(&self) -> CatalogBrowser {
        CatalogBrowser::new(self.cache.clone())
    }

    /// Create an account; the new user still has to sign in
    pub fn signup(&self, form: SignupForm) -> Result<Notice> {
        let user = validate_signup(form)?;
        if self.users.exists(&user.username) {
            return Err(ValidationError::AccountExists.into());
        }
        tracing::info!("Creating account {}", user.username);
        Ok(match self.users.save(&user) {
            Ok(()) => Notice::success("Account created successfully"),
            Err(_) => Notice::warning("Failed to save account"),
        })
    }

    pub fn signin(&self, email: &str, password: &str) -> Result<Session> {
        let email = email.trim();
        if email.is_empty() || password.is_empty() {
            return Err(ValidationError::MissingCredentials.into());
        }

        let user = self
            .users
            .get(email)
            .filter(|user| user.password == password)
            .ok_or(ValidationError::InvalidCredentials)?;

        if let Err(e) = self.pointer.set_current(Some(&user.username)) {
            tracing::warn!("Failed to remember session: {}", e);
        }
        Ok(Session::new(user))
    }

    /// Resume the remembered session, if its user still exists
    ///
    /// A pointer to a deleted user is cleared.
    pub fn restore_session(&self) -> Option<Session> {
        let username = self.pointer.current()?;
        match self.users.get(&username) {
            Some(user) => Some(Session::new(user)),
            None => {
                tracing::info!("Clearing session for missing user {}", username);
                let _ = self.pointer.set_current(None);
                None
            }
        }
    }

    pub fn logout(&self, session: Session) -> Notice {
        tracing::debug!("Logging out {}", session.username());
        let _ = self.pointer.set_current(None);
        Notice::success("Logged out successfully")
    }

    pub fn toggle_favorite(&self, session: &mut Session, book: &BookSummary) -> Notice {
        let was_favorited = reconcile::is_favorited(&session.user, book.id);
        session.user = reconcile::toggle_favorite(session.user.clone(), book);
        let message = if was_favorited {
            "Removed from favorites"
        } else {
            "Added to favorites"
        };
        self.persist(&session.user, message)
    }

    pub fn remove_favorite(&self, session: &mut Session, book_id: BookId) -> Notice {
        session.user = reconcile::remove_favorite(session.user.clone(), book_id);
        self.persist(&session.user, "Removed from favorites")
    }

    /// Borrow the book using its preferred readable format, or return it
    pub fn toggle_borrow(&self, session: &mut Session, book: &BookSummary) -> Result<Notice> {
        let was_borrowed = reconcile::is_borrowed(&session.user, book.id);
        let read_link = reconcile::resolve_read_link(&book.formats);
        session.user =
            reconcile::toggle_borrow(session.user.clone(), book, &read_link, Utc::now())?;
        let message = if was_borrowed {
            "Book returned"
        } else {
            "Book borrowed"
        };
        Ok(self.persist(&session.user, message))
    }

    /// Return a borrowed book by id
    pub fn return_item(&self, session: &mut Session, book_id: BookId) -> Notice {
        if !reconcile::is_borrowed(&session.user, book_id) {
            return Notice::info(format!("Book {} is not currently borrowed", book_id));
        }
        session.user = reconcile::return_item(session.user.clone(), book_id, Utc::now());
        self.persist(&session.user, "Book returned")
    }

    pub fn remove_from_reading_list(&self, session: &mut Session, book_id: BookId) -> Notice {
        session.user = reconcile::remove_from_reading_list(session.user.clone(), book_id);
        self.persist(&session.user, "Removed from reading list")
    }

    pub fn change_password(&self, session: &mut Session, new_password: &str) -> Result<Notice> {
        let new_password = new_password.trim();
        validate_password(new_password)?;
        session.user.password = new_password.to_string();
        Ok(self.persist(&session.user, "Password updated successfully"))
    }

    pub fn change_avatar(&self, session: &mut Session, avatar: String) -> Notice {
        session.user.avatar = avatar;
        self.persist(&session.user, "Profile picture updated")
    }

    /// Delete the signed-in account and end the session
    ///
    /// Refused while any book is still borrowed.
    pub fn delete_account(&self, session: &Session) -> Result<Notice> {
        if !reconcile::can_delete_account(&session.user) {
            return Err(DomainError::BorrowedItemsExist.into());
        }
        tracing::info!("Deleting account {}", session.username());
        let removed = self.users.remove(session.username());
        let _ = self.pointer.set_current(None);
        Ok(match removed {
            Ok(()) => Notice::success("Account deleted successfully"),
            Err(e) => Notice::warning(format!("Failed to delete account data: {}", e)),
        })
    }

    /// Save the user, downgrading a failed write to a warning
    fn persist(&self, user: &UserRecord, message: &str) -> Notice {
        match self.users.save(user) {
            Ok(()) => Notice::success(message),
            Err(_) => Notice::warning(format!("{} (failed to save data)", message)),
        }
    }
}
