//! ReadersLib Core Library
//!
//! This crate provides the persistence and collection logic for the ReadersLib
//! library browser: local user accounts, favorites, reading lists, borrowing,
//! and a time-boxed cache of the remote book catalog. All state lives in a
//! string-keyed store; there is no server-side component.

pub mod account;
pub mod cache;
pub mod catalog;
pub mod config;
pub mod error;
pub mod library;
pub mod reconcile;
pub mod repository;
pub mod session;
pub mod storage;
pub mod types;

pub use config::Config;
pub use error::{CatalogError, DomainError, LibraryError, Result, StorageError, ValidationError};
pub use library::{Library, Notice, NoticeKind};
pub use session::Session;
pub use types::{
    BookId, BookSummary, FavoriteRef, InventoryItem, LoanStatus, Person, ReadingRef, UserRecord,
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_creation() {
        let user = UserRecord::new("reader@example.com");
        assert_eq!(user.username, "reader@example.com");
        assert!(user.reading_list.is_empty());
    }
}
