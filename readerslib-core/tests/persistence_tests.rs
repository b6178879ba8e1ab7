//! Persistence tests for readerslib-core
//!
//! These tests run the library against a real data directory and reopen it
//! between steps, the way a user restarting the app would.

use chrono::{Duration, Utc};
use readerslib_core::account::SignupForm;
use readerslib_core::cache::CatalogCache;
use readerslib_core::storage::{FileStore, KeyValueStore, BOOKS_CACHE_KEY, USERS_KEY};
use readerslib_core::{BookSummary, Config, Library, LoanStatus, UserRecord};
use std::sync::Arc;
use tempfile::TempDir;

// =============================================================================
// Helpers
// =============================================================================

fn open(dir: &TempDir) -> Library {
    Library::open(&Config::default().with_data_dir(dir.path()))
}

fn signup_form(email: &str, password: &str) -> SignupForm {
    SignupForm {
        firstname: "Mary".to_string(),
        lastname: "Shelley".to_string(),
        email: email.to_string(),
        phone: "555-0199".to_string(),
        password: password.to_string(),
        confirm_password: password.to_string(),
        avatar: None,
    }
}

fn frankenstein() -> BookSummary {
    BookSummary::new(84, "Frankenstein; Or, The Modern Prometheus")
        .with_author("Shelley, Mary Wollstonecraft")
        .with_format("application/pdf", "https://example.org/84.pdf")
        .with_format("text/html", "https://example.org/84.html")
        .with_format("image/jpeg", "https://example.org/84.jpg")
}

// =============================================================================
// Round trips
// =============================================================================

#[test]
fn test_session_survives_restart() {
    let dir = TempDir::new().unwrap();

    {
        let library = open(&dir);
        library.signup(signup_form("mary@example.com", "prometheus")).unwrap();
        let mut session = library.signin("mary@example.com", "prometheus").unwrap();
        library.toggle_borrow(&mut session, &frankenstein()).unwrap();
        library.toggle_favorite(&mut session, &frankenstein());
    }

    let library = open(&dir);
    let session = library.restore_session().expect("session should be restored");
    assert_eq!(session.username(), "mary@example.com");
    assert_eq!(session.user.favorites.len(), 1);
    assert_eq!(session.user.favorites[0].cover, "https://example.org/84.jpg");
    assert_eq!(session.user.inventory.len(), 1);
    assert_eq!(session.user.inventory[0].status, LoanStatus::Borrowed);
    assert_eq!(session.user.inventory[0].link, "https://example.org/84.html");
    assert_eq!(session.user.reading_list[0].link, "https://example.org/84.html");
}

#[test]
fn test_saved_record_reads_back_equal() {
    let dir = TempDir::new().unwrap();
    let library = open(&dir);

    let mut user = UserRecord::new("mary@example.com");
    user.firstname = "Mary".to_string();
    user.lastname = "Shelley".to_string();
    user.phone = "555-0199".to_string();
    user.password = "prometheus".to_string();
    let user = readerslib_core::reconcile::toggle_borrow(
        user,
        &frankenstein(),
        "https://example.org/84.html",
        Utc::now(),
    )
    .unwrap();

    library.users().save(&user).unwrap();
    assert_eq!(open(&dir).users().get("mary@example.com"), Some(user));
}

#[test]
fn test_repository_save_overwrites_blindly() {
    let dir = TempDir::new().unwrap();
    let library = open(&dir);
    library.signup(signup_form("mary@example.com", "prometheus")).unwrap();

    // The repository itself does not guard against duplicates
    let mut impostor = UserRecord::new("mary@example.com");
    impostor.password = "other".to_string();
    library.users().save(&impostor).unwrap();

    assert_eq!(library.users().get_all().len(), 1);
    assert!(library.signin("mary@example.com", "prometheus").is_err());
    assert!(library.signin("mary@example.com", "other").is_ok());
}

#[test]
fn test_two_stale_copies_last_write_wins() {
    let dir = TempDir::new().unwrap();
    let library = open(&dir);
    library.signup(signup_form("mary@example.com", "prometheus")).unwrap();

    let mut first = library.signin("mary@example.com", "prometheus").unwrap();
    let mut second = library.signin("mary@example.com", "prometheus").unwrap();

    library.toggle_favorite(&mut first, &frankenstein());
    library.change_password(&mut second, "new-pass").unwrap();

    let stored = library.users().get("mary@example.com").unwrap();
    assert!(stored.favorites.is_empty());
    assert_eq!(stored.password, "new-pass");
}

// =============================================================================
// Degraded storage
// =============================================================================

#[test]
fn test_corrupt_users_file_degrades_to_empty() {
    let dir = TempDir::new().unwrap();
    std::fs::write(dir.path().join(USERS_KEY), "{\"mary@example.com\": ").unwrap();

    let library = open(&dir);
    assert!(library.users().get_all().is_empty());
    assert!(library.restore_session().is_none());

    // Signing up again replaces the corrupt blob
    library.signup(signup_form("mary@example.com", "prometheus")).unwrap();
    assert!(library.signin("mary@example.com", "prometheus").is_ok());
}

#[test]
fn test_cache_expiry_on_disk() {
    let dir = TempDir::new().unwrap();
    let store = Arc::new(FileStore::new(dir.path()));
    let cache = CatalogCache::new(store.clone());
    let books = vec![frankenstein()];

    cache.write_at(&books, Utc::now() - Duration::hours(25)).unwrap();
    assert!(cache.read().is_none());
    assert!(store.get(BOOKS_CACHE_KEY).is_some());

    cache.write_at(&books, Utc::now() - Duration::hours(1)).unwrap();
    assert_eq!(cache.read(), Some(books));
}

#[test]
fn test_cache_file_shape() {
    let dir = TempDir::new().unwrap();
    let cache = CatalogCache::new(Arc::new(FileStore::new(dir.path())));
    cache.write(&[frankenstein()]).unwrap();

    let raw = std::fs::read_to_string(dir.path().join(BOOKS_CACHE_KEY)).unwrap();
    let value: serde_json::Value = serde_json::from_str(&raw).unwrap();
    assert!(value["timestamp"].is_i64());
    assert_eq!(value["books"][0]["id"], 84);
    assert_eq!(value["books"][0]["authors"][0]["name"], "Shelley, Mary Wollstonecraft");
}
