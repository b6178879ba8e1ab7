//! Error types for ReadersLib Core

use thiserror::Error;

/// Result type alias using LibraryError
pub type Result<T> = std::result::Result<T, LibraryError>;

/// Top-level error type for all ReadersLib operations
#[derive(Debug, Error)]
pub enum LibraryError {
    #[error("{0}")]
    Validation(#[from] ValidationError),

    #[error("{0}")]
    Domain(#[from] DomainError),

    #[error("Catalog error: {0}")]
    Catalog(#[from] CatalogError),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),
}

/// Form input rejected before anything is persisted
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Please fill all required fields")]
    MissingFields,

    #[error("Please fill both fields")]
    MissingCredentials,

    #[error("Passwords do not match")]
    PasswordMismatch,

    #[error("Password must be at least {min} characters")]
    PasswordTooShort { min: usize },

    #[error("User already exists, please sign in")]
    AccountExists,

    #[error("Invalid credentials")]
    InvalidCredentials,
}

/// Actions blocked by the state of the user's collections
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("No readable version available for this book")]
    NoReadableFormat,

    #[error("Please return all borrowed books before deleting your account")]
    BorrowedItemsExist,
}

/// Errors from the remote catalog
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("HTTP error {0}")]
    Status(u16),

    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Invalid response: {0}")]
    Decode(String),
}

/// Errors that occur during storage operations
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Invalid key: {0}")]
    InvalidKey(String),

    #[error("Write failed: {0}")]
    WriteFailed(String),

    #[error("Serialization failed: {0}")]
    Serialize(#[from] serde_json::Error),
}
