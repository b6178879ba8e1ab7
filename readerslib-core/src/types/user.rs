//! User record and the collections hanging off it

use super::book::{BookId, Person};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Avatar used when a user has not uploaded a picture
pub fn default_avatar() -> String {
    const SVG: &str = r##"<svg xmlns="http://www.w3.org/2000/svg" width="120" height="120" viewBox="0 0 24 24" fill="none"><rect width="24" height="24" rx="4" fill="#f3efe9"/><circle cx="12" cy="9" r="3.2" fill="#8b5736"/><path d="M6 19c0-2.8 2.7-5 6-5s6 2.2 6 5" stroke="#8b5736" stroke-width="1.2" stroke-linecap="round" stroke-linejoin="round"/></svg>"##;
    format!("data:image/svg+xml;utf8,{}", urlencoding::encode(SVG))
}

/// A locally stored account
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct UserRecord {
    /// Lookup key; always equal to the email given at signup
    pub username: String,

    #[serde(default)]
    pub firstname: String,

    #[serde(default)]
    pub lastname: String,

    #[serde(default)]
    pub email: String,

    #[serde(default)]
    pub phone: String,

    /// Stored exactly as typed. This is plaintext and readable by anyone
    /// with access to the data directory.
    #[serde(default)]
    pub password: String,

    /// Data URI of the profile picture
    #[serde(default = "default_avatar")]
    pub avatar: String,

    #[serde(default)]
    pub favorites: Vec<FavoriteRef>,

    #[serde(default)]
    pub reading_list: Vec<ReadingRef>,

    #[serde(default)]
    pub inventory: Vec<InventoryItem>,
}

impl UserRecord {
    /// Create an empty account keyed by `email`
    pub fn new(email: impl Into<String>) -> Self {
        let email = email.into();
        Self {
            username: email.clone(),
            email,
            avatar: default_avatar(),
            ..Self::default()
        }
    }

    /// Name shown in the navigation bar
    pub fn display_name(&self) -> String {
        if self.firstname.is_empty() {
            self.username.clone()
        } else {
            format!("{} {}", self.firstname, self.lastname)
        }
    }
}

/// A bookmarked catalog book
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FavoriteRef {
    pub id: BookId,
    pub title: String,
    #[serde(default)]
    pub authors: Vec<Person>,
    #[serde(default)]
    pub cover: String,
}

/// A borrowed book queued for reading
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ReadingRef {
    pub id: BookId,
    pub title: String,
    pub link: String,
}

/// Loan state of an inventory item
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LoanStatus {
    Borrowed,
    Returned,
}

/// A book the user has borrowed at some point
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct InventoryItem {
    pub id: BookId,
    pub title: String,
    pub status: LoanStatus,
    pub borrowed_at: DateTime<Utc>,
    pub returned_at: Option<DateTime<Utc>>,
    pub link: String,
}

impl InventoryItem {
    pub fn is_borrowed(&self) -> bool {
        self.status == LoanStatus::Borrowed
    }
}
