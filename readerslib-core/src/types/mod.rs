//! Core data types shared by storage, reconciliation and the catalog

mod book;
mod user;

pub use book::{author_line, BookId, BookSummary, Person};
pub use user::{default_avatar, FavoriteRef, InventoryItem, LoanStatus, ReadingRef, UserRecord};
