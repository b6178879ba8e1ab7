//! Local search and library filters

use crate::reconcile::{is_borrowed, is_favorited};
use crate::types::{BookSummary, UserRecord};
use std::fmt;
use std::str::FromStr;

/// Which part of a book a search query is matched against
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SearchField {
    #[default]
    All,
    Title,
    Author,
    Subject,
}

impl FromStr for SearchField {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "all" => Ok(Self::All),
            "title" => Ok(Self::Title),
            "author" => Ok(Self::Author),
            "subject" => Ok(Self::Subject),
            other => Err(format!(
                "unknown search field '{}' (expected all, title, author or subject)",
                other
            )),
        }
    }
}

impl fmt::Display for SearchField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::All => "all",
            Self::Title => "title",
            Self::Author => "author",
            Self::Subject => "subject",
        })
    }
}

/// Library view filter relative to the signed-in user
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LibraryFilter {
    #[default]
    All,
    /// Books the user does not currently hold
    Available,
    Borrowed,
    Favorites,
}

impl LibraryFilter {
    fn admits(self, book: &BookSummary, user: &UserRecord) -> bool {
        match self {
            Self::All => true,
            Self::Available => !is_borrowed(user, book.id),
            Self::Borrowed => is_borrowed(user, book.id),
            Self::Favorites => is_favorited(user, book.id),
        }
    }
}

impl FromStr for LibraryFilter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "all" => Ok(Self::All),
            "available" => Ok(Self::Available),
            "borrowed" => Ok(Self::Borrowed),
            "favorites" => Ok(Self::Favorites),
            other => Err(format!(
                "unknown filter '{}' (expected all, available, borrowed or favorites)",
                other
            )),
        }
    }
}

impl fmt::Display for LibraryFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::All => "all",
            Self::Available => "available",
            Self::Borrowed => "borrowed",
            Self::Favorites => "favorites",
        })
    }
}

/// Case-insensitive substring match of `query` against the chosen field
///
/// An empty query matches every book.
pub fn matches(book: &BookSummary, query: &str, field: SearchField) -> bool {
    let query = query.trim().to_lowercase();
    if query.is_empty() {
        return true;
    }

    let title = || book.title.to_lowercase().contains(&query);
    let author = || {
        book.authors
            .iter()
            .map(|a| a.name.as_str())
            .collect::<Vec<_>>()
            .join(" ")
            .to_lowercase()
            .contains(&query)
    };
    let subject = || book.subjects.join(" ").to_lowercase().contains(&query);

    match field {
        SearchField::Title => title(),
        SearchField::Author => author(),
        SearchField::Subject => subject(),
        SearchField::All => title() || author() || subject(),
    }
}

/// Books shown in the library view: search first, then the user filter
pub fn visible_books<'a>(
    books: &'a [BookSummary],
    user: &UserRecord,
    query: &str,
    field: SearchField,
    filter: LibraryFilter,
) -> Vec<&'a BookSummary> {
    books
        .iter()
        .filter(|book| matches(book, query, field))
        .filter(|book| filter.admits(book, user))
        .collect()
}
