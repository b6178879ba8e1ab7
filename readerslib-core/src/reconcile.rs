//! Collection reconciliation
//!
//! Pure functions over a [`UserRecord`]'s favorites, reading list and
//! inventory. Each mutating function takes the record by value and returns
//! the updated record; nothing here touches storage.
//!
//! Invariants kept by every function:
//! - at most one favorite, reading-list entry and inventory item per book id
//! - a borrowed inventory item has no `returned_at`
//! - returning a book drops it from the reading list

use crate::error::DomainError;
use crate::types::{
    BookId, BookSummary, FavoriteRef, InventoryItem, LoanStatus, ReadingRef, UserRecord,
};
use chrono::{DateTime, Utc};
use std::collections::BTreeMap;

/// Readable formats, most preferred first
const READ_FORMAT_PREFERENCE: [&str; 5] = [
    "text/html; charset=utf-8",
    "text/html",
    "application/pdf",
    "application/epub+zip",
    "text/plain; charset=utf-8",
];

pub fn is_favorited(user: &UserRecord, book_id: BookId) -> bool {
    user.favorites.iter().any(|f| f.id == book_id)
}

/// Whether the user currently holds the book (returned loans don't count)
pub fn is_borrowed(user: &UserRecord, book_id: BookId) -> bool {
    user.inventory
        .iter()
        .any(|i| i.id == book_id && i.is_borrowed())
}

/// Pick the link used to read a book, or an empty string if none is readable
pub fn resolve_read_link(formats: &BTreeMap<String, String>) -> String {
    READ_FORMAT_PREFERENCE
        .iter()
        .find_map(|mime| formats.get(*mime))
        .cloned()
        .unwrap_or_default()
}

/// Add the book to favorites, or remove it if it is already there
pub fn toggle_favorite(mut user: UserRecord, book: &BookSummary) -> UserRecord {
    if is_favorited(&user, book.id) {
        return remove_favorite(user, book.id);
    }
    user.favorites.push(FavoriteRef {
        id: book.id,
        title: book.title.clone(),
        authors: book.authors.clone(),
        cover: book.cover_url().unwrap_or_default().to_string(),
    });
    user
}

pub fn remove_favorite(mut user: UserRecord, book_id: BookId) -> UserRecord {
    user.favorites.retain(|f| f.id != book_id);
    user
}

/// Return the book if it is borrowed, otherwise borrow it
///
/// Borrowing needs a non-empty `read_link`; the inventory entry for the book
/// is overwritten in place when the book was borrowed before.
pub fn toggle_borrow(
    user: UserRecord,
    book: &BookSummary,
    read_link: &str,
    now: DateTime<Utc>,
) -> Result<UserRecord, DomainError> {
    if is_borrowed(&user, book.id) {
        return Ok(return_item(user, book.id, now));
    }
    borrow(user, book, read_link, now)
}

fn borrow(
    mut user: UserRecord,
    book: &BookSummary,
    read_link: &str,
    now: DateTime<Utc>,
) -> Result<UserRecord, DomainError> {
    if read_link.is_empty() {
        return Err(DomainError::NoReadableFormat);
    }

    let item = InventoryItem {
        id: book.id,
        title: book.title.clone(),
        status: LoanStatus::Borrowed,
        borrowed_at: now,
        returned_at: None,
        link: read_link.to_string(),
    };
    match user.inventory.iter().position(|i| i.id == book.id) {
        Some(index) => user.inventory[index] = item,
        None => user.inventory.push(item),
    }

    if !user.reading_list.iter().any(|r| r.id == book.id) {
        user.reading_list.push(ReadingRef {
            id: book.id,
            title: book.title.clone(),
            link: read_link.to_string(),
        });
    }
    Ok(user)
}

/// Mark a borrowed book as returned; a no-op for books not currently held
pub fn return_item(mut user: UserRecord, book_id: BookId, now: DateTime<Utc>) -> UserRecord {
    let Some(index) = user
        .inventory
        .iter()
        .position(|i| i.id == book_id && i.is_borrowed())
    else {
        return user;
    };
    let item = &mut user.inventory[index];
    item.status = LoanStatus::Returned;
    item.returned_at = Some(now);
    remove_from_reading_list(user, book_id)
}

/// Drop a reading-list entry without touching the loan
pub fn remove_from_reading_list(mut user: UserRecord, book_id: BookId) -> UserRecord {
    user.reading_list.retain(|r| r.id != book_id);
    user
}

pub fn borrowed_items(user: &UserRecord) -> impl Iterator<Item = &InventoryItem> {
    user.inventory.iter().filter(|i| i.is_borrowed())
}

pub fn returned_items(user: &UserRecord) -> impl Iterator<Item = &InventoryItem> {
    user.inventory.iter().filter(|i| !i.is_borrowed())
}

/// Accounts can only be deleted once every book is returned
pub fn can_delete_account(user: &UserRecord) -> bool {
    borrowed_items(user).next().is_none()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn user() -> UserRecord {
        UserRecord::new("ada@example.com")
    }

    fn frankenstein() -> BookSummary {
        BookSummary::new(84, "Frankenstein")
            .with_author("Shelley, Mary Wollstonecraft")
            .with_format("text/html", "https://example.org/84.html")
            .with_format("image/jpeg", "https://example.org/84.jpg")
    }

    #[test]
    fn test_resolve_read_link_prefers_html_over_pdf() {
        let formats = BTreeMap::from([
            ("application/pdf".to_string(), "p.pdf".to_string()),
            ("text/html".to_string(), "h.html".to_string()),
        ]);
        assert_eq!(resolve_read_link(&formats), "h.html");
    }

    #[test]
    fn test_resolve_read_link_order() {
        let mut formats = BTreeMap::from([
            ("text/plain; charset=utf-8".to_string(), "t.txt".to_string()),
            ("image/jpeg".to_string(), "c.jpg".to_string()),
        ]);
        assert_eq!(resolve_read_link(&formats), "t.txt");

        formats.insert("application/epub+zip".to_string(), "b.epub".to_string());
        assert_eq!(resolve_read_link(&formats), "b.epub");

        formats.insert("text/html; charset=utf-8".to_string(), "u.html".to_string());
        formats.insert("text/html".to_string(), "h.html".to_string());
        assert_eq!(resolve_read_link(&formats), "u.html");
    }

    #[test]
    fn test_resolve_read_link_without_readable_format() {
        let formats = BTreeMap::from([("image/jpeg".to_string(), "c.jpg".to_string())]);
        assert_eq!(resolve_read_link(&formats), "");
        assert_eq!(resolve_read_link(&BTreeMap::new()), "");
    }

    #[test]
    fn test_toggle_favorite_twice_restores_favorites() {
        let original = user();
        let book = frankenstein();

        let favorited = toggle_favorite(original.clone(), &book);
        assert!(is_favorited(&favorited, 84));
        assert_eq!(favorited.favorites[0].cover, "https://example.org/84.jpg");
        assert_eq!(favorited.favorites[0].authors, book.authors);

        let unfavorited = toggle_favorite(favorited, &book);
        assert_eq!(unfavorited.favorites, original.favorites);
    }

    #[test]
    fn test_favorite_without_cover_stores_empty_string() {
        let favorited = toggle_favorite(user(), &BookSummary::new(7, "No Cover"));
        assert_eq!(favorited.favorites[0].cover, "");
    }

    #[test]
    fn test_borrow_adds_inventory_and_reading_list() {
        let now = Utc::now();
        let book = frankenstein();
        let link = resolve_read_link(&book.formats);

        let borrowed = toggle_borrow(user(), &book, &link, now).unwrap();
        assert!(is_borrowed(&borrowed, 84));
        assert_eq!(borrowed.inventory.len(), 1);
        assert_eq!(borrowed.inventory[0].borrowed_at, now);
        assert!(borrowed.inventory[0].returned_at.is_none());
        assert_eq!(borrowed.reading_list.len(), 1);
        assert_eq!(borrowed.reading_list[0].link, "https://example.org/84.html");
    }

    #[test]
    fn test_borrow_without_link_fails() {
        let result = toggle_borrow(user(), &BookSummary::new(9, "Unreadable"), "", Utc::now());
        assert_eq!(result, Err(DomainError::NoReadableFormat));
    }

    #[test]
    fn test_return_clears_reading_list() {
        let borrowed_at = Utc::now() - Duration::days(2);
        let returned_at = Utc::now();
        let book = frankenstein();

        let borrowed = toggle_borrow(user(), &book, "h.html", borrowed_at).unwrap();
        let returned = toggle_borrow(borrowed, &book, "h.html", returned_at).unwrap();

        assert!(returned.reading_list.is_empty());
        assert_eq!(returned.inventory.len(), 1);
        assert_eq!(returned.inventory[0].status, LoanStatus::Returned);
        assert_eq!(returned.inventory[0].returned_at, Some(returned_at));
        assert_eq!(returned.inventory[0].borrowed_at, borrowed_at);
        assert!(!is_borrowed(&returned, 84));
    }

    #[test]
    fn test_return_does_not_need_a_link() {
        let book = frankenstein();
        let borrowed = toggle_borrow(user(), &book, "h.html", Utc::now()).unwrap();
        let returned = toggle_borrow(borrowed, &book, "", Utc::now()).unwrap();
        assert!(!is_borrowed(&returned, 84));
    }

    #[test]
    fn test_borrow_again_overwrites_in_place() {
        let book = frankenstein();
        let first = Utc::now() - Duration::days(10);
        let second = Utc::now();

        let user = toggle_borrow(user(), &book, "h.html", first).unwrap();
        let user = toggle_borrow(user, &book, "h.html", first).unwrap();
        let user = toggle_borrow(user, &book, "h.html", second).unwrap();

        assert_eq!(user.inventory.len(), 1);
        assert_eq!(user.inventory[0].status, LoanStatus::Borrowed);
        assert_eq!(user.inventory[0].borrowed_at, second);
        assert!(user.inventory[0].returned_at.is_none());
        assert_eq!(user.reading_list.len(), 1);
    }

    #[test]
    fn test_reborrow_keeps_manually_kept_reading_entry_unique() {
        let book = frankenstein();
        let mut user = user();
        user.reading_list.push(ReadingRef {
            id: 84,
            title: "Frankenstein".to_string(),
            link: "old.html".to_string(),
        });

        let user = toggle_borrow(user, &book, "h.html", Utc::now()).unwrap();
        assert_eq!(user.reading_list.len(), 1);
        assert_eq!(user.reading_list[0].link, "old.html");
    }

    #[test]
    fn test_return_item_ignores_unknown_or_returned_books() {
        let now = Utc::now();
        let untouched = return_item(user(), 1, now);
        assert!(untouched.inventory.is_empty());

        let book = frankenstein();
        let borrowed = toggle_borrow(user(), &book, "h.html", now).unwrap();
        let returned = return_item(borrowed, 84, now);
        let later = return_item(returned.clone(), 84, now + Duration::hours(1));
        assert_eq!(later, returned);
    }

    #[test]
    fn test_remove_from_reading_list_keeps_loan() {
        let book = frankenstein();
        let borrowed = toggle_borrow(user(), &book, "h.html", Utc::now()).unwrap();
        let trimmed = remove_from_reading_list(borrowed, 84);
        assert!(trimmed.reading_list.is_empty());
        assert!(is_borrowed(&trimmed, 84));
    }

    #[test]
    fn test_shelf_split() {
        let now = Utc::now();
        let a = BookSummary::new(1, "A");
        let b = BookSummary::new(2, "B");
        let user = toggle_borrow(user(), &a, "a.html", now).unwrap();
        let user = toggle_borrow(user, &b, "b.html", now).unwrap();
        let user = return_item(user, 1, now);

        let borrowed: Vec<_> = borrowed_items(&user).map(|i| i.id).collect();
        let returned: Vec<_> = returned_items(&user).map(|i| i.id).collect();
        assert_eq!(borrowed, vec![2]);
        assert_eq!(returned, vec![1]);
    }

    #[test]
    fn test_can_delete_account() {
        let book = frankenstein();
        let borrowed = toggle_borrow(user(), &book, "h.html", Utc::now()).unwrap();
        assert!(!can_delete_account(&borrowed));

        let returned = toggle_borrow(borrowed, &book, "h.html", Utc::now()).unwrap();
        assert!(can_delete_account(&returned));
        assert!(can_delete_account(&user()));
    }
}
