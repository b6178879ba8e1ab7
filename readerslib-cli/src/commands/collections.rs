//! Favorites, reading list and borrowing commands

use super::{report, Context};
use anyhow::Result;
use readerslib_core::reconcile::{borrowed_items, returned_items};
use readerslib_core::types::author_line;
use readerslib_core::BookId;

pub async fn favorite(ctx: &Context, id: BookId) -> Result<()> {
    let mut session = ctx.require_session()?;
    let book = ctx.find_book(id).await?;
    let notice = ctx.library.toggle_favorite(&mut session, &book);
    report(&notice);
    Ok(())
}

pub async fn borrow(ctx: &Context, id: BookId) -> Result<()> {
    let mut session = ctx.require_session()?;
    let book = ctx.find_book(id).await?;
    let notice = ctx.library.toggle_borrow(&mut session, &book)?;
    report(&notice);
    Ok(())
}

pub fn return_book(ctx: &Context, id: BookId) -> Result<()> {
    let mut session = ctx.require_session()?;
    let notice = ctx.library.return_item(&mut session, id);
    report(&notice);
    Ok(())
}

pub fn favorites(ctx: &Context, remove: Option<BookId>) -> Result<()> {
    let mut session = ctx.require_session()?;
    if let Some(id) = remove {
        report(&ctx.library.remove_favorite(&mut session, id));
        return Ok(());
    }

    if session.user.favorites.is_empty() {
        println!("No favorites yet. Add books to your favorites from the Library.");
        return Ok(());
    }
    for favorite in &session.user.favorites {
        println!(
            "{:>6}  {} ({})",
            favorite.id,
            favorite.title,
            author_line(&favorite.authors)
        );
    }
    Ok(())
}

pub fn reading_list(ctx: &Context, remove: Option<BookId>) -> Result<()> {
    let mut session = ctx.require_session()?;
    if let Some(id) = remove {
        report(&ctx.library.remove_from_reading_list(&mut session, id));
        return Ok(());
    }

    if session.user.reading_list.is_empty() {
        println!("Your reading list is empty. Borrow books to add them here.");
        return Ok(());
    }
    for entry in &session.user.reading_list {
        println!("{:>6}  {}  {}", entry.id, entry.title, entry.link);
    }
    Ok(())
}

/// Show borrowed books, then returned ones
pub fn shelf(ctx: &Context) -> Result<()> {
    let session = ctx.require_session()?;
    let time = |t: chrono::DateTime<chrono::Utc>| t.format("%Y-%m-%d %H:%M").to_string();

    println!("Borrowed:");
    let mut any = false;
    for item in borrowed_items(&session.user) {
        any = true;
        println!("{:>6}  {}  since {}", item.id, item.title, time(item.borrowed_at));
    }
    if !any {
        println!("  No borrowed books at the moment.");
    }

    println!("Returned:");
    let mut any = false;
    for item in returned_items(&session.user) {
        any = true;
        let returned = item.returned_at.map(time).unwrap_or_default();
        println!("{:>6}  {}  on {}", item.id, item.title, returned);
    }
    if !any {
        println!("  You haven't returned any books yet.");
    }
    Ok(())
}
