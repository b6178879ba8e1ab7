//! Catalog browsing commands

use super::Context;
use anyhow::Result;
use readerslib_core::catalog::{visible_books, FetchOutcome, LibraryFilter, LibraryView, SearchField};
use readerslib_core::reconcile::{is_borrowed, is_favorited};
use readerslib_core::{BookId, UserRecord};
use serde::Serialize;

/// Options of the `library` command
pub struct LibraryArgs {
    pub search: Option<String>,
    pub by: SearchField,
    pub filter: LibraryFilter,
    pub refresh: bool,
    pub json: bool,
}

/// Library row output
#[derive(Serialize)]
struct BookRow {
    id: BookId,
    title: String,
    authors: String,
    favorite: bool,
    borrowed: bool,
}

/// List the catalog, searched and filtered for the signed-in user
pub async fn library(ctx: &Context, args: LibraryArgs) -> Result<()> {
    let session = ctx.require_session()?;
    let query = args
        .search
        .as_deref()
        .unwrap_or_default()
        .trim()
        .to_lowercase();

    let (browser, view) = ctx.load_books(args.refresh).await?;

    if view == LibraryView::Fetched(FetchOutcome::FromCache) {
        eprintln!("Using cached books (offline mode)");
    }

    let rows: Vec<BookRow> = visible_books(browser.books(), &session.user, &query, args.by, args.filter)
        .into_iter()
        .map(|book| row(book, &session.user))
        .collect();

    if args.json {
        println!("{}", serde_json::to_string_pretty(&rows)?);
        return Ok(());
    }

    if rows.is_empty() {
        println!("No books found matching your criteria. Try a different search or filter.");
        return Ok(());
    }
    for row in &rows {
        let mut marks = String::new();
        if row.favorite {
            marks.push_str(" [favorite]");
        }
        if row.borrowed {
            marks.push_str(" [borrowed]");
        }
        println!("{:>6}  {} ({}){}", row.id, row.title, row.authors, marks);
    }
    Ok(())
}

fn row(book: &readerslib_core::BookSummary, user: &UserRecord) -> BookRow {
    BookRow {
        id: book.id,
        title: book.title.clone(),
        authors: book.author_line(),
        favorite: is_favorited(user, book.id),
        borrowed: is_borrowed(user, book.id),
    }
}

/// Display the details of one book
pub async fn show(ctx: &Context, id: BookId) -> Result<()> {
    let book = ctx.find_book(id).await?;

    println!("Title:    {}", book.title);
    println!("Authors:  {}", book.author_line());
    if let Some(cover) = book.cover_url() {
        println!("Cover:    {}", cover);
    }
    if !book.subjects.is_empty() {
        println!("Subjects: {}", book.subjects.join("; "));
    }
    println!();
    println!("{}", book.summary_text());
    Ok(())
}
