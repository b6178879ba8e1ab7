//! CLI command implementations

mod account;
mod catalog;
mod collections;

pub use account::{avatar, delete_account, logout, password, signin, signup, whoami, SignupArgs};
pub use catalog::{library, show, LibraryArgs};
pub use collections::{borrow, favorite, favorites, reading_list, return_book, shelf};

use anyhow::{bail, Context as _, Result};
use indicatif::{ProgressBar, ProgressStyle};
use readerslib_core::catalog::{CatalogBrowser, GutendexClient, LibraryView};
use readerslib_core::{BookId, BookSummary, Config, Library, Notice, NoticeKind, Session};
use std::time::Duration;

/// Everything a command needs: configuration and the opened library
pub struct Context {
    pub config: Config,
    pub library: Library,
}

impl Context {
    pub fn new(config: Config) -> Self {
        let library = Library::open(&config);
        Self { config, library }
    }

    /// The remembered session, or an error if nobody is signed in
    pub fn require_session(&self) -> Result<Session> {
        match self.library.restore_session() {
            Some(session) => Ok(session),
            None => bail!("Not signed in. Run `readerslib signin` first"),
        }
    }

    pub fn catalog_client(&self) -> Result<GutendexClient> {
        GutendexClient::new(&self.config).context("Failed to create catalog client")
    }

    /// Load the library listing: cache first, then the catalog
    ///
    /// `refresh` skips the cache and always fetches the full listing.
    /// Searches filter the loaded listing locally.
    pub async fn load_books(&self, refresh: bool) -> Result<(CatalogBrowser, LibraryView)> {
        let client = self.catalog_client()?;
        let mut browser = self.library.browser();

        let pb = spinner("Loading books...");
        let view = if refresh {
            browser
                .fetch(&client, None)
                .await
                .map(LibraryView::Fetched)
        } else {
            browser.load_library(&client).await
        };
        pb.finish_and_clear();

        let view = view.context("Could not fetch books. Please check your connection")?;
        tracing::debug!("Listing {} books ({:?})", browser.books().len(), view);
        Ok((browser, view))
    }

    /// Look a book up in the library listing
    pub async fn find_book(&self, id: BookId) -> Result<BookSummary> {
        let (browser, _) = self.load_books(false).await?;
        browser
            .find(id)
            .cloned()
            .with_context(|| format!("Book {} is not in the catalog listing", id))
    }
}

fn spinner(message: &'static str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    pb.enable_steady_tick(Duration::from_millis(100));
    pb.set_message(message);
    pb
}

/// Print a notice; warnings go to stderr
pub fn report(notice: &Notice) {
    match notice.kind {
        NoticeKind::Warning => eprintln!("Warning: {}", notice),
        NoticeKind::Info | NoticeKind::Success => println!("{}", notice),
    }
}
