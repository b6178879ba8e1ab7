//! In-memory catalog listing with cache fallback

use super::CatalogSource;
use crate::cache::CatalogCache;
use crate::error::CatalogError;
use crate::types::{BookId, BookSummary};

/// Identifies one issued fetch; only the latest ticket is applied
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FetchTicket(u64);

/// Result of applying a fetch to the browser
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchOutcome {
    /// Live results replaced the listing
    Live,
    /// The fetch failed and the cached listing was used instead
    FromCache,
    /// A newer fetch was issued meanwhile; nothing was applied
    Stale,
}

/// Where the listing shown by the library view came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LibraryView {
    /// Books already held in memory
    InMemory,
    /// Books read from a valid cache, without a fetch
    Cached,
    Fetched(FetchOutcome),
}

/// Holds the current listing and decides when to fetch, cache or fall back
pub struct CatalogBrowser {
    cache: CatalogCache,
    books: Vec<BookSummary>,
    generation: u64,
}

impl CatalogBrowser {
    pub fn new(cache: CatalogCache) -> Self {
        Self {
            cache,
            books: Vec::new(),
            generation: 0,
        }
    }

    /// The current listing
    pub fn books(&self) -> &[BookSummary] {
        &self.books
    }

    pub fn find(&self, id: BookId) -> Option<&BookSummary> {
        self.books.iter().find(|b| b.id == id)
    }

    /// Forget the in-memory listing (on logout)
    pub fn clear(&mut self) {
        self.books.clear();
    }

    /// Issue a ticket for a new fetch, invalidating all earlier tickets
    pub fn begin_fetch(&mut self) -> FetchTicket {
        self.generation += 1;
        FetchTicket(self.generation)
    }

    /// Apply the result of the fetch identified by `ticket`
    ///
    /// Unfiltered successes are cached. Failures fall back to a non-empty
    /// cached listing, otherwise the error is returned.
    pub fn complete_fetch(
        &mut self,
        ticket: FetchTicket,
        query: Option<&str>,
        result: Result<Vec<BookSummary>, CatalogError>,
    ) -> Result<FetchOutcome, CatalogError> {
        if ticket.0 != self.generation {
            tracing::debug!(
                "Dropping stale catalog response {} (latest is {})",
                ticket.0,
                self.generation
            );
            return Ok(FetchOutcome::Stale);
        }

        match result {
            Ok(books) => {
                let filtered = query.is_some_and(|q| !q.is_empty());
                if !filtered {
                    // Write failures are logged by the cache; the live listing still applies
                    let _ = self.cache.write(&books);
                }
                tracing::info!("Loaded {} books", books.len());
                self.books = books;
                Ok(FetchOutcome::Live)
            }
            Err(e) => {
                tracing::warn!("Error fetching books: {}", e);
                match self.cache.read().filter(|books| !books.is_empty()) {
                    Some(books) => {
                        self.books = books;
                        Ok(FetchOutcome::FromCache)
                    }
                    None => Err(e),
                }
            }
        }
    }

    /// Fetch from `source` and apply the result
    pub async fn fetch(
        &mut self,
        source: &dyn CatalogSource,
        query: Option<&str>,
    ) -> Result<FetchOutcome, CatalogError> {
        let ticket = self.begin_fetch();
        let result = source.fetch(query).await;
        self.complete_fetch(ticket, query, result)
    }

    /// Show the library: memory first, then a valid cache, then a full fetch
    pub async fn load_library(
        &mut self,
        source: &dyn CatalogSource,
    ) -> Result<LibraryView, CatalogError> {
        if !self.books.is_empty() {
            return Ok(LibraryView::InMemory);
        }
        if let Some(books) = self.cache.read().filter(|books| !books.is_empty()) {
            tracing::debug!("Using {} cached books", books.len());
            self.books = books;
            return Ok(LibraryView::Cached);
        }
        self.fetch(source, None).await.map(LibraryView::Fetched)
    }

    /// Prepare the listing for a search
    ///
    /// A loaded listing is searched locally; only an empty browser asks the
    /// catalog for filtered results.
    pub async fn search(
        &mut self,
        source: &dyn CatalogSource,
        query: &str,
    ) -> Result<LibraryView, CatalogError> {
        let query = query.trim().to_lowercase();
        if query.is_empty() {
            return self.load_library(source).await;
        }
        if !self.books.is_empty() {
            return Ok(LibraryView::InMemory);
        }
        self.fetch(source, Some(query.as_str()))
            .await
            .map(LibraryView::Fetched)
    }
}
