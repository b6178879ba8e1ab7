//! Remote book catalog
//!
//! The catalog is a read-only listing endpoint. Only an unfiltered listing
//! is ever written to the local cache.

mod browser;
mod filter;

pub use browser::{CatalogBrowser, FetchOutcome, FetchTicket, LibraryView};
pub use filter::{matches, visible_books, LibraryFilter, SearchField};

use crate::config::Config;
use crate::error::CatalogError;
use crate::types::BookSummary;
use async_trait::async_trait;
use serde::Deserialize;

/// Anything that can list catalog books
#[async_trait]
pub trait CatalogSource: Send + Sync {
    /// Fetch the listing, filtered by a free-text query when one is given
    async fn fetch(&self, query: Option<&str>) -> Result<Vec<BookSummary>, CatalogError>;
}

/// Listing response body
#[derive(Debug, Deserialize)]
struct CatalogPage {
    #[serde(default)]
    results: Vec<BookSummary>,
}

/// Client for a Gutendex-compatible endpoint
pub struct GutendexClient {
    client: reqwest::Client,
    base_url: String,
}

impl GutendexClient {
    /// Create a client for the configured endpoint
    pub fn new(config: &Config) -> Result<Self, CatalogError> {
        let client = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .build()
            .map_err(|e| CatalogError::Transport(e.to_string()))?;
        Ok(Self {
            client,
            base_url: config.catalog_url.clone(),
        })
    }

    /// URL of the listing for an optional query
    pub fn listing_url(&self, query: Option<&str>) -> String {
        match query.filter(|q| !q.is_empty()) {
            Some(q) => format!("{}?search={}", self.base_url, urlencoding::encode(q)),
            None => self.base_url.clone(),
        }
    }
}

#[async_trait]
impl CatalogSource for GutendexClient {
    async fn fetch(&self, query: Option<&str>) -> Result<Vec<BookSummary>, CatalogError> {
        let url = self.listing_url(query);
        tracing::debug!("Fetching catalog from {}", url);

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| CatalogError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(CatalogError::Status(status.as_u16()));
        }

        let page: CatalogPage = response
            .json()
            .await
            .map_err(|e| CatalogError::Decode(e.to_string()))?;
        Ok(page.results)
    }
}
