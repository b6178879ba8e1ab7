//! Runtime configuration

use std::path::PathBuf;
use std::time::Duration;

/// Default Gutendex listing endpoint
pub const DEFAULT_CATALOG_URL: &str = "https://gutendex.com/books";

/// Default directory for persisted state
pub const DEFAULT_DATA_DIR: &str = "./readerslib_data";

/// Settings shared by the library and its front ends
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// Directory backing the key-value store
    pub data_dir: PathBuf,

    /// Catalog listing endpoint
    pub catalog_url: String,

    /// Timeout for a single catalog request
    pub request_timeout: Duration,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from(DEFAULT_DATA_DIR),
            catalog_url: DEFAULT_CATALOG_URL.to_string(),
            request_timeout: Duration::from_secs(15),
        }
    }
}

impl Config {
    /// Read `READERSLIB_DATA_DIR` and `READERSLIB_CATALOG_URL`, falling back to defaults
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            data_dir: std::env::var("READERSLIB_DATA_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.data_dir),
            catalog_url: std::env::var("READERSLIB_CATALOG_URL")
                .map(|url| url.trim_end_matches('/').to_string())
                .unwrap_or(defaults.catalog_url),
            request_timeout: defaults.request_timeout,
        }
    }

    pub fn with_data_dir(mut self, data_dir: impl Into<PathBuf>) -> Self {
        self.data_dir = data_dir.into();
        self
    }

    pub fn with_catalog_url(mut self, catalog_url: impl Into<String>) -> Self {
        self.catalog_url = catalog_url.into();
        self
    }
}
