//! Catalog book shape, as returned by the Gutendex API

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Catalog book identifier
pub type BookId = u64;

/// A person credited on a book
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Person {
    pub name: String,
}

impl Person {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

/// One entry of a catalog listing
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BookSummary {
    pub id: BookId,

    #[serde(default)]
    pub title: String,

    #[serde(default)]
    pub authors: Vec<Person>,

    /// Download links keyed by MIME type
    #[serde(default)]
    pub formats: BTreeMap<String, String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub summaries: Vec<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(default)]
    pub subjects: Vec<String>,
}

impl BookSummary {
    /// Create a book with only an id and a title
    pub fn new(id: BookId, title: impl Into<String>) -> Self {
        Self {
            id,
            title: title.into(),
            authors: Vec::new(),
            formats: BTreeMap::new(),
            summaries: Vec::new(),
            description: None,
            subjects: Vec::new(),
        }
    }

    /// Add an author
    pub fn with_author(mut self, name: impl Into<String>) -> Self {
        self.authors.push(Person::new(name));
        self
    }

    /// Add a download link for a MIME type
    pub fn with_format(mut self, mime: impl Into<String>, url: impl Into<String>) -> Self {
        self.formats.insert(mime.into(), url.into());
        self
    }

    /// Add a subject heading
    pub fn with_subject(mut self, subject: impl Into<String>) -> Self {
        self.subjects.push(subject.into());
        self
    }

    /// Author names joined for display, "Unknown" when there are none
    pub fn author_line(&self) -> String {
        author_line(&self.authors)
    }

    /// First summary, else the description, else a placeholder
    pub fn summary_text(&self) -> &str {
        self.summaries
            .first()
            .map(String::as_str)
            .or(self.description.as_deref())
            .unwrap_or("No summary available.")
    }

    /// JPEG cover link, if the catalog has one
    pub fn cover_url(&self) -> Option<&str> {
        self.formats
            .get("image/jpeg")
            .or_else(|| self.formats.get("image/jpg"))
            .map(String::as_str)
    }
}

/// Join author names for display
pub fn author_line(authors: &[Person]) -> String {
    if authors.is_empty() {
        return "Unknown".to_string();
    }
    authors
        .iter()
        .map(|a| a.name.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}
