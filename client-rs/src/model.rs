//! Models

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Article identifier
///
/// The API uses integers, but string ids are accepted so that records
/// stored by other clients still round-trip.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ArticleId {
    /// Numeric id
    Int(i64),
    /// Textual id
    Str(String),
}

impl fmt::Display for ArticleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArticleId::Int(id) => write!(f, "{id}"),
            ArticleId::Str(id) => write!(f, "{id}"),
        }
    }
}

impl From<i64> for ArticleId {
    fn from(value: i64) -> Self {
        ArticleId::Int(value)
    }
}

impl From<&str> for ArticleId {
    fn from(value: &str) -> Self {
        ArticleId::Str(value.to_string())
    }
}

/// A news article
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Article {
    /// ID
    pub id: ArticleId,
    /// Title
    pub title: String,
    /// Lead paragraph, may contain HTML
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Author
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    /// Category
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    /// Source id (e.g. `guardian`)
    pub source: String,
    /// Image url
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    /// Link to the original article
    pub url: String,
    /// Publication timestamp (ISO-8601)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub published_at: Option<String>,
    /// Estimated read time
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub read_time_minutes: Option<u32>,
    /// Full content
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    /// Sentiment tag (`positive`, `neutral`, `urgent`)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sentiment: Option<String>,
    /// Fields this client does not know about, kept as-is
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// A page of articles
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArticlesPage {
    /// Articles of this page
    pub articles: Vec<Article>,
    /// Page number (1-based)
    pub page: u32,
    /// Page size
    pub page_size: u32,
    /// Total number of matching articles
    pub total: u64,
    /// Total number of pages
    pub total_pages: u32,
}

/// Health check response
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Health {
    /// Status (`ok`)
    pub status: String,
}

/// Query parameters of `GET /articles`
///
/// Unset filters are left out of the query string rather than sent empty.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ArticleQuery {
    /// Page number (1-based)
    pub page: u32,
    /// Page size
    pub page_size: u32,
    /// Category filter
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    /// Source filter
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    /// Free text search
    #[serde(rename = "q", skip_serializing_if = "Option::is_none")]
    pub query: Option<String>,
    /// Lower bound on the publication date
    #[serde(skip_serializing_if = "Option::is_none")]
    pub from_date: Option<String>,
    /// Upper bound on the publication date
    #[serde(skip_serializing_if = "Option::is_none")]
    pub to_date: Option<String>,
}

/// Turns blank strings into `None`
fn non_empty(value: impl Into<String>) -> Option<String> {
    let value = value.into();
    if value.trim().is_empty() {
        None
    } else {
        Some(value)
    }
}

impl ArticleQuery {
    /// Creates a query for a page
    pub fn new(page: u32, page_size: u32) -> Self {
        Self {
            page,
            page_size,
            ..Default::default()
        }
    }

    /// Sets the category filter
    pub fn category(mut self, category: impl Into<String>) -> Self {
        self.category = non_empty(category);
        self
    }

    /// Sets the source filter
    pub fn source(mut self, source: impl Into<String>) -> Self {
        self.source = non_empty(source);
        self
    }

    /// Sets the search text
    pub fn query(mut self, query: impl Into<String>) -> Self {
        self.query = non_empty(query);
        self
    }

    /// Sets the publication date range
    pub fn published_between(mut self, from: Option<String>, to: Option<String>) -> Self {
        self.from_date = from.and_then(non_empty);
        self.to_date = to.and_then(non_empty);
        self
    }
}
