//! Filter and pagination state

use std::{fmt, str::FromStr};

use pulse_client::ArticleQuery;

/// Number of articles per page
pub const PAGE_SIZE: u32 = 12;

/// Article category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Category {
    /// No category filter
    #[default]
    All,
    /// Technology
    Technology,
    /// Business
    Business,
    /// Sports
    Sports,
    /// Politics
    Politics,
    /// Science
    Science,
    /// Health
    Health,
    /// Entertainment
    Entertainment,
    /// Bookmarked articles, served from local storage only
    Saved,
}

impl Category {
    /// All categories, in display order
    pub const ALL: [Category; 9] = [
        Category::All,
        Category::Technology,
        Category::Business,
        Category::Sports,
        Category::Politics,
        Category::Science,
        Category::Health,
        Category::Entertainment,
        Category::Saved,
    ];

    /// Returns the wire value
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::All => "all",
            Category::Technology => "technology",
            Category::Business => "business",
            Category::Sports => "sports",
            Category::Politics => "politics",
            Category::Science => "science",
            Category::Health => "health",
            Category::Entertainment => "entertainment",
            Category::Saved => "saved",
        }
    }

    /// Checks if this category bypasses the network
    pub fn is_saved(&self) -> bool {
        matches!(self, Category::Saved)
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Category {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim().to_lowercase();
        Category::ALL
            .into_iter()
            .find(|category| category.as_str() == s)
            .ok_or_else(|| format!("unknown category '{s}'"))
    }
}

/// The filters a request is issued under
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FilterKey {
    /// Category
    pub category: Category,
    /// Source filter, empty for none
    pub source: String,
    /// Search text, empty for none
    pub query: String,
}

impl FilterKey {
    /// Builds the API query for a page under these filters
    pub fn to_query(&self, page: u32) -> ArticleQuery {
        let query = ArticleQuery::new(page, PAGE_SIZE)
            .source(self.source.as_str())
            .query(self.query.as_str());
        match self.category {
            Category::All | Category::Saved => query,
            category => query.category(category.as_str()),
        }
    }
}

/// Filter and pagination state
///
/// `page` is the last page that loaded successfully. Every filter change
/// resets it to 1.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterState {
    /// Current page (1-based)
    pub page: u32,
    /// Category
    pub category: Category,
    /// Source filter, empty for none
    pub source: String,
    /// Search text, empty for none
    pub query: String,
    /// More pages are available
    ///
    /// Stays false until a page loads under the current filters.
    pub has_more: bool,
    /// A fetch is in flight
    pub is_loading: bool,
}

impl Default for FilterState {
    fn default() -> Self {
        Self {
            page: 1,
            category: Category::All,
            source: String::new(),
            query: String::new(),
            has_more: false,
            is_loading: false,
        }
    }
}

impl FilterState {
    /// Returns the page size
    pub fn page_size(&self) -> u32 {
        PAGE_SIZE
    }

    /// Returns the filter snapshot
    pub fn key(&self) -> FilterKey {
        FilterKey {
            category: self.category,
            source: self.source.clone(),
            query: self.query.clone(),
        }
    }

    /// Sets the category and resets pagination
    pub fn set_category(&mut self, category: Category) {
        self.category = category;
        self.reset_page();
    }

    /// Sets the source filter and resets pagination
    pub fn set_source(&mut self, source: impl Into<String>) {
        self.source = source.into().trim().to_string();
        self.reset_page();
    }

    /// Sets the search text and resets pagination
    pub fn set_query(&mut self, query: impl Into<String>) {
        self.query = query.into().trim().to_string();
        self.reset_page();
    }

    /// Goes back to the first page
    ///
    /// Nothing can be paged until the first page loads again.
    pub fn reset_page(&mut self) {
        self.page = 1;
        self.has_more = false;
    }

    /// Builds the API query for a page under the current filters
    pub fn to_query(&self, page: u32) -> ArticleQuery {
        self.key().to_query(page)
    }
}
