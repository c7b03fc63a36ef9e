//! Shared utilities

#![allow(dead_code)]

use std::sync::{
    atomic::{AtomicBool, AtomicUsize, Ordering},
    Arc, Mutex,
};

use async_trait::async_trait;
use fake::{
    faker::{lorem::en::Sentence, name::en::Name},
    Fake,
};
use pulse::{
    store::MemoryStorage,
    view::{ArticleFetcher, PaginationMode, RecordingRenderer, ViewController},
};
use pulse_client::{Article, ArticleQuery, ArticlesPage, NetworkError};
use serde_json::Map;

/// Controller under test
pub type TestView = ViewController<FakeArticles, MemoryStorage, RecordingRenderer>;

/// In-memory article API
///
/// Filters and paginates a fixed corpus the way the backend does, and
/// records every call.
#[derive(Debug, Clone, Default)]
pub struct FakeArticles {
    /// Corpus
    corpus: Arc<Vec<Article>>,
    /// Received queries
    queries: Arc<Mutex<Vec<ArticleQuery>>>,
    /// Number of sync requests
    syncs: Arc<AtomicUsize>,
    /// Every call fails while set
    offline: Arc<AtomicBool>,
}

impl FakeArticles {
    /// Creates an API serving a corpus
    pub fn new(corpus: Vec<Article>) -> Self {
        Self {
            corpus: Arc::new(corpus),
            ..Default::default()
        }
    }

    /// Makes every following call fail, or succeed again
    pub fn set_offline(&self, offline: bool) {
        self.offline.store(offline, Ordering::SeqCst);
    }

    /// Returns the received queries
    pub fn queries(&self) -> Vec<ArticleQuery> {
        self.queries.lock().unwrap().clone()
    }

    /// Returns the number of sync requests
    pub fn syncs(&self) -> usize {
        self.syncs.load(Ordering::SeqCst)
    }

    fn check_online(&self) -> Result<(), NetworkError> {
        if self.offline.load(Ordering::SeqCst) {
            return Err(NetworkError::Status {
                status: 503,
                message: "Service Unavailable".to_string(),
            });
        }
        Ok(())
    }
}

#[async_trait]
impl ArticleFetcher for FakeArticles {
    async fn fetch_articles(&self, query: &ArticleQuery) -> Result<ArticlesPage, NetworkError> {
        self.queries.lock().unwrap().push(query.clone());
        self.check_online()?;

        let text = query.query.as_deref().map(str::to_lowercase);
        let matching: Vec<&Article> = self
            .corpus
            .iter()
            .filter(|a| query.category.is_none() || a.category == query.category)
            .filter(|a| query.source.as_deref().map_or(true, |s| a.source == s))
            .filter(|a| {
                text.as_deref()
                    .map_or(true, |q| a.title.to_lowercase().contains(q))
            })
            .collect();

        let total = matching.len() as u64;
        let page_size = query.page_size.max(1);
        let skip = ((query.page.max(1) - 1) * page_size) as usize;
        let articles = matching
            .into_iter()
            .skip(skip)
            .take(page_size as usize)
            .cloned()
            .collect();

        Ok(ArticlesPage {
            articles,
            page: query.page,
            page_size,
            total,
            total_pages: total.div_ceil(page_size as u64) as u32,
        })
    }

    async fn trigger_sync(&self) -> Result<(), NetworkError> {
        self.syncs.fetch_add(1, Ordering::SeqCst);
        self.check_online()
    }
}

/// Builds an article
pub fn article(id: i64, category: &str, source: &str) -> Article {
    Article {
        id: id.into(),
        title: format!("Story {id}"),
        description: Some(Sentence(3..8).fake()),
        author: Some(Name().fake()),
        category: Some(category.to_string()),
        source: source.to_string(),
        image_url: None,
        url: format!("https://news.example.com/{id}"),
        published_at: Some("2024-01-05T10:00:00+00:00".to_string()),
        read_time_minutes: Some(4),
        content: None,
        sentiment: None,
        extra: Map::new(),
    }
}

/// Builds a corpus of technology articles from one source
pub fn corpus(count: i64) -> Vec<Article> {
    (1..=count).map(|id| article(id, "technology", "wired")).collect()
}

/// Creates a controller over a corpus
pub fn view(corpus: Vec<Article>, mode: PaginationMode) -> TestView {
    view_with_storage(corpus, MemoryStorage::new(), mode)
}

/// Creates a controller over a corpus and a prepared storage
pub fn view_with_storage(
    corpus: Vec<Article>,
    storage: MemoryStorage,
    mode: PaginationMode,
) -> TestView {
    ViewController::new(
        FakeArticles::new(corpus),
        storage,
        RecordingRenderer::new(),
        mode,
    )
}
