//! Article source

use async_trait::async_trait;
use pulse_client::{ArticleQuery, ArticlesPage, Client, NetworkError};

/// Source of articles for the view
#[async_trait]
pub trait ArticleFetcher: Send + Sync {
    /// Fetches a page of articles
    async fn fetch_articles(&self, query: &ArticleQuery) -> Result<ArticlesPage, NetworkError>;

    /// Asks the backend to refresh its feeds
    async fn trigger_sync(&self) -> Result<(), NetworkError>;
}

#[async_trait]
impl ArticleFetcher for Client {
    async fn fetch_articles(&self, query: &ArticleQuery) -> Result<ArticlesPage, NetworkError> {
        self.get_articles(query).await
    }

    async fn trigger_sync(&self) -> Result<(), NetworkError> {
        self.sync().await
    }
}
