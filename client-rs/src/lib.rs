//! Article API client

pub mod error;
pub mod model;

use reqwest::Response;
use serde::de::DeserializeOwned;
use tracing::debug;

pub use error::NetworkError;
pub use model::{Article, ArticleId, ArticleQuery, ArticlesPage, Health};

/// API client
#[derive(Debug, Clone)]
pub struct Client {
    /// Base URL (e.g. `http://localhost:8000/api/v1`)
    pub url: String,
    /// HTTP client
    http: reqwest::Client,
}

impl Client {
    /// Creates a new API client
    pub fn new(url: &str) -> Self {
        Self {
            url: url.trim_end_matches('/').to_string(),
            http: reqwest::Client::new(),
        }
    }

    /// Reads a JSON body, or turns a non-success response into an error
    async fn read_json<T: DeserializeOwned>(res: Response) -> Result<T, NetworkError> {
        let status = res.status();
        if !status.is_success() {
            let body = res.text().await.unwrap_or_default();
            return Err(NetworkError::status(status.as_u16(), &body));
        }

        // NB: decode from bytes so that malformed JSON maps to `Decode`
        let bytes = res.bytes().await?;
        Ok(serde_json::from_slice::<T>(&bytes)?)
    }
}

impl Client {
    /// Fetches a page of articles
    #[tracing::instrument(skip_all, fields(page = query.page))]
    pub async fn get_articles(&self, query: &ArticleQuery) -> Result<ArticlesPage, NetworkError> {
        let res = self
            .http
            .get(format!("{}/articles", self.url))
            .query(query)
            .send()
            .await?;

        let page = Self::read_json::<ArticlesPage>(res).await?;
        debug!(
            count = page.articles.len(),
            page = page.page,
            total_pages = page.total_pages,
            total = page.total,
            "articles received"
        );
        Ok(page)
    }

    /// Fetches a single article
    #[tracing::instrument(skip_all, fields(id = %id))]
    pub async fn get_article(&self, id: &ArticleId) -> Result<Article, NetworkError> {
        let res = self
            .http
            .get(format!("{}/articles/{}", self.url, id))
            .send()
            .await?;
        Self::read_json::<Article>(res).await
    }

    /// Asks the backend to ingest new articles
    ///
    /// # Notes
    ///
    /// Ingestion runs asynchronously on the backend, this only tells whether
    /// the request was accepted. Callers re-fetch after a grace period.
    #[tracing::instrument(skip_all)]
    pub async fn sync(&self) -> Result<(), NetworkError> {
        let res = self
            .http
            .post(format!("{}/sync", self.url))
            .send()
            .await?;

        let status = res.status();
        if status.is_success() {
            debug!(status = status.as_u16(), "sync accepted");
            Ok(())
        } else {
            let body = res.text().await.unwrap_or_default();
            Err(NetworkError::status(status.as_u16(), &body))
        }
    }

    /// Performs a health check
    #[tracing::instrument(skip_all)]
    pub async fn health(&self) -> Result<Health, NetworkError> {
        let res = self
            .http
            .get(format!("{}/health", self.url))
            .send()
            .await?;
        Self::read_json::<Health>(res).await
    }
}
