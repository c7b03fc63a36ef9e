//! Requests, responses and the network seam

use async_trait::async_trait;
use reqwest::{header::CONTENT_TYPE, Method, Url};
use tracing::debug;

/// Outbound request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Request {
    /// Method
    pub method: Method,
    /// Absolute url
    pub url: Url,
}

impl Request {
    /// Creates a request
    pub fn new(method: Method, url: Url) -> Self {
        Self { method, url }
    }

    /// Creates a GET request
    pub fn get(url: Url) -> Self {
        Self::new(Method::GET, url)
    }
}

/// Response
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Response {
    /// Status code
    pub status: u16,
    /// Content type
    pub content_type: Option<String>,
    /// Body
    pub body: Vec<u8>,
}

impl Response {
    /// Creates a response
    pub fn new(status: u16, body: impl Into<Vec<u8>>) -> Self {
        Self {
            status,
            content_type: None,
            body: body.into(),
        }
    }

    /// Checks for a 2xx status
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Network error
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    /// HTTP error
    #[error(transparent)]
    Http(#[from] reqwest::Error),
    /// Network unreachable
    #[error("unreachable: {0}")]
    Unreachable(String),
}

/// Network access
#[async_trait]
pub trait AssetFetcher: Send + Sync {
    /// Sends a request
    async fn fetch(&self, request: &Request) -> Result<Response, FetchError>;
}

/// [AssetFetcher] over HTTP
#[derive(Debug, Clone, Default)]
pub struct HttpAssetFetcher {
    /// HTTP client
    http: reqwest::Client,
}

impl HttpAssetFetcher {
    /// Creates a fetcher
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl AssetFetcher for HttpAssetFetcher {
    async fn fetch(&self, request: &Request) -> Result<Response, FetchError> {
        let res = self
            .http
            .request(request.method.clone(), request.url.clone())
            .send()
            .await?;
        let status = res.status().as_u16();
        let content_type = res
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .map(str::to_string);
        let body = res.bytes().await?.to_vec();
        debug!(url = %request.url, status, len = body.len(), "fetched");

        Ok(Response {
            status,
            content_type,
            body,
        })
    }
}
