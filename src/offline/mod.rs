//! Offline cache manager
//!
//! Keeps a versioned cache of the app shell. Installing fills the cache
//! for the current version, activating drops every other version, and
//! requests are answered from the cache first except for the API, which
//! always goes to the network.

mod cache;
mod fetch;

use std::fmt;

use futures::future::join_all;
use reqwest::Url;
use tracing::{debug, info, warn};

pub use cache::{Cache, CacheStorage};
pub use fetch::{AssetFetcher, FetchError, HttpAssetFetcher, Request, Response};

/// Name of the current cache version
pub const CACHE_NAME: &str = "pulse-news-v1";

/// Path fragment identifying API requests
pub const API_NAMESPACE: &str = "/api/v1";

/// App shell, relative to the origin
pub const SHELL_ASSETS: [&str; 6] = [
    "./",
    "./index.html",
    "./style.css",
    "./app.js",
    "./icon.png",
    "./manifest.json",
];

/// Third-party stylesheets
pub const EXTERNAL_ASSETS: [&str; 2] = [
    "https://fonts.googleapis.com/css2?family=Playfair+Display:wght@700;800&family=Outfit:wght@300;400;500;600;700&display=swap",
    "https://cdnjs.cloudflare.com/ajax/libs/font-awesome/6.5.1/css/all.min.css",
];

/// Cache manager error
#[derive(Debug, thiserror::Error)]
pub enum CacheError {
    /// An asset could not be fetched during install
    #[error("asset {url} unreachable: {reason}")]
    AssetUnreachable {
        /// Asset url
        url: String,
        /// Failure
        reason: String,
    },
    /// Lifecycle step not allowed in the current state
    #[error("invalid transition from {from} to {to}")]
    InvalidState {
        /// Current state
        from: WorkerState,
        /// Requested state
        to: WorkerState,
    },
    /// Malformed asset url
    #[error("invalid url: {0}")]
    InvalidUrl(String),
}

/// Lifecycle state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WorkerState {
    /// Not installed yet
    #[default]
    Parsed,
    /// Filling the cache
    Installing,
    /// Cache filled, waiting to activate
    Installed,
    /// Dropping old caches
    Activating,
    /// Serving requests
    Activated,
    /// Failed or replaced
    Redundant,
}

impl fmt::Display for WorkerState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            WorkerState::Parsed => "parsed",
            WorkerState::Installing => "installing",
            WorkerState::Installed => "installed",
            WorkerState::Activating => "activating",
            WorkerState::Activated => "activated",
            WorkerState::Redundant => "redundant",
        };
        write!(f, "{s}")
    }
}

fn is_valid_transition(from: WorkerState, to: WorkerState) -> bool {
    use WorkerState::*;

    matches!(
        (from, to),
        (Parsed, Installing)
            | (Installing, Installed)
            | (Installing, Redundant)
            | (Installed, Activating)
            | (Activating, Activated)
            | (Activating, Redundant)
            | (Activated, Redundant)
    )
}

/// How a request is served
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchDecision {
    /// Straight to the network
    NetworkOnly,
    /// From the cache, the network on a miss
    CacheFirst,
}

/// Resolves the asset manifest against the app origin
pub fn default_manifest(origin: &Url) -> Result<Vec<Url>, CacheError> {
    let shell = SHELL_ASSETS.iter().map(|path| origin.join(path));
    let external = EXTERNAL_ASSETS.iter().map(|url| Url::parse(url));
    shell
        .chain(external)
        .map(|url| url.map_err(|err| CacheError::InvalidUrl(err.to_string())))
        .collect()
}

/// Offline cache manager
#[derive(Debug)]
pub struct OfflineCacheManager<A> {
    /// Cache name of this version
    cache_name: String,
    /// Assets to pre-cache
    manifest: Vec<Url>,
    /// Path fragment identifying API requests
    api_namespace: String,
    /// Lifecycle state
    state: WorkerState,
    /// Caches
    caches: CacheStorage,
    /// Network
    fetcher: A,
}

impl<A: AssetFetcher> OfflineCacheManager<A> {
    /// Creates a manager over empty caches
    pub fn new(
        cache_name: impl Into<String>,
        manifest: Vec<Url>,
        api_namespace: impl Into<String>,
        fetcher: A,
    ) -> Self {
        Self {
            cache_name: cache_name.into(),
            manifest,
            api_namespace: api_namespace.into(),
            state: WorkerState::Parsed,
            caches: CacheStorage::new(),
            fetcher,
        }
    }

    /// Uses existing caches, e.g. those left by a previous version
    pub fn with_caches(mut self, caches: CacheStorage) -> Self {
        self.caches = caches;
        self
    }

    /// Returns the cache name of this version
    pub fn cache_name(&self) -> &str {
        &self.cache_name
    }

    /// Returns the lifecycle state
    pub fn state(&self) -> WorkerState {
        self.state
    }

    /// Returns the caches
    pub fn caches(&self) -> &CacheStorage {
        &self.caches
    }

    /// Moves to another lifecycle state
    fn transition(&mut self, to: WorkerState) -> Result<(), CacheError> {
        if !is_valid_transition(self.state, to) {
            return Err(CacheError::InvalidState {
                from: self.state,
                to,
            });
        }
        info!(from = %self.state, %to, "lifecycle");
        self.state = to;
        Ok(())
    }

    /// Pre-caches the manifest
    ///
    /// Every asset is fetched before anything is written: if one of them
    /// fails, the cache is left untouched and the manager is redundant.
    /// Returns the number of cached assets.
    #[tracing::instrument(skip_all)]
    pub async fn install(&mut self) -> Result<usize, CacheError> {
        self.transition(WorkerState::Installing)?;

        let requests: Vec<Request> = self.manifest.iter().cloned().map(Request::get).collect();
        let results = join_all(requests.iter().map(|request| self.fetcher.fetch(request))).await;

        let mut entries = Vec::with_capacity(requests.len());
        for (request, result) in requests.into_iter().zip(results) {
            let reason = match result {
                Ok(response) if response.is_success() => {
                    entries.push((request, response));
                    continue;
                }
                Ok(response) => format!("status {}", response.status),
                Err(err) => err.to_string(),
            };
            warn!(url = %request.url, %reason, "install failed");
            self.transition(WorkerState::Redundant)?;
            return Err(CacheError::AssetUnreachable {
                url: request.url.to_string(),
                reason,
            });
        }

        let count = entries.len();
        let cache = self.caches.open(&self.cache_name);
        for (request, response) in entries {
            cache.put(request, response);
        }
        info!(cache = %self.cache_name, count, "assets cached");
        self.transition(WorkerState::Installed)?;
        Ok(count)
    }

    /// Deletes every cache but the current one
    ///
    /// Returns the names of the deleted caches.
    pub fn activate(&mut self) -> Result<Vec<String>, CacheError> {
        self.transition(WorkerState::Activating)?;

        let stale: Vec<String> = self
            .caches
            .keys()
            .into_iter()
            .filter(|name| name != &self.cache_name)
            .collect();
        for name in &stale {
            self.caches.delete(name);
            info!(cache = %name, "old cache deleted");
        }

        self.transition(WorkerState::Activated)?;
        Ok(stale)
    }

    /// Returns how a request is served
    pub fn decide(&self, request: &Request) -> FetchDecision {
        if request.url.path().contains(self.api_namespace.as_str()) {
            FetchDecision::NetworkOnly
        } else {
            FetchDecision::CacheFirst
        }
    }

    /// Serves a request
    ///
    /// Network responses are never written back to the cache.
    pub async fn respond(&self, request: &Request) -> Result<Response, FetchError> {
        if self.decide(request) == FetchDecision::CacheFirst {
            if let Some(response) = self.caches.match_request(request) {
                debug!(url = %request.url, "cache hit");
                return Ok(response.clone());
            }
        }
        debug!(url = %request.url, "network");
        self.fetcher.fetch(request).await
    }
}
