//! Named caches

use std::collections::BTreeMap;

use super::fetch::{Request, Response};

/// A named cache of responses
#[derive(Debug, Clone, Default)]
pub struct Cache {
    /// Name
    name: String,
    /// Entries keyed by `METHOD:url`
    entries: BTreeMap<String, (Request, Response)>,
}

impl Cache {
    /// Creates an empty cache
    fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            entries: BTreeMap::new(),
        }
    }

    /// Returns the name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Looks up the response stored for a request
    pub fn match_request(&self, request: &Request) -> Option<&Response> {
        self.entries.get(&key(request)).map(|(_, response)| response)
    }

    /// Stores a response, replacing any previous one
    pub fn put(&mut self, request: Request, response: Response) {
        self.entries.insert(key(&request), (request, response));
    }

    /// Removes the response stored for a request
    pub fn delete(&mut self, request: &Request) -> bool {
        self.entries.remove(&key(request)).is_some()
    }

    /// Returns the cached requests
    pub fn keys(&self) -> Vec<&Request> {
        self.entries.values().map(|(request, _)| request).collect()
    }

    /// Returns the number of entries
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Checks if the cache is empty
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

fn key(request: &Request) -> String {
    format!("{}:{}", request.method, request.url)
}

/// All the caches of an origin
#[derive(Debug, Clone, Default)]
pub struct CacheStorage {
    /// Caches by name
    caches: BTreeMap<String, Cache>,
}

impl CacheStorage {
    /// Creates an empty storage
    pub fn new() -> Self {
        Self::default()
    }

    /// Opens a cache, creating it if needed
    pub fn open(&mut self, name: &str) -> &mut Cache {
        self.caches
            .entry(name.to_string())
            .or_insert_with(|| Cache::new(name))
    }

    /// Returns a cache
    pub fn get(&self, name: &str) -> Option<&Cache> {
        self.caches.get(name)
    }

    /// Checks if a cache exists
    pub fn has(&self, name: &str) -> bool {
        self.caches.contains_key(name)
    }

    /// Deletes a cache
    pub fn delete(&mut self, name: &str) -> bool {
        self.caches.remove(name).is_some()
    }

    /// Returns the cache names
    pub fn keys(&self) -> Vec<String> {
        self.caches.keys().cloned().collect()
    }

    /// Looks up a request across every cache
    pub fn match_request(&self, request: &Request) -> Option<&Response> {
        self.caches
            .values()
            .find_map(|cache| cache.match_request(request))
    }
}
