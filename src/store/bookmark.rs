//! Bookmarks

use pulse_client::{Article, ArticleId};
use tracing::{debug, warn};

use super::{Storage, StorageError};

/// Storage key of the bookmark list
pub const BOOKMARKS_KEY: &str = "pulse-bookmarks";

/// Maximum number of bookmarks
pub const BOOKMARK_CAPACITY: usize = 50;

/// Result of a bookmark toggle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Toggled {
    /// The article was bookmarked
    Added,
    /// The article was removed from the bookmarks
    Removed,
}

/// Bookmark store
///
/// Keeps full article records, oldest first. The whole list is read and
/// written back on every call, so concurrent writers on the same storage
/// follow a last-writer-wins rule.
#[derive(Debug)]
pub struct BookmarkStore<S> {
    /// Backing storage
    storage: S,
}

impl<S: Storage> BookmarkStore<S> {
    /// Creates a store over a storage
    pub fn new(storage: S) -> Self {
        Self { storage }
    }

    /// Returns the bookmarks, oldest first
    ///
    /// Missing or unreadable data is an empty list.
    pub fn list(&self) -> Vec<Article> {
        match self.read() {
            Ok(articles) => articles,
            Err(err) => {
                warn!(%err, "bookmarks unreadable, using an empty list");
                vec![]
            }
        }
    }

    /// Checks if an article is bookmarked
    pub fn is_bookmarked(&self, id: &ArticleId) -> bool {
        self.list().iter().any(|article| &article.id == id)
    }

    /// Adds or removes a bookmark
    ///
    /// When the list is full, the oldest bookmark is evicted first.
    pub fn toggle(&mut self, article: &Article) -> Toggled {
        let mut saved = self.list();
        let toggled = if saved.iter().any(|a| a.id == article.id) {
            saved.retain(|a| a.id != article.id);
            Toggled::Removed
        } else {
            while saved.len() >= BOOKMARK_CAPACITY {
                let evicted = saved.remove(0);
                debug!(id = %evicted.id, "bookmark evicted");
            }
            saved.push(article.clone());
            Toggled::Added
        };

        if let Err(err) = self.write(&saved) {
            warn!(%err, "bookmarks not saved");
        }
        debug!(id = %article.id, ?toggled, count = saved.len(), "bookmark toggled");
        toggled
    }

    /// Returns the backing storage
    pub fn storage(&self) -> &S {
        &self.storage
    }

    /// Reads the list
    fn read(&self) -> Result<Vec<Article>, StorageError> {
        match self.storage.get(BOOKMARKS_KEY)? {
            Some(json) => Ok(serde_json::from_str::<Vec<Article>>(&json)?),
            None => Ok(vec![]),
        }
    }

    /// Writes the list
    fn write(&mut self, articles: &[Article]) -> Result<(), StorageError> {
        let json = serde_json::to_string(articles)?;
        self.storage.set(BOOKMARKS_KEY, &json)
    }
}
