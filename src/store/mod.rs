//! Local durable storage
//!
//! A small key/value store in the spirit of browser local storage: every
//! key holds a single JSON document that is read and written whole.

use std::{
    collections::HashMap,
    fs,
    path::{Path, PathBuf},
};

use tracing::trace;

pub mod bookmark;
pub mod theme;

pub use bookmark::{BookmarkStore, Toggled, BOOKMARKS_KEY, BOOKMARK_CAPACITY};
pub use theme::{Theme, ThemeStore, THEME_KEY};

/// Storage error
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    /// Filesystem error
    #[error("storage i/o error: {0}")]
    Io(#[from] std::io::Error),
    /// Value could not be (de)serialized
    #[error("storage serialization error: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Durable key/value storage
pub trait Storage {
    /// Reads a value, `None` if the key was never written
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Writes a value, replacing the previous one
    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Removes a key
    fn remove(&mut self, key: &str) -> Result<(), StorageError>;
}

/// File-backed storage, one `<key>.json` file per key
#[derive(Debug, Clone)]
pub struct FileStorage {
    /// Storage directory
    dir: PathBuf,
}

impl FileStorage {
    /// Opens a storage directory, creating it if needed
    pub fn open(dir: impl AsRef<Path>) -> Result<Self, StorageError> {
        let dir = dir.as_ref().to_path_buf();
        // NB : we need to create the parent directories
        fs::create_dir_all(&dir)?;
        Ok(Self { dir })
    }

    /// Returns the storage directory
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Returns the file holding a key
    fn path(&self, key: &str) -> PathBuf {
        let name: String = key
            .chars()
            .map(|c| if c.is_ascii_alphanumeric() || c == '-' || c == '_' { c } else { '_' })
            .collect();
        self.dir.join(format!("{name}.json"))
    }
}

impl Storage for FileStorage {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        let path = self.path(key);
        if !path.exists() {
            return Ok(None);
        }
        trace!(path = %path.display(), "read");
        Ok(Some(fs::read_to_string(path)?))
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        let path = self.path(key);
        trace!(path = %path.display(), bytes = value.len(), "write");
        fs::write(path, value)?;
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<(), StorageError> {
        let path = self.path(key);
        if path.exists() {
            fs::remove_file(path)?;
        }
        Ok(())
    }
}

/// In-memory storage
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    /// Values by key
    values: HashMap<String, String>,
}

impl MemoryStorage {
    /// Creates an empty storage
    pub fn new() -> Self {
        Self::default()
    }
}

impl Storage for MemoryStorage {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.values.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        self.values.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<(), StorageError> {
        self.values.remove(key);
        Ok(())
    }
}
