//! Storage capability trait.

use async_trait::async_trait;
use bytes::Bytes;
use pv_error::Result;
use serde::{Deserialize, Serialize};

/// Kind of a listed entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryKind {
    File,
    Directory,
}

/// One entry returned by [`Storage::list`].
///
/// `name` is the last path segment only, never the full path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StorageEntry {
    pub name: String,
    pub kind: EntryKind,
}

impl StorageEntry {
    /// Create a file entry.
    pub fn file(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: EntryKind::File,
        }
    }

    /// Create a directory entry.
    pub fn directory(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: EntryKind::Directory,
        }
    }

    /// Whether this entry is a directory.
    pub fn is_directory(&self) -> bool {
        self.kind == EntryKind::Directory
    }
}

/// Trait for storage backends.
///
/// Paths are `/`-separated and relative to the backend's root. Directory paths
/// passed to [`Storage::list`] end with `/`.
///
/// Implementations report a missing path as
/// [`PvError::StorageNotFound`](pv_error::PvError::StorageNotFound) and must
/// not retry it.
#[async_trait]
pub trait Storage: Send + Sync {
    /// List the immediate children of a directory.
    async fn list(&self, path: &str) -> Result<Vec<StorageEntry>>;

    /// Read the full contents of a file.
    async fn open(&self, path: &str) -> Result<Bytes>;

    /// Get a human-readable description of this backend.
    fn description(&self) -> String;
}
