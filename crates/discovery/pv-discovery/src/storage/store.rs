//! [`Storage`] adapter over `object_store`.

use async_trait::async_trait;
use bytes::Bytes;
use object_store::ObjectStore;
use object_store::path::Path as ObjectPath;
use pv_error::{PvError, Result};
use pv_traits::{Storage, StorageEntry};
use std::sync::Arc;
use tracing::{debug, trace};

/// Storage backed by an [`ObjectStore`].
///
/// Listing uses `list_with_delimiter`, so common prefixes come back as
/// directories and objects as files. Object stores have no real directories,
/// so a prefix with nothing below it is reported as
/// [`PvError::StorageNotFound`]. Only the storage root may list empty.
pub struct ObjectStoreStorage {
    store: Arc<dyn ObjectStore>,
    description: String,
}

impl ObjectStoreStorage {
    /// Wrap an object store.
    pub fn new(store: Arc<dyn ObjectStore>, description: impl Into<String>) -> Self {
        Self {
            store,
            description: description.into(),
        }
    }
}

fn object_path(path: &str) -> Option<ObjectPath> {
    let trimmed = path.trim_matches('/');
    if trimmed.is_empty() {
        None
    } else {
        Some(ObjectPath::from(trimmed))
    }
}

fn map_error(path: &str, error: object_store::Error) -> PvError {
    match error {
        object_store::Error::NotFound { .. } => PvError::StorageNotFound(path.to_string()),
        other => PvError::Storage(format!("{path}: {other}")),
    }
}

#[async_trait]
impl Storage for ObjectStoreStorage {
    async fn list(&self, path: &str) -> Result<Vec<StorageEntry>> {
        let prefix = object_path(path);
        let result = self
            .store
            .list_with_delimiter(prefix.as_ref())
            .await
            .map_err(|e| map_error(path, e))?;

        let directories = result
            .common_prefixes
            .iter()
            .filter_map(|p| p.filename())
            .map(StorageEntry::directory);
        let files = result
            .objects
            .iter()
            .filter_map(|meta| meta.location.filename())
            .map(StorageEntry::file);
        let entries: Vec<StorageEntry> = directories.chain(files).collect();

        if entries.is_empty() && prefix.is_some() {
            return Err(PvError::StorageNotFound(path.to_string()));
        }

        debug!(path, entries = entries.len(), "Listed directory");
        Ok(entries)
    }

    async fn open(&self, path: &str) -> Result<Bytes> {
        let location = object_path(path)
            .ok_or_else(|| PvError::Storage(format!("cannot open the storage root '{path}'")))?;
        let bytes = self
            .store
            .get(&location)
            .await
            .map_err(|e| map_error(path, e))?
            .bytes()
            .await
            .map_err(|e| map_error(path, e))?;

        trace!(path, size = bytes.len(), "Read object");
        Ok(bytes)
    }

    fn description(&self) -> String {
        self.description.clone()
    }
}
