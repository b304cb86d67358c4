//! Common utilities for integration tests.

use async_trait::async_trait;
use bytes::Bytes;
use parking_lot::Mutex;
use pv_discovery::{Partition, PvError, Result, Storage, StorageEntry};
use std::collections::BTreeSet;

/// A directory tree built from file paths, recording every listing call.
///
/// Listing a directory that holds no files at any depth fails with
/// [`PvError::StorageNotFound`], like a filesystem would.
pub struct MockStorage {
    files: BTreeSet<String>,
    listed: Mutex<Vec<String>>,
}

impl MockStorage {
    pub fn new(files: &[&str]) -> Self {
        Self {
            files: files.iter().map(|f| f.to_string()).collect(),
            listed: Mutex::new(Vec::new()),
        }
    }

    /// Directories listed so far, sorted.
    ///
    /// Sibling subtrees are listed concurrently, so call order is not stable.
    pub fn listed(&self) -> Vec<String> {
        let mut listed = self.listed.lock().clone();
        listed.sort();
        listed
    }

    pub fn list_calls(&self) -> usize {
        self.listed.lock().len()
    }

    /// Whether `prefix` or anything below it was listed.
    pub fn listed_under(&self, prefix: &str) -> bool {
        self.listed.lock().iter().any(|path| path.starts_with(prefix))
    }
}

#[async_trait]
impl Storage for MockStorage {
    async fn list(&self, path: &str) -> Result<Vec<StorageEntry>> {
        self.listed.lock().push(path.to_string());

        let prefix = match path.trim_end_matches('/') {
            "" => String::new(),
            dir => format!("{dir}/"),
        };

        let mut entries: BTreeSet<(bool, String)> = BTreeSet::new();
        for file in self.files.iter().filter(|f| f.starts_with(&prefix)) {
            match file[prefix.len()..].split_once('/') {
                Some((directory, _)) => entries.insert((true, directory.to_string())),
                None => entries.insert((false, file[prefix.len()..].to_string())),
            };
        }

        if entries.is_empty() && !prefix.is_empty() {
            return Err(PvError::StorageNotFound(path.to_string()));
        }

        // reverse order, so the engine has to sort
        Ok(entries
            .into_iter()
            .rev()
            .map(|(is_directory, name)| {
                if is_directory {
                    StorageEntry::directory(name)
                } else {
                    StorageEntry::file(name)
                }
            })
            .collect())
    }

    async fn open(&self, path: &str) -> Result<Bytes> {
        if self.files.contains(path) {
            Ok(Bytes::from(path.to_string()))
        } else {
            Err(PvError::StorageNotFound(path.to_string()))
        }
    }

    fn description(&self) -> String {
        format!("mock({} files)", self.files.len())
    }
}

/// Paths of discovered partitions.
pub fn paths(partitions: &[Partition]) -> Vec<&str> {
    partitions.iter().map(|p| p.path.as_str()).collect()
}
