//! Partition snapshots accumulated while descending a directory tree.

use pv_error::{PvError, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Column bindings of a partition, keyed by column name.
pub type Columns = BTreeMap<String, String>;

/// A resolved path plus the columns bound on the way to it.
///
/// Partitions are values: every descent step produces a new one and the
/// parent is left untouched.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Partition {
    /// Path relative to the storage root
    pub path: String,

    /// Columns bound so far
    pub columns: Columns,
}

impl Partition {
    /// Create a root partition with no bound columns.
    pub fn root(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            columns: Columns::new(),
        }
    }

    /// Return a new partition with `segment` appended to the path and, if
    /// given, the binding added to the columns.
    ///
    /// # Errors
    ///
    /// Returns [`PvError::DuplicateColumn`] if the column is already bound.
    pub fn expand_by(&self, segment: &str, binding: Option<(String, String)>) -> Result<Self> {
        let path = format!("{}{}", self.path, segment);
        let mut columns = self.columns.clone();

        if let Some((name, value)) = binding {
            if columns.contains_key(&name) {
                return Err(PvError::DuplicateColumn { column: name, path });
            }
            columns.insert(name, value);
        }

        Ok(Self { path, columns })
    }

    /// Make sure the path ends with the directory separator.
    ///
    /// An empty path denotes the storage root and is left as is.
    pub fn ensure_directory(&mut self) {
        if !self.path.is_empty() && !self.path.ends_with('/') {
            self.path.push('/');
        }
    }

    /// Look up a bound column.
    pub fn column(&self, name: &str) -> Option<&str> {
        self.columns.get(name).map(String::as_str)
    }
}
