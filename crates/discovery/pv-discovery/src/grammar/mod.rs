//! Partition grammars: how directory levels map to table columns.
//!
//! A grammar describes, level by level, how a path segment binds to a column,
//! whether the acceptable segments of a level can be enumerated up front
//! (saving a listing call), and where descent stops.
//!
//! Three grammars are provided:
//! - [`AutoGrammar`] for `name=value` segments (Hive-style)
//! - [`FixedGrammar`] for bare values whose column names are given externally
//! - [`DateRangeGrammar`] for year/month/day trees restricted to a date range
//!
//! # Example
//!
//! ```
//! use pv_discovery::grammar::{AutoGrammar, Grammar};
//!
//! let grammar = AutoGrammar::from_description("col1=4/col2=[5,6]/colX", None).unwrap();
//! assert_eq!(grammar.generate().unwrap(), Some(vec!["col1=4".to_string()]));
//! assert_eq!(
//!     grammar.parse_segment("col1=4").unwrap(),
//!     ("col1".to_string(), "4".to_string())
//! );
//! ```

mod auto;
mod date_range;
mod description;
mod fixed;

pub use auto::AutoGrammar;
pub use date_range::{DateColumns, DateRangeGrammar, days_in_month};
pub use description::{PartitionGrammar, parse_description};
pub use fixed::FixedGrammar;

use pv_error::Result;
use std::fmt::Debug;

use crate::partition::Partition;

/// The column-parsing contract consumed by the discovery engine.
pub trait Grammar: Send + Sync + Debug {
    /// Parse one path segment into a `(column, value)` binding.
    ///
    /// A trailing `/` on the segment is ignored.
    fn parse_segment(&self, segment: &str) -> Result<(String, String)>;

    /// Grammar to use one level below `partition`.
    fn tail(&self, partition: &Partition) -> Result<Box<dyn Grammar>>;

    /// Exact set of acceptable segments at this level, if known.
    ///
    /// When this returns a non-empty list the engine skips the storage listing.
    fn generate(&self) -> Result<Option<Vec<String>>>;

    /// Whether this level holds the leaf files.
    fn is_terminal_level(&self) -> bool;

    /// Whether the terminal level binds a column parsed from the filename.
    fn parses_filenames(&self) -> bool;

    /// Get a description of this grammar for logs.
    fn description(&self) -> String;
}

/// Strip the directory separator from a listed segment.
pub(crate) fn trim_segment(segment: &str) -> &str {
    segment.trim_matches('/')
}

/// Split a `name=value` segment.
pub(crate) fn split_key_value(segment: &str) -> Option<(String, String)> {
    trim_segment(segment)
        .split_once('=')
        .map(|(name, value)| (name.to_string(), value.to_string()))
}
