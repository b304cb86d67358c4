//! pv-discovery - partition discovery over partitioned directory trees.
//!
//! A table stored as a directory tree whose path segments encode columns
//! (`year=2022/month=4/...` or bare positional values) can be filtered without
//! a metastore. This crate provides:
//!
//! - [`Partition`] values accumulated while descending the tree
//! - [`grammar`]: how path segments map to columns, and which segments can be
//!   generated instead of listed
//! - [`query`]: predicates evaluated both on complete and on partially bound
//!   column sets, so whole subtrees can be pruned before they are listed
//! - [`discover_partitions`] and [`Discoverer`]: the recursive discovery engine
//! - [`storage`]: `object_store` backed storage for local, S3 and in-memory trees
//! - [`output`]: JSON/JSONL output to stdout and in-memory collection
//!
//! # Example
//!
//! ```ignore
//! use pv_discovery::{AutoGrammar, DiscoveryConfig, Partition, discover_partitions};
//! use pv_discovery::query::{MembershipQuery, and};
//!
//! let grammar = AutoGrammar::from_description("col1=4/col2=[5,6]/colX", None)?;
//! let query = and(MembershipQuery::eq("col1", "4"), MembershipQuery::new("col2", ["5", "6"]));
//!
//! let partitions = discover_partitions(
//!     &query,
//!     &grammar,
//!     Partition::root("table/"),
//!     storage.as_ref(),
//!     &DiscoveryConfig::new(),
//! )
//! .await?;
//! ```

pub mod config;
pub mod discover;
pub mod grammar;
pub mod output;
pub mod partition;
pub mod query;
pub mod stats;
pub mod storage;

pub use config::DiscoveryConfig;
pub use discover::{Discoverer, discover_partitions};
pub use grammar::{AutoGrammar, DateColumns, DateRangeGrammar, FixedGrammar, Grammar};
pub use output::{CollectingOutput, Output, OutputFormat, StdoutOutput};
pub use partition::{Columns, Partition};
pub use query::{ConstantQuery, Query};
pub use stats::{DiscoveryStats, StatsSnapshot};
pub use storage::{ObjectStoreStorage, StorageOptions, storage_from_url};

pub use pv_error::{PvError, Result};
pub use pv_traits::{EntryKind, Storage, StorageEntry};
