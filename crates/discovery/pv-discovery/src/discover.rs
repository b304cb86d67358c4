//! Recursive partition discovery.
//!
//! Discovery walks the directory tree one grammar level at a time. At each
//! level the entries are either generated by the grammar (no storage call) or
//! listed once from storage. Directories are bound, pruned with
//! [`Query::eval_available`] and descended into; at the terminal level files
//! are accepted with [`Query::eval_all`].
//!
//! The result is materialised eagerly into a `Vec`. Sibling directories that
//! survive pruning are descended concurrently, but the output order is fixed:
//! depth-first, descendants before the files of the current level, listed
//! entries sorted by name and generated entries in grammar order.

use futures::future::BoxFuture;
use futures::{FutureExt, StreamExt, TryStreamExt, stream};
use pv_error::{PvError, Result};
use pv_traits::{Storage, StorageEntry};
use std::sync::Arc;
use tokio::sync::Semaphore;
use tracing::{debug, info, trace};

use crate::config::DiscoveryConfig;
use crate::grammar::Grammar;
use crate::output::Output;
use crate::partition::Partition;
use crate::query::Query;
use crate::stats::{DiscoveryStats, StatsSnapshot};

/// Entries of one directory level, split by kind.
#[derive(Debug, Default)]
struct Listing {
    files: Vec<String>,
    directories: Vec<String>,
}

impl Listing {
    fn from_entries(entries: Vec<StorageEntry>) -> Self {
        let mut listing = Self::default();
        for entry in entries {
            if entry.is_directory() {
                listing.directories.push(entry.name);
            } else {
                listing.files.push(entry.name);
            }
        }
        listing.files.sort();
        listing.directories.sort();
        listing
    }

    fn generated(names: Vec<String>, terminal: bool) -> Self {
        if terminal {
            Self {
                files: names,
                directories: Vec::new(),
            }
        } else {
            Self {
                files: Vec::new(),
                directories: names.into_iter().map(|name| format!("{name}/")).collect(),
            }
        }
    }
}

/// State shared by every level of one run.
struct Walk<'a> {
    query: &'a dyn Query,
    storage: &'a dyn Storage,
    lists: Semaphore,
    parallel_directories: usize,
    stats: &'a DiscoveryStats,
}

impl<'a> Walk<'a> {
    fn new(
        query: &'a dyn Query,
        storage: &'a dyn Storage,
        config: &DiscoveryConfig,
        stats: &'a DiscoveryStats,
    ) -> Self {
        Self {
            query,
            storage,
            lists: Semaphore::new(config.max_concurrent_lists.max(1)),
            parallel_directories: config.max_parallel_directories.max(1),
            stats,
        }
    }

    async fn listing(&self, grammar: &dyn Grammar, path: &str) -> Result<Listing> {
        if let Some(names) = grammar.generate()?.filter(|names| !names.is_empty()) {
            trace!(path, count = names.len(), "Generated level");
            self.stats.record_generated();
            return Ok(Listing::generated(names, grammar.is_terminal_level()));
        }

        let _permit = self
            .lists
            .acquire()
            .await
            .map_err(|e| PvError::Storage(format!("Failed to acquire listing permit: {e}")))?;

        self.stats.record_listing();
        let entries = self.storage.list(path).await?;
        debug!(path, entries = entries.len(), "Listed level");
        Ok(Listing::from_entries(entries))
    }

    fn descend<'s>(
        &'s self,
        grammar: &'s dyn Grammar,
        mut partition: Partition,
    ) -> BoxFuture<'s, Result<Vec<Partition>>> {
        async move {
            partition.ensure_directory();
            let listing = self.listing(grammar, &partition.path).await?;

            let mut children = Vec::with_capacity(listing.directories.len());
            for directory in &listing.directories {
                let binding = grammar.parse_segment(directory)?;
                let child = partition.expand_by(directory, Some(binding))?;

                if self.query.eval_available(&child.columns) {
                    let tail = grammar.tail(&child)?;
                    children.push((tail, child));
                } else {
                    trace!(path = %child.path, "Pruned directory");
                    self.stats.record_pruned();
                }
            }

            let pending: Vec<BoxFuture<'s, Result<Vec<Partition>>>> = children
                .into_iter()
                .map(|(tail, child)| self.descend_owned(tail, child))
                .collect();
            let descendants: Vec<Vec<Partition>> = stream::iter(pending)
                .buffered(self.parallel_directories)
                .try_collect()
                .await?;

            let mut partitions: Vec<Partition> = descendants.into_iter().flatten().collect();
            if grammar.is_terminal_level() {
                partitions.extend(self.terminal(grammar, &partition, listing.files)?);
            }
            Ok(partitions)
        }
        .boxed()
    }

    /// Descend with a grammar owned by the returned future.
    fn descend_owned<'s>(
        &'s self,
        grammar: Box<dyn Grammar>,
        partition: Partition,
    ) -> BoxFuture<'s, Result<Vec<Partition>>> {
        async move { self.descend(grammar.as_ref(), partition).await }.boxed()
    }

    fn terminal(
        &self,
        grammar: &dyn Grammar,
        partition: &Partition,
        files: Vec<String>,
    ) -> Result<Vec<Partition>> {
        let mut accepted = Vec::new();

        if grammar.parses_filenames() {
            for file in files {
                let binding = grammar.parse_segment(&file)?;
                let leaf = partition.expand_by(&file, Some(binding))?;
                if self.query.eval_all(&leaf.columns) {
                    accepted.push(leaf);
                } else {
                    self.stats.record_rejected(1);
                }
            }
        } else if self.query.eval_all(&partition.columns) {
            for file in files {
                accepted.push(partition.expand_by(&file, None)?);
            }
        } else {
            trace!(path = %partition.path, files = files.len(), "Rejected terminal level");
            self.stats.record_rejected(files.len() as u64);
        }

        Ok(accepted)
    }
}

/// Discover the terminal partitions under `root` that satisfy `query`.
///
/// Any error aborts the whole run; no partial result is returned.
///
/// # Errors
///
/// Returns the first [`PvError`] raised by the grammar, by partition
/// expansion, or by the storage backend.
pub async fn discover_partitions(
    query: &dyn Query,
    grammar: &dyn Grammar,
    root: Partition,
    storage: &dyn Storage,
    config: &DiscoveryConfig,
) -> Result<Vec<Partition>> {
    let stats = DiscoveryStats::new();
    let mut partitions = Walk::new(query, storage, config, &stats)
        .descend(grammar, root)
        .await?;

    if config.max_partitions > 0 {
        partitions.truncate(config.max_partitions);
    }
    Ok(partitions)
}

/// Runs discovery against one storage backend, with logging and statistics.
///
/// # Example
///
/// ```ignore
/// use pv_discovery::{AutoGrammar, ConstantQuery, Discoverer, DiscoveryConfig, Partition};
/// use pv_discovery::storage::{StorageOptions, storage_from_url};
///
/// let (storage, root) = storage_from_url("s3://bucket/table", &StorageOptions::new())?;
/// let grammar = AutoGrammar::from_description("year/month", None)?;
///
/// let discoverer = Discoverer::new(storage, DiscoveryConfig::new());
/// let (partitions, stats) = discoverer
///     .discover(&ConstantQuery::TRUE, &grammar, Partition::root(root))
///     .await?;
/// eprintln!("{} partitions, {} listings", partitions.len(), stats.listing_calls);
/// ```
pub struct Discoverer {
    storage: Arc<dyn Storage>,
    config: DiscoveryConfig,
}

impl Discoverer {
    /// Create a new Discoverer.
    pub fn new(storage: Arc<dyn Storage>, config: DiscoveryConfig) -> Self {
        Self { storage, config }
    }

    /// Run discovery and return the partitions with run statistics.
    pub async fn discover(
        &self,
        query: &dyn Query,
        grammar: &dyn Grammar,
        root: Partition,
    ) -> Result<(Vec<Partition>, StatsSnapshot)> {
        let mut stats = DiscoveryStats::new();

        debug!(
            storage = %self.storage.description(),
            root = %root.path,
            grammar = %grammar.description(),
            query = %query.description(),
            "Starting discovery"
        );

        let mut partitions = Walk::new(query, self.storage.as_ref(), &self.config, &stats)
            .descend(grammar, root)
            .await?;

        if self.config.max_partitions > 0 && partitions.len() > self.config.max_partitions {
            debug!(max_partitions = self.config.max_partitions, "Reached max partitions limit");
            partitions.truncate(self.config.max_partitions);
        }

        stats.record_emitted(partitions.len() as u64);
        stats.complete();
        let snapshot = stats.snapshot();

        info!(
            partitions = snapshot.partitions_emitted,
            listing_calls = snapshot.listing_calls,
            generated_levels = snapshot.generated_levels,
            pruned = snapshot.directories_pruned,
            rejected = snapshot.files_rejected,
            "Discovery completed"
        );

        Ok((partitions, snapshot))
    }

    /// Run discovery and send every partition to `output`.
    ///
    /// Nothing is written if discovery fails.
    pub async fn discover_to<O: Output + ?Sized>(
        &self,
        query: &dyn Query,
        grammar: &dyn Grammar,
        root: Partition,
        output: &O,
    ) -> Result<StatsSnapshot> {
        let (partitions, stats) = self.discover(query, grammar, root).await?;

        for partition in &partitions {
            output.output(partition).await?;
        }
        output.flush().await?;

        Ok(stats)
    }
}
