//! Statistics for discovery runs.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};

/// Statistics collected during a discovery run.
///
/// Counters are atomic so that concurrently descending siblings can update
/// them through a shared reference.
#[derive(Debug, Default)]
pub struct DiscoveryStats {
    /// When discovery started
    started_at: Option<DateTime<Utc>>,

    /// When discovery completed
    completed_at: Option<DateTime<Utc>>,

    /// Storage listing calls issued
    listing_calls: AtomicU64,

    /// Levels whose entries were generated instead of listed
    generated_levels: AtomicU64,

    /// Directories pruned by `eval_available`
    directories_pruned: AtomicU64,

    /// Leaf files rejected by `eval_all`
    files_rejected: AtomicU64,

    /// Partitions emitted
    partitions_emitted: AtomicU64,
}

impl DiscoveryStats {
    /// Create a new stats tracker with the current time as start time.
    pub fn new() -> Self {
        Self {
            started_at: Some(Utc::now()),
            ..Default::default()
        }
    }

    /// Mark discovery as complete with the current time.
    pub fn complete(&mut self) {
        self.completed_at = Some(Utc::now());
    }

    pub fn record_listing(&self) {
        self.listing_calls.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_generated(&self) {
        self.generated_levels.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_pruned(&self) {
        self.directories_pruned.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_rejected(&self, count: u64) {
        self.files_rejected.fetch_add(count, Ordering::Relaxed);
    }

    pub fn record_emitted(&self, count: u64) {
        self.partitions_emitted.fetch_add(count, Ordering::Relaxed);
    }

    pub fn listing_calls(&self) -> u64 {
        self.listing_calls.load(Ordering::Relaxed)
    }

    pub fn partitions_emitted(&self) -> u64 {
        self.partitions_emitted.load(Ordering::Relaxed)
    }

    /// Get the duration of the discovery run.
    pub fn duration(&self) -> Option<Duration> {
        match (self.started_at, self.completed_at) {
            (Some(start), Some(end)) => Some(end - start),
            _ => None,
        }
    }

    /// Take a serialisable snapshot of the current counters.
    pub fn snapshot(&self) -> StatsSnapshot {
        StatsSnapshot {
            started_at: self.started_at,
            completed_at: self.completed_at,
            listing_calls: self.listing_calls.load(Ordering::Relaxed),
            generated_levels: self.generated_levels.load(Ordering::Relaxed),
            directories_pruned: self.directories_pruned.load(Ordering::Relaxed),
            files_rejected: self.files_rejected.load(Ordering::Relaxed),
            partitions_emitted: self.partitions_emitted.load(Ordering::Relaxed),
            duration_ms: self.duration().map(|d| d.num_milliseconds()),
        }
    }
}

/// Point-in-time copy of [`DiscoveryStats`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatsSnapshot {
    pub started_at: Option<DateTime<Utc>>,
    pub completed_at: Option<DateTime<Utc>>,
    pub listing_calls: u64,
    pub generated_levels: u64,
    pub directories_pruned: u64,
    pub files_rejected: u64,
    pub partitions_emitted: u64,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration_ms: Option<i64>,
}
