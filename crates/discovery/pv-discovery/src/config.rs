//! Configuration types for a discovery run.

use serde::{Deserialize, Serialize};

/// Configuration for a discovery run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DiscoveryConfig {
    /// Maximum concurrent storage listing calls
    pub max_concurrent_lists: usize,

    /// Maximum sibling directories descended at once
    pub max_parallel_directories: usize,

    /// Maximum number of partitions to output (0 = unlimited)
    pub max_partitions: usize,
}

impl Default for DiscoveryConfig {
    fn default() -> Self {
        Self {
            max_concurrent_lists: 10,
            max_parallel_directories: 20,
            max_partitions: 0,
        }
    }
}

impl DiscoveryConfig {
    /// Create a new discovery configuration with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the maximum concurrent listing calls. Zero is treated as one.
    pub fn with_max_concurrent_lists(mut self, max: usize) -> Self {
        self.max_concurrent_lists = max.max(1);
        self
    }

    /// Set the maximum sibling directories descended at once. Zero is treated as one.
    pub fn with_max_parallel_directories(mut self, max: usize) -> Self {
        self.max_parallel_directories = max.max(1);
        self
    }

    /// Set the maximum number of partitions to output.
    pub fn with_max_partitions(mut self, max_partitions: usize) -> Self {
        self.max_partitions = max_partitions;
        self
    }
}
