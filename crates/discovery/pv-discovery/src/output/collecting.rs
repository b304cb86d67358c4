//! In-memory output.

use async_trait::async_trait;
use parking_lot::Mutex;
use pv_error::Result;

use super::Output;
use crate::partition::Partition;

/// Collects partitions in memory, in output order.
#[derive(Debug, Default)]
pub struct CollectingOutput {
    partitions: Mutex<Vec<Partition>>,
}

impl CollectingOutput {
    pub fn new() -> Self {
        Self::default()
    }

    /// Take the partitions collected so far.
    pub fn take(&self) -> Vec<Partition> {
        std::mem::take(&mut *self.partitions.lock())
    }

    pub fn len(&self) -> usize {
        self.partitions.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.partitions.lock().is_empty()
    }
}

#[async_trait]
impl Output for CollectingOutput {
    async fn output(&self, partition: &Partition) -> Result<()> {
        self.partitions.lock().push(partition.clone());
        Ok(())
    }

    async fn flush(&self) -> Result<()> {
        Ok(())
    }
}
