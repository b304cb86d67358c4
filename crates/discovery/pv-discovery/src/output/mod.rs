//! Output implementations for discovered partitions.
//!
//! This module provides the [`Output`] trait and implementations for
//! delivering discovered partitions:
//! - [`StdoutOutput`] - Outputs to stdout in JSON or JSONL format
//! - [`CollectingOutput`] - Keeps partitions in memory

mod collecting;
mod stdout;

pub use collecting::CollectingOutput;
pub use stdout::{OutputFormat, StdoutOutput};

use async_trait::async_trait;
use pv_error::Result;

use crate::partition::Partition;

/// Trait for outputting discovered partitions.
#[async_trait]
pub trait Output: Send + Sync {
    /// Output a single discovered partition.
    async fn output(&self, partition: &Partition) -> Result<()>;

    /// Flush any buffered output.
    ///
    /// Called after all partitions have been output.
    async fn flush(&self) -> Result<()>;
}
