//! Stdout output implementation for discovered partitions.

use async_trait::async_trait;
use pv_error::{PvError, Result};
use serde::{Deserialize, Serialize};
use std::io::Write;

use super::Output;
use crate::partition::Partition;

/// Output format for stdout.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// JSON Lines format - one JSON object per line (default)
    #[default]
    Jsonl,

    /// Pretty-printed JSON
    Json,
}

impl OutputFormat {
    /// Serialise one partition in this format.
    pub fn render(self, partition: &Partition) -> Result<String> {
        let rendered = match self {
            Self::Json => serde_json::to_string_pretty(partition),
            Self::Jsonl => serde_json::to_string(partition),
        };
        rendered.map_err(|e| PvError::Config(format!("JSON serialization failed: {e}")))
    }
}

/// Writes partitions to stdout.
///
/// JSONL puts one object per line, suitable for piping to tools like `jq` or
/// counting with `wc -l`.
pub struct StdoutOutput {
    format: OutputFormat,
}

impl StdoutOutput {
    /// Create a new StdoutOutput with the specified format.
    pub fn new(format: OutputFormat) -> Self {
        Self { format }
    }

    /// Create a new StdoutOutput with JSONL format (default).
    pub fn jsonl() -> Self {
        Self::new(OutputFormat::Jsonl)
    }

    /// Create a new StdoutOutput with pretty-printed JSON format.
    pub fn json() -> Self {
        Self::new(OutputFormat::Json)
    }
}

impl Default for StdoutOutput {
    fn default() -> Self {
        Self::jsonl()
    }
}

#[async_trait]
impl Output for StdoutOutput {
    async fn output(&self, partition: &Partition) -> Result<()> {
        let rendered = self.format.render(partition)?;
        println!("{rendered}");
        Ok(())
    }

    async fn flush(&self) -> Result<()> {
        std::io::stdout()
            .flush()
            .map_err(|e| PvError::Config(format!("Failed to flush stdout: {e}")))?;
        Ok(())
    }
}
