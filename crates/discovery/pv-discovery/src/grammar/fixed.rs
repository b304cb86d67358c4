//! Positional grammar: segments carry values only.

use pv_error::{PvError, Result};
use std::sync::Arc;
use tracing::warn;

use super::description::{PartitionGrammar, parse_description};
use super::{Grammar, trim_segment};
use crate::partition::Partition;

/// Grammar for trees like `2022/10/data.csv`, where column names come from
/// the grammar rather than from the path.
///
/// The last level always names the filename column, so this grammar is
/// terminal once exactly one level remains.
#[derive(Debug, Clone)]
pub struct FixedGrammar {
    levels: Arc<[PartitionGrammar]>,
    position: usize,
}

impl FixedGrammar {
    /// Create a grammar whose last level describes the filename.
    pub fn new(levels: Vec<PartitionGrammar>) -> Self {
        Self {
            levels: levels.into(),
            position: 0,
        }
    }

    /// Build from a description such as `year/month=[1,2]` plus a filename
    /// token.
    ///
    /// Without a filename token, the last description level is taken as the
    /// filename column.
    pub fn from_description(description: &str, filename: Option<&str>) -> Result<Self> {
        let mut levels = parse_description(description)?;
        match filename {
            Some(token) => levels.push(token.parse()?),
            None => {
                warn!(
                    description,
                    "No filename column given, using the last level of the description"
                );
            }
        }
        if levels.is_empty() {
            return Err(PvError::Config(
                "Fixed grammar needs at least a filename column".to_string(),
            ));
        }
        Ok(Self::new(levels))
    }

    fn current(&self) -> Result<&PartitionGrammar> {
        self.levels.get(self.position).ok_or_else(|| {
            PvError::GrammarExhausted("no fixed grammar levels remaining".to_string())
        })
    }
}

impl Grammar for FixedGrammar {
    fn parse_segment(&self, segment: &str) -> Result<(String, String)> {
        let level = self.current()?;
        Ok((level.name.clone(), trim_segment(segment).to_string()))
    }

    fn tail(&self, _partition: &Partition) -> Result<Box<dyn Grammar>> {
        self.current()?;
        Ok(Box::new(Self {
            levels: Arc::clone(&self.levels),
            position: self.position + 1,
        }))
    }

    fn generate(&self) -> Result<Option<Vec<String>>> {
        Ok(self.current()?.values.clone())
    }

    fn is_terminal_level(&self) -> bool {
        self.levels.len().saturating_sub(self.position) == 1
    }

    fn parses_filenames(&self) -> bool {
        true
    }

    fn description(&self) -> String {
        let levels: Vec<String> = self.levels[self.position.min(self.levels.len())..]
            .iter()
            .map(ToString::to_string)
            .collect();
        format!("fixed({})", levels.join("/"))
    }
}
