//! `name=value` grammar.

use pv_error::{PvError, Result};
use std::sync::Arc;

use super::description::{PartitionGrammar, parse_description};
use super::{Grammar, split_key_value, trim_segment};
use crate::partition::Partition;

/// Grammar for Hive-style `name=value` directory segments.
///
/// The column name is parsed from the segment itself, so the residual levels
/// only matter for enumeration and for deciding where descent stops. With no
/// levels at all every level is terminal: files are picked up at any depth,
/// and nothing guarantees that all partitions carry the same columns.
///
/// When a filename column is configured it is the last level, and leaf
/// segments without `=` bind that column.
#[derive(Debug, Clone)]
pub struct AutoGrammar {
    levels: Arc<[PartitionGrammar]>,
    position: usize,
    filename_column: Option<String>,
}

impl Default for AutoGrammar {
    fn default() -> Self {
        Self::unconstrained()
    }
}

impl AutoGrammar {
    /// Create a grammar from explicit levels.
    ///
    /// If `filename_column` is set, the last level must describe the filename.
    pub fn new(levels: Vec<PartitionGrammar>, filename_column: Option<String>) -> Self {
        Self {
            levels: levels.into(),
            position: 0,
            filename_column,
        }
    }

    /// A grammar with no levels: every segment is parsed, nothing is enumerated.
    pub fn unconstrained() -> Self {
        Self::new(Vec::new(), None)
    }

    /// Build from a description such as `col1=4/col2=[5,6]/colX`.
    ///
    /// `filename` is an optional token with the same syntax (e.g. `fname` or
    /// `fname=[a.csv,b.csv]`) naming the column bound from leaf filenames.
    pub fn from_description(description: &str, filename: Option<&str>) -> Result<Self> {
        let mut levels = parse_description(description)?;
        let filename_column = match filename {
            Some(token) => {
                let level: PartitionGrammar = token.parse()?;
                let name = level.name.clone();
                levels.push(level);
                Some(name)
            }
            None => None,
        };
        Ok(Self::new(levels, filename_column))
    }

    fn residual(&self) -> &[PartitionGrammar] {
        &self.levels[self.position..]
    }
}

impl Grammar for AutoGrammar {
    fn parse_segment(&self, segment: &str) -> Result<(String, String)> {
        if let Some(column) = &self.filename_column {
            if !segment.contains('=') {
                return Ok((column.clone(), trim_segment(segment).to_string()));
            }
        }
        split_key_value(segment).ok_or_else(|| PvError::malformed(segment, "expected name=value"))
    }

    fn tail(&self, _partition: &Partition) -> Result<Box<dyn Grammar>> {
        let mut next = self.clone();
        if !self.residual().is_empty() {
            next.position += 1;
        }
        Ok(Box::new(next))
    }

    fn generate(&self) -> Result<Option<Vec<String>>> {
        let Some(level) = self.residual().first() else {
            return Ok(None);
        };
        let Some(values) = &level.values else {
            return Ok(None);
        };

        let segments = if self.is_terminal_level() {
            values.clone()
        } else {
            values
                .iter()
                .map(|value| format!("{}={}", level.name, value))
                .collect()
        };
        Ok(Some(segments))
    }

    fn is_terminal_level(&self) -> bool {
        let remaining = self.residual().len();
        remaining == 0 || (self.parses_filenames() && remaining == 1)
    }

    fn parses_filenames(&self) -> bool {
        self.filename_column.is_some()
    }

    fn description(&self) -> String {
        let levels: Vec<String> = self.residual().iter().map(ToString::to_string).collect();
        match &self.filename_column {
            Some(column) => format!("auto({} | file: {})", levels.join("/"), column),
            None => format!("auto({})", levels.join("/")),
        }
    }
}
