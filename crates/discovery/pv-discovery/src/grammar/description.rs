//! Grammar description parsing.
//!
//! Parses descriptions like `col1/col2=v1/col3=[v4,v5,v6]` into one
//! [`PartitionGrammar`] per directory level.

use pv_error::{PvError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// One level of a grammar description.
///
/// `values` is `None` when any value is accepted and the level has to be
/// listed; otherwise it holds the enumerated values.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PartitionGrammar {
    pub name: String,
    pub values: Option<Vec<String>>,
}

impl PartitionGrammar {
    /// A level accepting any value.
    pub fn any(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            values: None,
        }
    }

    /// A level restricted to the given values.
    pub fn with_values<I, S>(name: impl Into<String>, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            name: name.into(),
            values: Some(values.into_iter().map(Into::into).collect()),
        }
    }
}

impl FromStr for PartitionGrammar {
    type Err = PvError;

    /// Parse a single token: `name`, `name=value` or `name=[v1,v2]`.
    fn from_str(token: &str) -> Result<Self> {
        let Some((name, value_text)) = token.split_once('=') else {
            if token.is_empty() {
                return Err(PvError::malformed(token, "empty grammar level"));
            }
            return Ok(Self::any(token));
        };

        if name.is_empty() {
            return Err(PvError::malformed(token, "empty column name"));
        }

        if let Some(list) = value_text.strip_prefix('[') {
            let inner = list
                .strip_suffix(']')
                .ok_or_else(|| PvError::malformed(token, "unclosed value list"))?;
            if inner.is_empty() {
                return Err(PvError::malformed(token, "empty value list"));
            }
            return Ok(Self::with_values(name, inner.split(',')));
        }

        if value_text.is_empty() {
            return Err(PvError::malformed(token, "empty value"));
        }

        Ok(Self::with_values(name, [value_text]))
    }
}

impl fmt::Display for PartitionGrammar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.values {
            None => write!(f, "{}", self.name),
            Some(values) if values.len() == 1 => write!(f, "{}={}", self.name, values[0]),
            Some(values) => write!(f, "{}=[{}]", self.name, values.join(",")),
        }
    }
}

/// Parse a `/`-separated grammar description.
///
/// Leading and trailing separators are ignored; an empty description yields
/// no levels.
pub fn parse_description(description: &str) -> Result<Vec<PartitionGrammar>> {
    let trimmed = description.trim_matches('/');
    if trimmed.is_empty() {
        return Ok(Vec::new());
    }
    trimmed.split('/').map(PartitionGrammar::from_str).collect()
}
