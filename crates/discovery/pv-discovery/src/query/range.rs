//! Composite-key range queries.

use pv_error::{PvError, Result};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

use super::Query;
use crate::partition::Columns;

/// How values of one column compare.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColumnComparator {
    /// Plain string ordering (the default)
    #[default]
    Lexicographic,

    /// Integer ordering, so `9 < 10`
    Numeric,

    /// Any value matches and comparison moves on to the next column
    Wildcard,
}

impl ColumnComparator {
    /// Compare two values. Returns `None` when a numeric value is not an integer.
    pub fn compare(self, a: &str, b: &str) -> Option<Ordering> {
        match self {
            Self::Wildcard => Some(Ordering::Equal),
            Self::Lexicographic => Some(a.cmp(b)),
            Self::Numeric => {
                let a: i64 = a.parse().ok()?;
                let b: i64 = b.parse().ok()?;
                Some(a.cmp(&b))
            }
        }
    }
}

/// Bounds for one column of a [`RangeQuery`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnRange {
    pub name: String,
    pub min: String,
    pub max: String,
    pub comparator: ColumnComparator,
}

impl ColumnRange {
    /// Create a column range.
    ///
    /// # Errors
    ///
    /// Returns [`PvError::InvalidRange`] if `min > max` under the comparator,
    /// or if a numeric bound is not an integer.
    pub fn new(
        name: impl Into<String>,
        min: impl Into<String>,
        max: impl Into<String>,
        comparator: ColumnComparator,
    ) -> Result<Self> {
        let range = Self {
            name: name.into(),
            min: min.into(),
            max: max.into(),
            comparator,
        };

        match comparator.compare(&range.min, &range.max) {
            Some(Ordering::Greater) => Err(PvError::InvalidRange(format!(
                "{}: {} > {}",
                range.name, range.min, range.max
            ))),
            Some(_) => Ok(range),
            None => Err(PvError::InvalidRange(format!(
                "{}: bounds {}..{} are not integers",
                range.name, range.min, range.max
            ))),
        }
    }

    /// Lexicographic range.
    pub fn lexicographic(
        name: impl Into<String>,
        min: impl Into<String>,
        max: impl Into<String>,
    ) -> Result<Self> {
        Self::new(name, min, max, ColumnComparator::Lexicographic)
    }

    /// Numeric range.
    pub fn numeric(
        name: impl Into<String>,
        min: impl Into<String>,
        max: impl Into<String>,
    ) -> Result<Self> {
        Self::new(name, min, max, ColumnComparator::Numeric)
    }

    /// A column that matches any value.
    pub fn wildcard(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            min: String::new(),
            max: String::new(),
            comparator: ColumnComparator::Wildcard,
        }
    }
}

/// Selects partitions whose column tuple lies in `[min_tuple, max_tuple)`.
///
/// Comparison is lexicographic over the ranges in order: once a column is
/// strictly inside its bounds the later columns no longer matter, and a column
/// equal to a bound keeps the comparison going. So with `c1 in [b, d)` and
/// `c2 in [c, d)`, `(c1=c, c2=z)` is accepted while `(c1=b, c2=a)` is not.
///
/// The interval is half-open so that `[p1, p2)` and `[p2, p3)` partition
/// `[p1, p3)`. Wildcard ranges are skipped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RangeQuery {
    ranges: Vec<ColumnRange>,
}

impl RangeQuery {
    /// Create a range query from ordered column ranges.
    pub fn new(ranges: Vec<ColumnRange>) -> Self {
        Self { ranges }
    }

    fn evaluate(&self, columns: &Columns, on_unbound: bool) -> bool {
        // The compared prefix still equals the lower/upper bound prefix.
        let mut at_minimum = true;
        let mut at_maximum = true;
        let mut compared = false;

        for range in &self.ranges {
            if range.comparator == ColumnComparator::Wildcard {
                continue;
            }
            let Some(value) = columns.get(&range.name) else {
                return on_unbound;
            };
            let (Some(lower), Some(upper)) = (
                range.comparator.compare(value, &range.min),
                range.comparator.compare(value, &range.max),
            ) else {
                return false;
            };
            compared = true;

            if at_minimum {
                match lower {
                    Ordering::Less => return false,
                    Ordering::Greater => at_minimum = false,
                    Ordering::Equal => {}
                }
            }
            if at_maximum {
                match upper {
                    Ordering::Greater => return false,
                    Ordering::Less => at_maximum = false,
                    Ordering::Equal => {}
                }
            }
            if !at_minimum && !at_maximum {
                return true;
            }
        }

        !compared || !at_maximum
    }
}

impl Query for RangeQuery {
    fn eval_all(&self, columns: &Columns) -> bool {
        self.evaluate(columns, false)
    }

    fn eval_available(&self, columns: &Columns) -> bool {
        self.evaluate(columns, true)
    }

    fn description(&self) -> String {
        let ranges: Vec<String> = self
            .ranges
            .iter()
            .map(|r| match r.comparator {
                ColumnComparator::Wildcard => format!("{}=*", r.name),
                _ => format!("{}=[{}, {})", r.name, r.min, r.max),
            })
            .collect();
        format!("range({})", ranges.join(", "))
    }
}
