//! Year/month/day grammar generated from a date range.
//!
//! Instead of listing `year=.../month=.../day=...` trees, every level is
//! enumerated from the range and narrowed using the values already bound, so a
//! date-range discovery lists storage only at the leaf directories.

use chrono::{Datelike, NaiveDate};
use pv_error::{PvError, Result};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use std::sync::Arc;

use super::{Grammar, split_key_value, trim_segment};
use crate::partition::Partition;

/// Levels of a date-partitioned tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DateLevel {
    Year,
    Month,
    Day,
    Files,
}

impl DateLevel {
    fn next(self) -> Option<Self> {
        match self {
            Self::Year => Some(Self::Month),
            Self::Month => Some(Self::Day),
            Self::Day => Some(Self::Files),
            Self::Files => None,
        }
    }
}

/// Column names used for the three date levels.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateColumns {
    pub year: String,
    pub month: String,
    pub day: String,
}

impl Default for DateColumns {
    fn default() -> Self {
        Self::new("year", "month", "day")
    }
}

impl DateColumns {
    /// Create custom column names.
    pub fn new(year: impl Into<String>, month: impl Into<String>, day: impl Into<String>) -> Self {
        Self {
            year: year.into(),
            month: month.into(),
            day: day.into(),
        }
    }

    fn name(&self, level: DateLevel) -> Option<&str> {
        match level {
            DateLevel::Year => Some(&self.year),
            DateLevel::Month => Some(&self.month),
            DateLevel::Day => Some(&self.day),
            DateLevel::Files => None,
        }
    }
}

/// Number of days in the given month, or `None` for an invalid year/month.
pub fn days_in_month(year: i32, month: u32) -> Option<u32> {
    let first = NaiveDate::from_ymd_opt(year, month, 1)?;
    let next = if month == 12 {
        NaiveDate::from_ymd_opt(year + 1, 1, 1)?
    } else {
        NaiveDate::from_ymd_opt(year, month + 1, 1)?
    };
    u32::try_from(next.signed_duration_since(first).num_days()).ok()
}

/// Grammar enumerating year, month and day partitions within a date range.
///
/// `start` and `end` are inclusive here; [`DateRangeGrammar::build`] takes the
/// usual exclusive end.
#[derive(Debug, Clone)]
pub struct DateRangeGrammar {
    start: NaiveDate,
    end: NaiveDate,
    level: DateLevel,
    columns: Arc<DateColumns>,
    include_column_in_path: bool,
}

impl DateRangeGrammar {
    /// Create a grammar for the range `[start, end)`.
    ///
    /// With `include_column_in_path` segments look like `year=2022`, otherwise
    /// just `2022`. Values are not zero-padded.
    ///
    /// # Errors
    ///
    /// Returns [`PvError::InvalidRange`] if the range is empty.
    pub fn build(
        start: NaiveDate,
        end: NaiveDate,
        columns: DateColumns,
        include_column_in_path: bool,
    ) -> Result<Self> {
        if start >= end {
            return Err(PvError::InvalidRange(format!(
                "date range {start}..{end} is empty"
            )));
        }
        let last = end
            .pred_opt()
            .ok_or_else(|| PvError::InvalidRange(format!("date range end {end} underflows")))?;

        Ok(Self {
            start,
            end: last,
            level: DateLevel::Year,
            columns: Arc::new(columns),
            include_column_in_path,
        })
    }

    fn exhausted(&self, operation: &str) -> PvError {
        PvError::GrammarExhausted(format!(
            "{operation} called at the files level of a date range grammar"
        ))
    }

    fn bound_value<T: FromStr>(&self, partition: &Partition, level: DateLevel) -> Result<T> {
        let name = self.columns.name(level).ok_or_else(|| self.exhausted("tail"))?;
        let value = partition.column(name).ok_or_else(|| {
            PvError::malformed(&partition.path, format!("column '{name}' is not bound"))
        })?;
        value.parse().map_err(|_| {
            PvError::malformed(value, format!("column '{name}' is not a number"))
        })
    }

    fn next_level(&self, start: NaiveDate, end: NaiveDate) -> Result<Box<dyn Grammar>> {
        let level = self.level.next().ok_or_else(|| self.exhausted("tail"))?;
        Ok(Box::new(Self {
            start,
            end,
            level,
            columns: Arc::clone(&self.columns),
            include_column_in_path: self.include_column_in_path,
        }))
    }
}

fn ymd(year: i32, month: u32, day: u32, context: &str) -> Result<NaiveDate> {
    NaiveDate::from_ymd_opt(year, month, day)
        .ok_or_else(|| PvError::malformed(context, format!("{year}-{month}-{day} is not a date")))
}

impl Grammar for DateRangeGrammar {
    fn parse_segment(&self, segment: &str) -> Result<(String, String)> {
        let name = self
            .columns
            .name(self.level)
            .ok_or_else(|| self.exhausted("parse_segment"))?;

        if self.include_column_in_path {
            split_key_value(segment)
                .ok_or_else(|| PvError::malformed(segment, "expected name=value"))
        } else {
            Ok((name.to_string(), trim_segment(segment).to_string()))
        }
    }

    fn tail(&self, partition: &Partition) -> Result<Box<dyn Grammar>> {
        match self.level {
            DateLevel::Year => {
                let year: i32 = self.bound_value(partition, DateLevel::Year)?;
                let start = if year == self.start.year() {
                    self.start
                } else {
                    ymd(year, 1, 1, &partition.path)?
                };
                let end = if year == self.end.year() {
                    self.end
                } else {
                    ymd(year, 12, 31, &partition.path)?
                };
                self.next_level(start, end)
            }
            DateLevel::Month => {
                let year: i32 = self.bound_value(partition, DateLevel::Year)?;
                let month: u32 = self.bound_value(partition, DateLevel::Month)?;
                let start = if month == self.start.month() {
                    self.start
                } else {
                    ymd(year, month, 1, &partition.path)?
                };
                let end = if month == self.end.month() {
                    self.end
                } else {
                    let last_day = days_in_month(year, month).ok_or_else(|| {
                        PvError::malformed(&partition.path, format!("invalid month {month}"))
                    })?;
                    ymd(year, month, last_day, &partition.path)?
                };
                self.next_level(start, end)
            }
            DateLevel::Day => self.next_level(self.start, self.end),
            DateLevel::Files => Err(self.exhausted("tail")),
        }
    }

    fn generate(&self) -> Result<Option<Vec<String>>> {
        let values: Vec<String> = match self.level {
            DateLevel::Year => (self.start.year()..=self.end.year())
                .map(|year| year.to_string())
                .collect(),
            DateLevel::Month => (self.start.month()..=self.end.month())
                .map(|month| month.to_string())
                .collect(),
            DateLevel::Day => (self.start.day()..=self.end.day())
                .map(|day| day.to_string())
                .collect(),
            DateLevel::Files => return Ok(None),
        };

        let prefix = match self.columns.name(self.level) {
            Some(name) if self.include_column_in_path => format!("{name}="),
            _ => String::new(),
        };
        Ok(Some(
            values
                .into_iter()
                .map(|value| format!("{prefix}{value}"))
                .collect(),
        ))
    }

    fn is_terminal_level(&self) -> bool {
        self.level == DateLevel::Files
    }

    fn parses_filenames(&self) -> bool {
        false
    }

    fn description(&self) -> String {
        format!(
            "date_range({}..={}, level: {:?})",
            self.start, self.end, self.level
        )
    }
}
