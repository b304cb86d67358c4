//! Date range queries over year/month/day columns.

use chrono::NaiveDate;
use std::str::FromStr;
use tracing::trace;

use super::Query;
use crate::grammar::{DateColumns, days_in_month};
use crate::partition::Columns;

/// Selects year/month/day partitions whose date lies in `[start, end)`.
///
/// Use this instead of [`DateRangeGrammar`](crate::grammar::DateRangeGrammar)
/// when the date columns are mixed with other partition columns or the
/// condition has to be combined with other queries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DateRangeQuery {
    start: NaiveDate,
    end: NaiveDate,
    columns: DateColumns,
}

impl DateRangeQuery {
    /// Create a query for `[start, end)` over the given column names.
    pub fn new(start: NaiveDate, end: NaiveDate, columns: DateColumns) -> Self {
        Self {
            start,
            end,
            columns,
        }
    }

    fn int<T: FromStr>(columns: &Columns, name: &str) -> Option<Option<T>> {
        columns.get(name).map(|value| value.parse().ok())
    }

    /// Leftmost and rightmost dates reachable from the bound columns.
    ///
    /// Outer `None` means year is unbound; inner `None` means the bound values
    /// do not form a date.
    fn reachable(&self, columns: &Columns) -> Option<Option<(NaiveDate, NaiveDate)>> {
        let year = Self::int(columns, &self.columns.year)?;
        Some(year.and_then(|year| self.bounds(year, columns)))
    }

    fn bounds(&self, year: i32, columns: &Columns) -> Option<(NaiveDate, NaiveDate)> {
        let (month_l, month_r) = match Self::int(columns, &self.columns.month) {
            Some(month) => (month?, month?),
            None => (1, 12),
        };
        let (day_l, day_r) = match Self::int(columns, &self.columns.day) {
            Some(day) => (day?, day?),
            None => (1, days_in_month(year, month_r)?),
        };
        Some((
            NaiveDate::from_ymd_opt(year, month_l, day_l)?,
            NaiveDate::from_ymd_opt(year, month_r, day_r)?,
        ))
    }
}

impl Query for DateRangeQuery {
    fn eval_all(&self, columns: &Columns) -> bool {
        let bound = [&self.columns.year, &self.columns.month, &self.columns.day]
            .into_iter()
            .all(|name| columns.contains_key(name));

        let result = bound
            && match self.reachable(columns) {
                Some(Some((date, _))) => self.start <= date && date < self.end,
                _ => false,
            };
        trace!(?columns, result, "date range eval_all");
        result
    }

    fn eval_available(&self, columns: &Columns) -> bool {
        let result = match self.reachable(columns) {
            None => true,
            Some(None) => false,
            Some(Some((left, right))) => left < self.end && right >= self.start,
        };
        trace!(?columns, result, "date range eval_available");
        result
    }

    fn description(&self) -> String {
        format!(
            "date_range({}..{} over {}/{}/{})",
            self.start, self.end, self.columns.year, self.columns.month, self.columns.day
        )
    }
}
