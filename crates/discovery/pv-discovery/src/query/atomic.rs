//! Atomic predicates over a fixed set of columns.

use std::collections::BTreeSet;
use std::fmt;
use std::sync::Arc;

use super::Query;
use crate::partition::Columns;

type Predicate = Arc<dyn Fn(&Columns) -> bool + Send + Sync>;

/// A predicate over a declared set of required columns.
///
/// The predicate only runs once every required column is bound, and it only
/// sees those columns. Until then `eval_available` keeps the partition and
/// `eval_all` rejects it.
///
/// # Example
///
/// ```
/// use pv_discovery::query::{AtomicQuery, Query};
/// use pv_discovery::partition::Columns;
///
/// let query = AtomicQuery::new(["fname"], |columns| {
///     columns["fname"].starts_with("a1")
/// });
///
/// assert!(query.eval_available(&Columns::new()));
/// assert!(!query.eval_all(&Columns::new()));
/// ```
#[derive(Clone)]
pub struct AtomicQuery {
    columns: BTreeSet<String>,
    predicate: Predicate,
}

impl AtomicQuery {
    /// Create an atomic query over `columns`.
    pub fn new<I, S, F>(columns: I, predicate: F) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
        F: Fn(&Columns) -> bool + Send + Sync + 'static,
    {
        Self {
            columns: columns.into_iter().map(Into::into).collect(),
            predicate: Arc::new(predicate),
        }
    }

    /// Run the predicate if all required columns are bound.
    fn evaluate(&self, columns: &Columns) -> Option<bool> {
        let mut bound = Columns::new();
        for name in &self.columns {
            let value = columns.get(name)?;
            bound.insert(name.clone(), value.clone());
        }
        Some((self.predicate)(&bound))
    }
}

impl Query for AtomicQuery {
    fn eval_all(&self, columns: &Columns) -> bool {
        self.evaluate(columns).unwrap_or(false)
    }

    fn eval_available(&self, columns: &Columns) -> bool {
        self.evaluate(columns).unwrap_or(true)
    }

    fn description(&self) -> String {
        let names: Vec<&str> = self.columns.iter().map(String::as_str).collect();
        format!("atomic({})", names.join(", "))
    }
}

// Implement Debug manually since the predicate closure doesn't implement Debug
impl fmt::Debug for AtomicQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AtomicQuery")
            .field("columns", &self.columns)
            .finish_non_exhaustive()
    }
}

/// Accepts partitions whose `column` takes one of the given values.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MembershipQuery {
    column: String,
    values: BTreeSet<String>,
}

impl MembershipQuery {
    /// Create a membership query.
    pub fn new<I, S>(column: impl Into<String>, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            column: column.into(),
            values: values.into_iter().map(Into::into).collect(),
        }
    }

    /// Equality with a single value.
    pub fn eq(column: impl Into<String>, value: impl Into<String>) -> Self {
        Self::new(column, [value.into()])
    }

    fn evaluate(&self, columns: &Columns) -> Option<bool> {
        columns
            .get(&self.column)
            .map(|value| self.values.contains(value))
    }
}

impl Query for MembershipQuery {
    fn eval_all(&self, columns: &Columns) -> bool {
        self.evaluate(columns).unwrap_or(false)
    }

    fn eval_available(&self, columns: &Columns) -> bool {
        self.evaluate(columns).unwrap_or(true)
    }

    fn description(&self) -> String {
        let values: Vec<&str> = self.values.iter().map(String::as_str).collect();
        format!("{} in [{}]", self.column, values.join(","))
    }
}
