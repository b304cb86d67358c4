//! Predicates over partition columns.
//!
//! Every query evaluates in two modes:
//!
//! - [`Query::eval_all`] decides a terminal partition whose columns are all
//!   known.
//! - [`Query::eval_available`] is called while discovery is still descending
//!   and only some columns are bound. It must over-approximate: whenever
//!   `eval_all` could be true for some completion of the unbound columns,
//!   `eval_available` returns true. Discovery prunes a subtree only when it
//!   returns false.
//!
//! Keep atomic predicates narrow (few required columns) so they can decide
//! early and prune more.
//!
//! # Example
//!
//! ```
//! use pv_discovery::query::{MembershipQuery, Query, and};
//! use pv_discovery::partition::Columns;
//!
//! let query = and(MembershipQuery::eq("col1", "4"), MembershipQuery::new("col2", ["5", "6"]));
//!
//! let mut columns = Columns::new();
//! columns.insert("col1".to_string(), "4".to_string());
//! assert!(query.eval_available(&columns));
//! assert!(!query.eval_all(&columns));
//! ```

mod atomic;
mod boolean;
mod constant;
mod date_range;
mod range;

pub use atomic::{AtomicQuery, MembershipQuery};
pub use boolean::{BooleanOp, BooleanQuery, and, or};
pub use constant::ConstantQuery;
pub use date_range::DateRangeQuery;
pub use range::{ColumnComparator, ColumnRange, RangeQuery};

use std::fmt::Debug;

use crate::partition::Columns;

/// Trait for partition predicates.
pub trait Query: Send + Sync + Debug {
    /// Final decision for a partition whose columns are all bound.
    fn eval_all(&self, columns: &Columns) -> bool;

    /// Pruning-safe decision for a partially bound partition.
    fn eval_available(&self, columns: &Columns) -> bool;

    /// Get a description of this query for logs.
    fn description(&self) -> String;
}

impl<Q: Query + ?Sized> Query for Box<Q> {
    fn eval_all(&self, columns: &Columns) -> bool {
        (**self).eval_all(columns)
    }

    fn eval_available(&self, columns: &Columns) -> bool {
        (**self).eval_available(columns)
    }

    fn description(&self) -> String {
        (**self).description()
    }
}

/// Assert that `eval_available` keeps every prefix of every accepted
/// assignment drawn from `domain`.
///
/// Each accepted full assignment is restricted to every subset of its
/// columns, so orders other than the grammar's are covered too.
#[cfg(test)]
pub(crate) fn assert_available_covers_all(query: &dyn Query, domain: &[(&str, &[&str])]) {
    let mut assignments = vec![Columns::new()];
    for (name, values) in domain {
        let mut next = Vec::with_capacity(assignments.len() * values.len());
        for partial in &assignments {
            for value in values.iter() {
                let mut columns = partial.clone();
                columns.insert(name.to_string(), value.to_string());
                next.push(columns);
            }
        }
        assignments = next;
    }

    let mut accepted = 0;
    for full in assignments.iter().filter(|full| query.eval_all(full)) {
        accepted += 1;
        for mask in 0..(1u32 << domain.len()) {
            let partial: Columns = domain
                .iter()
                .enumerate()
                .filter(|(i, _)| mask & (1u32 << *i) != 0)
                .map(|(_, (name, _))| (name.to_string(), full[*name].clone()))
                .collect();
            assert!(
                query.eval_available(&partial),
                "{} pruned {partial:?} but accepts {full:?}",
                query.description()
            );
        }
    }
    assert!(accepted > 0, "{} accepts nothing in the domain", query.description());
}
