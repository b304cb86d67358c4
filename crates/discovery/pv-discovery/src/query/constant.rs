//! Constant queries.

use super::Query;
use crate::partition::Columns;

/// A query that ignores the columns and always returns the same answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConstantQuery(pub bool);

impl ConstantQuery {
    /// Accepts everything.
    pub const TRUE: Self = Self(true);

    /// Rejects everything.
    pub const FALSE: Self = Self(false);
}

impl Query for ConstantQuery {
    fn eval_all(&self, _columns: &Columns) -> bool {
        self.0
    }

    fn eval_available(&self, _columns: &Columns) -> bool {
        self.0
    }

    fn description(&self) -> String {
        self.0.to_string()
    }
}
