//! Boolean combination of queries.

use super::Query;
use crate::partition::Columns;

/// Boolean operator of a [`BooleanQuery`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BooleanOp {
    And,
    Or,
}

impl BooleanOp {
    fn apply(self, left: bool, right: bool) -> bool {
        match self {
            Self::And => left && right,
            Self::Or => left || right,
        }
    }
}

/// Pointwise combination of two queries, in the same evaluation mode.
///
/// There is deliberately no negation: negating an over-approximation does not
/// yield one.
#[derive(Debug)]
pub struct BooleanQuery {
    left: Box<dyn Query>,
    right: Box<dyn Query>,
    op: BooleanOp,
}

impl BooleanQuery {
    /// Combine two boxed queries.
    pub fn new(left: Box<dyn Query>, right: Box<dyn Query>, op: BooleanOp) -> Self {
        Self { left, right, op }
    }
}

/// Both queries must accept.
pub fn and(left: impl Query + 'static, right: impl Query + 'static) -> BooleanQuery {
    BooleanQuery::new(Box::new(left), Box::new(right), BooleanOp::And)
}

/// Either query must accept.
pub fn or(left: impl Query + 'static, right: impl Query + 'static) -> BooleanQuery {
    BooleanQuery::new(Box::new(left), Box::new(right), BooleanOp::Or)
}

impl Query for BooleanQuery {
    fn eval_all(&self, columns: &Columns) -> bool {
        self.op
            .apply(self.left.eval_all(columns), self.right.eval_all(columns))
    }

    fn eval_available(&self, columns: &Columns) -> bool {
        self.op.apply(
            self.left.eval_available(columns),
            self.right.eval_available(columns),
        )
    }

    fn description(&self) -> String {
        let op = match self.op {
            BooleanOp::And => "AND",
            BooleanOp::Or => "OR",
        };
        format!(
            "({} {} {})",
            self.left.description(),
            op,
            self.right.description()
        )
    }
}
