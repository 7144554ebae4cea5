use std::result;

use tracing::{debug, trace};

use crate::expr::{Expr, Integer};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    #[error("integer overflow evaluating '{lhs} + {rhs}'")]
    Overflow { lhs: Integer, rhs: Integer },
}

pub type Result<T> = result::Result<T, Error>;

enum Step<'a> {
    Visit(&'a Expr),
    Add,
}

// Post-order walk: operands land on `values`, each `Add` folds the top two.
fn eval_expr(expr: &Expr) -> Result<Integer> {
    let mut steps = vec![Step::Visit(expr)];
    let mut values: Vec<Integer> = Vec::new();

    while let Some(step) = steps.pop() {
        match step {
            Step::Visit(Expr::Leaf(leaf)) => values.push(leaf.evaluate()),

            Step::Visit(Expr::Sum(sum)) => {
                steps.push(Step::Add);
                steps.push(Step::Visit(sum.rhs()));
                steps.push(Step::Visit(sum.lhs()));
            }

            Step::Add => {
                let (Some(rhs), Some(lhs)) = (values.pop(), values.pop()) else {
                    unreachable!()
                };
                trace!(lhs, rhs, "sum");
                values.push(lhs.checked_add(rhs).ok_or(Error::Overflow { lhs, rhs })?);
            }
        }
    }

    match values.pop() {
        Some(value) => Ok(value),
        None => unreachable!(),
    }
}

/// Evaluates `expr`, failing on the first addition that leaves `Integer`'s
/// range instead of wrapping like [`Expr::evaluate`].
pub fn evaluate(expr: &Expr) -> Result<Integer> {
    debug!(
        depth = expr.depth(),
        leaves = expr.leaves(),
        "evaluating expression"
    );
    eval_expr(expr)
}
