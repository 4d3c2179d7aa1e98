//! Tree-walking reference evaluator.
//!
//! The evaluator interprets expression trees directly, keeping variables in an
//! explicit slot environment instead of an operand stack. It is the oracle the
//! compiled pipeline is checked against and is not meant to be fast.
//!
//! ## Semantics
//!
//! - `Literal`, `Variable` and `BinaryOp` yield a value; `Assign` and `While`
//!   yield none.
//! - `Sequence` yields what its second part yields. A value left by its first
//!   part is appended to the environment as the next slot, the same way the
//!   VM keeps it on the stack.
//! - A value a `While` body leaves behind is appended on every iteration.
//! - `Assign` to the slot just past the environment appends it, as `Set` does
//!   on the machine.
//!
//! On trees whose operands are plain value expressions this matches
//! `VM::run(compile(expr))` exactly.
//!
//! ## Example
//!
//! ```
//! use stackloop_core::{evaluator, expr::Expr};
//!
//! let expr = Expr::seq(Expr::assign(0, Expr::lit(5)), Expr::var(0));
//! assert_eq!(evaluator::eval(&expr, &[0]), Ok(Some(5)));
//! ```

mod error;
mod eval;

#[cfg(test)]
mod eval_test;

pub use error::{EvalError, ResourceExceededError, RuntimeError};
pub use eval::Evaluator;

use crate::{api::EvaluatorOptions, expr::Expr};

/// Evaluate a tree with default limits, starting from `slots`.
///
/// Uses default stack depth limit of 1000.
pub fn eval(expr: &Expr, slots: &[i64]) -> Result<Option<i64>, EvalError> {
    eval_with_limits(expr, slots, EvaluatorOptions::default().max_depth)
}

/// Evaluate a tree with a custom depth limit.
pub fn eval_with_limits(
    expr: &Expr,
    slots: &[i64],
    max_depth: usize,
) -> Result<Option<i64>, EvalError> {
    Evaluator::new(EvaluatorOptions { max_depth }, slots).eval(expr)
}
