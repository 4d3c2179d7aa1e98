//! One-call entry points and their options.
//!
//! # Example
//!
//! ```
//! use stackloop_core::api::{self, ExecutionOptions};
//! use stackloop_core::expr::Expr;
//!
//! // x0 = x0 + x1, then read x0
//! let expr = Expr::seq(
//!     Expr::assign(0, Expr::add(Expr::var(0), Expr::var(1))),
//!     Expr::var(0),
//! );
//! let result = api::run(&expr, &[40, 2], &ExecutionOptions::default()).unwrap();
//! assert_eq!(result, 42);
//! ```

mod options;

pub use options::{EvaluatorOptions, ExecutionOptions};

use crate::{
    compiler,
    expr::Expr,
    vm::{ExecutionError, VM},
};

/// Compile `expr` and execute it once, starting with `slots` on the stack.
pub fn run(expr: &Expr, slots: &[i64], options: &ExecutionOptions) -> Result<i64, ExecutionError> {
    let program = compiler::compile(expr);
    VM::with_options(&program, options.clone())
        .with_initial_slots(slots)
        .run()
}
