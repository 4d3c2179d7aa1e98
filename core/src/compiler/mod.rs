//! Bytecode compiler for loop-language expression trees.
//!
//! This module provides a bytecode compiler that transforms expression trees
//! into VM instructions. The compiler uses the visitor pattern to traverse the
//! tree and emit bytecode.
//!
//! ## Design
//!
//! - Uses TreeTransformer pattern as the entry point
//! - Explicit work-lists instead of recursion, so deep trees are fine
//! - A measuring pass records loop body lengths, then one pass emits into a
//!   single buffer; loop exits are computed, never patched
//! - Compilation cannot fail: slot numbers are only checked by the VM
//!
//! ## Example
//!
//! ```
//! use stackloop_core::{compiler, expr::Expr, vm::VM};
//!
//! let program = compiler::compile(&Expr::add(Expr::lit(3), Expr::lit(4)));
//! assert_eq!(program.to_string(), "Push 3\nPush 4\nBin Add\nEnd\n");
//! assert_eq!(VM::execute(&program), Ok(7));
//! ```

mod bytecode;


pub use bytecode::BytecodeCompiler;

use crate::{expr::Expr, vm::Program};

/// Compile `expr` into a complete program ending in `End`.
pub fn compile(expr: &Expr) -> Program {
    BytecodeCompiler::compile(expr)
}

/// Net stack depth change of the code generated for `expr`, assuming
/// straight-line execution (jumps not taken, loop bodies run once).
///
/// Value-producing nodes (`Literal`, `Variable`, `BinaryOp`) add one,
/// `Assign` adds nothing beyond its operand's excess, and `Sequence` adds both
/// sides. A `While` adds whatever its condition leaves beyond the consumed
/// test value plus whatever its body leaves.
pub fn stack_delta(expr: &Expr) -> isize {
    expr.nodes()
        .map(|node| match node {
            Expr::Literal(_) | Expr::Variable(_) => 1,
            // Consumes the value, the condition or one operand
            Expr::Assign(..) | Expr::BinaryOp { .. } | Expr::While { .. } => -1,
            Expr::Sequence(..) => 0,
        })
        .sum()
}
