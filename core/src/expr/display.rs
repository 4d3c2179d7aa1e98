use core::fmt::{self, Write};

use super::Expr;
use crate::{String, visitor::TreeTransformer};

/// Visitor that formats expression trees as s-expressions.
///
/// Variables print as `x{slot}`, assignments as `(set x{slot} value)`.
pub struct ExprFormatter {
    output: String,
}

impl ExprFormatter {
    pub fn new() -> Self {
        Self {
            output: String::new(),
        }
    }

    pub fn format(expr: &Expr) -> String {
        let mut formatter = Self::new();
        formatter.transform(expr);
        formatter.output
    }
}

impl Default for ExprFormatter {
    fn default() -> Self {
        Self::new()
    }
}

impl TreeTransformer<Expr> for ExprFormatter {
    type Output = ();

    fn transform(&mut self, tree: &Expr) {
        match tree {
            Expr::Literal(value) => {
                let _ = write!(self.output, "{}", value);
            }
            Expr::Variable(slot) => {
                let _ = write!(self.output, "x{}", slot);
            }
            Expr::Assign(slot, value) => {
                let _ = write!(self.output, "(set x{} ", slot);
                self.transform(value);
                self.output.push(')');
            }
            Expr::BinaryOp { op, left, right } => {
                let _ = write!(self.output, "({} ", op.symbol());
                self.transform(left);
                self.output.push(' ');
                self.transform(right);
                self.output.push(')');
            }
            Expr::Sequence(first, rest) => {
                self.output.push_str("(seq ");
                self.transform(first);
                self.output.push(' ');
                self.transform(rest);
                self.output.push(')');
            }
            Expr::While { cond, body } => {
                self.output.push_str("(while ");
                self.transform(cond);
                self.output.push(' ');
                self.transform(body);
                self.output.push(')');
            }
        }
    }
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&ExprFormatter::format(self))
    }
}
