//! Expression trees for the loop language.
//!
//! Trees are produced by an external front end and only ever read here. They
//! are plain owned values: finite, acyclic, with loops expressed through
//! [`Expr::While`] rather than through sharing.
//!
//! ## Example
//!
//! ```
//! use stackloop_core::expr::Expr;
//!
//! // while 0 != x1 { x1 = -1 + x1 }
//! let countdown = Expr::while_loop(
//!     Expr::not_eq(Expr::lit(0), Expr::var(1)),
//!     Expr::assign(1, Expr::add(Expr::lit(-1), Expr::var(1))),
//! );
//! assert_eq!(
//!     countdown.to_string(),
//!     "(while (!= 0 x1) (set x1 (+ -1 x1)))"
//! );
//! ```

mod display;

use serde::{Deserialize, Serialize};

use core::mem;

use crate::{Box, Vec, vec};

pub use display::ExprFormatter;

/// Index of a variable slot, counted from the bottom of the operand stack.
pub type Slot = usize;

/// Binary operators understood by both the compiler and the machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BinaryOp {
    Add,
    Sub,
    /// Yields `1` when the operands differ and `0` otherwise.
    NotEq,
}

impl BinaryOp {
    /// Apply the operator to `a` (left) and `b` (right).
    ///
    /// Arithmetic wraps on overflow, so evaluation never panics.
    #[inline]
    pub const fn apply(self, a: i64, b: i64) -> i64 {
        match self {
            BinaryOp::Add => a.wrapping_add(b),
            BinaryOp::Sub => a.wrapping_sub(b),
            BinaryOp::NotEq => (a != b) as i64,
        }
    }

    /// Operator symbol used in s-expression output.
    pub const fn symbol(self) -> &'static str {
        match self {
            BinaryOp::Add => "+",
            BinaryOp::Sub => "-",
            BinaryOp::NotEq => "!=",
        }
    }

    /// Mnemonic used in instruction listings (`Bin Add`).
    pub const fn mnemonic(self) -> &'static str {
        match self {
            BinaryOp::Add => "Add",
            BinaryOp::Sub => "Sub",
            BinaryOp::NotEq => "NotEq",
        }
    }

    pub(crate) fn from_mnemonic(s: &str) -> Option<Self> {
        match s {
            "Add" => Some(BinaryOp::Add),
            "Sub" => Some(BinaryOp::Sub),
            "NotEq" => Some(BinaryOp::NotEq),
            _ => None,
        }
    }
}

/// A node of the expression tree.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Expr {
    Literal(i64),
    Variable(Slot),
    Assign(Slot, Box<Expr>),
    BinaryOp {
        op: BinaryOp,
        left: Box<Expr>,
        right: Box<Expr>,
    },
    /// `first` runs for its effect; any value it produces stays on the stack.
    Sequence(Box<Expr>, Box<Expr>),
    While {
        cond: Box<Expr>,
        body: Box<Expr>,
    },
}

impl Expr {
    pub fn lit(value: i64) -> Self {
        Expr::Literal(value)
    }

    pub fn var(slot: Slot) -> Self {
        Expr::Variable(slot)
    }

    pub fn assign(slot: Slot, value: Expr) -> Self {
        Expr::Assign(slot, Box::new(value))
    }

    pub fn binary(op: BinaryOp, left: Expr, right: Expr) -> Self {
        Expr::BinaryOp {
            op,
            left: Box::new(left),
            right: Box::new(right),
        }
    }

    pub fn add(left: Expr, right: Expr) -> Self {
        Self::binary(BinaryOp::Add, left, right)
    }

    pub fn sub(left: Expr, right: Expr) -> Self {
        Self::binary(BinaryOp::Sub, left, right)
    }

    pub fn not_eq(left: Expr, right: Expr) -> Self {
        Self::binary(BinaryOp::NotEq, left, right)
    }

    pub fn seq(first: Expr, rest: Expr) -> Self {
        Expr::Sequence(Box::new(first), Box::new(rest))
    }

    pub fn while_loop(cond: Expr, body: Expr) -> Self {
        Expr::While {
            cond: Box::new(cond),
            body: Box::new(body),
        }
    }

    /// Chain statements into nested [`Expr::Sequence`] nodes, right-associated.
    ///
    /// A single statement is returned unchanged. Returns `None` for an empty
    /// list, since the language has no empty statement.
    ///
    /// ```
    /// use stackloop_core::expr::Expr;
    ///
    /// let block = Expr::block([Expr::lit(1), Expr::lit(2), Expr::var(0)]).unwrap();
    /// assert_eq!(
    ///     block,
    ///     Expr::seq(Expr::lit(1), Expr::seq(Expr::lit(2), Expr::var(0)))
    /// );
    /// ```
    pub fn block(statements: impl IntoIterator<Item = Expr>) -> Option<Self> {
        let statements: Vec<Expr> = statements.into_iter().collect();
        statements
            .into_iter()
            .rev()
            .reduce(|rest, first| Expr::seq(first, rest))
    }

    /// Direct children, in evaluation order.
    pub fn children(&self) -> impl DoubleEndedIterator<Item = &Expr> {
        let (first, second): (Option<&Expr>, Option<&Expr>) = match self {
            Expr::Literal(_) | Expr::Variable(_) => (None, None),
            Expr::Assign(_, value) => (Some(&**value), None),
            Expr::BinaryOp { left, right, .. } => (Some(&**left), Some(&**right)),
            Expr::Sequence(first, rest) => (Some(&**first), Some(&**rest)),
            Expr::While { cond, body } => (Some(&**cond), Some(&**body)),
        };
        [first, second].into_iter().flatten()
    }

    /// Every node of the tree in pre-order, without recursion.
    pub fn nodes(&self) -> Nodes<'_> {
        Nodes {
            pending: vec![self],
        }
    }

    /// Number of nodes in the tree.
    pub fn size(&self) -> usize {
        self.nodes().count()
    }

    /// Move the children out, leaving leaves in their place.
    fn take_children(&mut self, out: &mut Vec<Expr>) {
        let leaf = || Expr::Literal(0);
        match self {
            Expr::Literal(_) | Expr::Variable(_) => {}
            Expr::Assign(_, value) => out.push(mem::replace(&mut **value, leaf())),
            Expr::BinaryOp { left, right, .. }
            | Expr::Sequence(left, right)
            | Expr::While {
                cond: left,
                body: right,
            } => {
                out.push(mem::replace(&mut **left, leaf()));
                out.push(mem::replace(&mut **right, leaf()));
            }
        }
    }
}

/// Long statement lists nest as deep as they are long, so children are
/// released from an explicit list rather than by recursive drops.
impl Drop for Expr {
    fn drop(&mut self) {
        let mut pending = Vec::new();
        self.take_children(&mut pending);
        while let Some(mut expr) = pending.pop() {
            expr.take_children(&mut pending);
        }
    }
}

/// Pre-order iterator returned by [`Expr::nodes`].
pub struct Nodes<'e> {
    pending: Vec<&'e Expr>,
}

impl<'e> Iterator for Nodes<'e> {
    type Item = &'e Expr;

    fn next(&mut self) -> Option<&'e Expr> {
        let node = self.pending.pop()?;
        // Reversed so the first child comes out next
        self.pending.extend(node.children().rev());
        Some(node)
    }
}

/// Encode a tree with postcard, for handing trees across process boundaries.
pub fn to_bytes(expr: &Expr) -> Result<Vec<u8>, crate::vm::CodecError> {
    postcard::to_allocvec(expr).map_err(crate::vm::CodecError::from)
}

/// Decode a tree previously written by [`to_bytes`].
pub fn from_bytes(bytes: &[u8]) -> Result<Expr, crate::vm::CodecError> {
    postcard::from_bytes(bytes).map_err(crate::vm::CodecError::from)
}
