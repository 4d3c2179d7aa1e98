//! Core evaluation logic.

use crate::{
    Vec,
    api::EvaluatorOptions,
    evaluator::{EvalError, ResourceExceededError::*, RuntimeError::*},
    expr::{Expr, Slot},
    visitor::TreeTransformer,
};

/// Evaluator for expression trees.
pub struct Evaluator {
    options: EvaluatorOptions,
    /// Variable environment, indexed by slot.
    slots: Vec<i64>,
    depth: usize,
}

impl Evaluator {
    /// Create a new evaluator whose environment starts out as `slots`.
    pub fn new(options: EvaluatorOptions, slots: &[i64]) -> Self {
        Self {
            options,
            slots: slots.to_vec(),
            depth: 0,
        }
    }

    /// Evaluate a tree. `None` means the tree ended in a statement.
    pub fn eval(&mut self, expr: &Expr) -> Result<Option<i64>, EvalError> {
        self.transform(expr)
    }

    /// The environment as it stands.
    pub fn slots(&self) -> &[i64] {
        &self.slots
    }

    /// Evaluate a node that must produce a value.
    fn eval_value(&mut self, expr: &Expr, context: &'static str) -> Result<i64, EvalError> {
        self.transform(expr)?
            .ok_or_else(|| MissingValue { context }.into())
    }

    /// Keep a statement's leftover value as the next slot.
    fn retain(&mut self, value: Option<i64>) {
        if let Some(value) = value {
            self.slots.push(value);
        }
    }

    fn slot_mut(&mut self, slot: Slot) -> Result<&mut i64, EvalError> {
        let len = self.slots.len();
        self.slots
            .get_mut(slot)
            .ok_or_else(|| SlotOutOfRange { slot, len }.into())
    }

    fn eval_expr_inner(&mut self, expr: &Expr) -> Result<Option<i64>, EvalError> {
        match expr {
            Expr::Literal(value) => Ok(Some(*value)),

            Expr::Variable(slot) => {
                let len = self.slots.len();
                let value = self
                    .slots
                    .get(*slot)
                    .copied()
                    .ok_or(SlotOutOfRange { slot: *slot, len })?;
                Ok(Some(value))
            }

            Expr::Assign(slot, value) => {
                let value = self.eval_value(value, "assigned expression")?;
                if *slot == self.slots.len() {
                    // First write to the next free slot allocates it
                    self.slots.push(value);
                } else {
                    *self.slot_mut(*slot)? = value;
                }
                Ok(None)
            }

            Expr::BinaryOp { op, left, right } => {
                let a = self.eval_value(left, "left operand")?;
                let b = self.eval_value(right, "right operand")?;
                Ok(Some(op.apply(a, b)))
            }

            Expr::Sequence(first, rest) => {
                let leftover = self.transform(first)?;
                self.retain(leftover);
                self.transform(rest)
            }

            Expr::While { cond, body } => {
                while self.eval_value(cond, "loop condition")? != 0 {
                    let leftover = self.transform(body)?;
                    self.retain(leftover);
                }
                Ok(None)
            }
        }
    }
}

impl TreeTransformer<Expr> for Evaluator {
    type Output = Result<Option<i64>, EvalError>;

    fn transform(&mut self, tree: &Expr) -> Self::Output {
        // Check depth before recursing
        if self.depth >= self.options.max_depth {
            return Err(StackOverflow {
                depth: self.depth,
                max_depth: self.options.max_depth,
            }
            .into());
        }

        self.depth += 1;
        let result = self.eval_expr_inner(tree);
        self.depth -= 1;

        result
    }
}
