//! Small transformers exercising the visitor over expression trees.

use super::TreeTransformer;
use crate::{
    Box, Vec,
    expr::{BinaryOp, Expr, Slot},
};

/// Counts nodes.
struct NodeCounter;

impl TreeTransformer<Expr> for NodeCounter {
    type Output = usize;

    fn transform(&mut self, tree: &Expr) -> usize {
        1 + match tree {
            Expr::Literal(_) | Expr::Variable(_) => 0,
            Expr::Assign(_, value) => self.transform(value),
            Expr::BinaryOp { left, right, .. } => self.transform(left) + self.transform(right),
            Expr::Sequence(first, rest) => self.transform(first) + self.transform(rest),
            Expr::While { cond, body } => self.transform(cond) + self.transform(body),
        }
    }
}

/// Collects every slot a tree writes, in visiting order.
#[derive(Default)]
struct AssignedSlots {
    slots: Vec<Slot>,
}

impl TreeTransformer<Expr> for AssignedSlots {
    type Output = ();

    fn transform(&mut self, tree: &Expr) {
        match tree {
            Expr::Literal(_) | Expr::Variable(_) => {}
            Expr::Assign(slot, value) => {
                self.transform(value);
                self.slots.push(*slot);
            }
            Expr::BinaryOp { left, right, .. } => {
                self.transform(left);
                self.transform(right);
            }
            Expr::Sequence(first, rest) => {
                self.transform(first);
                self.transform(rest);
            }
            Expr::While { cond, body } => {
                self.transform(cond);
                self.transform(body);
            }
        }
    }
}

/// Rebuilds a tree with every subtraction of a literal turned into an addition.
struct SubToAdd;

impl TreeTransformer<Expr> for SubToAdd {
    type Output = Expr;

    fn transform(&mut self, tree: &Expr) -> Expr {
        match tree {
            Expr::Literal(_) | Expr::Variable(_) => tree.clone(),
            Expr::Assign(slot, value) => Expr::assign(*slot, self.transform(value)),
            Expr::BinaryOp {
                op: BinaryOp::Sub,
                left,
                right,
            } if matches!(**right, Expr::Literal(_)) => {
                let Expr::Literal(n) = **right else {
                    unreachable!()
                };
                Expr::add(self.transform(left), Expr::lit(n.wrapping_neg()))
            }
            Expr::BinaryOp { op, left, right } => Expr::BinaryOp {
                op: *op,
                left: Box::new(self.transform(left)),
                right: Box::new(self.transform(right)),
            },
            Expr::Sequence(first, rest) => Expr::seq(self.transform(first), self.transform(rest)),
            Expr::While { cond, body } => {
                Expr::while_loop(self.transform(cond), self.transform(body))
            }
        }
    }
}

fn countdown() -> Expr {
    Expr::while_loop(
        Expr::not_eq(Expr::lit(0), Expr::var(1)),
        Expr::assign(1, Expr::sub(Expr::var(1), Expr::lit(1))),
    )
}

#[test]
fn test_node_counter() {
    assert_eq!(NodeCounter.transform(&Expr::lit(1)), 1);
    assert_eq!(NodeCounter.transform(&countdown()), countdown().size());
}

#[test]
fn test_assigned_slots() {
    let expr = Expr::seq(
        Expr::assign(2, Expr::lit(5)),
        Expr::seq(countdown(), Expr::assign(0, Expr::var(2))),
    );
    let mut collector = AssignedSlots::default();
    collector.transform(&expr);
    assert_eq!(collector.slots, [2, 1, 0]);
}

#[test]
fn test_rebuilding_transformer() {
    let rewritten = SubToAdd.transform(&countdown());
    assert_eq!(
        rewritten,
        Expr::while_loop(
            Expr::not_eq(Expr::lit(0), Expr::var(1)),
            Expr::assign(1, Expr::add(Expr::var(1), Expr::lit(-1))),
        )
    );
    // Operands that are not literals are left alone.
    let expr = Expr::sub(Expr::lit(1), Expr::var(0));
    assert_eq!(SubToAdd.transform(&expr), expr);
}
