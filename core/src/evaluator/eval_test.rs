//! Unit tests for the evaluator.

use super::*;
use crate::{api::EvaluatorOptions, expr::Expr};

fn countdown(slot: usize) -> Expr {
    Expr::while_loop(
        Expr::not_eq(Expr::lit(0), Expr::var(slot)),
        Expr::assign(slot, Expr::add(Expr::lit(-1), Expr::var(slot))),
    )
}

#[test]
fn test_literal_and_arithmetic() {
    assert_eq!(eval(&Expr::lit(2), &[]), Ok(Some(2)));
    assert_eq!(
        eval(&Expr::add(Expr::lit(3), Expr::lit(4)), &[]),
        Ok(Some(7))
    );
    assert_eq!(
        eval(&Expr::sub(Expr::lit(3), Expr::lit(4)), &[]),
        Ok(Some(-1))
    );
    assert_eq!(
        eval(&Expr::not_eq(Expr::lit(3), Expr::lit(3)), &[]),
        Ok(Some(0))
    );
}

#[test]
fn test_assign_yields_nothing() {
    let mut evaluator = Evaluator::new(EvaluatorOptions::default(), &[1, 2]);
    assert_eq!(evaluator.eval(&Expr::assign(1, Expr::lit(9))), Ok(None));
    assert_eq!(evaluator.slots(), &[1, 9]);
}

#[test]
fn test_countdown_reaches_zero() {
    let mut evaluator = Evaluator::new(EvaluatorOptions::default(), &[0, 1000]);
    assert_eq!(evaluator.eval(&countdown(1)), Ok(None));
    assert_eq!(evaluator.slots(), &[0, 0]);
}

#[test]
fn test_sequence_leftovers_become_slots() {
    let expr = Expr::block([
        Expr::lit(10),
        Expr::lit(32),
        Expr::assign(0, Expr::add(Expr::var(0), Expr::var(1))),
        Expr::var(0),
    ])
    .unwrap();
    let mut evaluator = Evaluator::new(EvaluatorOptions::default(), &[]);
    assert_eq!(evaluator.eval(&expr), Ok(Some(42)));
    assert_eq!(evaluator.slots(), &[42, 32]);
}

#[test]
fn test_loop_body_leftovers_accumulate() {
    // Each iteration leaves the literal 7 behind.
    let expr = Expr::while_loop(
        Expr::var(0),
        Expr::seq(
            Expr::assign(0, Expr::sub(Expr::var(0), Expr::lit(1))),
            Expr::lit(7),
        ),
    );
    let mut evaluator = Evaluator::new(EvaluatorOptions::default(), &[3]);
    assert_eq!(evaluator.eval(&expr), Ok(None));
    assert_eq!(evaluator.slots(), &[0, 7, 7, 7]);
}

#[test]
fn test_unknown_slot() {
    assert_eq!(
        eval(&Expr::var(2), &[1]),
        Err(RuntimeError::SlotOutOfRange { slot: 2, len: 1 }.into())
    );
    assert_eq!(
        eval(&Expr::assign(1, Expr::lit(1)), &[]),
        Err(RuntimeError::SlotOutOfRange { slot: 1, len: 0 }.into())
    );
}

#[test]
fn test_assign_allocates_next_slot() {
    let expr = Expr::seq(Expr::assign(0, Expr::lit(5)), Expr::var(0));
    let mut evaluator = Evaluator::new(EvaluatorOptions::default(), &[]);
    assert_eq!(evaluator.eval(&expr), Ok(Some(5)));
    assert_eq!(evaluator.slots(), &[5]);
}

#[test]
fn test_statement_as_operand() {
    let expr = Expr::add(Expr::lit(1), Expr::assign(0, Expr::lit(2)));
    assert_eq!(
        eval(&expr, &[0]),
        Err(RuntimeError::MissingValue {
            context: "right operand"
        }
        .into())
    );

    let expr = Expr::while_loop(countdown(0), Expr::lit(1));
    assert_eq!(
        eval(&expr, &[1]),
        Err(RuntimeError::MissingValue {
            context: "loop condition"
        }
        .into())
    );
}

#[test]
fn test_depth_limit() {
    let mut expr = Expr::lit(0);
    for _ in 0..20 {
        expr = Expr::add(expr, Expr::lit(1));
    }

    assert_eq!(eval_with_limits(&expr, &[], 100), Ok(Some(20)));
    assert_eq!(
        eval_with_limits(&expr, &[], 10),
        Err(ResourceExceededError::StackOverflow {
            depth: 10,
            max_depth: 10
        }
        .into())
    );
}

#[test]
fn test_error_messages() {
    let err: EvalError = RuntimeError::SlotOutOfRange { slot: 4, len: 2 }.into();
    assert_eq!(
        err.to_string(),
        "slot 4 out of range (environment holds 2 slots)"
    );
}
