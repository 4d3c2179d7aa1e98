//! Reference evaluator errors.
//!
//! # Error Categories
//!
//! - **Runtime errors**: the tree asked for something the environment cannot
//!   provide (an unknown slot, a statement used where a value is needed).
//!
//! - **Resource exceeded errors**: the tree is nested deeper than the
//!   configured evaluation depth.

use crate::expr::Slot;

/// Reference evaluation error.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EvalError {
    #[error(transparent)]
    Runtime(#[from] RuntimeError),

    #[error(transparent)]
    ResourceExceeded(#[from] ResourceExceededError),
}

/// Errors caused by the shape of the tree or the environment.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RuntimeError {
    /// A variable or assignment addressed a slot the environment does not hold.
    #[error("slot {slot} out of range (environment holds {len} slots)")]
    SlotOutOfRange { slot: Slot, len: usize },

    /// A statement that yields nothing was used where a value is required.
    #[error("{context} produced no value")]
    MissingValue { context: &'static str },
}

/// Resource limit exceeded errors.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ResourceExceededError {
    /// Evaluation recursion depth exceeded.
    #[error("evaluation stack overflow: depth {depth} exceeds maximum of {max_depth}")]
    StackOverflow { depth: usize, max_depth: usize },
}
