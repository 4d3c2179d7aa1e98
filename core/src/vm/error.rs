//! Stack machine execution errors.
//!
//! Every error halts the machine immediately and records the instruction
//! pointer of the instruction that failed. None of them is recoverable: each
//! one means the program (or whatever produced it) is wrong.
//!
//! A loop that never exits is not an error; the machine runs it forever
//! unless a step limit was requested in [`ExecutionOptions`](crate::api::ExecutionOptions).

use crate::expr::Slot;

/// Execution failure, with the offending instruction pointer.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ExecutionError {
    /// `Get` addressed a stack position that does not exist, or `Set` one
    /// past the next free position.
    #[error("slot {slot} out of range (stack depth {depth}) at instruction {ip}")]
    SlotOutOfRange { ip: usize, slot: Slot, depth: usize },

    /// An instruction tried to pop from an empty stack.
    #[error("stack underflow at instruction {ip}")]
    StackUnderflow { ip: usize },

    /// A jump pointed outside the program.
    #[error("jump target {target} out of range (program length {len}) at instruction {ip}")]
    InvalidJumpTarget { ip: usize, target: usize, len: usize },

    /// Execution ran past the last instruction without reaching `End`.
    #[error("no End instruction reached; execution ran off the program at {ip}")]
    MissingEnd { ip: usize },

    /// The caller-provided step budget ran out.
    #[error("step limit of {limit} exceeded at instruction {ip}")]
    StepLimitExceeded { ip: usize, limit: u64 },
}

/// Fieldless discriminant of [`ExecutionError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    SlotOutOfRange,
    StackUnderflow,
    InvalidJumpTarget,
    MissingEnd,
    StepLimitExceeded,
}

impl ExecutionError {
    /// Instruction pointer at which execution stopped.
    pub const fn ip(&self) -> usize {
        match self {
            ExecutionError::SlotOutOfRange { ip, .. }
            | ExecutionError::StackUnderflow { ip }
            | ExecutionError::InvalidJumpTarget { ip, .. }
            | ExecutionError::MissingEnd { ip }
            | ExecutionError::StepLimitExceeded { ip, .. } => *ip,
        }
    }

    pub const fn kind(&self) -> ErrorKind {
        match self {
            ExecutionError::SlotOutOfRange { .. } => ErrorKind::SlotOutOfRange,
            ExecutionError::StackUnderflow { .. } => ErrorKind::StackUnderflow,
            ExecutionError::InvalidJumpTarget { .. } => ErrorKind::InvalidJumpTarget,
            ExecutionError::MissingEnd { .. } => ErrorKind::MissingEnd,
            ExecutionError::StepLimitExceeded { .. } => ErrorKind::StepLimitExceeded,
        }
    }
}

impl ErrorKind {
    /// Short name used in rendered diagnostics.
    pub const fn name(self) -> &'static str {
        match self {
            ErrorKind::SlotOutOfRange => "SlotOutOfRange",
            ErrorKind::StackUnderflow => "StackUnderflow",
            ErrorKind::InvalidJumpTarget => "InvalidJumpTarget",
            ErrorKind::MissingEnd => "MissingEnd",
            ErrorKind::StepLimitExceeded => "StepLimitExceeded",
        }
    }
}
