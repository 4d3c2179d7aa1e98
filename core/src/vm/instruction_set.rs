//! Stack machine instructions.
//!
//! This module defines the instruction set executed by [`VM`](super::VM).
//!
//! # Design Principles
//!
//! - **Stack-based**: operations consume operands from the stack and push results
//! - **Closed set**: seven instructions, each with a fixed stack effect
//! - **Absolute jumps**: jump operands are indices into the same instruction
//!   sequence, resolved by the compiler
//! - **Slots in the stack**: `Get`/`Set` address stack positions counted from
//!   the bottom, so variables share storage with operands
//!
//! # Stack Discipline
//!
//! Stack effect notation: `[..., operand1, operand2] -> [..., result]`
//!
//! # Textual Form
//!
//! `Display` renders the mnemonic followed by the operand, if any
//! (`Push 100`, `Bin NotEq`, `JumpIfZero 27`, `End`). The same text is
//! accepted back by `FromStr`, see [`listing`](super::listing).

use core::fmt;

use serde::{Deserialize, Serialize};

use crate::expr::{BinaryOp, Slot};

/// A single VM instruction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Instruction {
    // ========================================================================
    // Stack & Slots
    // ========================================================================
    /// Push a literal
    /// Stack: [...] -> [..., value]
    Push(i64),

    /// Push a copy of the slot at this index from the bottom of the stack
    /// Stack: [s0, ..., sN, ...] -> [s0, ..., sN, ..., sN]
    Get(Slot),

    /// Pop the top value and overwrite the slot at this index with it.
    /// Addressing the position the value was popped from allocates that slot.
    /// Stack: [s0, ..., sN, ..., value] -> [s0, ..., value, ...]
    Set(Slot),

    // ========================================================================
    // Arithmetic
    // ========================================================================
    /// Apply a binary operator
    /// Stack: [..., a, b] -> [..., a op b]
    Bin(BinaryOp),

    // ========================================================================
    // Control Flow
    // ========================================================================
    /// Continue at an absolute address
    /// Stack: [...] -> [...]
    Jump(usize),

    /// Pop the top value and continue at an absolute address if it was zero
    /// Stack: [..., cond] -> [...]
    JumpIfZero(usize),

    /// Stop and return the top value
    /// Stack: [..., result] -> [...]
    End,
}

#[cfg(target_pointer_width = "64")]
static_assertions::assert_eq_size!(Instruction, [u8; 16]);

impl Instruction {
    /// Net change in stack depth when the instruction runs.
    ///
    /// `End` reports `0`: it pops the result but nothing runs afterwards.
    pub const fn stack_effect(&self) -> isize {
        match self {
            Self::Push(_) | Self::Get(_) => 1,
            Self::Set(_) | Self::Bin(_) | Self::JumpIfZero(_) => -1,
            Self::Jump(_) | Self::End => 0,
        }
    }

    /// Target address of a jump instruction.
    pub const fn jump_target(&self) -> Option<usize> {
        match self {
            Self::Jump(addr) | Self::JumpIfZero(addr) => Some(*addr),
            _ => None,
        }
    }

    /// Mnemonic without operand.
    pub const fn mnemonic(&self) -> &'static str {
        match self {
            Self::Push(_) => "Push",
            Self::Get(_) => "Get",
            Self::Set(_) => "Set",
            Self::Bin(_) => "Bin",
            Self::Jump(_) => "Jump",
            Self::JumpIfZero(_) => "JumpIfZero",
            Self::End => "End",
        }
    }
}

impl fmt::Display for Instruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mnemonic = self.mnemonic();
        match self {
            Self::Push(value) => write!(f, "{} {}", mnemonic, value),
            Self::Get(slot) | Self::Set(slot) => write!(f, "{} {}", mnemonic, slot),
            Self::Bin(op) => write!(f, "{} {}", mnemonic, op.mnemonic()),
            Self::Jump(addr) | Self::JumpIfZero(addr) => write!(f, "{} {}", mnemonic, addr),
            Self::End => f.write_str(mnemonic),
        }
    }
}
