use tracing::{debug, trace};

use super::instruction_set::Instruction;

use crate::{
    api::ExecutionOptions,
    vm::{ExecutionError, Program, Stack},
};

/// The stack machine.
///
/// A VM borrows its program and owns its stack. Any number of VMs can run the
/// same program, each with its own state.
pub struct VM<'c> {
    code: &'c Program,
    ip: usize,
    stack: Stack<i64>,
    options: ExecutionOptions,
    steps: u64,
}

impl<'c> VM<'c> {
    pub fn new(code: &'c Program) -> Self {
        Self::with_options(code, ExecutionOptions::default())
    }

    pub fn with_options(code: &'c Program, options: ExecutionOptions) -> Self {
        VM {
            code,
            ip: 0,
            stack: Stack::new(options.stack_capacity),
            options,
            steps: 0,
        }
    }

    /// Create a VM whose stack starts out holding `slots`, so `Get(i)` and
    /// `Set(i)` address `slots[i]` from the first instruction on.
    pub fn with_slots(code: &'c Program, slots: &[i64]) -> Self {
        Self::new(code).with_initial_slots(slots)
    }

    /// Push `slots` onto the (still empty) stack before running.
    pub fn with_initial_slots(mut self, slots: &[i64]) -> Self {
        self.stack.extend_from_slice(slots);
        self
    }

    /// Run `code` on a fresh VM with default options.
    pub fn execute(code: &Program) -> Result<i64, ExecutionError> {
        VM::new(code).run()
    }

    /// Current instruction pointer.
    pub fn ip(&self) -> usize {
        self.ip
    }

    /// Current stack contents, bottom first. Slot `i` is `stack()[i]`.
    pub fn stack(&self) -> &[i64] {
        self.stack.as_slice()
    }

    /// Number of instructions executed so far.
    pub fn steps(&self) -> u64 {
        self.steps
    }

    #[inline]
    fn pop(&mut self, ip: usize) -> Result<i64, ExecutionError> {
        self.stack.pop().ok_or(ExecutionError::StackUnderflow { ip })
    }

    #[inline]
    fn check_target(&self, ip: usize, target: usize) -> Result<usize, ExecutionError> {
        let len = self.code.len();
        if target < len {
            Ok(target)
        } else {
            Err(ExecutionError::InvalidJumpTarget { ip, target, len })
        }
    }

    /// Execute until `End` and return the value it pops.
    ///
    /// On error the VM stays at the failing instruction, with the stack as it
    /// was when the failure was detected. After `End` the instruction pointer
    /// stays on `End`.
    pub fn run(&mut self) -> Result<i64, ExecutionError> {
        loop {
            let ip = self.ip;
            let Some(&instruction) = self.code.instructions.get(ip) else {
                return Err(ExecutionError::MissingEnd { ip });
            };

            if let Some(limit) = self.options.max_steps {
                if self.steps >= limit {
                    return Err(ExecutionError::StepLimitExceeded { ip, limit });
                }
            }
            self.steps += 1;

            trace!(ip, %instruction, depth = self.stack.len(), "step");

            use Instruction::*;
            match instruction {
                Push(value) => {
                    self.stack.push(value);
                    self.ip += 1;
                }
                Get(slot) => {
                    let depth = self.stack.len();
                    let value = *self
                        .stack
                        .get(slot)
                        .ok_or(ExecutionError::SlotOutOfRange { ip, slot, depth })?;
                    self.stack.push(value);
                    self.ip += 1;
                }
                Set(slot) => {
                    let value = self.pop(ip)?;
                    let depth = self.stack.len();
                    match self.stack.get_mut(slot) {
                        Some(cell) => *cell = value,
                        // The next free position: the value stays where it was
                        None if slot == depth => self.stack.push(value),
                        None => return Err(ExecutionError::SlotOutOfRange { ip, slot, depth }),
                    }
                    self.ip += 1;
                }
                Bin(op) => {
                    let b = self.pop(ip)?;
                    let a = self.pop(ip)?;
                    self.stack.push(op.apply(a, b));
                    self.ip += 1;
                }
                Jump(target) => {
                    self.ip = self.check_target(ip, target)?;
                }
                JumpIfZero(target) => {
                    let target = self.check_target(ip, target)?;
                    if self.pop(ip)? == 0 {
                        self.ip = target;
                    } else {
                        self.ip += 1;
                    }
                }
                End => {
                    let result = self.pop(ip)?;
                    debug!(result, steps = self.steps, "halted");
                    return Ok(result);
                }
            }
        }
    }
}
