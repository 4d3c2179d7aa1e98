use core::fmt;
use core::ops::Range;

use hashbrown::{HashMap, HashSet};
use serde::{Deserialize, Serialize};

use crate::{
    Vec, format,
    vm::{ExecutionError, Instruction},
};

/// A compiled program: an immutable sequence of instructions.
///
/// Jump operands are absolute indices into `instructions`. Programs built by
/// the compiler always end with [`Instruction::End`] and only contain valid
/// jump targets; programs from other sources can be checked with
/// [`Program::validate`], and the VM re-checks every jump it takes.
#[derive(Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Program {
    pub instructions: Vec<Instruction>,
}

/// Errors from the binary program and tree encodings.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CodecError {
    #[error("malformed binary encoding: {0}")]
    Postcard(postcard::Error),
}

impl From<postcard::Error> for CodecError {
    fn from(e: postcard::Error) -> Self {
        CodecError::Postcard(e)
    }
}

impl Program {
    pub fn new(instructions: Vec<Instruction>) -> Self {
        Self { instructions }
    }

    pub fn len(&self) -> usize {
        self.instructions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.instructions.is_empty()
    }

    /// Check every jump target against the program length.
    ///
    /// Reports the first offending jump as [`ExecutionError::InvalidJumpTarget`],
    /// the same error the VM raises when it reaches that jump.
    pub fn validate(&self) -> Result<(), ExecutionError> {
        let len = self.len();
        for (ip, instr) in self.instructions.iter().enumerate() {
            if let Some(target) = instr.jump_target() {
                if target >= len {
                    return Err(ExecutionError::InvalidJumpTarget { ip, target, len });
                }
            }
        }
        Ok(())
    }

    /// Byte range of instruction `ip` within the plain `Display` listing,
    /// excluding the trailing newline.
    pub fn line_span(&self, ip: usize) -> Option<Range<usize>> {
        let mut start = 0;
        for (addr, instr) in self.instructions.iter().enumerate() {
            let width = format!("{}", instr).len();
            if addr == ip {
                return Some(start..start + width);
            }
            start += width + 1;
        }
        None
    }

    /// Encode with postcard.
    pub fn to_bytes(&self) -> Result<Vec<u8>, CodecError> {
        Ok(postcard::to_allocvec(self)?)
    }

    /// Decode a program previously written by [`Program::to_bytes`].
    ///
    /// Jump targets are not checked here.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, CodecError> {
        Ok(postcard::from_bytes(bytes)?)
    }
}

impl From<Vec<Instruction>> for Program {
    fn from(instructions: Vec<Instruction>) -> Self {
        Self::new(instructions)
    }
}

/// Plain form: one instruction per line. Alternate form (`{:#}`) prefixes
/// each line with its address. Both are accepted by [`Program::from_listing`].
impl fmt::Display for Program {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let alternate = f.alternate();
        for (addr, instr) in self.instructions.iter().enumerate() {
            if alternate {
                writeln!(f, "{:4}  {}", addr, instr)?;
            } else {
                writeln!(f, "{}", instr)?;
            }
        }
        Ok(())
    }
}

impl fmt::Debug for Program {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Program {{")?;

        // First pass: collect all jump targets to determine which addresses need labels
        let jump_targets: HashSet<usize> = self
            .instructions
            .iter()
            .filter_map(Instruction::jump_target)
            .collect();

        // Assign label numbers to targets (sorted for deterministic output)
        let mut sorted_targets: Vec<_> = jump_targets.into_iter().collect();
        sorted_targets.sort();
        let label_map: HashMap<usize, usize> = sorted_targets
            .into_iter()
            .enumerate()
            .map(|(i, addr)| (addr, i))
            .collect();

        // Second pass: print instructions with labels
        writeln!(f, "  instructions:")?;
        for (addr, instr) in self.instructions.iter().enumerate() {
            let label_prefix = match label_map.get(&addr) {
                Some(label_num) => format!("L{}:", label_num),
                None => crate::String::new(),
            };

            match instr.jump_target() {
                Some(target) => {
                    let target_label = label_map
                        .get(&target)
                        .map(|l| format!("L{}", l))
                        .unwrap_or_else(|| format!("@{}", target));
                    writeln!(
                        f,
                        "    {:4} {:>4}  {} (to {})",
                        addr, label_prefix, instr, target_label
                    )?;
                }
                None => writeln!(f, "    {:4} {:>4}  {}", addr, label_prefix, instr)?,
            }
        }

        write!(f, "}}")
    }
}
