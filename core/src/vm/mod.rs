mod code;
mod error;
mod instruction_set;
pub mod listing;
mod runtime;
mod stack;

pub use code::{CodecError, Program};
pub use error::{ErrorKind, ExecutionError};
pub use instruction_set::Instruction;
pub use listing::{ListingError, ParseInstructionError};
pub use runtime::VM;

pub(crate) use stack::Stack;
