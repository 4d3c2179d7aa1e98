//! stackloop - A compiler and stack machine for a tiny loop language
//!
//! # Overview
//!
//! Programs are expression trees built from literals, numbered variable
//! slots, assignment, three binary operators, sequencing and `while` loops.
//! The compiler turns a tree into a flat list of instructions with absolute
//! jump addresses, and the stack machine runs that list. Variables live at
//! the bottom of the operand stack.
//!
//! # Quick Start
//!
//! ```
//! use stackloop::{Expr, VM, compile};
//!
//! // while (0 != x1) { x1 = -1 + x1 }; x1
//! let countdown = Expr::while_loop(
//!     Expr::not_eq(Expr::lit(0), Expr::var(1)),
//!     Expr::assign(1, Expr::add(Expr::lit(-1), Expr::var(1))),
//! );
//! let program = compile(&Expr::seq(countdown, Expr::var(1)));
//!
//! let mut vm = VM::with_slots(&program, &[0, 1000]);
//! assert_eq!(vm.run(), Ok(0));
//! ```
//!
//! # Listings
//!
//! Programs print as listings and parse back:
//!
//! ```
//! use stackloop::{Program, VM};
//!
//! let program = Program::from_listing("Push 3\nPush 4\nBin Add\nEnd\n").unwrap();
//! assert_eq!(program.to_string(), "Push 3\nPush 4\nBin Add\nEnd\n");
//! assert_eq!(VM::execute(&program), Ok(7));
//! ```
//!
//! When execution fails, [`render_error`] reports the error against the
//! listing with the failing instruction highlighted.

// Re-export public API from stackloop_core
pub use stackloop_core::api::{self, EvaluatorOptions, ExecutionOptions};
pub use stackloop_core::compiler::{self, compile, stack_delta};
pub use stackloop_core::evaluator;
pub use stackloop_core::expr::{self, BinaryOp, Expr, Slot};
pub use stackloop_core::vm::{self, Instruction, Program, VM};

// Re-export errors
pub use stackloop_core::evaluator::EvalError;
pub use stackloop_core::vm::{CodecError, ErrorKind, ExecutionError, ListingError};

mod error_renderer;
pub use error_renderer::{
    render_error, render_error_to, render_error_to_string, render_error_to_string_no_color,
};
