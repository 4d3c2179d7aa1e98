//! Bytecode compiler implementation.

use tracing::debug;

use crate::{
    Vec,
    expr::Expr,
    vec,
    visitor::TreeTransformer,
    vm::{Instruction, Program},
};

/// Bytecode compiler that transforms expression trees into VM bytecode.
///
/// The compiler implements the TreeTransformer pattern as its entry point but
/// walks the tree with an explicit work-list, so tree depth is bounded by the
/// heap rather than the native stack. Everything is emitted into one buffer.
pub struct BytecodeCompiler {
    /// Bytecode instructions
    instructions: Vec<Instruction>,
}

/// Pending work for the emitter. Popped from the back.
enum Task<'e> {
    Visit(&'e Expr),
    Emit(Instruction),
    /// The conditional exit of a loop whose body is `body_len` instructions.
    ExitTest { body_len: usize },
}

impl BytecodeCompiler {
    /// Create a new bytecode compiler.
    pub fn new() -> Self {
        Self {
            instructions: Vec::new(),
        }
    }

    /// Finalize compilation and return the bytecode.
    ///
    /// No `End` is appended; use [`BytecodeCompiler::compile`] for a complete
    /// program.
    pub fn finalize(self) -> Program {
        Program::new(self.instructions)
    }

    /// Convenience method to compile an expression in one call.
    pub fn compile(expr: &Expr) -> Program {
        let mut compiler = Self::new();
        compiler.transform(expr);
        // Emit End instruction to signal end of execution
        compiler.emit(Instruction::End);
        let program = compiler.finalize();
        debug!(instructions = program.len(), "compiled expression");
        program
    }

    // === Instruction Emission ===

    /// Emit an instruction.
    fn emit(&mut self, instruction: Instruction) {
        self.instructions.push(instruction);
    }

    /// Get the address of the next instruction (for use as a jump label).
    fn label(&self) -> usize {
        self.instructions.len()
    }
}

impl Default for BytecodeCompiler {
    fn default() -> Self {
        Self::new()
    }
}

impl TreeTransformer<Expr> for BytecodeCompiler {
    type Output = ();

    fn transform(&mut self, tree: &Expr) {
        // Loop exits are computed from measured body lengths, never patched.
        let mut body_lengths = loop_body_lengths(tree).into_iter();
        let mut tasks = vec![Task::Visit(tree)];

        while let Some(task) = tasks.pop() {
            let node = match task {
                Task::Emit(instruction) => {
                    self.emit(instruction);
                    continue;
                }
                Task::ExitTest { body_len } => {
                    // Past the test, the body and the back jump
                    let exit = self.label() + 1 + body_len + 1;
                    self.emit(Instruction::JumpIfZero(exit));
                    continue;
                }
                Task::Visit(node) => node,
            };

            match node {
                Expr::Literal(value) => self.emit(Instruction::Push(*value)),

                Expr::Variable(slot) => self.emit(Instruction::Get(*slot)),

                Expr::Assign(slot, value) => {
                    // Leaves one value, which Set consumes
                    tasks.push(Task::Emit(Instruction::Set(*slot)));
                    tasks.push(Task::Visit(value));
                }

                Expr::BinaryOp { op, left, right } => {
                    // Left first; the VM pops the right operand first
                    tasks.push(Task::Emit(Instruction::Bin(*op)));
                    tasks.push(Task::Visit(right));
                    tasks.push(Task::Visit(left));
                }

                Expr::Sequence(first, rest) => {
                    // Whatever `first` leaves stays on the stack
                    tasks.push(Task::Visit(rest));
                    tasks.push(Task::Visit(first));
                }

                Expr::While { cond, body } => {
                    // cond; JumpIfZero exit; body; Jump start
                    let start = self.label();
                    // Both passes reach loops in the same pre-order
                    let body_len = body_lengths.next().unwrap_or_default();
                    tasks.push(Task::Emit(Instruction::Jump(start)));
                    tasks.push(Task::Visit(body));
                    tasks.push(Task::ExitTest { body_len });
                    tasks.push(Task::Visit(cond));
                }
            }
        }
    }
}

/// Instructions a node emits itself, not counting its children.
fn own_len(expr: &Expr) -> usize {
    match expr {
        Expr::Literal(_) | Expr::Variable(_) | Expr::Assign(..) | Expr::BinaryOp { .. } => 1,
        Expr::Sequence(..) => 0,
        Expr::While { .. } => 2,
    }
}

/// Code length of every loop body in `expr`, in pre-order of the loops.
///
/// One post-order walk: each finished subtree leaves its code length on
/// `sizes`, and a loop reads its body's entry before folding both children.
fn loop_body_lengths(expr: &Expr) -> Vec<usize> {
    enum Step<'e> {
        Enter(&'e Expr),
        /// Leave a node; loops carry their index into `lengths`.
        Exit(&'e Expr, Option<usize>),
    }

    let mut lengths = Vec::new();
    let mut sizes: Vec<usize> = Vec::new();
    let mut steps = vec![Step::Enter(expr)];

    while let Some(step) = steps.pop() {
        match step {
            Step::Enter(node) => {
                let index = matches!(node, Expr::While { .. }).then(|| {
                    lengths.push(0);
                    lengths.len() - 1
                });
                steps.push(Step::Exit(node, index));
                steps.extend(node.children().rev().map(Step::Enter));
            }
            Step::Exit(node, index) => {
                let start = sizes.len() - node.children().count();
                if let Some(index) = index {
                    // [cond, body]
                    lengths[index] = sizes[start + 1];
                }
                let size = own_len(node) + sizes.drain(start..).sum::<usize>();
                sizes.push(size);
            }
        }
    }

    lengths
}
