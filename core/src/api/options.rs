//! Configuration options for compilation and execution.

/// Configuration options for program execution.
///
/// These options control resource limits of the stack machine.
///
/// # Example
///
/// ```
/// use stackloop_core::api::ExecutionOptions;
///
/// let options = ExecutionOptions {
///     max_steps: Some(10_000),
///     ..ExecutionOptions::default()
/// };
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecutionOptions {
    /// Maximum number of instructions to execute (if Some).
    ///
    /// Set to `None` to run until `End`, however long that takes (loops that
    /// never exit then run forever).
    ///
    /// Default: None
    pub max_steps: Option<u64>,

    /// Number of stack entries to allocate up front.
    ///
    /// The stack grows beyond this as needed.
    ///
    /// Default: 256
    pub stack_capacity: usize,
}

impl Default for ExecutionOptions {
    fn default() -> Self {
        Self {
            max_steps: None,
            stack_capacity: 256,
        }
    }
}

/// Configuration options for the reference evaluator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EvaluatorOptions {
    /// Maximum evaluation stack depth (for recursion protection).
    ///
    /// Default: 1000
    pub max_depth: usize,
}

impl Default for EvaluatorOptions {
    fn default() -> Self {
        Self { max_depth: 1000 }
    }
}
