//! Tree transformer trait shared by every pass over an expression tree.
//!
//! The compiler, the reference evaluator and the s-expression formatter are all
//! transformers: each one owns whatever state it needs (an instruction buffer,
//! a variable environment, an output string) and recurses into children itself.

/// Generic transformer for tree structures.
///
/// This trait can be used for:
/// - Side-effect traversals (Output = (), e.g. bytecode generation, formatting)
/// - Evaluation (Output = value type, e.g. `Result<Option<i64>, EvalError>`)
///
/// The transformer can be stateful (uses `&mut self`) to accumulate results,
/// track context, or maintain mutable state during traversal.
pub trait TreeTransformer<T: ?Sized> {
    /// The type of value produced by the transformation.
    type Output;

    /// Transform a tree node.
    ///
    /// This method is called recursively to traverse and transform the tree.
    /// The transformer is responsible for recursing into children as needed.
    fn transform(&mut self, tree: &T) -> Self::Output;
}

#[cfg(test)]
mod tests;
