//! Iterative evaluator for stacklet programs.
//!
//! The evaluator walks a [`Program`](crate::program::Program), executing each
//! suspended operation against the live stack and resuming the continuation
//! with the result, until the program is done.
//!
//! ## Design Principles
//!
//! - **Stack-safe**: one loop iteration per operation, no recursion, so
//!   programs of any length run in constant native stack
//! - **No shared state**: the live stack is a local of each call; an
//!   [`Interpreter`] only holds its immutable initial stack and options
//! - **Fail fast**: precondition violations halt evaluation with an error,
//!   no partial results are returned
//!
//! ## Example
//!
//! ```
//! use stacklet_core::{make_interpreter, program::*, sequence, stack};
//!
//! let program = sequence![push(2), push(3), add(), push(4), mul()];
//! let result = make_interpreter(stack![]).eval(program).unwrap();
//! assert_eq!(result, stack![20]);
//! ```

mod error;
mod eval;
pub(crate) mod operators;

#[cfg(test)]
mod eval_test;

pub use error::{ExecutionError, ExecutionErrorKind};
pub use eval::{Interpreter, Outcome, make_interpreter};

/// Configuration options for evaluation.
///
/// # Example
///
/// ```
/// use stacklet_core::EvaluatorOptions;
///
/// let options = EvaluatorOptions {
///     max_steps: Some(10_000),
/// };
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EvaluatorOptions {
    /// Maximum number of operations a single evaluation may execute.
    ///
    /// Set to `None` for no limit. Finite programs always terminate, so the
    /// limit only matters for programs whose continuations keep generating
    /// new operations.
    ///
    /// Default: None
    pub max_steps: Option<usize>,
}

impl Default for EvaluatorOptions {
    fn default() -> Self {
        Self { max_steps: None }
    }
}
