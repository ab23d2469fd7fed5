//! Evaluation errors.
//!
//! Every error halts the evaluation that raised it. No partial stack is
//! returned; callers that want to retry run the whole program again.

use ecow::EcoString;
use thiserror::Error;

use crate::{values::ValueKind, vm::BoxError};

/// An error raised while evaluating a program, with the step it happened at.
#[derive(Debug, Error)]
#[error("{kind} (at step {step})")]
pub struct ExecutionError {
    #[source]
    pub kind: ExecutionErrorKind,

    /// Zero-based index of the operation that failed.
    pub step: usize,
}

/// What went wrong during evaluation.
#[derive(Debug, Error)]
pub enum ExecutionErrorKind {
    /// An operation found fewer values on the stack than it reads.
    #[error("stack underflow: `{operation}` needs {required} value(s) but the stack holds {found}")]
    StackUnderflow {
        operation: &'static str,
        required: usize,
        found: usize,
    },

    /// `add` or `mul` met a value that does not coerce to a number.
    #[error("type mismatch: `{operation}` cannot use a {found} value as a number (stack depth {depth})")]
    TypeMismatch {
        operation: &'static str,
        found: ValueKind,
        depth: usize,
    },

    /// A transform passed to `apply` returned an error.
    #[error("transform `{}` failed (stack depth {depth})", .transform.as_deref().unwrap_or("<anonymous>"))]
    ApplyFailure {
        transform: Option<EcoString>,
        depth: usize,
        #[source]
        source: BoxError,
    },

    /// The evaluation ran more operations than `EvaluatorOptions::max_steps`.
    #[error("step limit exceeded: more than {limit} operations executed")]
    StepLimitExceeded { limit: usize },
}

impl ExecutionError {
    pub fn new(kind: ExecutionErrorKind, step: usize) -> Self {
        Self { kind, step }
    }

    /// The error a failing transform returned, exactly as it returned it.
    ///
    /// Returns `None` for every other kind of error.
    pub fn into_transform_error(self) -> Option<BoxError> {
        match self.kind {
            ExecutionErrorKind::ApplyFailure { source, .. } => Some(source),
            _ => None,
        }
    }

    pub fn is_stack_underflow(&self) -> bool {
        matches!(self.kind, ExecutionErrorKind::StackUnderflow { .. })
    }

    pub fn is_type_mismatch(&self) -> bool {
        matches!(self.kind, ExecutionErrorKind::TypeMismatch { .. })
    }
}
