//! The stacklet instruction set.
//!
//! Each [`Operation`] describes a single stack transition. Operations carry
//! no continuation and never run by themselves: the evaluator calls
//! [`Operation::execute`] when it reaches a suspended program node.
//!
//! # Stack Discipline
//!
//! Stack effect notation, top of stack on the left: `[a, b, ...] -> [a + b, ...]`

use alloc::sync::Arc;
use core::fmt;

use ecow::EcoString;
use tracing::trace;

use crate::{
    Box,
    evaluator::{
        ExecutionErrorKind,
        operators::{ArithOp, eval_binary},
    },
    values::Value,
    vm::Stack,
};

/// Error type produced by fallible transforms.
pub type BoxError = Box<dyn core::error::Error + Send + Sync>;

type TransformFn = dyn Fn(Stack) -> Result<Stack, BoxError> + Send + Sync;

/// A user supplied `Stack -> Stack` function run by [`Operation::Apply`].
///
/// Transforms are shared, not copied, when a program is cloned.
#[derive(Clone)]
pub struct Transform {
    name: Option<EcoString>,
    func: Arc<TransformFn>,
}

impl Transform {
    /// Wraps an infallible transform.
    pub fn new<F>(func: F) -> Self
    where
        F: Fn(Stack) -> Stack + Send + Sync + 'static,
    {
        Self {
            name: None,
            func: Arc::new(move |stack| Ok(func(stack))),
        }
    }

    /// Wraps a transform that may fail. Its error is handed back to the
    /// caller of the evaluator untouched.
    pub fn fallible<F, E>(func: F) -> Self
    where
        F: Fn(Stack) -> Result<Stack, E> + Send + Sync + 'static,
        E: Into<BoxError>,
    {
        Self {
            name: None,
            func: Arc::new(move |stack| func(stack).map_err(Into::into)),
        }
    }

    /// Attaches a label used in diagnostics.
    pub fn named(mut self, name: impl Into<EcoString>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn call(&self, stack: Stack) -> Result<Stack, BoxError> {
        (self.func)(stack)
    }
}

impl fmt::Debug for Transform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.name {
            Some(name) => write!(f, "Transform({})", name),
            None => write!(f, "Transform(<anonymous>)"),
        }
    }
}

/// A single stack operation.
#[derive(Clone)]
pub enum Operation {
    /// Stack: `[...] -> [value, ...]`
    Push(Value),

    /// Stack: `[a, ...] -> [...]`
    Pop,

    /// Stack: `[a, ...] -> [a, a, ...]`
    Dup,

    /// Stack: `[a, b, ...] -> [b, a, ...]`
    Swap,

    /// Stack: `[a, b, ...] -> [a + b, ...]`
    Add,

    /// Stack: `[a, b, ...] -> [a * b, ...]`
    Mul,

    /// Stack: `s -> f(s)`
    Apply(Transform),
}

impl Operation {
    /// Lower-case mnemonic used in diagnostics.
    pub fn name(&self) -> &'static str {
        match self {
            Operation::Push(_) => "push",
            Operation::Pop => "pop",
            Operation::Dup => "dup",
            Operation::Swap => "swap",
            Operation::Add => "add",
            Operation::Mul => "mul",
            Operation::Apply(_) => "apply",
        }
    }

    /// Minimum number of values the operation reads from the stack.
    pub fn required_depth(&self) -> usize {
        match self {
            Operation::Push(_) | Operation::Apply(_) => 0,
            Operation::Pop | Operation::Dup => 1,
            Operation::Swap | Operation::Add | Operation::Mul => 2,
        }
    }

    /// Runs the operation against `stack` and returns the resulting stack.
    ///
    /// The stack is consumed and only handed back on success, so a failing
    /// operation never produces a partially updated stack. An underflow
    /// reports the depth the stack had before the operation.
    pub fn execute(&self, stack: Stack) -> Result<Stack, ExecutionErrorKind> {
        let found = stack.len();
        let underflow = || ExecutionErrorKind::StackUnderflow {
            operation: self.name(),
            required: self.required_depth(),
            found,
        };

        match self {
            Operation::Push(value) => Ok(stack.push(value.clone())),
            Operation::Pop => stack.pop().map(|(_, rest)| rest).ok_or_else(underflow),
            Operation::Dup => stack.dup().ok_or_else(underflow),
            Operation::Swap => stack.swap().ok_or_else(underflow),
            Operation::Add => self.arithmetic(ArithOp::Add, stack, underflow),
            Operation::Mul => self.arithmetic(ArithOp::Mul, stack, underflow),
            Operation::Apply(transform) => {
                trace!(transform = ?transform, depth = found, "Applying transform");
                transform
                    .call(stack)
                    .map_err(|source| ExecutionErrorKind::ApplyFailure {
                        transform: transform.name.clone(),
                        depth: found,
                        source,
                    })
            }
        }
    }

    fn arithmetic(
        &self,
        op: ArithOp,
        stack: Stack,
        underflow: impl Fn() -> ExecutionErrorKind,
    ) -> Result<Stack, ExecutionErrorKind> {
        let depth = stack.len();
        let mismatch = |value: &Value| ExecutionErrorKind::TypeMismatch {
            operation: self.name(),
            found: value.kind(),
            depth,
        };

        let (top, rest) = stack.pop().ok_or_else(&underflow)?;
        let (second, rest) = rest.pop().ok_or_else(&underflow)?;
        let left = top.to_number().ok_or_else(|| mismatch(&top))?;
        let right = second.to_number().ok_or_else(|| mismatch(&second))?;

        Ok(rest.push(eval_binary(op, left, right).into()))
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Operation::Push(value) => write!(f, "push {}", value),
            Operation::Apply(Transform {
                name: Some(name), ..
            }) => write!(f, "apply {}", name),
            other => f.write_str(other.name()),
        }
    }
}

impl fmt::Debug for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Push(value) => write!(f, "Push({:?})", value),
            Self::Pop => write!(f, "Pop"),
            Self::Dup => write!(f, "Dup"),
            Self::Swap => write!(f, "Swap"),
            Self::Add => write!(f, "Add"),
            Self::Mul => write!(f, "Mul"),
            Self::Apply(transform) => write!(f, "Apply({:?})", transform),
        }
    }
}
