//! One-operation programs.
//!
//! Each constructor only builds data: the returned program is suspended on
//! its operation with the identity continuation.

use ecow::EcoString;

use crate::{
    program::Program,
    values::Value,
    vm::{BoxError, Operation, Stack, Transform},
};

pub fn push(value: impl Into<Value>) -> Program<Stack> {
    Program::suspend(Operation::Push(value.into()))
}

pub fn pop() -> Program<Stack> {
    Program::suspend(Operation::Pop)
}

pub fn dup() -> Program<Stack> {
    Program::suspend(Operation::Dup)
}

pub fn swap() -> Program<Stack> {
    Program::suspend(Operation::Swap)
}

pub fn add() -> Program<Stack> {
    Program::suspend(Operation::Add)
}

pub fn mul() -> Program<Stack> {
    Program::suspend(Operation::Mul)
}

/// Replaces the whole stack with `transform(stack)`.
pub fn apply<F>(transform: F) -> Program<Stack>
where
    F: Fn(Stack) -> Stack + Send + Sync + 'static,
{
    Program::suspend(Operation::Apply(Transform::new(transform)))
}

/// Like [`apply`], for transforms that can fail. The error reaches the
/// evaluator's caller as `ApplyFailure` with this error as its source.
pub fn try_apply<F, E>(transform: F) -> Program<Stack>
where
    F: Fn(Stack) -> Result<Stack, E> + Send + Sync + 'static,
    E: Into<BoxError>,
{
    Program::suspend(Operation::Apply(Transform::fallible(transform)))
}

/// Like [`apply`], with a label that shows up in traces and errors.
pub fn apply_named<F>(name: impl Into<EcoString>, transform: F) -> Program<Stack>
where
    F: Fn(Stack) -> Stack + Send + Sync + 'static,
{
    Program::suspend(Operation::Apply(Transform::new(transform).named(name)))
}
