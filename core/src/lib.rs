#![cfg_attr(all(not(feature = "std"), not(test)), no_std)]

extern crate alloc;

// Re-export for convenience so other modules don't need alloc:: prefix
#[allow(unused_imports)]
pub(crate) use alloc::{boxed::Box, format, string::String, string::ToString, vec, vec::Vec};

pub mod evaluator;
pub mod program;
pub mod values;
pub mod vm;

pub use evaluator::{
    EvaluatorOptions, ExecutionError, ExecutionErrorKind, Interpreter, Outcome, make_interpreter,
};
pub use program::{
    Continuation, Program, add, apply, apply_named, bind, dup, map, mul, pop, push, sequence,
    swap, try_apply,
};
pub use values::{Number, Value, ValueKind};
pub use vm::{BoxError, Operation, Stack, Transform};
