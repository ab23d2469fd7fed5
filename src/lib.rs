//! Stacklet - A small embedded language for stack-based computation
//!
//! # Overview
//!
//! Programs are built as data from a fixed instruction set (`push`, `pop`,
//! `dup`, `swap`, `add`, `mul`, `apply`), composed with `map`, `bind` and
//! `sequence`, and only then run by an interpreter against a concrete stack.
//!
//! # Quick Start
//!
//! ```
//! use stacklet::{make_interpreter, program::*, sequence, stack, words};
//!
//! let program = sequence![push(5), words::squared(), push(3), push(2), words::sum3()];
//! let result = make_interpreter(stack![]).eval(program).unwrap();
//! assert_eq!(result, stack![30]);
//! ```
//!
//! # Words
//!
//! A word is a named, reusable program. The [`words`] module provides a
//! [`Dictionary`] to keep them by name and a few sample definitions.

pub mod words;

// Re-export the public API from stacklet_core
pub use stacklet_core::{
    Continuation, EvaluatorOptions, ExecutionError, ExecutionErrorKind, Interpreter, Number,
    Operation, Outcome, Program, Stack, Transform, Value, ValueKind, make_interpreter, sequence,
    stack,
};
pub use stacklet_core::{evaluator, program, values, vm};

pub use words::Dictionary;
