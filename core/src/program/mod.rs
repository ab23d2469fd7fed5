//! Deferred stack programs.
//!
//! A [`Program`] is either a finished value or an [`Operation`] suspended
//! together with the continuation that turns the operation's resulting stack
//! into the rest of the program. Building a program never executes anything;
//! see [`crate::evaluator`] for running one.
//!
//! ## Example
//!
//! ```
//! use stacklet_core::{make_interpreter, program::*, sequence, stack};
//!
//! let squared = sequence![dup(), mul()];
//! let program = sequence![push(5), squared, push(1), add()];
//!
//! let result = make_interpreter(stack![]).eval(program).unwrap();
//! assert_eq!(result, stack![26]);
//! ```

mod constructors;
mod continuation;


use core::fmt;

pub use constructors::{add, apply, apply_named, dup, mul, pop, push, swap, try_apply};
pub use continuation::Continuation;

use crate::vm::{Operation, Stack};

/// A deferred computation producing an `R`.
pub enum Program<R> {
    /// The computation has finished.
    Done(R),

    /// The computation is paused on an operation. The continuation receives
    /// the stack produced by that operation.
    Suspended(Operation, Continuation<R>),
}

impl<R> Program<R> {
    /// Wraps a finished value.
    pub fn done(value: R) -> Self {
        Program::Done(value)
    }

    pub fn is_done(&self) -> bool {
        matches!(self, Program::Done(_))
    }

    /// The operation this program is suspended on, if any.
    pub fn operation(&self) -> Option<&Operation> {
        match self {
            Program::Done(_) => None,
            Program::Suspended(operation, _) => Some(operation),
        }
    }
}

impl Program<Stack> {
    /// A program suspended on `operation` whose result is the stack that
    /// operation produces.
    pub fn suspend(operation: Operation) -> Self {
        Program::Suspended(operation, Continuation::identity())
    }
}

impl<R: Send + 'static> Program<R> {
    /// Transforms the eventual result. Suspension points are unchanged.
    pub fn map<S, F>(self, f: F) -> Program<S>
    where
        S: Send + 'static,
        F: Fn(R) -> S + Send + Sync + 'static,
    {
        match self {
            Program::Done(value) => Program::Done(f(value)),
            Program::Suspended(operation, continuation) => {
                Program::Suspended(operation, continuation.map(f))
            }
        }
    }

    /// Runs `self`, then the program `f` builds from its result.
    pub fn bind<S, F>(self, f: F) -> Program<S>
    where
        S: Send + 'static,
        F: Fn(R) -> Program<S> + Send + Sync + 'static,
    {
        match self {
            Program::Done(value) => f(value),
            Program::Suspended(operation, continuation) => {
                Program::Suspended(operation, continuation.bind(f))
            }
        }
    }

    /// Runs `self`, discards its result, then runs `next`.
    pub fn then<S>(self, next: Program<S>) -> Program<S>
    where
        S: Clone + Send + Sync + 'static,
    {
        match self {
            Program::Done(_) => next,
            Program::Suspended(operation, continuation) => {
                Program::Suspended(operation, continuation.then(next))
            }
        }
    }
}

impl<R: Clone> Clone for Program<R> {
    fn clone(&self) -> Self {
        match self {
            Program::Done(value) => Program::Done(value.clone()),
            Program::Suspended(operation, continuation) => {
                Program::Suspended(operation.clone(), continuation.clone())
            }
        }
    }
}

impl<R: fmt::Debug> fmt::Debug for Program<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Program::Done(value) => f.debug_tuple("Done").field(value).finish(),
            Program::Suspended(operation, continuation) => f
                .debug_tuple("Suspended")
                .field(operation)
                .field(continuation)
                .finish(),
        }
    }
}

/// Free-function form of [`Program::map`].
pub fn map<R, S, F>(program: Program<R>, f: F) -> Program<S>
where
    R: Send + 'static,
    S: Send + 'static,
    F: Fn(R) -> S + Send + Sync + 'static,
{
    program.map(f)
}

/// Free-function form of [`Program::bind`].
pub fn bind<R, S, F>(program: Program<R>, f: F) -> Program<S>
where
    R: Send + 'static,
    S: Send + 'static,
    F: Fn(R) -> Program<S> + Send + Sync + 'static,
{
    program.bind(f)
}

/// Chains programs left to right into one.
///
/// Folds with [`Program::then`] starting from `Done` of an empty stack, so
/// an empty list yields exactly that. Each program reads and writes the
/// interpreter's live stack; the value a program finishes with only matters
/// for the last one.
pub fn sequence<I>(programs: I) -> Program<Stack>
where
    I: IntoIterator<Item = Program<Stack>>,
{
    programs
        .into_iter()
        .fold(Program::Done(Stack::new()), |acc, next| acc.then(next))
}

/// Variadic form of [`sequence`].
///
/// ```
/// use stacklet_core::{program::*, sequence};
///
/// let sum3 = sequence![add(), add()];
/// assert!(!sum3.is_done());
/// assert!(sequence![].is_done());
/// ```
#[macro_export]
macro_rules! sequence {
    () => {
        $crate::program::sequence(::core::iter::empty::<
            $crate::program::Program<$crate::vm::Stack>,
        >())
    };
    ($($program:expr),+ $(,)?) => {
        $crate::program::sequence([$($program),+])
    };
}
