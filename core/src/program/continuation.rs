//! Continuations as type-erased arrow queues.
//!
//! Composing continuations as nested closures makes every `bind` on a long
//! chain re-enter all the closures below it, which costs quadratic time and
//! native stack proportional to the chain length. Instead a continuation
//! keeps a flat queue of arrows (`value -> step`). `map` and `bind` push one
//! arrow onto the back; resuming pops arrows from the front in a loop until
//! one of them suspends, then splices that program's own queue in front of
//! what is left.
//!
//! Values travel between arrows boxed as `dyn Any`. The typed
//! [`Continuation<R>`] wrapper guarantees that the last arrow produces an
//! `R` and that every arrow receives what its predecessor produced.
//!
//! Programs chained with `then` are kept as data ([`Arrow::Then`]) rather
//! than captured by a closure, so a deeply nested chain can be torn down
//! with a worklist instead of one native frame per level.

use alloc::{collections::VecDeque, sync::Arc};
use core::{any::Any, fmt, marker::PhantomData, mem};

use crate::{
    Box, Vec,
    program::Program,
    vm::{Operation, Stack},
};

type Erased = Box<dyn Any + Send>;

type Arrows = Arc<VecDeque<Arrow>>;

#[derive(Clone)]
enum Arrow {
    /// `value -> step`, built by `map` and `bind`.
    Call(Arc<dyn Fn(Erased) -> Step + Send + Sync>),

    /// Ignores the value and continues with a fixed program.
    Then(Arc<Successor>),
}

impl Arrow {
    fn call(&self, value: Erased) -> Step {
        match self {
            Arrow::Call(f) => f(value),
            Arrow::Then(successor) => match &**successor {
                Successor::Done(make) => Step::Done(make()),
                Successor::Suspended(operation, arrows) => {
                    Step::Suspended(operation.clone(), arrows.clone())
                }
            },
        }
    }
}

/// An untyped [`Program`] held by a `then` arrow.
enum Successor {
    /// Produces a fresh copy of the finished value on every run.
    Done(Box<dyn Fn() -> Erased + Send + Sync>),
    Suspended(Operation, Arrows),
}

impl Successor {
    fn from_program<S: Clone + Send + Sync + 'static>(program: Program<S>) -> Self {
        match program {
            Program::Done(value) => {
                Successor::Done(Box::new(move || -> Erased { Box::new(value.clone()) }))
            }
            Program::Suspended(operation, continuation) => {
                Successor::Suspended(operation, continuation.arrows)
            }
        }
    }
}

impl Drop for Successor {
    // Nested successors are unlinked onto a worklist, so dropping a program
    // built from deeply nested `then` chains uses constant native stack.
    fn drop(&mut self) {
        let Successor::Suspended(_, arrows) = self else {
            return;
        };
        if arrows.is_empty() {
            return;
        }
        let mut pending: Vec<Arrows> = Vec::new();
        pending.push(mem::take(arrows));
        while let Some(queue) = pending.pop() {
            let Ok(queue) = Arc::try_unwrap(queue) else {
                continue;
            };
            for arrow in queue {
                let Arrow::Then(successor) = arrow else {
                    continue;
                };
                let Ok(mut successor) = Arc::try_unwrap(successor) else {
                    continue;
                };
                if let Successor::Suspended(_, inner) = &mut successor {
                    pending.push(mem::take(inner));
                }
            }
        }
    }
}

/// An untyped [`Program`].
enum Step {
    Done(Erased),
    Suspended(Operation, Arrows),
}

impl Step {
    fn from_program<R: Send + 'static>(program: Program<R>) -> Self {
        match program {
            Program::Done(value) => Step::Done(Box::new(value)),
            Program::Suspended(operation, continuation) => {
                Step::Suspended(operation, continuation.arrows)
            }
        }
    }
}

fn unerase<R: 'static>(value: Erased) -> R {
    match value.downcast::<R>() {
        Ok(value) => *value,
        Err(_) => unreachable!(
            "continuation arrow received a value of the wrong type: {}",
            core::any::type_name::<R>()
        ),
    }
}

/// The rest of a program after a suspended operation.
///
/// Cloning is O(1); the arrow queue is shared until one of the clones is
/// resumed or extended.
pub struct Continuation<R> {
    arrows: Arrows,
    _result: PhantomData<fn() -> R>,
}

impl<R> Continuation<R> {
    fn from_arrows(arrows: Arrows) -> Self {
        Self {
            arrows,
            _result: PhantomData,
        }
    }

    fn push<S>(mut self, arrow: Arrow) -> Continuation<S> {
        Arc::make_mut(&mut self.arrows).push_back(arrow);
        Continuation::from_arrows(self.arrows)
    }

    /// Number of pending arrows. Only meaningful for diagnostics.
    pub fn len(&self) -> usize {
        self.arrows.len()
    }

    /// `true` for the identity continuation.
    pub fn is_empty(&self) -> bool {
        self.arrows.is_empty()
    }
}

impl Continuation<Stack> {
    /// The continuation `stack -> Done(stack)`.
    pub fn identity() -> Self {
        Self::from_arrows(Arc::new(VecDeque::new()))
    }
}

impl<R: Send + 'static> Continuation<R> {
    pub(super) fn map<S, F>(self, f: F) -> Continuation<S>
    where
        S: Send + 'static,
        F: Fn(R) -> S + Send + Sync + 'static,
    {
        self.push(Arrow::Call(Arc::new(move |value: Erased| {
            Step::Done(Box::new(f(unerase::<R>(value))))
        })))
    }

    pub(super) fn bind<S, F>(self, f: F) -> Continuation<S>
    where
        S: Send + 'static,
        F: Fn(R) -> Program<S> + Send + Sync + 'static,
    {
        self.push(Arrow::Call(Arc::new(move |value: Erased| {
            Step::from_program(f(unerase::<R>(value)))
        })))
    }

    pub(super) fn then<S>(self, next: Program<S>) -> Continuation<S>
    where
        S: Clone + Send + Sync + 'static,
    {
        self.push(Arrow::Then(Arc::new(Successor::from_program(next))))
    }

    /// Feeds the stack produced by the suspended operation into the
    /// continuation and returns the next program.
    ///
    /// Arrows that finish immediately are run in a loop, so this returns
    /// either the final value or the next suspended operation.
    pub fn resume(self, stack: Stack) -> Program<R> {
        let mut arrows = self.arrows;
        let mut value: Erased = Box::new(stack);
        loop {
            let next = if arrows.is_empty() {
                None
            } else {
                Arc::make_mut(&mut arrows).pop_front()
            };
            let Some(arrow) = next else {
                return Program::Done(unerase::<R>(value));
            };
            match arrow.call(value) {
                Step::Done(result) => value = result,
                Step::Suspended(operation, inner) => {
                    let arrows = splice(inner, arrows);
                    return Program::Suspended(operation, Continuation::from_arrows(arrows));
                }
            }
        }
    }
}

/// Returns `front` followed by `back`.
///
/// A uniquely owned queue is extended in place and the arrows of the other
/// side are copied into it, so the cost is the length of the copied side.
/// When both or neither queue is shared, the shorter one is copied.
fn splice(mut front: Arrows, mut back: Arrows) -> Arrows {
    if front.is_empty() {
        return back;
    }
    if back.is_empty() {
        return front;
    }
    let front_unique = Arc::get_mut(&mut front).is_some();
    let back_unique = Arc::get_mut(&mut back).is_some();
    let extend_front = match (front_unique, back_unique) {
        (true, false) => true,
        (false, true) => false,
        _ => front.len() > back.len(),
    };
    if extend_front {
        Arc::make_mut(&mut front).extend(back.iter().cloned());
        front
    } else {
        let queue = Arc::make_mut(&mut back);
        for arrow in front.iter().rev() {
            queue.push_front(arrow.clone());
        }
        back
    }
}

impl<R> Clone for Continuation<R> {
    fn clone(&self) -> Self {
        Self::from_arrows(self.arrows.clone())
    }
}

impl<R> fmt::Debug for Continuation<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Continuation({} pending)", self.arrows.len())
    }
}
