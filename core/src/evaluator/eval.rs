//! Core evaluation loop.

use tracing::{debug, trace};

use crate::{
    evaluator::{EvaluatorOptions, ExecutionError, ExecutionErrorKind},
    program::Program,
    vm::Stack,
};

/// The result of a successful evaluation.
#[derive(Debug, Clone, PartialEq)]
pub struct Outcome<R> {
    /// The value the program finished with.
    pub value: R,

    /// The live stack when the program finished.
    pub stack: Stack,

    /// Number of operations executed.
    pub steps: usize,
}

/// Runs programs against a fixed initial stack.
///
/// An interpreter holds no mutable state: every call starts from a fresh
/// copy of the initial stack, so calls never observe each other and an
/// interpreter can be shared between threads.
#[derive(Debug, Clone, Default)]
pub struct Interpreter {
    initial: Stack,
    options: EvaluatorOptions,
}

/// Creates an interpreter whose evaluations start from `initial`.
///
/// `Interpreter::default()` starts from an empty stack with unlimited steps.
pub fn make_interpreter(initial: Stack) -> Interpreter {
    Interpreter::new(initial)
}

impl Interpreter {
    pub fn new(initial: Stack) -> Self {
        Self::with_options(initial, EvaluatorOptions::default())
    }

    pub fn with_options(initial: Stack, options: EvaluatorOptions) -> Self {
        Self { initial, options }
    }

    pub fn initial_stack(&self) -> &Stack {
        &self.initial
    }

    pub fn options(&self) -> &EvaluatorOptions {
        &self.options
    }

    /// Evaluates `program` and returns the value it finishes with.
    pub fn eval<R: Send + 'static>(&self, program: Program<R>) -> Result<R, ExecutionError> {
        self.run(program).map(|outcome| outcome.value)
    }

    /// Evaluates `program` and returns its value together with the final
    /// live stack.
    pub fn run<R: Send + 'static>(&self, program: Program<R>) -> Result<Outcome<R>, ExecutionError> {
        self.run_on(self.initial.clone(), program)
    }

    /// Evaluates `program` starting from `stack` instead of the initial
    /// stack.
    pub fn run_on<R: Send + 'static>(
        &self,
        stack: Stack,
        program: Program<R>,
    ) -> Result<Outcome<R>, ExecutionError> {
        let mut stack = stack;
        let mut pending = program;
        let mut steps = 0;

        loop {
            let (operation, continuation) = match pending {
                Program::Done(value) => {
                    debug!(steps, depth = stack.len(), "Evaluation finished");
                    return Ok(Outcome {
                        value,
                        stack,
                        steps,
                    });
                }
                Program::Suspended(operation, continuation) => (operation, continuation),
            };

            if let Some(limit) = self.options.max_steps {
                if steps >= limit {
                    debug!(limit, "Step limit exceeded");
                    return Err(ExecutionError::new(
                        ExecutionErrorKind::StepLimitExceeded { limit },
                        steps,
                    ));
                }
            }

            trace!(step = steps, operation = %operation, depth = stack.len(), "Executing");
            stack = match operation.execute(stack) {
                Ok(next) => next,
                Err(kind) => {
                    debug!(step = steps, error = %kind, "Evaluation failed");
                    return Err(ExecutionError::new(kind, steps));
                }
            };
            steps += 1;

            pending = continuation.resume(stack.clone());
        }
    }
}
