//! Unit tests for the evaluator.

use super::*;
use crate::{
    String, ToString, Vec,
    program::{Program, add, apply, apply_named, dup, mul, pop, push, sequence, swap, try_apply},
    stack,
    test_utils::init_test_logging,
    values::{Value, ValueKind},
    vm::{Operation, Stack, Transform},
};
use pretty_assertions::assert_eq;

fn run(program: Program<Stack>) -> Result<Stack, ExecutionError> {
    make_interpreter(Stack::new()).eval(program)
}

fn run_on(initial: Stack, program: Program<Stack>) -> Result<Stack, ExecutionError> {
    make_interpreter(initial).eval(program)
}

// ============================================================================
// Scenarios
// ============================================================================

#[test]
fn test_arithmetic_sequence() {
    init_test_logging();
    let program = crate::sequence![push(2), push(3), add(), push(4), mul()];
    assert_eq!(run(program).unwrap(), stack![20]);
}

#[test]
fn test_squared_on_initial_stack() {
    let program = crate::sequence![dup(), mul()];
    assert_eq!(run_on(stack![5], program).unwrap(), stack![25]);
}

#[test]
fn test_named_words() {
    let squared = crate::sequence![dup(), mul()];
    let sum3 = crate::sequence![add(), add()];
    let program = crate::sequence![push(5), squared, push(3), push(2), sum3];
    assert_eq!(run(program).unwrap(), stack![30]);
}

fn factorial(n: i64) -> Program<Stack> {
    if n <= 1 {
        push(1)
    } else {
        crate::sequence![push(n), factorial(n - 1), mul()]
    }
}

#[test]
fn test_factorial() {
    assert_eq!(run(factorial(5)).unwrap(), stack![120]);
    assert_eq!(run(factorial(1)).unwrap(), stack![1]);
    assert_eq!(run(factorial(20)).unwrap(), stack![2_432_902_008_176_640_000i64]);
}

#[test]
fn test_default_interpreter_starts_empty() {
    let interpreter = Interpreter::default();
    assert!(interpreter.initial_stack().is_empty());
    assert_eq!(interpreter.options().max_steps, None);
    let program = crate::sequence![push(4), dup(), mul()];
    assert_eq!(interpreter.eval(program).unwrap(), stack![16]);
}

#[test]
fn test_empty_program_is_done() {
    let outcome = make_interpreter(Stack::new()).run(crate::sequence![]).unwrap();
    assert_eq!(outcome.value, Stack::new());
    assert_eq!(outcome.steps, 0);
}

#[test]
fn test_done_value_and_live_stack_can_differ() {
    // An empty sequence finishes with an empty stack as its value, while the
    // live stack keeps what the interpreter started with.
    let outcome = make_interpreter(stack![5]).run(crate::sequence![]).unwrap();
    assert_eq!(outcome.value, Stack::new());
    assert_eq!(outcome.stack, stack![5]);
}

#[test]
fn test_outcome_counts_steps() {
    let outcome = make_interpreter(Stack::new())
        .run(crate::sequence![push(1), dup(), add()])
        .unwrap();
    assert_eq!(outcome.value, stack![2]);
    assert_eq!(outcome.stack, stack![2]);
    assert_eq!(outcome.steps, 3);
}

#[test]
fn test_swap() {
    let program = crate::sequence![push(1), push(2), swap()];
    assert_eq!(run(program).unwrap(), stack![1, 2]);
}

#[test]
fn test_apply() {
    let drop_all = apply(|_| Stack::new());
    let program = crate::sequence![push(1), push(2), drop_all, push(3)];
    assert_eq!(run(program).unwrap(), stack![3]);

    let reverse = apply_named("reverse", |stack: Stack| stack.iter().rev().cloned().collect());
    assert_eq!(run_on(stack![1, 2, 3], reverse).unwrap(), stack![3, 2, 1]);
}

#[test]
fn test_mapped_result() {
    let program = crate::sequence![push(4), dup(), mul()].map(|stack: Stack| stack.len());
    assert_eq!(make_interpreter(Stack::new()).eval(program).unwrap(), 1);
}

#[test]
fn test_bind_reads_intermediate_stack() {
    // Push as many copies of the top as its value says.
    let program = push(3).bind(|stack: Stack| {
        let count = stack.top().and_then(Value::as_int).unwrap_or(0);
        sequence((0..count).map(|_| dup()))
    });
    assert_eq!(run(program).unwrap(), stack![3, 3, 3, 3]);
}

// ============================================================================
// Independence
// ============================================================================

#[test]
fn test_calls_do_not_share_stack() {
    let interpreter = make_interpreter(stack![1]);
    let program = crate::sequence![push(10), add()];

    assert_eq!(interpreter.eval(program.clone()).unwrap(), stack![11]);
    assert_eq!(interpreter.eval(program).unwrap(), stack![11]);
    assert_eq!(interpreter.initial_stack(), &stack![1]);
}

#[test]
fn test_programs_are_reusable() {
    let squared = crate::sequence![dup(), mul()];
    let twice = crate::sequence![push(3), squared.clone(), squared.clone()];
    assert_eq!(run(twice).unwrap(), stack![81]);
    assert_eq!(run_on(stack![4], squared).unwrap(), stack![16]);
}

#[test]
fn test_interpreter_is_shareable_across_threads() {
    let interpreter = std::sync::Arc::new(make_interpreter(stack![2]));
    let handles: Vec<_> = (0..4)
        .map(|i| {
            let interpreter = interpreter.clone();
            std::thread::spawn(move || interpreter.eval(crate::sequence![push(i), mul()]))
        })
        .collect();
    let results: Vec<Stack> = handles
        .into_iter()
        .map(|handle| handle.join().unwrap().unwrap())
        .collect();
    assert_eq!(results, [stack![0], stack![2], stack![4], stack![6]]);
}

// ============================================================================
// Stack safety
// ============================================================================

#[test]
fn test_long_sequence() {
    let n = 200_000;
    let pushes = (0..n).map(|_| push(1));
    let adds = (1..n).map(|_| add());
    let program = sequence(pushes.chain(adds));
    assert_eq!(run(program).unwrap(), stack![200_000]);
}

#[test]
fn test_left_nested_binds() {
    let mut program = push(0);
    for _ in 0..100_000 {
        program = program.bind(|_| crate::sequence![push(1), add()]);
    }
    assert_eq!(run(program).unwrap(), stack![100_000]);
}

#[test]
fn test_right_nested_binds() {
    fn countdown(n: i64) -> Program<Stack> {
        if n == 0 {
            Program::Done(Stack::new())
        } else {
            push(1).bind(move |_| add().bind(move |_| countdown(n - 1)))
        }
    }
    let outcome = make_interpreter(stack![0]).run(countdown(50_000)).unwrap();
    assert_eq!(outcome.stack, stack![50_000]);
}

/// `[push 1, [push 1, [...], add], add]`, `depth` levels deep.
fn right_nested(depth: usize) -> Program<Stack> {
    let mut program = push(1);
    for _ in 0..depth {
        program = crate::sequence![push(1), program, add()];
    }
    program
}

#[test]
fn test_right_nested_sequences() {
    assert_eq!(run(right_nested(100_000)).unwrap(), stack![100_001]);
}

#[test]
fn test_drop_deep_program_without_running() {
    let program = right_nested(100_000);
    let copy = program.clone();
    drop(program);
    assert_eq!(run(copy).unwrap(), stack![100_001]);

    drop(right_nested(100_000));
}

#[test]
fn test_underflow_in_front_of_deep_tail() {
    let err = run(crate::sequence![pop(), right_nested(100_000)]).unwrap_err();
    assert_eq!(err.step, 0);
    assert!(err.is_stack_underflow());
}

#[test]
fn test_step_limit_with_deep_tail() {
    let options = EvaluatorOptions {
        max_steps: Some(10),
    };
    let interpreter = Interpreter::with_options(Stack::new(), options);
    let err = interpreter.eval(right_nested(100_000)).unwrap_err();
    assert_eq!(err.step, 10);
    assert!(matches!(
        err.kind,
        ExecutionErrorKind::StepLimitExceeded { limit: 10 }
    ));
}

// ============================================================================
// Errors
// ============================================================================

#[test]
fn test_pop_on_empty_stack() {
    let err = run(pop()).unwrap_err();
    assert!(err.is_stack_underflow());
    assert_eq!(err.step, 0);
    assert!(matches!(
        err.kind,
        ExecutionErrorKind::StackUnderflow {
            operation: "pop",
            required: 1,
            found: 0,
        }
    ));
}

#[test]
fn test_underflow_reports_step() {
    let err = run(crate::sequence![push(1), push(2), add(), add()]).unwrap_err();
    assert_eq!(err.step, 3);
    assert!(matches!(
        err.kind,
        ExecutionErrorKind::StackUnderflow {
            operation: "add",
            required: 2,
            found: 1,
        }
    ));
}

#[test]
fn test_dup_and_swap_underflow() {
    assert!(run(dup()).unwrap_err().is_stack_underflow());
    assert!(run(crate::sequence![push(1), swap()]).unwrap_err().is_stack_underflow());
}

#[test]
fn test_type_mismatch() {
    let err = run(crate::sequence![push("a"), push(1), add()]).unwrap_err();
    assert!(err.is_type_mismatch());
    assert!(matches!(
        err.kind,
        ExecutionErrorKind::TypeMismatch {
            operation: "add",
            found: ValueKind::Str,
            depth: 2,
        }
    ));
}

#[derive(Debug, PartialEq)]
struct Refused(&'static str);

impl core::fmt::Display for Refused {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "refused: {}", self.0)
    }
}

impl core::error::Error for Refused {}

#[test]
fn test_apply_failure_is_propagated_unchanged() {
    let failing = try_apply(|_: Stack| Err::<Stack, _>(Refused("nope")));
    let err = run(crate::sequence![push(1), failing, push(2)]).unwrap_err();
    assert_eq!(err.step, 1);

    let source = err.into_transform_error().expect("expected a transform error");
    assert_eq!(source.downcast_ref::<Refused>(), Some(&Refused("nope")));
}

#[test]
fn test_error_messages() {
    let err = run(pop()).unwrap_err();
    assert_eq!(
        err.to_string(),
        "stack underflow: `pop` needs 1 value(s) but the stack holds 0 (at step 0)"
    );

    let failing = try_apply(|_: Stack| Err::<Stack, _>(String::from("bad input")));
    let err = run(crate::sequence![push(1), failing]).unwrap_err();
    assert_eq!(
        err.kind.to_string(),
        "transform `<anonymous>` failed (stack depth 1)"
    );
}

#[test]
fn test_named_transform_in_error() {
    let validate = Transform::fallible(|_: Stack| Err::<Stack, _>(String::from("x"))).named("validate");
    let program = crate::sequence![push(1), Program::suspend(Operation::Apply(validate))];
    let err = run(program).unwrap_err();
    assert_eq!(err.step, 1);
    assert!(matches!(
        &err.kind,
        ExecutionErrorKind::ApplyFailure { transform: Some(name), depth: 1, .. } if name.as_str() == "validate"
    ));
    assert_eq!(err.kind.to_string(), "transform `validate` failed (stack depth 1)");
}

#[test]
fn test_step_limit() {
    let options = EvaluatorOptions {
        max_steps: Some(3),
    };
    let interpreter = Interpreter::with_options(Stack::new(), options);

    let within = crate::sequence![push(1), push(2), add()];
    assert_eq!(interpreter.eval(within).unwrap(), stack![3]);

    let beyond = crate::sequence![push(1), push(2), add(), dup()];
    let err = interpreter.eval(beyond).unwrap_err();
    assert_eq!(err.step, 3);
    assert!(matches!(
        err.kind,
        ExecutionErrorKind::StepLimitExceeded { limit: 3 }
    ));
}
