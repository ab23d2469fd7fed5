#![allow(dead_code)]

use stacklet::{ExecutionError, Program, Stack, make_interpreter};

pub fn run(program: Program<Stack>) -> Result<Stack, ExecutionError> {
    run_on(Stack::new(), program)
}

pub fn run_on(initial: Stack, program: Program<Stack>) -> Result<Stack, ExecutionError> {
    make_interpreter(initial).eval(program)
}
