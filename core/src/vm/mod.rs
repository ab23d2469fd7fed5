mod instruction_set;
mod stack;

pub use instruction_set::{BoxError, Operation, Transform};
pub use stack::Stack;
