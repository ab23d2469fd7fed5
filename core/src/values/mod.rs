//! Runtime values carried on the stack.
//!
//! Values are opaque to every operation except the arithmetic ones, which
//! coerce their operands to a [`Number`] first.

mod value;


pub use value::{Number, Value, ValueKind};
