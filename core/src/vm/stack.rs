use core::fmt;

use ecow::EcoVec;

use crate::{Vec, values::Value};

/// An immutable, persistent value stack.
///
/// Index 0 is the top of the stack. Every operation consumes a stack and
/// returns a new one; clones share the same buffer and are copied lazily on
/// the first write, so a stack handed to somebody else never changes under
/// their feet.
///
/// Internally the top lives at the end of the buffer, which keeps `push` and
/// `pop` amortized O(1) whenever the stack is not shared.
///
/// # Examples
///
/// ```
/// use stacklet_core::{Stack, Value, stack};
///
/// let stack = stack![2, 3];
/// let pushed = stack.clone().push(Value::from(1));
///
/// assert_eq!(pushed.top(), Some(&Value::from(1)));
/// assert_eq!(pushed.len(), 3);
/// assert_eq!(stack.len(), 2);
/// ```
#[derive(Clone, Default, PartialEq)]
pub struct Stack {
    /// Bottom first, top last.
    items: EcoVec<Value>,
}

impl Stack {
    /// Creates an empty stack.
    pub fn new() -> Self {
        Self {
            items: EcoVec::new(),
        }
    }

    /// Builds a stack from values listed top first.
    pub fn from_top(values: impl IntoIterator<Item = Value>) -> Self {
        values.into_iter().collect()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Returns the top value, if any.
    #[inline]
    pub fn top(&self) -> Option<&Value> {
        self.items.last()
    }

    /// Returns the value `depth` positions below the top (0 is the top).
    pub fn get(&self, depth: usize) -> Option<&Value> {
        let len = self.items.len();
        if depth < len {
            Some(&self.items[len - 1 - depth])
        } else {
            None
        }
    }

    /// Iterates from the top of the stack down to the bottom.
    pub fn iter(&self) -> impl DoubleEndedIterator<Item = &Value> + ExactSizeIterator {
        self.items.iter().rev()
    }

    /// Returns the stack with `value` on top.
    #[inline]
    pub fn push(mut self, value: Value) -> Stack {
        self.items.push(value);
        self
    }

    /// Splits off the top value.
    ///
    /// Returns `None` when the stack is empty.
    #[inline]
    pub fn pop(mut self) -> Option<(Value, Stack)> {
        let value = self.items.pop()?;
        Some((value, self))
    }

    /// Returns the stack with its top value duplicated.
    pub fn dup(self) -> Option<Stack> {
        let top = self.top()?.clone();
        Some(self.push(top))
    }

    /// Returns the stack with its top two values exchanged.
    pub fn swap(mut self) -> Option<Stack> {
        let len = self.items.len();
        if len < 2 {
            return None;
        }
        self.items.make_mut().swap(len - 1, len - 2);
        Some(self)
    }

    /// Copies the values out, top first.
    pub fn to_vec(&self) -> Vec<Value> {
        self.iter().cloned().collect()
    }
}

impl FromIterator<Value> for Stack {
    /// Collects values listed top first.
    fn from_iter<I: IntoIterator<Item = Value>>(iter: I) -> Self {
        let mut values: Vec<Value> = iter.into_iter().collect();
        values.reverse();
        Stack {
            items: values.into_iter().collect(),
        }
    }
}

impl fmt::Display for Stack {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("[")?;
        for (i, value) in self.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{}", value)?;
        }
        f.write_str("]")
    }
}

impl fmt::Debug for Stack {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self, f)
    }
}

/// Builds a [`Stack`] from values listed top first.
///
/// ```
/// use stacklet_core::stack;
///
/// let stack = stack![1, "two", 3.0];
/// assert_eq!(stack.to_string(), r#"[1, "two", 3.0]"#);
/// ```
#[macro_export]
macro_rules! stack {
    () => {
        $crate::vm::Stack::new()
    };
    ($($value:expr),+ $(,)?) => {
        $crate::vm::Stack::from_top([$($crate::values::Value::from($value)),+])
    };
}
