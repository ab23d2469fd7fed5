//! Named, reusable programs.
//!
//! A [`Dictionary`] maps names to programs. It is plain data built by the
//! caller; the interpreter never looks words up by itself.

use hashbrown::HashMap;
use stacklet_core::{
    Program, Stack,
    program::{add, dup, mul, push},
    sequence,
};
use tracing::debug;

/// `[a, ...] -> [a * a, ...]`
pub fn squared() -> Program<Stack> {
    sequence![dup(), mul()]
}

/// `[a, b, c, ...] -> [a + b + c, ...]`
pub fn sum3() -> Program<Stack> {
    sequence![add(), add()]
}

/// Leaves `n!` on top of the stack (`1` for any `n <= 1`).
///
/// The recursive step is only expanded when evaluation reaches it, so
/// building the program is O(1) whatever `n` is.
pub fn factorial(n: i64) -> Program<Stack> {
    if n <= 1 {
        return push(1);
    }
    sequence![push(n).bind(move |_| factorial(n - 1)), mul()]
}

/// A name to program table.
#[derive(Debug, Clone, Default)]
pub struct Dictionary {
    words: HashMap<String, Program<Stack>>,
}

impl Dictionary {
    pub fn new() -> Self {
        Self::default()
    }

    /// The sample words: `squared` and `sum3`.
    pub fn standard() -> Self {
        let mut dictionary = Self::new();
        dictionary.insert("squared", squared());
        dictionary.insert("sum3", sum3());
        dictionary
    }

    /// Defines `name`, returning the program it replaces, if any.
    pub fn insert(
        &mut self,
        name: impl Into<String>,
        program: Program<Stack>,
    ) -> Option<Program<Stack>> {
        let name = name.into();
        let previous = self.words.insert(name.clone(), program);
        if previous.is_some() {
            debug!(word = %name, "Redefined word");
        }
        previous
    }

    /// Looks up `name`. The returned program is a cheap clone and can be
    /// composed freely.
    pub fn get(&self, name: &str) -> Option<Program<Stack>> {
        self.words.get(name).cloned()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.words.contains_key(name)
    }

    /// Defined names in alphabetical order.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.words.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }
}
