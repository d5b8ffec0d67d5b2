//! Shared ordered training corpus.

use std::cell::RefCell;
use std::rc::Rc;

/// Ordered collection of training strings with shared ownership.
///
/// Cloning a `Dataset` produces another handle to the same underlying
/// sequence: appends through one handle are immediately visible through all
/// of them. Entries are appended in insertion order and never removed.
///
/// Deliberately not `Send`: the training core is single-threaded, and the
/// handle type enforces that at compile time.
#[derive(Debug, Clone, Default)]
pub struct Dataset {
    strings: Rc<RefCell<Vec<String>>>,
}

impl Dataset {
    /// Creates an empty dataset.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a dataset holding the given strings.
    pub fn from_strings(strings: Vec<String>) -> Self {
        Self {
            strings: Rc::new(RefCell::new(strings)),
        }
    }

    /// Replaces the contents wholesale, visible through every handle.
    pub fn replace(&self, strings: Vec<String>) {
        *self.strings.borrow_mut() = strings;
    }

    /// Appends one string.
    pub fn push(&self, string: impl Into<String>) {
        self.strings.borrow_mut().push(string.into());
    }

    /// Appends many strings, preserving their order.
    pub fn extend<I>(&self, strings: I)
    where
        I: IntoIterator,
        I::Item: Into<String>,
    {
        self.strings
            .borrow_mut()
            .extend(strings.into_iter().map(Into::into));
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.strings.borrow().len()
    }

    /// True when the dataset holds no entries.
    pub fn is_empty(&self) -> bool {
        self.strings.borrow().is_empty()
    }

    /// The entry at `index`, if present.
    pub fn get(&self, index: usize) -> Option<String> {
        self.strings.borrow().get(index).cloned()
    }

    /// A copy of the full sequence, for checkpointing.
    pub fn to_vec(&self) -> Vec<String> {
        self.strings.borrow().clone()
    }
}
