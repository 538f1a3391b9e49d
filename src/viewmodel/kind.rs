//! Kind keys: the variant of an enum value, ignoring its payload.

use std::collections::HashSet;
use std::fmt;
use std::mem::Discriminant;

/// Kind key of a value.
pub type Kind<T> = Discriminant<T>;

/// Kind of `value`. `Search("a")` and `Search("b")` share a kind.
pub fn kind_of<T>(value: &T) -> Kind<T> {
    std::mem::discriminant(value)
}

/// Set of kinds built from representative values.
pub struct KindSet<T> {
    kinds: HashSet<Kind<T>>,
}

impl<T> KindSet<T> {
    pub fn new() -> Self {
        Self {
            kinds: HashSet::new(),
        }
    }

    pub fn insert(&mut self, value: &T) -> bool {
        self.kinds.insert(kind_of(value))
    }

    /// Whether the kind of `value` is in the set.
    pub fn contains(&self, value: &T) -> bool {
        self.kinds.contains(&kind_of(value))
    }

    pub fn contains_kind(&self, kind: &Kind<T>) -> bool {
        self.kinds.contains(kind)
    }
}

impl<T> Default for KindSet<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> FromIterator<T> for KindSet<T> {
    fn from_iter<It: IntoIterator<Item = T>>(iter: It) -> Self {
        let mut set = Self::new();
        for value in iter {
            set.insert(&value);
        }
        set
    }
}

impl<T> fmt::Debug for KindSet<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.kinds.iter()).finish()
    }
}
