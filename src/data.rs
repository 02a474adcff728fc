//! Persistent collections threaded through a parse.
//!
//! Both types are cheap to clone (structural sharing via `im`), which lets every branch of a
//! parse extend its own copy without touching its siblings'.

use im::{HashMap, OrdSet};

/// Identities of parsers that were cut short by left-recursion curtailment.
///
/// This is provenance, not failure: callers union the sets of every sub-call they make and
/// pass the result upwards.
///
/// ```rust
/// use parsley::data::CurtailingParsers;
/// let a = CurtailingParsers::of(1);
/// let b = CurtailingParsers::from_iter([2, 1]);
/// let all = a.union(b);
/// assert_eq!(all.iter().collect::<Vec<_>>(), vec![1, 2]);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CurtailingParsers(OrdSet<usize>);

impl CurtailingParsers {
    pub fn new() -> Self {
        Self::default()
    }

    /// A set holding a single parser identity.
    pub fn of(id: usize) -> Self {
        Self(OrdSet::unit(id))
    }

    pub fn union(self, other: Self) -> Self {
        Self(self.0.union(other.0))
    }

    pub fn insert(&mut self, id: usize) {
        self.0.insert(id);
    }

    pub fn contains(&self, id: usize) -> bool {
        self.0.contains(&id)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Identities in ascending order.
    pub fn iter(&self) -> impl Iterator<Item = usize> + '_ {
        self.0.iter().copied()
    }
}

impl FromIterator<usize> for CurtailingParsers {
    fn from_iter<I: IntoIterator<Item = usize>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// Recursion depth per parser identity at the current input position.
///
/// Never mutated in place: [`LeftRecCtx::inc`] returns an extended copy, and a branch that
/// consumes input starts over with an empty context.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LeftRecCtx(HashMap<usize, usize>);

impl LeftRecCtx {
    pub fn new() -> Self {
        Self::default()
    }

    /// Depth recorded for `id`, zero if it has not recursed here yet.
    pub fn get(&self, id: usize) -> usize {
        self.0.get(&id).copied().unwrap_or(0)
    }

    /// Returns a copy with the depth of `id` incremented.
    pub fn inc(&self, id: usize) -> Self {
        Self(self.0.update(id, self.get(id) + 1))
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}
