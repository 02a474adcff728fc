use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};

use crate::parser::ResultSet;

static NEXT_KEY: AtomicUsize = AtomicUsize::new(0);

/// Process-unique key of a parser instance, fixed when the parser is constructed.
///
/// Keys only distinguish instances; the small identities used for curtailment are handed out
/// by a [`History`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ParserKey(usize);

impl ParserKey {
    pub fn next() -> Self {
        Self(NEXT_KEY.fetch_add(1, Ordering::Relaxed))
    }
}

/// Per-evaluation registry of parser identities, a call counter and the results each
/// recursive parser has found so far at each offset.
///
/// Owned by the caller and passed to every [`Parser::parse`](crate::parser::Parser::parse)
/// call. Reset it (or make a new one) before reusing a grammar for another input.
///
/// ```rust
/// use parsley::parser::{History, ParserKey};
/// let (a, b) = (ParserKey::next(), ParserKey::next());
/// let mut h = History::new();
/// assert_eq!(h.register_parser(b), 0);
/// assert_eq!(h.register_parser(a), 1);
/// assert_eq!(h.register_parser(b), 0);
/// ```
#[derive(Debug, Default)]
pub struct History {
    ids: HashMap<ParserKey, usize>,
    calls: usize,
    grown: HashMap<(usize, usize), ResultSet>,
}

impl History {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the identity of `key`, assigning the next free one on first use.
    pub fn register_parser(&mut self, key: ParserKey) -> usize {
        let next = self.ids.len();
        *self.ids.entry(key).or_insert(next)
    }

    pub fn register_call(&mut self) {
        self.calls += 1;
    }

    /// Total parser invocations since creation or the last reset.
    pub fn call_count(&self) -> usize {
        self.calls
    }

    /// Merges `results` of parser `id` at `offset` with every result it found there before,
    /// remembers the union and returns it.
    ///
    /// On equal end positions the new result is kept. Successive passes of a curtailed left
    /// recursion therefore only ever add end positions.
    pub fn grow_results(&mut self, id: usize, offset: usize, results: ResultSet) -> ResultSet {
        let known = self.grown.entry((id, offset)).or_default();
        let mut merged = results;
        merged.append(known.clone());
        *known = merged.clone();
        merged
    }

    /// Forgets the results remembered by [`History::grow_results`].
    ///
    /// They are only valid for the input they were found in.
    pub fn forget_results(&mut self) {
        self.grown.clear();
    }

    pub fn reset(&mut self) {
        self.ids.clear();
        self.calls = 0;
        self.grown.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::ParseResult;
    use crate::text::{Position, Reader};

    #[test]
    fn test_reset_forgets_identities_and_calls() {
        let (a, b) = (ParserKey::next(), ParserKey::next());
        let mut h = History::new();
        h.register_parser(a);
        h.register_call();
        h.register_call();
        assert_eq!(h.call_count(), 2);

        h.reset();
        assert_eq!(h.call_count(), 0);
        assert_eq!(h.register_parser(b), 0);
    }

    fn ends_at(r: &Reader, ends: &[usize]) -> ResultSet {
        ends.iter()
            .map(|&end| ParseResult::new(None, r.with_cursor(Position::new(end, 1, end + 1))))
            .collect()
    }

    fn offsets(set: &ResultSet) -> Vec<usize> {
        set.iter().map(|r| r.end().offset()).collect()
    }

    #[test]
    fn test_grow_results_accumulates_per_parser_and_offset() {
        let r = Reader::new("abcdef", false);
        let mut h = History::new();
        assert_eq!(offsets(&h.grow_results(0, 0, ends_at(&r, &[1]))), vec![1]);
        assert_eq!(offsets(&h.grow_results(0, 0, ends_at(&r, &[3]))), vec![1, 3]);
        assert_eq!(offsets(&h.grow_results(0, 0, ResultSet::new())), vec![1, 3]);
        assert_eq!(offsets(&h.grow_results(1, 0, ends_at(&r, &[2]))), vec![2]);
        assert_eq!(offsets(&h.grow_results(0, 2, ends_at(&r, &[4]))), vec![4]);

        h.forget_results();
        assert!(h.grow_results(0, 0, ResultSet::new()).is_empty());
    }
}
