//! Parse results.
//!
//! A [`ParseResult`] is one way a parser matched: the node it built (if any) and the reader
//! snapshot right after the match. A [`ResultSet`] holds every such continuation of one parser
//! call, at most one per end position.

use crate::ast::Node;
use crate::text::{Position, Reader};

#[derive(Debug, Clone)]
pub struct ParseResult {
    node: Option<Node>,
    reader: Reader,
}

impl ParseResult {
    /// A result without a node matched the empty string (or only noise) up to `reader`.
    pub fn new(node: Option<Node>, reader: Reader) -> Self {
        Self { node, reader }
    }

    pub fn node(&self) -> Option<&Node> {
        self.node.as_ref()
    }

    pub fn reader(&self) -> &Reader {
        &self.reader
    }

    /// Where the match ends.
    pub fn end(&self) -> Position {
        self.reader.cursor()
    }

    pub fn into_parts(self) -> (Option<Node>, Reader) {
        (self.node, self.reader)
    }

    pub fn into_set(self) -> ResultSet {
        ResultSet(vec![self])
    }
}

/// Results ordered by ascending end position, no two ending at the same position.
#[derive(Debug, Clone, Default)]
pub struct ResultSet(Vec<ParseResult>);

impl ResultSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds `result` unless a result ending at the same position is already present.
    ///
    /// ```rust
    /// use parsley::parser::{ParseResult, ResultSet};
    /// use parsley::text::Reader;
    /// let r = Reader::new("ab", true);
    /// let mut set = ResultSet::new();
    /// assert!(set.insert(ParseResult::new(None, r.clone())));
    /// assert!(!set.insert(ParseResult::new(None, r)));
    /// assert_eq!(set.len(), 1);
    /// ```
    pub fn insert(&mut self, result: ParseResult) -> bool {
        let end = result.end().offset();
        match self.0.binary_search_by_key(&end, |r| r.end().offset()) {
            Ok(_) => false,
            Err(i) => {
                self.0.insert(i, result);
                true
            }
        }
    }

    /// Inserts every result of `other`, keeping ours on equal end positions.
    pub fn append(&mut self, other: ResultSet) {
        for result in other {
            self.insert(result);
        }
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ParseResult> {
        self.0.iter()
    }

    /// The result ending earliest.
    pub fn first(&self) -> Option<&ParseResult> {
        self.0.first()
    }

    /// The result ending furthest.
    pub fn last(&self) -> Option<&ParseResult> {
        self.0.last()
    }
}

impl IntoIterator for ResultSet {
    type Item = ParseResult;
    type IntoIter = std::vec::IntoIter<ParseResult>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a> IntoIterator for &'a ResultSet {
    type Item = &'a ParseResult;
    type IntoIter = std::slice::Iter<'a, ParseResult>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl FromIterator<ParseResult> for ResultSet {
    fn from_iter<I: IntoIterator<Item = ParseResult>>(iter: I) -> Self {
        let mut set = ResultSet::new();
        for result in iter {
            set.insert(result);
        }
        set
    }
}

impl From<ParseResult> for ResultSet {
    fn from(result: ParseResult) -> Self {
        result.into_set()
    }
}
