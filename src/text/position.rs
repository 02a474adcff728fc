use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;

/// A location in the input: byte offset plus the human readable line and column.
///
/// Positions are ordered by offset only, so `a < b` means `a` occurs earlier in the input.
///
/// # Examples
///
/// ```rust
/// use parsley::text::Position;
/// let a = Position::new(0, 1, 1);
/// let b = Position::new(4, 2, 2);
/// assert!(a < b);
/// assert_eq!(b.to_string(), "2:2");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Position {
    offset: usize,
    line: usize,
    column: usize,
}

impl Position {
    pub fn new(offset: usize, line: usize, column: usize) -> Self {
        Self {
            offset,
            line,
            column,
        }
    }

    pub fn offset(&self) -> usize {
        self.offset
    }

    pub fn line(&self) -> usize {
        self.line
    }

    pub fn column(&self) -> usize {
        self.column
    }

    /// Returns the position after `ch`, following line breaks.
    pub(crate) fn advance(self, ch: char) -> Self {
        if ch == '\n' {
            Self {
                offset: self.offset + 1,
                line: self.line + 1,
                column: 1,
            }
        } else {
            Self {
                offset: self.offset + ch.len_utf8(),
                line: self.line,
                column: self.column + 1,
            }
        }
    }
}

/// The start of the input.
impl Default for Position {
    fn default() -> Self {
        Self::new(0, 1, 1)
    }
}

impl PartialOrd for Position {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Position {
    fn cmp(&self, other: &Self) -> Ordering {
        self.offset.cmp(&other.offset)
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accessors() {
        let p = Position::new(1, 2, 3);
        assert_eq!(p.offset(), 1);
        assert_eq!(p.line(), 2);
        assert_eq!(p.column(), 3);
        assert_eq!(p.to_string(), "2:3");
    }

    #[test]
    fn test_advance_follows_lines_and_columns() {
        let p = Position::default().advance('a');
        assert_eq!(p, Position::new(1, 1, 2));
        let p = p.advance('\n');
        assert_eq!(p, Position::new(2, 2, 1));
        let p = p.advance('🍕');
        assert_eq!(p, Position::new(6, 2, 2));
    }
}
