//! Position-tracked, cheaply clonable cursor over a text buffer.
//!
//! A [`Reader`] is a snapshot: cloning it shares the buffer and copies the cursor, so every
//! branch of a parse can advance its own copy without disturbing its siblings.

use std::fmt;
use std::rc::Rc;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::text::Position;

/// Options applied when a [`Reader`] is created.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReaderOptions {
    /// Skip whitespace before every match and ignore leading/trailing whitespace of the input.
    pub ignore_whitespace: bool,
}

impl Default for ReaderOptions {
    fn default() -> Self {
        Self {
            ignore_whitespace: true,
        }
    }
}

#[derive(Clone)]
pub struct Reader {
    text: Rc<str>,
    end: usize,
    cursor: Position,
    ignore_whitespace: bool,
}

impl Reader {
    /// Creates a reader at the start of `text`.
    ///
    /// ```rust
    /// use parsley::text::Reader;
    /// let r = Reader::new(" \r\n\t foo\r\n\t ", true);
    /// assert_eq!(r.remaining(), 3);
    /// assert_eq!(r.peek_char(), Some('f'));
    /// ```
    pub fn new(text: impl Into<Rc<str>>, ignore_whitespace: bool) -> Self {
        let text = text.into();
        let end = if ignore_whitespace {
            text.trim_end().len()
        } else {
            text.len()
        };
        let mut reader = Self {
            text,
            end,
            cursor: Position::default(),
            ignore_whitespace,
        };
        if ignore_whitespace {
            reader.skip_whitespace();
        }
        reader
    }

    pub fn with_options(text: impl Into<Rc<str>>, options: ReaderOptions) -> Self {
        Self::new(text, options.ignore_whitespace)
    }

    /// The current position.
    pub fn cursor(&self) -> Position {
        self.cursor
    }

    /// Number of bytes left before the end of the readable input.
    pub fn remaining(&self) -> usize {
        self.end.saturating_sub(self.cursor.offset())
    }

    pub fn is_eof(&self) -> bool {
        self.remaining() == 0
    }

    pub fn ignores_whitespace(&self) -> bool {
        self.ignore_whitespace
    }

    /// The whole underlying text.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Returns a snapshot of this reader moved to `pos`.
    pub fn with_cursor(&self, pos: Position) -> Self {
        Self {
            cursor: pos,
            ..self.clone()
        }
    }

    /// Returns the next character without consuming it.
    pub fn peek_char(&self) -> Option<char> {
        self.rest().chars().next()
    }

    /// Consumes one character, whitespace included.
    pub fn read_char(&mut self) -> Option<char> {
        let ch = self.peek_char()?;
        self.cursor = self.cursor.advance(ch);
        Some(ch)
    }

    /// Consumes `ch` if it is the next character (after optional whitespace).
    ///
    /// Returns the position where the character starts.
    pub fn read_rune(&mut self, ch: char) -> Option<Position> {
        let mut next = self.skipped();
        let pos = next.cursor;
        if next.read_char()? != ch {
            return None;
        }
        *self = next;
        Some(pos)
    }

    /// Consumes `word` if the input continues with it (after optional whitespace).
    ///
    /// A word ending in an identifier character must not be followed by another identifier
    /// character, so `"true"` does not match the start of `"trueish"`.
    pub fn read_word(&mut self, word: &str) -> Option<Position> {
        let mut next = self.skipped();
        let pos = next.cursor;
        if word.is_empty() || !next.rest().starts_with(word) {
            return None;
        }
        next.advance_bytes(word.len());
        let ends_in_ident = word.chars().last().is_some_and(is_ident_char);
        if ends_in_ident && next.peek_char().is_some_and(is_ident_char) {
            return None;
        }
        *self = next;
        Some(pos)
    }

    /// Matches `re` at the cursor (after optional whitespace) and consumes the match.
    ///
    /// Returns the start of the match and the whole match followed by every capture group;
    /// groups that did not participate are empty strings. Only matches that start exactly at
    /// the cursor count, so patterns should be built with [`anchored`].
    pub fn read_match(&mut self, re: &Regex) -> Option<(Position, Vec<String>)> {
        let mut next = self.skipped();
        let pos = next.cursor;
        let (len, groups) = {
            let caps = re.captures(next.rest())?;
            let whole = caps.get(0)?;
            if whole.start() != 0 {
                return None;
            }
            let groups = caps
                .iter()
                .map(|g| g.map_or_else(String::new, |g| g.as_str().to_string()))
                .collect::<Vec<_>>();
            (whole.end(), groups)
        };
        next.advance_bytes(len);
        *self = next;
        Some((pos, groups))
    }

    /// Where the next token would start: the cursor, after whitespace if it is ignored.
    pub fn token_pos(&self) -> Position {
        self.skipped().cursor
    }

    /// Consumes whitespace at the cursor.
    pub fn skip_whitespace(&mut self) {
        while let Some(ch) = self.peek_char() {
            if !ch.is_whitespace() {
                break;
            }
            self.cursor = self.cursor.advance(ch);
        }
    }

    // ------------------------------------------------------------------------
    // Cursor helpers
    // ------------------------------------------------------------------------

    /// Copy of this reader with whitespace skipped, if whitespace is ignored.
    fn skipped(&self) -> Self {
        let mut next = self.clone();
        if next.ignore_whitespace {
            next.skip_whitespace();
        }
        next
    }

    fn rest(&self) -> &str {
        self.text
            .get(self.cursor.offset()..self.end)
            .unwrap_or_default()
    }

    fn advance_bytes(&mut self, len: usize) {
        let target = self.cursor.offset() + len;
        while self.cursor.offset() < target {
            match self.read_char() {
                Some(_) => {}
                None => break,
            }
        }
    }
}

fn is_ident_char(ch: char) -> bool {
    ch.is_alphanumeric() || ch == '_'
}

/// Compiles `pattern` so it only matches at the start of the haystack.
///
/// ```rust
/// use parsley::text::{anchored, Reader};
/// let re = anchored("[a-z]+").unwrap();
/// let mut r = Reader::new("123abc", true);
/// assert!(r.read_match(&re).is_none());
/// ```
pub fn anchored(pattern: &str) -> Result<Regex, regex::Error> {
    Regex::new(&format!(r"\A(?:{pattern})"))
}

impl fmt::Debug for Reader {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Reader")
            .field("cursor", &self.cursor)
            .field("remaining", &self.remaining())
            .finish()
    }
}

impl fmt::Display for Reader {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Reader{{{}, remaining: {}}}", self.cursor, self.remaining())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_cursor(r: &Reader, offset: usize, line: usize, column: usize) {
        assert_eq!(r.cursor(), Position::new(offset, line, column));
    }

    #[test]
    fn test_empty_reader() {
        let mut r = Reader::new("", true);
        assert_cursor(&r, 0, 1, 1);
        assert_eq!(r.remaining(), 0);
        assert!(r.is_eof());
        assert_eq!(r.read_char(), None);
    }

    #[test]
    fn test_keeps_whitespace_if_not_ignored() {
        let mut r = Reader::new(" \r\n\t foo\r\n\t ", false);
        assert_eq!(r.remaining(), 12);
        assert_eq!(r.read_char(), Some(' '));
    }

    #[test]
    fn test_clone_is_independent_snapshot() {
        let re = anchored(r"ab\nc").unwrap();
        let mut r = Reader::new("ab\ncd\nef", true);
        r.read_match(&re).unwrap();
        let mut rc = r.clone();
        assert_eq!(r.cursor(), rc.cursor());

        rc.read_match(&anchored(r"d\nef").unwrap()).unwrap();

        assert_eq!(r.remaining(), 4);
        assert_eq!(rc.remaining(), 0);
        assert_cursor(&r, 4, 2, 2);
        assert_cursor(&rc, 8, 3, 3);
        assert!(!r.is_eof());
        assert!(rc.is_eof());
    }

    #[test]
    fn test_read_char_handles_multibyte() {
        let mut r = Reader::new("🍕", true);
        assert_eq!(r.read_char(), Some('🍕'));
        assert_cursor(&r, 4, 1, 2);
    }

    #[test]
    fn test_read_char_follows_lines() {
        let mut r = Reader::new("a\nb", true);
        r.read_char();
        assert_cursor(&r, 1, 1, 2);
        r.read_char();
        assert_cursor(&r, 2, 2, 1);
        r.read_char();
        assert_cursor(&r, 3, 2, 2);
    }

    #[test]
    fn test_read_match_returns_groups() {
        let re = anchored(r"(\d+)([a-z]+)([A-Z]+)").unwrap();
        let mut r = Reader::new("123abcDEF", true);
        let (pos, groups) = r.read_match(&re).unwrap();
        assert_eq!(groups, vec!["123abcDEF", "123", "abc", "DEF"]);
        assert_eq!(pos, Position::new(0, 1, 1));
    }

    #[test]
    fn test_read_match_skips_whitespace_if_set() {
        let mut r = Reader::new("x \r\n\tabc", true);
        r.read_char();
        let (pos, groups) = r.read_match(&anchored("[a-z]+").unwrap()).unwrap();
        assert_eq!(groups, vec!["abc"]);
        assert_eq!(pos, Position::new(5, 2, 2));
        assert_cursor(&r, 8, 2, 5);
    }

    #[test]
    fn test_read_match_keeps_whitespace_if_not_set() {
        let mut r = Reader::new(" \r\n\tabc", false);
        assert!(r.read_match(&anchored("[a-z]+").unwrap()).is_none());
        assert_cursor(&r, 0, 1, 1);
        let (pos, _) = r.read_match(&anchored(r"\s+[a-z]+").unwrap()).unwrap();
        assert_eq!(pos, Position::new(0, 1, 1));
    }

    #[test]
    fn test_read_word_respects_boundaries() {
        let mut r = Reader::new("trueish true", true);
        assert!(r.read_word("true").is_none());
        let mut r = r.with_cursor(Position::new(8, 1, 9));
        assert_eq!(r.read_word("true"), Some(Position::new(8, 1, 9)));
        assert!(r.is_eof());
    }

    #[test]
    fn test_read_rune() {
        let mut r = Reader::new("  , x", true);
        assert_eq!(r.read_rune(','), Some(Position::new(2, 1, 3)));
        assert_eq!(r.read_rune(','), None);
        assert_cursor(&r, 3, 1, 4);
    }

    #[test]
    fn test_with_cursor() {
        let r = Reader::new("abcd", true);
        let r2 = r.with_cursor(Position::new(3, 1, 4));
        assert_eq!(r2.cursor(), Position::new(3, 1, 4));
        assert_eq!(r2.remaining(), 1);
        assert_eq!(r.remaining(), 4);
    }
}
