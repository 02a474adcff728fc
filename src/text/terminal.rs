//! # Terminal matchers
//!
//! Leaf parsers over a text [`Reader`]. A terminal either matches once, returning a single
//! [`TerminalNode`], or does not match at all, returning an empty set and no error. The only
//! errors they report are for input that is recognisably the right token but malformed (an
//! integer literal that does not fit, a string with a bad escape).
//!
//! Matchers built from caller-supplied words or patterns return `Result`, so a malformed
//! grammar is rejected while it is assembled.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::ast::{TerminalNode, Value};
use crate::parser::{FnParser, ParseOutcome, ParseResult};
use crate::text::{anchored, Position, Reader};
use crate::{grammar_err, parse_err, ParsleyError};

type Pattern = Lazy<Result<Regex, regex::Error>>;

static INTEGER: Pattern = Lazy::new(|| anchored(r"[-+]?(?:[1-9][0-9]*|0[xX][0-9a-fA-F]+|0[0-7]*)"));
static FLOAT: Pattern = Lazy::new(|| {
    anchored(r"[-+]?(?:[0-9]+\.[0-9]*(?:[eE][-+]?[0-9]+)?|\.[0-9]+(?:[eE][-+]?[0-9]+)?|[0-9]+[eE][-+]?[0-9]+)")
});
static BOOL: Pattern = Lazy::new(|| anchored(r"(?:true|false)\b"));
static QUOTED: Pattern = Lazy::new(|| anchored(r#""(?:[^"\\]|\\.)*""#));

fn compiled(pattern: &'static Pattern) -> Result<&'static Regex, ParsleyError> {
    Lazy::force(pattern)
        .as_ref()
        .map_err(|e| grammar_err!("invalid built-in pattern: {}", e))
}

/// One leaf spanning from `pos` to the cursor of `next`.
fn leaf(token: &str, value: Value, pos: Position, next: Reader) -> ParseOutcome {
    let node = TerminalNode::new(token, value, pos, next.cursor());
    ParseOutcome::matched(ParseResult::new(Some(node.into()), next))
}

/// Matches `pattern` at the reader, returning the start, the groups and the advanced reader.
fn read_pattern(pattern: &'static Pattern, r: &Reader) -> Result<Option<(Position, Vec<String>, Reader)>, ParsleyError> {
    let re = compiled(pattern)?;
    let mut next = r.clone();
    Ok(next.read_match(re).map(|(pos, groups)| (pos, groups, next)))
}

// ============================================================================
// NUMBERS
// ============================================================================

/// Matches a decimal, hexadecimal (`0x`) or octal (leading `0`) integer with optional sign.
///
/// A literal followed by `.` is left to a float matcher.
///
/// ```rust
/// use parsley::data::LeftRecCtx;
/// use parsley::parser::{History, Parser};
/// use parsley::text::{terminal, Reader};
/// let out = terminal::integer().parse(&mut History::new(), &LeftRecCtx::new(), &Reader::new("0x1f", true));
/// let node = out.results.first().and_then(|r| r.node()).unwrap();
/// assert_eq!(node.value(&()).unwrap().as_int(), Some(31));
/// ```
pub fn integer() -> FnParser {
    FnParser::new("integer value", |_h, _ctx, r| {
        let (pos, groups, next) = match read_pattern(&INTEGER, r) {
            Ok(Some(found)) => found,
            Ok(None) => return ParseOutcome::no_match(),
            Err(err) => return ParseOutcome::failed(err),
        };
        if next.peek_char() == Some('.') {
            return ParseOutcome::no_match();
        }
        let literal = groups.into_iter().next().unwrap_or_default();
        match parse_int(&literal) {
            Some(value) => leaf("INT", Value::Int(value), pos, next),
            None => ParseOutcome::failed(parse_err!(pos, "integer value out of range: {}", literal)),
        }
    })
}

fn parse_int(literal: &str) -> Option<i64> {
    let (negative, unsigned) = match literal.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, literal.strip_prefix('+').unwrap_or(literal)),
    };
    let (radix, digits) = if let Some(hex) = unsigned
        .strip_prefix("0x")
        .or_else(|| unsigned.strip_prefix("0X"))
    {
        (16, hex)
    } else if unsigned.len() > 1 && unsigned.starts_with('0') {
        (8, &unsigned[1..])
    } else {
        (10, unsigned)
    };
    let magnitude = i128::from_str_radix(digits, radix).ok()?;
    i64::try_from(if negative { -magnitude } else { magnitude }).ok()
}

/// Matches a floating point literal; a `.` or an exponent is required.
pub fn float() -> FnParser {
    FnParser::new("float value", |_h, _ctx, r| {
        let (pos, groups, next) = match read_pattern(&FLOAT, r) {
            Ok(Some(found)) => found,
            Ok(None) => return ParseOutcome::no_match(),
            Err(err) => return ParseOutcome::failed(err),
        };
        let literal = groups.into_iter().next().unwrap_or_default();
        match literal.parse::<f64>() {
            Ok(value) => leaf("FLOAT", Value::Float(value), pos, next),
            Err(e) => ParseOutcome::failed(parse_err!(pos, "invalid float value {}: {}", literal, e)),
        }
    })
}

// ============================================================================
// LITERALS
// ============================================================================

/// Matches `true` or `false`.
pub fn bool() -> FnParser {
    FnParser::new("bool value", |_h, _ctx, r| match read_pattern(&BOOL, r) {
        Ok(Some((pos, groups, next))) => {
            let value = groups.first().is_some_and(|g| g == "true");
            leaf("BOOL", Value::Bool(value), pos, next)
        }
        Ok(None) => ParseOutcome::no_match(),
        Err(err) => ParseOutcome::failed(err),
    })
}

/// Matches a single character; the node's value is the character.
pub fn rune(ch: char, token: &str) -> FnParser {
    let token = token.to_string();
    FnParser::new(format!("\"{}\"", ch), move |_h, _ctx, r| {
        let mut next = r.clone();
        match next.read_rune(ch) {
            Some(pos) => leaf(&token, Value::Char(ch), pos, next),
            None => ParseOutcome::no_match(),
        }
    })
}

/// Matches a literal word, producing `value`.
///
/// Words ending in an identifier character only match on a word boundary.
pub fn word(word: &str, token: &str, value: Value) -> Result<FnParser, ParsleyError> {
    if word.is_empty() {
        return Err(grammar_err!("word matcher needs a non-empty word"));
    }
    let (word, token) = (word.to_string(), token.to_string());
    Ok(FnParser::new(format!("\"{}\"", word), move |_h, _ctx, r| {
        let mut next = r.clone();
        match next.read_word(&word) {
            Some(pos) => leaf(&token, value.clone(), pos, next),
            None => ParseOutcome::no_match(),
        }
    }))
}

/// Matches the word standing for "no value" (`null`, `nil`, ...).
pub fn nil(word: &str) -> Result<FnParser, ParsleyError> {
    if word.is_empty() {
        return Err(grammar_err!("nil matcher needs a non-empty word"));
    }
    let name = word.to_string();
    let word = name.clone();
    Ok(FnParser::new(name, move |_h, _ctx, r| {
        let mut next = r.clone();
        match next.read_word(&word) {
            Some(pos) => leaf("NIL", Value::Nil, pos, next),
            None => ParseOutcome::no_match(),
        }
    }))
}

/// Matches a regular expression, producing capture group `group` (0 is the whole match).
///
/// Empty matches do not count as a match.
pub fn regexp(token: &str, name: &str, pattern: &str, group: usize) -> Result<FnParser, ParsleyError> {
    let re = anchored(pattern).map_err(|e| grammar_err!("invalid pattern {:?}: {}", pattern, e))?;
    if group >= re.captures_len() {
        return Err(grammar_err!(
            "pattern {:?} has no capturing group {}",
            pattern,
            group
        ));
    }
    let token = token.to_string();
    Ok(FnParser::new(name, move |_h, _ctx, r| {
        let mut next = r.clone();
        match next.read_match(&re) {
            Some((pos, groups)) if next.cursor() > pos => {
                let value = groups.into_iter().nth(group).unwrap_or_default();
                leaf(&token, Value::String(value), pos, next)
            }
            _ => ParseOutcome::no_match(),
        }
    }))
}

/// Matches a double-quoted string with JSON escapes, producing the unescaped text.
pub fn quoted_string() -> FnParser {
    FnParser::new("string value", |_h, _ctx, r| {
        let (pos, groups, next) = match read_pattern(&QUOTED, r) {
            Ok(Some(found)) => found,
            Ok(None) => return ParseOutcome::no_match(),
            Err(err) => return ParseOutcome::failed(err),
        };
        let literal = groups.into_iter().next().unwrap_or_default();
        let body = literal.get(1..literal.len().saturating_sub(1)).unwrap_or_default();
        match unescape(body) {
            Ok(value) => leaf("STRING", Value::String(value), pos, next),
            Err(message) => ParseOutcome::failed(parse_err!(pos, "{}", message)),
        }
    })
}

fn unescape(body: &str) -> Result<String, String> {
    let mut out = String::with_capacity(body.len());
    let mut chars = body.chars();
    while let Some(ch) = chars.next() {
        if ch != '\\' {
            out.push(ch);
            continue;
        }
        match chars.next() {
            Some('"') => out.push('"'),
            Some('\\') => out.push('\\'),
            Some('/') => out.push('/'),
            Some('b') => out.push('\u{8}'),
            Some('f') => out.push('\u{c}'),
            Some('n') => out.push('\n'),
            Some('r') => out.push('\r'),
            Some('t') => out.push('\t'),
            Some('u') => {
                let high = read_hex4(&mut chars)?;
                let code = if (0xD800..0xDC00).contains(&high) {
                    if chars.next() != Some('\\') || chars.next() != Some('u') {
                        return Err("unpaired surrogate in string".to_string());
                    }
                    let low = read_hex4(&mut chars)?;
                    if !(0xDC00..0xE000).contains(&low) {
                        return Err("unpaired surrogate in string".to_string());
                    }
                    0x10000 + ((high - 0xD800) << 10) + (low - 0xDC00)
                } else {
                    high
                };
                out.push(char::from_u32(code).ok_or_else(|| format!("invalid code point U+{:X}", code))?);
            }
            Some(other) => return Err(format!("invalid escape sequence \\{}", other)),
            None => return Err("unterminated escape sequence".to_string()),
        }
    }
    Ok(out)
}

fn read_hex4(chars: &mut std::str::Chars<'_>) -> Result<u32, String> {
    let digits: String = chars.take(4).collect();
    if digits.len() != 4 {
        return Err("truncated \\u escape".to_string());
    }
    u32::from_str_radix(&digits, 16).map_err(|_| format!("invalid \\u escape {}", digits))
}

/// Matches the end of the input without consuming anything.
pub fn end() -> FnParser {
    FnParser::new("end of input", |_h, _ctx, r| {
        if r.is_eof() {
            ParseOutcome::matched(ParseResult::new(None, r.clone()))
        } else {
            ParseOutcome::no_match()
        }
    })
}
