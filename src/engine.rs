//! # Evaluation
//!
//! Top-level entry points: run a root parser over the whole input, pick the result that
//! consumed everything and evaluate its node.
//!
//! Parsing and evaluation are separate steps. [`parse`] stops at the syntax tree, [`evaluate`]
//! goes on to call the interpreters. The `*_with_history` variants take a caller-owned
//! [`History`] so the call count of a run can be inspected afterwards.

use std::any::Any;

use crate::ast::Value;
use crate::data::LeftRecCtx;
use crate::parser::{History, ParseResult, Parser};
use crate::text::{Reader, ReaderOptions};
use crate::{parse_err, ParsleyError};

// ============================================================================
// PARSING
// ============================================================================

/// Parses the whole input with a fresh [`History`].
pub fn parse(parser: &dyn Parser, r: &Reader) -> Result<ParseResult, ParsleyError> {
    parse_with_history(parser, &mut History::new(), r)
}

/// Parses the whole input and searches the results for the one ending at the end of the input.
///
/// This is not necessarily the first result: a shorter match may come before it. Fails with
/// the parser's error if nothing matched, or with a trailing-input error pointing after the
/// longest match if no result reached the end. Results remembered in `h` from an earlier input
/// are dropped first.
pub fn parse_with_history(parser: &dyn Parser, h: &mut History, r: &Reader) -> Result<ParseResult, ParsleyError> {
    log::trace!("parsing {} from {}", parser.name(), r.cursor());
    h.forget_results();
    let out = parser.parse(h, &LeftRecCtx::new(), r);
    if !out.curtailing.is_empty() {
        log::trace!("curtailed parsers: {:?}", out.curtailing.iter().collect::<Vec<_>>());
    }

    let Some(last) = out.results.last() else {
        return Err(out
            .err
            .unwrap_or_else(|| parse_err!(r.token_pos(), "was expecting {}", parser.name())));
    };
    let trailing = ParsleyError::TrailingInput {
        pos: last.reader().token_pos(),
    };

    // end positions are unique, so at most one result is complete
    match out.results.into_iter().find(|result| result.reader().is_eof()) {
        Some(result) => Ok(result),
        None => Err(ParsleyError::furthest(Some(trailing.clone()), out.err).unwrap_or(trailing)),
    }
}

// ============================================================================
// EVALUATION
// ============================================================================

/// Parses the whole input with a fresh [`History`] and evaluates the resulting node.
///
/// `ctx` is handed to every interpreter.
///
/// # Examples
///
/// ```rust
/// use parsley::ast::Value;
/// use parsley::engine::evaluate;
/// use parsley::text::{terminal, Reader};
/// let value = evaluate(&terminal::integer(), &Reader::new(" 42 ", true), &()).unwrap();
/// assert_eq!(value, Value::Int(42));
/// ```
pub fn evaluate(parser: &dyn Parser, r: &Reader, ctx: &dyn Any) -> Result<Value, ParsleyError> {
    evaluate_with_history(parser, &mut History::new(), r, ctx)
}

/// Like [`evaluate`], recording identities and calls in `h`.
///
/// A match without a node evaluates to [`Value::Nil`].
pub fn evaluate_with_history(
    parser: &dyn Parser,
    h: &mut History,
    r: &Reader,
    ctx: &dyn Any,
) -> Result<Value, ParsleyError> {
    let result = parse_with_history(parser, h, r)?;
    log::debug!("{} matched after {} parser calls", parser.name(), h.call_count());
    match result.node() {
        Some(node) => node.value(ctx),
        None => Ok(Value::Nil),
    }
}

/// Builds a [`Reader`] over `text` and evaluates it with a fresh [`History`].
pub fn evaluate_text(
    text: &str,
    options: ReaderOptions,
    parser: &dyn Parser,
    ctx: &dyn Any,
) -> Result<Value, ParsleyError> {
    evaluate(parser, &Reader::with_options(text, options), ctx)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::builder;
    use crate::combinator::seq_try;
    use crate::parser::{FnParser, ParseOutcome, ParserExt};
    use crate::text::{terminal, Position};

    #[test]
    fn test_no_match_without_error_names_the_parser() {
        let err = evaluate_text("x", ReaderOptions::default(), &terminal::integer(), &()).unwrap_err();
        assert_eq!(err.to_string(), "was expecting integer value");
        assert_eq!(err.pos(), Some(Position::new(0, 1, 1)));
    }

    #[test]
    fn test_trailing_input() {
        let err = evaluate_text("1 2", ReaderOptions::default(), &terminal::integer(), &()).unwrap_err();
        assert_eq!(
            err,
            ParsleyError::TrailingInput {
                pos: Position::new(2, 1, 3)
            }
        );
    }

    #[test]
    fn test_picks_the_complete_result() {
        let parsers = vec![terminal::integer().rc(), terminal::integer().rc()];
        let pair = seq_try(builder::select(1), parsers).unwrap();
        let value = evaluate_text("1 2", ReaderOptions::default(), &pair, &()).unwrap();
        assert_eq!(value, Value::Int(2));
    }

    #[test]
    fn test_match_without_node_is_nil() {
        let value = evaluate_text("", ReaderOptions::default(), &terminal::end(), &()).unwrap();
        assert_eq!(value, Value::Nil);
    }

    #[test]
    fn test_parser_error_is_returned() {
        let failing = FnParser::new("failing", |_h, _ctx, r: &Reader| {
            ParseOutcome::failed(parse_err!(r.cursor(), "boom"))
        });
        let err = parse(&failing, &Reader::new("abc", true)).unwrap_err();
        assert_eq!(err.to_string(), "boom");
    }

    #[test]
    fn test_history_counts_calls() {
        let mut h = History::new();
        let r = Reader::new("7", true);
        evaluate_with_history(&terminal::integer(), &mut h, &r, &()).unwrap();
        assert_eq!(h.call_count(), 1);
        h.reset();
        assert_eq!(h.call_count(), 0);
    }

    #[test]
    fn test_complete_result_need_not_be_first() {
        let p = seq_try(builder::select(0), vec![terminal::integer().rc(), terminal::integer().rc()]).unwrap();
        let out = p.parse(&mut History::new(), &LeftRecCtx::new(), &Reader::new("1 2", true));
        assert_eq!(out.results.first().map(|r| r.end().offset()), Some(1));

        let result = parse(&p, &Reader::new("1 2", true)).unwrap();
        assert!(result.reader().is_eof());
    }

    #[test]
    fn test_history_reused_without_reset() {
        let p = seq_try(builder::select(0), vec![terminal::integer().rc(), terminal::integer().rc()]).unwrap();
        let mut h = History::new();
        let value = evaluate_with_history(&p, &mut h, &Reader::new("1 2", true), &()).unwrap();
        assert_eq!(value, Value::Int(1));
        let err = evaluate_with_history(&p, &mut h, &Reader::new("7 x", true), &()).unwrap_err();
        assert!(matches!(err, ParsleyError::TrailingInput { .. }));
    }
}
