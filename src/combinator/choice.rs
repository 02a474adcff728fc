use crate::data::{CurtailingParsers, LeftRecCtx};
use crate::parser::{History, ParseOutcome, Parser, ParserRef, ResultSet};
use crate::text::Reader;
use crate::{grammar_err, ParsleyError};

/// Tries alternatives in order and returns the results of the first one that matches.
///
/// The error returned is the furthest one reported by any alternative tried, even when a
/// later alternative matched. Alternatives after the first match are not tried.
pub struct Choice {
    name: String,
    parsers: Vec<ParserRef>,
}

impl Choice {
    /// Fails if `parsers` is empty.
    pub fn new(name: impl Into<String>, parsers: Vec<ParserRef>) -> Result<Self, ParsleyError> {
        let name = name.into();
        if parsers.is_empty() {
            return Err(grammar_err!("choice '{}' needs at least one alternative", name));
        }
        Ok(Self { name, parsers })
    }
}

impl Parser for Choice {
    fn name(&self) -> String {
        self.name.clone()
    }

    fn parse(&self, h: &mut History, ctx: &LeftRecCtx, r: &Reader) -> ParseOutcome {
        let mut curtailing = CurtailingParsers::new();
        let mut err = None;
        for parser in &self.parsers {
            h.register_call();
            let out = parser.parse(h, ctx, r);
            let matched = out.is_match();
            curtailing = curtailing.union(out.curtailing);
            err = ParsleyError::furthest(err, out.err);
            if matched {
                return ParseOutcome::new(out.results, err, curtailing);
            }
        }
        ParseOutcome::new(ResultSet::new(), err, curtailing)
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;
    use std::rc::Rc;

    use super::*;
    use crate::ast::{TerminalNode, Value};
    use crate::parse_err;
    use crate::parser::{FnParser, ParseResult, ParserExt};
    use crate::text::Position;

    fn pos(offset: usize) -> Position {
        Position::new(offset, 1, offset + 1)
    }

    /// Answers with a fixed outcome and counts its calls.
    fn scripted(
        calls: &Rc<Cell<usize>>,
        label: &'static str,
        end: Option<usize>,
        err: Option<usize>,
        curtailing: &[usize],
    ) -> ParserRef {
        let calls = Rc::clone(calls);
        let curtailing = CurtailingParsers::from_iter(curtailing.iter().copied());
        FnParser::new(label, move |_h, _ctx, r: &Reader| {
            calls.set(calls.get() + 1);
            let results = match end {
                Some(end) => {
                    let node = TerminalNode::new("X", Value::Int(end as i64), r.cursor(), pos(end));
                    ParseResult::new(Some(node.into()), r.with_cursor(pos(end))).into_set()
                }
                None => ResultSet::new(),
            };
            let err = err.map(|at| parse_err!(pos(at), "{} failed at {}", label, at));
            ParseOutcome::new(results, err, curtailing.clone())
        })
        .rc()
    }

    fn run(choice: &Choice) -> (ParseOutcome, usize) {
        let mut h = History::new();
        let out = choice.parse(&mut h, &LeftRecCtx::new(), &Reader::new("0123456789", true));
        (out, h.call_count())
    }

    #[test]
    fn test_empty_choice_is_grammar_error() {
        assert!(matches!(
            Choice::new("empty", vec![]),
            Err(ParsleyError::Grammar { .. })
        ));
    }

    #[test]
    fn test_returns_first_match_and_stops() {
        let calls = Rc::new(Cell::new(0));
        let choice = Choice::new(
            "c",
            vec![
                scripted(&calls, "p1", None, None, &[]),
                scripted(&calls, "p2", Some(2), None, &[]),
                scripted(&calls, "p3", Some(5), None, &[]),
            ],
        )
        .unwrap();
        let (out, call_count) = run(&choice);
        assert_eq!(out.results.len(), 1);
        assert_eq!(out.results.first().map(|r| r.end().offset()), Some(2));
        assert_eq!(calls.get(), 2);
        // one per alternative tried, one per scripted parser
        assert_eq!(call_count, 4);
    }

    #[test]
    fn test_keeps_furthest_error_even_on_success() {
        let calls = Rc::new(Cell::new(0));
        let choice = Choice::new(
            "c",
            vec![scripted(&calls, "deep", None, Some(5), &[]), scripted(&calls, "shallow", Some(3), None, &[])],
        )
        .unwrap();
        let (out, _) = run(&choice);
        assert_eq!(out.results.first().map(|r| r.end().offset()), Some(3));
        assert_eq!(out.err.and_then(|e| e.pos()), Some(pos(5)));
    }

    #[test]
    fn test_later_error_wins_on_equal_position() {
        let calls = Rc::new(Cell::new(0));
        let choice = Choice::new(
            "c",
            vec![
                scripted(&calls, "first", None, Some(4), &[]),
                scripted(&calls, "second", None, Some(4), &[]),
                scripted(&calls, "third", None, Some(2), &[]),
            ],
        )
        .unwrap();
        let (out, _) = run(&choice);
        assert!(out.results.is_empty());
        assert_eq!(calls.get(), 3);
        assert_eq!(out.err.map(|e| e.to_string()), Some("second failed at 4".to_string()));
    }

    #[test]
    fn test_unions_curtailing_parsers() {
        let calls = Rc::new(Cell::new(0));
        let choice = Choice::new(
            "c",
            vec![
                scripted(&calls, "a", None, None, &[0, 1]),
                scripted(&calls, "b", None, Some(1), &[2]),
                scripted(&calls, "c", Some(1), None, &[3]),
            ],
        )
        .unwrap();
        let (out, _) = run(&choice);
        assert_eq!(out.curtailing, CurtailingParsers::from_iter([0, 1, 2, 3]));
        assert_eq!(out.results.len(), 1);
    }
}
