//! Separated lists.
//!
//! `item (sep item)*` is assembled from a [`Recursive`] sequence and a [`Many`] tail. The
//! intermediate nodes those build carry reserved tokens and are flattened away, so the
//! interpreter sees `item sep item sep item ...`. Nodes produced by the item or separator
//! parsers themselves are passed through as they are.

use std::rc::Rc;

use crate::ast::{builder, Interpreter, Node, NonTerminalNode};
use crate::combinator::many::many;
use crate::combinator::recursive::{bounded, Recursive};
use crate::data::LeftRecCtx;
use crate::parser::{History, ParseOutcome, ParseResult, Parser, ParserExt, ParserRef};
use crate::text::Reader;

const PAIR_TOKEN: &str = "@sep_by.pair";
const TAIL_TOKEN: &str = "@sep_by.tail";

pub struct SepBy {
    token: String,
    allow_empty: bool,
    inner: Recursive,
}

impl SepBy {
    fn new(
        token: &str,
        item: ParserRef,
        sep: ParserRef,
        interpreter: Option<Rc<dyn Interpreter>>,
        allow_empty: bool,
    ) -> Self {
        let pair = bounded(builder::all(PAIR_TOKEN, None), vec![sep, Rc::clone(&item)], 2);
        let tail = many(builder::all(TAIL_TOKEN, None), pair.rc());
        let list_token = token.to_string();
        let flatten = Rc::new(move |nodes: Vec<Node>| -> Option<Node> {
            let mut flat = Vec::new();
            for node in nodes {
                push_flat(node, &mut flat);
            }
            Some(Node::from(NonTerminalNode::new(
                list_token.clone(),
                flat,
                interpreter.clone(),
            )))
        });
        Self {
            token: token.to_string(),
            allow_empty,
            inner: bounded(flatten, vec![item, tail.rc()], 2),
        }
    }
}

fn push_flat(node: Node, flat: &mut Vec<Node>) {
    match node {
        Node::NonTerminal(nt) if is_internal(&nt) => {
            for child in nt.into_children() {
                push_flat(child, flat);
            }
        }
        other => flat.push(other),
    }
}

fn is_internal(nt: &NonTerminalNode) -> bool {
    !nt.has_interpreter() && (nt.token() == PAIR_TOKEN || nt.token() == TAIL_TOKEN)
}

impl Parser for SepBy {
    fn name(&self) -> String {
        self.inner.name()
    }

    fn parse(&self, h: &mut History, ctx: &LeftRecCtx, r: &Reader) -> ParseOutcome {
        let mut out = self.inner.parse(h, ctx, r);
        if self.allow_empty && !out.is_match() {
            let empty = NonTerminalNode::empty(self.token.clone(), r.cursor());
            out.results.insert(ParseResult::new(Some(empty.into()), r.clone()));
        }
        out
    }
}

/// Zero or more `item`s separated by `sep`.
///
/// When nothing matches, the result is an empty node without interpreter at the current
/// position (evaluating to an empty list) together with the error that stopped the match.
pub fn sep_by(
    token: &str,
    item: ParserRef,
    sep: ParserRef,
    interpreter: Option<Rc<dyn Interpreter>>,
) -> SepBy {
    SepBy::new(token, item, sep, interpreter, true)
}

/// One or more `item`s separated by `sep`.
pub fn sep_by1(
    token: &str,
    item: ParserRef,
    sep: ParserRef,
    interpreter: Option<Rc<dyn Interpreter>>,
) -> SepBy {
    SepBy::new(token, item, sep, interpreter, false)
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;

    use super::*;
    use crate::ast::{interpreter, TerminalNode, Value};
    use crate::data::CurtailingParsers;
    use crate::parse_err;
    use crate::parser::{FnParser, ResultSet};
    use crate::text::Position;

    fn pos(offset: usize) -> Position {
        Position::new(offset, 1, offset + 1)
    }

    fn input() -> Reader {
        Reader::new("0123456789", true)
    }

    fn str_node(value: &str, start: usize, end: usize) -> Node {
        TerminalNode::new("STR", Value::from(value), pos(start), pos(end)).into()
    }

    fn result(node: Option<Node>, end: usize) -> ParseResult {
        ParseResult::new(node, input().with_cursor(pos(end)))
    }

    /// Replays `answers` one call at a time, then never matches again.
    fn replay(answers: Vec<(CurtailingParsers, ResultSet)>) -> ParserRef {
        let next = Cell::new(0);
        FnParser::new("replay", move |_h, _ctx, _r| {
            let i = next.get();
            next.set(i + 1);
            match answers.get(i) {
                Some((cp, results)) => ParseOutcome::new(results.clone(), None, cp.clone()),
                None => ParseOutcome::no_match(),
            }
        })
        .rc()
    }

    fn plain(results: Vec<ResultSet>) -> ParserRef {
        replay(results.into_iter().map(|rs| (CurtailingParsers::new(), rs)).collect())
    }

    fn join(suffix: &'static str) -> Rc<dyn Interpreter> {
        interpreter(move |ctx, nodes| {
            let mut joined = String::new();
            for node in nodes {
                joined.push_str(&node.value(ctx)?.to_string());
                joined.push_str(suffix);
            }
            Ok(Value::String(joined))
        })
    }

    fn run(p: &SepBy) -> ParseOutcome {
        p.parse(&mut History::new(), &LeftRecCtx::new(), &input())
    }

    fn values(out: &ParseOutcome) -> Vec<Value> {
        out.results
            .iter()
            .map(|r| r.node().map_or(Value::Nil, |n| n.value(&()).unwrap()))
            .collect()
    }

    #[test]
    fn test_combines_item_and_separator_results() {
        let item = plain(vec![
            [
                result(Some(str_node("a", 0, 1)), 1),
                result(Some(str_node("b", 1, 2)), 2),
            ]
            .into_iter()
            .collect(),
            result(Some(str_node("c", 4, 5)), 5).into_set(),
            result(Some(str_node("d", 5, 6)), 6).into_set(),
        ]);
        let sep = plain(vec![
            result(Some(str_node(",", 2, 3)), 3).into_set(),
            ResultSet::new(),
            result(Some(str_node(",", 3, 4)), 4).into_set(),
        ]);
        let out = run(&sep_by1("TEST", item, sep, Some(join("|"))));
        assert_eq!(
            values(&out),
            vec![Value::from("a|,|c|"), Value::from("b|,|d|")]
        );
        assert!(out.err.is_none());
    }

    #[test]
    fn test_does_not_flatten_item_non_terminals() {
        let composite = |a: &str, b: &str, start: usize| -> Node {
            NonTerminalNode::new(
                "NT",
                vec![str_node(a, start, start + 1), str_node(b, start + 1, start + 2)],
                Some(join("&")),
            )
            .into()
        };
        let item = plain(vec![
            result(Some(composite("a", "b", 0)), 2).into_set(),
            result(Some(composite("c", "d", 3)), 5).into_set(),
        ]);
        let sep = plain(vec![result(Some(str_node(",", 2, 3)), 3).into_set()]);
        let out = run(&sep_by1("TEST", item, sep, Some(join("|"))));
        assert_eq!(values(&out), vec![Value::from("a&b&|,|c&d&|")]);

        let node = out.results.first().and_then(ParseResult::node).unwrap();
        let children = node.as_non_terminal().unwrap().children();
        assert_eq!(children.len(), 3);
        assert_eq!(children[0].token(), "NT");
    }

    fn failing() -> ParserRef {
        FnParser::new("failing", |_h, _ctx, _r| ParseOutcome::failed(parse_err!(pos(1), "TEST1"))).rc()
    }

    #[test]
    fn test_sep_by_returns_empty_node_if_no_match() {
        let out = run(&sep_by("TEST", failing(), failing(), None));
        assert!(out.curtailing.is_empty());
        assert_eq!(out.results.len(), 1);
        let first = out.results.first().unwrap();
        assert_eq!(first.end(), pos(0));
        let node = first.node().and_then(Node::as_non_terminal).unwrap();
        assert_eq!(node.token(), "TEST");
        assert!(node.children().is_empty());
        assert!(!node.has_interpreter());
        assert_eq!(out.err.and_then(|e| e.pos()), Some(pos(1)));
    }

    #[test]
    fn test_sep_by1_returns_nothing_if_no_match() {
        let out = run(&sep_by1("TEST", failing(), failing(), None));
        assert!(out.curtailing.is_empty());
        assert!(out.results.is_empty());
        assert_eq!(out.err.and_then(|e| e.pos()), Some(pos(1)));
    }

    #[test]
    fn test_merges_curtail_reasons() {
        let item = replay(vec![(
            CurtailingParsers::from_iter([0, 1]),
            ParseResult::new(None, input()).into_set(),
        )]);
        let sep = replay(vec![(CurtailingParsers::from_iter([1, 2]), ResultSet::new())]);
        let out = run(&sep_by1("TEST", item, sep, None));
        assert_eq!(out.curtailing, CurtailingParsers::from_iter([0, 1, 2]));
    }

    #[test]
    fn test_registers_one_call_per_invocation() {
        let int = crate::text::terminal::integer().rc();
        let comma = crate::text::terminal::rune(',', ",").rc();
        let p = sep_by1("INTS", int, comma, None);
        let mut h = History::new();
        let out = p.parse(&mut h, &LeftRecCtx::new(), &Reader::new("1", true));
        assert_eq!(out.results.len(), 1);
        // item sequence, integer, tail repetition, separator pair, comma
        assert_eq!(h.call_count(), 5);
    }
}
