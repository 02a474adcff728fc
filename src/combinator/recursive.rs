//! Index-driven sequences.
//!
//! A [`Recursive`] asks a lookup function for the parser at each index and a length check
//! whether a sequence of a given length is complete. Both are plain closures, so the sequence
//! can be open-ended. [`seq`] and [`seq_try`] cover the usual fixed lists.
//!
//! This is also where left recursion is bounded: a sequence re-entered at the same position
//! (no input consumed in between) more often than there is input left refuses to go deeper
//! and reports itself as curtailed. Each pass also returns every result an earlier, deeper
//! pass found at the same offset, so a left-recursive rule grows one step per pass instead of
//! losing the shorter matches a [`Choice`](crate::combinator::Choice) above it dropped.

use crate::ast::{BuilderRef, Node};
use crate::data::LeftRecCtx;
use crate::parser::{History, ParseOutcome, ParseResult, Parser, ParserKey, ParserRef};
use crate::text::Reader;
use crate::{grammar_err, parse_err, ParsleyError};

type Lookup = dyn Fn(usize) -> Option<ParserRef>;
type LenCheck = dyn Fn(usize) -> bool;

pub struct Recursive {
    key: ParserKey,
    name: Option<String>,
    builder: BuilderRef,
    lookup: Box<Lookup>,
    len_check: Box<LenCheck>,
}

impl Recursive {
    pub fn new<L, C>(builder: BuilderRef, lookup: L, len_check: C) -> Self
    where
        L: Fn(usize) -> Option<ParserRef> + 'static,
        C: Fn(usize) -> bool + 'static,
    {
        Self {
            key: ParserKey::next(),
            name: None,
            builder,
            lookup: Box::new(lookup),
            len_check: Box::new(len_check),
        }
    }

    /// Overrides the name, which otherwise is the name of the first parser.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Matches the parser at `depth` from `r` and explores every continuation.
    fn step(
        &self,
        h: &mut History,
        ctx: &LeftRecCtx,
        r: &Reader,
        depth: usize,
        nodes: &mut Vec<Node>,
        out: &mut ParseOutcome,
    ) {
        let Some(parser) = (self.lookup)(depth) else {
            if (self.len_check)(depth) {
                self.emit(r, nodes, out);
            }
            return;
        };

        let sub = parser.parse(h, ctx, r);
        let required = !(self.len_check)(depth);
        let err = if depth > 0 && required && !sub.is_match() && sub.err.is_none() && sub.curtailing.is_empty() {
            Some(parse_err!(r.token_pos(), "was expecting {}", parser.name()))
        } else {
            sub.err
        };
        out.curtailing = std::mem::take(&mut out.curtailing).union(sub.curtailing);
        out.err = ParsleyError::furthest(out.err.take(), err);

        for result in sub.results {
            let (node, next) = result.into_parts();
            let pushed = node.is_some();
            nodes.extend(node);
            if next.cursor() > r.cursor() {
                self.step(h, &LeftRecCtx::new(), &next, depth + 1, nodes, out);
            } else {
                self.step(h, ctx, &next, depth + 1, nodes, out);
            }
            if pushed {
                nodes.pop();
            }
        }

        if !required {
            self.emit(r, nodes, out);
        }
    }

    fn emit(&self, r: &Reader, nodes: &[Node], out: &mut ParseOutcome) {
        let node = self.builder.build(nodes.to_vec());
        out.results.insert(ParseResult::new(node, r.clone()));
    }
}

impl Parser for Recursive {
    fn name(&self) -> String {
        match &self.name {
            Some(name) => name.clone(),
            None => (self.lookup)(0).map(|p| p.name()).unwrap_or_default(),
        }
    }

    fn parse(&self, h: &mut History, ctx: &LeftRecCtx, r: &Reader) -> ParseOutcome {
        h.register_call();
        let id = h.register_parser(self.key);
        if ctx.get(id) > r.remaining() + 1 {
            log::trace!("curtailed parser {} ({}) at {}", id, self.name(), r.cursor());
            return ParseOutcome::curtailed(id);
        }

        let ctx = ctx.inc(id);
        let mut out = ParseOutcome::no_match();
        self.step(h, &ctx, r, 0, &mut Vec::new(), &mut out);
        out.results = h.grow_results(id, r.cursor().offset(), out.results);
        out
    }
}

/// All of `parsers`, in order.
pub fn seq(builder: BuilderRef, parsers: Vec<ParserRef>) -> Result<Recursive, ParsleyError> {
    let len = parsers.len();
    new_seq(builder, parsers, len)
}

/// The longest prefix of `parsers` that matches; at least the first parser must match.
pub fn seq_try(builder: BuilderRef, parsers: Vec<ParserRef>) -> Result<Recursive, ParsleyError> {
    new_seq(builder, parsers, 1)
}

fn new_seq(builder: BuilderRef, parsers: Vec<ParserRef>, min: usize) -> Result<Recursive, ParsleyError> {
    if parsers.is_empty() {
        return Err(grammar_err!("sequence needs at least one parser"));
    }
    Ok(bounded(builder, parsers, min))
}

/// Sequence of `parsers` accepting any length from `min` up to all of them.
pub(crate) fn bounded(builder: BuilderRef, parsers: Vec<ParserRef>, min: usize) -> Recursive {
    let max = parsers.len();
    Recursive::new(
        builder,
        move |i| parsers.get(i).cloned(),
        move |len| len >= min && len <= max,
    )
}
