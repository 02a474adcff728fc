use crate::ast::{builder, BuilderRef, Node};
use crate::data::LeftRecCtx;
use crate::parser::{History, ParseOutcome, ParseResult, Parser, ParserRef};
use crate::text::Reader;
use crate::{grammar_err, ParsleyError};

/// Matches `parser` between `min` and `max` times (inclusive), following every ambiguous
/// continuation.
///
/// Each repetition chain ends where the sub-parser stops matching (or at `max`), and yields one
/// result built from the chain's nodes. A chain that never matched yields a result without a
/// node at the starting position. A repetition that consumes nothing is retried once at the
/// same position before the chain is closed.
pub struct Many {
    builder: BuilderRef,
    parser: ParserRef,
    min: usize,
    max: Option<usize>,
}

impl Many {
    /// `max` of `None` means unbounded. Fails if `max < min`.
    pub fn new(builder: BuilderRef, parser: ParserRef, min: usize, max: Option<usize>) -> Result<Self, ParsleyError> {
        if max.is_some_and(|max| max < min) {
            return Err(grammar_err!(
                "repetition of '{}' has max {:?} below min {}",
                parser.name(),
                max,
                min
            ));
        }
        Ok(Self {
            builder,
            parser,
            min,
            max,
        })
    }

    #[allow(clippy::too_many_arguments)]
    fn repeat(
        &self,
        h: &mut History,
        ctx: &LeftRecCtx,
        r: &Reader,
        nodes: &mut Vec<Node>,
        count: usize,
        stalled: bool,
        out: &mut ParseOutcome,
    ) {
        if self.max.is_some_and(|max| count >= max) {
            self.emit(r, nodes, count, out);
            return;
        }

        let sub = self.parser.parse(h, ctx, r);
        out.curtailing = std::mem::take(&mut out.curtailing).union(sub.curtailing);
        out.err = ParsleyError::furthest(out.err.take(), sub.err);
        if sub.results.is_empty() {
            self.emit(r, nodes, count, out);
            return;
        }

        for result in sub.results {
            let (node, next) = result.into_parts();
            let pushed = node.is_some();
            nodes.extend(node);
            if next.cursor() > r.cursor() {
                self.repeat(h, &LeftRecCtx::new(), &next, nodes, count + 1, false, out);
            } else if stalled {
                self.emit(&next, nodes, count + 1, out);
            } else {
                self.repeat(h, ctx, &next, nodes, count + 1, true, out);
            }
            if pushed {
                nodes.pop();
            }
        }
    }

    fn emit(&self, r: &Reader, nodes: &[Node], count: usize, out: &mut ParseOutcome) {
        if count < self.min {
            return;
        }
        let node = if count == 0 {
            None
        } else {
            self.builder.build(nodes.to_vec())
        };
        out.results.insert(ParseResult::new(node, r.clone()));
    }
}

impl Parser for Many {
    fn name(&self) -> String {
        self.parser.name()
    }

    fn parse(&self, h: &mut History, ctx: &LeftRecCtx, r: &Reader) -> ParseOutcome {
        h.register_call();
        let mut out = ParseOutcome::no_match();
        self.repeat(h, ctx, r, &mut Vec::new(), 0, false, &mut out);
        out
    }
}

/// Zero or more repetitions.
pub fn many(builder: BuilderRef, parser: ParserRef) -> Many {
    Many {
        builder,
        parser,
        min: 0,
        max: None,
    }
}

/// One or more repetitions.
pub fn many1(builder: BuilderRef, parser: ParserRef) -> Many {
    Many {
        builder,
        parser,
        min: 1,
        max: None,
    }
}

/// Zero or one match of `parser`, keeping its node as is.
pub fn optional(parser: ParserRef) -> Many {
    Many {
        builder: builder::select(0),
        parser,
        min: 0,
        max: Some(1),
    }
}
