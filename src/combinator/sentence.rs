use crate::data::LeftRecCtx;
use crate::parser::{History, ParseOutcome, Parser, ParserRef, ResultSet};
use crate::text::Reader;
use crate::ParsleyError;

/// Matches `parser` only where it reaches the end of the input.
///
/// Results stopping short are dropped. If none is left, the error points at the first
/// unconsumed token after the longest match, unless the parser reported an error further in.
pub struct Sentence {
    parser: ParserRef,
}

impl Sentence {
    pub fn new(parser: ParserRef) -> Self {
        Self { parser }
    }
}

impl Parser for Sentence {
    fn name(&self) -> String {
        self.parser.name()
    }

    fn parse(&self, h: &mut History, ctx: &LeftRecCtx, r: &Reader) -> ParseOutcome {
        h.register_call();
        let out = self.parser.parse(h, ctx, r);
        let mut complete = ResultSet::new();
        let mut trailing = None;
        for result in out.results {
            if result.reader().is_eof() {
                complete.insert(result);
            } else {
                trailing = Some(result.reader().token_pos());
            }
        }
        let err = match (complete.is_empty(), trailing) {
            (true, Some(pos)) => ParsleyError::furthest(Some(ParsleyError::TrailingInput { pos }), out.err),
            _ => out.err,
        };
        ParseOutcome::new(complete, err, out.curtailing)
    }
}
