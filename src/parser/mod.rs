//! # Parser contract
//!
//! Every grammar element, from a single character to a whole language, implements
//! [`Parser`]: given the evaluation [`History`], the left-recursion context and a [`Reader`]
//! snapshot it returns a [`ParseOutcome`].
//!
//! ## Outcomes
//!
//! - **match**: a non-empty [`ResultSet`], one entry per distinct end position.
//! - **non-match**: an empty set and no error. Not a failure, the alternative just does not
//!   apply here.
//! - **failure**: an empty set and an error describing the furthest point examined.
//!
//! In every case `curtailing` lists the parsers that were cut short by left-recursion
//! curtailment somewhere below, and callers must pass it on.
//!
//! ## Cyclic grammars
//!
//! Grammars that refer to themselves are assembled with a [`Rule`]: embed
//! [`Rule::reference`] handles wherever the rule is needed, then [`Rule::define`] it once
//! the referenced parsers exist.

use std::fmt;
use std::rc::{Rc, Weak};

use once_cell::unsync::OnceCell;

use crate::data::{CurtailingParsers, LeftRecCtx};
use crate::text::Reader;
use crate::{grammar_err, ParsleyError};

pub mod history;
pub mod result;

pub use history::{History, ParserKey};
pub use result::{ParseResult, ResultSet};

// ============================================================================
// CONTRACT
// ============================================================================

pub trait Parser {
    /// Human readable name used in "was expecting ..." diagnostics.
    fn name(&self) -> String;

    fn parse(&self, h: &mut History, ctx: &LeftRecCtx, r: &Reader) -> ParseOutcome;
}

/// Shared handle to a parser; grammars are graphs of these.
pub type ParserRef = Rc<dyn Parser>;

impl<P: Parser + ?Sized> Parser for Rc<P> {
    fn name(&self) -> String {
        (**self).name()
    }

    fn parse(&self, h: &mut History, ctx: &LeftRecCtx, r: &Reader) -> ParseOutcome {
        (**self).parse(h, ctx, r)
    }
}

/// Conversion of concrete parsers into [`ParserRef`]s.
pub trait ParserExt: Parser + Sized + 'static {
    fn rc(self) -> ParserRef {
        Rc::new(self)
    }
}

impl<P: Parser + 'static> ParserExt for P {}

/// What one parser call produced.
#[derive(Debug, Clone, Default)]
pub struct ParseOutcome {
    pub results: ResultSet,
    pub err: Option<ParsleyError>,
    pub curtailing: CurtailingParsers,
}

impl ParseOutcome {
    pub fn new(results: ResultSet, err: Option<ParsleyError>, curtailing: CurtailingParsers) -> Self {
        Self {
            results,
            err,
            curtailing,
        }
    }

    /// Empty set, no error, nothing curtailed.
    pub fn no_match() -> Self {
        Self::default()
    }

    pub fn matched(result: ParseResult) -> Self {
        Self {
            results: result.into_set(),
            ..Self::default()
        }
    }

    pub fn failed(err: ParsleyError) -> Self {
        Self {
            err: Some(err),
            ..Self::default()
        }
    }

    /// Empty set reporting that parser `id` refused to recurse further.
    pub fn curtailed(id: usize) -> Self {
        Self {
            curtailing: CurtailingParsers::of(id),
            ..Self::default()
        }
    }

    pub fn is_match(&self) -> bool {
        !self.results.is_empty()
    }
}

// ============================================================================
// CLOSURE PARSERS
// ============================================================================

type ParseFn = dyn Fn(&mut History, &LeftRecCtx, &Reader) -> ParseOutcome;

/// A named parser backed by a closure. Registers one call per invocation.
///
/// ```rust
/// use parsley::data::LeftRecCtx;
/// use parsley::parser::{FnParser, History, ParseOutcome, Parser};
/// use parsley::text::Reader;
/// let never = FnParser::new("never", |_h, _ctx, _r| ParseOutcome::no_match());
/// let mut h = History::new();
/// let out = never.parse(&mut h, &LeftRecCtx::new(), &Reader::new("x", true));
/// assert!(!out.is_match());
/// assert_eq!(h.call_count(), 1);
/// ```
pub struct FnParser {
    name: String,
    f: Box<ParseFn>,
}

impl FnParser {
    pub fn new<F>(name: impl Into<String>, f: F) -> Self
    where
        F: Fn(&mut History, &LeftRecCtx, &Reader) -> ParseOutcome + 'static,
    {
        Self {
            name: name.into(),
            f: Box::new(f),
        }
    }
}

impl Parser for FnParser {
    fn name(&self) -> String {
        self.name.clone()
    }

    fn parse(&self, h: &mut History, ctx: &LeftRecCtx, r: &Reader) -> ParseOutcome {
        h.register_call();
        (self.f)(h, ctx, r)
    }
}

impl fmt::Debug for FnParser {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FnParser").field("name", &self.name).finish()
    }
}

// ============================================================================
// RULES
// ============================================================================

/// A parser whose definition is supplied after it has been referenced.
///
/// The rule owns its definition. The grammar embeds [`RuleRef`]s, which hold the definition
/// weakly, so a self-referencing grammar does not keep itself alive.
///
/// ```rust
/// use parsley::parser::{FnParser, ParseOutcome, ParserExt, Rule};
/// let rule = Rule::new("expr");
/// let _handle = rule.reference();
/// rule.define(FnParser::new("x", |_h, _ctx, _r| ParseOutcome::no_match()).rc()).unwrap();
/// assert!(rule.define(FnParser::new("y", |_h, _ctx, _r| ParseOutcome::no_match()).rc()).is_err());
/// ```
pub struct Rule {
    name: String,
    cell: Rc<OnceCell<ParserRef>>,
}

impl Rule {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            cell: Rc::new(OnceCell::new()),
        }
    }

    /// A handle that parses through this rule's definition.
    pub fn reference(&self) -> RuleRef {
        RuleRef {
            name: self.name.clone(),
            cell: Rc::downgrade(&self.cell),
        }
    }

    /// Sets the definition; a rule can only be defined once.
    pub fn define(&self, parser: ParserRef) -> Result<(), ParsleyError> {
        self.cell
            .set(parser)
            .map_err(|_| grammar_err!("rule '{}' is already defined", self.name))
    }

    pub fn is_defined(&self) -> bool {
        self.cell.get().is_some()
    }
}

impl Parser for Rule {
    fn name(&self) -> String {
        self.name.clone()
    }

    fn parse(&self, h: &mut History, ctx: &LeftRecCtx, r: &Reader) -> ParseOutcome {
        parse_defined(&self.name, &self.cell, h, ctx, r)
    }
}

/// Weak handle to a [`Rule`].
#[derive(Clone)]
pub struct RuleRef {
    name: String,
    cell: Weak<OnceCell<ParserRef>>,
}

impl Parser for RuleRef {
    fn name(&self) -> String {
        self.name.clone()
    }

    fn parse(&self, h: &mut History, ctx: &LeftRecCtx, r: &Reader) -> ParseOutcome {
        match self.cell.upgrade() {
            Some(cell) => parse_defined(&self.name, &cell, h, ctx, r),
            None => ParseOutcome::failed(grammar_err!("rule '{}' was dropped", self.name)),
        }
    }
}

fn parse_defined(
    name: &str,
    cell: &OnceCell<ParserRef>,
    h: &mut History,
    ctx: &LeftRecCtx,
    r: &Reader,
) -> ParseOutcome {
    match cell.get() {
        Some(parser) => parser.parse(h, ctx, r),
        None => ParseOutcome::failed(grammar_err!("rule '{}' is not defined", name)),
    }
}

impl fmt::Debug for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Rule")
            .field("name", &self.name)
            .field("defined", &self.is_defined())
            .finish()
    }
}

impl fmt::Debug for RuleRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RuleRef").field("name", &self.name).finish()
    }
}
