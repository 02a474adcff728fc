//! # Parsley
//!
//! A parser-combinator engine for ambiguous and left-recursive grammars.
//!
//! Grammars are assembled from small parsers ([`text::terminal`]) and structural
//! [`combinator`]s, all implementing the [`parser::Parser`] contract. Parsing keeps every
//! viable continuation, bounds left recursion by curtailment, and produces a tree of
//! [`ast::Node`]s that [`engine::evaluate`] turns into a [`ast::Value`] through
//! grammar-supplied interpreters.
//!
//! ```rust
//! use parsley::prelude::*;
//!
//! let sum = interpreter(|ctx, nodes| {
//!     let mut total = 0;
//!     for node in nodes.iter().step_by(2) {
//!         total += node.value(ctx)?.as_int().unwrap_or(0);
//!     }
//!     Ok(Value::Int(total))
//! });
//! let p = sep_by1("SUM", terminal::integer().rc(), terminal::rune('+', "+").rc(), Some(sum));
//! let value = evaluate_text("1 + 2 + 3", ReaderOptions::default(), &p, &()).unwrap();
//! assert_eq!(value, Value::Int(6));
//! ```

pub use crate::diagnostics::{ErrorContext, ParsleyError, SourceDiagnostic};

pub mod ast;
pub mod cli;
pub mod combinator;
pub mod data;
pub mod diagnostics;
pub mod engine;
pub mod json;
pub mod parser;
pub mod text;

/// The names needed to assemble and run a grammar.
pub mod prelude {
    pub use crate::ast::{builder, interpreter, BuilderRef, Interpreter, Node, NonTerminalNode, TerminalNode, Value};
    pub use crate::combinator::{
        many, many1, optional, sep_by, sep_by1, seq, seq_try, Choice, Many, Recursive, Sentence,
    };
    pub use crate::engine::{evaluate, evaluate_text, evaluate_with_history, parse};
    pub use crate::parser::{FnParser, History, ParseOutcome, Parser, ParserExt, ParserRef, Rule};
    pub use crate::text::{terminal, File, Position, Reader, ReaderOptions};
    pub use crate::ParsleyError;
}
