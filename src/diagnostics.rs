//! # Diagnostics
//!
//! This module defines the error model of the engine and its `miette`-based rendering.
//!
//! There are three kinds of outcome a parser can report:
//!
//! - **non-match**: not an error at all. The parser returns an empty
//!   [`ResultSet`](crate::parser::ResultSet) and no error.
//! - **match failure with diagnostic**: a [`ParsleyError::Parse`] carrying the furthest
//!   [`Position`] the grammar reached.
//! - **construction error**: a [`ParsleyError::Grammar`] returned while assembling a grammar
//!   (empty choice, empty literal word, rule defined twice). These never show up as ordinary
//!   parse failures.
//!
//! Errors are built with the [`parse_err!`](crate::parse_err) and
//! [`grammar_err!`](crate::grammar_err) macros:
//!
//! ```rust
//! use parsley::{parse_err, text::Position, ParsleyError};
//! let err = parse_err!(Position::new(3, 1, 4), "was expecting {}", "']'");
//! assert_eq!(err.to_string(), "was expecting ']'");
//! assert!(matches!(err, ParsleyError::Parse { .. }));
//! ```

use std::sync::Arc;

use miette::{Diagnostic, LabeledSpan, NamedSource, SourceCode, SourceSpan};
use thiserror::Error;

use crate::text::Position;

// Type aliases for clarity and brevity
pub type SourceArc = Arc<NamedSource<String>>;

// ============================================================================
// CORE ERROR TYPE
// ============================================================================

/// Unified error type for every failure the engine can report.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParsleyError {
    /// A required part of the grammar did not match; `pos` is the furthest point examined.
    #[error("{message}")]
    Parse { pos: Position, message: String },
    /// The grammar matched, but not the whole input.
    #[error("was expecting the end of input")]
    TrailingInput { pos: Position },
    /// An interpreter failed while evaluating a node.
    #[error("{message}")]
    Eval { pos: Position, message: String },
    /// The grammar itself is malformed.
    #[error("invalid grammar: {message}")]
    Grammar { message: String },
}

impl ParsleyError {
    /// Returns the input position the error refers to, if it has one.
    pub fn pos(&self) -> Option<Position> {
        match self {
            ParsleyError::Parse { pos, .. }
            | ParsleyError::TrailingInput { pos }
            | ParsleyError::Eval { pos, .. } => Some(*pos),
            ParsleyError::Grammar { .. } => None,
        }
    }

    /// Short machine readable code, used as the diagnostic code.
    pub fn code(&self) -> &'static str {
        match self {
            ParsleyError::Parse { .. } => "parsley::parse",
            ParsleyError::TrailingInput { .. } => "parsley::trailing_input",
            ParsleyError::Eval { .. } => "parsley::eval",
            ParsleyError::Grammar { .. } => "parsley::grammar",
        }
    }

    /// Keeps the error that got further into the input.
    ///
    /// On equal positions the `candidate` wins, so the error of a later alternative replaces
    /// an earlier one. Errors without a position rank before every positioned error.
    ///
    /// ```rust
    /// use parsley::{parse_err, text::Position, ParsleyError};
    /// let near = parse_err!(Position::new(3, 1, 4), "near");
    /// let far = parse_err!(Position::new(5, 1, 6), "far");
    /// let kept = ParsleyError::furthest(Some(far.clone()), Some(near));
    /// assert_eq!(kept, Some(far));
    /// ```
    pub fn furthest(current: Option<Self>, candidate: Option<Self>) -> Option<Self> {
        match (current, candidate) {
            (None, candidate) => candidate,
            (current, None) => current,
            (Some(current), Some(candidate)) => {
                if candidate.pos() >= current.pos() {
                    Some(candidate)
                } else {
                    Some(current)
                }
            }
        }
    }
}

// ============================================================================
// SOURCE RENDERING
// ============================================================================

/// Minimal error context for rendering: where the error points in which source.
#[derive(Debug, Default, Clone)]
pub struct ErrorContext {
    /// The source the error points into (if known).
    pub source: Option<SourceArc>,
    /// The byte span to label.
    pub span: Option<SourceSpan>,
    /// An optional help message.
    pub help: Option<String>,
}

/// A [`ParsleyError`] bundled with the source it refers to, ready for `miette` reporting.
#[derive(Debug, Error)]
#[error("{error}")]
pub struct SourceDiagnostic {
    pub error: ParsleyError,
    pub ctx: ErrorContext,
}

impl SourceDiagnostic {
    /// Attaches the named source text to `error`, labelling the character at the error position.
    pub fn new(error: ParsleyError, name: &str, text: &str) -> Self {
        let span = error
            .pos()
            .map(|pos| SourceSpan::from((pos.offset(), label_len(text, pos.offset()))));
        Self {
            error,
            ctx: ErrorContext {
                source: Some(to_error_source(name, text)),
                span,
                help: None,
            },
        }
    }

    /// Adds a help message to the rendered diagnostic.
    pub fn with_help(mut self, help: impl Into<String>) -> Self {
        self.ctx.help = Some(help.into());
        self
    }
}

/// Length of the label at `offset`: one character, or zero at the end of the source.
fn label_len(text: &str, offset: usize) -> usize {
    text.get(offset..)
        .and_then(|rest| rest.chars().next())
        .map_or(0, char::len_utf8)
}

impl Diagnostic for SourceDiagnostic {
    fn code<'a>(&'a self) -> Option<Box<dyn std::fmt::Display + 'a>> {
        Some(Box::new(self.error.code()))
    }

    fn help<'a>(&'a self) -> Option<Box<dyn std::fmt::Display + 'a>> {
        self.ctx
            .help
            .as_ref()
            .map(|h| Box::new(h) as Box<dyn std::fmt::Display + 'a>)
    }

    fn source_code(&self) -> Option<&dyn SourceCode> {
        self.ctx
            .source
            .as_ref()
            .map(|s| s.as_ref() as &dyn SourceCode)
    }

    fn labels(&self) -> Option<Box<dyn Iterator<Item = LabeledSpan> + '_>> {
        let span = self.ctx.span?;
        let label = LabeledSpan::new_with_span(Some(self.error.to_string()), span);
        Some(Box::new(std::iter::once(label)))
    }
}

/// Converts a source string into an `Arc<NamedSource<String>>` for use in error contexts.
pub fn to_error_source(name: &str, source: impl AsRef<str>) -> SourceArc {
    Arc::new(NamedSource::new(name, source.as_ref().to_string()))
}

// ============================================================================
// CONSTRUCTION MACROS
// ============================================================================

/// Constructs a [`ParsleyError::Parse`] at a position with a formatted message.
#[macro_export]
macro_rules! parse_err {
    ($pos:expr, $($arg:tt)+) => {
        $crate::ParsleyError::Parse {
            pos: $pos,
            message: format!($($arg)+),
        }
    };
}

/// Constructs a [`ParsleyError::Eval`] at a position with a formatted message.
#[macro_export]
macro_rules! eval_err {
    ($pos:expr, $($arg:tt)+) => {
        $crate::ParsleyError::Eval {
            pos: $pos,
            message: format!($($arg)+),
        }
    };
}

/// Constructs a [`ParsleyError::Grammar`] with a formatted message.
#[macro_export]
macro_rules! grammar_err {
    ($($arg:tt)+) => {
        $crate::ParsleyError::Grammar {
            message: format!($($arg)+),
        }
    };
}
