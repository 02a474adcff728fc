//! # Combinators
//!
//! Structural parsers built on the [`Parser`](crate::parser::Parser) contract. None of them
//! look at the input directly; they only call sub-parsers and combine their outcomes.
//!
//! | Combinator | Matches |
//! |------------|---------|
//! | [`Choice`] | the first alternative that matches |
//! | [`Many`] | a bounded number of repetitions |
//! | [`Recursive`] | an index-driven sequence; [`seq`] and [`seq_try`] configure it |
//! | [`SepBy`] | items separated by a separator, flattened into one node |
//! | [`Sentence`] | a parser followed by the end of input |
//!
//! Left recursion is bounded by [`Recursive`]: re-entering the same sequence at the same
//! position more often than there is input left is refused and reported through
//! [`CurtailingParsers`](crate::data::CurtailingParsers).

pub mod choice;
pub mod many;
pub mod recursive;
pub mod sentence;
pub mod sep_by;

pub use choice::Choice;
pub use many::{many, many1, optional, Many};
pub use recursive::{seq, seq_try, Recursive};
pub use sentence::Sentence;
pub use sep_by::{sep_by, sep_by1, SepBy};
