//! Token-stream pattern matching
//!
//! A [`Matcher`] describes one grammar fragment: a predicate over single
//! tokens plus a `[min, max]` repetition count. Combine with `|`, widen with
//! `star`/`plus` and negate leaves with `invert`.

pub mod combinator;
pub mod named;

pub use combinator::{Leaf, MatchOutcome, Matcher};
pub use named::NAMED_MATCHERS;
