//! Shared primitive types used by the tokenizer and its diagnostics.

pub mod span;

pub use span::{Position, SourceMap, Span};
