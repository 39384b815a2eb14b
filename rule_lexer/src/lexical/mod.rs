//! Lexical analysis: turns rule source text into significant tokens
//!
//! [`Tokenizer`] applies a [`ScannerSet`](crate::scanner::ScannerSet) left to
//! right without backtracking. Every run either yields the full token list or
//! stops at the first [`TokenizerError`].

pub mod error;
pub mod tokenizer;

use crate::config::runtime::LexicalPreferences;
use crate::tokens::Token;

pub use error::{Reason, TokenizerError, UnknownReason};
pub use tokenizer::{LexicalMetrics, Tokenizer};

/// Tokenize with the default scanners and environment-derived preferences
pub fn tokenize(input: &str) -> Result<Vec<Token>, TokenizerError> {
    Tokenizer::new().tokenize(input)
}

/// Tokenize with explicit preferences
pub fn tokenize_with_preferences(
    input: &str,
    preferences: LexicalPreferences,
) -> Result<Vec<Token>, TokenizerError> {
    Tokenizer::with_preferences(preferences).tokenize(input)
}
