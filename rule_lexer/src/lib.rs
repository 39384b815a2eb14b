//! Lexical front end for a small spreadsheet-style rules language
//!
//! Source text is turned into a flat list of [`Token`]s by a [`Tokenizer`]
//! driven by an ordered [`ScannerSet`]. [`Matcher`] then recognizes grammar
//! fragments over that token stream.

pub mod config;
pub mod lexical;
#[macro_use]
pub mod logging;
pub mod matcher;
pub mod scanner;
pub mod tokens;
pub mod utils;

pub use lexical::{
    tokenize, tokenize_with_preferences, LexicalMetrics, Reason, Tokenizer, TokenizerError,
    UnknownReason,
};
pub use matcher::{MatchOutcome, Matcher};
pub use scanner::{Conversion, ConversionError, Scanner, ScannerSet};
pub use tokens::{symbols, Category, Symbol, Token, Value};
