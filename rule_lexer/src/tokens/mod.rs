//! Token system for the rule lexer
//!
//! A [`Token`] pairs a [`Category`] with a semantic [`Value`] and keeps the
//! source text it was scanned from. Operators, grouping marks and function
//! names carry a normalized [`Symbol`]; the ones produced by the default
//! scanners live in [`symbols`].

pub mod token;
pub mod value;

pub use token::{Category, Token};
pub use value::{symbols, Symbol, Value};
