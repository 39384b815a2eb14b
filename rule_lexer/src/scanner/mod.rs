//! Scanners: the lexical rules the tokenizer applies
//!
//! A [`Scanner`] is an anchored, case-insensitive pattern with a converter
//! that turns the matched text into tokens and an optional condition on the
//! previous significant token. A [`ScannerSet`] is the ordered configuration
//! a tokenizer runs with; [`ScannerSet::defaults`] is the built-in set from
//! [`defaults`].

pub mod defaults;
pub mod definition;
pub mod registry;

pub use defaults::DEFAULT_KEYS;
pub use definition::{Condition, Conversion, ConversionError, Converter, Scanner};
pub use registry::ScannerSet;
