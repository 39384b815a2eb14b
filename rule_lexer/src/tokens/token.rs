//! Token and category types
use super::value::Value;
use serde::{Serialize, Serializer};
use std::fmt;

/// Lexical category of a token
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    Null,
    Whitespace,
    DateTime,
    Numeric,
    String,
    ArithmeticOperator,
    BooleanOperator,
    ComparisonOperator,
    Grouping,
    Access,
    Case,
    Boolean,
    Function,
    Identifier,
    /// Category introduced by a custom scanner or a hand-built token stream
    Custom(&'static str),
}

impl Category {
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Null => "null",
            Category::Whitespace => "whitespace",
            Category::DateTime => "datetime",
            Category::Numeric => "numeric",
            Category::String => "string",
            Category::ArithmeticOperator => "arithmetic_operator",
            Category::BooleanOperator => "boolean_operator",
            Category::ComparisonOperator => "comparison_operator",
            Category::Grouping => "grouping",
            Category::Access => "access",
            Category::Case => "case",
            Category::Boolean => "boolean",
            Category::Function => "function",
            Category::Identifier => "identifier",
            Category::Custom(name) => *name,
        }
    }

    /// Operators after which a `-` is a unary negation
    pub fn is_operator(&self) -> bool {
        matches!(
            self,
            Category::ArithmeticOperator | Category::ComparisonOperator | Category::BooleanOperator
        )
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

impl Serialize for Category {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

/// A lexical token: category, semantic value and the source text it came from
///
/// Equality compares category and value only; two tokens scanned from
/// `AND` and `&&` are equal.
#[derive(Debug, Clone, Serialize)]
pub struct Token {
    category: Category,
    value: Value,
    #[serde(skip_serializing_if = "Option::is_none")]
    raw: Option<String>,
}

impl Token {
    /// Token with no source text
    pub fn new(category: Category, value: impl Into<Value>) -> Self {
        Self {
            category,
            value: value.into(),
            raw: None,
        }
    }

    pub fn with_raw(category: Category, value: impl Into<Value>, raw: impl Into<String>) -> Self {
        Self {
            category,
            value: value.into(),
            raw: Some(raw.into()),
        }
    }

    pub fn category(&self) -> Category {
        self.category
    }

    pub fn value(&self) -> &Value {
        &self.value
    }

    pub fn raw(&self) -> Option<&str> {
        self.raw.as_deref()
    }

    pub fn is(&self, category: Category) -> bool {
        self.category == category
    }

    /// Length of the source text in characters, 0 without source text
    pub fn len(&self) -> usize {
        self.raw.as_deref().map_or(0, |raw| raw.chars().count())
    }

    pub fn is_empty(&self) -> bool {
        self.raw.as_deref().map_or(true, str::is_empty)
    }

    /// Bytes of input this token consumed
    pub(crate) fn consumed_bytes(&self) -> usize {
        self.raw.as_deref().map_or(0, str::len)
    }
}

impl PartialEq for Token {
    fn eq(&self, other: &Self) -> bool {
        self.category == other.category && self.value == other.value
    }
}

impl Eq for Token {}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.raw {
            Some(raw) => f.write_str(raw),
            None => write!(f, "{}", self.value),
        }
    }
}
