//! Semantic values carried by tokens
use bigdecimal::BigDecimal;
use chrono::{DateTime, FixedOffset};
use serde::Serialize;
use std::borrow::Cow;
use std::fmt;

/// Normalized name for operators, grouping marks and function names
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct Symbol(Cow<'static, str>);

impl Symbol {
    pub const fn new(name: &'static str) -> Self {
        Self(Cow::Borrowed(name))
    }

    /// Symbol for a name only known at runtime (function names)
    pub fn from_string(name: String) -> Self {
        Self(Cow::Owned(name))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Well-known symbols produced by the default scanners
pub mod symbols {
    use super::Symbol;

    // Arithmetic
    pub const NEGATE: Symbol = Symbol::new("negate");
    pub const ADD: Symbol = Symbol::new("add");
    pub const SUBTRACT: Symbol = Symbol::new("subtract");
    pub const MULTIPLY: Symbol = Symbol::new("multiply");
    pub const DIVIDE: Symbol = Symbol::new("divide");
    pub const MOD: Symbol = Symbol::new("mod");
    pub const POW: Symbol = Symbol::new("pow");
    pub const BITOR: Symbol = Symbol::new("bitor");
    pub const BITAND: Symbol = Symbol::new("bitand");

    // Boolean
    pub const AND: Symbol = Symbol::new("and");
    pub const OR: Symbol = Symbol::new("or");

    // Comparison
    pub const LT: Symbol = Symbol::new("lt");
    pub const LE: Symbol = Symbol::new("le");
    pub const GT: Symbol = Symbol::new("gt");
    pub const GE: Symbol = Symbol::new("ge");
    pub const EQ: Symbol = Symbol::new("eq");
    pub const NE: Symbol = Symbol::new("ne");

    // Grouping and access
    pub const OPEN: Symbol = Symbol::new("open");
    pub const CLOSE: Symbol = Symbol::new("close");
    pub const COMMA: Symbol = Symbol::new("comma");
    pub const LBRACKET: Symbol = Symbol::new("lbracket");
    pub const RBRACKET: Symbol = Symbol::new("rbracket");

    // Case statements; `case`/`end` reuse OPEN/CLOSE
    pub const THEN: Symbol = Symbol::new("then");
    pub const WHEN: Symbol = Symbol::new("when");
    pub const ELSE: Symbol = Symbol::new("else");
}

/// Semantic value of a token
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum Value {
    Null,
    Integer(i64),
    Decimal(BigDecimal),
    String(String),
    Boolean(bool),
    DateTime(DateTime<FixedOffset>),
    Symbol(Symbol),
}

impl Value {
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Integer(_) => "integer",
            Value::Decimal(_) => "decimal",
            Value::String(_) => "string",
            Value::Boolean(_) => "boolean",
            Value::DateTime(_) => "datetime",
            Value::Symbol(_) => "symbol",
        }
    }

    pub fn as_symbol(&self) -> Option<&Symbol> {
        match self {
            Value::Symbol(symbol) => Some(symbol),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn is_symbol(&self, symbol: &Symbol) -> bool {
        self.as_symbol() == Some(symbol)
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => f.write_str("null"),
            Value::Integer(i) => write!(f, "{}", i),
            Value::Decimal(d) => write!(f, "{}", d),
            Value::String(s) => f.write_str(s),
            Value::Boolean(b) => write!(f, "{}", b),
            Value::DateTime(dt) => f.write_str(&dt.to_rfc3339()),
            Value::Symbol(s) => write!(f, "{}", s),
        }
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Value::Integer(value)
    }
}

impl From<i32> for Value {
    fn from(value: i32) -> Self {
        Value::Integer(i64::from(value))
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Value::Boolean(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::String(value.to_string())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::String(value)
    }
}

impl From<BigDecimal> for Value {
    fn from(value: BigDecimal) -> Self {
        Value::Decimal(value)
    }
}

impl From<DateTime<FixedOffset>> for Value {
    fn from(value: DateTime<FixedOffset>) -> Self {
        Value::DateTime(value)
    }
}

impl From<Symbol> for Value {
    fn from(value: Symbol) -> Self {
        Value::Symbol(value)
    }
}
