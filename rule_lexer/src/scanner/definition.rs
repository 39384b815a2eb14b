//! A single lexical rule: anchored pattern, value converter and context condition
use crate::tokens::{Category, Token, Value};
use regex::{Regex, RegexBuilder};
use std::fmt;
use std::sync::Arc;

/// Result of converting matched text
#[derive(Debug, Clone, PartialEq)]
pub enum Conversion {
    /// One token of the scanner's category carrying the matched text
    Value(Value),
    /// Tokens used verbatim, e.g. a function name followed by a synthetic `open`
    Tokens(Vec<Token>),
}

impl From<Value> for Conversion {
    fn from(value: Value) -> Self {
        Conversion::Value(value)
    }
}

pub type Converter = Arc<dyn Fn(&str) -> Result<Conversion, String> + Send + Sync>;
pub type Condition = Arc<dyn Fn(Option<&Token>) -> bool + Send + Sync>;

/// A converter rejected the text its pattern matched
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("cannot convert '{raw}' as {category}: {message}")]
pub struct ConversionError {
    pub category: Category,
    pub raw: String,
    pub message: String,
}

#[derive(Clone)]
pub struct Scanner {
    category: Category,
    pattern: String,
    regex: Regex,
    converter: Converter,
    condition: Option<Condition>,
}

impl Scanner {
    /// Scanner whose tokens carry the matched text as a string value.
    ///
    /// The pattern is anchored at the start of the input and matched case
    /// insensitively.
    pub fn new(category: Category, pattern: &str) -> Result<Self, regex::Error> {
        let regex = RegexBuilder::new(&format!(r"\A(?:{})", pattern))
            .case_insensitive(true)
            .build()?;

        Ok(Self {
            category,
            pattern: pattern.to_string(),
            regex,
            converter: Arc::new(|raw| Ok(Conversion::Value(Value::String(raw.to_string())))),
            condition: None,
        })
    }

    pub fn with_converter<F>(mut self, converter: F) -> Self
    where
        F: Fn(&str) -> Result<Conversion, String> + Send + Sync + 'static,
    {
        self.converter = Arc::new(converter);
        self
    }

    /// Only accept a match when `condition` holds for the last significant token
    pub fn with_condition<F>(mut self, condition: F) -> Self
    where
        F: Fn(Option<&Token>) -> bool + Send + Sync + 'static,
    {
        self.condition = Some(Arc::new(condition));
        self
    }

    pub fn category(&self) -> Category {
        self.category
    }

    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    pub fn accepts(&self, previous: Option<&Token>) -> bool {
        self.condition
            .as_ref()
            .map_or(true, |condition| condition(previous))
    }

    /// Try this scanner against the start of `remaining`.
    ///
    /// Returns `Ok(None)` when the pattern does not match or the condition
    /// rejects `previous`.
    pub fn scan(
        &self,
        remaining: &str,
        previous: Option<&Token>,
    ) -> Result<Option<Vec<Token>>, ConversionError> {
        let Some(found) = self.regex.find(remaining) else {
            return Ok(None);
        };

        if !self.accepts(previous) {
            return Ok(None);
        }

        let raw = found.as_str();
        let conversion = (self.converter)(raw).map_err(|message| ConversionError {
            category: self.category,
            raw: raw.to_string(),
            message,
        })?;

        Ok(Some(match conversion {
            Conversion::Value(value) => vec![Token::with_raw(self.category, value, raw)],
            Conversion::Tokens(tokens) => tokens,
        }))
    }
}

impl fmt::Debug for Scanner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Scanner")
            .field("category", &self.category)
            .field("pattern", &self.pattern)
            .field("conditional", &self.condition.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tokens::{symbols, Symbol};

    fn tag_scanner() -> Scanner {
        Scanner::new(Category::Custom("tag"), r"#\w+\b")
            .unwrap()
            .with_converter(|raw| {
                Ok(Value::Symbol(Symbol::from_string(raw[1..].to_string())).into())
            })
    }

    #[test]
    fn test_no_match_returns_none() {
        let scanner = Scanner::new(Category::Whitespace, r"\s+").unwrap();
        assert_eq!(scanner.scan("A", None), Ok(None));
    }

    #[test]
    fn test_pattern_is_anchored() {
        let scanner = tag_scanner();
        assert_eq!(scanner.scan("x #apple", None), Ok(None));
    }

    #[test]
    fn test_default_converter_keeps_raw_text() {
        let scanner = Scanner::new(Category::Identifier, r"[a-z]+").unwrap();
        let tokens = scanner.scan("Abc def", None).unwrap().unwrap();

        assert_eq!(tokens.len(), 1);
        assert_eq!(tokens[0].value(), &Value::from("Abc"));
        assert_eq!(tokens[0].raw(), Some("Abc"));
    }

    #[test]
    fn test_custom_scanner() {
        let tokens = tag_scanner().scan("#apple + #pear", None).unwrap().unwrap();

        assert_eq!(tokens[0].category(), Category::Custom("tag"));
        assert_eq!(tokens[0].value(), &Value::Symbol(Symbol::new("apple")));
        assert_eq!(tokens[0].raw(), Some("#apple"));
    }

    #[test]
    fn test_condition_rejects_previous_token() {
        let scanner = Scanner::new(Category::ArithmeticOperator, "-")
            .unwrap()
            .with_converter(|_| Ok(Value::Symbol(symbols::NEGATE).into()))
            .with_condition(|previous| previous.is_none());

        assert!(scanner.scan("-1", None).unwrap().is_some());

        let previous = Token::with_raw(Category::Numeric, 2, "2");
        assert_eq!(scanner.scan("-1", Some(&previous)), Ok(None));
    }

    #[test]
    fn test_null_value_still_yields_a_token() {
        let scanner = Scanner::new(Category::Null, r"null\b")
            .unwrap()
            .with_converter(|_| Ok(Value::Null.into()));

        let tokens = scanner.scan("null", None).unwrap().unwrap();
        assert_eq!(tokens.len(), 1);
        assert_eq!(tokens[0].value(), &Value::Null);
    }

    #[test]
    fn test_converter_failure() {
        let scanner = Scanner::new(Category::Numeric, r"\d+")
            .unwrap()
            .with_converter(|raw| Err(format!("'{}' is out of range", raw)));

        let error = scanner.scan("99", None).unwrap_err();
        assert_eq!(error.raw, "99");
        assert_eq!(error.category, Category::Numeric);
        assert!(error.to_string().contains("out of range"));
    }

    #[test]
    fn test_invalid_pattern_is_reported() {
        assert!(Scanner::new(Category::Identifier, "(unclosed").is_err());
    }
}
