//! Tokenizer failures
use crate::config::compile_time::lexical::MAX_ERROR_SNIPPET_LENGTH;
use crate::logging::codes;
use crate::tokens::Category;
use crate::utils::Position;
use std::fmt;
use std::str::FromStr;

/// Lexical errors; every failure ends the tokenizer run
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum TokenizerError {
    #[error("parse error at {position}: unable to tokenize '{remaining}'{}", detail_suffix(.detail))]
    ParseError {
        /// Unconsumed input, truncated for display
        remaining: String,
        position: Position,
        detail: Option<String>,
    },

    #[error("too many opening parentheses: {unclosed} left unclosed")]
    TooManyOpeningParentheses { unclosed: usize },

    #[error("too many closing parentheses at {position}")]
    TooManyClosingParentheses { position: Position },

    #[error("unexpected zero-width match for '{category}' at {position}")]
    UnexpectedZeroWidthMatch {
        category: Category,
        position: Position,
    },
}

fn detail_suffix(detail: &Option<String>) -> String {
    detail
        .as_ref()
        .map(|d| format!(" ({})", d))
        .unwrap_or_default()
}

impl TokenizerError {
    /// Parse error for the input at `position`
    pub fn parse_error(remaining: &str, position: Position, detail: Option<String>) -> Self {
        let remaining = match remaining.char_indices().nth(MAX_ERROR_SNIPPET_LENGTH) {
            Some((cut, _)) => format!("{}...", &remaining[..cut]),
            None => remaining.to_string(),
        };

        TokenizerError::ParseError {
            remaining,
            position,
            detail,
        }
    }

    pub fn reason(&self) -> Reason {
        match self {
            TokenizerError::ParseError { .. } => Reason::ParseError,
            TokenizerError::TooManyOpeningParentheses { .. } => Reason::TooManyOpeningParentheses,
            TokenizerError::TooManyClosingParentheses { .. } => Reason::TooManyClosingParentheses,
            TokenizerError::UnexpectedZeroWidthMatch { .. } => Reason::UnexpectedZeroWidthMatch,
        }
    }

    /// Source position of the failure; unbalanced opening has none
    pub fn position(&self) -> Option<Position> {
        match self {
            TokenizerError::ParseError { position, .. }
            | TokenizerError::TooManyClosingParentheses { position }
            | TokenizerError::UnexpectedZeroWidthMatch { position, .. } => Some(*position),
            TokenizerError::TooManyOpeningParentheses { .. } => None,
        }
    }

    /// Structured key/value details for diagnostics and logging
    pub fn meta(&self) -> Vec<(&'static str, String)> {
        let mut meta = Vec::new();
        match self {
            TokenizerError::ParseError {
                remaining, detail, ..
            } => {
                meta.push(("at", remaining.clone()));
                if let Some(detail) = detail {
                    meta.push(("detail", detail.clone()));
                }
            }
            TokenizerError::TooManyOpeningParentheses { unclosed } => {
                meta.push(("unclosed", unclosed.to_string()));
            }
            TokenizerError::TooManyClosingParentheses { .. } => {}
            TokenizerError::UnexpectedZeroWidthMatch { category, .. } => {
                meta.push(("token_category", category.to_string()));
            }
        }

        if let Some(position) = self.position() {
            meta.push(("offset", position.offset.to_string()));
            meta.push(("line", position.line.to_string()));
            meta.push(("column", position.column.to_string()));
        }

        meta
    }

    pub fn error_code(&self) -> crate::logging::Code {
        match self.reason() {
            Reason::ParseError => codes::lexical::PARSE_ERROR,
            Reason::TooManyOpeningParentheses => codes::lexical::TOO_MANY_OPENING_PARENTHESES,
            Reason::TooManyClosingParentheses => codes::lexical::TOO_MANY_CLOSING_PARENTHESES,
            Reason::UnexpectedZeroWidthMatch => codes::lexical::UNEXPECTED_ZERO_WIDTH_MATCH,
        }
    }
}

/// Closed set of tokenizer failure reasons
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Reason {
    ParseError,
    TooManyOpeningParentheses,
    TooManyClosingParentheses,
    UnexpectedZeroWidthMatch,
}

impl Reason {
    pub const ALL: [Reason; 4] = [
        Reason::ParseError,
        Reason::TooManyOpeningParentheses,
        Reason::TooManyClosingParentheses,
        Reason::UnexpectedZeroWidthMatch,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Reason::ParseError => "parse_error",
            Reason::TooManyOpeningParentheses => "too_many_opening_parentheses",
            Reason::TooManyClosingParentheses => "too_many_closing_parentheses",
            Reason::UnexpectedZeroWidthMatch => "unexpected_zero_width_match",
        }
    }
}

impl fmt::Display for Reason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unhandled tokenizer error reason: {0}")]
pub struct UnknownReason(pub String);

impl FromStr for Reason {
    type Err = UnknownReason;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Reason::ALL
            .into_iter()
            .find(|reason| reason.as_str() == s)
            .ok_or_else(|| UnknownReason(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    #[test]
    fn test_reason_names_round_trip() {
        for reason in Reason::ALL {
            assert_eq!(reason.as_str().parse::<Reason>(), Ok(reason));
        }
    }

    #[test]
    fn test_unknown_reason_is_rejected() {
        assert_matches!("syntax_error".parse::<Reason>(), Err(UnknownReason(name)) if name == "syntax_error");
    }

    #[test]
    fn test_parse_error_snippet_is_truncated() {
        let long = "$".repeat(MAX_ERROR_SNIPPET_LENGTH * 2);
        let error = TokenizerError::parse_error(&long, Position::start(), None);
        assert_matches!(&error, TokenizerError::ParseError { remaining, .. } if remaining.len() == MAX_ERROR_SNIPPET_LENGTH + 3);
    }

    #[test]
    fn test_messages_name_the_failure() {
        let opening = TokenizerError::TooManyOpeningParentheses { unclosed: 1 };
        assert!(opening.to_string().contains("too many opening parentheses"));

        let closing = TokenizerError::TooManyClosingParentheses {
            position: Position::start(),
        };
        assert!(closing.to_string().contains("too many closing parentheses"));

        let parse = TokenizerError::parse_error("$x", Position::new(2, 1, 3), Some("bad".into()));
        assert_eq!(parse.to_string(), "parse error at 1:3: unable to tokenize '$x' (bad)");
    }

    #[test]
    fn test_meta_and_codes() {
        let error = TokenizerError::UnexpectedZeroWidthMatch {
            category: Category::Custom("tag"),
            position: Position::new(3, 1, 4),
        };

        assert_eq!(error.reason(), Reason::UnexpectedZeroWidthMatch);
        assert_eq!(error.error_code(), codes::lexical::UNEXPECTED_ZERO_WIDTH_MATCH);
        let meta = error.meta();
        assert!(meta.contains(&("token_category", "tag".to_string())));
        assert!(meta.contains(&("offset", "3".to_string())));

        let opening = TokenizerError::TooManyOpeningParentheses { unclosed: 2 };
        assert_eq!(opening.position(), None);
        assert_eq!(opening.meta(), vec![("unclosed", "2".to_string())]);
    }
}
