//! Error and success codes with their classification metadata
//!
//! Single source of truth for every code the lexer logs or attaches to an
//! error, plus the lookup functions the event formatter uses.

use std::collections::HashMap;
use std::sync::OnceLock;

/// Universal code wrapper for both error and success codes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Code(&'static str);

impl Code {
    pub const fn new(code: &'static str) -> Self {
        Self(code)
    }

    pub fn as_str(&self) -> &'static str {
        self.0
    }
}

impl std::fmt::Display for Code {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Error severity levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Severity {
    Critical = 0,
    High = 1,
    Medium = 2,
    Low = 3,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Critical => "Critical",
            Severity::High => "High",
            Severity::Medium => "Medium",
            Severity::Low => "Low",
        }
    }
}

/// Registry entry describing an error code
#[derive(Debug, Clone)]
pub struct ErrorMetadata {
    pub code: &'static str,
    pub category: &'static str,
    pub severity: Severity,
    /// Whether the caller can fix the input and retry
    pub recoverable: bool,
    pub description: &'static str,
    pub recommended_action: &'static str,
}

// ============================================================================
// ERROR CODE CONSTANTS
// ============================================================================

/// System error codes
pub mod system {
    use super::Code;

    pub const INTERNAL_ERROR: Code = Code::new("ERR001");
}

/// Lexical analysis error codes, one per tokenizer failure reason
pub mod lexical {
    use super::Code;

    pub const PARSE_ERROR: Code = Code::new("E020");
    pub const TOO_MANY_OPENING_PARENTHESES: Code = Code::new("E021");
    pub const TOO_MANY_CLOSING_PARENTHESES: Code = Code::new("E022");
    pub const UNEXPECTED_ZERO_WIDTH_MATCH: Code = Code::new("E023");
}

/// Success codes
pub mod success {
    use super::Code;

    pub const SYSTEM_INITIALIZATION_COMPLETED: Code = Code::new("I004");
    pub const TOKENIZATION_COMPLETE: Code = Code::new("I020");
    pub const SCANNER_SET_CONFIGURED: Code = Code::new("I021");
}

// ============================================================================
// ERROR METADATA REGISTRY
// ============================================================================

const LEXICAL: &str = "Lexical";

const REGISTERED: [ErrorMetadata; 5] = [
    ErrorMetadata {
        code: "ERR001",
        category: "System",
        severity: Severity::Critical,
        recoverable: false,
        description: "Critical internal system error",
        recommended_action: "File a bug report with the failing input",
    },
    ErrorMetadata {
        code: "E020",
        category: LEXICAL,
        severity: Severity::High,
        recoverable: true,
        description: "No scanner accepted the input at the current position",
        recommended_action: "Check the expression near the reported position for unsupported characters",
    },
    ErrorMetadata {
        code: "E021",
        category: LEXICAL,
        severity: Severity::High,
        recoverable: true,
        description: "Input ended with unclosed parentheses",
        recommended_action: "Add the missing ')' or remove the extra '('",
    },
    ErrorMetadata {
        code: "E022",
        category: LEXICAL,
        severity: Severity::High,
        recoverable: true,
        description: "A ')' appeared without a matching '('",
        recommended_action: "Remove the extra ')' or add the missing '('",
    },
    ErrorMetadata {
        code: "E023",
        category: LEXICAL,
        severity: Severity::Critical,
        recoverable: false,
        description: "A scanner accepted input without consuming any characters",
        recommended_action: "Fix the custom scanner pattern so it cannot match empty text",
    },
];

static ERROR_REGISTRY: OnceLock<HashMap<&'static str, &'static ErrorMetadata>> = OnceLock::new();

fn registry() -> &'static HashMap<&'static str, &'static ErrorMetadata> {
    ERROR_REGISTRY.get_or_init(|| REGISTERED.iter().map(|m| (m.code, m)).collect())
}

// ============================================================================
// CLASSIFICATION FUNCTIONS
// ============================================================================

/// Get metadata for a code, if it is an error code
pub fn get_metadata(code: &str) -> Option<&'static ErrorMetadata> {
    registry().get(code).copied()
}

/// Get severity for a code; unknown and non-error codes are Low
pub fn get_severity(code: &str) -> Severity {
    get_metadata(code)
        .map(|m| m.severity)
        .unwrap_or(Severity::Low)
}

/// Get the category name for a code
pub fn get_category(code: &str) -> &'static str {
    if let Some(metadata) = get_metadata(code) {
        return metadata.category;
    }

    match code.chars().next() {
        Some('I') => "Success",
        Some('W') => "Warning",
        Some('D') => "Debug",
        _ => "Unknown",
    }
}

pub fn get_description(code: &str) -> &'static str {
    get_metadata(code)
        .map(|m| m.description)
        .unwrap_or("Unknown error")
}

pub fn get_action(code: &str) -> &'static str {
    get_metadata(code)
        .map(|m| m.recommended_action)
        .unwrap_or("No specific action available")
}

pub fn is_recoverable(code: &str) -> bool {
    get_metadata(code).map_or(true, |m| m.recoverable)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_lexical_code_has_metadata() {
        for code in [
            lexical::PARSE_ERROR,
            lexical::TOO_MANY_OPENING_PARENTHESES,
            lexical::TOO_MANY_CLOSING_PARENTHESES,
            lexical::UNEXPECTED_ZERO_WIDTH_MATCH,
        ] {
            assert!(get_metadata(code.as_str()).is_some(), "missing {}", code);
            assert_eq!(get_category(code.as_str()), "Lexical");
        }
    }

    #[test]
    fn test_unknown_code_defaults() {
        assert_eq!(get_description("E999"), "Unknown error");
        assert_eq!(get_severity("E999"), Severity::Low);
        assert!(is_recoverable("E999"));
        assert!(is_recoverable(lexical::PARSE_ERROR.as_str()));
        assert!(!is_recoverable(lexical::UNEXPECTED_ZERO_WIDTH_MATCH.as_str()));
    }

    #[test]
    fn test_success_category() {
        assert_eq!(
            get_category(success::TOKENIZATION_COMPLETE.as_str()),
            "Success"
        );
    }
}
