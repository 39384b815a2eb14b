//! Tokenizer: drives the scanner set over an input string
use super::error::TokenizerError;
use crate::config::compile_time::lexical::INPUT_BYTES_PER_TOKEN_HINT;
use crate::config::runtime::LexicalPreferences;
use crate::logging::codes;
use crate::scanner::ScannerSet;
use crate::tokens::{symbols, Category, Token};
use crate::utils::{Position, Span};
use crate::{log_debug, log_error, log_success};
use serde::Serialize;
use std::collections::BTreeMap;

/// Counters gathered over one tokenizer run
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize)]
pub struct LexicalMetrics {
    pub total_tokens: usize,
    pub whitespace_skipped: usize,
    pub category_counts: BTreeMap<String, usize>,
    pub max_nesting: usize,
    pub scanner_attempts: usize,
}

impl LexicalMetrics {
    fn record_token(&mut self, token: &Token) {
        self.total_tokens += 1;
        *self
            .category_counts
            .entry(token.category().to_string())
            .or_insert(0) += 1;
    }
}

/// Span over the character at `position`, empty at end of input
fn offending_span(input: &str, position: Position) -> Span {
    let text = input
        .get(position.offset..)
        .and_then(|rest| rest.chars().next())
        .map(String::from)
        .unwrap_or_default();
    Span::covering(position, &text)
}

fn is_grouping(token: &Token, symbol: &crate::tokens::Symbol) -> bool {
    token.is(Category::Grouping) && token.value().is_symbol(symbol)
}

/// Converts source text into significant tokens.
///
/// Whitespace is dropped, `-` is disambiguated by the last significant token
/// and grouping parentheses must balance.
#[derive(Debug, Clone)]
pub struct Tokenizer {
    scanners: ScannerSet,
    preferences: LexicalPreferences,
}

impl Default for Tokenizer {
    fn default() -> Self {
        Self::new()
    }
}

impl Tokenizer {
    /// Default scanners with environment-derived preferences
    pub fn new() -> Self {
        Self::with_preferences(LexicalPreferences::default())
    }

    pub fn with_preferences(preferences: LexicalPreferences) -> Self {
        Self {
            scanners: ScannerSet::with_case_sensitivity(preferences.case_sensitive),
            preferences,
        }
    }

    /// Run an explicit scanner set; `case_sensitive` has no effect on it
    pub fn with_scanners(scanners: ScannerSet) -> Self {
        Self {
            scanners,
            preferences: LexicalPreferences::default(),
        }
    }

    /// Swap in a different scanner set, keeping the current preferences
    pub fn using_scanners(mut self, scanners: ScannerSet) -> Self {
        self.scanners = scanners;
        self
    }

    pub fn scanners(&self) -> &ScannerSet {
        &self.scanners
    }

    pub fn preferences(&self) -> &LexicalPreferences {
        &self.preferences
    }

    pub fn tokenize(&self, input: &str) -> Result<Vec<Token>, TokenizerError> {
        self.run(input).map(|(tokens, _)| tokens)
    }

    pub fn tokenize_with_metrics(
        &self,
        input: &str,
    ) -> Result<(Vec<Token>, LexicalMetrics), TokenizerError> {
        self.run(input)
    }

    fn run(&self, input: &str) -> Result<(Vec<Token>, LexicalMetrics), TokenizerError> {
        log_debug!("Starting tokenization",
            "bytes" => input.len(),
            "scanners" => self.scanners.len()
        );

        let mut tokens: Vec<Token> = Vec::with_capacity(input.len() / INPUT_BYTES_PER_TOKEN_HINT + 1);
        let mut metrics = LexicalMetrics::default();
        let mut offset = 0;
        let mut position = Position::start();
        let mut balance: usize = 0;

        while offset < input.len() {
            let remaining = &input[offset..];
            let produced = self
                .scan_next(remaining, tokens.last(), position, &mut metrics)
                .map_err(|e| self.report(input, e))?;

            if let Some(token) = produced.iter().find(|token| token.is_empty()) {
                return Err(self.report(input, TokenizerError::UnexpectedZeroWidthMatch {
                    category: token.category(),
                    position,
                }));
            }

            let mut consumed = 0;
            for token in produced {
                let end = consumed + token.consumed_bytes();
                let Some(text) = remaining.get(consumed..end) else {
                    return Err(self.report(input, TokenizerError::parse_error(
                        &remaining[consumed..],
                        position,
                        Some(format!(
                            "{} token '{}' does not align with the input",
                            token.category(),
                            token
                        )),
                    )));
                };

                if is_grouping(&token, &symbols::OPEN) {
                    balance += 1;
                    metrics.max_nesting = metrics.max_nesting.max(balance);
                } else if is_grouping(&token, &symbols::CLOSE) {
                    if balance == 0 {
                        return Err(
                            self.report(input, TokenizerError::TooManyClosingParentheses { position })
                        );
                    }
                    balance -= 1;
                }

                consumed = end;
                position = position.advance_str(text);

                if token.is(Category::Whitespace) {
                    metrics.whitespace_skipped += 1;
                } else {
                    metrics.record_token(&token);
                    tokens.push(token);
                }
            }

            offset += consumed;
        }

        if balance > 0 {
            return Err(self.report(input, TokenizerError::TooManyOpeningParentheses {
                unclosed: balance,
            }));
        }

        log_success!(
            codes::success::TOKENIZATION_COMPLETE,
            "Tokenization completed",
            "tokens" => metrics.total_tokens,
            "whitespace_skipped" => metrics.whitespace_skipped,
            "max_nesting" => metrics.max_nesting
        );

        if self.preferences.collect_metrics {
            log_debug!("Token categories",
                "counts" => format!("{:?}", metrics.category_counts),
                "scanner_attempts" => metrics.scanner_attempts
            );
        }

        Ok((tokens, metrics))
    }

    /// First scanner in order that accepts `remaining`
    fn scan_next(
        &self,
        remaining: &str,
        previous: Option<&Token>,
        position: Position,
        metrics: &mut LexicalMetrics,
    ) -> Result<Vec<Token>, TokenizerError> {
        for scanner in self.scanners.scanners() {
            metrics.scanner_attempts += 1;

            match scanner.scan(remaining, previous) {
                Ok(None) => continue,
                Ok(Some(tokens)) if tokens.is_empty() => {
                    return Err(TokenizerError::UnexpectedZeroWidthMatch {
                        category: scanner.category(),
                        position,
                    });
                }
                Ok(Some(tokens)) => return Ok(tokens),
                Err(conversion) => {
                    return Err(TokenizerError::parse_error(
                        remaining,
                        position,
                        Some(conversion.to_string()),
                    ));
                }
            }
        }

        Err(TokenizerError::parse_error(remaining, position, None))
    }

    /// Log a failure and hand it back
    fn report(&self, input: &str, error: TokenizerError) -> TokenizerError {
        let message = error.to_string();
        match error.position() {
            Some(position) if self.preferences.include_position_in_errors => {
                log_error!(error.error_code(), &message,
                    span = offending_span(input, position),
                    "reason" => error.reason()
                );
            }
            _ => {
                log_error!(error.error_code(), &message, "reason" => error.reason());
            }
        }
        error
    }
}
