//! Source locations for lexical diagnostics
//!
//! The tokenizer works on byte offsets into the remaining input. These types
//! turn an offset back into a line/column pair so errors and log events can
//! point at the offending text.
use serde::{Deserialize, Serialize};
use std::fmt;

/// A position in source text with line, column, and byte offset.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize,
)]
pub struct Position {
    /// Byte offset from start of input (0-based)
    pub offset: usize,
    /// Line number (1-based)
    pub line: u32,
    /// Column number (1-based, counted in characters)
    pub column: u32,
}

impl Position {
    pub fn new(offset: usize, line: u32, column: u32) -> Self {
        Self {
            offset,
            line,
            column,
        }
    }

    /// Offset 0, line 1, column 1
    pub fn start() -> Self {
        Self::new(0, 1, 1)
    }

    /// Advance past one character
    pub fn advance(self, ch: char) -> Self {
        match ch {
            '\n' => Self::new(self.offset + 1, self.line + 1, 1),
            _ => Self::new(self.offset + ch.len_utf8(), self.line, self.column + 1),
        }
    }

    /// Advance past every character of `s`
    pub fn advance_str(self, s: &str) -> Self {
        s.chars().fold(self, |pos, ch| pos.advance(ch))
    }

    /// Position of byte `offset` within `source`.
    ///
    /// Offsets past the end, or inside a multi-byte character, are clamped to
    /// the nearest preceding character boundary.
    pub fn locate(source: &str, offset: usize) -> Self {
        let mut end = offset.min(source.len());
        while !source.is_char_boundary(end) {
            end -= 1;
        }
        Self::start().advance_str(&source[..end])
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

/// A span of source text from start to end position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Span {
    /// Start position (inclusive)
    pub start: Position,
    /// End position (exclusive)
    pub end: Position,
}

impl Span {
    pub fn new(start: Position, end: Position) -> Self {
        debug_assert!(
            start.offset <= end.offset,
            "Span start must not be after end"
        );
        Self { start, end }
    }

    pub fn start(&self) -> Position {
        self.start
    }

    pub fn end(&self) -> Position {
        self.end
    }

    /// Span covering `text` when it begins at `start`
    pub fn covering(start: Position, text: &str) -> Self {
        Self::new(start, start.advance_str(text))
    }

    /// Byte length of this span
    pub fn len(&self) -> usize {
        self.end.offset - self.start.offset
    }

    pub fn is_empty(&self) -> bool {
        self.start.offset == self.end.offset
    }

    /// Source text for this span
    pub fn slice<'a>(&self, input: &'a str) -> &'a str {
        &input[self.start.offset..self.end.offset]
    }
}

impl fmt::Display for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.start.line == self.end.line {
            write!(
                f,
                "{}:{}-{}",
                self.start.line, self.start.column, self.end.column
            )
        } else {
            write!(f, "{}-{}", self.start, self.end)
        }
    }
}

/// Line index over a source string, used for caret-style error output
#[derive(Debug, Clone)]
pub struct SourceMap {
    pub source: String,
    /// Byte offsets of line starts
    line_starts: Vec<usize>,
}

impl SourceMap {
    pub fn new(source: impl Into<String>) -> Self {
        let source = source.into();
        let mut line_starts = vec![0];
        for (offset, ch) in source.char_indices() {
            if ch == '\n' {
                line_starts.push(offset + 1);
            }
        }
        Self {
            source,
            line_starts,
        }
    }

    /// Line of text by line number (1-based), without its newline
    pub fn get_line(&self, line_num: u32) -> Option<&str> {
        let line_idx = (line_num as usize).checked_sub(1)?;
        let start = *self.line_starts.get(line_idx)?;
        let end = self
            .line_starts
            .get(line_idx + 1)
            .map(|next| next - 1)
            .unwrap_or(self.source.len());

        Some(self.source[start..end].trim_end_matches('\r'))
    }

    /// Format a message with the offending line and a caret underline
    pub fn format_error(&self, position: Position, message: &str) -> String {
        let mut result = format!("error: {}\n", message);
        result.push_str(&format!("  --> {}\n", position));

        if let Some(line) = self.get_line(position.line) {
            let line_num = position.line.to_string();
            let padding = " ".repeat(line_num.len());

            result.push_str(&format!(" {} |\n", padding));
            result.push_str(&format!(" {} | {}\n", line_num, line));
            result.push_str(&format!(
                " {} | {}^\n",
                padding,
                " ".repeat(position.column.saturating_sub(1) as usize)
            ));
        }

        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_position_advance() {
        let pos = Position::start().advance_str("ab\ncd");
        assert_eq!(pos, Position::new(5, 2, 3));
    }

    #[test]
    fn test_locate_clamps_to_char_boundary() {
        let source = "é+1";
        // offset 1 is inside the two-byte 'é'
        assert_eq!(Position::locate(source, 1), Position::start());
        assert_eq!(Position::locate(source, 2), Position::new(2, 1, 2));
        assert_eq!(Position::locate(source, 99), Position::new(4, 1, 4));
    }

    #[test]
    fn test_span_covering() {
        let span = Span::covering(Position::new(2, 1, 3), "abc");
        assert_eq!(span.len(), 3);
        assert_eq!(span.slice("xxabcyy"), "abc");
        assert_eq!(span.to_string(), "1:3-6");
    }

    #[test]
    fn test_format_error_points_at_column() {
        let map = SourceMap::new("1 + )\n2");
        let rendered = map.format_error(Position::new(4, 1, 5), "too many closing parentheses");

        assert!(rendered.contains("error: too many closing parentheses"));
        assert!(rendered.contains("--> 1:5"));
        assert!(rendered.contains(" 1 | 1 + )"));
        assert!(rendered.contains("   |     ^"));
    }

    #[test]
    fn test_get_line_out_of_range() {
        let map = SourceMap::new("only");
        assert_eq!(map.get_line(0), None);
        assert_eq!(map.get_line(1), Some("only"));
        assert_eq!(map.get_line(2), None);
    }
}
