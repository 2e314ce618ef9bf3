//! Source location tracking.
//!
//! `SourceLocation` pins an error to a line and column and carries the text
//! of that line as far as it had been read, for caret diagnostics.

use std::fmt;

/// A position in source text.
#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub struct SourceLocation {
    /// 1-based line number.
    pub line: u32,
    /// 1-based column number.
    pub column: u32,
    /// Text of the line, up to the read position when the error was raised.
    pub line_text: String,
}

impl SourceLocation {
    /// Creates a new location.
    #[must_use]
    pub fn new(line: u32, column: u32, line_text: impl Into<String>) -> Self {
        Self {
            line,
            column,
            line_text: line_text.into(),
        }
    }
}

impl fmt::Display for SourceLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}
