//! Forward-only character cursor with one character of lookahead.
//!
//! The cursor holds the current character (`peek`) and consumes it with
//! `advance`. End of input is `None`, not an error: at an expression
//! boundary it is the normal way a program ends.

use cafelisp_foundation::SourceLocation;

/// A saved line/column position.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Mark {
    /// 1-based line.
    pub line: u32,
    /// 1-based column.
    pub column: u32,
}

/// Cursor over a character stream.
///
/// Tracks line and column of the current character and keeps the text of
/// every line seen so far, so that errors can quote the line they refer to.
pub struct Cursor<I: Iterator<Item = char>> {
    chars: I,
    current: Option<char>,
    line: u32,
    column: u32,
    /// Text of the current line, up to and including the current character.
    line_text: String,
    /// Completed lines, without their terminators.
    lines: Vec<String>,
}

impl<I: Iterator<Item = char>> Cursor<I> {
    /// Creates a cursor positioned on the first character.
    pub fn new(mut chars: I) -> Self {
        let current = chars.next();
        let mut cursor = Self {
            chars,
            current,
            line: 1,
            column: 1,
            line_text: String::new(),
            lines: Vec::new(),
        };
        cursor.record_current();
        cursor
    }

    /// Returns the current character without consuming it.
    #[must_use]
    pub fn peek(&self) -> Option<char> {
        self.current
    }

    /// Consumes and returns the current character.
    pub fn advance(&mut self) -> Option<char> {
        let consumed = self.current?;
        if consumed == '\n' {
            self.lines.push(std::mem::take(&mut self.line_text));
            self.line += 1;
            self.column = 1;
        } else {
            self.column += 1;
        }
        self.current = self.chars.next();
        self.record_current();
        Some(consumed)
    }

    /// Returns the position of the current character.
    #[must_use]
    pub fn mark(&self) -> Mark {
        Mark {
            line: self.line,
            column: self.column,
        }
    }

    /// Builds a diagnostic location for `mark`.
    ///
    /// The text is the full line for lines already finished, or the part
    /// read so far for the current line.
    #[must_use]
    pub fn location(&self, mark: Mark) -> SourceLocation {
        let text = if mark.line == self.line {
            self.line_text.clone()
        } else {
            usize::try_from(mark.line)
                .ok()
                .and_then(|line| self.lines.get(line.wrapping_sub(1)))
                .cloned()
                .unwrap_or_default()
        };
        SourceLocation::new(mark.line, mark.column, text)
    }

    /// Location of the current character.
    #[must_use]
    pub fn here(&self) -> SourceLocation {
        self.location(self.mark())
    }

    fn record_current(&mut self) {
        match self.current {
            Some('\n' | '\r') | None => {}
            Some(c) => self.line_text.push(c),
        }
    }
}
