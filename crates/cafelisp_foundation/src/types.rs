//! Result types of compiled expressions.

use std::fmt;

/// The type an expression leaves on the operand stack.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Type {
    /// No value (the result of `print`).
    Void,
    /// A text constant (`java.lang.String`).
    String,
    /// A 64-bit signed integer.
    Long,
}

impl Type {
    /// Number of operand stack words a value of this type occupies.
    ///
    /// Longs take two words on the target runtime.
    #[must_use]
    pub const fn stack_width(self) -> u8 {
        match self {
            Self::Void => 0,
            Self::String => 1,
            Self::Long => 2,
        }
    }

    /// Returns the type name used in diagnostics.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Void => "void",
            Self::String => "string",
            Self::Long => "long",
        }
    }
}

impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
