//! Error types for the cafelisp compiler.
//!
//! Uses `thiserror` for ergonomic error definition with rich context.

use std::fmt;
use std::io;

use thiserror::Error;

use crate::location::SourceLocation;
use crate::types::Type;

/// The main error type for cafelisp operations.
#[derive(Debug, Error)]
#[error("{kind}")]
pub struct Error {
    /// The kind of error that occurred.
    pub kind: ErrorKind,
    /// Where in the source the error was detected, if known.
    pub location: Option<SourceLocation>,
}

impl Error {
    /// Creates a new error with the given kind.
    #[must_use]
    pub fn new(kind: ErrorKind) -> Self {
        Self {
            kind,
            location: None,
        }
    }

    /// Attaches a source location to this error.
    #[must_use]
    pub fn with_location(mut self, location: SourceLocation) -> Self {
        self.location = Some(location);
        self
    }

    /// Creates a syntax error.
    #[must_use]
    pub fn syntax(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Syntax(message.into()))
    }

    /// Creates a type mismatch error.
    #[must_use]
    pub fn type_mismatch(expected: Type, actual: Type) -> Self {
        Self::new(ErrorKind::TypeMismatch { expected, actual })
    }

    /// Creates an error for printing a value that has no printable type.
    #[must_use]
    pub fn unprintable(actual: Type) -> Self {
        Self::new(ErrorKind::Unprintable(actual))
    }

    /// Creates an error for text the constant pool cannot encode.
    #[must_use]
    pub fn invalid_constant(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::InvalidConstant(message.into()))
    }

    /// Creates a format limit exceeded error.
    #[must_use]
    pub fn limit_exceeded(limit: FormatLimit) -> Self {
        Self::new(ErrorKind::LimitExceeded(limit))
    }

    /// Creates an internal error.
    #[must_use]
    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Internal(message.into()))
    }

    /// Returns true for malformed input.
    #[must_use]
    pub fn is_syntax_error(&self) -> bool {
        matches!(self.kind, ErrorKind::Syntax(_))
    }

    /// Returns true when an operand had the wrong result type.
    #[must_use]
    pub fn is_type_error(&self) -> bool {
        matches!(
            self.kind,
            ErrorKind::TypeMismatch { .. } | ErrorKind::Unprintable(_)
        )
    }

    /// Returns true for violations of the constant pool's text restrictions.
    #[must_use]
    pub fn is_invalid_constant(&self) -> bool {
        matches!(self.kind, ErrorKind::InvalidConstant(_))
    }

    /// Returns true for compiler defects rather than bad input.
    #[must_use]
    pub fn is_internal(&self) -> bool {
        matches!(self.kind, ErrorKind::Internal(_))
    }
}

impl From<io::Error> for Error {
    fn from(err: io::Error) -> Self {
        Self::new(ErrorKind::Io(err))
    }
}

/// Categorized error kinds for pattern matching.
#[derive(Debug, Error)]
pub enum ErrorKind {
    /// Malformed source text.
    #[error("syntax error: {0}")]
    Syntax(String),

    /// An operand's result type does not match what its form requires.
    #[error("type mismatch: expected {expected}, got {actual}")]
    TypeMismatch {
        /// The required type.
        expected: Type,
        /// The type the operand produced.
        actual: Type,
    },

    /// `print` was handed an operand that produces no value.
    #[error("type error: cannot print a value of type {0}")]
    Unprintable(Type),

    /// Text containing a null byte or a character outside the one-byte range.
    #[error("invalid constant: {0}")]
    InvalidConstant(String),

    /// A structural limit of the class file format was exceeded.
    #[error("limit exceeded: {0}")]
    LimitExceeded(FormatLimit),

    /// Reading the source stream failed.
    #[error("i/o error: {0}")]
    Io(#[source] io::Error),

    /// Internal error (should not happen).
    #[error("internal error: {0}")]
    Internal(String),
}

/// Structural limits of the class file format.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormatLimit {
    /// The constant pool ran out of 16-bit indices.
    ConstantPoolSize,
    /// A UTF-8 entry is longer than its 16-bit length prefix allows.
    Utf8Length {
        /// Encoded length in bytes.
        length: usize,
    },
    /// A method body is longer than 65535 bytes.
    CodeLength {
        /// Encoded length in bytes.
        length: usize,
    },
    /// The operand stack grew deeper than 65535 words.
    MaxStack {
        /// The recorded high-water mark.
        depth: usize,
    },
}

impl fmt::Display for FormatLimit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ConstantPoolSize => write!(f, "constant pool is full (65535 slots)"),
            Self::Utf8Length { length } => {
                write!(f, "text constant of {length} bytes exceeds 65535")
            }
            Self::CodeLength { length } => {
                write!(f, "method body of {length} bytes exceeds 65535")
            }
            Self::MaxStack { depth } => {
                write!(f, "operand stack depth {depth} exceeds 65535")
            }
        }
    }
}

/// Result alias used throughout cafelisp.
pub type Result<T> = std::result::Result<T, Error>;
