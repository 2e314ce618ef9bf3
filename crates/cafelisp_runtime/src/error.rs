//! Errors raised by the command-line driver.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Failure of a CLI invocation.
#[derive(Debug, Error)]
pub enum CliError {
    /// Bad command-line arguments.
    #[error("{0}")]
    Usage(String),

    /// The source could not be compiled.
    #[error(transparent)]
    Compile(#[from] cafelisp_foundation::Error),

    /// Reading the source failed.
    #[error("cannot read {}: {source}", path.display())]
    Read {
        /// The input path.
        path: PathBuf,
        /// The underlying error.
        #[source]
        source: io::Error,
    },

    /// Writing the class file failed.
    #[error("cannot write {}: {source}", path.display())]
    Write {
        /// The output path.
        path: PathBuf,
        /// The underlying error.
        #[source]
        source: io::Error,
    },
}

impl CliError {
    /// Creates a usage error.
    pub fn usage(message: impl Into<String>) -> Self {
        Self::Usage(message.into())
    }
}

/// Result alias for driver operations.
pub type Result<T> = std::result::Result<T, CliError>;
