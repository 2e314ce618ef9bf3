//! Core error, location, and type definitions for cafelisp.
//!
//! This crate provides:
//! - [`Error`] - Rich error types with source locations
//! - [`SourceLocation`] - Line/column positions with the offending line's text
//! - [`Type`] - Result types of compiled expressions

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod error;
pub mod location;
pub mod types;

pub use error::{Error, ErrorKind, FormatLimit, Result};
pub use location::SourceLocation;
pub use types::Type;
