//! Source reading and one-pass compilation for cafelisp.
//!
//! This crate provides:
//! - [`Cursor`] - Character cursor with line/column tracking
//! - [`Builtin`] - The `print` and `+` forms
//! - [`Compiler`] - Streaming compiler from source to a method body
//! - [`compile_str`] / [`compile_reader`] - Source to class file bytes
//!
//! # Example
//!
//! ```
//! use cafelisp_language::{ModuleConfig, compile_str};
//!
//! let bytes = compile_str("(print \"hi\")", &ModuleConfig::default()).unwrap();
//! assert_eq!(&bytes[..4], &[0xCA, 0xFE, 0xBA, 0xBE]);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod builtin;
pub mod compiler;
pub mod config;
pub mod cursor;

pub use builtin::Builtin;
pub use compiler::{CompiledProgram, Compiler, compile_chars, compile_reader, compile_str};
pub use config::ModuleConfig;
pub use cursor::{Cursor, Mark};
