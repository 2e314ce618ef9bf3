//! cafelisp - A tiny expression language compiled straight to JVM class files
//!
//! This crate re-exports all layers of the cafelisp system for convenient access.
//! For detailed documentation, see the individual layer crates.
//!
//! # Architecture
//!
//! ```text
//! Layer 3: cafelisp_runtime     CLI, diagnostics, logging setup
//! Layer 2: cafelisp_language    Cursor, builtin forms, one-pass compiler
//! Layer 1: cafelisp_classfile   Constant pool, instructions, class file assembly
//! Layer 0: cafelisp_foundation  Core types (Type, SourceLocation, Error)
//! ```

pub use cafelisp_classfile as classfile;
pub use cafelisp_foundation as foundation;
pub use cafelisp_language as language;
pub use cafelisp_runtime as runtime;
