//! Integration tests for Layer 2: Language
//!
//! Tests for the cursor and the compiler's code generation and errors.

mod codegen;
mod cursor;
