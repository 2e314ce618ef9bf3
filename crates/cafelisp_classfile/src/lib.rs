//! Constant pool, instruction encoding, and class file assembly for cafelisp.
//!
//! This crate provides:
//! - [`ConstantPool`] - Deduplicating, index-assigning table of [`Constant`]s
//! - [`Instruction`] - The opcode subset the compiler emits
//! - [`CodeBuffer`] - A method body with operand stack bookkeeping
//! - [`ClassFile`] - Serialization into the JVM's binary layout
//! - [`FieldType`] / [`MethodDescriptor`] - Descriptor strings

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

mod bytes;
pub mod class_file;
pub mod code;
pub mod constant;
pub mod descriptor;
pub mod instruction;
pub mod pool;

pub use class_file::{ClassFile, CodeAttribute, MethodInfo, access};
pub use code::CodeBuffer;
pub use constant::{Constant, ConstantIndex};
pub use descriptor::{FieldType, MethodDescriptor};
pub use instruction::Instruction;
pub use pool::{ConstantPool, FinalizedPool};
