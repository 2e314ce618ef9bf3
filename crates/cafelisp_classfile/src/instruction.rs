//! The instruction subset emitted by the compiler.
//!
//! Each instruction encodes to one opcode byte followed by its big-endian
//! operand. This layer performs no validation: operand indices and stack
//! effects are the compiler's responsibility.

#![allow(clippy::doc_markdown)]

use std::fmt;

use crate::bytes::WriteBytes;
use crate::constant::ConstantIndex;

/// Opcode bytes.
pub mod opcode {
    /// Push a single-word constant, 8-bit index.
    pub const LDC: u8 = 0x12;
    /// Push a single-word constant, 16-bit index.
    pub const LDC_W: u8 = 0x13;
    /// Push a long or double constant, 16-bit index.
    pub const LDC2_W: u8 = 0x14;
    /// Duplicate the top stack word.
    pub const DUP: u8 = 0x59;
    /// Add two longs.
    pub const LADD: u8 = 0x61;
    /// Return void.
    pub const RETURN: u8 = 0xB1;
    /// Read a static field.
    pub const GETSTATIC: u8 = 0xB2;
    /// Read an instance field.
    pub const GETFIELD: u8 = 0xB4;
    /// Invoke an instance method.
    pub const INVOKEVIRTUAL: u8 = 0xB6;
    /// Invoke a static method.
    pub const INVOKESTATIC: u8 = 0xB8;
}

/// A single method-body instruction.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Instruction {
    /// Load a single-word constant. Encodes as `ldc` below index 256, `ldc_w` otherwise.
    Ldc(ConstantIndex),
    /// Load a long or double constant.
    Ldc2W(ConstantIndex),
    /// Push a static field's value.
    GetStatic(ConstantIndex),
    /// Replace an object reference with one of its fields.
    GetField(ConstantIndex),
    /// Call a static method.
    InvokeStatic(ConstantIndex),
    /// Call an instance method.
    InvokeVirtual(ConstantIndex),
    /// Return from a void method.
    Return,
    /// Duplicate the top stack word.
    Dup,
    /// Pop two longs, push their sum.
    Ladd,
}

impl Instruction {
    /// Returns the opcode byte this instruction encodes to.
    #[must_use]
    pub const fn opcode(&self) -> u8 {
        match self {
            Self::Ldc(index) if *index < 256 => opcode::LDC,
            Self::Ldc(_) => opcode::LDC_W,
            Self::Ldc2W(_) => opcode::LDC2_W,
            Self::GetStatic(_) => opcode::GETSTATIC,
            Self::GetField(_) => opcode::GETFIELD,
            Self::InvokeStatic(_) => opcode::INVOKESTATIC,
            Self::InvokeVirtual(_) => opcode::INVOKEVIRTUAL,
            Self::Return => opcode::RETURN,
            Self::Dup => opcode::DUP,
            Self::Ladd => opcode::LADD,
        }
    }

    /// Returns the assembler mnemonic.
    #[must_use]
    pub const fn mnemonic(&self) -> &'static str {
        match self {
            Self::Ldc(index) if *index < 256 => "ldc",
            Self::Ldc(_) => "ldc_w",
            Self::Ldc2W(_) => "ldc2_w",
            Self::GetStatic(_) => "getstatic",
            Self::GetField(_) => "getfield",
            Self::InvokeStatic(_) => "invokestatic",
            Self::InvokeVirtual(_) => "invokevirtual",
            Self::Return => "return",
            Self::Dup => "dup",
            Self::Ladd => "ladd",
        }
    }

    /// Returns the constant pool operand, if any.
    #[must_use]
    pub const fn operand(&self) -> Option<ConstantIndex> {
        match self {
            Self::Ldc(index)
            | Self::Ldc2W(index)
            | Self::GetStatic(index)
            | Self::GetField(index)
            | Self::InvokeStatic(index)
            | Self::InvokeVirtual(index) => Some(*index),
            Self::Return | Self::Dup | Self::Ladd => None,
        }
    }

    /// Number of bytes this instruction encodes to.
    #[must_use]
    pub const fn encoded_len(&self) -> usize {
        match self {
            Self::Ldc(index) if *index < 256 => 2,
            Self::Return | Self::Dup | Self::Ladd => 1,
            _ => 3,
        }
    }

    /// Appends this instruction's encoding to `out`.
    #[allow(clippy::cast_possible_truncation)]
    pub fn encode(&self, out: &mut Vec<u8>) {
        out.put_u8(self.opcode());
        match self {
            // Narrow form: the guard in `opcode` guarantees the index fits a byte.
            Self::Ldc(index) if *index < 256 => out.put_u8(*index as u8),
            Self::Ldc(index)
            | Self::Ldc2W(index)
            | Self::GetStatic(index)
            | Self::GetField(index)
            | Self::InvokeStatic(index)
            | Self::InvokeVirtual(index) => out.put_u16(*index),
            Self::Return | Self::Dup | Self::Ladd => {}
        }
    }

    /// Returns this instruction's encoding.
    #[must_use]
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(self.encoded_len());
        self.encode(&mut out);
        out
    }
}

impl fmt::Display for Instruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.operand() {
            Some(index) => write!(f, "{} #{index}", self.mnemonic()),
            None => f.write_str(self.mnemonic()),
        }
    }
}
