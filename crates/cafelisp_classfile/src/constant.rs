//! Constant pool entries.
//!
//! Each entry knows its tag byte, how many pool slots it occupies, and how
//! to serialize itself.

#![allow(clippy::doc_markdown)]

use std::fmt;

use cafelisp_foundation::{Error, FormatLimit, Result};

use crate::bytes::WriteBytes;

/// Index of an entry in the constant pool (1-based).
pub type ConstantIndex = u16;

/// Tag bytes of the constant kinds.
pub mod tag {
    /// CONSTANT_Utf8
    pub const UTF8: u8 = 1;
    /// CONSTANT_Integer
    pub const INTEGER: u8 = 3;
    /// CONSTANT_Float
    pub const FLOAT: u8 = 4;
    /// CONSTANT_Long
    pub const LONG: u8 = 5;
    /// CONSTANT_Double
    pub const DOUBLE: u8 = 6;
    /// CONSTANT_Class
    pub const CLASS: u8 = 7;
    /// CONSTANT_String
    pub const STRING: u8 = 8;
    /// CONSTANT_Fieldref
    pub const FIELD_REF: u8 = 9;
    /// CONSTANT_Methodref
    pub const METHOD_REF: u8 = 10;
    /// CONSTANT_InterfaceMethodref
    pub const INTERFACE_METHOD_REF: u8 = 11;
    /// CONSTANT_NameAndType
    pub const NAME_AND_TYPE: u8 = 12;
    /// CONSTANT_MethodType
    pub const METHOD_TYPE: u8 = 16;
}

/// A single typed constant pool entry.
///
/// Entries that refer to other entries hold the referenced indices, which
/// are always lower than the referring entry's own index.
#[derive(Clone, Debug, PartialEq)]
pub enum Constant {
    /// Text blob, restricted to ASCII without null bytes.
    Utf8(String),
    /// 32-bit signed integer.
    Integer(i32),
    /// 32-bit float.
    Float(f32),
    /// 64-bit signed integer (two slots).
    Long(i64),
    /// 64-bit float (two slots).
    Double(f64),
    /// Class reference by internal name.
    Class {
        /// Utf8 entry holding the class name.
        name: ConstantIndex,
    },
    /// `java.lang.String` literal.
    String {
        /// Utf8 entry holding the text.
        utf8: ConstantIndex,
    },
    /// Field reference.
    FieldRef {
        /// Owning class entry.
        class: ConstantIndex,
        /// NameAndType entry of the field.
        name_and_type: ConstantIndex,
    },
    /// Class method reference.
    MethodRef {
        /// Owning class entry.
        class: ConstantIndex,
        /// NameAndType entry of the method.
        name_and_type: ConstantIndex,
    },
    /// Interface method reference.
    InterfaceMethodRef {
        /// Owning interface entry.
        class: ConstantIndex,
        /// NameAndType entry of the method.
        name_and_type: ConstantIndex,
    },
    /// Member name paired with its descriptor.
    NameAndType {
        /// Utf8 entry holding the member name.
        name: ConstantIndex,
        /// Utf8 entry holding the descriptor.
        descriptor: ConstantIndex,
    },
    /// Method type by descriptor.
    MethodType {
        /// Utf8 entry holding the method descriptor.
        descriptor: ConstantIndex,
    },
}

impl Constant {
    /// Returns the tag byte that opens this entry's encoding.
    #[must_use]
    pub const fn tag(&self) -> u8 {
        match self {
            Self::Utf8(_) => tag::UTF8,
            Self::Integer(_) => tag::INTEGER,
            Self::Float(_) => tag::FLOAT,
            Self::Long(_) => tag::LONG,
            Self::Double(_) => tag::DOUBLE,
            Self::Class { .. } => tag::CLASS,
            Self::String { .. } => tag::STRING,
            Self::FieldRef { .. } => tag::FIELD_REF,
            Self::MethodRef { .. } => tag::METHOD_REF,
            Self::InterfaceMethodRef { .. } => tag::INTERFACE_METHOD_REF,
            Self::NameAndType { .. } => tag::NAME_AND_TYPE,
            Self::MethodType { .. } => tag::METHOD_TYPE,
        }
    }

    /// Number of pool index slots this entry occupies.
    #[must_use]
    pub const fn slot_width(&self) -> u16 {
        match self {
            Self::Long(_) | Self::Double(_) => 2,
            _ => 1,
        }
    }

    /// Appends this entry's encoding to `out`.
    ///
    /// # Errors
    /// Returns an error if a Utf8 entry is too long for its length prefix.
    pub fn write_to(&self, out: &mut Vec<u8>) -> Result<()> {
        out.put_u8(self.tag());
        match self {
            Self::Utf8(text) => {
                let length = u16::try_from(text.len()).map_err(|_| {
                    Error::limit_exceeded(FormatLimit::Utf8Length { length: text.len() })
                })?;
                out.put_u16(length);
                out.extend_from_slice(text.as_bytes());
            }
            Self::Integer(value) => out.put_i32(*value),
            Self::Float(value) => out.put_f32(*value),
            Self::Long(value) => out.put_i64(*value),
            Self::Double(value) => out.put_f64(*value),
            Self::Class { name } => out.put_u16(*name),
            Self::String { utf8 } => out.put_u16(*utf8),
            Self::MethodType { descriptor } => out.put_u16(*descriptor),
            Self::FieldRef {
                class,
                name_and_type,
            }
            | Self::MethodRef {
                class,
                name_and_type,
            }
            | Self::InterfaceMethodRef {
                class,
                name_and_type,
            } => {
                out.put_u16(*class);
                out.put_u16(*name_and_type);
            }
            Self::NameAndType { name, descriptor } => {
                out.put_u16(*name);
                out.put_u16(*descriptor);
            }
        }
        Ok(())
    }
}

impl fmt::Display for Constant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Utf8(text) => write!(f, "Utf8 {text:?}"),
            Self::Integer(value) => write!(f, "Integer {value}"),
            Self::Float(value) => write!(f, "Float {value}"),
            Self::Long(value) => write!(f, "Long {value}"),
            Self::Double(value) => write!(f, "Double {value}"),
            Self::Class { name } => write!(f, "Class #{name}"),
            Self::String { utf8 } => write!(f, "String #{utf8}"),
            Self::FieldRef {
                class,
                name_and_type,
            } => write!(f, "Fieldref #{class}.#{name_and_type}"),
            Self::MethodRef {
                class,
                name_and_type,
            } => write!(f, "Methodref #{class}.#{name_and_type}"),
            Self::InterfaceMethodRef {
                class,
                name_and_type,
            } => write!(f, "InterfaceMethodref #{class}.#{name_and_type}"),
            Self::NameAndType { name, descriptor } => {
                write!(f, "NameAndType #{name}:#{descriptor}")
            }
            Self::MethodType { descriptor } => write!(f, "MethodType #{descriptor}"),
        }
    }
}
