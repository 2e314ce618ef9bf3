//! Class file assembly.
//!
//! Serializes a finalized constant pool, the class header, and its methods
//! into the binary layout the JVM loads. Every length field is computed from
//! the bytes actually written for its payload.

use cafelisp_foundation::{Error, FormatLimit, Result};
use log::debug;

use crate::bytes::WriteBytes;
use crate::code::CodeBuffer;
use crate::constant::ConstantIndex;
use crate::descriptor::MethodDescriptor;
use crate::pool::ConstantPool;

/// File magic.
pub const MAGIC: u32 = 0xCAFE_BABE;
/// Minor version written to every class file.
pub const MINOR_VERSION: u16 = 0x0001;
/// Major version 52 (Java 8).
pub const MAJOR_VERSION: u16 = 52;

/// Access flag bits.
pub mod access {
    /// `ACC_PUBLIC`
    pub const PUBLIC: u16 = 0x0001;
    /// `ACC_STATIC`
    pub const STATIC: u16 = 0x0008;
    /// `ACC_SYNTHETIC`
    pub const SYNTHETIC: u16 = 0x1000;
}

/// The body of a method: stack limits plus instruction bytes.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CodeAttribute {
    /// Maximum operand stack depth, in words.
    pub max_stack: u16,
    /// Number of local variable slots.
    pub max_locals: u16,
    /// Encoded instructions.
    pub code: Vec<u8>,
}

impl CodeAttribute {
    /// Builds a code attribute from a finished buffer.
    ///
    /// # Errors
    /// Returns an error if the body or its stack depth exceeds the format's limits.
    pub fn from_buffer(buffer: &CodeBuffer, max_locals: u16) -> Result<Self> {
        let max_stack = u16::try_from(buffer.max_depth()).map_err(|_| {
            Error::limit_exceeded(FormatLimit::MaxStack {
                depth: buffer.max_depth(),
            })
        })?;
        let code = buffer.to_bytes();
        if code.len() > usize::from(u16::MAX) {
            return Err(Error::limit_exceeded(FormatLimit::CodeLength {
                length: code.len(),
            }));
        }
        Ok(Self {
            max_stack,
            max_locals,
            code,
        })
    }

    /// Encodes the attribute payload (everything after the length field).
    fn payload(&self) -> Result<Vec<u8>> {
        let length = u32::try_from(self.code.len()).map_err(|_| {
            Error::limit_exceeded(FormatLimit::CodeLength {
                length: self.code.len(),
            })
        })?;
        let mut out = Vec::with_capacity(12 + self.code.len());
        out.put_u16(self.max_stack);
        out.put_u16(self.max_locals);
        out.put_u32(length);
        out.extend_from_slice(&self.code);
        // Empty exception table, no nested attributes.
        out.put_u16(0);
        out.put_u16(0);
        Ok(out)
    }
}

/// A method declaration with its `Code` attribute.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MethodInfo {
    /// Method access flags.
    pub access_flags: u16,
    /// Utf8 entry holding the method name.
    pub name_index: ConstantIndex,
    /// Utf8 entry holding the method descriptor.
    pub descriptor_index: ConstantIndex,
    /// Utf8 entry holding the attribute name `Code`.
    pub code_name_index: ConstantIndex,
    /// The method body.
    pub code: CodeAttribute,
}

impl MethodInfo {
    /// Interns the method's name, descriptor, and attribute name.
    ///
    /// # Errors
    /// Returns an error if any of them cannot be interned.
    pub fn new(
        pool: &mut ConstantPool,
        access_flags: u16,
        name: &str,
        descriptor: &MethodDescriptor,
        code: CodeAttribute,
    ) -> Result<Self> {
        Ok(Self {
            access_flags,
            name_index: pool.intern_utf8(name)?,
            descriptor_index: pool.intern_utf8(&descriptor.to_string())?,
            code_name_index: pool.intern_utf8("Code")?,
            code,
        })
    }

    fn write_to(&self, out: &mut Vec<u8>) -> Result<()> {
        out.put_u16(self.access_flags);
        out.put_u16(self.name_index);
        out.put_u16(self.descriptor_index);
        out.put_u16(1);
        let payload = self.code.payload()?;
        let length = u32::try_from(payload.len()).map_err(|_| {
            Error::limit_exceeded(FormatLimit::CodeLength {
                length: payload.len(),
            })
        })?;
        out.put_u16(self.code_name_index);
        out.put_u32(length);
        out.extend_from_slice(&payload);
        Ok(())
    }
}

/// A class with no interfaces, no fields, and no class-level attributes.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ClassFile {
    /// Class access flags.
    pub access_flags: u16,
    /// Class entry for this class.
    pub this_class: ConstantIndex,
    /// Class entry for the superclass.
    pub super_class: ConstantIndex,
    /// Declared methods.
    pub methods: Vec<MethodInfo>,
}

impl ClassFile {
    /// Interns the class and superclass names and creates a public class.
    ///
    /// # Errors
    /// Returns an error if either name cannot be interned.
    pub fn new(pool: &mut ConstantPool, name: &str, super_name: &str) -> Result<Self> {
        Ok(Self {
            access_flags: access::PUBLIC,
            this_class: pool.intern_class(name)?,
            super_class: pool.intern_class(super_name)?,
            methods: Vec::new(),
        })
    }

    /// Adds a method.
    pub fn add_method(&mut self, method: MethodInfo) {
        self.methods.push(method);
    }

    /// Serializes the class against its (now read-only) constant pool.
    ///
    /// # Errors
    /// Returns an error if a count or length exceeds the format's limits.
    pub fn to_bytes(&self, pool: &ConstantPool) -> Result<Vec<u8>> {
        let finalized = pool.finalize();
        let mut out = Vec::new();
        out.put_u32(MAGIC);
        out.put_u16(MINOR_VERSION);
        out.put_u16(MAJOR_VERSION);
        finalized.write_to(&mut out)?;
        out.put_u16(self.access_flags);
        out.put_u16(self.this_class);
        out.put_u16(self.super_class);
        // interfaces_count, fields_count
        out.put_u16(0);
        out.put_u16(0);
        let method_count = u16::try_from(self.methods.len())
            .map_err(|_| Error::internal("more than 65535 methods"))?;
        out.put_u16(method_count);
        for method in &self.methods {
            method.write_to(&mut out)?;
        }
        // attributes_count
        out.put_u16(0);
        debug!(
            "assembled class file: {} bytes, {} pool slots, {} method(s)",
            out.len(),
            finalized.slot_count(),
            self.methods.len()
        );
        Ok(out)
    }
}
