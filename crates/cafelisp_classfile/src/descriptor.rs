//! Field and method descriptors.
//!
//! Descriptors are the class file's compact text encoding of types, e.g.
//! `Ljava/lang/String;` or `([Ljava/lang/String;)V`.

use std::fmt;

/// A field (value) type.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum FieldType {
    /// `B`
    Byte,
    /// `C`
    Char,
    /// `D`
    Double,
    /// `F`
    Float,
    /// `I`
    Int,
    /// `J`
    Long,
    /// `S`
    Short,
    /// `Z`
    Boolean,
    /// `L<internal name>;`
    Object(String),
    /// `[<element>`
    Array(Box<FieldType>),
}

impl FieldType {
    /// Creates an object type from an internal class name.
    #[must_use]
    pub fn object(class_name: impl Into<String>) -> Self {
        Self::Object(class_name.into())
    }

    /// Creates an array type with the given element type.
    #[must_use]
    pub fn array(element: FieldType) -> Self {
        Self::Array(Box::new(element))
    }

    /// Returns true for the two-word types (`J` and `D`).
    #[must_use]
    pub const fn is_wide(&self) -> bool {
        matches!(self, Self::Long | Self::Double)
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Byte => f.write_str("B"),
            Self::Char => f.write_str("C"),
            Self::Double => f.write_str("D"),
            Self::Float => f.write_str("F"),
            Self::Int => f.write_str("I"),
            Self::Long => f.write_str("J"),
            Self::Short => f.write_str("S"),
            Self::Boolean => f.write_str("Z"),
            Self::Object(name) => write!(f, "L{name};"),
            Self::Array(element) => write!(f, "[{element}"),
        }
    }
}

/// A method signature: parameter types and an optional return type.
///
/// A `None` return type renders as `V` (void).
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct MethodDescriptor {
    /// Parameter types in order.
    pub params: Vec<FieldType>,
    /// Return type, or `None` for void.
    pub ret: Option<FieldType>,
}

impl MethodDescriptor {
    /// Creates a descriptor.
    #[must_use]
    pub fn new(params: Vec<FieldType>, ret: Option<FieldType>) -> Self {
        Self { params, ret }
    }

    /// Creates a void-returning descriptor.
    #[must_use]
    pub fn void(params: Vec<FieldType>) -> Self {
        Self::new(params, None)
    }

    /// Operand stack words consumed by the arguments (receiver excluded).
    #[must_use]
    pub fn argument_words(&self) -> usize {
        self.params
            .iter()
            .map(|param| if param.is_wide() { 2 } else { 1 })
            .sum()
    }
}

impl fmt::Display for MethodDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("(")?;
        for param in &self.params {
            write!(f, "{param}")?;
        }
        f.write_str(")")?;
        match &self.ret {
            Some(ret) => write!(f, "{ret}"),
            None => f.write_str("V"),
        }
    }
}
