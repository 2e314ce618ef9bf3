//! The builtin forms and their code generation.
//!
//! A form is compiled in steps: `start` when its name has been read,
//! `begin_argument` and `finish_argument` around each operand's code, and
//! `end` at the closing parenthesis.

use cafelisp_classfile::{FieldType, Instruction, MethodDescriptor};
use cafelisp_foundation::{Error, Result, Type};

use crate::compiler::Compiler;
use crate::cursor::Mark;

/// Class holding the standard output handle.
const SYSTEM: &str = "java/lang/System";
/// Class of the standard output handle.
const PRINT_STREAM: &str = "java/io/PrintStream";
/// Runtime class for text values.
const STRING: &str = "java/lang/String";

/// The operators the language knows.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Builtin {
    /// `(print arg...)` prints each argument, then a newline.
    Print,
    /// `(+ arg...)` sums 64-bit integers.
    Add,
}

impl Builtin {
    /// Resolves the leading atom of a form.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "print" => Some(Self::Print),
            "+" => Some(Self::Add),
            _ => None,
        }
    }

    /// Returns the name used in source.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Print => "print",
            Self::Add => "+",
        }
    }
}

/// A form being compiled, with its per-form state.
#[derive(Debug)]
pub(crate) enum Form {
    /// The output handle is on the stack below any argument.
    Print,
    /// Each operand leaves one long on the stack.
    Add {
        /// Operands compiled so far.
        operands: usize,
    },
}

impl Form {
    /// Emits the form's prologue.
    pub(crate) fn start<I>(builtin: Builtin, compiler: &mut Compiler<I>) -> Result<Self>
    where
        I: Iterator<Item = char>,
    {
        match builtin {
            Builtin::Print => {
                let out = compiler.pool().intern_field_ref(
                    SYSTEM,
                    "out",
                    &FieldType::object(PRINT_STREAM).to_string(),
                )?;
                compiler.emit(Instruction::GetStatic(out), 1)?;
                Ok(Self::Print)
            }
            Builtin::Add => Ok(Self::Add { operands: 0 }),
        }
    }

    /// Emits what goes before an operand's own code.
    pub(crate) fn begin_argument<I>(&mut self, compiler: &mut Compiler<I>) -> Result<()>
    where
        I: Iterator<Item = char>,
    {
        match self {
            // One copy of the handle per argument, so `(print "hi")` peaks
            // at three words: handle, copy, string. A long argument makes
            // it four.
            Self::Print => compiler.emit(Instruction::Dup, 1),
            Self::Add { .. } => Ok(()),
        }
    }

    /// Consumes an operand of type `ty` that started at `mark`.
    pub(crate) fn finish_argument<I>(
        &mut self,
        compiler: &mut Compiler<I>,
        ty: Type,
        mark: Mark,
    ) -> Result<()>
    where
        I: Iterator<Item = char>,
    {
        match self {
            Self::Print => {
                let param = match ty {
                    Type::String => FieldType::object(STRING),
                    Type::Long => FieldType::Long,
                    Type::Void => return Err(compiler.error_at(mark, Error::unprintable(ty))),
                };
                let descriptor = MethodDescriptor::void(vec![param]);
                let method = compiler.pool().intern_method_ref(
                    PRINT_STREAM,
                    "print",
                    &descriptor.to_string(),
                )?;
                // Consumes the duplicated handle and the argument.
                compiler.emit(
                    Instruction::InvokeVirtual(method),
                    -1 - isize::from(ty.stack_width()),
                )
            }
            Self::Add { operands } => {
                if ty != Type::Long {
                    return Err(compiler.error_at(mark, Error::type_mismatch(Type::Long, ty)));
                }
                *operands += 1;
                Ok(())
            }
        }
    }

    /// Emits the form's epilogue and returns its result type.
    pub(crate) fn end<I>(self, compiler: &mut Compiler<I>) -> Result<Type>
    where
        I: Iterator<Item = char>,
    {
        match self {
            Self::Print => {
                let newline = compiler.pool().intern_method_ref(
                    PRINT_STREAM,
                    "println",
                    &MethodDescriptor::void(Vec::new()).to_string(),
                )?;
                compiler.emit(Instruction::InvokeVirtual(newline), -1)?;
                Ok(Type::Void)
            }
            Self::Add { operands: 0 } => {
                compiler.push_long(0)?;
                Ok(Type::Long)
            }
            Self::Add { operands } => {
                let width = isize::from(Type::Long.stack_width());
                for _ in 1..operands {
                    compiler.emit(Instruction::Ladd, -width)?;
                }
                Ok(Type::Long)
            }
        }
    }
}
