//! One-pass compiler from source text to a method body.
//!
//! There is no token stream or syntax tree: the compiler reads characters
//! and emits instructions as soon as it recognizes them, tracking operand
//! stack depth and the result type of each expression as it goes.

use std::fmt;
use std::io::Read;

use cafelisp_classfile::{
    ClassFile, CodeAttribute, CodeBuffer, ConstantPool, FieldType, Instruction, MethodDescriptor,
    MethodInfo, access,
};
use cafelisp_foundation::{Error, Result, Type};
use log::debug;

use crate::builtin::{Builtin, Form};
use crate::config::ModuleConfig;
use crate::cursor::{Cursor, Mark};

/// Local variable slots of the generated `main` (its `String[]` argument).
const MAIN_MAX_LOCALS: u16 = 1;

/// Compiler state for a single compilation unit.
pub struct Compiler<I: Iterator<Item = char>> {
    /// Source being read.
    cursor: Cursor<I>,
    /// Constants referenced by the emitted code.
    pool: ConstantPool,
    /// The `main` body under construction.
    code: CodeBuffer,
}

/// A form whose closing parenthesis has not been read yet.
struct OpenForm {
    form: Form,
    /// Position of the open parenthesis.
    open: Mark,
    /// Start of the operand being compiled.
    argument: Mark,
}

/// A compiled program: its constant pool and `main` body.
#[derive(Clone, Debug)]
pub struct CompiledProgram {
    /// Constant pool.
    pub pool: ConstantPool,
    /// Body of `main`, ending with `return`.
    pub code: CodeBuffer,
}

impl<I: Iterator<Item = char>> Compiler<I> {
    /// Creates a compiler reading from `chars`.
    pub fn new(chars: I) -> Self {
        Self {
            cursor: Cursor::new(chars),
            pool: ConstantPool::new(),
            code: CodeBuffer::new(),
        }
    }

    /// Compiles expressions until the input is exhausted.
    ///
    /// Running out of input between expressions ends the program; running
    /// out inside one is a syntax error.
    ///
    /// # Errors
    /// Returns the first syntax, type, or constant error encountered.
    pub fn compile_program(mut self) -> Result<CompiledProgram> {
        let mut expressions = 0usize;
        loop {
            self.skip_whitespace();
            if self.cursor.peek().is_none() {
                break;
            }
            self.compile_expr().map_err(|err| self.locate(err))?;
            expressions += 1;
        }
        self.emit(Instruction::Return, 0)?;
        debug!(
            "compiled {expressions} expression(s): {} instruction(s), max stack {}, {} pool slot(s)",
            self.code.len(),
            self.code.max_depth(),
            self.pool.len()
        );
        Ok(CompiledProgram {
            pool: self.pool,
            code: self.code,
        })
    }

    /// Compiles one expression and returns the type it leaves on the stack.
    ///
    /// Nesting is tracked on `open` rather than the call stack, so depth is
    /// bounded only by memory.
    fn compile_expr(&mut self) -> Result<Type> {
        let mut open: Vec<OpenForm> = Vec::new();
        loop {
            self.skip_whitespace();
            let mark = self.mark();
            let value = match self.cursor.peek() {
                None => {
                    return Err(match open.last() {
                        Some(top) => self.syntax_at(top.open, "unclosed form"),
                        None => self.syntax_at(mark, "unexpected end of input"),
                    });
                }
                Some(')') => {
                    let Some(top) = open.pop() else {
                        return Err(self.syntax_at(mark, "unexpected `)`"));
                    };
                    self.cursor.advance();
                    top.form.end(self)?
                }
                Some(c) => {
                    if let Some(top) = open.last_mut() {
                        top.form.begin_argument(self)?;
                        top.argument = mark;
                    }
                    if c == '(' {
                        let form = self.open_form()?;
                        open.push(form);
                        continue;
                    }
                    self.compile_atom()?
                }
            };
            match open.last_mut() {
                None => return Ok(value),
                Some(top) => top.form.finish_argument(self, value, top.argument)?,
            }
        }
    }

    /// Reads `(name` and emits the form's prologue. The cursor is on the
    /// open parenthesis.
    fn open_form(&mut self) -> Result<OpenForm> {
        let open = self.mark();
        self.cursor.advance();
        self.skip_whitespace();

        let head = self.mark();
        let builtin = match self.cursor.peek() {
            None => return Err(self.syntax_at(open, "unclosed form")),
            Some(')') => return Err(self.syntax_at(open, "empty form")),
            Some(c) if is_structural(c) => {
                return Err(self.syntax_at(head, "expected a form name"));
            }
            Some(_) => {
                let name = self.read_atom();
                Builtin::from_name(&name)
                    .ok_or_else(|| self.syntax_at(head, format!("unknown form `{name}`")))?
            }
        };

        Ok(OpenForm {
            form: Form::start(builtin, self)?,
            open,
            argument: open,
        })
    }

    /// Compiles a literal: quoted text or an integer.
    fn compile_atom(&mut self) -> Result<Type> {
        let mark = self.mark();
        if self.cursor.peek() == Some('"') {
            let text = self.read_quoted()?;
            let index = self
                .pool
                .intern_string(&text)
                .map_err(|err| self.error_at(mark, err))?;
            self.emit(Instruction::Ldc(index), 1)?;
            return Ok(Type::String);
        }

        let atom = self.read_atom();
        let value: i64 = atom.parse().map_err(|_| {
            let digits = atom.strip_prefix(['-', '+']).unwrap_or(&atom);
            if !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit()) {
                self.syntax_at(mark, format!("integer literal `{atom}` is out of range"))
            } else {
                self.syntax_at(mark, format!("expected a literal, found `{atom}`"))
            }
        })?;
        self.push_long(value)?;
        Ok(Type::Long)
    }

    /// Emits a load of the 64-bit constant `value`.
    pub(crate) fn push_long(&mut self, value: i64) -> Result<()> {
        let index = self.pool.intern_long(value)?;
        self.emit(
            Instruction::Ldc2W(index),
            isize::from(Type::Long.stack_width()),
        )
    }

    /// Consumes characters up to whitespace or a structural character.
    fn read_atom(&mut self) -> String {
        let mut atom = String::new();
        while let Some(c) = self.cursor.peek() {
            if c.is_whitespace() || is_structural(c) {
                break;
            }
            atom.push(c);
            self.cursor.advance();
        }
        atom
    }

    /// Reads a quoted string. The cursor is on the opening quote.
    ///
    /// The string must close on the line it opened on.
    fn read_quoted(&mut self) -> Result<String> {
        let open = self.mark();
        self.cursor.advance();
        let mut text = String::new();
        loop {
            match self.cursor.peek() {
                None | Some('\n') => return Err(self.syntax_at(open, "unterminated string")),
                Some('"') => {
                    self.cursor.advance();
                    return Ok(text);
                }
                Some('\\') => {
                    let escape = self.mark();
                    self.cursor.advance();
                    let c = match self.cursor.peek() {
                        Some('n') => '\n',
                        Some('t') => '\t',
                        Some('r') => '\r',
                        Some('\\') => '\\',
                        Some('"') => '"',
                        None | Some('\n') => {
                            return Err(self.syntax_at(open, "unterminated string"));
                        }
                        Some(other) => {
                            return Err(
                                self.syntax_at(escape, format!("invalid escape sequence: \\{other}"))
                            );
                        }
                    };
                    self.cursor.advance();
                    text.push(c);
                }
                Some(c) => {
                    self.cursor.advance();
                    text.push(c);
                }
            }
        }
    }

    /// Skips whitespace and `;` line comments.
    fn skip_whitespace(&mut self) {
        while let Some(c) = self.cursor.peek() {
            if c.is_whitespace() {
                self.cursor.advance();
            } else if c == ';' {
                while self.cursor.peek().is_some_and(|c| c != '\n') {
                    self.cursor.advance();
                }
            } else {
                break;
            }
        }
    }

    /// Appends an instruction with its stack effect.
    pub(crate) fn emit(&mut self, instruction: Instruction, delta: isize) -> Result<()> {
        self.code.emit(instruction, delta)
    }

    /// The constant pool being populated.
    pub(crate) fn pool(&mut self) -> &mut ConstantPool {
        &mut self.pool
    }

    /// Position of the current character.
    pub(crate) fn mark(&self) -> Mark {
        self.cursor.mark()
    }

    /// Attaches the location of `mark` to `err`.
    pub(crate) fn error_at(&self, mark: Mark, err: Error) -> Error {
        err.with_location(self.cursor.location(mark))
    }

    /// Creates a syntax error at `mark`.
    fn syntax_at(&self, mark: Mark, message: impl Into<String>) -> Error {
        self.error_at(mark, Error::syntax(message))
    }

    /// Gives errors raised without a position the current one.
    fn locate(&self, err: Error) -> Error {
        if err.location.is_some() {
            err
        } else {
            err.with_location(self.cursor.here())
        }
    }
}

/// Characters that end an atom.
fn is_structural(c: char) -> bool {
    matches!(c, '(' | ')' | '"' | ';')
}

/// Signature of the generated entry point: `([Ljava/lang/String;)V`.
fn main_descriptor() -> MethodDescriptor {
    MethodDescriptor::void(vec![FieldType::array(FieldType::object(
        "java/lang/String",
    ))])
}

impl CompiledProgram {
    /// Wraps the program in a class with a `public static main` method.
    ///
    /// The class, superclass, and method identifiers are interned into a
    /// copy of the compiled pool, so each call starts from the same pool
    /// and the same configuration always yields identical bytes.
    ///
    /// # Errors
    /// Returns an error if a configured name cannot be interned or the
    /// class exceeds a format limit.
    pub fn assemble(&self, config: &ModuleConfig) -> Result<Vec<u8>> {
        if config.class_name.is_empty() {
            return Err(Error::invalid_constant("class name is empty"));
        }
        let mut pool = self.pool.clone();
        let mut class = ClassFile::new(&mut pool, &config.class_name, &config.super_class)?;
        let code = CodeAttribute::from_buffer(&self.code, MAIN_MAX_LOCALS)?;
        let main = MethodInfo::new(
            &mut pool,
            access::PUBLIC | access::STATIC | access::SYNTHETIC,
            "main",
            &main_descriptor(),
            code,
        )?;
        class.add_method(main);
        class.to_bytes(&pool)
    }
}

impl fmt::Display for CompiledProgram {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Constant pool:")?;
        for (index, constant) in self.pool.iter() {
            writeln!(f, "  #{index:<5} {constant}")?;
        }
        writeln!(
            f,
            "Code (max stack {}, {} bytes):",
            self.code.max_depth(),
            self.code.to_bytes().len()
        )?;
        let mut offset = 0;
        for instruction in self.code.instructions() {
            writeln!(f, "  {offset:>5}: {instruction}")?;
            offset += instruction.encoded_len();
        }
        Ok(())
    }
}

/// Compiles a program read from any character stream.
///
/// # Errors
/// Returns the first error encountered; no bytes are produced on failure.
pub fn compile_chars<I>(chars: I) -> Result<CompiledProgram>
where
    I: IntoIterator<Item = char>,
{
    Compiler::new(chars.into_iter()).compile_program()
}

/// Compiles source text into complete class file bytes.
///
/// # Errors
/// Returns the first syntax, type, or constant error encountered.
pub fn compile_str(source: &str, config: &ModuleConfig) -> Result<Vec<u8>> {
    compile_chars(source.chars())?.assemble(config)
}

/// Reads source from `reader` and compiles it into class file bytes.
///
/// # Errors
/// Returns an I/O error if the source cannot be read as UTF-8, or any
/// compilation error.
pub fn compile_reader<R: Read>(mut reader: R, config: &ModuleConfig) -> Result<Vec<u8>> {
    let mut source = String::new();
    reader.read_to_string(&mut source)?;
    compile_str(&source, config)
}
