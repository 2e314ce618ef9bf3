//! A minimal class file reader and interpreter for compiled programs.
//!
//! Understands exactly the constant kinds and instructions the compiler
//! produces, and models `System.out` as a string buffer.

use std::collections::HashMap;

/// A constant pool entry, as read back.
#[derive(Clone, Debug, PartialEq)]
pub enum Entry {
    Utf8(String),
    Integer(i32),
    Float(f32),
    Long(i64),
    Double(f64),
    Class(u16),
    String(u16),
    FieldRef(u16, u16),
    MethodRef(u16, u16),
    InterfaceMethodRef(u16, u16),
    NameAndType(u16, u16),
    MethodType(u16),
}

/// A method and its code attribute.
#[derive(Debug)]
pub struct Method {
    pub access_flags: u16,
    pub name: String,
    pub descriptor: String,
    pub max_stack: u16,
    pub max_locals: u16,
    pub code: Vec<u8>,
}

/// A parsed class file.
#[derive(Debug)]
pub struct Class {
    pub minor: u16,
    pub major: u16,
    pub pool_count: u16,
    pub pool: HashMap<u16, Entry>,
    pub access_flags: u16,
    pub this_class: String,
    pub super_class: String,
    pub methods: Vec<Method>,
}

struct Reader<'a> {
    bytes: &'a [u8],
    pos: usize,
}

impl Reader<'_> {
    fn take(&mut self, n: usize) -> &[u8] {
        let slice = &self.bytes[self.pos..self.pos + n];
        self.pos += n;
        slice
    }

    fn u8(&mut self) -> u8 {
        self.take(1)[0]
    }

    fn u16(&mut self) -> u16 {
        u16::from_be_bytes(self.take(2).try_into().unwrap())
    }

    fn u32(&mut self) -> u32 {
        u32::from_be_bytes(self.take(4).try_into().unwrap())
    }

    fn u64(&mut self) -> u64 {
        u64::from_be_bytes(self.take(8).try_into().unwrap())
    }
}

impl Class {
    /// Parses `bytes`, panicking on anything malformed or left over.
    pub fn parse(bytes: &[u8]) -> Self {
        let mut r = Reader { bytes, pos: 0 };
        assert_eq!(r.u32(), 0xCAFE_BABE, "bad magic");
        let minor = r.u16();
        let major = r.u16();

        let pool_count = r.u16();
        let mut pool = HashMap::new();
        let mut index = 1;
        while index < pool_count {
            let tag = r.u8();
            let entry = match tag {
                1 => {
                    let len = usize::from(r.u16());
                    Entry::Utf8(String::from_utf8(r.take(len).to_vec()).unwrap())
                }
                3 => Entry::Integer(r.u32() as i32),
                4 => Entry::Float(f32::from_bits(r.u32())),
                5 => Entry::Long(r.u64() as i64),
                6 => Entry::Double(f64::from_bits(r.u64())),
                7 => Entry::Class(r.u16()),
                8 => Entry::String(r.u16()),
                9 => Entry::FieldRef(r.u16(), r.u16()),
                10 => Entry::MethodRef(r.u16(), r.u16()),
                11 => Entry::InterfaceMethodRef(r.u16(), r.u16()),
                12 => Entry::NameAndType(r.u16(), r.u16()),
                16 => Entry::MethodType(r.u16()),
                other => panic!("unknown constant tag {other} at #{index}"),
            };
            let wide = matches!(entry, Entry::Long(_) | Entry::Double(_));
            pool.insert(index, entry);
            index += if wide { 2 } else { 1 };
        }
        assert_eq!(index, pool_count, "pool count disagrees with entries");

        let access_flags = r.u16();
        let this_index = r.u16();
        let super_index = r.u16();
        let mut class = Self {
            minor,
            major,
            pool_count,
            pool,
            access_flags,
            this_class: String::new(),
            super_class: String::new(),
            methods: Vec::new(),
        };
        class.this_class = class.class_name(this_index).to_string();
        class.super_class = class.class_name(super_index).to_string();

        assert_eq!(r.u16(), 0, "interfaces");
        assert_eq!(r.u16(), 0, "fields");
        let method_count = r.u16();
        for _ in 0..method_count {
            let access_flags = r.u16();
            let name = class.utf8(r.u16()).to_string();
            let descriptor = class.utf8(r.u16()).to_string();
            assert_eq!(r.u16(), 1, "method attributes");
            assert_eq!(class.utf8(r.u16()), "Code");
            let length = r.u32() as usize;
            let start = r.pos;
            let max_stack = r.u16();
            let max_locals = r.u16();
            let code_len = r.u32() as usize;
            let code = r.take(code_len).to_vec();
            assert_eq!(r.u16(), 0, "exception table");
            assert_eq!(r.u16(), 0, "code attributes");
            assert_eq!(r.pos - start, length, "attribute length");
            class.methods.push(Method {
                access_flags,
                name,
                descriptor,
                max_stack,
                max_locals,
                code,
            });
        }
        assert_eq!(r.u16(), 0, "class attributes");
        assert_eq!(r.pos, bytes.len(), "trailing bytes");
        class
    }

    pub fn entry(&self, index: u16) -> &Entry {
        self.pool
            .get(&index)
            .unwrap_or_else(|| panic!("no constant at #{index}"))
    }

    pub fn utf8(&self, index: u16) -> &str {
        match self.entry(index) {
            Entry::Utf8(text) => text,
            other => panic!("#{index} is {other:?}, not Utf8"),
        }
    }

    pub fn class_name(&self, index: u16) -> &str {
        match self.entry(index) {
            Entry::Class(name) => self.utf8(*name),
            other => panic!("#{index} is {other:?}, not Class"),
        }
    }

    /// Resolves a field or method reference to (owner, name, descriptor).
    pub fn member(&self, index: u16) -> (&str, &str, &str) {
        let (class, name_and_type) = match self.entry(index) {
            Entry::FieldRef(c, nt) | Entry::MethodRef(c, nt) | Entry::InterfaceMethodRef(c, nt) => {
                (*c, *nt)
            }
            other => panic!("#{index} is {other:?}, not a member reference"),
        };
        let Entry::NameAndType(name, descriptor) = self.entry(name_and_type) else {
            panic!("#{name_and_type} is not NameAndType");
        };
        (
            self.class_name(class),
            self.utf8(*name),
            self.utf8(*descriptor),
        )
    }

    pub fn method(&self, name: &str) -> &Method {
        self.methods
            .iter()
            .find(|m| m.name == name)
            .unwrap_or_else(|| panic!("no method {name}"))
    }

    /// Runs `main` and returns what it printed.
    ///
    /// Panics if the code does anything the compiler should never emit,
    /// or if the stack ever exceeds the declared `max_stack`.
    pub fn run_main(&self) -> String {
        let main = self.method("main");
        let mut out = String::new();
        let mut stack: Vec<Value> = Vec::new();
        let code = &main.code;
        let mut pc = 0;

        let u16_at = |pc: usize| u16::from_be_bytes([code[pc], code[pc + 1]]);

        loop {
            let opcode = code[pc];
            pc += 1;
            match opcode {
                // getstatic
                0xB2 => {
                    let field = u16_at(pc);
                    pc += 2;
                    assert_eq!(
                        self.member(field),
                        ("java/lang/System", "out", "Ljava/io/PrintStream;")
                    );
                    stack.push(Value::Out);
                }
                // dup
                0x59 => {
                    let top = stack.last().cloned().expect("dup on empty stack");
                    assert_eq!(top.width(), 1, "dup of a two-word value");
                    stack.push(top);
                }
                // ldc, ldc_w
                0x12 | 0x13 => {
                    let index = if opcode == 0x12 {
                        let index = u16::from(code[pc]);
                        pc += 1;
                        index
                    } else {
                        let index = u16_at(pc);
                        pc += 2;
                        assert!(index >= 256, "ldc_w used for a narrow index");
                        index
                    };
                    match self.entry(index) {
                        Entry::String(utf8) => stack.push(Value::Str(self.utf8(*utf8).into())),
                        Entry::Integer(v) => stack.push(Value::Int(*v)),
                        other => panic!("ldc of {other:?}"),
                    }
                }
                // ldc2_w
                0x14 => {
                    let index = u16_at(pc);
                    pc += 2;
                    match self.entry(index) {
                        Entry::Long(v) => stack.push(Value::Long(*v)),
                        other => panic!("ldc2_w of {other:?}"),
                    }
                }
                // ladd
                0x61 => {
                    let (Some(Value::Long(b)), Some(Value::Long(a))) = (stack.pop(), stack.pop())
                    else {
                        panic!("ladd needs two longs");
                    };
                    stack.push(Value::Long(a.wrapping_add(b)));
                }
                // invokevirtual
                0xB6 => {
                    let method = u16_at(pc);
                    pc += 2;
                    let (owner, name, descriptor) = self.member(method);
                    assert_eq!(owner, "java/io/PrintStream");
                    match (name, descriptor) {
                        ("print", "(Ljava/lang/String;)V") => {
                            let Some(Value::Str(s)) = stack.pop() else {
                                panic!("print(String) without a string");
                            };
                            out.push_str(&s);
                        }
                        ("print", "(J)V") => {
                            let Some(Value::Long(v)) = stack.pop() else {
                                panic!("print(long) without a long");
                            };
                            out.push_str(&v.to_string());
                        }
                        ("println", "()V") => out.push('\n'),
                        other => panic!("unexpected method {other:?}"),
                    }
                    assert_eq!(stack.pop(), Some(Value::Out), "receiver");
                }
                // return
                0xB1 => {
                    assert_eq!(pc, code.len(), "return is not last");
                    return out;
                }
                other => panic!("unexpected opcode {other:#04x} at {}", pc - 1),
            }
            let words: usize = stack.iter().map(Value::width).sum();
            assert!(
                words <= usize::from(main.max_stack),
                "stack depth {words} exceeds max_stack {}",
                main.max_stack
            );
        }
    }
}

/// A value on the interpreter's operand stack.
#[derive(Clone, Debug, PartialEq)]
enum Value {
    Out,
    Str(String),
    Int(i32),
    Long(i64),
}

impl Value {
    fn width(&self) -> usize {
        match self {
            Self::Long(_) => 2,
            _ => 1,
        }
    }
}
