//! The deduplicating constant pool.
//!
//! Every `intern_*` operation is idempotent: asking twice for the same
//! semantic key returns the index handed out the first time. Entries that
//! reference other entries intern their dependencies first, so referenced
//! entries always sit at lower indices than the entries pointing at them.

use std::collections::HashMap;

use cafelisp_foundation::{Error, FormatLimit, Result};
use log::trace;

use crate::constant::{Constant, ConstantIndex};

/// Cache key for member references: (owner, name, descriptor).
type MemberKey = (String, String, String);

/// An append-only, index-assigning table of constants.
#[derive(Clone, Debug)]
pub struct ConstantPool {
    /// Entries in insertion order.
    entries: Vec<Constant>,
    /// Maps each index to its entry position. Slot 0 and the upper half of
    /// two-slot entries are `None`.
    slots: Vec<Option<usize>>,
    utf8: HashMap<String, ConstantIndex>,
    strings: HashMap<String, ConstantIndex>,
    classes: HashMap<String, ConstantIndex>,
    name_and_types: HashMap<(String, String), ConstantIndex>,
    field_refs: HashMap<MemberKey, ConstantIndex>,
    method_refs: HashMap<MemberKey, ConstantIndex>,
    interface_method_refs: HashMap<MemberKey, ConstantIndex>,
    method_types: HashMap<String, ConstantIndex>,
    integers: HashMap<i32, ConstantIndex>,
    /// Keyed by bit pattern so that NaN and signed zeros deduplicate exactly.
    floats: HashMap<u32, ConstantIndex>,
    longs: HashMap<i64, ConstantIndex>,
    /// Keyed by bit pattern.
    doubles: HashMap<u64, ConstantIndex>,
}

impl Default for ConstantPool {
    fn default() -> Self {
        Self::new()
    }
}

impl ConstantPool {
    /// Creates an empty pool. The first entry receives index 1.
    #[must_use]
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
            slots: vec![None],
            utf8: HashMap::new(),
            strings: HashMap::new(),
            classes: HashMap::new(),
            name_and_types: HashMap::new(),
            field_refs: HashMap::new(),
            method_refs: HashMap::new(),
            interface_method_refs: HashMap::new(),
            method_types: HashMap::new(),
            integers: HashMap::new(),
            floats: HashMap::new(),
            longs: HashMap::new(),
            doubles: HashMap::new(),
        }
    }

    /// Number of index slots in use (two-slot entries count twice).
    #[must_use]
    pub fn len(&self) -> usize {
        self.slots.len() - 1
    }

    /// Returns true if nothing has been interned.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns the entry starting at `index`.
    #[must_use]
    pub fn get(&self, index: ConstantIndex) -> Option<&Constant> {
        self.slots
            .get(usize::from(index))
            .copied()
            .flatten()
            .map(|position| &self.entries[position])
    }

    /// Iterates over entries with their starting indices, in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (ConstantIndex, &Constant)> {
        self.slots.iter().enumerate().filter_map(|(index, slot)| {
            let position = (*slot)?;
            let index = ConstantIndex::try_from(index).ok()?;
            Some((index, &self.entries[position]))
        })
    }

    /// Returns a read-only view of the pool for serialization.
    #[must_use]
    pub fn finalize(&self) -> FinalizedPool<'_> {
        FinalizedPool {
            entries: &self.entries,
            slot_count: self.len(),
        }
    }

    /// Appends an entry and returns its starting index.
    fn push(&mut self, constant: Constant) -> Result<ConstantIndex> {
        let index = self.slots.len();
        let width = usize::from(constant.slot_width());
        // The header stores the next free index as a u16 count.
        if index + width > usize::from(u16::MAX) {
            return Err(Error::limit_exceeded(FormatLimit::ConstantPoolSize));
        }
        let index = ConstantIndex::try_from(index)
            .map_err(|_| Error::limit_exceeded(FormatLimit::ConstantPoolSize))?;

        trace!("constant #{index} = {constant}");
        self.slots.push(Some(self.entries.len()));
        if width == 2 {
            self.slots.push(None);
        }
        self.entries.push(constant);
        Ok(index)
    }

    /// Interns a Utf8 text entry.
    ///
    /// # Errors
    /// Returns an error if `text` contains a null byte or a non-ASCII
    /// character, or is longer than 65535 bytes.
    pub fn intern_utf8(&mut self, text: &str) -> Result<ConstantIndex> {
        if let Some(&index) = self.utf8.get(text) {
            return Ok(index);
        }
        validate_text(text)?;
        let index = self.push(Constant::Utf8(text.to_owned()))?;
        self.utf8.insert(text.to_owned(), index);
        Ok(index)
    }

    /// Interns a string literal, interning its Utf8 text first.
    ///
    /// # Errors
    /// Returns an error if the text cannot be interned.
    pub fn intern_string(&mut self, text: &str) -> Result<ConstantIndex> {
        if let Some(&index) = self.strings.get(text) {
            return Ok(index);
        }
        let utf8 = self.intern_utf8(text)?;
        let index = self.push(Constant::String { utf8 })?;
        self.strings.insert(text.to_owned(), index);
        Ok(index)
    }

    /// Interns a class reference by its internal name (e.g. `java/lang/Object`).
    ///
    /// # Errors
    /// Returns an error if the name cannot be interned.
    pub fn intern_class(&mut self, name: &str) -> Result<ConstantIndex> {
        if let Some(&index) = self.classes.get(name) {
            return Ok(index);
        }
        let utf8 = self.intern_utf8(name)?;
        let index = self.push(Constant::Class { name: utf8 })?;
        self.classes.insert(name.to_owned(), index);
        Ok(index)
    }

    /// Interns a name-and-type pair.
    ///
    /// # Errors
    /// Returns an error if either part cannot be interned.
    pub fn intern_name_and_type(&mut self, name: &str, descriptor: &str) -> Result<ConstantIndex> {
        let key = (name.to_owned(), descriptor.to_owned());
        if let Some(&index) = self.name_and_types.get(&key) {
            return Ok(index);
        }
        let name = self.intern_utf8(name)?;
        let descriptor = self.intern_utf8(descriptor)?;
        let index = self.push(Constant::NameAndType { name, descriptor })?;
        self.name_and_types.insert(key, index);
        Ok(index)
    }

    /// Interns a field reference.
    ///
    /// # Errors
    /// Returns an error if any component cannot be interned.
    pub fn intern_field_ref(
        &mut self,
        owner: &str,
        name: &str,
        descriptor: &str,
    ) -> Result<ConstantIndex> {
        let key = member_key(owner, name, descriptor);
        if let Some(&index) = self.field_refs.get(&key) {
            return Ok(index);
        }
        let (class, name_and_type) = self.intern_member(owner, name, descriptor)?;
        let index = self.push(Constant::FieldRef {
            class,
            name_and_type,
        })?;
        self.field_refs.insert(key, index);
        Ok(index)
    }

    /// Interns a class method reference.
    ///
    /// # Errors
    /// Returns an error if any component cannot be interned.
    pub fn intern_method_ref(
        &mut self,
        owner: &str,
        name: &str,
        descriptor: &str,
    ) -> Result<ConstantIndex> {
        let key = member_key(owner, name, descriptor);
        if let Some(&index) = self.method_refs.get(&key) {
            return Ok(index);
        }
        let (class, name_and_type) = self.intern_member(owner, name, descriptor)?;
        let index = self.push(Constant::MethodRef {
            class,
            name_and_type,
        })?;
        self.method_refs.insert(key, index);
        Ok(index)
    }

    /// Interns an interface method reference.
    ///
    /// # Errors
    /// Returns an error if any component cannot be interned.
    pub fn intern_interface_method_ref(
        &mut self,
        owner: &str,
        name: &str,
        descriptor: &str,
    ) -> Result<ConstantIndex> {
        let key = member_key(owner, name, descriptor);
        if let Some(&index) = self.interface_method_refs.get(&key) {
            return Ok(index);
        }
        let (class, name_and_type) = self.intern_member(owner, name, descriptor)?;
        let index = self.push(Constant::InterfaceMethodRef {
            class,
            name_and_type,
        })?;
        self.interface_method_refs.insert(key, index);
        Ok(index)
    }

    /// Interns a method type by descriptor.
    ///
    /// # Errors
    /// Returns an error if the descriptor cannot be interned.
    pub fn intern_method_type(&mut self, descriptor: &str) -> Result<ConstantIndex> {
        if let Some(&index) = self.method_types.get(descriptor) {
            return Ok(index);
        }
        let utf8 = self.intern_utf8(descriptor)?;
        let index = self.push(Constant::MethodType { descriptor: utf8 })?;
        self.method_types.insert(descriptor.to_owned(), index);
        Ok(index)
    }

    /// Interns a 32-bit integer.
    ///
    /// # Errors
    /// Returns an error if the pool is full.
    pub fn intern_integer(&mut self, value: i32) -> Result<ConstantIndex> {
        if let Some(&index) = self.integers.get(&value) {
            return Ok(index);
        }
        let index = self.push(Constant::Integer(value))?;
        self.integers.insert(value, index);
        Ok(index)
    }

    /// Interns a 32-bit float.
    ///
    /// # Errors
    /// Returns an error if the pool is full.
    pub fn intern_float(&mut self, value: f32) -> Result<ConstantIndex> {
        if let Some(&index) = self.floats.get(&value.to_bits()) {
            return Ok(index);
        }
        let index = self.push(Constant::Float(value))?;
        self.floats.insert(value.to_bits(), index);
        Ok(index)
    }

    /// Interns a 64-bit integer, which occupies two slots.
    ///
    /// # Errors
    /// Returns an error if the pool is full.
    pub fn intern_long(&mut self, value: i64) -> Result<ConstantIndex> {
        if let Some(&index) = self.longs.get(&value) {
            return Ok(index);
        }
        let index = self.push(Constant::Long(value))?;
        self.longs.insert(value, index);
        Ok(index)
    }

    /// Interns a 64-bit float, which occupies two slots.
    ///
    /// # Errors
    /// Returns an error if the pool is full.
    pub fn intern_double(&mut self, value: f64) -> Result<ConstantIndex> {
        if let Some(&index) = self.doubles.get(&value.to_bits()) {
            return Ok(index);
        }
        let index = self.push(Constant::Double(value))?;
        self.doubles.insert(value.to_bits(), index);
        Ok(index)
    }

    fn intern_member(
        &mut self,
        owner: &str,
        name: &str,
        descriptor: &str,
    ) -> Result<(ConstantIndex, ConstantIndex)> {
        let class = self.intern_class(owner)?;
        let name_and_type = self.intern_name_and_type(name, descriptor)?;
        Ok((class, name_and_type))
    }
}

fn member_key(owner: &str, name: &str, descriptor: &str) -> MemberKey {
    (owner.to_owned(), name.to_owned(), descriptor.to_owned())
}

/// Checks that `text` fits the one-byte-per-character Utf8 encoding used here.
fn validate_text(text: &str) -> Result<()> {
    if let Some(c) = text.chars().find(|&c| c == '\0' || !c.is_ascii()) {
        let message = if c == '\0' {
            format!("text {text:?} contains a null byte")
        } else {
            format!("character {c:?} in {text:?} is outside the supported one-byte range")
        };
        return Err(Error::invalid_constant(message));
    }
    if text.len() > usize::from(u16::MAX) {
        return Err(Error::limit_exceeded(FormatLimit::Utf8Length {
            length: text.len(),
        }));
    }
    Ok(())
}

/// A read-only view of a pool, ready to serialize.
#[derive(Clone, Copy, Debug)]
pub struct FinalizedPool<'a> {
    entries: &'a [Constant],
    slot_count: usize,
}

impl<'a> FinalizedPool<'a> {
    /// Entries in insertion order.
    #[must_use]
    pub fn entries(&self) -> &'a [Constant] {
        self.entries
    }

    /// Total number of index slots used.
    #[must_use]
    pub fn slot_count(&self) -> usize {
        self.slot_count
    }

    /// The `constant_pool_count` header value: one more than the slot count.
    ///
    /// # Errors
    /// Returns an error if the pool outgrew the 16-bit count.
    pub fn header_count(&self) -> Result<u16> {
        u16::try_from(self.slot_count + 1)
            .map_err(|_| Error::limit_exceeded(FormatLimit::ConstantPoolSize))
    }

    /// Appends the header count followed by every entry's encoding.
    ///
    /// # Errors
    /// Returns an error if the pool or one of its entries exceeds a format limit.
    pub fn write_to(&self, out: &mut Vec<u8>) -> Result<()> {
        out.extend_from_slice(&self.header_count()?.to_be_bytes());
        for constant in self.entries {
            constant.write_to(out)?;
        }
        Ok(())
    }
}
