//! Method body under construction.
//!
//! `CodeBuffer` pairs the ordered instruction list with operand stack
//! bookkeeping. `emit` is the only way to mutate it, so the recorded
//! high-water mark always reflects every prefix of the instruction list.

use cafelisp_foundation::{Error, Result};
use log::trace;

use crate::instruction::Instruction;

/// Instructions plus current and maximum operand stack depth, in words.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CodeBuffer {
    instructions: Vec<Instruction>,
    depth: usize,
    max_depth: usize,
}

impl CodeBuffer {
    /// Creates an empty buffer.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends `instruction` and adjusts the stack depth by `delta` words.
    ///
    /// # Errors
    /// Returns an internal error if the depth would go negative; the
    /// buffer is left unchanged in that case.
    pub fn emit(&mut self, instruction: Instruction, delta: isize) -> Result<()> {
        let Some(depth) = self.depth.checked_add_signed(delta) else {
            return Err(Error::internal(format!(
                "{instruction} with stack effect {delta} underflows depth {}",
                self.depth
            )));
        };
        trace!("{instruction} ({delta:+}) depth {depth}");
        self.instructions.push(instruction);
        self.depth = depth;
        self.max_depth = self.max_depth.max(depth);
        Ok(())
    }

    /// Instructions in emission order.
    #[must_use]
    pub fn instructions(&self) -> &[Instruction] {
        &self.instructions
    }

    /// Current operand stack depth.
    #[must_use]
    pub fn depth(&self) -> usize {
        self.depth
    }

    /// Highest depth reached so far.
    #[must_use]
    pub fn max_depth(&self) -> usize {
        self.max_depth
    }

    /// Number of instructions emitted.
    #[must_use]
    pub fn len(&self) -> usize {
        self.instructions.len()
    }

    /// Returns true if nothing has been emitted.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.instructions.is_empty()
    }

    /// Concatenated encoding of every instruction.
    #[must_use]
    pub fn to_bytes(&self) -> Vec<u8> {
        let size = self.instructions.iter().map(Instruction::encoded_len).sum();
        let mut out = Vec::with_capacity(size);
        for instruction in &self.instructions {
            instruction.encode(&mut out);
        }
        out
    }
}
