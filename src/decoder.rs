use serde::Serialize;

use crate::error::Result;
use crate::instr::Instr;
use crate::memory::ByteSource;

/// Function range to decode, supplied by the project layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FunctionDef {
    pub name: String,
    pub start: u32,
    pub size: u32,
}

impl FunctionDef {
    pub fn new(name: impl Into<String>, start: u32, size: u32) -> Self {
        Self { name: name.into(), start, size }
    }

    pub fn end(&self) -> u32 {
        self.start.wrapping_add(self.size)
    }
}

/// Instructions of one function in address order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Disassembly {
    pub def: FunctionDef,
    pub instrs: Vec<Instr>,
}

/// Architecture-specific decoding contract.
///
/// Decoding is deterministic: the same bytes at the same address always give
/// the same instruction. Implementations keep no mutable decode state, so
/// one disassembler can serve several threads.
pub trait Disassembler {
    /// Decodes the function's whole range in address order.
    fn disassemble<S: ByteSource + ?Sized>(&self, src: &S, func: &FunctionDef) -> Result<Disassembly>;

    /// Decodes exactly one instruction at `addr`.
    fn disassemble_instruction<S: ByteSource + ?Sized>(&self, src: &S, addr: u32) -> Result<Instr>;
}
