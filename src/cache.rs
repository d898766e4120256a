use std::collections::HashMap;

use parking_lot::RwLock;
use tracing::trace;

use crate::decoder::{Disassembler, Disassembly, FunctionDef};
use crate::error::Result;
use crate::instr::Instr;
use crate::memory::ByteSource;

/// Memoizes single-instruction decoding by address.
///
/// The memo is keyed by address alone, so one instance must stay bound to one
/// byte source. Concurrent misses on the same address may decode twice, but
/// the first stored result is the one every caller gets back.
pub struct CachingDisassembler<D> {
    inner: D,
    cache: RwLock<HashMap<u32, Instr>>,
}

impl<D: Disassembler> CachingDisassembler<D> {
    pub fn new(inner: D) -> Self {
        Self { inner, cache: RwLock::new(HashMap::new()) }
    }

    pub fn inner(&self) -> &D {
        &self.inner
    }

    pub fn len(&self) -> usize {
        self.cache.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.cache.read().is_empty()
    }

    pub fn clear(&self) {
        self.cache.write().clear();
    }
}

impl<D: Disassembler> Disassembler for CachingDisassembler<D> {
    fn disassemble<S: ByteSource + ?Sized>(&self, src: &S, func: &FunctionDef) -> Result<Disassembly> {
        self.inner.disassemble(src, func)
    }

    fn disassemble_instruction<S: ByteSource + ?Sized>(&self, src: &S, addr: u32) -> Result<Instr> {
        if let Some(hit) = self.cache.read().get(&addr) {
            trace!(addr = format_args!("{addr:#010x}"), "instruction cache hit");
            return Ok(hit.clone());
        }
        let decoded = self.inner.disassemble_instruction(src, addr)?;
        Ok(self.cache.write().entry(addr).or_insert(decoded).clone())
    }
}
