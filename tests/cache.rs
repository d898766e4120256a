use std::sync::atomic::{AtomicUsize, Ordering};

use allegrex_rs::decoder::{Disassembler, Disassembly, FunctionDef};
use allegrex_rs::isa::mips::MipsDisassembler;
use allegrex_rs::{ByteSource, CachingDisassembler, Instr, MemoryImage, Result};
use pretty_assertions::assert_eq;

/// Counts how often the wrapped decoder is asked for a single instruction.
#[derive(Default)]
struct Counting {
    inner: MipsDisassembler,
    calls: AtomicUsize,
}

impl Disassembler for Counting {
    fn disassemble<S: ByteSource + ?Sized>(&self, src: &S, func: &FunctionDef) -> Result<Disassembly> {
        self.inner.disassemble(src, func)
    }

    fn disassemble_instruction<S: ByteSource + ?Sized>(&self, src: &S, addr: u32) -> Result<Instr> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.inner.disassemble_instruction(src, addr)
    }
}

fn image() -> MemoryImage {
    MemoryImage::from_words(&[0x0085_1021, 0x03E0_0008, 0])
}

#[test]
fn repeated_lookups_hit_the_cache() {
    let img = image();
    let dis = CachingDisassembler::new(Counting::default());
    assert!(dis.is_empty());

    let first = dis.disassemble_instruction(&img, 0).unwrap();
    let again = dis.disassemble_instruction(&img, 0).unwrap();
    assert_eq!(first, again);
    assert_eq!(first.to_string(), "0x0: addu v0, a0, a1");
    assert_eq!(dis.inner().calls.load(Ordering::SeqCst), 1);

    dis.disassemble_instruction(&img, 4).unwrap();
    assert_eq!(dis.len(), 2);
    assert_eq!(dis.inner().calls.load(Ordering::SeqCst), 2);

    dis.clear();
    dis.disassemble_instruction(&img, 0).unwrap();
    assert_eq!(dis.inner().calls.load(Ordering::SeqCst), 3);
}

#[test]
fn errors_are_not_cached() {
    let img = image();
    let dis = CachingDisassembler::new(Counting::default());
    assert!(dis.disassemble_instruction(&img, 0x100).is_err());
    assert!(dis.disassemble_instruction(&img, 0x100).is_err());
    assert!(dis.is_empty());
    assert_eq!(dis.inner().calls.load(Ordering::SeqCst), 2);
}

#[test]
fn function_decoding_is_delegated() {
    let img = image();
    let dis = CachingDisassembler::new(MipsDisassembler::default());
    let func = FunctionDef::new("f", 0, 12);
    let out = dis.disassemble(&img, &func).unwrap();
    assert_eq!(out.instrs.len(), 3);
    assert_eq!(out.def, func);
    assert!(dis.is_empty());
}

#[test]
fn concurrent_readers_see_one_value() {
    let img = image();
    let dis = CachingDisassembler::new(MipsDisassembler::default());
    let results: Vec<Instr> = std::thread::scope(|s| {
        let handles: Vec<_> = (0..8)
            .map(|_| s.spawn(|| dis.disassemble_instruction(&img, 4).unwrap()))
            .collect();
        handles.into_iter().map(|h| h.join().unwrap()).collect()
    });
    assert!(results.iter().all(|i| *i == results[0]));
    assert_eq!(results[0].to_string(), "0x4: jr ra");
    assert_eq!(dis.len(), 1);
}
