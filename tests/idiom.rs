use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use allegrex_rs::isa::mips::gpr::{A0, ZERO};
use allegrex_rs::isa::mips::opcodes::{ADDIU, NOP};
use allegrex_rs::{IdiomMatcher, Instr, Operand};
use pretty_assertions::assert_eq;

fn nop(addr: u32) -> Instr {
    Instr::new(addr, &NOP, vec![])
}

fn addiu(addr: u32) -> Instr {
    Instr::new(addr, &ADDIU, vec![Operand::reg(A0), Operand::reg(ZERO), Operand::imm(1)])
}

#[test]
fn no_phases_always_matches() {
    let m: IdiomMatcher<Instr, (), i32> = IdiomMatcher::new(0, || (), |_, _| 0x42);
    assert_eq!(m.matches(&[], 0), Some(0x42));
}

#[test]
fn window_limits_the_scan() {
    let m = IdiomMatcher::new(2, || (), |found: Vec<&Instr>, _| found.len())
        .phase(|i: &Instr, _| i.is(&NOP))
        .phase(|i, _| i.is(&NOP));
    let instrs = [nop(0), addiu(4), nop(8)];
    assert_eq!(m.matches(&instrs, 2), None);

    let wider = IdiomMatcher::new(3, || (), |found: Vec<&Instr>, _| found.len())
        .phase(|i: &Instr, _| i.is(&NOP))
        .phase(|i, _| i.is(&NOP));
    assert_eq!(wider.matches(&instrs, 2), Some(2));
}

#[test]
fn fresh_state_per_call() {
    let calls = Arc::new(AtomicUsize::new(0));
    let counter = calls.clone();
    let m = IdiomMatcher::new(
        1,
        move || counter.fetch_add(1, Ordering::SeqCst),
        |_: Vec<&Instr>, _| (),
    )
    .phase(|i: &Instr, _| i.is(&NOP));
    let instrs = [nop(0), addiu(4)];
    m.matches(&instrs, 0);
    m.matches(&instrs, 1);
    m.matches(&instrs, 0);
    assert_eq!(calls.load(Ordering::SeqCst), 3);
}

#[test]
fn state_and_matched_order() {
    let m = IdiomMatcher::new(
        3,
        || 0xFFu32,
        |found: Vec<&Instr>, state| (found.iter().map(|i| i.addr).collect::<Vec<_>>(), state),
    )
    .phase(|i: &Instr, s: &mut u32| {
        *s -= 1;
        i.is(&NOP)
    })
    .phase(|i, s| {
        *s -= 1;
        i.is(&NOP)
    });
    let instrs = [nop(0), addiu(4), nop(8)];
    // phase 1 rejects addiu, then accepts the first nop
    assert_eq!(m.matches(&instrs, 2), Some((vec![8, 0], 0xFC)));
}

#[test]
fn start_index_below_chain_fails() {
    let m = IdiomMatcher::new(4, || (), |_: Vec<&Instr>, _| ())
        .phase(|i: &Instr, _| i.is(&ADDIU))
        .phase(|i, _| i.is(&NOP));
    let instrs = [addiu(0), nop(4)];
    assert_eq!(m.matches(&instrs, 1), None);
    assert_eq!(m.matches(&[nop(0), addiu(4)], 1), Some(()));
}
