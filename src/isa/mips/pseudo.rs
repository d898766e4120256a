//! Assembler pseudo-instructions folded back out of their base encodings.

use tracing::trace;

use crate::idiom::IdiomMatcher;
use crate::instr::Instr;
use crate::matcher::{any_imm, any_reg, is_reg};
use crate::opcode::{Opcode, OpcodeFlags, OperandRef, OP0, OP1};
use crate::operand::Operand;
use crate::register::Register;

use super::gpr::{PC, ZERO};
use super::opcodes::{ADDIU, ADDU, BEQ, BNE, LUI, OR, ORI};
use super::processor::COMMON;

const PC_REF: OperandRef = OperandRef::Fixed(PC);
const BRANCH: OpcodeFlags = OpcodeFlags::BRANCH.union(OpcodeFlags::DELAY_SLOT);

pub static MOVE: Opcode = Opcode::new("move", COMMON)
    .describe("Copy register")
    .modifies(&[OP0])
    .uses(&[OP1]);
pub static LI: Opcode = Opcode::new("li", COMMON).describe("Load immediate").modifies(&[OP0]);
pub static B: Opcode = Opcode::new("b", COMMON)
    .describe("Unconditional branch")
    .flags(BRANCH)
    .modifies(&[PC_REF]);
pub static BEQZ: Opcode = Opcode::new("beqz", COMMON)
    .describe("Branch if zero")
    .flags(BRANCH)
    .modifies(&[PC_REF])
    .uses(&[OP0]);
pub static BNEZ: Opcode = Opcode::new("bnez", COMMON)
    .describe("Branch if not zero")
    .flags(BRANCH)
    .modifies(&[PC_REF])
    .uses(&[OP0]);

struct WideLi {
    reg: Register,
    lo: i32,
}

impl Default for WideLi {
    fn default() -> Self {
        Self { reg: ZERO, lo: 0 }
    }
}

/// `lui rt, hi` directly followed by `ori rt, rt, lo`.
fn wide_li_idiom() -> IdiomMatcher<Instr, WideLi, Option<Instr>> {
    IdiomMatcher::new(2, WideLi::default, |found: Vec<&Instr>, s: WideLi| {
        let lui = found.last()?;
        let hi = lui.op1_imm().ok()?;
        let value = (hi << 16) | (s.lo & 0xFFFF);
        Some(Instr::new(lui.addr, &LI, vec![Operand::reg(s.reg), Operand::uimm(value)]))
    })
    .phase(|i: &Instr, s| {
        if !i.matches(Some(&ORI), &[any_reg(), any_reg(), any_imm()]) {
            return false;
        }
        match (i.op0_reg(), i.op1_reg(), i.op2_imm()) {
            (Ok(rt), Ok(rs), Ok(lo)) if rt == rs => {
                s.reg = rt;
                s.lo = lo;
                true
            }
            _ => false,
        }
    })
    .phase(|i, s| i.matches(Some(&LUI), &[is_reg(s.reg), any_imm()]))
}

/// Rewrites a single base instruction into its pseudo form.
fn fold_single(instr: &Instr) -> Option<Instr> {
    let ops = &instr.operands;
    let mk = |opcode: &'static Opcode, operands: Vec<Operand>| Some(Instr::new(instr.addr, opcode, operands));

    if instr.is(&ADDU) || instr.is(&OR) {
        if instr.matches(None, &[any_reg(), any_reg(), is_reg(ZERO)]) {
            return mk(&MOVE, vec![ops[0], ops[1]]);
        }
        if instr.matches(None, &[any_reg(), is_reg(ZERO), any_reg()]) {
            return mk(&MOVE, vec![ops[0], ops[2]]);
        }
        return None;
    }
    if (instr.is(&ADDIU) || instr.is(&ORI)) && instr.matches(None, &[any_reg(), is_reg(ZERO), any_imm()]) {
        return mk(&LI, vec![ops[0], ops[2]]);
    }
    if instr.matches(Some(&BEQ), &[is_reg(ZERO), is_reg(ZERO), any_imm()]) {
        return mk(&B, vec![ops[2]]);
    }
    if instr.matches(Some(&BEQ), &[any_reg(), is_reg(ZERO), any_imm()]) {
        return mk(&BEQZ, vec![ops[0], ops[2]]);
    }
    if instr.matches(Some(&BNE), &[any_reg(), is_reg(ZERO), any_imm()]) {
        return mk(&BNEZ, vec![ops[0], ops[2]]);
    }
    None
}

/// Folds `move`, `li`, `b`, `beqz` and `bnez` out of a decoded listing.
///
/// A two-instruction `li` keeps the address of its `lui`. Everything that
/// doesn't fold is passed through unchanged.
pub struct PseudoFolder {
    wide_li: IdiomMatcher<Instr, WideLi, Option<Instr>>,
}

impl Default for PseudoFolder {
    fn default() -> Self {
        Self::new()
    }
}

impl PseudoFolder {
    pub fn new() -> Self {
        Self { wide_li: wide_li_idiom() }
    }

    pub fn fold(&self, instrs: &[Instr]) -> Vec<Instr> {
        let mut out = Vec::with_capacity(instrs.len());
        let mut idx = 0;
        while idx < instrs.len() {
            if idx + 1 < instrs.len() {
                if let Some(Some(li)) = self.wide_li.matches(instrs, idx + 1) {
                    if li.addr == instrs[idx].addr {
                        trace!(addr = li.addr, "folded lui/ori");
                        out.push(li);
                        idx += 2;
                        continue;
                    }
                }
            }
            let instr = &instrs[idx];
            out.push(fold_single(instr).unwrap_or_else(|| instr.clone()));
            idx += 1;
        }
        out
    }
}

pub fn fold_pseudo(instrs: &[Instr]) -> Vec<Instr> {
    PseudoFolder::new().fold(instrs)
}
