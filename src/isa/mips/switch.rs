//! Compiler-generated jump table dispatch sequences.

use serde::Serialize;
use tracing::debug;

use crate::idiom::IdiomMatcher;
use crate::instr::Instr;
use crate::matcher::{any_imm, any_reg, is_imm, is_reg};
use crate::register::Register;

use super::gpr::{A0, AT, V0, V1, ZERO};
use super::opcodes::{ADDIU, ADDU, BEQ, BEQL, JR, LUI, LW, SLL, SLTI, SLTIU};

const SWITCH_WINDOW: usize = 12;

/// A recognized `switch` dispatch: bounds check, table load and indirect jump.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SwitchDescriptor {
    /// Constituent instructions, jump first.
    pub instrs: Vec<Instr>,
    pub case_count: i32,
    pub jump_table: u32,
}

#[derive(Debug, Clone)]
pub struct AtRegState {
    pub index: Register,
    pub cond: Register,
    pub case_count: i32,
    pub jump_table: i32,
}

impl Default for AtRegState {
    fn default() -> Self {
        Self { index: ZERO, cond: ZERO, case_count: -1, jump_table: 0 }
    }
}

#[derive(Debug, Clone)]
pub struct A0RegState {
    pub index: Register,
    pub case_count: i32,
    pub jump_table: i32,
}

impl Default for A0RegState {
    fn default() -> Self {
        Self { index: ZERO, case_count: -1, jump_table: 0 }
    }
}

fn describe(instrs: Vec<&Instr>, case_count: i32, jump_table: i32) -> SwitchDescriptor {
    SwitchDescriptor {
        instrs: instrs.into_iter().cloned().collect(),
        case_count,
        jump_table: jump_table as u32,
    }
}

fn add_hi(acc: &mut i32, imm: i32) {
    *acc = acc.wrapping_add(imm.wrapping_shl(16));
}

/// Dispatch through `$at`:
///
/// ```text
/// sltiu cond, index, count
/// beq   cond, zero, default
/// sll   index, index, 2
/// lui   at, hi(table)
/// addu  at, at, index
/// lw    at, lo(table)(at)
/// jr    at
/// ```
pub fn at_reg_idiom() -> IdiomMatcher<Instr, AtRegState, SwitchDescriptor> {
    IdiomMatcher::new(SWITCH_WINDOW, AtRegState::default, |instrs: Vec<&Instr>, s: AtRegState| {
        describe(instrs, s.case_count, s.jump_table)
    })
    .phase(|i: &Instr, _| i.matches(Some(&JR), &[is_reg(AT)]))
    .phase(|i, s| {
        i.matches(Some(&LW), &[is_reg(AT), is_reg(AT), any_imm()])
            && i.op2_imm().map(|v| s.jump_table = s.jump_table.wrapping_add(v)).is_ok()
    })
    .phase(|i, s| {
        i.matches(Some(&ADDU), &[is_reg(AT), is_reg(AT), any_reg()])
            && i.op2_reg().map(|r| s.index = r).is_ok()
    })
    .phase(|i, s| {
        i.matches(Some(&LUI), &[is_reg(AT), any_imm()]) && i.op1_imm().map(|v| add_hi(&mut s.jump_table, v)).is_ok()
    })
    .phase(|i, s| i.matches(Some(&SLL), &[is_reg(s.index), is_reg(s.index), is_imm(2)]))
    .phase(|i, s| {
        (i.is(&BEQ) || i.is(&BEQL))
            && i.matches(None, &[any_reg(), is_reg(ZERO)])
            && i.op0_reg().map(|r| s.cond = r).is_ok()
    })
    .phase(|i, s| {
        (i.is(&SLTIU) || i.is(&SLTI))
            && i.matches(None, &[is_reg(s.cond), is_reg(s.index), any_imm()])
            && i.op2_imm().map(|v| s.case_count = v).is_ok()
    })
}

/// Dispatch through `$a0` with the table base built in `$v1`:
///
/// ```text
/// sltiu v0, index, count
/// beq   v0, zero, default
/// lui   v1, hi(table)
/// sll   v0, index, 2
/// addiu v1, v1, lo(table)
/// addu  v0, v0, v1
/// lw    a0, 0(v0)
/// jr    a0
/// ```
pub fn a0_reg_idiom() -> IdiomMatcher<Instr, A0RegState, SwitchDescriptor> {
    IdiomMatcher::new(SWITCH_WINDOW, A0RegState::default, |instrs: Vec<&Instr>, s: A0RegState| {
        describe(instrs, s.case_count, s.jump_table)
    })
    .phase(|i: &Instr, _| i.matches(Some(&JR), &[is_reg(A0)]))
    .phase(|i, _| i.matches(Some(&LW), &[is_reg(A0), is_reg(V0), is_imm(0)]))
    .phase(|i, _| i.matches(Some(&ADDU), &[is_reg(V0), is_reg(V0), is_reg(V1)]))
    .phase(|i, s| {
        i.matches(Some(&ADDIU), &[is_reg(V1), is_reg(V1), any_imm()])
            && i.op2_imm().map(|v| s.jump_table = s.jump_table.wrapping_add(v)).is_ok()
    })
    .phase(|i, s| {
        i.matches(Some(&SLL), &[is_reg(V0), any_reg(), is_imm(2)]) && i.op1_reg().map(|r| s.index = r).is_ok()
    })
    .phase(|i, s| {
        i.matches(Some(&LUI), &[is_reg(V1), any_imm()]) && i.op1_imm().map(|v| add_hi(&mut s.jump_table, v)).is_ok()
    })
    .phase(|i, _| i.matches(Some(&BEQ), &[is_reg(V0), is_reg(ZERO)]))
    .phase(|i, s| {
        i.matches(Some(&SLTIU), &[is_reg(V0), is_reg(s.index), any_imm()])
            && i.op2_imm().map(|v| s.case_count = v).is_ok()
    })
}

/// Both switch idioms, tried in turn.
pub struct SwitchIdioms {
    at_reg: IdiomMatcher<Instr, AtRegState, SwitchDescriptor>,
    a0_reg: IdiomMatcher<Instr, A0RegState, SwitchDescriptor>,
}

impl Default for SwitchIdioms {
    fn default() -> Self {
        Self::new()
    }
}

impl SwitchIdioms {
    pub fn new() -> Self {
        Self { at_reg: at_reg_idiom(), a0_reg: a0_reg_idiom() }
    }

    /// Looks for a dispatch whose jump is at or before `idx`.
    pub fn find(&self, instrs: &[Instr], idx: usize) -> Option<SwitchDescriptor> {
        let found = self
            .at_reg
            .matches(instrs, idx)
            .or_else(|| self.a0_reg.matches(instrs, idx))?;
        debug!(
            jump_table = found.jump_table,
            case_count = found.case_count,
            "switch dispatch"
        );
        Some(found)
    }

    /// Every dispatch in `instrs`, keyed by its jump instruction.
    pub fn scan(&self, instrs: &[Instr]) -> Vec<SwitchDescriptor> {
        instrs
            .iter()
            .enumerate()
            .filter(|(_, i)| i.is(&JR))
            .filter_map(|(idx, _)| self.find(instrs, idx))
            .collect()
    }
}
