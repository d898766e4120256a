//! Predicates over a possibly absent operand, used positionally by
//! [`Instr::matches`](crate::instr::Instr::matches).

use crate::operand::Operand;
use crate::register::Register;

#[derive(Debug, Clone, PartialEq)]
pub enum OperandMatcher {
    /// Operand must be absent.
    Null,
    /// Anything, absent included.
    Any,
    AnyReg,
    Reg(Register),
    RegIn(Vec<Register>),
    AnyImm,
    Imm(i32),
    ImmIn(Vec<i32>),
}

impl OperandMatcher {
    pub fn matches(&self, op: Option<&Operand>) -> bool {
        match (self, op) {
            (OperandMatcher::Null, op) => op.is_none(),
            (OperandMatcher::Any, _) => true,
            (_, None) => false,
            (OperandMatcher::AnyReg, Some(op)) => matches!(op, Operand::Reg(_)),
            (OperandMatcher::Reg(reg), Some(op)) => op.as_reg() == Some(*reg),
            (OperandMatcher::RegIn(regs), Some(op)) => op.as_reg().is_some_and(|r| regs.contains(&r)),
            (OperandMatcher::AnyImm, Some(op)) => matches!(op, Operand::Imm(_)),
            (OperandMatcher::Imm(value), Some(op)) => op.as_imm() == Some(*value),
            (OperandMatcher::ImmIn(values), Some(op)) => op.as_imm().is_some_and(|v| values.contains(&v)),
        }
    }
}

pub fn is_null() -> OperandMatcher {
    OperandMatcher::Null
}

pub fn any_op() -> OperandMatcher {
    OperandMatcher::Any
}

pub fn any_reg() -> OperandMatcher {
    OperandMatcher::AnyReg
}

pub fn is_reg(reg: Register) -> OperandMatcher {
    OperandMatcher::Reg(reg)
}

pub fn is_reg_in(regs: &[Register]) -> OperandMatcher {
    OperandMatcher::RegIn(regs.to_vec())
}

pub fn any_imm() -> OperandMatcher {
    OperandMatcher::AnyImm
}

pub fn is_imm(value: i32) -> OperandMatcher {
    OperandMatcher::Imm(value)
}

pub fn is_imm_in(values: &[i32]) -> OperandMatcher {
    OperandMatcher::ImmIn(values.to_vec())
}
