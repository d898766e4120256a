use std::fmt;

use serde::Serialize;

use crate::error::{DisasmError, Result};
use crate::matcher::OperandMatcher;
use crate::opcode::{Opcode, OpcodeFlags, OperandRef, Processor};
use crate::operand::Operand;
use crate::register::Register;

/// One decoded instruction: an opcode occurrence at an address with concrete operands.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Instr {
    pub addr: u32,
    pub opcode: &'static Opcode,
    pub operands: Vec<Operand>,
}

impl Instr {
    pub fn new(addr: u32, opcode: &'static Opcode, operands: Vec<Operand>) -> Self {
        Self { addr, opcode, operands }
    }

    pub fn has_flag(&self, flag: OpcodeFlags) -> bool {
        self.opcode.has_flag(flag)
    }

    pub fn has_processor(&self, processor: Processor) -> bool {
        self.opcode.has_processor(processor)
    }

    /// Registers read by this instruction, in the opcode's declared order.
    pub fn used_registers(&self) -> Result<Vec<Register>> {
        self.resolve_refs(self.opcode.used)
    }

    /// Registers written by this instruction, in the opcode's declared order.
    pub fn modified_registers(&self) -> Result<Vec<Register>> {
        self.resolve_refs(self.opcode.modified)
    }

    fn resolve_refs(&self, refs: &[OperandRef]) -> Result<Vec<Register>> {
        refs.iter().map(|r| r.resolve(self)).collect()
    }

    /// Structural query: optional opcode identity, then each matcher against
    /// the operand at the same position.
    ///
    /// Matchers past the last operand see an absent operand. Operands past the
    /// last matcher are not checked.
    pub fn matches(&self, opcode: Option<&Opcode>, matchers: &[OperandMatcher]) -> bool {
        if let Some(opcode) = opcode {
            if self.opcode != opcode {
                return false;
            }
        }
        matchers
            .iter()
            .enumerate()
            .all(|(idx, m)| m.matches(self.operands.get(idx)))
    }

    pub fn matches_exact(&self, opcode: &Opcode, matchers: &[OperandMatcher]) -> bool {
        self.matches(Some(opcode), matchers)
    }

    pub fn is(&self, opcode: &Opcode) -> bool {
        self.opcode == opcode
    }

    pub fn operand(&self, slot: usize) -> Option<&Operand> {
        self.operands.get(slot)
    }

    pub fn reg_at(&self, slot: usize) -> Result<Register> {
        match self.operand(slot) {
            Some(Operand::Reg(r)) => Ok(r.reg),
            Some(_) => Err(DisasmError::OperandNotRegister { addr: self.addr, slot }),
            None => Err(self.out_of_range(slot)),
        }
    }

    pub fn imm_at(&self, slot: usize) -> Result<i32> {
        match self.operand(slot) {
            Some(Operand::Imm(i)) => Ok(i.value),
            Some(_) => Err(DisasmError::OperandNotImmediate { addr: self.addr, slot }),
            None => Err(self.out_of_range(slot)),
        }
    }

    fn out_of_range(&self, slot: usize) -> DisasmError {
        DisasmError::OperandOutOfRange { addr: self.addr, slot, len: self.operands.len() }
    }

    pub fn op0_reg(&self) -> Result<Register> {
        self.reg_at(0)
    }
    pub fn op1_reg(&self) -> Result<Register> {
        self.reg_at(1)
    }
    pub fn op2_reg(&self) -> Result<Register> {
        self.reg_at(2)
    }
    pub fn op3_reg(&self) -> Result<Register> {
        self.reg_at(3)
    }
    pub fn op0_imm(&self) -> Result<i32> {
        self.imm_at(0)
    }
    pub fn op1_imm(&self) -> Result<i32> {
        self.imm_at(1)
    }
    pub fn op2_imm(&self) -> Result<i32> {
        self.imm_at(2)
    }
    pub fn op3_imm(&self) -> Result<i32> {
        self.imm_at(3)
    }
}

impl fmt::Display for Instr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:#x}: {}", self.addr, self.opcode.mnemonic)?;
        for (idx, op) in self.operands.iter().enumerate() {
            let sep = if idx == 0 { " " } else { ", " };
            write!(f, "{sep}{op}")?;
        }
        Ok(())
    }
}
