use bitflags::bitflags;
use serde::{Deserialize, Serialize};

use crate::error::{DisasmError, Result};
use crate::instr::Instr;
use crate::operand::Operand;
use crate::register::Register;

/// Processor variant an opcode may be implemented by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct Processor {
    pub name: &'static str,
}

impl Processor {
    pub const fn new(name: &'static str) -> Self {
        Self { name }
    }
}

bitflags! {
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct OpcodeFlags: u16 {
const MEMORY_READ = 1 << 0;
const MEMORY_WRITE = 1 << 1;
const DELAY_SLOT = 1 << 2;
const JUMP = 1 << 3;
const BRANCH = 1 << 4;
const BRANCH_LIKELY = 1 << 5; // delay slot only executes when taken
const FPU = 1 << 6;
const TRAP = 1 << 7;
}
}

/// Where an opcode finds a register it reads or writes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum OperandRef {
    /// Register held by the operand at this slot.
    Slot(usize),
    /// Register touched implicitly, not present in the operand list.
    Fixed(Register),
}

pub const OP0: OperandRef = OperandRef::Slot(0);
pub const OP1: OperandRef = OperandRef::Slot(1);
pub const OP2: OperandRef = OperandRef::Slot(2);
pub const OP3: OperandRef = OperandRef::Slot(3);

impl OperandRef {
    pub fn resolve(&self, instr: &Instr) -> Result<Register> {
        match *self {
            OperandRef::Fixed(reg) => Ok(reg),
            OperandRef::Slot(slot) => match instr.operands.get(slot) {
                Some(Operand::Reg(r)) => Ok(r.reg),
                Some(_) => Err(DisasmError::OperandNotRegister { addr: instr.addr, slot }),
                None => Err(DisasmError::OperandOutOfRange {
                    addr: instr.addr,
                    slot,
                    len: instr.operands.len(),
                }),
            },
        }
    }
}

/// Static descriptor of one instruction form.
///
/// Declared once per form as a `static`/`const` and shared by every
/// instruction of that form. `used` and `modified` keep their declared order
/// when resolved.
#[derive(Debug, PartialEq, Serialize)]
pub struct Opcode {
    pub mnemonic: &'static str,
    pub description: &'static str,
    pub processors: &'static [Processor],
    pub flags: OpcodeFlags,
    pub used: &'static [OperandRef],
    pub modified: &'static [OperandRef],
}

impl Opcode {
    pub const fn new(mnemonic: &'static str, processors: &'static [Processor]) -> Self {
        Self {
            mnemonic,
            description: "",
            processors,
            flags: OpcodeFlags::empty(),
            used: &[],
            modified: &[],
        }
    }

    pub const fn describe(self, description: &'static str) -> Self {
        Self { description, ..self }
    }

    pub const fn flags(self, flags: OpcodeFlags) -> Self {
        Self { flags, ..self }
    }

    pub const fn uses(self, used: &'static [OperandRef]) -> Self {
        Self { used, ..self }
    }

    pub const fn modifies(self, modified: &'static [OperandRef]) -> Self {
        Self { modified, ..self }
    }

    pub fn has_flag(&self, flag: OpcodeFlags) -> bool {
        self.flags.contains(flag)
    }

    pub fn has_processor(&self, processor: Processor) -> bool {
        self.processors.contains(&processor)
    }
}
