use std::fmt;

use crate::instr::Instr;
use crate::opcode::OpcodeFlags;

/// MIPS assembler-style rendering of an instruction.
///
/// Loads and stores print as `rt, offset(base)`; everything else as a plain
/// comma separated operand list.
pub struct Listing<'a>(pub &'a Instr);

impl fmt::Display for Listing<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let instr = self.0;
        let ops = &instr.operands;
        let memory = instr.has_flag(OpcodeFlags::MEMORY_READ) || instr.has_flag(OpcodeFlags::MEMORY_WRITE);
        if ops.len() == 3 && memory {
            return write!(f, "{:#x}: {} {}, {}({})", instr.addr, instr.opcode.mnemonic, ops[0], ops[2], ops[1]);
        }
        fmt::Display::fmt(instr, f)
    }
}

pub fn fmt_instr(instr: &Instr) -> String {
    Listing(instr).to_string()
}
