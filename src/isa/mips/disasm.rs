use serde::{Deserialize, Serialize};
use tracing::{debug, debug_span, trace};

use crate::decoder::{Disassembler, Disassembly, FunctionDef};
use crate::error::{DisasmError, Result};
use crate::instr::Instr;
use crate::memory::ByteSource;
use crate::opcode::Opcode;
use crate::operand::{ImmOperand, Operand};

use super::gpr;
use super::opcodes::*;
use super::processor::MipsProcessor;

pub const SPECIAL: u32 = 0b000_000;
pub const REGIMM: u32 = 0b000_001;

const INSTR_SIZE: u32 = 4;
const PREALLOC_LIMIT: u32 = 4096;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MipsConfig {
    pub processor: MipsProcessor,
    /// Reject encodings whose unused fields aren't zero.
    pub strict: bool,
}

impl Default for MipsConfig {
    fn default() -> Self {
        Self { processor: MipsProcessor::Allegrex, strict: true }
    }
}

/// Fields that must be zero for an encoding to pass strict validation.
#[derive(Debug, Clone, Copy)]
enum StrictCheck {
    ZeroRs,
    ZeroRt,
    ZeroRd,
    ZeroShift,
}

#[derive(Debug, Clone, Copy)]
struct Fields(u32);

impl Fields {
    fn opcode(self) -> u32 {
        self.0 >> 26
    }
    fn rs(self) -> u32 {
        (self.0 >> 21) & 0x1F
    }
    fn rt(self) -> u32 {
        (self.0 >> 16) & 0x1F
    }
    fn rd(self) -> u32 {
        (self.0 >> 11) & 0x1F
    }
    fn shift(self) -> u32 {
        (self.0 >> 6) & 0x1F
    }
    fn funct(self) -> u32 {
        self.0 & 0x3F
    }
    fn uimm(self) -> u32 {
        self.0 & 0xFFFF
    }
    fn simm(self) -> i32 {
        self.0 as u16 as i16 as i32
    }

    fn is_zero(self, check: StrictCheck) -> bool {
        match check {
            StrictCheck::ZeroRs => self.rs() == 0,
            StrictCheck::ZeroRt => self.rt() == 0,
            StrictCheck::ZeroRd => self.rd() == 0,
            StrictCheck::ZeroShift => self.shift() == 0,
        }
    }
}

fn gpr_op(id: u32) -> Result<Operand> {
    Ok(Operand::reg(gpr::for_id(id as i32)?))
}

/// Decoder for the base integer MIPS ISA shared by the legacy, MIPS32 and
/// Allegrex variants.
#[derive(Debug, Clone, Default)]
pub struct MipsDisassembler {
    cfg: MipsConfig,
}

impl MipsDisassembler {
    pub fn new(cfg: MipsConfig) -> Self {
        Self { cfg }
    }

    pub fn config(&self) -> &MipsConfig {
        &self.cfg
    }

    fn strict(&self, f: Fields, checks: &[StrictCheck]) -> bool {
        !self.cfg.strict || checks.iter().all(|c| f.is_zero(*c))
    }

    fn decode(&self, addr: u32, raw: u32, offset: u32) -> Result<Instr> {
        let f = Fields(raw);
        let decoded = if raw == 0 {
            Some(Instr::new(addr, &NOP, vec![]))
        } else {
            match f.opcode() {
                SPECIAL => self.special(addr, f)?,
                REGIMM => self.regimm(addr, f)?,
                op => self.primary(addr, f, op)?,
            }
        };
        decoded.ok_or(DisasmError::UnknownInstruction { addr, offset, raw })
    }

    fn special(&self, addr: u32, f: Fields) -> Result<Option<Instr>> {
        use StrictCheck::*;
        let rs = gpr_op(f.rs())?;
        let rt = gpr_op(f.rt())?;
        let rd = gpr_op(f.rd())?;
        let sa = Operand::imm(f.shift() as i32);
        let rrr = |op: &'static Opcode, ops: Vec<Operand>| Some(Instr::new(addr, op, ops));
        let instr = match f.funct() {
            0b100_000 if self.strict(f, &[ZeroShift]) => rrr(&ADD, vec![rd, rs, rt]),
            0b100_001 if self.strict(f, &[ZeroShift]) => rrr(&ADDU, vec![rd, rs, rt]),
            0b100_010 if self.strict(f, &[ZeroShift]) => rrr(&SUB, vec![rd, rs, rt]),
            0b100_011 if self.strict(f, &[ZeroShift]) => rrr(&SUBU, vec![rd, rs, rt]),
            0b100_100 if self.strict(f, &[ZeroShift]) => rrr(&AND, vec![rd, rs, rt]),
            0b100_101 if self.strict(f, &[ZeroShift]) => rrr(&OR, vec![rd, rs, rt]),
            0b100_110 if self.strict(f, &[ZeroShift]) => rrr(&XOR, vec![rd, rs, rt]),
            0b100_111 if self.strict(f, &[ZeroShift]) => rrr(&NOR, vec![rd, rs, rt]),
            0b101_010 if self.strict(f, &[ZeroShift]) => rrr(&SLT, vec![rd, rs, rt]),
            0b101_011 if self.strict(f, &[ZeroShift]) => rrr(&SLTU, vec![rd, rs, rt]),
            0b001_010 if self.strict(f, &[ZeroShift]) => rrr(&MOVZ, vec![rd, rs, rt]),
            0b001_011 if self.strict(f, &[ZeroShift]) => rrr(&MOVN, vec![rd, rs, rt]),
            0b000_000 if self.strict(f, &[ZeroRs]) => rrr(&SLL, vec![rd, rt, sa]),
            0b000_010 if self.strict(f, &[ZeroRs]) => rrr(&SRL, vec![rd, rt, sa]),
            0b000_011 if self.strict(f, &[ZeroRs]) => rrr(&SRA, vec![rd, rt, sa]),
            0b000_100 if self.strict(f, &[ZeroShift]) => rrr(&SLLV, vec![rd, rt, rs]),
            0b000_110 if self.strict(f, &[ZeroShift]) => rrr(&SRLV, vec![rd, rt, rs]),
            0b000_111 if self.strict(f, &[ZeroShift]) => rrr(&SRAV, vec![rd, rt, rs]),
            0b011_000 if self.strict(f, &[ZeroRd, ZeroShift]) => rrr(&MULT, vec![rs, rt]),
            0b011_001 if self.strict(f, &[ZeroRd, ZeroShift]) => rrr(&MULTU, vec![rs, rt]),
            0b011_010 if self.strict(f, &[ZeroRd, ZeroShift]) => rrr(&DIV, vec![rs, rt]),
            0b011_011 if self.strict(f, &[ZeroRd, ZeroShift]) => rrr(&DIVU, vec![rs, rt]),
            0b010_000 if self.strict(f, &[ZeroRs, ZeroRt, ZeroShift]) => rrr(&MFHI, vec![rd]),
            0b010_010 if self.strict(f, &[ZeroRs, ZeroRt, ZeroShift]) => rrr(&MFLO, vec![rd]),
            0b010_001 if self.strict(f, &[ZeroRt, ZeroRd, ZeroShift]) => rrr(&MTHI, vec![rs]),
            0b010_011 if self.strict(f, &[ZeroRt, ZeroRd, ZeroShift]) => rrr(&MTLO, vec![rs]),
            0b001_000 if self.strict(f, &[ZeroRt, ZeroRd]) => rrr(&JR, vec![rs]),
            0b001_001 if self.strict(f, &[ZeroRt]) => rrr(&JALR, vec![rd, rs]),
            0b001_100 => rrr(&SYSCALL, vec![]),
            0b001_101 => rrr(&BREAK, vec![Operand::uimm(((f.0 >> 6) & 0xF_FFFF) as i32)]),
            0b001_111 if self.strict(f, &[ZeroRs, ZeroRt, ZeroRd]) => rrr(&SYNC, vec![sa]),
            0b110_100 => rrr(&TEQ, vec![rs, rt]),
            0b110_110 => rrr(&TNE, vec![rs, rt]),
            0b110_000 => rrr(&TGE, vec![rs, rt]),
            0b110_001 => rrr(&TGEU, vec![rs, rt]),
            0b110_010 => rrr(&TLT, vec![rs, rt]),
            0b110_011 => rrr(&TLTU, vec![rs, rt]),
            _ => None,
        };
        Ok(instr)
    }

    fn regimm(&self, addr: u32, f: Fields) -> Result<Option<Instr>> {
        let rs = gpr_op(f.rs())?;
        let imm = Operand::imm(f.simm());
        let target = branch_target(addr, f);
        let opcode: &'static Opcode = match f.rt() {
            0b00000 => &BLTZ,
            0b00001 => &BGEZ,
            0b00010 => &BLTZL,
            0b00011 => &BGEZL,
            0b10000 => &BLTZAL,
            0b10001 => &BGEZAL,
            0b10010 => &BLTZALL,
            0b10011 => &BGEZALL,
            0b01000 => return Ok(Some(Instr::new(addr, &TGEI, vec![rs, imm]))),
            0b01001 => return Ok(Some(Instr::new(addr, &TGEIU, vec![rs, imm]))),
            0b01010 => return Ok(Some(Instr::new(addr, &TLTI, vec![rs, imm]))),
            0b01011 => return Ok(Some(Instr::new(addr, &TLTIU, vec![rs, imm]))),
            0b01100 => return Ok(Some(Instr::new(addr, &TEQI, vec![rs, imm]))),
            0b01110 => return Ok(Some(Instr::new(addr, &TNEI, vec![rs, imm]))),
            _ => return Ok(None),
        };
        Ok(Some(Instr::new(addr, opcode, vec![rs, target])))
    }

    fn primary(&self, addr: u32, f: Fields, op: u32) -> Result<Option<Instr>> {
        use StrictCheck::*;
        let rs = gpr_op(f.rs())?;
        let rt = gpr_op(f.rt())?;
        let imm = Operand::imm(f.simm());
        let uimm = Operand::uimm(f.uimm() as i32);
        let target = branch_target(addr, f);
        let jump_target = Operand::uimm(((addr & 0xF000_0000) | ((f.0 & 0x03FF_FFFF) << 2)) as i32);
        let mk = |op: &'static Opcode, ops: Vec<Operand>| Some(Instr::new(addr, op, ops));
        let instr = match op {
            0b000_010 => mk(&J, vec![jump_target]),
            0b000_011 => mk(&JAL, vec![jump_target]),
            0b000_100 => mk(&BEQ, vec![rs, rt, target]),
            0b000_101 => mk(&BNE, vec![rs, rt, target]),
            0b000_110 if self.strict(f, &[ZeroRt]) => mk(&BLEZ, vec![rs, target]),
            0b000_111 if self.strict(f, &[ZeroRt]) => mk(&BGTZ, vec![rs, target]),
            0b010_100 => mk(&BEQL, vec![rs, rt, target]),
            0b010_101 => mk(&BNEL, vec![rs, rt, target]),
            0b010_110 if self.strict(f, &[ZeroRt]) => mk(&BLEZL, vec![rs, target]),
            0b010_111 if self.strict(f, &[ZeroRt]) => mk(&BGTZL, vec![rs, target]),
            0b001_000 => mk(&ADDI, vec![rt, rs, imm]),
            0b001_001 => mk(&ADDIU, vec![rt, rs, imm]),
            0b001_010 => mk(&SLTI, vec![rt, rs, imm]),
            0b001_011 => {
                let hinted = Operand::Imm(ImmOperand::new(f.simm()).to_hinted_unsigned());
                mk(&SLTIU, vec![rt, rs, hinted])
            }
            0b001_100 => mk(&ANDI, vec![rt, rs, uimm]),
            0b001_101 => mk(&ORI, vec![rt, rs, uimm]),
            0b001_110 => mk(&XORI, vec![rt, rs, uimm]),
            0b001_111 if self.strict(f, &[ZeroRs]) => mk(&LUI, vec![rt, uimm]),
            0b100_000 => mk(&LB, vec![rt, rs, imm]),
            0b100_001 => mk(&LH, vec![rt, rs, imm]),
            0b100_010 => mk(&LWL, vec![rt, rs, imm]),
            0b100_011 => mk(&LW, vec![rt, rs, imm]),
            0b100_100 => mk(&LBU, vec![rt, rs, imm]),
            0b100_101 => mk(&LHU, vec![rt, rs, imm]),
            0b100_110 => mk(&LWR, vec![rt, rs, imm]),
            0b101_000 => mk(&SB, vec![rt, rs, imm]),
            0b101_001 => mk(&SH, vec![rt, rs, imm]),
            0b101_010 => mk(&SWL, vec![rt, rs, imm]),
            0b101_011 => mk(&SW, vec![rt, rs, imm]),
            0b101_110 => mk(&SWR, vec![rt, rs, imm]),
            0b110_000 => mk(&LL, vec![rt, rs, imm]),
            0b111_000 => mk(&SC, vec![rt, rs, imm]),
            _ => None,
        };
        Ok(instr)
    }
}

fn branch_target(addr: u32, f: Fields) -> Operand {
    let target = addr.wrapping_add(INSTR_SIZE).wrapping_add((f.simm() << 2) as u32);
    Operand::uimm(target as i32)
}

impl Disassembler for MipsDisassembler {
    fn disassemble<S: ByteSource + ?Sized>(&self, src: &S, func: &FunctionDef) -> Result<Disassembly> {
        let _span = debug_span!("disassemble", func = %func.name).entered();
        if func.start % INSTR_SIZE != 0 {
            return Err(DisasmError::Misaligned { what: "function start", value: func.start });
        }
        if func.size % INSTR_SIZE != 0 {
            return Err(DisasmError::Misaligned { what: "function size", value: func.size });
        }

        let count = func.size / INSTR_SIZE;
        // size is caller supplied and not yet checked against the source
        let mut instrs = Vec::with_capacity(count.min(PREALLOC_LIMIT) as usize);
        for idx in 0..count {
            let offset = idx * INSTR_SIZE;
            let addr = func.start.wrapping_add(offset);
            let raw = read_word(src, addr)?;
            let instr = self.decode(addr, raw, offset)?;
            trace!("{instr}");
            instrs.push(instr);
        }

        let processor = self.cfg.processor.processor();
        let illegal: Vec<&str> = instrs
            .iter()
            .filter(|i| !i.has_processor(processor))
            .map(|i| i.opcode.mnemonic)
            .collect();
        if !illegal.is_empty() {
            return Err(DisasmError::UnsupportedOpcodes {
                processor: processor.name,
                mnemonics: illegal.join(", "),
            });
        }

        debug!(count = instrs.len(), "decoded function");
        Ok(Disassembly { def: func.clone(), instrs })
    }

    fn disassemble_instruction<S: ByteSource + ?Sized>(&self, src: &S, addr: u32) -> Result<Instr> {
        let raw = read_word(src, addr)?;
        self.decode(addr, raw, 0)
    }
}

fn read_word<S: ByteSource + ?Sized>(src: &S, addr: u32) -> Result<u32> {
    src.read_u32(addr).map_err(|source| DisasmError::Bus { addr, source })
}
