//! Base integer MIPS instruction forms.
//!
//! Operand layout follows the listing order: destination first, then sources.
//! Loads and stores are `rt, base, offset`; branches carry their absolute
//! target as the last operand.

use crate::opcode::{Opcode, OpcodeFlags, OperandRef, OP0, OP1, OP2};

use super::gpr::{HI, LO, PC, RA};
use super::processor::{COMMON, COMMON_II, COMMON_IV};

const PC_REF: OperandRef = OperandRef::Fixed(PC);
const RA_REF: OperandRef = OperandRef::Fixed(RA);
const LO_REF: OperandRef = OperandRef::Fixed(LO);
const HI_REF: OperandRef = OperandRef::Fixed(HI);

const READ: OpcodeFlags = OpcodeFlags::MEMORY_READ;
const WRITE: OpcodeFlags = OpcodeFlags::MEMORY_WRITE;
const TRAP: OpcodeFlags = OpcodeFlags::TRAP;
const BRANCH: OpcodeFlags = OpcodeFlags::BRANCH.union(OpcodeFlags::DELAY_SLOT);
const BRANCH_LIKELY: OpcodeFlags = BRANCH.union(OpcodeFlags::BRANCH_LIKELY);
const JUMP: OpcodeFlags = OpcodeFlags::JUMP.union(OpcodeFlags::DELAY_SLOT);

const fn alu3(mnemonic: &'static str) -> Opcode {
    Opcode::new(mnemonic, COMMON).modifies(&[OP0]).uses(&[OP1, OP2])
}

const fn alu2(mnemonic: &'static str) -> Opcode {
    Opcode::new(mnemonic, COMMON).modifies(&[OP0]).uses(&[OP1])
}

const fn load(mnemonic: &'static str) -> Opcode {
    Opcode::new(mnemonic, COMMON).flags(READ).modifies(&[OP0]).uses(&[OP1])
}

const fn store(mnemonic: &'static str) -> Opcode {
    Opcode::new(mnemonic, COMMON).flags(WRITE).uses(&[OP0, OP1])
}

const fn branch2(mnemonic: &'static str) -> Opcode {
    Opcode::new(mnemonic, COMMON).flags(BRANCH).modifies(&[PC_REF]).uses(&[OP0, OP1])
}

const fn branch1(mnemonic: &'static str) -> Opcode {
    Opcode::new(mnemonic, COMMON).flags(BRANCH).modifies(&[PC_REF]).uses(&[OP0])
}

const fn trap2(mnemonic: &'static str) -> Opcode {
    Opcode::new(mnemonic, COMMON_II).flags(TRAP).uses(&[OP0, OP1])
}

const fn trap1(mnemonic: &'static str) -> Opcode {
    Opcode::new(mnemonic, COMMON_II).flags(TRAP).uses(&[OP0])
}

const fn mul_div(mnemonic: &'static str) -> Opcode {
    Opcode::new(mnemonic, COMMON).modifies(&[LO_REF, HI_REF]).uses(&[OP0, OP1])
}

pub static NOP: Opcode = Opcode::new("nop", COMMON);

pub static ADD: Opcode = alu3("add");
pub static ADDU: Opcode = alu3("addu");
pub static SUB: Opcode = alu3("sub");
pub static SUBU: Opcode = alu3("subu");
pub static AND: Opcode = alu3("and");
pub static OR: Opcode = alu3("or");
pub static XOR: Opcode = alu3("xor");
pub static NOR: Opcode = alu3("nor");
pub static SLT: Opcode = alu3("slt");
pub static SLTU: Opcode = alu3("sltu");
pub static SLLV: Opcode = alu3("sllv");
pub static SRLV: Opcode = alu3("srlv");
pub static SRAV: Opcode = alu3("srav");
pub static MOVN: Opcode = Opcode::new("movn", COMMON_IV).modifies(&[OP0]).uses(&[OP1, OP2]);
pub static MOVZ: Opcode = Opcode::new("movz", COMMON_IV).modifies(&[OP0]).uses(&[OP1, OP2]);

pub static SLL: Opcode = alu2("sll");
pub static SRL: Opcode = alu2("srl");
pub static SRA: Opcode = alu2("sra");
pub static ADDI: Opcode = alu2("addi");
pub static ADDIU: Opcode = alu2("addiu");
pub static ANDI: Opcode = alu2("andi");
pub static ORI: Opcode = alu2("ori");
pub static XORI: Opcode = alu2("xori");
pub static SLTI: Opcode = alu2("slti");
pub static SLTIU: Opcode = alu2("sltiu");
pub static LUI: Opcode = Opcode::new("lui", COMMON).modifies(&[OP0]);

pub static MULT: Opcode = mul_div("mult");
pub static MULTU: Opcode = mul_div("multu");
pub static DIV: Opcode = mul_div("div");
pub static DIVU: Opcode = mul_div("divu");
pub static MFHI: Opcode = Opcode::new("mfhi", COMMON).modifies(&[OP0]).uses(&[HI_REF]);
pub static MFLO: Opcode = Opcode::new("mflo", COMMON).modifies(&[OP0]).uses(&[LO_REF]);
pub static MTHI: Opcode = Opcode::new("mthi", COMMON).modifies(&[HI_REF]).uses(&[OP0]);
pub static MTLO: Opcode = Opcode::new("mtlo", COMMON).modifies(&[LO_REF]).uses(&[OP0]);

pub static LB: Opcode = load("lb");
pub static LBU: Opcode = load("lbu");
pub static LH: Opcode = load("lh");
pub static LHU: Opcode = load("lhu");
pub static LW: Opcode = load("lw");
pub static LWL: Opcode = load("lwl");
pub static LWR: Opcode = load("lwr");
pub static LL: Opcode = Opcode::new("ll", COMMON_II).flags(READ).modifies(&[OP0]).uses(&[OP1]);
pub static SB: Opcode = store("sb");
pub static SH: Opcode = store("sh");
pub static SW: Opcode = store("sw");
pub static SWL: Opcode = store("swl");
pub static SWR: Opcode = store("swr");
pub static SC: Opcode = Opcode::new("sc", COMMON_II).flags(WRITE).uses(&[OP0, OP1]);

pub static BEQ: Opcode = branch2("beq");
pub static BNE: Opcode = branch2("bne");
pub static BGTZ: Opcode = branch1("bgtz");
pub static BLEZ: Opcode = branch1("blez");
pub static BGEZ: Opcode = branch1("bgez");
pub static BLTZ: Opcode = branch1("bltz");
pub static BGEZAL: Opcode = Opcode::new("bgezal", COMMON)
    .flags(BRANCH)
    .modifies(&[PC_REF, RA_REF])
    .uses(&[OP0]);
pub static BLTZAL: Opcode = Opcode::new("bltzal", COMMON)
    .flags(BRANCH)
    .modifies(&[PC_REF, RA_REF])
    .uses(&[OP0]);

pub static BEQL: Opcode = Opcode::new("beql", COMMON_II)
    .flags(BRANCH_LIKELY)
    .modifies(&[PC_REF])
    .uses(&[OP0, OP1]);
pub static BNEL: Opcode = Opcode::new("bnel", COMMON_II)
    .flags(BRANCH_LIKELY)
    .modifies(&[PC_REF])
    .uses(&[OP0, OP1]);
pub static BGTZL: Opcode = Opcode::new("bgtzl", COMMON_II).flags(BRANCH_LIKELY).modifies(&[PC_REF]).uses(&[OP0]);
pub static BLEZL: Opcode = Opcode::new("blezl", COMMON_II).flags(BRANCH_LIKELY).modifies(&[PC_REF]).uses(&[OP0]);
pub static BGEZL: Opcode = Opcode::new("bgezl", COMMON_II).flags(BRANCH_LIKELY).modifies(&[PC_REF]).uses(&[OP0]);
pub static BLTZL: Opcode = Opcode::new("bltzl", COMMON_II).flags(BRANCH_LIKELY).modifies(&[PC_REF]).uses(&[OP0]);
pub static BGEZALL: Opcode = Opcode::new("bgezall", COMMON_II)
    .flags(BRANCH_LIKELY)
    .modifies(&[PC_REF, RA_REF])
    .uses(&[OP0]);
pub static BLTZALL: Opcode = Opcode::new("bltzall", COMMON_II)
    .flags(BRANCH_LIKELY)
    .modifies(&[PC_REF, RA_REF])
    .uses(&[OP0]);

pub static J: Opcode = Opcode::new("j", COMMON).flags(JUMP).modifies(&[PC_REF]);
pub static JAL: Opcode = Opcode::new("jal", COMMON).flags(JUMP).modifies(&[PC_REF, RA_REF]);
pub static JR: Opcode = Opcode::new("jr", COMMON).flags(JUMP).modifies(&[PC_REF]).uses(&[OP0]);
pub static JALR: Opcode = Opcode::new("jalr", COMMON)
    .flags(JUMP)
    .modifies(&[PC_REF, OP0])
    .uses(&[OP1]);

pub static SYSCALL: Opcode = Opcode::new("syscall", COMMON).flags(TRAP);
pub static BREAK: Opcode = Opcode::new("break", COMMON).flags(TRAP);
pub static SYNC: Opcode = Opcode::new("sync", COMMON);

pub static TEQ: Opcode = trap2("teq");
pub static TNE: Opcode = trap2("tne");
pub static TGE: Opcode = trap2("tge");
pub static TGEU: Opcode = trap2("tgeu");
pub static TLT: Opcode = trap2("tlt");
pub static TLTU: Opcode = trap2("tltu");
pub static TEQI: Opcode = trap1("teqi");
pub static TNEI: Opcode = trap1("tnei");
pub static TGEI: Opcode = trap1("tgei");
pub static TGEIU: Opcode = trap1("tgeiu");
pub static TLTI: Opcode = trap1("tlti");
pub static TLTIU: Opcode = trap1("tltiu");
