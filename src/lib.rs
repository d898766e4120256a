pub mod cache;
pub mod decoder;
pub mod error;
pub mod idiom;
pub mod instr;
pub mod matcher;
pub mod memory;
pub mod opcode;
pub mod operand;
pub mod register;

pub mod isa {
    pub mod mips;
}

pub use cache::CachingDisassembler;
pub use decoder::{Disassembler, Disassembly, FunctionDef};
pub use error::{DisasmError, Result};
pub use idiom::IdiomMatcher;
pub use instr::Instr;
pub use matcher::OperandMatcher;
pub use memory::{ByteSource, Charset, MemoryImage};
pub use opcode::{Opcode, OpcodeFlags, OperandRef, Processor};
pub use operand::Operand;
pub use register::Register;
