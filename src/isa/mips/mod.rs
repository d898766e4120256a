//! MIPS backend: legacy MIPS I-IV, MIPS32 and the PSP's Allegrex core.

pub mod disasm;
pub mod fmt;
pub mod gpr;
pub mod opcodes;
pub mod processor;
pub mod pseudo;
pub mod switch;

pub use disasm::{MipsConfig, MipsDisassembler};
pub use fmt::{fmt_instr, Listing};
pub use processor::MipsProcessor;
pub use pseudo::{fold_pseudo, PseudoFolder};
pub use switch::{SwitchDescriptor, SwitchIdioms};
