use anyhow::Error;

/// Errors raised while decoding instructions or resolving their registers.
#[derive(thiserror::Error, Debug)]
pub enum DisasmError {
    #[error("Unknown instruction {raw:#010x} at offset {offset:#x}, address {addr:#010x}")]
    UnknownInstruction { addr: u32, offset: u32, raw: u32 },
    #[error("{what} must be a multiple of 4, got {value:#x}")]
    Misaligned { what: &'static str, value: u32 },
    #[error("Disassembly uses opcodes not supported by {processor}: {mnemonics}")]
    UnsupportedOpcodes { processor: &'static str, mnemonics: String },
    #[error("Register {name} is not directly accessible")]
    InaccessibleRegister { name: &'static str },
    #[error("No such register id: {id}")]
    NoSuchRegister { id: i32 },
    #[error("Operand {slot} of instruction at {addr:#010x} is not a register")]
    OperandNotRegister { addr: u32, slot: usize },
    #[error("Operand {slot} of instruction at {addr:#010x} is not an immediate")]
    OperandNotImmediate { addr: u32, slot: usize },
    #[error("Operand {slot} of instruction at {addr:#010x} is out of range ({len} operands)")]
    OperandOutOfRange { addr: u32, slot: usize, len: usize },
    #[error("Bus error at {addr:#010x}: {source}")]
    Bus {
        addr: u32,
        #[source]
        source: Error,
    },
}

pub type Result<T, E = DisasmError> = std::result::Result<T, E>;
