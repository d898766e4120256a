use std::fmt;

use serde::Serialize;

use crate::error::{DisasmError, Result};

/// Id reserved for registers that exist architecturally but can't be encoded
/// in an instruction (program counter, multiply/divide result registers).
pub const INACCESSIBLE_ID: i32 = -1;

/// A named, fixed-width processor register.
///
/// Registers are declared as constants in an architecture table and compared
/// by value. Several inaccessible registers may share [`INACCESSIBLE_ID`], so
/// equality includes the name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct Register {
    pub name: &'static str,
    pub id: i32,
    pub bit_width: u32,
}

impl Register {
    pub const fn new(name: &'static str, id: i32, bit_width: u32) -> Self {
        Self { name, id, bit_width }
    }

    pub const fn is_accessible(&self) -> bool {
        self.id != INACCESSIBLE_ID
    }
}

impl fmt::Display for Register {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}

/// Looks up the register with `id` in `table`.
///
/// The inaccessible sentinel never resolves, even though such registers are
/// part of the table.
pub fn lookup(table: &[Register], id: i32) -> Result<Register> {
    if id == INACCESSIBLE_ID {
        let name = table
            .iter()
            .find(|r| !r.is_accessible())
            .map_or("<inaccessible>", |r| r.name);
        return Err(DisasmError::InaccessibleRegister { name });
    }
    table
        .iter()
        .copied()
        .find(|r| r.id == id)
        .ok_or(DisasmError::NoSuchRegister { id })
}
