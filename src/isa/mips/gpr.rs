//! MIPS general purpose register file.

use crate::error::Result;
use crate::register::{self, Register, INACCESSIBLE_ID};

const fn gpr(name: &'static str, id: i32) -> Register {
    Register::new(name, id, 32)
}

pub const ZERO: Register = gpr("zero", 0);
pub const AT: Register = gpr("at", 1);
pub const V0: Register = gpr("v0", 2);
pub const V1: Register = gpr("v1", 3);
pub const A0: Register = gpr("a0", 4);
pub const A1: Register = gpr("a1", 5);
pub const A2: Register = gpr("a2", 6);
pub const A3: Register = gpr("a3", 7);
pub const T0: Register = gpr("t0", 8);
pub const T1: Register = gpr("t1", 9);
pub const T2: Register = gpr("t2", 10);
pub const T3: Register = gpr("t3", 11);
pub const T4: Register = gpr("t4", 12);
pub const T5: Register = gpr("t5", 13);
pub const T6: Register = gpr("t6", 14);
pub const T7: Register = gpr("t7", 15);
pub const S0: Register = gpr("s0", 16);
pub const S1: Register = gpr("s1", 17);
pub const S2: Register = gpr("s2", 18);
pub const S3: Register = gpr("s3", 19);
pub const S4: Register = gpr("s4", 20);
pub const S5: Register = gpr("s5", 21);
pub const S6: Register = gpr("s6", 22);
pub const S7: Register = gpr("s7", 23);
pub const T8: Register = gpr("t8", 24);
pub const T9: Register = gpr("t9", 25);
pub const K0: Register = gpr("k0", 26);
pub const K1: Register = gpr("k1", 27);
pub const GP: Register = gpr("gp", 28);
pub const SP: Register = gpr("sp", 29);
pub const FP: Register = gpr("fp", 30);
pub const RA: Register = gpr("ra", 31);

// special purpose, not encodable
pub const PC: Register = gpr("pc", INACCESSIBLE_ID);
pub const LO: Register = gpr("lo", INACCESSIBLE_ID);
pub const HI: Register = gpr("hi", INACCESSIBLE_ID);

const GPRS: &[Register] = &[
    ZERO, AT, V0, V1, A0, A1, A2, A3, T0, T1, T2, T3, T4, T5, T6, T7, T8, T9, S0, S1, S2, S3, S4,
    S5, S6, S7, K0, K1, GP, SP, FP, RA, PC, LO, HI,
];

pub fn values() -> &'static [Register] {
    GPRS
}

pub fn for_id(id: i32) -> Result<Register> {
    register::lookup(GPRS, id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::DisasmError;

    #[test]
    fn encodable_ids_resolve() {
        assert_eq!(for_id(0).unwrap(), ZERO);
        assert_eq!(for_id(24).unwrap(), T8);
        assert_eq!(for_id(31).unwrap(), RA);
        assert_eq!(values().iter().filter(|r| r.is_accessible()).count(), 32);
    }

    #[test]
    fn special_registers_are_not_encodable() {
        assert!(matches!(for_id(INACCESSIBLE_ID), Err(DisasmError::InaccessibleRegister { name: "pc" })));
        assert!(matches!(for_id(32), Err(DisasmError::NoSuchRegister { id: 32 })));
    }
}
