use std::fmt;

use serde::Serialize;

use crate::register::Register;

/// Value carried by a decoded instruction.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub enum Operand {
    Reg(RegOperand),
    Imm(ImmOperand),
    Float(FloatOperand),
}

/// Register reference, optionally naming a sub-range of the register bits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RegOperand {
    pub reg: Register,
    pub name: &'static str,
    pub bit_offset: u32,
    pub bit_width: u32,
}

/// 32-bit immediate. `hint_unsigned` only changes how the value is displayed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ImmOperand {
    pub value: i32,
    pub hint_unsigned: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FloatOperand {
    pub value: f32,
}

impl RegOperand {
    /// Whole-register operand displayed under the register's own name.
    pub const fn new(reg: Register) -> Self {
        Self { reg, name: reg.name, bit_offset: 0, bit_width: reg.bit_width }
    }

    pub const fn partial(reg: Register, name: &'static str, bit_offset: u32, bit_width: u32) -> Self {
        Self { reg, name, bit_offset, bit_width }
    }
}

impl ImmOperand {
    pub const fn new(value: i32) -> Self {
        Self { value, hint_unsigned: false }
    }

    pub const fn unsigned(value: i32) -> Self {
        Self { value, hint_unsigned: true }
    }

    pub const fn to_hinted_unsigned(self) -> Self {
        Self::unsigned(self.value)
    }
}

impl Operand {
    pub const fn reg(reg: Register) -> Self {
        Operand::Reg(RegOperand::new(reg))
    }

    pub const fn imm(value: i32) -> Self {
        Operand::Imm(ImmOperand::new(value))
    }

    pub const fn uimm(value: i32) -> Self {
        Operand::Imm(ImmOperand::unsigned(value))
    }

    pub const fn float(value: f32) -> Self {
        Operand::Float(FloatOperand { value })
    }

    pub fn as_reg(&self) -> Option<Register> {
        match self {
            Operand::Reg(r) => Some(r.reg),
            _ => None,
        }
    }

    pub fn as_imm(&self) -> Option<i32> {
        match self {
            Operand::Imm(i) => Some(i.value),
            _ => None,
        }
    }
}

impl From<Register> for Operand {
    fn from(reg: Register) -> Self {
        Operand::reg(reg)
    }
}

impl fmt::Display for RegOperand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}

impl fmt::Display for ImmOperand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.hint_unsigned {
            write!(f, "{:#x}", self.value as u32)
        } else if self.value < 0 {
            write!(f, "-{:#x}", self.value.unsigned_abs())
        } else {
            write!(f, "{:#x}", self.value)
        }
    }
}

impl fmt::Display for FloatOperand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self.value)
    }
}

impl fmt::Display for Operand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Operand::Reg(r) => fmt::Display::fmt(r, f),
            Operand::Imm(i) => fmt::Display::fmt(i, f),
            Operand::Float(v) => fmt::Display::fmt(v, f),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const S0: Register = Register::new("s0", 16, 32);

    #[test]
    fn reg_displays_name() {
        assert_eq!(Operand::reg(S0).to_string(), "s0");
        let lo_half = RegOperand::partial(S0, "s0.l", 0, 16);
        assert_eq!(lo_half.to_string(), "s0.l");
        assert_eq!(lo_half.bit_width, 16);
    }

    #[test]
    fn imm_displays_signed_hex() {
        assert_eq!(Operand::imm(0x42).to_string(), "0x42");
        assert_eq!(Operand::imm(-0x42).to_string(), "-0x42");
        assert_eq!(Operand::imm(i32::MIN).to_string(), "-0x80000000");
    }

    #[test]
    fn imm_displays_unsigned_when_hinted() {
        assert_eq!(Operand::uimm(0x42).to_string(), "0x42");
        assert_eq!(Operand::uimm(-0x42).to_string(), "0xffffffbe");
        let hinted = ImmOperand::new(-1).to_hinted_unsigned();
        assert_eq!(hinted.to_string(), "0xffffffff");
        assert_eq!(hinted.value, -1);
    }

    #[test]
    fn float_display() {
        assert_eq!(Operand::float(1.5).to_string(), "1.5");
    }

    #[test]
    fn accessors() {
        assert_eq!(Operand::reg(S0).as_reg(), Some(S0));
        assert_eq!(Operand::reg(S0).as_imm(), None);
        assert_eq!(Operand::imm(3).as_imm(), Some(3));
        assert_eq!(Operand::float(0.0).as_reg(), None);
    }
}
