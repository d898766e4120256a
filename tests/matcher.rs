use allegrex_rs::isa::mips::gpr::{A0, A1, ZERO};
use allegrex_rs::matcher::{any_imm, any_op, any_reg, is_imm, is_imm_in, is_null, is_reg, is_reg_in};
use allegrex_rs::Operand;

#[test]
fn null_accepts_only_absent() {
    assert!(is_null().matches(None));
    assert!(!is_null().matches(Some(&Operand::reg(ZERO))));
    assert!(!is_null().matches(Some(&Operand::imm(0))));
}

#[test]
fn any_op_accepts_everything() {
    assert!(any_op().matches(None));
    assert!(any_op().matches(Some(&Operand::reg(A0))));
    assert!(any_op().matches(Some(&Operand::imm(-1))));
    assert!(any_op().matches(Some(&Operand::float(0.5))));
}

#[test]
fn register_matchers() {
    let a0 = Operand::reg(A0);
    let imm = Operand::imm(4);
    assert!(any_reg().matches(Some(&a0)));
    assert!(!any_reg().matches(Some(&imm)));
    assert!(!any_reg().matches(None));

    assert!(is_reg(A0).matches(Some(&a0)));
    assert!(!is_reg(A1).matches(Some(&a0)));
    assert!(is_reg_in(&[A1, A0]).matches(Some(&a0)));
    assert!(!is_reg_in(&[A1, ZERO]).matches(Some(&a0)));
    assert!(!is_reg_in(&[A0]).matches(Some(&imm)));
    assert!(!is_reg(A0).matches(None));
}

#[test]
fn immediate_matchers() {
    let imm = Operand::imm(-0x42);
    let hinted = Operand::uimm(-0x42);
    assert!(any_imm().matches(Some(&imm)));
    assert!(!any_imm().matches(Some(&Operand::reg(A0))));
    assert!(!any_imm().matches(None));

    assert!(is_imm(-0x42).matches(Some(&imm)));
    // display hint doesn't affect the value
    assert!(is_imm(-0x42).matches(Some(&hinted)));
    assert!(!is_imm(0x42).matches(Some(&imm)));
    assert!(is_imm_in(&[0, -0x42]).matches(Some(&imm)));
    assert!(!is_imm_in(&[0, 1]).matches(Some(&imm)));
    assert!(!is_imm(0).matches(Some(&Operand::reg(ZERO))));
}
