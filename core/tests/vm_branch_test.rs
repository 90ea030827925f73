//! Conditional-jump encodings: right-hand-side addressing modes and the
//! six comparators, including their signedness.

mod common;
use common::TestMachine;

/// Runs `CJMP variant, r0, rhs...` against a preset r0 and returns
/// whether the branch was taken (r2 set on the taken path).
fn branch_taken(r0: u16, variant: u8, rhs: &[u8]) -> bool {
    let mut code = vec![
        0x00, 0x00, (r0 >> 8) as u8, r0 as u8, // SETI r0
        0x0A, variant, 0x00, // CJMP on r0
    ];
    code.extend_from_slice(rhs);
    let taken_addr = (code.len() + 2 + 5) as u8; // past addr, SETI, HALT
    code.extend_from_slice(&[0x00, taken_addr]);
    code.extend_from_slice(&[
        0x00, 0x01, 0x00, 0x01, // SETI r1, 1 (fallthrough marker)
        0x11, // HALT
        0x00, 0x02, 0x00, 0x01, // SETI r2, 1 (taken marker)
        0x11, // HALT
    ]);

    let mut m = TestMachine::with_bytecode(&code);
    m.run_frame().unwrap();
    let taken = m.vm.reg(2) == 1;
    assert_eq!(m.vm.reg(1) == 1, !taken);
    taken
}

#[test]
fn test_compare_with_immediate_byte() {
    assert!(branch_taken(5, 0x00, &[0x05])); // eq
    assert!(!branch_taken(5, 0x00, &[0x06]));
    assert!(branch_taken(5, 0x01, &[0x06])); // ne
    assert!(branch_taken(7, 0x02, &[0x05])); // gt
    assert!(branch_taken(5, 0x03, &[0x05])); // ge
    assert!(branch_taken(4, 0x04, &[0x05])); // lt
    assert!(branch_taken(5, 0x05, &[0x05])); // le
}

#[test]
fn test_immediate_byte_is_not_sign_extended() {
    // r0 = -1 against rhs byte 0xFF: the byte reads as 255, so the
    // signed comparison -1 < 255 holds.
    assert!(branch_taken(0xFFFF, 0x04, &[0xFF]));
    assert!(!branch_taken(0xFFFF, 0x00, &[0xFF]));
}

#[test]
fn test_compare_with_immediate_word_is_signed() {
    // r0 = -1 < 1
    assert!(branch_taken(0xFFFF, 0x44, &[0x00, 0x01]));
    // r0 = -1 vs -1
    assert!(branch_taken(0xFFFF, 0x40, &[0xFF, 0xFF]));
    // r0 = 2 > -3
    assert!(branch_taken(0x0002, 0x42, &[0xFF, 0xFD]));
}

#[test]
fn test_compare_with_register() {
    // rhs = r0 itself: always equal.
    assert!(branch_taken(0x1234, 0x80, &[0x00]));
    // rhs = r3 (zero): 5 > 0.
    assert!(branch_taken(5, 0x82, &[0x03]));
}

#[test]
fn test_bad_comparator_falls_through() {
    assert!(!branch_taken(5, 0x07, &[0x05]));
}
