//! Single-thread execution engine tests.
//!
//! Each test assembles a small image, runs it, and asserts on final memory;
//! scheduling across multiple threads is exercised separately.

use crate::common::harness::{TestContext, image};
use coopsim_core::Fault;
use coopsim_core::core::mode::Mode;
use pretty_assertions::assert_eq;

#[test]
fn set_and_cpy_move_values() {
    let source = image(
        &[(0, 10), (1, 1900)],
        &[(10, "SET 7 1500"), (11, "CPY 1500 1501"), (12, "HLT")],
    );
    let mut ctx = TestContext::load(&source);
    ctx.run_to_halt(10);
    assert_eq!(ctx.read(1500), 7);
    assert_eq!(ctx.read(1501), 7);
}

#[test]
fn cpyi_follows_one_level_of_indirection() {
    let source = image(
        &[(0, 10), (1, 1900), (700, 1500), (1500, 42)],
        &[(10, "CPYI 700 800"), (11, "HLT")],
    );
    let mut ctx = TestContext::load(&source);
    ctx.run_to_halt(10);
    assert_eq!(ctx.read(800), 42);
}

#[test]
fn arithmetic_opcodes() {
    let source = image(
        &[(0, 10), (1, 1900), (500, 5), (501, 7)],
        &[
            (10, "ADD 500 3"),     // 500 = 8
            (11, "ADDI 500 501"),  // 500 = 15
            (12, "SUBI 500 501"),  // 501 = 15 - 7 = 8
            (13, "HLT"),
        ],
    );
    let mut ctx = TestContext::load(&source);
    ctx.run_to_halt(10);
    assert_eq!(ctx.read(500), 15);
    assert_eq!(ctx.read(501), 8);
}

#[test]
fn arithmetic_wraps_at_the_word_boundaries() {
    let source = image(
        &[
            (0, 10),
            (1, 1900),
            (1500, i64::MAX),
            (1501, 1),
            (1502, i64::MIN),
            (1503, 1),
        ],
        &[
            (10, "ADD 1500 1"),      // MAX + 1 wraps to MIN
            (11, "ADDI 1501 1500"),  // 1 + MIN
            (12, "SUBI 1502 1503"),  // 1503 = MIN - 1 wraps to MAX
            (13, "HLT"),
        ],
    );
    let mut ctx = TestContext::load(&source);
    ctx.run_to_halt(10);
    assert_eq!(ctx.read(1500), i64::MIN);
    assert_eq!(ctx.read(1501), i64::MIN + 1);
    assert_eq!(ctx.read(1503), i64::MAX);
}

#[test]
fn jif_jumps_only_on_non_positive_values() {
    let source = image(
        &[(0, 10), (1, 1900), (500, 0), (501, 5)],
        &[
            (10, "JIF 500 13"),  // taken: 0 <= 0
            (11, "SET 1 900"),   // skipped
            (13, "JIF 501 20"),  // not taken: 5 > 0
            (14, "SET 2 901"),
            (15, "HLT"),
        ],
    );
    let mut ctx = TestContext::load(&source);
    ctx.run_to_halt(10);
    assert_eq!(ctx.read(900), 0);
    assert_eq!(ctx.read(901), 2);
}

#[test]
fn push_and_pop_use_a_descending_stack() {
    let source = image(
        &[(0, 10), (1, 1900), (500, 99)],
        &[(10, "PUSH 500"), (11, "POP 501"), (12, "HLT")],
    );
    let mut ctx = TestContext::load(&source);
    ctx.tick_n(1);
    // The pushed value lands at the pre-decrement SP.
    assert_eq!(ctx.read(1900), 99);
    assert_eq!(ctx.machine.sp().unwrap(), 1899);
    ctx.run_to_halt(10);
    assert_eq!(ctx.read(501), 99);
    assert_eq!(ctx.machine.sp().unwrap(), 1900);
}

#[test]
fn call_and_ret_round_trip_through_the_stack() {
    let source = image(
        &[(0, 10), (1, 1900)],
        &[
            (10, "CALL 30"),
            (11, "SET 88 601"),
            (12, "HLT"),
            (30, "SET 77 600"),
            (31, "RET"),
        ],
    );
    let mut ctx = TestContext::load(&source);
    ctx.run_to_halt(10);
    assert_eq!(ctx.read(600), 77);
    assert_eq!(ctx.read(601), 88);
    assert_eq!(ctx.machine.sp().unwrap(), 1900);
}

#[test]
fn user_drops_the_mode_and_jumps_indirectly() {
    let source = image(
        &[(0, 10), (1, 1900), (1500, 30), (1600, 5)],
        &[(10, "USER 1500"), (30, "CPY 1600 1601"), (31, "SYSCALL HLT")],
    );
    let mut ctx = TestContext::load(&source);
    ctx.tick_n(1);
    assert_eq!(ctx.machine.mode(), Mode::User);
    assert_eq!(ctx.machine.pc().unwrap(), 30);
    ctx.run_to_halt(10);
    assert_eq!(ctx.read(1601), 5);
}

#[test]
fn user_mode_touching_kernel_memory_is_fatal() {
    let source = image(
        &[(0, 10), (1, 1900), (1500, 30)],
        &[(10, "USER 1500"), (30, "CPY 500 1501")],
    );
    let mut ctx = TestContext::load(&source);
    let fault = ctx.run_until_fault(10);
    assert!(matches!(fault, Fault::Protection { addr: 500 }));
    assert!(ctx.machine.is_halted());
}

#[test]
fn prn_emits_the_value_and_blocks_for_the_configured_ticks() {
    let source = image(
        &[(0, 10), (1, 1900), (1500, 42)],
        &[(10, "SYSCALL PRN 1500"), (11, "HLT")],
    );
    let mut ctx = TestContext::load(&source);
    ctx.run_to_halt(200);
    assert_eq!(ctx.machine.output(), &[42]);
    assert_eq!(ctx.machine.stats.blocked_ticks, 100);
    // One tick to issue, one hundred blocked, one to halt.
    assert_eq!(ctx.machine.stats.ticks, 102);
}

#[test]
fn blocked_ticks_still_advance_the_instruction_register() {
    let source = image(
        &[(0, 10), (1, 1900), (1500, 42)],
        &[(10, "SYSCALL PRN 1500"), (11, "HLT")],
    );
    let mut ctx = TestContext::load(&source);
    ctx.tick_n(51);
    assert_eq!(ctx.machine.instruction_count().unwrap(), 51);
    assert_eq!(ctx.machine.pc().unwrap(), 11);
}

#[test]
fn fetching_a_data_cell_terminates_instead_of_faulting() {
    // Address 11 holds the default zero word, not an instruction.
    let source = image(&[(0, 10), (1, 1900)], &[(10, "SET 1 1500")]);
    let mut ctx = TestContext::load(&source);
    ctx.run_to_halt(10);
    assert_eq!(ctx.read(1500), 1);
}

#[test]
fn kernel_code_redirects_execution_by_writing_the_pc_register() {
    let source = image(
        &[(0, 10), (1, 1900)],
        &[
            (10, "SET 29 0"), // lands at 30 after the auto-increment
            (11, "SET 1 900"),
            (30, "SET 5 1500"),
            (31, "HLT"),
        ],
    );
    let mut ctx = TestContext::load(&source);
    ctx.run_to_halt(10);
    assert_eq!(ctx.read(1500), 5);
    assert_eq!(ctx.read(900), 0);
}

#[test]
fn undecodable_instruction_is_fatal() {
    let source = image(&[(0, 10), (1, 1900)], &[(10, "FROB 1 2")]);
    let mut ctx = TestContext::load(&source);
    let fault = ctx.run_until_fault(10);
    assert!(matches!(fault, Fault::Decode { pc: 10, .. }));
    assert!(ctx.machine.is_halted());
}

#[test]
fn out_of_bounds_operand_is_fatal() {
    let source = image(&[(0, 10), (1, 1900)], &[(10, "CPY 10999 12000")]);
    let mut ctx = TestContext::load(&source);
    let fault = ctx.run_until_fault(10);
    assert!(matches!(fault, Fault::OutOfBounds { addr: 12000, .. }));
}

#[test]
fn halted_machine_ignores_further_ticks() {
    let source = image(&[(0, 10), (1, 1900)], &[(10, "HLT")]);
    let mut ctx = TestContext::load(&source);
    ctx.run_to_halt(10);
    let ticks = ctx.machine.stats.ticks;
    ctx.tick_n(5);
    assert_eq!(ctx.machine.stats.ticks, ticks);
}
