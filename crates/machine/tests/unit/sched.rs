//! Thread table and scheduler tests.
//!
//! These images set up the memory-resident thread table directly in the data
//! section: control registers 4..=6 name the current thread, the active
//! count, and the table base, and each slot occupies twenty words.

use crate::common::harness::{TestContext, image};
use coopsim_core::core::thread::ThreadState;
use pretty_assertions::assert_eq;

/// Two threads that ping-pong via `SYSCALL YIELD` and then terminate.
fn ping_pong_image() -> String {
    image(
        &[
            (0, 10),   // PC: thread 1 entry
            (1, 1900), // SP
            (4, 1),    // current thread
            (5, 2),    // active threads
            (6, 100),  // thread table base
            // slot 1 (thread 1)
            (100, 1),
            (103, 2), // Running
            (104, 10),
            (105, 1900),
            // slot 2 (thread 2)
            (120, 2),
            (123, 1), // Ready
            (124, 40),
            (125, 1800),
        ],
        &[
            (10, "SET 11 900"),
            (11, "SYSCALL YIELD"),
            (12, "SET 22 901"),
            (13, "SYSCALL HLT"),
            (40, "SET 33 902"),
            (41, "SYSCALL YIELD"),
            (42, "SYSCALL HLT"),
        ],
    )
}

#[test]
fn two_threads_ping_pong_to_completion() {
    let mut ctx = TestContext::load(&ping_pong_image());
    ctx.run_to_halt(50);

    assert_eq!(ctx.read(900), 11);
    assert_eq!(ctx.read(901), 22);
    assert_eq!(ctx.read(902), 33);
    assert_eq!(ctx.machine.stats.context_switches, 3);
    assert_eq!(ctx.machine.stats.threads_terminated, 2);
    assert_eq!(ctx.machine.active_threads().unwrap(), 0);
}

#[test]
fn yield_persists_the_resume_point_before_switching() {
    let mut ctx = TestContext::load(&ping_pong_image());
    // Tick 1 runs thread 1's SET, tick 2 its yield.
    ctx.tick_n(2);

    let one = ctx.machine.thread_snapshot(1).unwrap();
    let two = ctx.machine.thread_snapshot(2).unwrap();
    assert_eq!(one.state, ThreadState::Ready.to_word());
    // Resumption continues after the yield, never at it.
    assert_eq!(one.pc, 12);
    assert_eq!(one.sp, 1900);
    assert_eq!(two.state, ThreadState::Running.to_word());
    assert_eq!(ctx.machine.current_thread().unwrap(), 2);
    assert_eq!(ctx.machine.pc().unwrap(), 40);
    assert_eq!(ctx.machine.sp().unwrap(), 1800);
    assert_eq!(ctx.machine.syscall_result().unwrap(), 1);
}

#[test]
fn yield_with_no_ready_sibling_keeps_running() {
    let source = image(
        &[
            (0, 10),
            (1, 1900),
            (4, 1),
            (5, 1),
            (6, 100),
            (100, 1),
            (103, 2), // Running
            (104, 10),
            (105, 1900),
        ],
        &[
            (10, "SET 1 900"),
            (11, "SYSCALL YIELD"),
            (12, "SET 2 901"),
            (13, "SYSCALL HLT"),
        ],
    );
    let mut ctx = TestContext::load(&source);
    ctx.run_to_halt(20);

    assert_eq!(ctx.read(900), 1);
    assert_eq!(ctx.read(901), 2);
    assert_eq!(ctx.machine.stats.context_switches, 0);
    assert_eq!(ctx.machine.syscall_result().unwrap(), 1);
}

#[test]
fn termination_hands_over_to_the_next_ready_thread() {
    let source = image(
        &[
            (0, 10),
            (1, 1900),
            (4, 1),
            (5, 2),
            (6, 100),
            (100, 1),
            (103, 2), // Running
            (104, 10),
            (105, 1900),
            (120, 2),
            (123, 1), // Ready
            (124, 40),
            (125, 1800),
        ],
        &[
            (10, "SYSCALL HLT"),
            (40, "SET 5 902"),
            (41, "SYSCALL HLT"),
        ],
    );
    let mut ctx = TestContext::load(&source);
    ctx.run_to_halt(20);

    assert_eq!(ctx.read(902), 5);
    assert_eq!(ctx.machine.stats.context_switches, 1);
    assert_eq!(ctx.machine.stats.threads_terminated, 2);
    let one = ctx.machine.thread_snapshot(1).unwrap();
    let two = ctx.machine.thread_snapshot(2).unwrap();
    assert_eq!(one.state, ThreadState::Inactive.to_word());
    assert_eq!(two.state, ThreadState::Inactive.to_word());
}

#[test]
fn selection_scans_upward_with_wraparound() {
    // Thread 3 is current; threads 1 and 2 are Ready. The scan wraps past
    // the table end and picks thread 1, not thread 2.
    let source = image(
        &[
            (0, 50),
            (1, 1900),
            (4, 3),
            (5, 3),
            (6, 100),
            (100, 1),
            (103, 1), // Ready
            (104, 10),
            (105, 1900),
            (120, 2),
            (123, 1), // Ready
            (124, 30),
            (125, 1800),
            (140, 3),
            (143, 2), // Running
            (144, 50),
            (145, 1700),
        ],
        &[
            (10, "SET 1 901"),
            (11, "SYSCALL HLT"),
            (30, "SET 1 902"),
            (31, "SYSCALL HLT"),
            (50, "SYSCALL YIELD"),
            (51, "SYSCALL HLT"),
        ],
    );
    let mut ctx = TestContext::load(&source);
    ctx.tick_n(1); // thread 3 yields
    assert_eq!(ctx.machine.current_thread().unwrap(), 1);
    ctx.run_to_halt(30);
    assert_eq!(ctx.machine.stats.threads_terminated, 3);
    assert_eq!(ctx.read(901), 1);
    assert_eq!(ctx.read(902), 1);
}

#[test]
fn machine_halts_when_the_last_thread_terminates() {
    let source = image(
        &[
            (0, 10),
            (1, 1900),
            (4, 1),
            (5, 1),
            (6, 100),
            (100, 1),
            (103, 2), // Running
            (104, 10),
            (105, 1900),
        ],
        &[(10, "HLT")],
    );
    let mut ctx = TestContext::load(&source);
    ctx.run_to_halt(10);
    assert_eq!(ctx.machine.active_threads().unwrap(), 0);
    assert_eq!(ctx.machine.stats.threads_terminated, 1);
}
