//! Memory-resident control register addresses.
//!
//! The machine keeps its control state in reserved low memory cells rather
//! than in dedicated hardware registers. This module names those addresses.
//! All of them are numeric cells and live below the user-mode protection
//! boundary, so user programs can neither read nor write them directly.

/// Address of the program counter.
pub const PC: usize = 0;

/// Address of the stack pointer.
pub const SP: usize = 1;

/// Address of the result cell written by syscalls.
pub const SYSCALL_RESULT: usize = 2;

/// Address of the total executed-instruction counter.
pub const INSTRUCTION_COUNT: usize = 3;

/// Address of the currently running thread id (0 when no thread table is in use).
pub const CURRENT_THREAD: usize = 4;

/// Address of the active (non-inactive) thread count.
pub const ACTIVE_THREADS: usize = 5;

/// Address of the thread table base pointer.
pub const THREAD_TABLE_BASE: usize = 6;

/// Number of reserved control-register cells at the bottom of memory.
pub const CONTROL_REGISTERS: usize = 7;
