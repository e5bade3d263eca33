//! Machine state container and the per-tick engine.
//!
//! This module defines the central `Machine` structure, which owns the entire
//! simulated state. It coordinates the following:
//! 1. **State Management:** Memory space, privilege mode, halted flag, and
//!    the blocked-tick countdown.
//! 2. **Engine:** The per-tick fetch-decode-execute sequence, including the
//!    watchdog checks that run before any fetch.
//! 3. **Registers:** Typed accessors over the memory-resident control
//!    registers, so the rest of the core never does raw register arithmetic.
//!
//! The opcode dispatch lives in [`execute`] and the scheduler in [`sched`];
//! both are additional `impl Machine` blocks, keeping one concern per file.

/// Opcode dispatch.
pub mod execute;

/// Thread scheduler: selection, context switching, termination.
pub mod sched;

use crate::common::{Fault, Word, reg};
use crate::config::Config;
use crate::core::cell::Cell;
use crate::core::memory::MemorySpace;
use crate::core::mode::Mode;
use crate::core::thread::{ThreadSlot, ThreadSnapshot};
use crate::isa::decode;
use crate::stats::SimStats;
use execute::Flow;

/// The whole simulated machine: memory, mode, watchdog, and statistics.
///
/// Exactly one logical thread executes per tick; cooperative multitasking is
/// emulated inside this single sequential structure, never with host threads.
pub struct Machine {
    mem: MemorySpace,
    mode: Mode,
    halted: bool,

    /// Remaining ticks of the current `SYSCALL PRN` block, 0 when not blocked.
    blocked_ticks: u64,

    /// Number of thread-table slots the scheduler scans.
    thread_slots: usize,
    prn_block_ticks: u64,

    /// Watchdog: hard cap on total ticks.
    tick_limit: u64,
    /// Watchdog: soft cap on consecutive ticks at an unchanged PC.
    same_pc_limit: u64,
    last_pc: Word,
    same_pc_count: u64,

    /// Values emitted by `SYSCALL PRN`, in order.
    output: Vec<Word>,

    /// Performance and lifecycle statistics.
    pub stats: SimStats,
}

impl Machine {
    /// Creates a halted-flag-clear machine with zeroed memory.
    ///
    /// The loader populates memory before the first tick; until then the
    /// machine is in kernel mode with PC and SP both zero.
    pub fn new(config: &Config) -> Self {
        Self {
            mem: MemorySpace::new(
                config.machine.memory_words,
                config.machine.protected_boundary,
            ),
            mode: Mode::Kernel,
            halted: false,
            blocked_ticks: 0,
            thread_slots: config.machine.thread_slots,
            prn_block_ticks: config.machine.prn_block_ticks,
            tick_limit: config.watchdog.tick_limit,
            same_pc_limit: config.watchdog.same_pc_limit,
            // Never equal to a real PC, so the first tick starts a fresh run.
            last_pc: -1,
            same_pc_count: 0,
            output: Vec::new(),
            stats: SimStats::default(),
        }
    }

    /// Returns `true` once the machine has halted; it never unhalts.
    pub fn is_halted(&self) -> bool {
        self.halted
    }

    /// Returns the current privilege mode.
    pub fn mode(&self) -> Mode {
        self.mode
    }

    /// Returns the values emitted by `SYSCALL PRN`, oldest first.
    pub fn output(&self) -> &[Word] {
        &self.output
    }

    /// Returns the memory capacity in words.
    pub fn capacity(&self) -> usize {
        self.mem.capacity()
    }

    /// Returns the number of thread-table slots the scheduler scans.
    pub fn thread_slots(&self) -> usize {
        self.thread_slots
    }

    /// Advances the machine by exactly one scheduling step.
    ///
    /// A no-op step while blocked still counts and still advances the
    /// total-instruction register. On a halted machine this does nothing.
    ///
    /// # Errors
    ///
    /// Any machine-fatal [`Fault`]; the machine is already halted when the
    /// error is returned, and the fault has been logged.
    pub fn tick(&mut self) -> Result<(), Fault> {
        if self.halted {
            return Ok(());
        }
        match self.step() {
            Ok(()) => Ok(()),
            Err(fault) => {
                tracing::error!(thread = self.current_thread().unwrap_or(-1), %fault, "machine fault");
                self.halted = true;
                Err(fault)
            }
        }
    }

    /// One tick of the fetch-decode-execute engine.
    fn step(&mut self) -> Result<(), Fault> {
        self.stats.ticks += 1;
        match self.mode {
            Mode::Kernel => self.stats.kernel_ticks += 1,
            Mode::User => self.stats.user_ticks += 1,
        }
        if self.stats.ticks > self.tick_limit {
            return Err(Fault::TickLimit {
                limit: self.tick_limit,
            });
        }

        // A blocked tick counts as a step but fetches nothing; the PC is
        // frozen, so it must not feed the same-PC tracker either.
        if self.blocked_ticks > 0 {
            self.blocked_ticks -= 1;
            self.stats.blocked_ticks += 1;
            self.bump_instruction_register()?;
            return Ok(());
        }

        let pc_word = self.pc()?;
        if pc_word == self.last_pc {
            self.same_pc_count += 1;
            if self.same_pc_count > self.same_pc_limit {
                tracing::warn!(
                    pc = pc_word,
                    limit = self.same_pc_limit,
                    "watchdog: PC unchanged past soft cap, evicting current thread"
                );
                self.stats.watchdog_evictions += 1;
                self.same_pc_count = 0;
                self.last_pc = -1;
                self.terminate_current_thread()?;
                return Ok(());
            }
        } else {
            self.last_pc = pc_word;
            self.same_pc_count = 0;
        }

        let pc = self.mem.index(pc_word)?;
        let text = match self.mem.cell(pc) {
            Some(Cell::Code(text)) if !text.trim().is_empty() => text.clone(),
            _ => {
                // Thread-fatal, not machine-fatal: the faulting thread dies
                // and a ready sibling takes over if one exists.
                tracing::warn!(pc, "no executable instruction at PC, terminating current thread");
                self.terminate_current_thread()?;
                return Ok(());
            }
        };

        let instruction = decode(&text).map_err(|source| Fault::Decode { pc, source })?;
        tracing::debug!(pc, mode = %self.mode, %instruction, "execute");

        let flow = self.dispatch(&instruction, pc)?;
        self.stats.instructions_retired += 1;
        if flow == Flow::Auto {
            // Read the PC back rather than reusing `pc_word`: a kernel
            // program may have just stored a new PC through plain memory
            // writes, and the increment applies to that value.
            let next = self.pc()? + 1;
            self.set_pc(next)?;
            self.bump_instruction_register()?;
        }
        Ok(())
    }

    // Control-register accessors. These are engine bookkeeping: they bypass
    // the user-mode protection check but still fault on bounds and tag
    // violations, and PC/SP assignment is range-checked at the point of
    // assignment so both always address valid memory.

    /// Reads the program counter register.
    pub fn pc(&self) -> Result<Word, Fault> {
        self.mem.load_word(reg::PC)
    }

    /// Assigns the program counter, range-checking the new value.
    pub(crate) fn set_pc(&mut self, value: Word) -> Result<(), Fault> {
        let _ = self.mem.index(value)?;
        self.mem.store_word(reg::PC, value)
    }

    /// Reads the stack pointer register.
    pub fn sp(&self) -> Result<Word, Fault> {
        self.mem.load_word(reg::SP)
    }

    /// Assigns the stack pointer, range-checking the new value.
    pub(crate) fn set_sp(&mut self, value: Word) -> Result<(), Fault> {
        let _ = self.mem.index(value)?;
        self.mem.store_word(reg::SP, value)
    }

    /// Reads the syscall-result register.
    pub fn syscall_result(&self) -> Result<Word, Fault> {
        self.mem.load_word(reg::SYSCALL_RESULT)
    }

    /// Reads the total-instruction register.
    pub fn instruction_count(&self) -> Result<Word, Fault> {
        self.mem.load_word(reg::INSTRUCTION_COUNT)
    }

    /// Reads the current thread id register.
    pub fn current_thread(&self) -> Result<Word, Fault> {
        self.mem.load_word(reg::CURRENT_THREAD)
    }

    /// Reads the active thread count register.
    pub fn active_threads(&self) -> Result<Word, Fault> {
        self.mem.load_word(reg::ACTIVE_THREADS)
    }

    /// Reads the thread table base register.
    pub fn thread_table_base(&self) -> Result<Word, Fault> {
        self.mem.load_word(reg::THREAD_TABLE_BASE)
    }

    /// Advances the total-instruction register by one.
    fn bump_instruction_register(&mut self) -> Result<(), Fault> {
        let count = self.instruction_count()?;
        self.mem.store_word(reg::INSTRUCTION_COUNT, count + 1)
    }

    // Loader and observer surface.

    /// Stores a numeric cell, bypassing protection (loading is kernel work).
    ///
    /// # Errors
    ///
    /// `Fault::OutOfBounds` when `addr` is outside the capacity.
    pub fn store_data(&mut self, addr: usize, value: Word) -> Result<(), Fault> {
        self.mem.store_word(addr, value)
    }

    /// Stores an instruction cell, bypassing protection.
    ///
    /// # Errors
    ///
    /// `Fault::OutOfBounds` when `addr` is outside the capacity.
    pub fn store_code(&mut self, addr: usize, text: impl Into<String>) -> Result<(), Fault> {
        self.mem.store_code(addr, text)
    }

    /// Reads a numeric cell, bypassing protection.
    ///
    /// # Errors
    ///
    /// `Fault::OutOfBounds` or `Fault::CodeAsData`.
    pub fn read_data(&self, addr: usize) -> Result<Word, Fault> {
        self.mem.load_word(addr)
    }

    /// Returns the cell at `addr`, if in bounds.
    pub fn cell(&self, addr: usize) -> Option<&Cell> {
        self.mem.cell(addr)
    }

    /// Reads one thread-table slot as plain data.
    ///
    /// # Errors
    ///
    /// Bounds or tag faults when the table base points at unsuitable memory.
    pub fn thread_snapshot(&self, id: usize) -> Result<ThreadSnapshot, Fault> {
        let slot = self.slot(id as Word)?;
        Ok(ThreadSnapshot {
            id: self.mem.load_word(slot.id_addr())?,
            start_time: self.mem.load_word(slot.start_time_addr())?,
            instruction_count: self.mem.load_word(slot.instruction_count_addr())?,
            state: self.mem.load_word(slot.state_addr())?,
            pc: self.mem.load_word(slot.pc_addr())?,
            sp: self.mem.load_word(slot.sp_addr())?,
        })
    }

    /// Builds the slot view for thread `id` from the table base register.
    pub(crate) fn slot(&self, id: Word) -> Result<ThreadSlot, Fault> {
        let base = self.thread_table_base()?;
        let base_idx = self.mem.index(base)?;
        Ok(ThreadSlot::new(base_idx, id.max(0) as usize))
    }
}
