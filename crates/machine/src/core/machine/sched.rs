//! Thread scheduler: selection, context switching, termination.
//!
//! The scheduler is driven by discrete events at opcode boundaries (`HLT`,
//! `SYSCALL HLT`, `SYSCALL YIELD`, fetch faults, watchdog eviction); no
//! opcode is interruptible mid-execution. Selection always proceeds
//! ascending-by-id from the current thread with wraparound, so two runs over
//! identical thread-state snapshots yield identical schedules.
//!
//! Context is persisted to the thread table *before* any control transfer in
//! the same instruction; a reader of the table therefore always sees a
//! consistent snapshot. Skipping that ordering corrupts resumption silently.

use super::Machine;
use crate::common::{Fault, Word, reg};
use crate::core::mode::Mode;
use crate::core::thread::ThreadState;

impl Machine {
    /// Writes the current thread's PC, SP, and instruction count into its
    /// table slot. No-op when no thread table is in use.
    pub(crate) fn persist_context(&mut self) -> Result<(), Fault> {
        let current = self.current_thread()?;
        if current <= 0 {
            return Ok(());
        }
        let slot = self.slot(current)?;
        let pc = self.pc()?;
        let sp = self.sp()?;
        let count = self.instruction_count()?;
        self.mem.store_word(slot.pc_addr(), pc)?;
        self.mem.store_word(slot.sp_addr(), sp)?;
        self.mem.store_word(slot.instruction_count_addr(), count)?;
        Ok(())
    }

    /// Scans the thread table for the next Ready thread.
    ///
    /// The scan starts just after `current`, wraps to slot 1, and excludes
    /// `current` itself; this order is the canonical scheduling policy.
    ///
    /// # Returns
    ///
    /// The id of the first Ready thread in scan order, or `None`.
    pub(crate) fn select_next_ready(&self, current: Word) -> Result<Option<usize>, Fault> {
        let slots = self.thread_slots;
        let current = if current < 0 { 0 } else { current as usize };
        let after = (current + 1)..=slots;
        let before = 1..current.min(slots + 1);
        for id in after.chain(before) {
            let slot = self.slot(id as Word)?;
            let state = self.mem.load_word(slot.state_addr())?;
            if state == ThreadState::Ready.to_word() {
                return Ok(Some(id));
            }
        }
        Ok(None)
    }

    /// Transfers control to thread `id`.
    ///
    /// A currently Running thread is demoted to Ready with its context
    /// persisted first; the target's saved PC/SP become live and its state
    /// becomes Running.
    pub(crate) fn switch_to(&mut self, id: usize) -> Result<(), Fault> {
        let current = self.current_thread()?;
        if current > 0 {
            let slot = self.slot(current)?;
            let state = self.mem.load_word(slot.state_addr())?;
            if state == ThreadState::Running.to_word() {
                self.mem
                    .store_word(slot.state_addr(), ThreadState::Ready.to_word())?;
                self.persist_context()?;
            }
        }

        self.mem.store_word(reg::CURRENT_THREAD, id as Word)?;
        let slot = self.slot(id as Word)?;
        let new_pc = self.mem.load_word(slot.pc_addr())?;
        let new_sp = self.mem.load_word(slot.sp_addr())?;
        self.set_pc(new_pc)?;
        self.set_sp(new_sp)?;
        self.mem
            .store_word(slot.state_addr(), ThreadState::Running.to_word())?;
        self.stats.context_switches += 1;
        tracing::info!(from = current, to = id, "context switch");
        Ok(())
    }

    /// Terminates the current thread and reschedules or halts.
    ///
    /// Marks the thread Inactive, decrements the active count exactly once,
    /// and halts when no active or Ready thread remains. With no thread table
    /// in use (current id 0) the machine halts directly.
    pub(crate) fn terminate_current_thread(&mut self) -> Result<(), Fault> {
        let current = self.current_thread()?;
        if current <= 0 {
            tracing::info!("halt: no thread table in use");
            self.halted = true;
            return Ok(());
        }

        let slot = self.slot(current)?;
        self.mem
            .store_word(slot.state_addr(), ThreadState::Inactive.to_word())?;
        self.persist_context()?;
        self.stats.threads_terminated += 1;

        let active = self.active_threads()? - 1;
        self.mem.store_word(reg::ACTIVE_THREADS, active)?;
        if active <= 0 {
            tracing::info!("halt: no active threads remain");
            self.halted = true;
            return Ok(());
        }

        match self.select_next_ready(current)? {
            Some(next) => {
                self.mode = Mode::Kernel;
                self.switch_to(next)
            }
            None => {
                tracing::info!("halt: no ready thread");
                self.halted = true;
                Ok(())
            }
        }
    }

    /// Handles `SYSCALL YIELD` for the thread fetched at `pc`.
    ///
    /// The PC is advanced past the yield *before* context is persisted, so
    /// the thread resumes at the following instruction; persisting the
    /// un-advanced PC would make every resumption re-execute the yield. With
    /// no other Ready thread the current thread simply keeps running.
    pub(crate) fn yield_current(&mut self, pc: usize) -> Result<(), Fault> {
        self.set_pc(pc as Word + 1)?;
        self.mode = Mode::Kernel;
        self.persist_context()?;

        let current = self.current_thread()?;
        if current > 0 {
            if let Some(next) = self.select_next_ready(current)? {
                self.switch_to(next)?;
            }
        }
        self.mem.store_word(reg::SYSCALL_RESULT, 1)?;
        Ok(())
    }
}
