//! Simulation statistics collection and reporting.
//!
//! This module tracks lifecycle metrics for the machine. It provides:
//! 1. **Tick accounting:** Total ticks, executed instructions, blocked ticks,
//!    and the kernel/user mode split.
//! 2. **Scheduling:** Context switches, thread terminations, and watchdog
//!    evictions.
//! 3. **Reporting:** A plain-text summary with the wall-clock tick rate.

use std::time::Instant;

/// Simulation statistics tracked across a run.
#[derive(Clone, Debug)]
pub struct SimStats {
    start_time: Instant,
    /// Total ticks elapsed, including blocked no-op ticks.
    pub ticks: u64,
    /// Instructions actually dispatched (blocked ticks excluded).
    pub instructions_retired: u64,
    /// Ticks consumed by `SYSCALL PRN` blocking.
    pub blocked_ticks: u64,
    /// Ticks started in kernel mode.
    pub kernel_ticks: u64,
    /// Ticks started in user mode.
    pub user_ticks: u64,
    /// Scheduler-driven control transfers between threads.
    pub context_switches: u64,
    /// Threads that transitioned into the Inactive state.
    pub threads_terminated: u64,
    /// Threads forcibly evicted by the same-PC watchdog.
    pub watchdog_evictions: u64,
}

impl Default for SimStats {
    fn default() -> Self {
        Self {
            start_time: Instant::now(),
            ticks: 0,
            instructions_retired: 0,
            blocked_ticks: 0,
            kernel_ticks: 0,
            user_ticks: 0,
            context_switches: 0,
            threads_terminated: 0,
            watchdog_evictions: 0,
        }
    }
}

impl SimStats {
    /// Prints a summary of the run to stdout.
    pub fn print(&self) {
        let elapsed = self.start_time.elapsed().as_secs_f64();
        let rate = if elapsed > 0.0 {
            self.ticks as f64 / elapsed
        } else {
            0.0
        };

        println!();
        println!("=== Simulation Statistics ===");
        println!("Ticks:               {:>12}", self.ticks);
        println!("Instructions:        {:>12}", self.instructions_retired);
        println!("Blocked ticks:       {:>12}", self.blocked_ticks);
        println!("Kernel ticks:        {:>12}", self.kernel_ticks);
        println!("User ticks:          {:>12}", self.user_ticks);
        println!("Context switches:    {:>12}", self.context_switches);
        println!("Threads terminated:  {:>12}", self.threads_terminated);
        println!("Watchdog evictions:  {:>12}", self.watchdog_evictions);
        println!("Elapsed:             {elapsed:>12.3}s ({rate:.0} ticks/s)");
    }
}
