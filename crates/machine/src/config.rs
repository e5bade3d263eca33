//! Configuration system for the simulator.
//!
//! This module defines the configuration structures used to parameterize the
//! machine. It provides:
//! 1. **Defaults:** Baseline constants (memory capacity, protection boundary,
//!    thread slots, block length, watchdog caps).
//! 2. **Structures:** Hierarchical config for the machine proper and for the
//!    watchdog safety nets.
//!
//! Configuration is supplied as JSON via [`Config::from_json`] or use
//! `Config::default()` for the CLI.

use serde::Deserialize;

/// Default configuration constants for the simulator.
///
/// These values define the baseline machine when not explicitly overridden.
mod defaults {
    /// Total memory capacity in words.
    pub const MEMORY_WORDS: usize = 11000;

    /// First address user-mode programs may touch.
    ///
    /// Everything below this address is kernel-only: control registers,
    /// kernel data, and the thread table.
    pub const PROTECTED_BOUNDARY: usize = 1000;

    /// Number of slots in the thread table.
    ///
    /// The scheduler scans exactly this many fixed-stride slots; images that
    /// define fewer threads simply leave the remaining slots inactive.
    pub const THREAD_SLOTS: usize = 10;

    /// Ticks a thread stays blocked after a `SYSCALL PRN`.
    pub const PRN_BLOCK_TICKS: u64 = 100;

    /// Hard cap on total ticks before the watchdog halts the machine.
    pub const TICK_LIMIT: u64 = 100_000;

    /// Consecutive same-PC ticks tolerated before the watchdog evicts the
    /// current thread.
    pub const SAME_PC_LIMIT: u64 = 100;
}

/// Root configuration structure containing all simulator settings.
///
/// # Examples
///
/// ```
/// use coopsim_core::config::Config;
///
/// let config = Config::default();
/// assert_eq!(config.machine.memory_words, 11000);
/// assert_eq!(config.watchdog.tick_limit, 100_000);
///
/// let json = r#"{
///     "machine": { "memory_words": 2048, "thread_slots": 4 },
///     "watchdog": { "tick_limit": 5000 }
/// }"#;
/// let config = Config::from_json(json).unwrap();
/// assert_eq!(config.machine.memory_words, 2048);
/// assert_eq!(config.machine.protected_boundary, 1000);
/// assert_eq!(config.watchdog.tick_limit, 5000);
/// assert_eq!(config.watchdog.same_pc_limit, 100);
/// ```
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    /// Machine geometry and syscall behavior.
    #[serde(default)]
    pub machine: MachineConfig,
    /// Watchdog safety-net caps.
    #[serde(default)]
    pub watchdog: WatchdogConfig,
}

impl Config {
    /// Deserializes a configuration from a JSON string.
    ///
    /// Missing fields take their defaults, so a partial document is fine.
    ///
    /// # Errors
    ///
    /// Returns the underlying `serde_json` error if the document is not
    /// valid JSON or a field has the wrong type.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

/// Machine geometry and syscall timing.
#[derive(Debug, Clone, Deserialize)]
pub struct MachineConfig {
    /// Total memory capacity in words.
    #[serde(default = "MachineConfig::default_memory_words")]
    pub memory_words: usize,

    /// First address accessible from user mode.
    #[serde(default = "MachineConfig::default_protected_boundary")]
    pub protected_boundary: usize,

    /// Number of fixed-stride slots in the thread table.
    #[serde(default = "MachineConfig::default_thread_slots")]
    pub thread_slots: usize,

    /// Ticks a thread stays blocked after `SYSCALL PRN`.
    #[serde(default = "MachineConfig::default_prn_block_ticks")]
    pub prn_block_ticks: u64,
}

impl MachineConfig {
    /// Returns the default memory capacity in words.
    fn default_memory_words() -> usize {
        defaults::MEMORY_WORDS
    }

    /// Returns the default user-mode protection boundary.
    fn default_protected_boundary() -> usize {
        defaults::PROTECTED_BOUNDARY
    }

    /// Returns the default thread table slot count.
    fn default_thread_slots() -> usize {
        defaults::THREAD_SLOTS
    }

    /// Returns the default `SYSCALL PRN` block length in ticks.
    fn default_prn_block_ticks() -> u64 {
        defaults::PRN_BLOCK_TICKS
    }
}

impl Default for MachineConfig {
    fn default() -> Self {
        Self {
            memory_words: defaults::MEMORY_WORDS,
            protected_boundary: defaults::PROTECTED_BOUNDARY,
            thread_slots: defaults::THREAD_SLOTS,
            prn_block_ticks: defaults::PRN_BLOCK_TICKS,
        }
    }
}

/// Watchdog safety-net configuration.
///
/// Both caps are external to program semantics: they exist to stop runaway
/// or livelocked programs, never to implement correct behavior.
#[derive(Debug, Clone, Deserialize)]
pub struct WatchdogConfig {
    /// Hard cap on total ticks; exceeding it halts the machine.
    #[serde(default = "WatchdogConfig::default_tick_limit")]
    pub tick_limit: u64,

    /// Soft cap on consecutive ticks at an unchanged PC; exceeding it evicts
    /// the current thread.
    #[serde(default = "WatchdogConfig::default_same_pc_limit")]
    pub same_pc_limit: u64,
}

impl WatchdogConfig {
    /// Returns the default global tick cap.
    fn default_tick_limit() -> u64 {
        defaults::TICK_LIMIT
    }

    /// Returns the default same-PC repeat cap.
    fn default_same_pc_limit() -> u64 {
        defaults::SAME_PC_LIMIT
    }
}

impl Default for WatchdogConfig {
    fn default() -> Self {
        Self {
            tick_limit: defaults::TICK_LIMIT,
            same_pc_limit: defaults::SAME_PC_LIMIT,
        }
    }
}
