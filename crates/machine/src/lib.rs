//! Cooperative-multithreading CPU and mini-kernel simulator library.
//!
//! This crate implements a small instruction-set simulator that also emulates a
//! minimal operating-system kernel. It provides the following:
//! 1. **Memory:** A flat address space of tagged cells (numbers or instruction
//!    text) with bounds and kernel/user protection checks.
//! 2. **Engine:** The per-tick fetch-decode-execute loop, including the
//!    watchdog that catches runaway and livelocked programs.
//! 3. **Scheduler:** A memory-resident thread table with context save/restore
//!    and deterministic round-robin selection of ready threads.
//! 4. **ISA:** Tokenizing and decoding of the text instruction format.
//! 5. **Simulation:** Program image loader, configuration, and statistics.
//!
//! All "registers" of the machine (program counter, stack pointer, thread
//! bookkeeping) are themselves addressable memory cells, so a program can
//! observe and, in kernel mode, manipulate its own control state.
//!
//! # Examples
//!
//! Assemble a tiny program, load it, and run it to completion:
//!
//! ```
//! use coopsim_core::{Config, Machine, ProgramImage};
//!
//! let source = "\
//! Begin Data Section
//! 0 10      # initial program counter
//! 1 2000    # initial stack pointer
//! End Data Section
//! Begin Instruction Section
//! 10 SET 7 1500
//! 11 CPY 1500 1501
//! 12 HLT
//! End Instruction Section
//! ";
//!
//! let image = ProgramImage::parse_str(source).unwrap();
//! let mut machine = Machine::new(&Config::default());
//! image.load_into(&mut machine).unwrap();
//!
//! while !machine.is_halted() {
//!     machine.tick().unwrap();
//! }
//! assert_eq!(machine.read_data(1501).unwrap(), 7);
//! ```

/// Common types and constants (errors, control-register addresses).
pub mod common;
/// Simulator configuration (defaults and hierarchical config structures).
pub mod config;
/// Machine core (memory space, cells, modes, threads, engine, scheduler).
pub mod core;
/// Instruction set (opcode type, text decoding, display).
pub mod isa;
/// Program image loading.
pub mod sim;
/// Simulation statistics collection and reporting.
pub mod stats;

/// Root configuration type; use `Config::default()` or deserialize from JSON.
pub use crate::config::Config;
/// Machine-fatal runtime fault type.
pub use crate::common::error::Fault;
/// Main machine type; holds memory, mode, watchdog, and stats.
pub use crate::core::machine::Machine;
/// Parsed program image; populates a machine before the first tick.
pub use crate::sim::loader::{LoadError, ProgramImage};
