//! Machine core (memory, cells, modes, threads, engine, scheduler).
//!
//! This module contains the execution core of the simulator. It coordinates:
//! 1. **Memory Space:** Flat tagged-cell storage with protection checks.
//! 2. **Machine:** The state container, tick engine, and thread scheduler.
//! 3. **Threads:** Thread states and the typed view over the in-memory table.

/// Tagged memory cell type (number or instruction text).
pub mod cell;

/// Machine state container, fetch-decode-execute engine, and scheduler.
pub mod machine;

/// Flat memory space with bounds and kernel/user protection checks.
pub mod memory;

/// Processor privilege modes.
pub mod mode;

/// Thread states and thread-table layout accessors.
pub mod thread;

pub use cell::Cell;
pub use machine::Machine;
pub use memory::MemorySpace;
pub use mode::Mode;
pub use thread::{ThreadSlot, ThreadSnapshot, ThreadState};
