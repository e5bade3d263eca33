//! Thread states and thread-table layout accessors.
//!
//! The thread table is an array of fixed-stride control blocks stored inside
//! the same address space as program data, at `base + (id - 1) * 20`. This
//! module provides:
//! 1. **States:** The thread lifecycle enumeration and its table encoding.
//! 2. **Layout:** A typed slot accessor that keeps the stride and field
//!    offset arithmetic out of the scheduling logic while preserving the
//!    in-memory layout, so raw memory dumps stay meaningful.
//! 3. **Snapshots:** A plain-data view of one slot for observers.

use crate::common::Word;

/// Words occupied by one thread-table slot.
///
/// Only the first six fields are used; offsets +10..+17 are reserved for
/// saved general registers, which this machine does not have.
pub const SLOT_STRIDE: usize = 20;

/// Field offsets within a thread-table slot.
pub mod field {
    /// Thread id.
    pub const ID: usize = 0;
    /// Tick count at which the thread first became schedulable.
    pub const START_TIME: usize = 1;
    /// Total-instruction counter captured at the last context save.
    pub const INSTRUCTION_COUNT: usize = 2;
    /// Thread state (see [`super::ThreadState`]).
    pub const STATE: usize = 3;
    /// Saved program counter.
    pub const PC: usize = 4;
    /// Saved stack pointer.
    pub const SP: usize = 5;
}

/// Thread lifecycle state, as encoded in the table.
///
/// `Blocked` is part of the table encoding but is never produced by the
/// engine: blocking is modeled as a machine-level tick countdown instead of
/// a thread-state transition.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ThreadState {
    /// Slot unused or thread terminated.
    Inactive = 0,
    /// Eligible for scheduling.
    Ready = 1,
    /// Currently executing.
    Running = 2,
    /// Declared but unused; kept for table-encoding compatibility.
    Blocked = 3,
}

impl ThreadState {
    /// Decodes a table word into a state.
    ///
    /// # Returns
    ///
    /// The corresponding state, or `None` for values outside the encoding.
    pub fn from_word(value: Word) -> Option<Self> {
        match value {
            0 => Some(Self::Inactive),
            1 => Some(Self::Ready),
            2 => Some(Self::Running),
            3 => Some(Self::Blocked),
            _ => None,
        }
    }

    /// Returns the table encoding of this state.
    pub fn to_word(self) -> Word {
        self as Word
    }

    /// Returns the human-readable name of the state.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Inactive => "inactive",
            Self::Ready => "ready",
            Self::Running => "running",
            Self::Blocked => "blocked",
        }
    }
}

impl std::fmt::Display for ThreadState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Address calculator for one thread-table slot.
#[derive(Clone, Copy, Debug)]
pub struct ThreadSlot {
    base: usize,
}

impl ThreadSlot {
    /// Creates the slot view for thread `id` in a table at `table_base`.
    ///
    /// Ids are 1-based; the computed addresses are not bounds-checked here,
    /// the memory space rejects out-of-range accesses when they happen.
    pub fn new(table_base: usize, id: usize) -> Self {
        Self {
            base: table_base + id.saturating_sub(1) * SLOT_STRIDE,
        }
    }

    /// Address of the thread id field.
    pub fn id_addr(self) -> usize {
        self.base + field::ID
    }

    /// Address of the start-time field.
    pub fn start_time_addr(self) -> usize {
        self.base + field::START_TIME
    }

    /// Address of the saved instruction-count field.
    pub fn instruction_count_addr(self) -> usize {
        self.base + field::INSTRUCTION_COUNT
    }

    /// Address of the state field.
    pub fn state_addr(self) -> usize {
        self.base + field::STATE
    }

    /// Address of the saved program counter field.
    pub fn pc_addr(self) -> usize {
        self.base + field::PC
    }

    /// Address of the saved stack pointer field.
    pub fn sp_addr(self) -> usize {
        self.base + field::SP
    }
}

/// Plain-data view of one thread-table slot.
///
/// Produced by [`crate::Machine::thread_snapshot`] for dumps and tests; the
/// state is kept raw so observers can render out-of-encoding values too.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ThreadSnapshot {
    /// Thread id field.
    pub id: Word,
    /// Tick count at which the thread first became schedulable.
    pub start_time: Word,
    /// Total-instruction counter at the last context save.
    pub instruction_count: Word,
    /// Raw state word; decode with [`ThreadState::from_word`].
    pub state: Word,
    /// Saved program counter.
    pub pc: Word,
    /// Saved stack pointer.
    pub sp: Word,
}
