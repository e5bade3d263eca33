//! Fault and decode error definitions.
//!
//! This module defines the error handling for the simulator. It provides:
//! 1. **Runtime Faults:** Every fault a running machine can take. All of them
//!    are machine-fatal: the engine logs the fault, sets the halted flag, and
//!    never attempts partial recovery.
//! 2. **Decode Errors:** Failures to turn an instruction cell's text into an
//!    executable operation, carried inside `Fault::Decode` together with the
//!    program counter at which they occurred.

use crate::common::Word;
use thiserror::Error;

/// A machine-fatal runtime fault.
///
/// Faults are terminal for the whole machine, not just the offending thread:
/// once any variant is raised the machine halts and stays halted. The two
/// thread-fatal conditions (fetching a non-instruction cell, watchdog
/// eviction) are handled inside the engine and never surface as a `Fault`.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum Fault {
    /// A memory access (including PC or SP assignment) left the address space.
    #[error("memory access {addr} out of bounds (capacity {capacity})")]
    OutOfBounds {
        /// The offending address, as the raw word that produced it.
        addr: Word,
        /// Memory capacity in words.
        capacity: usize,
    },

    /// A user-mode access below the protected boundary.
    #[error("memory protection violation: user mode tried to access address {addr}")]
    Protection {
        /// The address the user-mode program tried to touch.
        addr: usize,
    },

    /// An instruction-tagged cell was interpreted as a number.
    ///
    /// Raised either because the operation did not permit code-as-data access
    /// at all, or because it did and the instruction text does not parse as
    /// an integer.
    #[error("instruction cell at address {addr} cannot be read as data")]
    CodeAsData {
        /// The address of the instruction-tagged cell.
        addr: usize,
    },

    /// The instruction text at the program counter failed to decode.
    #[error("cannot decode instruction at {pc}: {source}")]
    Decode {
        /// Program counter of the malformed instruction.
        pc: usize,
        /// The underlying decode failure.
        #[source]
        source: DecodeError,
    },

    /// The global watchdog tick cap was exceeded.
    #[error("watchdog: global tick limit of {limit} exceeded")]
    TickLimit {
        /// The configured hard cap on total ticks.
        limit: u64,
    },
}

/// A failure to decode an instruction cell's text.
///
/// Operands are always space-delimited memory addresses or literal integers;
/// anything else, a wrong operand count, or an unknown opcode is fatal.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum DecodeError {
    /// The instruction cell is blank.
    #[error("empty instruction")]
    Empty,

    /// The opcode mnemonic is not part of the instruction set.
    #[error("unknown opcode {0:?}")]
    UnknownOpcode(String),

    /// The `SYSCALL` variant is not one of `PRN`, `HLT`, or `YIELD`.
    #[error("unknown syscall {0:?}")]
    UnknownSyscall(String),

    /// The opcode was given the wrong number of operands.
    #[error("{opcode} expects {expected} operand(s), found {found}")]
    OperandCount {
        /// The opcode mnemonic.
        opcode: &'static str,
        /// The number of operands the opcode takes.
        expected: usize,
        /// The number of operands present in the text.
        found: usize,
    },

    /// An operand is not a valid integer.
    #[error("operand {0:?} is not an integer")]
    BadInteger(String),

    /// An address operand is negative.
    #[error("address operand {0} is negative")]
    NegativeAddress(Word),
}
