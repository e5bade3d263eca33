//! Common types and constants used throughout the simulator.
//!
//! This module provides fundamental building blocks shared across all
//! components. It includes:
//! 1. **Error Handling:** The machine-fatal `Fault` type and decode errors.
//! 2. **Control Registers:** Named addresses for the memory-resident registers.

/// Error types for runtime faults and instruction decoding.
pub mod error;

/// Memory-resident control register addresses.
pub mod reg;

pub use error::{DecodeError, Fault};

/// One numeric memory cell value.
pub type Word = i64;
