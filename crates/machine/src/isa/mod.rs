//! Instruction set definitions and text decoding.
//!
//! The instruction format is plain text: a mnemonic followed by
//! space-delimited operands, each a memory address or a literal integer.
//! This module provides:
//! 1. **Instruction Type:** One variant per opcode, with typed operands.
//! 2. **Decoding:** Tokenizing instruction-cell text into an `Instruction`.
//! 3. **Display:** Rendering an instruction back to its canonical text.

/// Tokenizer and decoder for the text instruction format.
pub mod decode;

/// Opcode type and canonical-text rendering.
pub mod instruction;

pub use decode::decode;
pub use instruction::Instruction;
