//! Tagged memory cell type.
//!
//! Every address holds either a number or instruction text. The tag is
//! derived from the last write, not fixed per address: overwriting an
//! instruction-tagged cell with a number silently reclassifies it as data,
//! which enables self-modifying code at the cost of destroying the original
//! instruction. Distinct read-as-data and read-as-code accessors make the
//! code/data coexistence rule an explicit, checkable contract.

use crate::common::Word;
use std::fmt;

/// One memory cell: a numeric word or a line of instruction text.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Cell {
    /// A numeric value.
    Word(Word),
    /// Verbatim opcode-and-operands text.
    Code(String),
}

impl Cell {
    /// Creates an instruction-tagged cell from text.
    pub fn code(text: impl Into<String>) -> Self {
        Self::Code(text.into())
    }

    /// Returns `true` if this cell currently holds instruction text.
    pub fn is_code(&self) -> bool {
        matches!(self, Self::Code(_))
    }

    /// Reads the cell as data.
    ///
    /// # Returns
    ///
    /// The numeric value, or `None` for an instruction-tagged cell.
    pub fn as_word(&self) -> Option<Word> {
        match self {
            Self::Word(value) => Some(*value),
            Self::Code(_) => None,
        }
    }

    /// Reads the cell as code.
    ///
    /// # Returns
    ///
    /// The instruction text, or `None` for a numeric cell.
    pub fn as_code(&self) -> Option<&str> {
        match self {
            Self::Word(_) => None,
            Self::Code(text) => Some(text),
        }
    }
}

impl Default for Cell {
    /// Fresh memory reads as the number zero.
    fn default() -> Self {
        Self::Word(0)
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Word(value) => write!(f, "{value}"),
            Self::Code(text) => write!(f, "{text}"),
        }
    }
}
