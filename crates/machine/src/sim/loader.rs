//! Text program image parser and memory population.
//!
//! A program image is a text listing with two delimited regions:
//!
//! ```text
//! Begin Data Section
//! 0 10        # address, then a decimal integer
//! 1 2000
//! End Data Section
//! Begin Instruction Section
//! 10 SET 7 1500   # address, then verbatim opcode-and-operands text
//! 11 HLT
//! End Instruction Section
//! ```
//!
//! `#` starts a comment; blank lines are ignored. Population order is part of
//! the contract: all data cells that do not collide with an instruction
//! address are written first, then all instruction cells in ascending address
//! order, so instructions take priority over data at the same address.

use crate::common::Word;
use crate::core::machine::Machine;
use std::collections::BTreeMap;
use std::path::Path;
use thiserror::Error;

/// Section marker lines recognized in a program image.
mod marker {
    /// Opens the data region.
    pub const DATA_BEGIN: &str = "Begin Data Section";
    /// Closes the data region.
    pub const DATA_END: &str = "End Data Section";
    /// Opens the instruction region.
    pub const INSTRUCTION_BEGIN: &str = "Begin Instruction Section";
    /// Closes the instruction region.
    pub const INSTRUCTION_END: &str = "End Instruction Section";
}

/// A load-time failure.
///
/// These prevent the machine from starting at all and are reported before
/// any tick runs, distinctly from runtime faults.
#[derive(Debug, Error)]
pub enum LoadError {
    /// The image file could not be read.
    #[error("cannot read program image: {0}")]
    Io(#[from] std::io::Error),

    /// A section begin/end marker is missing or out of order.
    #[error("{0} section not properly marked")]
    MissingSection(&'static str),

    /// A line inside a section does not follow the `<address> <rest>` form.
    #[error("malformed line {line}: {text:?}")]
    Malformed {
        /// One-based line number in the image.
        line: usize,
        /// The offending line text.
        text: String,
    },

    /// The image addresses a cell beyond the machine's capacity.
    #[error("image address {addr} out of range (capacity {capacity})")]
    AddressOutOfRange {
        /// The offending address.
        addr: usize,
        /// The machine's memory capacity in words.
        capacity: usize,
    },
}

/// Parser state while walking the image line by line.
#[derive(Clone, Copy, PartialEq, Eq)]
enum Section {
    Preamble,
    Data,
    BetweenSections,
    Instructions,
    Done,
}

/// A parsed program image, ready to populate a machine.
#[derive(Debug, Clone, Default)]
pub struct ProgramImage {
    data: Vec<(usize, Word)>,
    instructions: BTreeMap<usize, String>,
}

impl ProgramImage {
    /// Parses an image from source text.
    ///
    /// # Errors
    ///
    /// [`LoadError::MissingSection`] when a marker is absent or out of order,
    /// [`LoadError::Malformed`] for a bad line inside a section.
    pub fn parse_str(source: &str) -> Result<Self, LoadError> {
        let mut image = Self::default();
        let mut section = Section::Preamble;

        for (index, raw_line) in source.lines().enumerate() {
            let line_no = index + 1;
            if raw_line.contains(marker::DATA_BEGIN) && section == Section::Preamble {
                section = Section::Data;
                continue;
            }
            if raw_line.contains(marker::DATA_END) && section == Section::Data {
                section = Section::BetweenSections;
                continue;
            }
            if raw_line.contains(marker::INSTRUCTION_BEGIN) && section == Section::BetweenSections {
                section = Section::Instructions;
                continue;
            }
            if raw_line.contains(marker::INSTRUCTION_END) && section == Section::Instructions {
                section = Section::Done;
                continue;
            }

            let line = raw_line.split('#').next().unwrap_or("").trim();
            if line.is_empty() {
                continue;
            }

            match section {
                Section::Data => {
                    let (addr, rest) = split_address(line, line_no)?;
                    let value: Word = rest.trim().parse().map_err(|_| LoadError::Malformed {
                        line: line_no,
                        text: raw_line.to_string(),
                    })?;
                    image.data.push((addr, value));
                }
                Section::Instructions => {
                    let (addr, rest) = split_address(line, line_no)?;
                    let text = rest.trim();
                    if text.is_empty() {
                        return Err(LoadError::Malformed {
                            line: line_no,
                            text: raw_line.to_string(),
                        });
                    }
                    let _ = image.instructions.insert(addr, text.to_string());
                }
                // Content outside the two sections is ignored, as are the
                // markers' surroundings.
                Section::Preamble | Section::BetweenSections | Section::Done => {}
            }
        }

        match section {
            Section::Preamble | Section::Data => Err(LoadError::MissingSection("Data")),
            Section::BetweenSections | Section::Instructions => {
                Err(LoadError::MissingSection("Instruction"))
            }
            Section::Done => Ok(image),
        }
    }

    /// Reads and parses an image file.
    ///
    /// # Errors
    ///
    /// [`LoadError::Io`] on read failure, plus everything
    /// [`Self::parse_str`] reports.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, LoadError> {
        let source = std::fs::read_to_string(path)?;
        Self::parse_str(&source)
    }

    /// Returns the parsed data cells in listing order.
    pub fn data(&self) -> &[(usize, Word)] {
        &self.data
    }

    /// Returns the parsed instruction cells, keyed by address.
    pub fn instructions(&self) -> &BTreeMap<usize, String> {
        &self.instructions
    }

    /// Populates a machine's memory from this image.
    ///
    /// Data cells that do not collide with an instruction address are written
    /// first, then instruction cells in ascending address order.
    ///
    /// # Errors
    ///
    /// [`LoadError::AddressOutOfRange`] when the image addresses a cell
    /// beyond the machine's capacity; the machine should be discarded in
    /// that case.
    pub fn load_into(&self, machine: &mut Machine) -> Result<(), LoadError> {
        // store_data/store_code only bounds-check, so any fault here is an
        // out-of-range image address.
        let capacity = machine.capacity();
        for &(addr, value) in &self.data {
            if self.instructions.contains_key(&addr) {
                continue;
            }
            machine
                .store_data(addr, value)
                .map_err(|_| LoadError::AddressOutOfRange { addr, capacity })?;
        }
        for (&addr, text) in &self.instructions {
            machine
                .store_code(addr, text.clone())
                .map_err(|_| LoadError::AddressOutOfRange { addr, capacity })?;
        }
        Ok(())
    }
}

/// Splits a section line into its leading address and the rest of the line.
fn split_address(line: &str, line_no: usize) -> Result<(usize, &str), LoadError> {
    let mut parts = line.splitn(2, char::is_whitespace);
    let addr_token = parts.next().unwrap_or("");
    let rest = parts.next().unwrap_or("");
    let addr = addr_token.parse().map_err(|_| LoadError::Malformed {
        line: line_no,
        text: line.to_string(),
    })?;
    Ok((addr, rest))
}
