//! Flat memory space with bounds and kernel/user protection checks.
//!
//! This module implements the single shared resource of the machine: an
//! addressable array of tagged cells. It enforces three rules on every
//! program-visible access:
//! 1. **Bounds:** The address must lie inside the configured capacity.
//! 2. **Protection:** In user mode, addresses below the protection boundary
//!    are off limits for both reads and writes.
//! 3. **Tagging:** An instruction-tagged cell is never interpreted as a
//!    number unless the requesting operation explicitly permits code-as-data
//!    access, and even then only if the text parses as an integer.
//!
//! The engine's own bookkeeping (control registers, thread table) goes
//! through the privileged `load_word`/`store_word` accessors, which skip the
//! mode check: that state lives below the boundary by design and its
//! maintenance is kernel work, not a program access.

use crate::common::{Fault, Word};
use crate::core::cell::Cell;
use crate::core::mode::Mode;

/// The machine's flat address space.
#[derive(Debug, Clone)]
pub struct MemorySpace {
    cells: Vec<Cell>,
    protected_boundary: usize,
}

impl MemorySpace {
    /// Creates a zero-filled memory space.
    ///
    /// # Arguments
    ///
    /// * `capacity` - Total number of addressable words.
    /// * `protected_boundary` - First address accessible from user mode.
    pub fn new(capacity: usize, protected_boundary: usize) -> Self {
        Self {
            cells: vec![Cell::default(); capacity],
            protected_boundary,
        }
    }

    /// Returns the total number of addressable words.
    pub fn capacity(&self) -> usize {
        self.cells.len()
    }

    /// Returns the first address accessible from user mode.
    pub fn protected_boundary(&self) -> usize {
        self.protected_boundary
    }

    /// Converts a word to a memory index, checking bounds.
    ///
    /// # Errors
    ///
    /// `Fault::OutOfBounds` for negative values and values at or beyond the
    /// capacity.
    pub fn index(&self, addr: Word) -> Result<usize, Fault> {
        if addr < 0 || addr as usize >= self.cells.len() {
            return Err(Fault::OutOfBounds {
                addr,
                capacity: self.cells.len(),
            });
        }
        Ok(addr as usize)
    }

    /// Checks the user-mode protection rule for an address.
    fn check_mode(&self, addr: usize, mode: Mode) -> Result<(), Fault> {
        if mode.is_user() && addr < self.protected_boundary {
            return Err(Fault::Protection { addr });
        }
        Ok(())
    }

    /// Reads a numeric value on behalf of an executing instruction.
    ///
    /// Bounds-checks the address, applies the mode/address-range rule, and
    /// enforces the cell tag: an instruction-tagged cell faults unless
    /// `allow_code` is set, in which case its text is parsed as an integer
    /// (an unparsable text still faults, never a silent zero).
    ///
    /// # Errors
    ///
    /// `Fault::OutOfBounds`, `Fault::Protection`, or `Fault::CodeAsData`.
    pub fn read(&self, addr: usize, mode: Mode, allow_code: bool) -> Result<Word, Fault> {
        let idx = self.index(addr as Word)?;
        self.check_mode(idx, mode)?;
        match &self.cells[idx] {
            Cell::Word(value) => Ok(*value),
            Cell::Code(text) if allow_code => text
                .trim()
                .parse()
                .map_err(|_| Fault::CodeAsData { addr: idx }),
            Cell::Code(_) => Err(Fault::CodeAsData { addr: idx }),
        }
    }

    /// Writes a numeric value on behalf of an executing instruction.
    ///
    /// Bounds- and mode-checks first; a failed write mutates nothing. The
    /// target cell is re-tagged as data regardless of what it held before.
    ///
    /// # Errors
    ///
    /// `Fault::OutOfBounds` or `Fault::Protection`.
    pub fn write(&mut self, addr: usize, value: Word, mode: Mode) -> Result<(), Fault> {
        let idx = self.index(addr as Word)?;
        self.check_mode(idx, mode)?;
        self.cells[idx] = Cell::Word(value);
        Ok(())
    }

    /// Privileged numeric read, used for engine bookkeeping.
    ///
    /// Skips the mode check but still enforces bounds and the cell tag.
    pub fn load_word(&self, addr: usize) -> Result<Word, Fault> {
        let idx = self.index(addr as Word)?;
        self.cells[idx]
            .as_word()
            .ok_or(Fault::CodeAsData { addr: idx })
    }

    /// Privileged numeric write, used for engine bookkeeping and loading.
    pub fn store_word(&mut self, addr: usize, value: Word) -> Result<(), Fault> {
        let idx = self.index(addr as Word)?;
        self.cells[idx] = Cell::Word(value);
        Ok(())
    }

    /// Privileged instruction-text write, used when loading a program image.
    pub fn store_code(&mut self, addr: usize, text: impl Into<String>) -> Result<(), Fault> {
        let idx = self.index(addr as Word)?;
        self.cells[idx] = Cell::code(text);
        Ok(())
    }

    /// Returns the cell at `addr`, if the address is in bounds.
    pub fn cell(&self, addr: usize) -> Option<&Cell> {
        self.cells.get(addr)
    }
}
