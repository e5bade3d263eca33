//! Processor privilege modes.
//!
//! The machine runs in one of two modes. Kernel mode may touch the whole
//! address space; user mode is confined to addresses at or above the
//! protection boundary. Only the `USER` opcode lowers privilege, and every
//! scheduler-driven control transfer raises it back to kernel.

/// Machine privilege mode.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Mode {
    /// Kernel mode: unrestricted access to the whole address space.
    Kernel = 0,

    /// User mode: access below the protection boundary faults.
    User = 1,
}

impl Mode {
    /// Returns `true` in user mode.
    pub fn is_user(self) -> bool {
        self == Mode::User
    }

    /// Returns the human-readable name of the mode.
    pub fn name(&self) -> &'static str {
        match self {
            Mode::Kernel => "Kernel",
            Mode::User => "User",
        }
    }
}

impl std::fmt::Display for Mode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}
