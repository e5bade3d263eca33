//! Opcode type and canonical-text rendering.

use crate::common::Word;
use std::fmt;

/// One decoded instruction.
///
/// Operands named `addr`, `src`, `dst`, `a`, `b` are memory addresses;
/// `value` is a literal word and `target` a literal instruction address.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Instruction {
    /// `SET v a` — store the literal `v` at address `a`.
    Set {
        /// Literal value to store.
        value: Word,
        /// Destination address.
        addr: usize,
    },
    /// `CPY a b` — copy the value at `a` to `b`.
    Cpy {
        /// Source address.
        src: usize,
        /// Destination address.
        dst: usize,
    },
    /// `CPYI a b` — copy the value at the address stored in `a` to `b`.
    Cpyi {
        /// Address holding the source address.
        src: usize,
        /// Destination address.
        dst: usize,
    },
    /// `ADD a v` — add the literal `v` to the value at `a`.
    Add {
        /// Address to modify.
        addr: usize,
        /// Literal addend.
        value: Word,
    },
    /// `ADDI a b` — add the value at `b` to the value at `a`.
    Addi {
        /// Destination address (augend).
        dst: usize,
        /// Source address (addend).
        src: usize,
    },
    /// `SUBI a b` — store `mem[a] - mem[b]` at `b` (destination is `b`).
    Subi {
        /// Minuend address.
        a: usize,
        /// Subtrahend and destination address.
        b: usize,
    },
    /// `JIF a t` — jump to `t` if the value at `a` is less than or equal to zero.
    Jif {
        /// Condition address.
        addr: usize,
        /// Jump target.
        target: usize,
    },
    /// `PUSH a` — push the value at `a` onto the stack.
    Push {
        /// Source address.
        addr: usize,
    },
    /// `POP a` — pop the top of the stack into `a`.
    Pop {
        /// Destination address.
        addr: usize,
    },
    /// `CALL t` — push the return address and jump to `t`.
    Call {
        /// Call target.
        target: usize,
    },
    /// `RET` — pop the return address and jump to it.
    Ret,
    /// `HLT` — terminate the current thread.
    Hlt,
    /// `USER a` — drop to user mode and jump to the address stored at `a`.
    User {
        /// Address holding the user-mode entry point.
        addr: usize,
    },
    /// `SYSCALL PRN a` — print the value at `a` and block for the configured
    /// number of ticks.
    SyscallPrn {
        /// Address of the value to print.
        addr: usize,
    },
    /// `SYSCALL HLT` — terminate the current thread.
    SyscallHlt,
    /// `SYSCALL YIELD` — give up the remainder of the schedule slice.
    SyscallYield,
}

impl Instruction {
    /// Returns the opcode mnemonic.
    pub fn mnemonic(&self) -> &'static str {
        match self {
            Self::Set { .. } => "SET",
            Self::Cpy { .. } => "CPY",
            Self::Cpyi { .. } => "CPYI",
            Self::Add { .. } => "ADD",
            Self::Addi { .. } => "ADDI",
            Self::Subi { .. } => "SUBI",
            Self::Jif { .. } => "JIF",
            Self::Push { .. } => "PUSH",
            Self::Pop { .. } => "POP",
            Self::Call { .. } => "CALL",
            Self::Ret => "RET",
            Self::Hlt => "HLT",
            Self::User { .. } => "USER",
            Self::SyscallPrn { .. } | Self::SyscallHlt | Self::SyscallYield => "SYSCALL",
        }
    }
}

impl fmt::Display for Instruction {
    /// Renders the canonical text form, suitable for re-decoding.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Set { value, addr } => write!(f, "SET {value} {addr}"),
            Self::Cpy { src, dst } => write!(f, "CPY {src} {dst}"),
            Self::Cpyi { src, dst } => write!(f, "CPYI {src} {dst}"),
            Self::Add { addr, value } => write!(f, "ADD {addr} {value}"),
            Self::Addi { dst, src } => write!(f, "ADDI {dst} {src}"),
            Self::Subi { a, b } => write!(f, "SUBI {a} {b}"),
            Self::Jif { addr, target } => write!(f, "JIF {addr} {target}"),
            Self::Push { addr } => write!(f, "PUSH {addr}"),
            Self::Pop { addr } => write!(f, "POP {addr}"),
            Self::Call { target } => write!(f, "CALL {target}"),
            Self::Ret => write!(f, "RET"),
            Self::Hlt => write!(f, "HLT"),
            Self::User { addr } => write!(f, "USER {addr}"),
            Self::SyscallPrn { addr } => write!(f, "SYSCALL PRN {addr}"),
            Self::SyscallHlt => write!(f, "SYSCALL HLT"),
            Self::SyscallYield => write!(f, "SYSCALL YIELD"),
        }
    }
}
