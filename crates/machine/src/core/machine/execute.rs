//! Opcode dispatch.
//!
//! One `match` arm per opcode. Every arm either completes fully or faults
//! before its first side effect is observable from user mode; no instruction
//! is ever partially applied with respect to the watchdog or the scheduler.
//!
//! Arms that assign the PC themselves return [`Flow::Explicit`] so the engine
//! skips the auto-increment, matching the opcode table: control transfers own
//! their PC, everything else advances by one.
//!
//! Arithmetic is two's-complement wrapping; overflow is never a fault.

use super::Machine;
use crate::common::{Fault, Word};
use crate::core::mode::Mode;
use crate::isa::Instruction;

/// How an instruction left the program counter.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Flow {
    /// The engine auto-increments PC and the instruction register.
    Auto,
    /// The instruction assigned PC itself.
    Explicit,
}

impl Machine {
    /// Executes one decoded instruction.
    ///
    /// `pc` is the address the instruction was fetched from; `CALL` needs it
    /// for the return address and `SYSCALL YIELD` for its resume point.
    pub(crate) fn dispatch(&mut self, instruction: &Instruction, pc: usize) -> Result<Flow, Fault> {
        match *instruction {
            Instruction::Set { value, addr } => {
                self.mem.write(addr, value, self.mode)?;
                Ok(Flow::Auto)
            }
            Instruction::Cpy { src, dst } => {
                let value = self.mem.read(src, self.mode, true)?;
                self.mem.write(dst, value, self.mode)?;
                Ok(Flow::Auto)
            }
            Instruction::Cpyi { src, dst } => {
                let indirect = self.mem.read(src, self.mode, true)?;
                let source = self.mem.index(indirect)?;
                let value = self.mem.read(source, self.mode, true)?;
                self.mem.write(dst, value, self.mode)?;
                Ok(Flow::Auto)
            }
            Instruction::Add { addr, value } => {
                let current = self.mem.read(addr, self.mode, true)?;
                self.mem
                    .write(addr, current.wrapping_add(value), self.mode)?;
                Ok(Flow::Auto)
            }
            Instruction::Addi { dst, src } => {
                let augend = self.mem.read(dst, self.mode, true)?;
                let addend = self.mem.read(src, self.mode, true)?;
                self.mem
                    .write(dst, augend.wrapping_add(addend), self.mode)?;
                Ok(Flow::Auto)
            }
            Instruction::Subi { a, b } => {
                let minuend = self.mem.read(a, self.mode, true)?;
                let subtrahend = self.mem.read(b, self.mode, true)?;
                // Destination is the second operand: mem[b] = mem[a] - mem[b].
                self.mem
                    .write(b, minuend.wrapping_sub(subtrahend), self.mode)?;
                Ok(Flow::Auto)
            }
            Instruction::Jif { addr, target } => {
                let value = self.mem.read(addr, self.mode, true)?;
                if value <= 0 {
                    self.persist_context()?;
                    self.set_pc(target as Word)?;
                    Ok(Flow::Explicit)
                } else {
                    Ok(Flow::Auto)
                }
            }
            Instruction::Push { addr } => {
                let value = self.mem.read(addr, self.mode, true)?;
                let sp = self.sp()?;
                let top = self.mem.index(sp)?;
                self.mem.write(top, value, self.mode)?;
                self.set_sp(sp - 1)?;
                Ok(Flow::Auto)
            }
            Instruction::Pop { addr } => {
                let sp = self.sp()? + 1;
                self.set_sp(sp)?;
                let top = self.mem.index(sp)?;
                let value = self.mem.read(top, self.mode, true)?;
                self.mem.write(addr, value, self.mode)?;
                Ok(Flow::Auto)
            }
            Instruction::Call { target } => {
                let sp = self.sp()?;
                let top = self.mem.index(sp)?;
                self.mem.write(top, pc as Word + 1, self.mode)?;
                self.set_sp(sp - 1)?;
                self.persist_context()?;
                self.set_pc(target as Word)?;
                Ok(Flow::Explicit)
            }
            Instruction::Ret => {
                let sp = self.sp()? + 1;
                self.set_sp(sp)?;
                let top = self.mem.index(sp)?;
                let return_addr = self.mem.read(top, self.mode, true)?;
                self.persist_context()?;
                self.set_pc(return_addr)?;
                Ok(Flow::Explicit)
            }
            Instruction::Hlt | Instruction::SyscallHlt => {
                self.terminate_current_thread()?;
                Ok(Flow::Explicit)
            }
            Instruction::User { addr } => {
                // The mode drops first, so the operand read itself is already
                // subject to user-mode protection.
                self.mode = Mode::User;
                let target = self.mem.read(addr, self.mode, true)?;
                self.persist_context()?;
                self.set_pc(target)?;
                Ok(Flow::Explicit)
            }
            Instruction::SyscallPrn { addr } => {
                let value = self.mem.read(addr, self.mode, true)?;
                println!("Output: {value}");
                self.output.push(value);
                self.blocked_ticks = self.prn_block_ticks;
                Ok(Flow::Auto)
            }
            Instruction::SyscallYield => {
                self.yield_current(pc)?;
                Ok(Flow::Explicit)
            }
        }
    }
}
