//! Tokenizer and decoder for the text instruction format.
//!
//! Instruction cells hold a mnemonic followed by space-delimited operands.
//! Decoding is strict: an unknown mnemonic, a wrong operand count, or a
//! non-integer operand is an error, which the engine treats as machine-fatal.

use crate::common::{DecodeError, Word};
use crate::isa::instruction::Instruction;

/// Parses one operand token as a literal word.
fn word(token: &str) -> Result<Word, DecodeError> {
    token
        .parse()
        .map_err(|_| DecodeError::BadInteger(token.to_string()))
}

/// Parses one operand token as a memory address.
fn addr(token: &str) -> Result<usize, DecodeError> {
    let value = word(token)?;
    if value < 0 {
        return Err(DecodeError::NegativeAddress(value));
    }
    Ok(value as usize)
}

/// Checks that an opcode received exactly the operands it takes.
fn arity(opcode: &'static str, operands: &[&str], expected: usize) -> Result<(), DecodeError> {
    if operands.len() == expected {
        Ok(())
    } else {
        Err(DecodeError::OperandCount {
            opcode,
            expected,
            found: operands.len(),
        })
    }
}

/// Decodes one instruction cell's text.
///
/// # Errors
///
/// Any malformed operand or unknown opcode; see [`DecodeError`].
pub fn decode(text: &str) -> Result<Instruction, DecodeError> {
    let mut tokens = text.split_whitespace();
    let Some(mnemonic) = tokens.next() else {
        return Err(DecodeError::Empty);
    };
    let operands: Vec<&str> = tokens.collect();

    match mnemonic {
        "SET" => {
            arity("SET", &operands, 2)?;
            Ok(Instruction::Set {
                value: word(operands[0])?,
                addr: addr(operands[1])?,
            })
        }
        "CPY" => {
            arity("CPY", &operands, 2)?;
            Ok(Instruction::Cpy {
                src: addr(operands[0])?,
                dst: addr(operands[1])?,
            })
        }
        "CPYI" => {
            arity("CPYI", &operands, 2)?;
            Ok(Instruction::Cpyi {
                src: addr(operands[0])?,
                dst: addr(operands[1])?,
            })
        }
        "ADD" => {
            arity("ADD", &operands, 2)?;
            Ok(Instruction::Add {
                addr: addr(operands[0])?,
                value: word(operands[1])?,
            })
        }
        "ADDI" => {
            arity("ADDI", &operands, 2)?;
            Ok(Instruction::Addi {
                dst: addr(operands[0])?,
                src: addr(operands[1])?,
            })
        }
        "SUBI" => {
            arity("SUBI", &operands, 2)?;
            Ok(Instruction::Subi {
                a: addr(operands[0])?,
                b: addr(operands[1])?,
            })
        }
        "JIF" => {
            arity("JIF", &operands, 2)?;
            Ok(Instruction::Jif {
                addr: addr(operands[0])?,
                target: addr(operands[1])?,
            })
        }
        "PUSH" => {
            arity("PUSH", &operands, 1)?;
            Ok(Instruction::Push {
                addr: addr(operands[0])?,
            })
        }
        "POP" => {
            arity("POP", &operands, 1)?;
            Ok(Instruction::Pop {
                addr: addr(operands[0])?,
            })
        }
        "CALL" => {
            arity("CALL", &operands, 1)?;
            Ok(Instruction::Call {
                target: addr(operands[0])?,
            })
        }
        "RET" => {
            arity("RET", &operands, 0)?;
            Ok(Instruction::Ret)
        }
        "HLT" => {
            arity("HLT", &operands, 0)?;
            Ok(Instruction::Hlt)
        }
        "USER" => {
            arity("USER", &operands, 1)?;
            Ok(Instruction::User {
                addr: addr(operands[0])?,
            })
        }
        "SYSCALL" => {
            let Some((&variant, rest)) = operands.split_first() else {
                return Err(DecodeError::OperandCount {
                    opcode: "SYSCALL",
                    expected: 1,
                    found: 0,
                });
            };
            match variant {
                "PRN" => {
                    arity("SYSCALL PRN", rest, 1)?;
                    Ok(Instruction::SyscallPrn {
                        addr: addr(rest[0])?,
                    })
                }
                "HLT" => {
                    arity("SYSCALL HLT", rest, 0)?;
                    Ok(Instruction::SyscallHlt)
                }
                "YIELD" => {
                    arity("SYSCALL YIELD", rest, 0)?;
                    Ok(Instruction::SyscallYield)
                }
                other => Err(DecodeError::UnknownSyscall(other.to_string())),
            }
        }
        other => Err(DecodeError::UnknownOpcode(other.to_string())),
    }
}
