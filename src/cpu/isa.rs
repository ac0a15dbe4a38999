//! Instruction set: the six opcode byte values and their decoding.
//!
//! The encoding is an 8-bit opcode followed by a fixed, opcode-determined
//! sequence of 8-bit or 16-bit big-endian operands (see `core::Cpu::execute`
//! for the operand order of each instruction). Opcode values are fixed
//! constants; there is no versioning.

use crate::error::CpuError;

/// The closed set of instruction opcodes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum Opcode {
    /// Move a 16-bit literal into a register.
    MovLitReg = 0x10,
    /// Copy one register into another.
    MovRegReg = 0x11,
    /// Store a register to a 16-bit memory address.
    MovRegMem = 0x12,
    /// Load a register from a 16-bit memory address.
    MovMemReg = 0x13,
    /// Add two registers into `acc` (wrapping at 16 bits).
    AddRegReg = 0x14,
    /// Jump to an address when a literal differs from `acc`.
    JmpNotEql = 0x15,
}

impl Opcode {
    /// Assembly-style mnemonic, used for tracing and diagnostics.
    pub fn mnemonic(self) -> &'static str {
        match self {
            Opcode::MovLitReg => "MOV_LIT_REG",
            Opcode::MovRegReg => "MOV_REG_REG",
            Opcode::MovRegMem => "MOV_REG_MEM",
            Opcode::MovMemReg => "MOV_MEM_REG",
            Opcode::AddRegReg => "ADD_REG_REG",
            Opcode::JmpNotEql => "JMP_NOT_EQL",
        }
    }
}

impl TryFrom<u8> for Opcode {
    type Error = CpuError;

    fn try_from(byte: u8) -> Result<Self, CpuError> {
        match byte {
            0x10 => Ok(Opcode::MovLitReg),
            0x11 => Ok(Opcode::MovRegReg),
            0x12 => Ok(Opcode::MovRegMem),
            0x13 => Ok(Opcode::MovMemReg),
            0x14 => Ok(Opcode::AddRegReg),
            0x15 => Ok(Opcode::JmpNotEql),
            other => Err(CpuError::UnknownInstruction(other)),
        }
    }
}
