/*!
error.rs - Crate-wide error type for the CPU engine.

Two conditions are reportable failures of the engine proper: a register
name outside the fixed register table, and an opcode byte outside the
instruction set. Both carry the offending value so callers can surface it.

The third variant, `OutOfBounds`, is the deterministic policy chosen for
byte-store accesses past the end of a buffer: every memory and register-bank
access is checked, and a bad offset fails with the offset and buffer length
rather than panicking.
*/

use thiserror::Error;

/// Errors surfaced by register access, instruction fetch, and execution.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum CpuError {
    /// Register name not present in the fixed register table.
    #[error("no such register: {0}")]
    UnknownRegister(String),

    /// Opcode byte outside the instruction set.
    #[error("unknown instruction encountered: {0:#04x}")]
    UnknownInstruction(u8),

    /// Byte-store access past the end of the underlying buffer.
    #[error("access at offset {addr:#06x} out of bounds for {len}-byte buffer")]
    OutOfBounds { addr: usize, len: usize },
}

/// Crate-wide result alias.
pub type Result<T> = std::result::Result<T, CpuError>;
