/*!
registers.rs - Fixed register table and the CPU-owned register bank.

Overview
========
`RegisterFile` is the single owner of the CPU's architectural registers. The
register namespace is the fixed 10-name table below; each register is a
16-bit big-endian value in a 20-byte bank addressed through the same
`ByteStore` capability as main memory.

Two access paths exist, and both are load-bearing:
  * Name-based (`get`/`set`): looks the name up in the name->offset index
    built once at construction; a name outside the table fails with
    `UnknownRegister`. `ip` and `acc` are always addressed this way.
  * Offset-based (`read_at`/`write_at`): used for register operands decoded
    from instruction bytes. Decoded index bytes are wrapped modulo the table
    length (`wrap_index`), deliberately aliasing out-of-range bytes onto
    valid registers rather than rejecting them.
*/

use std::collections::HashMap;
use std::fmt;

use crate::error::{CpuError, Result};
use crate::memory::ByteStore;

/// Register names in bank order. Position in this table determines each
/// register's byte offset: `offset = 2 * position`.
pub const REGISTER_NAMES: [&str; 10] =
    ["ip", "acc", "r1", "r2", "r3", "r4", "r5", "r6", "r7", "r8"];

/// Width of one register in bytes.
pub const REGISTER_WIDTH: usize = 2;

/// Size of the register bank in bytes.
pub const BANK_SIZE: usize = REGISTER_NAMES.len() * REGISTER_WIDTH;

/// The CPU's register bank plus the name->offset index over it.
pub struct RegisterFile {
    bank: [u8; BANK_SIZE],
    index: HashMap<&'static str, usize>,
}

impl Default for RegisterFile {
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

impl RegisterFile {
    /// Create a zero-initialized register bank and build the name index.
    pub fn new() -> Self {
        let mut index = HashMap::with_capacity(REGISTER_NAMES.len());
        for (i, name) in REGISTER_NAMES.iter().enumerate() {
            index.insert(*name, i * REGISTER_WIDTH);
        }
        Self {
            bank: [0; BANK_SIZE],
            index,
        }
    }

    /// Byte offset of a named register, or `UnknownRegister`.
    pub fn offset_of(&self, name: &str) -> Result<usize> {
        self.index
            .get(name)
            .copied()
            .ok_or_else(|| CpuError::UnknownRegister(name.to_string()))
    }

    /// Map a decoded register-index byte onto a bank offset, wrapping
    /// out-of-range bytes modulo the table length.
    #[inline]
    pub fn wrap_index(byte: u8) -> usize {
        (byte as usize % REGISTER_NAMES.len()) * REGISTER_WIDTH
    }

    /// Read a named register.
    pub fn get(&self, name: &str) -> Result<u16> {
        let offset = self.offset_of(name)?;
        self.bank.read_u16(offset)
    }

    /// Write a named register and return the value now stored.
    ///
    /// The return value is re-read through `get`, so callers observe exactly
    /// what a subsequent read would.
    pub fn set(&mut self, name: &str, value: u16) -> Result<u16> {
        let offset = self.offset_of(name)?;
        self.bank.write_u16(offset, value)?;
        self.get(name)
    }

    /// Read the register at a bank byte offset (from `wrap_index`).
    #[inline]
    pub fn read_at(&self, offset: usize) -> Result<u16> {
        self.bank.read_u16(offset)
    }

    /// Write the register at a bank byte offset (from `wrap_index`).
    #[inline]
    pub fn write_at(&mut self, offset: usize, value: u16) -> Result<()> {
        self.bank.write_u16(offset, value)
    }
}

impl fmt::Debug for RegisterFile {
    /// One `name: 0xNNNN` line per register, in bank order.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, name) in REGISTER_NAMES.iter().enumerate() {
            let offset = i * REGISTER_WIDTH;
            let value = u16::from_be_bytes([self.bank[offset], self.bank[offset + 1]]);
            writeln!(f, "{name}: {value:#06x}")?;
        }
        Ok(())
    }
}
