/*!
memory.rs - Byte-addressable big-endian store shared by main memory and the
register bank.

Main memory (externally owned, borrowed by the CPU) and the register bank
(owned by the CPU) expose the same access pattern: unsigned 8-bit and 16-bit
reads/writes at arbitrary byte offsets, 16-bit values big-endian. `ByteStore`
captures that capability once over `[u8]` so both stores go through a single
access path.

All accesses are bounds-checked; a bad offset fails with
`CpuError::OutOfBounds` instead of panicking.
*/

use crate::error::{CpuError, Result};

/// Byte-addressable store with big-endian 16-bit access.
pub trait ByteStore {
    /// Read one byte at `addr`.
    fn read_u8(&self, addr: usize) -> Result<u8>;

    /// Write one byte at `addr`.
    fn write_u8(&mut self, addr: usize, value: u8) -> Result<()>;

    /// Read a big-endian 16-bit value at `addr`.
    fn read_u16(&self, addr: usize) -> Result<u16>;

    /// Write a big-endian 16-bit value at `addr`.
    fn write_u16(&mut self, addr: usize, value: u16) -> Result<()>;
}

impl ByteStore for [u8] {
    #[inline]
    fn read_u8(&self, addr: usize) -> Result<u8> {
        self.get(addr).copied().ok_or(CpuError::OutOfBounds {
            addr,
            len: self.len(),
        })
    }

    #[inline]
    fn write_u8(&mut self, addr: usize, value: u8) -> Result<()> {
        let len = self.len();
        match self.get_mut(addr) {
            Some(slot) => {
                *slot = value;
                Ok(())
            }
            None => Err(CpuError::OutOfBounds { addr, len }),
        }
    }

    #[inline]
    fn read_u16(&self, addr: usize) -> Result<u16> {
        let hi = self.read_u8(addr)? as u16;
        let lo = self.read_u8(addr.wrapping_add(1))? as u16;
        Ok((hi << 8) | lo)
    }

    #[inline]
    fn write_u16(&mut self, addr: usize, value: u16) -> Result<()> {
        self.write_u8(addr, (value >> 8) as u8)?;
        self.write_u8(addr.wrapping_add(1), value as u8)
    }
}

/// Allocate a zero-filled memory buffer of `size` bytes.
///
/// The CPU does not allocate or resize main memory; callers create it here,
/// populate it with a program, and hand the CPU a mutable view.
#[inline]
pub fn create_memory(size: usize) -> Vec<u8> {
    vec![0; size]
}
