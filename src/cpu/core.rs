/*!
core.rs - The CPU engine: fetch, decode, execute.

Overview
========
`Cpu` owns the register bank and borrows main memory for its lifetime. Its
entire state is the pair (memory contents, register bank contents); there is
no mode enum and no halted flag. `ip` is an ordinary register that doubles as
the program counter: `step` fetches the opcode byte at `ip`, `execute`
fetches the operand bytes after it, and a taken jump rewrites `ip` directly.

Running a program is repeated external invocation of `step`; looping and
termination policy belong to the caller. An infinite jump loop is a valid
program.

Operand decoding
================
Each opcode fetches its operands in a fixed order (see the match arms in
`execute`); the order is part of the encoding contract. Register-index
operand bytes wrap modulo the register-table length and address the bank by
offset, so malformed indices alias onto valid registers. `acc` and `ip` uses
inside `ADD_REG_REG` and `JMP_NOT_EQL` go through the named-register path.
*/

use log::trace;

use crate::cpu::isa::Opcode;
use crate::cpu::registers::RegisterFile;
use crate::error::Result;
use crate::memory::ByteStore;

/// The CPU engine over a borrowed memory buffer.
///
/// Memory is externally owned and outlives the engine; the register bank is
/// allocated here and dropped with it.
pub struct Cpu<'m> {
    memory: &'m mut [u8],
    registers: RegisterFile,
}

impl<'m> Cpu<'m> {
    /// Construct a CPU over `memory` with all registers at zero.
    pub fn new(memory: &'m mut [u8]) -> Self {
        Self {
            memory,
            registers: RegisterFile::new(),
        }
    }

    // ---------------------------------------------------------------------
    // Register access
    // ---------------------------------------------------------------------

    /// Read a register by name.
    pub fn get_register(&self, name: &str) -> Result<u16> {
        self.registers.get(name)
    }

    /// Write a register by name; returns the value now stored.
    pub fn set_register(&mut self, name: &str, value: u16) -> Result<u16> {
        self.registers.set(name, value)
    }

    // ---------------------------------------------------------------------
    // Fetch
    // ---------------------------------------------------------------------

    /// Fetch the byte at `ip` and advance `ip` by 1.
    ///
    /// Used for opcode bytes and register-index operands.
    pub fn fetch_u8(&mut self) -> Result<u8> {
        let ip = self.get_register("ip")?;
        let byte = self.memory.read_u8(ip as usize)?;
        self.set_register("ip", ip.wrapping_add(1))?;
        Ok(byte)
    }

    /// Fetch the big-endian 16-bit value at `ip` and advance `ip` by 2.
    ///
    /// Used for literal and memory-address operands.
    pub fn fetch_u16(&mut self) -> Result<u16> {
        let ip = self.get_register("ip")?;
        let word = self.memory.read_u16(ip as usize)?;
        self.set_register("ip", ip.wrapping_add(2))?;
        Ok(word)
    }

    /// Fetch a register-index operand byte and wrap it onto a bank offset.
    fn fetch_register_offset(&mut self) -> Result<usize> {
        let byte = self.fetch_u8()?;
        Ok(RegisterFile::wrap_index(byte))
    }

    // ---------------------------------------------------------------------
    // Execute
    // ---------------------------------------------------------------------

    /// Decode `opcode_byte`, fetch its operands, and apply its semantics.
    ///
    /// Fails with `UnknownInstruction` for a byte outside the instruction
    /// set, before any operand is consumed.
    pub fn execute(&mut self, opcode_byte: u8) -> Result<()> {
        let opcode = Opcode::try_from(opcode_byte)?;
        trace!("execute {}", opcode.mnemonic());

        match opcode {
            // literal:16, reg:8
            Opcode::MovLitReg => {
                let literal = self.fetch_u16()?;
                let dst = self.fetch_register_offset()?;
                self.registers.write_at(dst, literal)?;
            }

            // from:8, to:8
            Opcode::MovRegReg => {
                let src = self.fetch_register_offset()?;
                let dst = self.fetch_register_offset()?;
                let value = self.registers.read_at(src)?;
                self.registers.write_at(dst, value)?;
            }

            // from:8, address:16
            Opcode::MovRegMem => {
                let src = self.fetch_register_offset()?;
                let address = self.fetch_u16()?;
                let value = self.registers.read_at(src)?;
                self.memory.write_u16(address as usize, value)?;
            }

            // address:16, to:8
            Opcode::MovMemReg => {
                let address = self.fetch_u16()?;
                let dst = self.fetch_register_offset()?;
                let value = self.memory.read_u16(address as usize)?;
                self.registers.write_at(dst, value)?;
            }

            // reg1:8, reg2:8; sum lands in acc, wrapping at 16 bits.
            Opcode::AddRegReg => {
                let lhs = self.fetch_register_offset()?;
                let rhs = self.fetch_register_offset()?;
                let a = self.registers.read_at(lhs)?;
                let b = self.registers.read_at(rhs)?;
                self.set_register("acc", a.wrapping_add(b))?;
            }

            // value:16, address:16; both operands are consumed before the
            // comparison, whether or not the jump is taken.
            Opcode::JmpNotEql => {
                let value = self.fetch_u16()?;
                let address = self.fetch_u16()?;
                if value != self.get_register("acc")? {
                    self.set_register("ip", address)?;
                }
            }
        }

        Ok(())
    }

    /// Fetch one opcode byte at `ip` and execute it.
    ///
    /// The only entry point for running one instruction.
    pub fn step(&mut self) -> Result<()> {
        let opcode_byte = self.fetch_u8()?;
        self.execute(opcode_byte)
    }

    // ---------------------------------------------------------------------
    // Inspection
    // ---------------------------------------------------------------------

    /// Render every register as a `name: 0xNNNN` line, in bank order.
    pub fn dump_registers(&self) -> String {
        format!("{:?}", self.registers)
    }

    /// Render a hex window of up to `len` memory bytes starting at `addr`,
    /// clamped to the buffer.
    pub fn peek_memory(&self, addr: usize, len: usize) -> String {
        let start = addr.min(self.memory.len());
        let end = start.saturating_add(len).min(self.memory.len());
        let hex = self.memory[start..end]
            .iter()
            .map(|b| format!("{b:02x}"))
            .collect::<Vec<_>>()
            .join(" ");
        format!("{addr:#06x}: {hex}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CpuError;
    use crate::memory::create_memory;

    /// Build a 256-byte memory image with `program` at offset 0.
    fn setup(program: &[u8]) -> Vec<u8> {
        let mut mem = create_memory(256);
        mem[..program.len()].copy_from_slice(program);
        mem
    }

    #[test]
    fn fetch_u8_advances_ip_by_one() {
        let mut mem = setup(&[0xAA, 0xBB]);
        let mut cpu = Cpu::new(&mut mem);
        assert_eq!(cpu.fetch_u8().unwrap(), 0xAA);
        assert_eq!(cpu.get_register("ip").unwrap(), 1);
        assert_eq!(cpu.fetch_u8().unwrap(), 0xBB);
        assert_eq!(cpu.get_register("ip").unwrap(), 2);
    }

    #[test]
    fn fetch_u16_advances_ip_by_two_and_is_big_endian() {
        let mut mem = setup(&[0x12, 0x34]);
        let mut cpu = Cpu::new(&mut mem);
        assert_eq!(cpu.fetch_u16().unwrap(), 0x1234);
        assert_eq!(cpu.get_register("ip").unwrap(), 2);
    }

    #[test]
    fn fetch_past_end_of_memory_fails() {
        let mut mem = create_memory(4);
        let mut cpu = Cpu::new(&mut mem);
        cpu.set_register("ip", 4).unwrap();
        assert_eq!(
            cpu.fetch_u8(),
            Err(CpuError::OutOfBounds { addr: 4, len: 4 })
        );
    }

    #[test]
    fn unknown_opcode_fails_with_the_offending_byte() {
        let mut mem = setup(&[0x99]);
        let mut cpu = Cpu::new(&mut mem);
        assert_eq!(cpu.step(), Err(CpuError::UnknownInstruction(0x99)));
        // The opcode byte itself was still consumed by the fetch.
        assert_eq!(cpu.get_register("ip").unwrap(), 1);
    }

    #[test]
    fn mov_lit_reg_loads_a_literal() {
        // MOV_LIT_REG 0x1234 -> r1 (register byte 0x02).
        let mut mem = setup(&[0x10, 0x12, 0x34, 0x02]);
        let mut cpu = Cpu::new(&mut mem);
        cpu.step().unwrap();
        assert_eq!(cpu.get_register("r1").unwrap(), 0x1234);
        assert_eq!(cpu.get_register("ip").unwrap(), 4);
    }

    #[test]
    fn mov_lit_reg_wraps_out_of_range_register_bytes() {
        // Register byte 0x0C wraps modulo 10 onto r1.
        let mut mem = setup(&[0x10, 0xAB, 0xCD, 0x0C]);
        let mut cpu = Cpu::new(&mut mem);
        cpu.step().unwrap();
        assert_eq!(cpu.get_register("r1").unwrap(), 0xABCD);
    }

    #[test]
    fn mov_reg_reg_copies_between_registers() {
        // MOV_REG_REG r1 -> r2 (bytes 0x02, 0x03).
        let mut mem = setup(&[0x11, 0x02, 0x03]);
        let mut cpu = Cpu::new(&mut mem);
        cpu.set_register("r1", 0x4455).unwrap();
        cpu.step().unwrap();
        assert_eq!(cpu.get_register("r2").unwrap(), 0x4455);
        assert_eq!(cpu.get_register("r1").unwrap(), 0x4455);
        assert_eq!(cpu.get_register("ip").unwrap(), 3);
    }

    #[test]
    fn mov_reg_mem_stores_sixteen_bits_big_endian() {
        // MOV_REG_MEM r1 -> memory[0x0040].
        let mut mem = setup(&[0x12, 0x02, 0x00, 0x40]);
        let mut cpu = Cpu::new(&mut mem);
        cpu.set_register("r1", 0x1234).unwrap();
        cpu.step().unwrap();
        assert_eq!(cpu.get_register("ip").unwrap(), 4);
        assert_eq!(mem[0x40], 0x12);
        assert_eq!(mem[0x41], 0x34);
    }

    #[test]
    fn mov_mem_reg_loads_sixteen_bits_big_endian() {
        // MOV_MEM_REG memory[0x0040] -> r3 (byte 0x04).
        let mut mem = setup(&[0x13, 0x00, 0x40, 0x04]);
        mem[0x40] = 0xFE;
        mem[0x41] = 0xDC;
        let mut cpu = Cpu::new(&mut mem);
        cpu.step().unwrap();
        assert_eq!(cpu.get_register("r3").unwrap(), 0xFEDC);
        assert_eq!(cpu.get_register("ip").unwrap(), 4);
    }

    #[test]
    fn add_reg_reg_wraps_into_acc() {
        // ADD_REG_REG r1 + r2; 0xFFFF + 0x0002 wraps to 0x0001.
        let mut mem = setup(&[0x14, 0x02, 0x03]);
        let mut cpu = Cpu::new(&mut mem);
        cpu.set_register("r1", 0xFFFF).unwrap();
        cpu.set_register("r2", 0x0002).unwrap();
        cpu.step().unwrap();
        assert_eq!(cpu.get_register("acc").unwrap(), 0x0001);
        assert_eq!(cpu.get_register("ip").unwrap(), 3);
    }

    #[test]
    fn jmp_not_eql_taken_rewrites_ip() {
        // JMP_NOT_EQL 0x000A, 0x0000 with acc = 5: 10 != 5, so jump.
        let mut mem = setup(&[0x15, 0x00, 0x0A, 0x00, 0x00]);
        let mut cpu = Cpu::new(&mut mem);
        cpu.set_register("acc", 5).unwrap();
        cpu.step().unwrap();
        assert_eq!(cpu.get_register("ip").unwrap(), 0);
    }

    #[test]
    fn jmp_not_eql_not_taken_still_consumes_both_operands() {
        // Same program with acc = 10: no jump, ip sits past both operands.
        let mut mem = setup(&[0x15, 0x00, 0x0A, 0x00, 0x00]);
        let mut cpu = Cpu::new(&mut mem);
        cpu.set_register("acc", 10).unwrap();
        cpu.step().unwrap();
        assert_eq!(cpu.get_register("ip").unwrap(), 5);
    }

    #[test]
    fn stepping_a_small_program_end_to_end() {
        // r1 = 0x0102; r2 = 0x0304; acc = r1 + r2; store acc to 0x0060.
        let program = [
            0x10, 0x01, 0x02, 0x02, // MOV_LIT_REG 0x0102 -> r1
            0x10, 0x03, 0x04, 0x03, // MOV_LIT_REG 0x0304 -> r2
            0x14, 0x02, 0x03, // ADD_REG_REG r1, r2
            0x12, 0x01, 0x00, 0x60, // MOV_REG_MEM acc -> 0x0060
        ];
        let mut mem = setup(&program);
        let mut cpu = Cpu::new(&mut mem);
        for _ in 0..4 {
            cpu.step().unwrap();
        }
        assert_eq!(cpu.get_register("acc").unwrap(), 0x0406);
        assert_eq!(cpu.get_register("ip").unwrap(), program.len() as u16);
        assert_eq!(mem[0x60], 0x04);
        assert_eq!(mem[0x61], 0x06);
    }

    #[test]
    fn countdown_loop_terminates_via_jmp_not_eql() {
        // acc accumulates r1 (=1) until it reaches 3, then falls through.
        let program = [
            0x10, 0x00, 0x01, 0x02, // 0: MOV_LIT_REG 0x0001 -> r1
            0x14, 0x01, 0x02, // 4: ADD_REG_REG acc, r1
            0x15, 0x00, 0x03, 0x00, 0x04, // 7: JMP_NOT_EQL 0x0003, 0x0004
        ];
        let mut mem = setup(&program);
        let mut cpu = Cpu::new(&mut mem);
        cpu.step().unwrap(); // MOV_LIT_REG
        for _ in 0..3 {
            cpu.step().unwrap(); // ADD_REG_REG
            cpu.step().unwrap(); // JMP_NOT_EQL
        }
        assert_eq!(cpu.get_register("acc").unwrap(), 3);
        // Final jump not taken: ip rests past the program.
        assert_eq!(cpu.get_register("ip").unwrap(), program.len() as u16);
    }

    #[test]
    fn dump_registers_reflects_current_state() {
        let mut mem = setup(&[]);
        let mut cpu = Cpu::new(&mut mem);
        cpu.set_register("r8", 0x00FF).unwrap();
        let dump = cpu.dump_registers();
        assert!(dump.contains("r8: 0x00ff"));
        assert!(dump.contains("ip: 0x0000"));
    }

    #[test]
    fn peek_memory_clamps_to_the_buffer() {
        let mut mem = setup(&[0xDE, 0xAD]);
        let cpu = Cpu::new(&mut mem);
        assert_eq!(cpu.peek_memory(0, 2), "0x0000: de ad");
        // Window past the end renders only what exists.
        assert_eq!(cpu.peek_memory(255, 8), "0x00ff: 00");
    }
}
