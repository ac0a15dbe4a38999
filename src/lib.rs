#![doc = r#"
vm16 library crate.

A minimal 16-bit virtual CPU: a fixed ten-register file, a flat borrowed
memory buffer, and a fetch-decode-execute loop over a six-opcode, big-endian
instruction encoding.

Modules:
- cpu: the CPU core (register file + opcode set + engine)
- error: crate-wide error type (`CpuError`) and `Result` alias
- memory: shared byte-store capability and the zero-filled buffer factory

The engine is single-threaded and fully synchronous. It does not allocate
main memory; callers build a buffer with `create_memory`, write a program
into it, and drive execution by calling `Cpu::step` in a loop of their own.
"#]

// Core modules
pub mod cpu;
pub mod error;
pub mod memory;

// Re-export commonly used types at the crate root for convenience.
pub use cpu::core::Cpu;
pub use cpu::isa::Opcode;
pub use cpu::registers::{REGISTER_NAMES, RegisterFile};
pub use error::{CpuError, Result};
pub use memory::{ByteStore, create_memory};
