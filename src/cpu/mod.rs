/*!
cpu::mod - Public façade for the virtual CPU core.

```text
registers.rs - Register name table, name->offset index, register bank.
isa.rs       - Opcode enumeration and decoding.
core.rs      - The engine: fetch, execute, step, inspection helpers.
```

The public surface is the `Cpu` engine plus the types needed to drive and
inspect it; downstream code should not rely on internal module layout.

Usage:
```rust
use vm16::{Cpu, create_memory};

let mut mem = create_memory(256);
mem[..4].copy_from_slice(&[0x10, 0x12, 0x34, 0x02]); // MOV_LIT_REG 0x1234 -> r1
let mut cpu = Cpu::new(&mut mem);
cpu.step().unwrap();
assert_eq!(cpu.get_register("r1").unwrap(), 0x1234);
```
*/

pub mod core;
pub mod isa;
pub mod registers;

pub use crate::cpu::core::Cpu;
pub use crate::cpu::isa::Opcode;
pub use crate::cpu::registers::{REGISTER_NAMES, RegisterFile};
