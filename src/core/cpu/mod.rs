// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 itsakeyfut
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use crate::core::error::{EmulatorError, Result};
use crate::core::gpu::GPU;
use crate::core::memory::Bus;

/// CPU (MIPS R3000A) emulation implementation
///
/// # Specifications
/// - Architecture: MIPS I (32-bit)
/// - Clock frequency: 33.8688 MHz
/// - Registers: 32 general-purpose registers + HI/LO
///
/// # Pipeline model
///
/// Two program counters model the branch delay slot: `pc` is the address of
/// the next instruction to fetch and `next_pc` the one after it. Branches and
/// jumps only rewrite `next_pc`, so the instruction following a branch always
/// executes before the target.
///
/// # Example
/// ```
/// use psxcore::core::cpu::CPU;
///
/// let mut cpu = CPU::new();
/// cpu.reset();
/// assert_eq!(cpu.reg(0), 0); // r0 is always 0
/// assert_eq!(cpu.pc(), 0xBFC00000);
/// ```
pub struct CPU {
    /// General purpose registers (r0-r31)
    ///
    /// r0 is hardwired to always return 0
    regs: [u32; 32],

    /// Address of the next instruction to fetch
    pc: u32,

    /// Address fetched after `pc` (branch targets land here)
    next_pc: u32,

    /// Address of the instruction currently executing
    current_instruction_address: u32,

    /// HI register (multiplication/division result upper 32 bits)
    hi: u32,

    /// LO register (multiplication/division result lower 32 bits)
    lo: u32,

    /// Coprocessor 0 (System Control Unit)
    cop0: COP0,

    /// Set by a branch or jump during the current step
    executed_branch: bool,

    /// The instruction executing now sits in a branch delay slot
    in_delay_slot: bool,

    /// Current instruction (for diagnostics)
    current_instruction: u32,
}

// Module declarations
mod cop0;
mod decode;
mod instructions;

// Re-exports
pub use cop0::ExceptionCause;
use cop0::COP0;

impl CPU {
    /// BIOS entry point
    pub const RESET_VECTOR: u32 = 0xBFC0_0000;

    /// Create a new CPU instance with initial state
    ///
    /// The CPU is initialized with the following state:
    /// - All general purpose registers: 0
    /// - PC: 0xBFC00000 (BIOS entry point)
    /// - next_pc: 0xBFC00004
    /// - COP0 registers: 0
    ///
    /// # Example
    /// ```
    /// use psxcore::core::cpu::CPU;
    ///
    /// let cpu = CPU::new();
    /// assert_eq!(cpu.reg(0), 0);
    /// ```
    pub fn new() -> Self {
        Self {
            regs: [0u32; 32],
            pc: Self::RESET_VECTOR,
            next_pc: Self::RESET_VECTOR.wrapping_add(4),
            current_instruction_address: Self::RESET_VECTOR,
            hi: 0,
            lo: 0,
            cop0: COP0::new(),
            executed_branch: false,
            in_delay_slot: false,
            current_instruction: 0,
        }
    }

    /// Reset CPU to initial state
    ///
    /// This mimics the behavior of power-on or hardware reset.
    pub fn reset(&mut self) {
        self.regs = [0u32; 32];
        self.pc = Self::RESET_VECTOR;
        self.next_pc = Self::RESET_VECTOR.wrapping_add(4);
        self.current_instruction_address = Self::RESET_VECTOR;
        self.hi = 0;
        self.lo = 0;
        self.cop0.reset();
        self.executed_branch = false;
        self.in_delay_slot = false;
        self.current_instruction = 0;
    }

    /// Read from general purpose register
    ///
    /// # Arguments
    /// - `index`: Register number (0-31)
    ///
    /// # Returns
    /// Register value. r0 always returns 0.
    #[inline(always)]
    pub fn reg(&self, index: u8) -> u32 {
        if index == 0 {
            0
        } else {
            self.regs[index as usize]
        }
    }

    /// Write to general purpose register
    ///
    /// Writes to r0 are ignored.
    ///
    /// # Example
    /// ```
    /// use psxcore::core::cpu::CPU;
    ///
    /// let mut cpu = CPU::new();
    /// cpu.set_reg(1, 0x12345678);
    /// assert_eq!(cpu.reg(1), 0x12345678);
    ///
    /// cpu.set_reg(0, 0xDEADBEEF);
    /// assert_eq!(cpu.reg(0), 0);
    /// ```
    #[inline(always)]
    pub fn set_reg(&mut self, index: u8, value: u32) {
        if index != 0 {
            self.regs[index as usize] = value;
        }
    }

    /// Execute one instruction
    ///
    /// 1. Clear r0
    /// 2. Fetch the word at `pc` through the bus
    /// 3. Advance `pc`/`next_pc` by one slot
    /// 4. Decode and execute
    /// 5. Carry the branch flag into the delay-slot flag
    ///
    /// # Arguments
    ///
    /// * `bus` - Memory bus for instruction fetch and data accesses
    /// * `gpu` - GPU borrowed for GP0/GP1 port accesses and DMA
    ///
    /// # Errors
    ///
    /// Any programming-model violation (unknown opcode, branch in a delay
    /// slot, unmapped address, ...) stops the step with an error.
    ///
    /// # Example
    ///
    /// ```
    /// use psxcore::core::cpu::CPU;
    /// use psxcore::core::gpu::GPU;
    /// use psxcore::core::memory::Bus;
    ///
    /// let mut cpu = CPU::new();
    /// let mut bus = Bus::new();
    /// let mut gpu = GPU::new();
    ///
    /// // The empty BIOS image is all zeroes, which decodes as NOP
    /// cpu.step(&mut bus, &mut gpu).unwrap();
    /// assert_eq!(cpu.pc(), 0xBFC00004);
    /// ```
    pub fn step(&mut self, bus: &mut Bus, gpu: &mut GPU) -> Result<()> {
        self.regs[0] = 0;

        let pc = self.pc;
        let instruction = bus.read32(pc, gpu)?;

        self.current_instruction = instruction;
        self.current_instruction_address = pc;

        self.pc = self.next_pc;
        self.next_pc = self.next_pc.wrapping_add(4);

        self.execute_instruction(instruction, bus, gpu)?;

        self.in_delay_slot = self.executed_branch;
        self.executed_branch = false;

        Ok(())
    }

    /// Enter the exception handler
    ///
    /// Saves the faulting instruction address in EPC, records the cause and
    /// redirects fetch to the exception vector selected by SR.BEV.
    ///
    /// # Errors
    ///
    /// Exceptions raised by an instruction in a branch delay slot are not
    /// supported and return [`EmulatorError::ExceptionInDelaySlot`].
    pub(crate) fn exception(&mut self, cause: ExceptionCause) -> Result<()> {
        if self.in_delay_slot {
            return Err(EmulatorError::ExceptionInDelaySlot {
                cause: cause as u32,
                pc: self.current_instruction_address,
            });
        }

        let handler = self
            .cop0
            .enter_exception(cause, self.current_instruction_address);

        log::debug!(
            "EXCEPTION: cause={:?}, EPC=0x{:08X}, handler=0x{:08X}, instruction=0x{:08X}",
            cause,
            self.current_instruction_address,
            handler,
            self.current_instruction
        );

        self.pc = handler;
        self.next_pc = handler.wrapping_add(4);
        Ok(())
    }

    /// Check that a branch may issue and mark it as issued
    ///
    /// # Errors
    ///
    /// [`EmulatorError::BranchInDelaySlot`] when the current instruction
    /// already sits in a delay slot.
    fn begin_branch(&mut self) -> Result<()> {
        if self.in_delay_slot {
            return Err(EmulatorError::BranchInDelaySlot {
                pc: self.current_instruction_address,
            });
        }
        self.executed_branch = true;
        Ok(())
    }

    /// Redirect fetch relative to the delay slot
    ///
    /// `next_pc` already points past the delay slot, so the target is
    /// `next_pc - 4 + offset`.
    fn jump_relative(&mut self, offset: u32) {
        self.next_pc = self.next_pc.wrapping_sub(4).wrapping_add(offset);
    }

    /// Check if the executing instruction sits in a branch delay slot
    pub fn in_delay_slot(&self) -> bool {
        self.in_delay_slot
    }

    /// Get current PC value (next instruction to fetch)
    pub fn pc(&self) -> u32 {
        self.pc
    }

    /// Get the address fetched after [`CPU::pc`]
    pub fn next_pc(&self) -> u32 {
        self.next_pc
    }

    /// Address of the most recently executed instruction
    pub fn current_instruction_address(&self) -> u32 {
        self.current_instruction_address
    }

    /// Most recently executed instruction word
    pub fn current_instruction(&self) -> u32 {
        self.current_instruction
    }

    /// Get HI register value
    pub fn hi(&self) -> u32 {
        self.hi
    }

    /// Get LO register value
    pub fn lo(&self) -> u32 {
        self.lo
    }

    /// COP0 Status Register
    pub fn status(&self) -> u32 {
        self.cop0.status()
    }

    /// COP0 Cause register
    pub fn cause(&self) -> u32 {
        self.cop0.cause()
    }

    /// COP0 exception PC
    pub fn epc(&self) -> u32 {
        self.cop0.epc()
    }

    /// Set program counter value
    ///
    /// Sets the PC and next_PC to specified value. This is used when
    /// loading executables that specify the entry point.
    ///
    /// # Example
    ///
    /// ```
    /// use psxcore::core::cpu::CPU;
    ///
    /// let mut cpu = CPU::new();
    /// cpu.set_pc(0x80010000);
    /// assert_eq!(cpu.pc(), 0x80010000);
    /// assert_eq!(cpu.next_pc(), 0x80010004);
    /// ```
    pub fn set_pc(&mut self, pc: u32) {
        self.pc = pc;
        self.next_pc = pc.wrapping_add(4);
        self.executed_branch = false;
        self.in_delay_slot = false;
    }

    /// Format all CPU registers for diagnostics
    ///
    /// Covers PC, HI/LO, the 32 general-purpose registers and the modeled
    /// COP0 registers.
    pub fn dump_registers(&self) -> String {
        let header = format!(
            "PC: 0x{:08X}  Next PC: 0x{:08X}  Current: 0x{:08X} (0x{:08X}){}\n\
             HI: 0x{:08X}  LO: 0x{:08X}\n",
            self.pc,
            self.next_pc,
            self.current_instruction_address,
            self.current_instruction,
            if self.in_delay_slot { " [delay slot]" } else { "" },
            self.hi,
            self.lo
        );

        let grid: String = (0..8u8)
            .map(|row| {
                let line: String = (0..4u8)
                    .map(|col| {
                        let index = row * 4 + col;
                        format!("r{:2}: 0x{:08X}  ", index, self.reg(index))
                    })
                    .collect();
                line + "\n"
            })
            .collect();

        let cop0 = format!(
            "SR: 0x{:08X} (IEc={} KUc={} IM=0x{:02X} IsC={} BEV={} CU0={})\n\
             CAUSE: 0x{:08X} (code {})  EPC: 0x{:08X}\n",
            self.cop0.status(),
            self.cop0.interrupts_enabled() as u8,
            self.cop0.user_mode() as u8,
            self.cop0.interrupt_mask(),
            self.cop0.cache_isolated() as u8,
            self.cop0.boot_exception_vectors() as u8,
            self.cop0.coprocessor_usable(0) as u8,
            self.cop0.cause(),
            self.cop0.exception_code(),
            self.cop0.epc()
        );

        header + &grid + &cop0
    }
}

impl Default for CPU {
    fn default() -> Self {
        Self::new()
    }
}
