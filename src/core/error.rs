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

//! Error types for the emulator core
//!
//! Every variant describes a stop condition: either a programming-model
//! violation by the emulated software (branch in a delay slot, unknown
//! opcode, unmapped address, ...) or a failure to load an image. Hardware
//! quirks such as division by zero and accesses to unimplemented peripherals
//! are handled in place and never produce an error.

use std::path::PathBuf;

use thiserror::Error;

/// Result alias used throughout the crate
pub type Result<T> = std::result::Result<T, EmulatorError>;

/// Emulator error
#[derive(Error, Debug)]
pub enum EmulatorError {
    /// A branch or jump was decoded in the delay slot of another branch
    #[error("branch in delay slot at PC=0x{pc:08X}")]
    BranchInDelaySlot { pc: u32 },

    /// An exception was raised by the instruction in a branch delay slot
    #[error("exception {cause} raised in delay slot at PC=0x{pc:08X}")]
    ExceptionInDelaySlot { cause: u32, pc: u32 },

    /// Signed ADD/ADDI/SUB overflowed; the destination was already written
    #[error("arithmetic overflow at PC=0x{pc:08X}")]
    ArithmeticOverflow { pc: u32 },

    /// Primary opcode with no handler
    #[error("unknown opcode 0x{opcode:02X} (instruction 0x{instruction:08X}) at PC=0x{pc:08X}")]
    UnknownOpcode { opcode: u8, instruction: u32, pc: u32 },

    /// SPECIAL function field with no handler
    #[error("unknown SPECIAL function 0x{funct:02X} (instruction 0x{instruction:08X}) at PC=0x{pc:08X}")]
    UnknownSpecialFunction { funct: u8, instruction: u32, pc: u32 },

    /// COP0 operation field with no handler
    #[error("unknown COP0 operation 0x{op:02X} (instruction 0x{instruction:08X}) at PC=0x{pc:08X}")]
    UnknownCop0Operation { op: u8, instruction: u32, pc: u32 },

    /// Access to a COP0 register that is not modeled
    #[error("unsupported COP0 register {register} access (value 0x{value:08X}) at PC=0x{pc:08X}")]
    InvalidCop0Register { register: u8, value: u32, pc: u32 },

    /// Address outside every known region
    #[error("unmapped memory access at 0x{address:08X}")]
    UnmappedAddress { address: u32 },

    /// Bus access not aligned to its size
    #[error("unaligned {size}-byte access at 0x{address:08X}")]
    UnalignedAccess { address: u32, size: u32 },

    /// DMA channel started with the reserved sync mode
    #[error("DMA{channel}: reserved sync mode")]
    IllegalDmaSyncMode { channel: usize },

    /// DMA device/direction/mode combination that is not implemented
    #[error("DMA{channel}: unsupported transfer ({direction})")]
    UnsupportedDmaTransfer {
        channel: usize,
        direction: &'static str,
    },

    /// Linked-list walk visited more nodes than RAM can hold distinct headers
    #[error("DMA{channel}: linked list does not terminate (node 0x{address:08X})")]
    DmaLinkedListLoop { channel: usize, address: u32 },

    /// GP0 word in the idle state that selects no known command
    #[error("unknown GP0 command 0x{opcode:02X} (word 0x{word:08X})")]
    UnknownGp0Command { opcode: u8, word: u32 },

    /// GP1 word that selects no known command
    #[error("unknown GP1 command 0x{opcode:02X} (word 0x{word:08X})")]
    UnknownGp1Command { opcode: u8, word: u32 },

    /// BIOS file does not exist
    #[error("BIOS file not found: {path}")]
    BiosNotFound { path: PathBuf },

    /// BIOS image has the wrong size
    #[error("invalid BIOS size: expected {expected} bytes, got {got} bytes")]
    InvalidBiosSize { expected: usize, got: usize },

    /// Executable image failed validation
    #[error("invalid PS-X EXE: {reason}")]
    InvalidExecutable { reason: String },

    /// Configuration could not be parsed or serialized
    #[error("configuration error: {0}")]
    Config(String),

    /// I/O failure while reading or writing an image or config file
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl EmulatorError {
    /// Whether this error was raised by the running emulation
    ///
    /// Runtime errors stop the emulated session. Load and configuration
    /// errors happen before the session starts.
    pub fn is_runtime(&self) -> bool {
        !matches!(
            self,
            Self::BiosNotFound { .. }
                | Self::InvalidBiosSize { .. }
                | Self::InvalidExecutable { .. }
                | Self::Config(_)
                | Self::Io(_)
        )
    }
}
