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

use crate::core::bits::BitField;

/// Coprocessor 0 (System Control)
///
/// Only the registers the emulated software depends on are modeled:
/// the Status Register, the Cause register and the exception PC. The
/// breakpoint registers accept writes of zero and nothing else.
///
/// # Status Register (SR, r12)
///
/// | Bits  | Field | Meaning                                   |
/// |-------|-------|-------------------------------------------|
/// | 0-5   | mode  | KU/IE stack (current, previous, old)      |
/// | 8-15  | IM    | Interrupt mask                            |
/// | 16    | IsC   | Isolate cache (data accesses suppressed)  |
/// | 22    | BEV   | Boot exception vectors (in BIOS ROM)      |
/// | 28-31 | CU    | Coprocessor usable                        |
pub(super) struct COP0 {
    status: u32,
    cause: u32,
    epc: u32,
}

impl COP0 {
    /// Breakpoint PC
    pub const BPC: u8 = 3;
    /// Breakpoint Data Address
    pub const BDA: u8 = 5;
    /// Target Address
    pub const TAR: u8 = 6;
    /// Breakpoint control
    pub const DCIC: u8 = 7;
    /// Data Address Mask
    pub const BDAM: u8 = 9;
    /// PC Mask
    pub const BPCM: u8 = 11;
    /// Status Register
    pub const SR: u8 = 12;
    /// Cause Register
    pub const CAUSE: u8 = 13;
    /// Exception PC
    pub const EPC: u8 = 14;
    /// Processor ID
    pub const PRID: u8 = 15;

    /// Value read back from PRID (R3000A)
    pub const PROCESSOR_ID: u32 = 0x0000_0002;

    /// KU/IE mode stack, three levels of two bits
    pub const SR_MODE_STACK: BitField = BitField::new(0, 6);
    /// Current interrupt enable
    pub const SR_IEC: BitField = BitField::bit(0);
    /// Current kernel/user mode
    pub const SR_KUC: BitField = BitField::bit(1);
    /// Interrupt mask
    pub const SR_IM: BitField = BitField::new(8, 8);
    /// Isolate cache
    pub const SR_ISC: BitField = BitField::bit(16);
    /// Boot exception vectors
    pub const SR_BEV: BitField = BitField::bit(22);
    /// Coprocessor usable bits (CU0-CU3)
    pub const SR_CU: BitField = BitField::new(28, 4);

    /// Exception code
    pub const CAUSE_EXCCODE: BitField = BitField::new(2, 5);
    /// Pending interrupts
    pub const CAUSE_IP: BitField = BitField::new(8, 8);
    /// Exception raised in a branch delay slot
    pub const CAUSE_BD: BitField = BitField::bit(31);

    /// Exception vector with BEV=1
    pub const BOOT_EXCEPTION_VECTOR: u32 = 0xBFC0_0180;
    /// Exception vector with BEV=0
    pub const GENERAL_EXCEPTION_VECTOR: u32 = 0x8000_0080;

    /// Create a new COP0 instance with all registers cleared
    pub(super) fn new() -> Self {
        Self {
            status: 0,
            cause: 0,
            epc: 0,
        }
    }

    /// Reset COP0 registers to initial state
    pub(super) fn reset(&mut self) {
        *self = Self::new();
    }

    pub(super) fn status(&self) -> u32 {
        self.status
    }

    pub(super) fn set_status(&mut self, value: u32) {
        self.status = value;
    }

    pub(super) fn cause(&self) -> u32 {
        self.cause
    }

    pub(super) fn epc(&self) -> u32 {
        self.epc
    }

    pub(super) fn set_epc(&mut self, value: u32) {
        self.epc = value;
    }

    pub(super) fn interrupts_enabled(&self) -> bool {
        Self::SR_IEC.is_set(self.status)
    }

    pub(super) fn user_mode(&self) -> bool {
        Self::SR_KUC.is_set(self.status)
    }

    pub(super) fn interrupt_mask(&self) -> u32 {
        Self::SR_IM.get(self.status)
    }

    /// Data accesses are redirected to the (unmodeled) cache
    pub(super) fn cache_isolated(&self) -> bool {
        Self::SR_ISC.is_set(self.status)
    }

    pub(super) fn boot_exception_vectors(&self) -> bool {
        Self::SR_BEV.is_set(self.status)
    }

    pub(super) fn coprocessor_usable(&self, cop: u32) -> bool {
        (Self::SR_CU.get(self.status) >> cop) & 1 != 0
    }

    pub(super) fn exception_code(&self) -> u32 {
        Self::CAUSE_EXCCODE.get(self.cause)
    }

    /// Record an exception and return the handler address
    ///
    /// Pushes the KU/IE stack (current mode becomes kernel with interrupts
    /// disabled), overwrites Cause with the exception code and saves `epc`.
    pub(super) fn enter_exception(&mut self, cause: ExceptionCause, epc: u32) -> u32 {
        let mode = Self::SR_MODE_STACK.get(self.status);
        self.status = Self::SR_MODE_STACK.set(self.status, mode << 2);
        self.cause = Self::CAUSE_EXCCODE.set(0, cause as u32);
        self.epc = epc;

        if self.boot_exception_vectors() {
            Self::BOOT_EXCEPTION_VECTOR
        } else {
            Self::GENERAL_EXCEPTION_VECTOR
        }
    }

    /// Pop the KU/IE stack (RFE)
    pub(super) fn return_from_exception(&mut self) {
        let mode = Self::SR_MODE_STACK.get(self.status);
        self.status = Self::SR_MODE_STACK.set(self.status, mode >> 2);
    }
}

/// Exception cause codes for MIPS R3000A
///
/// These correspond to the exception codes stored in the CAUSE register
/// when a CPU exception occurs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u32)]
pub enum ExceptionCause {
    /// Interrupt (external or internal)
    Interrupt = 0,
    /// Address error on load
    AddressErrorLoad = 4,
    /// Address error on store
    AddressErrorStore = 5,
    /// Syscall instruction executed
    Syscall = 8,
    /// Breakpoint instruction executed
    Breakpoint = 9,
    /// Reserved or illegal instruction
    ReservedInstruction = 10,
    /// Coprocessor unusable
    CoprocessorUnusable = 11,
    /// Arithmetic overflow
    Overflow = 12,
}
