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

//! Exception-triggering instructions

use super::super::ExceptionCause;
use super::CPU;
use crate::core::error::Result;

impl CPU {
    /// SYSCALL: System Call
    ///
    /// Always enters the exception handler with cause Syscall (8). The BIOS
    /// uses it for EnterCriticalSection/ExitCriticalSection.
    pub(crate) fn op_syscall(&mut self, _instruction: u32) -> Result<()> {
        self.exception(ExceptionCause::Syscall)
    }

    /// BREAK: Breakpoint
    ///
    /// Always enters the exception handler with cause Breakpoint (9).
    pub(crate) fn op_break(&mut self, _instruction: u32) -> Result<()> {
        self.exception(ExceptionCause::Breakpoint)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::error::EmulatorError;

    fn create_test_cpu() -> CPU {
        let mut cpu = CPU::new();
        cpu.current_instruction_address = 0x8000_1000;
        cpu.pc = 0x8000_1004;
        cpu.next_pc = 0x8000_1008;
        cpu
    }

    #[test]
    fn test_syscall_enters_general_vector() {
        let mut cpu = create_test_cpu();
        cpu.op_syscall(0x0000_000C).unwrap();

        assert_eq!(cpu.cause(), 8 << 2);
        assert_eq!(cpu.epc(), 0x8000_1000, "EPC is the syscall itself");
        assert_eq!(cpu.pc(), 0x8000_0080);
        assert_eq!(cpu.next_pc(), 0x8000_0084);
    }

    #[test]
    fn test_break_with_bev_set() {
        let mut cpu = create_test_cpu();
        cpu.cop0.set_status(1 << 22);
        cpu.op_break(0x0000_000D).unwrap();

        assert_eq!(cpu.cause(), 9 << 2);
        assert_eq!(cpu.pc(), 0xBFC0_0180);
    }

    #[test]
    fn test_syscall_shifts_mode_stack() {
        let mut cpu = create_test_cpu();
        // KUc=1, IEc=1 (user mode, interrupts enabled)
        cpu.cop0.set_status(0x0000_0003);
        cpu.op_syscall(0).unwrap();

        let sr = cpu.status();
        assert_eq!((sr >> 2) & 0x03, 0x03, "previous mode saved");
        assert_eq!(sr & 0x03, 0x00, "kernel mode, interrupts disabled");
    }

    #[test]
    fn test_syscall_in_delay_slot_is_fatal() {
        let mut cpu = create_test_cpu();
        cpu.in_delay_slot = true;
        assert!(matches!(
            cpu.op_syscall(0),
            Err(EmulatorError::ExceptionInDelaySlot {
                cause: 8,
                pc: 0x8000_1000
            })
        ));
        assert_eq!(cpu.pc(), 0x8000_1004, "no state change");
    }
}
