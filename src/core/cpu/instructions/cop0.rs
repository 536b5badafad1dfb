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

//! Coprocessor 0 (System Control) instructions

use super::super::cop0::COP0;
use super::super::decode::decode_r_type;
use super::CPU;
use crate::core::error::{EmulatorError, Result};

impl CPU {
    /// Execute a COP0 instruction (opcode 0x10)
    ///
    /// The rs field selects the operation:
    ///
    /// | rs   | Operation |
    /// |------|-----------|
    /// | 0x00 | MFC0      |
    /// | 0x04 | MTC0      |
    /// | 0x10 | RFE (funct 0x10) |
    pub(crate) fn execute_cop0(&mut self, instruction: u32) -> Result<()> {
        let (rs, rt, rd, _, funct) = decode_r_type(instruction);

        match rs {
            0x00 => self.op_mfc0(rt, rd),
            0x04 => self.op_mtc0(rt, rd),
            0x10 if funct == 0x10 => self.op_rfe(),
            _ => Err(EmulatorError::UnknownCop0Operation {
                op: rs,
                instruction,
                pc: self.current_instruction_address,
            }),
        }
    }

    /// MFC0: Move From Coprocessor 0
    ///
    /// Format: mfc0 rt, rd
    ///
    /// Only SR, CAUSE, EPC and PRID can be read.
    pub(crate) fn op_mfc0(&mut self, rt: u8, rd: u8) -> Result<()> {
        let value = match rd {
            COP0::SR => self.cop0.status(),
            COP0::CAUSE => self.cop0.cause(),
            COP0::EPC => self.cop0.epc(),
            COP0::PRID => COP0::PROCESSOR_ID,
            _ => {
                return Err(EmulatorError::InvalidCop0Register {
                    register: rd,
                    value: 0,
                    pc: self.current_instruction_address,
                })
            }
        };
        self.set_reg(rt, value);
        Ok(())
    }

    /// MTC0: Move To Coprocessor 0
    ///
    /// Format: mtc0 rt, rd
    ///
    /// SR and EPC are written through. The breakpoint registers and CAUSE
    /// accept zero (the BIOS clears them at boot); any other value, or any
    /// other register, stops emulation.
    pub(crate) fn op_mtc0(&mut self, rt: u8, rd: u8) -> Result<()> {
        let value = self.reg(rt);

        match rd {
            COP0::SR => {
                log::trace!("SR = 0x{:08X}", value);
                self.cop0.set_status(value);
            }
            COP0::EPC => self.cop0.set_epc(value),
            COP0::BPC | COP0::BDA | COP0::TAR | COP0::DCIC | COP0::BDAM | COP0::BPCM
            | COP0::CAUSE
                if value == 0 => {}
            _ => {
                return Err(EmulatorError::InvalidCop0Register {
                    register: rd,
                    value,
                    pc: self.current_instruction_address,
                })
            }
        }
        Ok(())
    }

    /// RFE: Return From Exception
    ///
    /// Pops the KU/IE mode stack in SR by two bits.
    pub(crate) fn op_rfe(&mut self) -> Result<()> {
        self.cop0.return_from_exception();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_cop0_inst(op: u8, rt: u8, rd: u8) -> u32 {
        (0x10 << 26) | ((op as u32) << 21) | ((rt as u32) << 16) | ((rd as u32) << 11)
    }

    #[test]
    fn test_mtc0_mfc0_status() {
        let mut cpu = CPU::new();
        cpu.set_reg(5, 0x0001_0000);
        cpu.execute_cop0(make_cop0_inst(0x04, 5, COP0::SR)).unwrap();
        assert_eq!(cpu.status(), 0x0001_0000);

        cpu.execute_cop0(make_cop0_inst(0x00, 6, COP0::SR)).unwrap();
        assert_eq!(cpu.reg(6), 0x0001_0000, "no load delay on mfc0");
    }

    #[test]
    fn test_mfc0_prid() {
        let mut cpu = CPU::new();
        cpu.op_mfc0(2, COP0::PRID).unwrap();
        assert_eq!(cpu.reg(2), 2);
    }

    #[test]
    fn test_mtc0_breakpoint_registers_accept_zero() {
        let mut cpu = CPU::new();
        for reg in [
            COP0::BPC,
            COP0::BDA,
            COP0::TAR,
            COP0::DCIC,
            COP0::BDAM,
            COP0::BPCM,
            COP0::CAUSE,
        ] {
            assert!(cpu.op_mtc0(0, reg).is_ok(), "register {} accepts 0", reg);
        }
    }

    #[test]
    fn test_mtc0_nonzero_breakpoint_is_fatal() {
        let mut cpu = CPU::new();
        cpu.set_reg(1, 0x1234);
        let err = cpu.op_mtc0(1, COP0::DCIC).unwrap_err();
        assert!(matches!(
            err,
            EmulatorError::InvalidCop0Register {
                register: 7,
                value: 0x1234,
                ..
            }
        ));
        assert!(cpu.op_mtc0(1, COP0::CAUSE).is_err());
    }

    #[test]
    fn test_unmodeled_register_is_fatal() {
        let mut cpu = CPU::new();
        assert!(cpu.op_mfc0(1, 8).is_err());
        assert!(cpu.op_mtc0(0, 20).is_err());
    }

    #[test]
    fn test_rfe_pops_mode_stack() {
        let mut cpu = CPU::new();
        cpu.cop0.set_status(0x0000_003C);
        // RFE: cop0 rs=0x10, funct=0x10
        cpu.execute_cop0(0x4200_0010).unwrap();
        assert_eq!(cpu.status() & 0x3F, 0x0F);
    }

    #[test]
    fn test_unknown_cop0_operation() {
        let mut cpu = CPU::new();
        // rs = 0x02 (CFC0) is not supported
        assert!(matches!(
            cpu.execute_cop0(make_cop0_inst(0x02, 1, 12)),
            Err(EmulatorError::UnknownCop0Operation { op: 0x02, .. })
        ));
        // rs = 0x10 with a funct other than RFE
        assert!(cpu.execute_cop0(0x4200_0001).is_err());
    }
}
