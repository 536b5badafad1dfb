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

use super::super::decode::{decode_i_type, sign_extend_imm};
use super::super::CPU;
use crate::core::error::Result;

impl CPU {
    // === Branch Instructions ===
    //
    // Every branch counts as issued whether or not it is taken, so the next
    // instruction is always a delay slot.

    /// Handle BCOND instructions (opcode 0x01)
    ///
    /// BCOND instructions include BLTZ, BGEZ, BLTZAL, and BGEZAL.
    /// The rt field determines which specific branch instruction it is:
    /// bit 0 selects BGEZ over BLTZ and rt = 0b1000x selects the linking
    /// form. The link register is written even when the branch is not taken.
    ///
    /// # Arguments
    ///
    /// * `instruction` - The full 32-bit instruction
    pub(crate) fn execute_bcond(&mut self, instruction: u32) -> Result<()> {
        self.begin_branch()?;

        let (_, rs, rt, imm) = decode_i_type(instruction);
        let is_bgez = (rt & 0x01) != 0;
        let is_link = (rt & 0x1E) == 0x10;

        let value = self.reg(rs) as i32;

        if is_link {
            self.set_reg(31, self.next_pc);
        }

        let should_branch = if is_bgez { value >= 0 } else { value < 0 };
        if should_branch {
            self.jump_relative(sign_extend_imm(imm) << 2);
        }
        Ok(())
    }

    /// BEQ: Branch on Equal
    ///
    /// Format: beq rs, rt, offset
    /// Operation: if (rs == rt) PC = PC + 4 + (sign_extend(offset) << 2)
    pub(crate) fn op_beq(&mut self, instruction: u32) -> Result<()> {
        self.begin_branch()?;
        let (_, rs, rt, imm) = decode_i_type(instruction);

        if self.reg(rs) == self.reg(rt) {
            self.jump_relative(sign_extend_imm(imm) << 2);
        }
        Ok(())
    }

    /// BNE: Branch on Not Equal
    pub(crate) fn op_bne(&mut self, instruction: u32) -> Result<()> {
        self.begin_branch()?;
        let (_, rs, rt, imm) = decode_i_type(instruction);

        if self.reg(rs) != self.reg(rt) {
            self.jump_relative(sign_extend_imm(imm) << 2);
        }
        Ok(())
    }

    /// BLEZ: Branch on Less Than or Equal to Zero (signed)
    pub(crate) fn op_blez(&mut self, instruction: u32) -> Result<()> {
        self.begin_branch()?;
        let (_, rs, _, imm) = decode_i_type(instruction);

        if (self.reg(rs) as i32) <= 0 {
            self.jump_relative(sign_extend_imm(imm) << 2);
        }
        Ok(())
    }

    /// BGTZ: Branch on Greater Than Zero (signed)
    pub(crate) fn op_bgtz(&mut self, instruction: u32) -> Result<()> {
        self.begin_branch()?;
        let (_, rs, _, imm) = decode_i_type(instruction);

        if (self.reg(rs) as i32) > 0 {
            self.jump_relative(sign_extend_imm(imm) << 2);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::error::EmulatorError;

    /// CPU positioned as if the instruction at 0x80001000 is executing
    fn create_test_cpu() -> CPU {
        let mut cpu = CPU::new();
        cpu.current_instruction_address = 0x8000_1000;
        cpu.pc = 0x8000_1004;
        cpu.next_pc = 0x8000_1008;
        cpu
    }

    fn make_i_type(op: u32, rs: u8, rt: u8, imm: u16) -> u32 {
        (op << 26) | ((rs as u32) << 21) | ((rt as u32) << 16) | imm as u32
    }

    #[test]
    fn test_beq_taken_targets_relative_to_delay_slot() {
        let mut cpu = create_test_cpu();
        cpu.set_reg(1, 5);
        cpu.set_reg(2, 5);
        cpu.op_beq(make_i_type(0x04, 1, 2, 0x0010)).unwrap();

        assert_eq!(cpu.pc, 0x8000_1004, "delay slot still fetched next");
        assert_eq!(cpu.next_pc, 0x8000_1044);
        assert!(cpu.executed_branch);
    }

    #[test]
    fn test_beq_backwards() {
        let mut cpu = create_test_cpu();
        cpu.op_beq(make_i_type(0x04, 0, 0, 0xFFFF)).unwrap();
        assert_eq!(cpu.next_pc, 0x8000_1000, "offset -1 loops onto itself");
    }

    #[test]
    fn test_bne_not_taken_still_marks_branch() {
        let mut cpu = create_test_cpu();
        cpu.op_bne(make_i_type(0x05, 0, 0, 0x0010)).unwrap();
        assert_eq!(cpu.next_pc, 0x8000_1008);
        assert!(cpu.executed_branch);
    }

    #[test]
    fn test_blez_bgtz() {
        let mut cpu = create_test_cpu();
        cpu.set_reg(1, 0);
        cpu.op_blez(make_i_type(0x06, 1, 0, 0x0004)).unwrap();
        assert_eq!(cpu.next_pc, 0x8000_1014);

        let mut cpu = create_test_cpu();
        cpu.set_reg(1, 0);
        cpu.op_bgtz(make_i_type(0x07, 1, 0, 0x0004)).unwrap();
        assert_eq!(cpu.next_pc, 0x8000_1008, "zero is not greater than zero");
    }

    #[test]
    fn test_bltz_bgez() {
        let mut cpu = create_test_cpu();
        cpu.set_reg(1, 0xFFFF_FFFF);
        cpu.execute_bcond(make_i_type(0x01, 1, 0x00, 0x0004)).unwrap();
        assert_eq!(cpu.next_pc, 0x8000_1014, "BLTZ taken for -1");

        let mut cpu = create_test_cpu();
        cpu.set_reg(1, 0xFFFF_FFFF);
        cpu.execute_bcond(make_i_type(0x01, 1, 0x01, 0x0004)).unwrap();
        assert_eq!(cpu.next_pc, 0x8000_1008, "BGEZ not taken for -1");
    }

    #[test]
    fn test_bcond_link_is_unconditional() {
        let mut cpu = create_test_cpu();
        cpu.set_reg(1, 1);
        // BLTZAL r1 (not taken, positive)
        cpu.execute_bcond(make_i_type(0x01, 1, 0x10, 0x0004)).unwrap();
        assert_eq!(cpu.reg(31), 0x8000_1008);
        assert_eq!(cpu.next_pc, 0x8000_1008);

        let mut cpu = create_test_cpu();
        // BGEZAL r0 (taken)
        cpu.execute_bcond(make_i_type(0x01, 0, 0x11, 0x0004)).unwrap();
        assert_eq!(cpu.reg(31), 0x8000_1008);
        assert_eq!(cpu.next_pc, 0x8000_1014);
    }

    #[test]
    fn test_bcond_non_link_rt_values_do_not_link() {
        let mut cpu = create_test_cpu();
        // rt = 0x02 decodes as BLTZ without link
        cpu.execute_bcond(make_i_type(0x01, 0, 0x02, 0x0004)).unwrap();
        assert_eq!(cpu.reg(31), 0);
    }

    #[test]
    fn test_branch_in_delay_slot_is_fatal() {
        let mut cpu = create_test_cpu();
        cpu.in_delay_slot = true;
        let err = cpu.op_beq(make_i_type(0x04, 0, 0, 0x0010)).unwrap_err();
        assert!(matches!(
            err,
            EmulatorError::BranchInDelaySlot { pc: 0x8000_1000 }
        ));
        assert_eq!(cpu.next_pc, 0x8000_1008, "target untouched");
    }
}
