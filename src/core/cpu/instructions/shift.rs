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

use super::super::CPU;
use crate::core::error::Result;

impl CPU {
    // === Shift Instructions ===

    /// SLL: Shift Left Logical
    ///
    /// Format: sll rd, rt, shamt
    /// Operation: rd = rt << shamt
    ///
    /// `sll r0, r0, 0` is the canonical NOP encoding (0x00000000).
    pub(crate) fn op_sll(&mut self, rt: u8, rd: u8, shamt: u8) -> Result<()> {
        let result = self.reg(rt) << shamt;
        self.set_reg(rd, result);
        Ok(())
    }

    /// SRL: Shift Right Logical (zero-fill)
    pub(crate) fn op_srl(&mut self, rt: u8, rd: u8, shamt: u8) -> Result<()> {
        let result = self.reg(rt) >> shamt;
        self.set_reg(rd, result);
        Ok(())
    }

    /// SRA: Shift Right Arithmetic (sign-fill)
    pub(crate) fn op_sra(&mut self, rt: u8, rd: u8, shamt: u8) -> Result<()> {
        let result = ((self.reg(rt) as i32) >> shamt) as u32;
        self.set_reg(rd, result);
        Ok(())
    }

    /// SLLV: Shift Left Logical Variable
    ///
    /// Format: sllv rd, rt, rs
    /// Operation: rd = rt << (rs & 0x1F)
    pub(crate) fn op_sllv(&mut self, rs: u8, rt: u8, rd: u8) -> Result<()> {
        let result = self.reg(rt) << (self.reg(rs) & 0x1F);
        self.set_reg(rd, result);
        Ok(())
    }

    /// SRLV: Shift Right Logical Variable
    pub(crate) fn op_srlv(&mut self, rs: u8, rt: u8, rd: u8) -> Result<()> {
        let result = self.reg(rt) >> (self.reg(rs) & 0x1F);
        self.set_reg(rd, result);
        Ok(())
    }

    /// SRAV: Shift Right Arithmetic Variable
    pub(crate) fn op_srav(&mut self, rs: u8, rt: u8, rd: u8) -> Result<()> {
        let result = ((self.reg(rt) as i32) >> (self.reg(rs) & 0x1F)) as u32;
        self.set_reg(rd, result);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_immediate_shifts() {
        let mut cpu = CPU::new();
        cpu.set_reg(1, 0x8000_0001);

        cpu.op_sll(1, 2, 4).unwrap();
        cpu.op_srl(1, 3, 4).unwrap();
        cpu.op_sra(1, 4, 4).unwrap();

        assert_eq!(cpu.reg(2), 0x0000_0010);
        assert_eq!(cpu.reg(3), 0x0800_0000);
        assert_eq!(cpu.reg(4), 0xF800_0000);
    }

    #[test]
    fn test_variable_shifts_use_low_five_bits() {
        let mut cpu = CPU::new();
        cpu.set_reg(1, 0x8000_0000);
        cpu.set_reg(2, 33); // & 0x1F == 1

        cpu.op_srlv(2, 1, 3).unwrap();
        cpu.op_srav(2, 1, 4).unwrap();
        cpu.op_sllv(2, 1, 5).unwrap();

        assert_eq!(cpu.reg(3), 0x4000_0000);
        assert_eq!(cpu.reg(4), 0xC000_0000);
        assert_eq!(cpu.reg(5), 0);
    }

    #[test]
    fn test_shift_by_zero_is_move() {
        let mut cpu = CPU::new();
        cpu.set_reg(1, 0xDEAD_BEEF);
        cpu.op_sra(1, 2, 0).unwrap();
        assert_eq!(cpu.reg(2), 0xDEAD_BEEF);
    }
}
