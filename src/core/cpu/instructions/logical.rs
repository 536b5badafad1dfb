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

use super::super::decode::decode_i_type;
use super::super::CPU;
use crate::core::error::Result;

impl CPU {
    // === Logical Instructions ===
    //
    // Immediate forms zero-extend their 16-bit operand.

    /// AND: rd = rs & rt
    pub(crate) fn op_and(&mut self, rs: u8, rt: u8, rd: u8) -> Result<()> {
        let result = self.reg(rs) & self.reg(rt);
        self.set_reg(rd, result);
        Ok(())
    }

    /// OR: rd = rs | rt
    pub(crate) fn op_or(&mut self, rs: u8, rt: u8, rd: u8) -> Result<()> {
        let result = self.reg(rs) | self.reg(rt);
        self.set_reg(rd, result);
        Ok(())
    }

    /// XOR: rd = rs ^ rt
    pub(crate) fn op_xor(&mut self, rs: u8, rt: u8, rd: u8) -> Result<()> {
        let result = self.reg(rs) ^ self.reg(rt);
        self.set_reg(rd, result);
        Ok(())
    }

    /// NOR: rd = !(rs | rt)
    pub(crate) fn op_nor(&mut self, rs: u8, rt: u8, rd: u8) -> Result<()> {
        let result = !(self.reg(rs) | self.reg(rt));
        self.set_reg(rd, result);
        Ok(())
    }

    /// ANDI: rt = rs & zero_extend(imm)
    pub(crate) fn op_andi(&mut self, instruction: u32) -> Result<()> {
        let (_, rs, rt, imm) = decode_i_type(instruction);
        let result = self.reg(rs) & (imm as u32);
        self.set_reg(rt, result);
        Ok(())
    }

    /// ORI: rt = rs | zero_extend(imm)
    pub(crate) fn op_ori(&mut self, instruction: u32) -> Result<()> {
        let (_, rs, rt, imm) = decode_i_type(instruction);
        let result = self.reg(rs) | (imm as u32);
        self.set_reg(rt, result);
        Ok(())
    }

    /// XORI: rt = rs ^ zero_extend(imm)
    pub(crate) fn op_xori(&mut self, instruction: u32) -> Result<()> {
        let (_, rs, rt, imm) = decode_i_type(instruction);
        let result = self.reg(rs) ^ (imm as u32);
        self.set_reg(rt, result);
        Ok(())
    }

    /// LUI: Load Upper Immediate
    ///
    /// Format: lui rt, imm
    /// Operation: rt = imm << 16
    pub(crate) fn op_lui(&mut self, instruction: u32) -> Result<()> {
        let (_, _, rt, imm) = decode_i_type(instruction);
        self.set_reg(rt, (imm as u32) << 16);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_i_type(op: u32, rs: u8, rt: u8, imm: u16) -> u32 {
        (op << 26) | ((rs as u32) << 21) | ((rt as u32) << 16) | imm as u32
    }

    #[test]
    fn test_register_forms() {
        let mut cpu = CPU::new();
        cpu.set_reg(1, 0xFF00_FF00);
        cpu.set_reg(2, 0x0FF0_0FF0);

        cpu.op_and(1, 2, 3).unwrap();
        cpu.op_or(1, 2, 4).unwrap();
        cpu.op_xor(1, 2, 5).unwrap();
        cpu.op_nor(1, 2, 6).unwrap();

        assert_eq!(cpu.reg(3), 0x0F00_0F00);
        assert_eq!(cpu.reg(4), 0xFFF0_FFF0);
        assert_eq!(cpu.reg(5), 0xF0F0_F0F0);
        assert_eq!(cpu.reg(6), 0x000F_000F);
    }

    #[test]
    fn test_immediates_are_zero_extended() {
        let mut cpu = CPU::new();
        cpu.set_reg(1, 0xFFFF_FFFF);
        cpu.op_andi(make_i_type(0x0C, 1, 2, 0x8000)).unwrap();
        assert_eq!(cpu.reg(2), 0x0000_8000);

        cpu.set_reg(1, 0);
        cpu.op_ori(make_i_type(0x0D, 1, 3, 0xFFFF)).unwrap();
        assert_eq!(cpu.reg(3), 0x0000_FFFF);

        cpu.set_reg(1, 0x1234_0000);
        cpu.op_xori(make_i_type(0x0E, 1, 4, 0xFFFF)).unwrap();
        assert_eq!(cpu.reg(4), 0x1234_FFFF);
    }

    #[test]
    fn test_lui() {
        let mut cpu = CPU::new();
        cpu.set_reg(8, 0xFFFF_FFFF);
        cpu.op_lui(make_i_type(0x0F, 0, 8, 0x1F80)).unwrap();
        assert_eq!(cpu.reg(8), 0x1F80_0000, "lower half cleared");
    }

    #[test]
    fn test_writes_to_r0_ignored() {
        let mut cpu = CPU::new();
        cpu.op_lui(make_i_type(0x0F, 0, 0, 0xFFFF)).unwrap();
        assert_eq!(cpu.reg(0), 0);
    }
}
