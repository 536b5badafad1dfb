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
use crate::core::error::{EmulatorError, Result};

/// Signed overflow of `a + b = result`
///
/// Set when both operands share a sign and the result does not.
#[inline(always)]
pub(crate) fn add_overflows(a: u32, b: u32, result: u32) -> bool {
    ((a ^ result) & (b ^ result)) >> 31 != 0
}

/// Signed overflow of `a - b = result`
#[inline(always)]
pub(crate) fn sub_overflows(a: u32, b: u32, result: u32) -> bool {
    ((a ^ b) & (a ^ result)) >> 31 != 0
}

impl CPU {
    fn overflow(&self) -> EmulatorError {
        log::debug!(
            "Overflow at 0x{:08X} (instruction 0x{:08X})",
            self.current_instruction_address,
            self.current_instruction
        );
        EmulatorError::ArithmeticOverflow {
            pc: self.current_instruction_address,
        }
    }

    // === Arithmetic Instructions ===

    /// ADD: Add (with overflow exception)
    ///
    /// Format: add rd, rs, rt
    /// Operation: rd = rs + rt
    ///
    /// The destination is written before the overflow check; an overflow
    /// then stops emulation with [`EmulatorError::ArithmeticOverflow`].
    ///
    /// # Arguments
    ///
    /// * `rs` - First source register
    /// * `rt` - Second source register
    /// * `rd` - Destination register
    pub(crate) fn op_add(&mut self, rs: u8, rt: u8, rd: u8) -> Result<()> {
        let a = self.reg(rs);
        let b = self.reg(rt);
        let result = a.wrapping_add(b);
        self.set_reg(rd, result);

        if add_overflows(a, b, result) {
            return Err(self.overflow());
        }
        Ok(())
    }

    /// ADDU: Add Unsigned (no overflow exception)
    ///
    /// Format: addu rd, rs, rt
    /// Operation: rd = rs + rt (wrapping)
    pub(crate) fn op_addu(&mut self, rs: u8, rt: u8, rd: u8) -> Result<()> {
        let result = self.reg(rs).wrapping_add(self.reg(rt));
        self.set_reg(rd, result);
        Ok(())
    }

    /// ADDI: Add Immediate (with overflow exception)
    ///
    /// Format: addi rt, rs, imm
    /// Operation: rt = rs + sign_extend(imm)
    ///
    /// # Arguments
    ///
    /// * `instruction` - The full 32-bit instruction
    pub(crate) fn op_addi(&mut self, instruction: u32) -> Result<()> {
        let (_, rs, rt, imm) = decode_i_type(instruction);
        let a = self.reg(rs);
        let b = sign_extend_imm(imm);
        let result = a.wrapping_add(b);
        self.set_reg(rt, result);

        if add_overflows(a, b, result) {
            return Err(self.overflow());
        }
        Ok(())
    }

    /// ADDIU: Add Immediate Unsigned (no overflow exception)
    ///
    /// Despite the name "unsigned", the immediate is sign-extended.
    ///
    /// Format: addiu rt, rs, imm
    /// Operation: rt = rs + sign_extend(imm)
    pub(crate) fn op_addiu(&mut self, instruction: u32) -> Result<()> {
        let (_, rs, rt, imm) = decode_i_type(instruction);
        let result = self.reg(rs).wrapping_add(sign_extend_imm(imm));
        self.set_reg(rt, result);
        Ok(())
    }

    /// SUB: Subtract (with overflow exception)
    ///
    /// Format: sub rd, rs, rt
    /// Operation: rd = rs - rt
    pub(crate) fn op_sub(&mut self, rs: u8, rt: u8, rd: u8) -> Result<()> {
        let a = self.reg(rs);
        let b = self.reg(rt);
        let result = a.wrapping_sub(b);
        self.set_reg(rd, result);

        if sub_overflows(a, b, result) {
            return Err(self.overflow());
        }
        Ok(())
    }

    /// SUBU: Subtract Unsigned (no overflow exception)
    pub(crate) fn op_subu(&mut self, rs: u8, rt: u8, rd: u8) -> Result<()> {
        let result = self.reg(rs).wrapping_sub(self.reg(rt));
        self.set_reg(rd, result);
        Ok(())
    }

    /// SLT: Set on Less Than (signed)
    ///
    /// Format: slt rd, rs, rt
    /// Operation: rd = (rs < rt) ? 1 : 0
    pub(crate) fn op_slt(&mut self, rs: u8, rt: u8, rd: u8) -> Result<()> {
        let result = (self.reg(rs) as i32) < (self.reg(rt) as i32);
        self.set_reg(rd, result as u32);
        Ok(())
    }

    /// SLTU: Set on Less Than Unsigned
    pub(crate) fn op_sltu(&mut self, rs: u8, rt: u8, rd: u8) -> Result<()> {
        let result = self.reg(rs) < self.reg(rt);
        self.set_reg(rd, result as u32);
        Ok(())
    }

    /// SLTI: Set on Less Than Immediate (signed)
    ///
    /// Format: slti rt, rs, imm
    /// Operation: rt = (rs < sign_extend(imm)) ? 1 : 0
    pub(crate) fn op_slti(&mut self, instruction: u32) -> Result<()> {
        let (_, rs, rt, imm) = decode_i_type(instruction);
        let result = (self.reg(rs) as i32) < (sign_extend_imm(imm) as i32);
        self.set_reg(rt, result as u32);
        Ok(())
    }

    /// SLTIU: Set on Less Than Immediate Unsigned
    ///
    /// The immediate is sign-extended, then compared unsigned.
    pub(crate) fn op_sltiu(&mut self, instruction: u32) -> Result<()> {
        let (_, rs, rt, imm) = decode_i_type(instruction);
        let result = self.reg(rs) < sign_extend_imm(imm);
        self.set_reg(rt, result as u32);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn create_test_cpu() -> CPU {
        let mut cpu = CPU::new();
        cpu.current_instruction_address = 0x8000_1000;
        cpu.pc = 0x8000_1004;
        cpu.next_pc = 0x8000_1008;
        cpu
    }

    fn make_addi(rs: u8, rt: u8, imm: u16) -> u32 {
        (0x08 << 26) | ((rs as u32) << 21) | ((rt as u32) << 16) | imm as u32
    }

    #[test]
    fn test_add_basic() {
        let mut cpu = create_test_cpu();
        cpu.set_reg(1, 100);
        cpu.set_reg(2, 23);
        cpu.op_add(1, 2, 3).unwrap();
        assert_eq!(cpu.reg(3), 123);
        assert_eq!(cpu.pc, 0x8000_1004, "no exception without overflow");
    }

    #[test]
    fn test_add_overflow_writes_result_then_stops() {
        let mut cpu = create_test_cpu();
        cpu.set_reg(1, 0x7FFF_FFFF);
        cpu.set_reg(2, 1);
        let err = cpu.op_add(1, 2, 3).unwrap_err();

        assert!(matches!(err, EmulatorError::ArithmeticOverflow { pc: 0x8000_1000 }));
        assert_eq!(cpu.reg(3), 0x8000_0000, "result written before the stop");
        assert_eq!(cpu.pc, 0x8000_1004, "no exception vector taken");
        assert_eq!(cpu.cop0.cause(), 0);
    }

    #[test]
    fn test_addu_wraps_without_exception() {
        let mut cpu = create_test_cpu();
        cpu.set_reg(1, 0xFFFF_FFFF);
        cpu.set_reg(2, 2);
        cpu.op_addu(1, 2, 3).unwrap();
        assert_eq!(cpu.reg(3), 1);
        assert_eq!(cpu.cop0.cause(), 0);
    }

    #[test]
    fn test_addi_negative_immediate() {
        let mut cpu = create_test_cpu();
        cpu.set_reg(1, 10);
        cpu.op_addi(make_addi(1, 2, 0xFFFE)).unwrap();
        assert_eq!(cpu.reg(2), 8);
    }

    #[test]
    fn test_addi_overflow_negative() {
        let mut cpu = create_test_cpu();
        cpu.set_reg(1, 0x8000_0000);
        let err = cpu.op_addi(make_addi(1, 2, 0xFFFF)).unwrap_err();
        assert!(matches!(err, EmulatorError::ArithmeticOverflow { .. }));
        assert_eq!(cpu.reg(2), 0x7FFF_FFFF);
    }

    #[test]
    fn test_overflow_in_delay_slot_reports_overflow() {
        let mut cpu = create_test_cpu();
        cpu.in_delay_slot = true;
        cpu.set_reg(1, 0x7FFF_FFFF);
        cpu.set_reg(2, 0x7FFF_FFFF);
        let err = cpu.op_add(1, 2, 3).unwrap_err();
        assert!(matches!(err, EmulatorError::ArithmeticOverflow { pc: 0x8000_1000 }));
        assert_eq!(cpu.reg(3), 0xFFFF_FFFE);
    }

    #[test]
    fn test_sub_overflow() {
        let mut cpu = create_test_cpu();
        cpu.set_reg(1, 0x8000_0000);
        cpu.set_reg(2, 1);
        let err = cpu.op_sub(1, 2, 3).unwrap_err();
        assert!(matches!(err, EmulatorError::ArithmeticOverflow { .. }));
        assert_eq!(cpu.reg(3), 0x7FFF_FFFF);
    }

    #[test]
    fn test_subu() {
        let mut cpu = create_test_cpu();
        cpu.set_reg(1, 0);
        cpu.set_reg(2, 1);
        cpu.op_subu(1, 2, 3).unwrap();
        assert_eq!(cpu.reg(3), 0xFFFF_FFFF);
    }

    #[test]
    fn test_slt_signed_and_unsigned() {
        let mut cpu = create_test_cpu();
        cpu.set_reg(1, 0xFFFF_FFFF); // -1
        cpu.set_reg(2, 1);
        cpu.op_slt(1, 2, 3).unwrap();
        cpu.op_sltu(1, 2, 4).unwrap();
        assert_eq!(cpu.reg(3), 1, "-1 < 1 signed");
        assert_eq!(cpu.reg(4), 0, "0xFFFFFFFF > 1 unsigned");
    }

    #[test]
    fn test_sltiu_sign_extends_immediate() {
        let mut cpu = create_test_cpu();
        cpu.set_reg(1, 0x8000_0000);
        // sltiu r2, r1, -1 compares against 0xFFFFFFFF
        let instr = (0x0B << 26) | (1 << 21) | (2 << 16) | 0xFFFF;
        cpu.op_sltiu(instr).unwrap();
        assert_eq!(cpu.reg(2), 1);

        let instr = (0x0A << 26) | (1 << 21) | (3 << 16) | 0xFFFF;
        cpu.op_slti(instr).unwrap();
        assert_eq!(cpu.reg(3), 1, "i32::MIN < -1");
    }

    proptest! {
        #[test]
        fn prop_add_overflow_matches_checked_add(a in any::<u32>(), b in any::<u32>()) {
            let result = a.wrapping_add(b);
            let expected = (a as i32).checked_add(b as i32).is_none();
            prop_assert_eq!(add_overflows(a, b, result), expected);
        }

        #[test]
        fn prop_sub_overflow_matches_checked_sub(a in any::<u32>(), b in any::<u32>()) {
            let result = a.wrapping_sub(b);
            let expected = (a as i32).checked_sub(b as i32).is_none();
            prop_assert_eq!(sub_overflows(a, b, result), expected);
        }

        #[test]
        fn prop_add_writes_result_regardless_of_overflow(a in any::<u32>(), b in any::<u32>()) {
            let mut cpu = create_test_cpu();
            cpu.set_reg(1, a);
            cpu.set_reg(2, b);
            let stopped = cpu.op_add(1, 2, 3).is_err();
            prop_assert_eq!(cpu.reg(3), a.wrapping_add(b));
            prop_assert_eq!(stopped, (a as i32).checked_add(b as i32).is_none());
        }
    }
}
