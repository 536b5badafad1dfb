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

//! Multiply/divide instructions and HI/LO moves
//!
//! Division never traps. The two undefined inputs of MIPS division produce
//! the same fixed results as the R3000A:
//!
//! | Operation           | HI        | LO                         |
//! |---------------------|-----------|----------------------------|
//! | `div x, 0`          | x         | -1 if x >= 0, else 1       |
//! | `div 0x80000000, -1`| 0         | 0x80000000                 |
//! | `divu x, 0`         | x         | 0xFFFFFFFF                 |

use super::super::CPU;
use crate::core::error::Result;

/// Signed division with R3000A results for the undefined cases
///
/// # Returns
///
/// Tuple of (hi, lo) = (remainder, quotient)
pub(crate) fn divide_signed(numerator: u32, divisor: u32) -> (u32, u32) {
    let n = numerator as i32;
    let d = divisor as i32;

    if d == 0 {
        let lo = if n >= 0 { 0xFFFF_FFFF } else { 1 };
        (numerator, lo)
    } else if n == i32::MIN && d == -1 {
        (0, 0x8000_0000)
    } else {
        ((n % d) as u32, (n / d) as u32)
    }
}

/// Unsigned division with the R3000A result for a zero divisor
///
/// # Returns
///
/// Tuple of (hi, lo) = (remainder, quotient)
pub(crate) fn divide_unsigned(numerator: u32, divisor: u32) -> (u32, u32) {
    if divisor == 0 {
        (numerator, 0xFFFF_FFFF)
    } else {
        (numerator % divisor, numerator / divisor)
    }
}

impl CPU {
    /// MULT: signed 64-bit product into HI:LO
    pub(crate) fn op_mult(&mut self, rs: u8, rt: u8) -> Result<()> {
        let a = self.reg(rs) as i32 as i64;
        let b = self.reg(rt) as i32 as i64;
        let product = (a * b) as u64;
        self.hi = (product >> 32) as u32;
        self.lo = product as u32;
        Ok(())
    }

    /// MULTU: unsigned 64-bit product into HI:LO
    pub(crate) fn op_multu(&mut self, rs: u8, rt: u8) -> Result<()> {
        let product = (self.reg(rs) as u64) * (self.reg(rt) as u64);
        self.hi = (product >> 32) as u32;
        self.lo = product as u32;
        Ok(())
    }

    /// DIV: signed division, quotient in LO and remainder in HI
    pub(crate) fn op_div(&mut self, rs: u8, rt: u8) -> Result<()> {
        let (hi, lo) = divide_signed(self.reg(rs), self.reg(rt));
        self.hi = hi;
        self.lo = lo;
        Ok(())
    }

    /// DIVU: unsigned division, quotient in LO and remainder in HI
    pub(crate) fn op_divu(&mut self, rs: u8, rt: u8) -> Result<()> {
        let (hi, lo) = divide_unsigned(self.reg(rs), self.reg(rt));
        self.hi = hi;
        self.lo = lo;
        Ok(())
    }

    /// MFHI: rd = HI
    pub(crate) fn op_mfhi(&mut self, rd: u8) -> Result<()> {
        self.set_reg(rd, self.hi);
        Ok(())
    }

    /// MTHI: HI = rs
    pub(crate) fn op_mthi(&mut self, rs: u8) -> Result<()> {
        self.hi = self.reg(rs);
        Ok(())
    }

    /// MFLO: rd = LO
    pub(crate) fn op_mflo(&mut self, rd: u8) -> Result<()> {
        self.set_reg(rd, self.lo);
        Ok(())
    }

    /// MTLO: LO = rs
    pub(crate) fn op_mtlo(&mut self, rs: u8) -> Result<()> {
        self.lo = self.reg(rs);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_mult_signed() {
        let mut cpu = CPU::new();
        cpu.set_reg(1, (-3i32) as u32);
        cpu.set_reg(2, 5);
        cpu.op_mult(1, 2).unwrap();
        assert_eq!(cpu.lo(), (-15i32) as u32);
        assert_eq!(cpu.hi(), 0xFFFF_FFFF, "sign extends into HI");
    }

    #[test]
    fn test_multu_large() {
        let mut cpu = CPU::new();
        cpu.set_reg(1, 0xFFFF_FFFF);
        cpu.set_reg(2, 0xFFFF_FFFF);
        cpu.op_multu(1, 2).unwrap();
        assert_eq!(cpu.hi(), 0xFFFF_FFFE);
        assert_eq!(cpu.lo(), 0x0000_0001);
    }

    #[test]
    fn test_div_basic() {
        let mut cpu = CPU::new();
        cpu.set_reg(1, (-7i32) as u32);
        cpu.set_reg(2, 2);
        cpu.op_div(1, 2).unwrap();
        assert_eq!(cpu.lo(), (-3i32) as u32, "quotient truncates toward zero");
        assert_eq!(cpu.hi(), (-1i32) as u32, "remainder takes dividend sign");
    }

    #[test]
    fn test_div_by_zero() {
        assert_eq!(divide_signed(5, 0), (5, 0xFFFF_FFFF));
        assert_eq!(divide_signed(0, 0), (0, 0xFFFF_FFFF));
        assert_eq!(divide_signed((-5i32) as u32, 0), ((-5i32) as u32, 1));
    }

    #[test]
    fn test_div_int_min_by_minus_one() {
        assert_eq!(divide_signed(0x8000_0000, 0xFFFF_FFFF), (0, 0x8000_0000));
    }

    #[test]
    fn test_divu_by_zero() {
        assert_eq!(divide_unsigned(0x1234, 0), (0x1234, 0xFFFF_FFFF));
    }

    #[test]
    fn test_hi_lo_moves() {
        let mut cpu = CPU::new();
        cpu.set_reg(1, 0xAAAA_0000);
        cpu.set_reg(2, 0x0000_5555);
        cpu.op_mthi(1).unwrap();
        cpu.op_mtlo(2).unwrap();
        cpu.op_mfhi(3).unwrap();
        cpu.op_mflo(4).unwrap();
        assert_eq!(cpu.reg(3), 0xAAAA_0000);
        assert_eq!(cpu.reg(4), 0x0000_5555);
    }

    proptest! {
        #[test]
        fn prop_divu_by_zero(x in any::<u32>()) {
            prop_assert_eq!(divide_unsigned(x, 0), (x, 0xFFFF_FFFF));
        }

        #[test]
        fn prop_div_by_zero(x in any::<u32>()) {
            let expected_lo = if (x as i32) >= 0 { 0xFFFF_FFFF } else { 1 };
            prop_assert_eq!(divide_signed(x, 0), (x, expected_lo));
        }

        #[test]
        fn prop_div_reconstructs_dividend(n in any::<i32>(), d in any::<i32>()) {
            prop_assume!(d != 0 && !(n == i32::MIN && d == -1));
            let (hi, lo) = divide_signed(n as u32, d as u32);
            prop_assert_eq!((lo as i32).wrapping_mul(d).wrapping_add(hi as i32), n);
        }
    }
}
