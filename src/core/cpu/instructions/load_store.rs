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

//! Load and store instructions
//!
//! All data accesses become no-ops while SR.IsC (cache isolation) is set;
//! the BIOS relies on this to flush the instruction cache.
//!
//! The unaligned forms merge a register with the aligned word that
//! contains the addressed byte. For a word at address `a` with `k = a & 3`:
//!
//! | k | LWL                             | LWR                              |
//! |---|---------------------------------|----------------------------------|
//! | 0 | `(rt & 0x00FFFFFF) \| (m << 24)` | `m`                              |
//! | 1 | `(rt & 0x0000FFFF) \| (m << 16)` | `(rt & 0xFF000000) \| (m >> 8)`  |
//! | 2 | `(rt & 0x000000FF) \| (m << 8)`  | `(rt & 0xFFFF0000) \| (m >> 16)` |
//! | 3 | `m`                             | `(rt & 0xFFFFFF00) \| (m >> 24)` |
//!
//! SWL/SWR are the mirror image, writing the merged word back to `a & !3`.

use super::super::decode::{decode_i_type, sign_extend_imm};
use super::super::{ExceptionCause, CPU};
use crate::core::error::Result;
use crate::core::gpu::GPU;
use crate::core::memory::Bus;

/// Merge for LWL: register `rt`, aligned memory word `m`
#[inline(always)]
pub(crate) fn merge_lwl(rt: u32, m: u32, address: u32) -> u32 {
    match address & 3 {
        0 => (rt & 0x00FF_FFFF) | (m << 24),
        1 => (rt & 0x0000_FFFF) | (m << 16),
        2 => (rt & 0x0000_00FF) | (m << 8),
        _ => m,
    }
}

/// Merge for LWR
#[inline(always)]
pub(crate) fn merge_lwr(rt: u32, m: u32, address: u32) -> u32 {
    match address & 3 {
        0 => m,
        1 => (rt & 0xFF00_0000) | (m >> 8),
        2 => (rt & 0xFFFF_0000) | (m >> 16),
        _ => (rt & 0xFFFF_FF00) | (m >> 24),
    }
}

/// Merge for SWL: returns the word to store
#[inline(always)]
pub(crate) fn merge_swl(rt: u32, m: u32, address: u32) -> u32 {
    match address & 3 {
        0 => (m & 0xFFFF_FF00) | (rt >> 24),
        1 => (m & 0xFFFF_0000) | (rt >> 16),
        2 => (m & 0xFF00_0000) | (rt >> 8),
        _ => rt,
    }
}

/// Merge for SWR: returns the word to store
#[inline(always)]
pub(crate) fn merge_swr(rt: u32, m: u32, address: u32) -> u32 {
    match address & 3 {
        0 => rt,
        1 => (m & 0x0000_00FF) | (rt << 8),
        2 => (m & 0x0000_FFFF) | (rt << 16),
        _ => (m & 0x00FF_FFFF) | (rt << 24),
    }
}

impl CPU {
    /// Decode `rt` and `rs + sign_extend(offset)`
    #[inline(always)]
    fn memory_operands(&self, instruction: u32) -> (u8, u32) {
        let (_, rs, rt, imm) = decode_i_type(instruction);
        (rt, self.reg(rs).wrapping_add(sign_extend_imm(imm)))
    }

    // === Loads ===

    /// LB: Load Byte (sign-extended)
    pub(crate) fn op_lb(&mut self, instruction: u32, bus: &Bus, gpu: &GPU) -> Result<()> {
        if self.cop0.cache_isolated() {
            return Ok(());
        }
        let (rt, address) = self.memory_operands(instruction);
        let value = bus.read8(address, gpu)? as i8 as i32 as u32;
        self.set_reg(rt, value);
        Ok(())
    }

    /// LBU: Load Byte Unsigned
    pub(crate) fn op_lbu(&mut self, instruction: u32, bus: &Bus, gpu: &GPU) -> Result<()> {
        if self.cop0.cache_isolated() {
            return Ok(());
        }
        let (rt, address) = self.memory_operands(instruction);
        let value = bus.read8(address, gpu)? as u32;
        self.set_reg(rt, value);
        Ok(())
    }

    /// LH: Load Halfword (sign-extended)
    ///
    /// A misaligned address raises AddressErrorLoad.
    pub(crate) fn op_lh(&mut self, instruction: u32, bus: &Bus, gpu: &GPU) -> Result<()> {
        if self.cop0.cache_isolated() {
            return Ok(());
        }
        let (rt, address) = self.memory_operands(instruction);
        if address & 1 != 0 {
            return self.exception(ExceptionCause::AddressErrorLoad);
        }
        let value = bus.read16(address, gpu)? as i16 as i32 as u32;
        self.set_reg(rt, value);
        Ok(())
    }

    /// LHU: Load Halfword Unsigned
    pub(crate) fn op_lhu(&mut self, instruction: u32, bus: &Bus, gpu: &GPU) -> Result<()> {
        if self.cop0.cache_isolated() {
            return Ok(());
        }
        let (rt, address) = self.memory_operands(instruction);
        if address & 1 != 0 {
            return self.exception(ExceptionCause::AddressErrorLoad);
        }
        let value = bus.read16(address, gpu)? as u32;
        self.set_reg(rt, value);
        Ok(())
    }

    /// LW: Load Word
    ///
    /// A misaligned address raises AddressErrorLoad.
    pub(crate) fn op_lw(&mut self, instruction: u32, bus: &Bus, gpu: &GPU) -> Result<()> {
        if self.cop0.cache_isolated() {
            return Ok(());
        }
        let (rt, address) = self.memory_operands(instruction);
        if address & 3 != 0 {
            return self.exception(ExceptionCause::AddressErrorLoad);
        }
        let value = bus.read32(address, gpu)?;
        self.set_reg(rt, value);
        Ok(())
    }

    /// LWL: Load Word Left
    pub(crate) fn op_lwl(&mut self, instruction: u32, bus: &Bus, gpu: &GPU) -> Result<()> {
        if self.cop0.cache_isolated() {
            return Ok(());
        }
        let (rt, address) = self.memory_operands(instruction);
        let word = bus.read32(address & !3, gpu)?;
        let merged = merge_lwl(self.reg(rt), word, address);
        self.set_reg(rt, merged);
        Ok(())
    }

    /// LWR: Load Word Right
    pub(crate) fn op_lwr(&mut self, instruction: u32, bus: &Bus, gpu: &GPU) -> Result<()> {
        if self.cop0.cache_isolated() {
            return Ok(());
        }
        let (rt, address) = self.memory_operands(instruction);
        let word = bus.read32(address & !3, gpu)?;
        let merged = merge_lwr(self.reg(rt), word, address);
        self.set_reg(rt, merged);
        Ok(())
    }

    // === Stores ===

    /// SB: Store Byte
    pub(crate) fn op_sb(&mut self, instruction: u32, bus: &mut Bus, gpu: &mut GPU) -> Result<()> {
        if self.cop0.cache_isolated() {
            return Ok(());
        }
        let (rt, address) = self.memory_operands(instruction);
        bus.write8(address, self.reg(rt) as u8, gpu)
    }

    /// SH: Store Halfword
    ///
    /// A misaligned address raises AddressErrorStore.
    pub(crate) fn op_sh(&mut self, instruction: u32, bus: &mut Bus, gpu: &mut GPU) -> Result<()> {
        if self.cop0.cache_isolated() {
            return Ok(());
        }
        let (rt, address) = self.memory_operands(instruction);
        if address & 1 != 0 {
            return self.exception(ExceptionCause::AddressErrorStore);
        }
        bus.write16(address, self.reg(rt) as u16, gpu)
    }

    /// SW: Store Word
    ///
    /// A misaligned address raises AddressErrorStore.
    pub(crate) fn op_sw(&mut self, instruction: u32, bus: &mut Bus, gpu: &mut GPU) -> Result<()> {
        if self.cop0.cache_isolated() {
            return Ok(());
        }
        let (rt, address) = self.memory_operands(instruction);
        if address & 3 != 0 {
            return self.exception(ExceptionCause::AddressErrorStore);
        }
        bus.write32(address, self.reg(rt), gpu)
    }

    /// SWL: Store Word Left
    pub(crate) fn op_swl(&mut self, instruction: u32, bus: &mut Bus, gpu: &mut GPU) -> Result<()> {
        if self.cop0.cache_isolated() {
            return Ok(());
        }
        let (rt, address) = self.memory_operands(instruction);
        let aligned = address & !3;
        let word = bus.read32(aligned, gpu)?;
        bus.write32(aligned, merge_swl(self.reg(rt), word, address), gpu)
    }

    /// SWR: Store Word Right
    pub(crate) fn op_swr(&mut self, instruction: u32, bus: &mut Bus, gpu: &mut GPU) -> Result<()> {
        if self.cop0.cache_isolated() {
            return Ok(());
        }
        let (rt, address) = self.memory_operands(instruction);
        let aligned = address & !3;
        let word = bus.read32(aligned, gpu)?;
        bus.write32(aligned, merge_swr(self.reg(rt), word, address), gpu)
    }
}
