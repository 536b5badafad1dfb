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

use super::super::decode::decode_j_type;
use super::super::CPU;
use crate::core::error::Result;

impl CPU {
    // === Jump Instructions ===

    /// J: Jump
    ///
    /// Format: j target
    /// Operation: PC = (PC & 0xF0000000) | (target << 2)
    ///
    /// The upper four bits come from the delay slot address.
    pub(crate) fn op_j(&mut self, instruction: u32) -> Result<()> {
        self.begin_branch()?;
        let (_, target) = decode_j_type(instruction);
        self.next_pc = (self.next_pc & 0xF000_0000) | (target << 2);
        Ok(())
    }

    /// JAL: Jump and Link
    ///
    /// Format: jal target
    /// Operation: r31 = address after the delay slot; PC = J target
    pub(crate) fn op_jal(&mut self, instruction: u32) -> Result<()> {
        self.begin_branch()?;
        let (_, target) = decode_j_type(instruction);
        self.set_reg(31, self.next_pc);
        self.next_pc = (self.next_pc & 0xF000_0000) | (target << 2);
        Ok(())
    }

    /// JR: Jump Register
    ///
    /// Format: jr rs
    /// Operation: PC = rs
    pub(crate) fn op_jr(&mut self, rs: u8) -> Result<()> {
        self.begin_branch()?;
        self.next_pc = self.reg(rs);
        Ok(())
    }

    /// JALR: Jump and Link Register
    ///
    /// Format: jalr rd, rs
    /// Operation: rd = address after the delay slot; PC = rs
    ///
    /// The target is read before rd is written, so `jalr rs, rs` jumps to
    /// the old value.
    pub(crate) fn op_jalr(&mut self, rs: u8, rd: u8) -> Result<()> {
        self.begin_branch()?;
        let target = self.reg(rs);
        self.set_reg(rd, self.next_pc);
        self.next_pc = target;
        Ok(())
    }
}
