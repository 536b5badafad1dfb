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

//! Instruction dispatch
//!
//! The primary opcode selects a handler directly; opcode 0x00 (SPECIAL)
//! dispatches again on the function field, 0x01 (BCOND) on the rt field and
//! 0x10 (COP0) on the rs field.

mod arithmetic;
mod branch;
mod cop0;
mod exception;
mod jump;
mod load_store;
mod logical;
mod multiply;
mod shift;

use super::decode::{decode_r_type, opcode};
use super::CPU;
use crate::core::error::{EmulatorError, Result};
use crate::core::gpu::GPU;
use crate::core::memory::Bus;

impl CPU {
    /// Decode and execute one instruction word
    pub(super) fn execute_instruction(
        &mut self,
        instruction: u32,
        bus: &mut Bus,
        gpu: &mut GPU,
    ) -> Result<()> {
        match opcode(instruction) {
            0x00 => self.execute_special(instruction),
            0x01 => self.execute_bcond(instruction),
            0x02 => self.op_j(instruction),
            0x03 => self.op_jal(instruction),
            0x04 => self.op_beq(instruction),
            0x05 => self.op_bne(instruction),
            0x06 => self.op_blez(instruction),
            0x07 => self.op_bgtz(instruction),
            0x08 => self.op_addi(instruction),
            0x09 => self.op_addiu(instruction),
            0x0A => self.op_slti(instruction),
            0x0B => self.op_sltiu(instruction),
            0x0C => self.op_andi(instruction),
            0x0D => self.op_ori(instruction),
            0x0E => self.op_xori(instruction),
            0x0F => self.op_lui(instruction),
            0x10 => self.execute_cop0(instruction),
            0x20 => self.op_lb(instruction, bus, gpu),
            0x21 => self.op_lh(instruction, bus, gpu),
            0x22 => self.op_lwl(instruction, bus, gpu),
            0x23 => self.op_lw(instruction, bus, gpu),
            0x24 => self.op_lbu(instruction, bus, gpu),
            0x25 => self.op_lhu(instruction, bus, gpu),
            0x26 => self.op_lwr(instruction, bus, gpu),
            0x28 => self.op_sb(instruction, bus, gpu),
            0x29 => self.op_sh(instruction, bus, gpu),
            0x2A => self.op_swl(instruction, bus, gpu),
            0x2B => self.op_sw(instruction, bus, gpu),
            0x2E => self.op_swr(instruction, bus, gpu),
            op => Err(EmulatorError::UnknownOpcode {
                opcode: op,
                instruction,
                pc: self.current_instruction_address,
            }),
        }
    }

    /// Execute a SPECIAL (opcode 0x00) instruction
    fn execute_special(&mut self, instruction: u32) -> Result<()> {
        let (rs, rt, rd, shamt, funct) = decode_r_type(instruction);

        match funct {
            0x00 => self.op_sll(rt, rd, shamt),
            0x02 => self.op_srl(rt, rd, shamt),
            0x03 => self.op_sra(rt, rd, shamt),
            0x04 => self.op_sllv(rs, rt, rd),
            0x06 => self.op_srlv(rs, rt, rd),
            0x07 => self.op_srav(rs, rt, rd),
            0x08 => self.op_jr(rs),
            0x09 => self.op_jalr(rs, rd),
            0x0C => self.op_syscall(instruction),
            0x0D => self.op_break(instruction),
            0x10 => self.op_mfhi(rd),
            0x11 => self.op_mthi(rs),
            0x12 => self.op_mflo(rd),
            0x13 => self.op_mtlo(rs),
            0x18 => self.op_mult(rs, rt),
            0x19 => self.op_multu(rs, rt),
            0x1A => self.op_div(rs, rt),
            0x1B => self.op_divu(rs, rt),
            0x20 => self.op_add(rs, rt, rd),
            0x21 => self.op_addu(rs, rt, rd),
            0x22 => self.op_sub(rs, rt, rd),
            0x23 => self.op_subu(rs, rt, rd),
            0x24 => self.op_and(rs, rt, rd),
            0x25 => self.op_or(rs, rt, rd),
            0x26 => self.op_xor(rs, rt, rd),
            0x27 => self.op_nor(rs, rt, rd),
            0x2A => self.op_slt(rs, rt, rd),
            0x2B => self.op_sltu(rs, rt, rd),
            _ => Err(EmulatorError::UnknownSpecialFunction {
                funct,
                instruction,
                pc: self.current_instruction_address,
            }),
        }
    }
}
