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

//! GP0 command dispatch
//!
//! A single 256-entry table gives the total word count (opcode word
//! included) of every buffered command. Opcodes with a zero entry either
//! execute immediately from the opcode word or are unknown.

mod drawing_mode;
mod polygon;
mod rectangle;
mod transfer;

use super::GPU;
use crate::core::error::{EmulatorError, Result};

static COMMAND_LENGTHS: [u8; 256] = build_command_lengths();

const fn build_command_lengths() -> [u8; 256] {
    let mut table = [0u8; 256];

    table[0x02] = 3;

    table[0x20] = 4;
    table[0x22] = 4;
    table[0x28] = 5;
    table[0x2A] = 5;

    let mut op = 0x2C;
    while op <= 0x2F {
        table[op] = 9;
        op += 1;
    }

    table[0x30] = 6;
    table[0x32] = 6;
    table[0x38] = 8;
    table[0x3A] = 8;

    table[0xA0] = 3;
    table[0xC0] = 3;

    table
}

/// Total words of a buffered GP0 command, 0 if it is not buffered
#[inline(always)]
pub(crate) fn command_length(opcode: u8) -> usize {
    COMMAND_LENGTHS[opcode as usize] as usize
}

impl GPU {
    /// Execute a single-word command in the idle state
    pub(super) fn execute_immediate(&mut self, opcode: u8, word: u32) -> Result<()> {
        match opcode {
            0x00 => {}
            0x01 => log::debug!("GP0 clear cache"),
            0x1F => {
                self.status.set_irq(1);
                log::debug!("GP0 interrupt request");
            }
            0xE1 => self.gp0_draw_mode(word),
            0xE2 => self.gp0_texture_window(word),
            0xE3 => self.gp0_draw_area_top_left(word),
            0xE4 => self.gp0_draw_area_bottom_right(word),
            0xE5 => self.gp0_draw_offset(word),
            0xE6 => self.gp0_mask_settings(word),
            _ => return Err(EmulatorError::UnknownGp0Command { opcode, word }),
        }
        Ok(())
    }

    /// Dispatch a fully buffered command
    pub(super) fn execute_buffered(&mut self) -> Result<()> {
        let params = self.params;
        let opcode = (params[0] >> 24) as u8;
        let semi_transparent = opcode & 0x02 != 0;

        log::debug!("GP0 command 0x{:02X}", opcode);

        match opcode {
            0x02 => self.gp0_fill_rectangle(&params),
            0x20 | 0x22 => self.gp0_monochrome_triangle(&params, semi_transparent),
            0x28 | 0x2A => self.gp0_monochrome_quad(&params, semi_transparent),
            0x2C..=0x2F => self.gp0_textured_quad(&params, semi_transparent),
            0x30 | 0x32 => self.gp0_shaded_triangle(&params, semi_transparent),
            0x38 | 0x3A => self.gp0_shaded_quad(&params, semi_transparent),
            0xA0 => self.gp0_cpu_to_vram(&params),
            0xC0 => self.gp0_vram_to_cpu(&params),
            // Only reachable if the length table and this match disagree
            _ => {
                return Err(EmulatorError::UnknownGp0Command {
                    opcode,
                    word: params[0],
                })
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_command_lengths() {
        assert_eq!(command_length(0x02), 3);
        assert_eq!(command_length(0x28), 5);
        assert_eq!(command_length(0x2C), 9);
        assert_eq!(command_length(0x2F), 9);
        assert_eq!(command_length(0x38), 8);
        assert_eq!(command_length(0xA0), 3);
        assert_eq!(command_length(0xE1), 0);
        assert_eq!(command_length(0x00), 0);
    }

    #[test]
    fn test_every_buffered_length_fits_parameter_buffer() {
        for op in 0..=255u8 {
            assert!(command_length(op) <= super::super::MAX_PARAMS);
        }
    }

    #[test]
    fn test_unknown_immediate_opcode_is_fatal() {
        let mut gpu = GPU::new();
        assert!(matches!(
            gpu.write_gp0(0x8000_0000),
            Err(EmulatorError::UnknownGp0Command {
                opcode: 0x80,
                word: 0x8000_0000
            })
        ));
    }

    #[test]
    fn test_interrupt_request_sets_status_bit() {
        let mut gpu = GPU::new();
        gpu.write_gp0(0x1F00_0000).unwrap();
        assert_eq!(gpu.status() & (1 << 24), 1 << 24);
    }
}
