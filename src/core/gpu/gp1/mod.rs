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

//! GP1 control command dispatch
//!
//! The opcode lives in bits 24-29; bits 30-31 are ignored because the upper
//! half of the opcode space mirrors the lower half.

mod control;
mod display;

use super::GPU;
use crate::core::error::{EmulatorError, Result};

impl GPU {
    pub(super) fn execute_gp1(&mut self, word: u32) -> Result<()> {
        let opcode = ((word >> 24) & 0x3F) as u8;

        log::trace!("GP1 0x{:08X}", word);

        match opcode {
            0x00 => self.gp1_reset_gpu(),
            0x01 => self.gp1_reset_command_buffer(),
            0x02 => self.gp1_acknowledge_interrupt(),
            0x03 => self.gp1_display_enable(word),
            0x04 => self.gp1_dma_direction(word),
            0x05 => self.gp1_display_area_start(word),
            0x06 => self.gp1_horizontal_display_range(word),
            0x07 => self.gp1_vertical_display_range(word),
            0x08 => self.gp1_display_mode(word),
            0x10..=0x1F => self.gp1_get_gpu_info(word),
            _ => return Err(EmulatorError::UnknownGp1Command { opcode, word }),
        }
        Ok(())
    }
}
