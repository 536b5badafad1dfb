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

//! GP1 control commands
//!
//! Implements GPU control operations including reset, interrupt, DMA and
//! GPU info requests.

use super::super::GPU;

/// Value returned by the GPU version info request
const GPU_VERSION: u32 = 2;

impl GPU {
    /// GP1(0x00): Reset GPU
    ///
    /// Restores every configuration field to its startup value and returns
    /// GP0 to idle. GPUSTAT goes back to 0x1C000000 (ready bits only).
    pub(crate) fn gp1_reset_gpu(&mut self) {
        self.soft_reset();
        log::debug!("GPU reset");
    }

    /// GP1(0x01): Reset Command Buffer
    ///
    /// Drops a partially received GP0 command or image.
    pub(crate) fn gp1_reset_command_buffer(&mut self) {
        self.reset_command_buffer();
        log::debug!("Command buffer reset");
    }

    /// GP1(0x02): Acknowledge GPU Interrupt
    pub(crate) fn gp1_acknowledge_interrupt(&mut self) {
        self.status.set_irq(0);
        log::debug!("GPU interrupt acknowledged");
    }

    /// GP1(0x04): DMA Direction
    ///
    /// # Arguments
    ///
    /// * `value` - Bits 0-1: Direction (0=Off, 1=FIFO, 2=CPUtoGP0, 3=GPUREADtoCPU)
    pub(crate) fn gp1_dma_direction(&mut self, value: u32) {
        let direction = value & 3;
        self.status.set_dma_direction(direction);

        match direction {
            0 => log::debug!("DMA off"),
            1 => log::debug!("DMA FIFO"),
            2 => log::debug!("DMA CPU→GP0"),
            _ => log::debug!("DMA GPUREAD→CPU"),
        }
    }

    /// GP1(0x10-0x1F): GPU Info
    ///
    /// Latches the requested value into GPUREAD. Unlisted info types leave
    /// GPUREAD unchanged.
    ///
    /// * 0x02: Texture window settings
    /// * 0x03: Draw area top left
    /// * 0x04: Draw area bottom right
    /// * 0x05: Draw offset
    /// * 0x07: GPU version (2)
    pub(crate) fn gp1_get_gpu_info(&mut self, value: u32) {
        let info_type = value & 0x07;

        let response = match info_type {
            0x02 => self.texture_window.to_bits(),
            0x03 => self.draw_area.left as u32 | ((self.draw_area.top as u32) << 10),
            0x04 => self.draw_area.right as u32 | ((self.draw_area.bottom as u32) << 10),
            0x05 => {
                let (x, y) = self.draw_offset;
                (x as u32 & 0x7FF) | ((y as u32 & 0x7FF) << 11)
            }
            0x07 => GPU_VERSION,
            _ => {
                log::debug!("GPU info request: type {} ignored", info_type);
                return;
            }
        };

        log::debug!("GPU info request: type {} = 0x{:08X}", info_type, response);
        self.gpuread = response;
    }
}
