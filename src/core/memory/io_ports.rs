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

//! I/O port dispatch for the 0x1F801000 register window
//!
//! DMA and GPU registers are 32 bits wide. Narrow reads return the
//! addressed bytes of the containing register; narrow writes are ignored.
//! Every other address in the window is an unimplemented peripheral that
//! reads 0 and discards writes.

use super::{AccessSize, Bus};
use crate::core::dma::DMA;
use crate::core::error::Result;
use crate::core::gpu::GPU;

/// GPU GP0/GPUREAD register (command/data and read)
const GPU_GP0: u32 = 0x1F80_1810;

/// GPU GP1/GPUSTAT register (control and status)
const GPU_GP1: u32 = 0x1F80_1814;

const GPU_END: u32 = 0x1F80_1818;

const DMA_START: u32 = DMA::REGISTER_BASE;
const DMA_END: u32 = DMA::REGISTER_BASE + DMA::REGISTER_SPAN;

/// SPU voice, control and reverb registers
const SPU_START: u32 = 0x1F80_1C00;
const SPU_END: u32 = 0x1F80_2000;

/// BIOS POST boot-stage display
const POST_PORT: u32 = 0x1F80_2041;

impl Bus {
    /// Read from the I/O window
    pub(super) fn read_io(&self, paddr: u32, size: AccessSize, gpu: &GPU) -> u32 {
        let register = paddr & !3;
        let shift = (paddr & 3) * 8;

        let value = match register {
            DMA_START..DMA_END => self.dma.read_register(register - DMA_START),
            GPU_GP0 => gpu.read_gpuread(),
            GPU_GP1 => gpu.status(),
            SPU_START..SPU_END => {
                log::trace!("SPU read at 0x{:08X} (stubbed)", paddr);
                0
            }
            _ => {
                log::debug!("Unimplemented I/O read at 0x{:08X}", paddr);
                0
            }
        };

        (value >> shift) & size.mask()
    }

    /// Write to the I/O window
    ///
    /// # Errors
    ///
    /// Propagates DMA transfer and GPU command errors.
    pub(super) fn write_io(
        &mut self,
        paddr: u32,
        size: AccessSize,
        value: u32,
        gpu: &mut GPU,
    ) -> Result<()> {
        let wide_register = (DMA_START..DMA_END).contains(&paddr)
            || (GPU_GP0..GPU_END).contains(&paddr);

        if wide_register && size != AccessSize::Word {
            log::warn!(
                "Ignoring {}-byte write to 32-bit register 0x{:08X} (value 0x{:X})",
                size.bytes(),
                paddr,
                value
            );
            return Ok(());
        }

        match paddr {
            DMA_START..DMA_END => {
                self.dma
                    .write_register(paddr - DMA_START, value, &mut self.ram, gpu)
            }
            GPU_GP0 => gpu.write_gp0(value),
            GPU_GP1 => gpu.write_gp1(value),
            SPU_START..SPU_END => {
                log::trace!("SPU write at 0x{:08X} = 0x{:X} (ignored)", paddr, value);
                Ok(())
            }
            _ => {
                log::warn!(
                    "Ignoring write to unimplemented I/O 0x{:08X} (value 0x{:X})",
                    paddr,
                    value
                );
                Ok(())
            }
        }
    }

    /// Write to expansion region 2
    pub(super) fn write_expansion2(&mut self, paddr: u32, value: u32) {
        if paddr == POST_PORT {
            log::info!("BIOS POST: 0x{:02X}", value & 0xFF);
        } else {
            log::debug!(
                "Ignoring write to expansion 2 at 0x{:08X} (value 0x{:X})",
                paddr,
                value
            );
        }
    }
}
