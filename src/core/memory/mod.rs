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

//! Memory bus implementation for the PlayStation
//!
//! The Bus is the central component for all memory operations in the emulator.
//! It manages address translation, memory mapping, and routing of read/write
//! operations to appropriate memory regions.
//!
//! # Memory Map
//!
//! | Physical Address Range | Region       | Size   | Access |
//! |------------------------|--------------|--------|--------|
//! | 0x00000000-0x1EFFFFFF  | RAM (mirror) | 2MB    | R/W    |
//! | 0x1F000000-0x1F07FFFF  | Expansion 1  | 512KB  | stub   |
//! | 0x1F800000-0x1F8003FF  | Scratchpad   | 1KB    | R/W    |
//! | 0x1F801000-0x1F801FFF  | I/O Ports    | 4KB    | R/W    |
//! | 0x1F802000-0x1F802FFF  | Expansion 2  | 4KB    | stub   |
//! | 0x1FC00000-0x1FC7FFFF  | BIOS ROM     | 512KB  | R only |
//! | 0xFFFE0130             | Cache ctrl   | 4B     | R/W    |
//!
//! # Ownership
//!
//! The bus owns RAM, BIOS, scratchpad and the DMA controller. The GPU is
//! owned by the system and lent to every access, so a DMA transfer started
//! by a register write can stream words into it without a stored alias.
//!
//! # Example
//!
//! ```
//! use psxcore::core::gpu::GPU;
//! use psxcore::core::memory::Bus;
//!
//! let mut bus = Bus::new();
//! let mut gpu = GPU::new();
//!
//! // Write to RAM via KSEG0
//! bus.write32(0x80000000, 0x12345678, &mut gpu).unwrap();
//!
//! // Read from same location via different segment (should mirror)
//! assert_eq!(bus.read32(0x00000000, &gpu).unwrap(), 0x12345678);
//! assert_eq!(bus.read32(0xA0000000, &gpu).unwrap(), 0x12345678);
//! ```

use std::path::Path;

use crate::core::dma::DMA;
use crate::core::error::{EmulatorError, Result};
use crate::core::gpu::GPU;

mod io_ports;
mod region;

pub use region::{AccessSize, MemoryRegion, SEGMENT_MASKS};

/// Memory bus managing all memory accesses
pub struct Bus {
    /// Main RAM (2MB)
    ram: Vec<u8>,

    /// Scratchpad (1KB fast RAM)
    scratchpad: [u8; 1024],

    /// BIOS ROM (512KB)
    bios: Vec<u8>,

    /// Cache Control register (0xFFFE0130)
    cache_control: u32,

    /// DMA controller, mapped at 0x1F801080-0x1F8010FF
    dma: DMA,
}

impl Bus {
    /// RAM size (2MB)
    pub const RAM_SIZE: usize = 2 * 1024 * 1024;

    /// BIOS size (512KB)
    pub const BIOS_SIZE: usize = 512 * 1024;

    const SCRATCHPAD_SIZE: usize = 1024;

    /// RAM mirrors repeat every 2MB
    const RAM_MASK: u32 = 0x001F_FFFF;

    // Physical ranges, end exclusive
    const EXP1_START: u32 = 0x1F00_0000;
    const EXP1_END: u32 = 0x1F08_0000;
    const SCRATCHPAD_START: u32 = 0x1F80_0000;
    const SCRATCHPAD_END: u32 = 0x1F80_0400;
    const IO_START: u32 = 0x1F80_1000;
    const IO_END: u32 = 0x1F80_2000;
    const EXP2_START: u32 = 0x1F80_2000;
    const EXP2_END: u32 = 0x1F80_3000;
    const BIOS_START: u32 = 0x1FC0_0000;
    const BIOS_END: u32 = 0x1FC8_0000;

    /// Cache Control register address (KSEG2, unmasked)
    const CACHE_CONTROL: u32 = 0xFFFE_0130;

    /// Create a new Bus instance
    ///
    /// RAM, scratchpad and BIOS start zero-filled. A zeroed BIOS decodes as
    /// NOPs, which lets the CPU run without a real image.
    pub fn new() -> Self {
        Self {
            ram: vec![0u8; Self::RAM_SIZE],
            scratchpad: [0u8; Self::SCRATCHPAD_SIZE],
            bios: vec![0u8; Self::BIOS_SIZE],
            cache_control: 0,
            dma: DMA::new(),
        }
    }

    /// Reset the bus to initial state
    ///
    /// Clears RAM and scratchpad and resets the DMA controller. BIOS
    /// contents are preserved as they represent read-only ROM.
    ///
    /// # Example
    ///
    /// ```
    /// use psxcore::core::gpu::GPU;
    /// use psxcore::core::memory::Bus;
    ///
    /// let mut bus = Bus::new();
    /// let mut gpu = GPU::new();
    /// bus.write32(0x80000000, 0x12345678, &mut gpu).unwrap();
    /// bus.reset();
    /// assert_eq!(bus.read32(0x80000000, &gpu).unwrap(), 0x00000000);
    /// ```
    pub fn reset(&mut self) {
        self.ram.fill(0);
        self.scratchpad.fill(0);
        self.cache_control = 0;
        self.dma.reset();
    }

    /// Load BIOS from file
    ///
    /// # Errors
    ///
    /// - [`EmulatorError::BiosNotFound`] if the file does not exist
    /// - [`EmulatorError::InvalidBiosSize`] unless the file is exactly 512KB
    /// - [`EmulatorError::Io`] if the file cannot be read
    ///
    /// # Example
    ///
    /// ```no_run
    /// use psxcore::core::memory::Bus;
    ///
    /// let mut bus = Bus::new();
    /// bus.load_bios("SCPH1001.BIN").unwrap();
    /// ```
    pub fn load_bios(&mut self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(EmulatorError::BiosNotFound {
                path: path.to_path_buf(),
            });
        }

        let data = std::fs::read(path)?;
        self.load_bios_bytes(&data)?;

        log::info!("BIOS loaded from {}", path.display());
        Ok(())
    }

    /// Load a BIOS image from memory
    ///
    /// # Errors
    ///
    /// [`EmulatorError::InvalidBiosSize`] unless `data` is exactly 512KB.
    pub fn load_bios_bytes(&mut self, data: &[u8]) -> Result<()> {
        if data.len() != Self::BIOS_SIZE {
            return Err(EmulatorError::InvalidBiosSize {
                expected: Self::BIOS_SIZE,
                got: data.len(),
            });
        }
        self.bios.copy_from_slice(data);
        Ok(())
    }

    /// Copy a block into RAM starting at `vaddr`
    ///
    /// Used to sideload executables. The whole block must fit inside the
    /// 2MB of physical RAM.
    ///
    /// # Errors
    ///
    /// [`EmulatorError::UnmappedAddress`] if the block leaves RAM.
    pub fn write_ram_slice(&mut self, vaddr: u32, data: &[u8]) -> Result<()> {
        let paddr = self.translate_address(vaddr);
        if paddr as usize + data.len() > Self::RAM_SIZE {
            return Err(EmulatorError::UnmappedAddress {
                address: vaddr.wrapping_add(data.len() as u32),
            });
        }

        let start = paddr as usize;
        self.ram[start..start + data.len()].copy_from_slice(data);
        Ok(())
    }

    /// Main RAM contents
    pub fn ram(&self) -> &[u8] {
        &self.ram
    }

    pub fn dma(&self) -> &DMA {
        &self.dma
    }

    pub fn dma_mut(&mut self) -> &mut DMA {
        &mut self.dma
    }

    pub fn cache_control(&self) -> u32 {
        self.cache_control
    }

    /// Read 8-bit value from memory
    ///
    /// # Example
    ///
    /// ```
    /// use psxcore::core::gpu::GPU;
    /// use psxcore::core::memory::Bus;
    ///
    /// let mut bus = Bus::new();
    /// let mut gpu = GPU::new();
    /// bus.write8(0x80000000, 0x42, &mut gpu).unwrap();
    /// assert_eq!(bus.read8(0x80000000, &gpu).unwrap(), 0x42);
    /// ```
    pub fn read8(&self, vaddr: u32, gpu: &GPU) -> Result<u8> {
        self.read(vaddr, AccessSize::Byte, gpu).map(|v| v as u8)
    }

    /// Read 16-bit value from memory
    ///
    /// The address must be 2-byte aligned.
    ///
    /// # Example
    ///
    /// ```
    /// use psxcore::core::gpu::GPU;
    /// use psxcore::core::memory::Bus;
    ///
    /// let mut bus = Bus::new();
    /// let mut gpu = GPU::new();
    /// bus.write16(0x80000000, 0x1234, &mut gpu).unwrap();
    /// assert_eq!(bus.read16(0x80000000, &gpu).unwrap(), 0x1234);
    ///
    /// // Unaligned access fails
    /// assert!(bus.read16(0x80000001, &gpu).is_err());
    /// ```
    pub fn read16(&self, vaddr: u32, gpu: &GPU) -> Result<u16> {
        self.read(vaddr, AccessSize::Half, gpu).map(|v| v as u16)
    }

    /// Read 32-bit value from memory
    ///
    /// The address must be 4-byte aligned.
    pub fn read32(&self, vaddr: u32, gpu: &GPU) -> Result<u32> {
        self.read(vaddr, AccessSize::Word, gpu)
    }

    /// Write 8-bit value to memory
    pub fn write8(&mut self, vaddr: u32, value: u8, gpu: &mut GPU) -> Result<()> {
        self.write(vaddr, AccessSize::Byte, value as u32, gpu)
    }

    /// Write 16-bit value to memory
    ///
    /// The address must be 2-byte aligned.
    pub fn write16(&mut self, vaddr: u32, value: u16, gpu: &mut GPU) -> Result<()> {
        self.write(vaddr, AccessSize::Half, value as u32, gpu)
    }

    /// Write 32-bit value to memory
    ///
    /// The address must be 4-byte aligned. Writes to a DMA channel control
    /// register may run a whole DMA transfer before returning.
    ///
    /// # Example
    ///
    /// ```
    /// use psxcore::core::gpu::GPU;
    /// use psxcore::core::memory::Bus;
    ///
    /// let mut bus = Bus::new();
    /// let mut gpu = GPU::new();
    ///
    /// // GP0(E5h) through the memory-mapped port
    /// bus.write32(0x1F801810, 0xE5000005, &mut gpu).unwrap();
    /// assert_eq!(gpu.drawing_offset(), (5, 0));
    /// ```
    pub fn write32(&mut self, vaddr: u32, value: u32, gpu: &mut GPU) -> Result<()> {
        self.write(vaddr, AccessSize::Word, value, gpu)
    }

    fn check_alignment(vaddr: u32, size: AccessSize) -> Result<()> {
        if vaddr & (size.bytes() as u32 - 1) != 0 {
            return Err(EmulatorError::UnalignedAccess {
                address: vaddr,
                size: size.bytes() as u32,
            });
        }
        Ok(())
    }

    fn read(&self, vaddr: u32, size: AccessSize, gpu: &GPU) -> Result<u32> {
        Self::check_alignment(vaddr, size)?;
        let paddr = self.translate_address(vaddr);

        match self.identify_region(vaddr) {
            MemoryRegion::RAM => {
                load_le(&self.ram, (paddr & Self::RAM_MASK) as usize, size, vaddr)
            }
            MemoryRegion::Scratchpad => load_le(
                &self.scratchpad,
                (paddr - Self::SCRATCHPAD_START) as usize,
                size,
                vaddr,
            ),
            MemoryRegion::BIOS => {
                load_le(&self.bios, (paddr - Self::BIOS_START) as usize, size, vaddr)
            }
            MemoryRegion::IO => Ok(self.read_io(paddr, size, gpu)),
            MemoryRegion::Expansion1 => {
                log::trace!("Expansion 1 read at 0x{:08X}", vaddr);
                Ok(size.mask())
            }
            MemoryRegion::Expansion2 => {
                log::debug!("Expansion 2 read at 0x{:08X} (stubbed)", vaddr);
                Ok(0)
            }
            MemoryRegion::CacheControl => Ok(self.cache_control & size.mask()),
            MemoryRegion::Unmapped => Err(EmulatorError::UnmappedAddress { address: vaddr }),
        }
    }

    fn write(&mut self, vaddr: u32, size: AccessSize, value: u32, gpu: &mut GPU) -> Result<()> {
        Self::check_alignment(vaddr, size)?;
        let paddr = self.translate_address(vaddr);

        match self.identify_region(vaddr) {
            MemoryRegion::RAM => store_le(
                &mut self.ram,
                (paddr & Self::RAM_MASK) as usize,
                size,
                value,
                vaddr,
            ),
            MemoryRegion::Scratchpad => store_le(
                &mut self.scratchpad,
                (paddr - Self::SCRATCHPAD_START) as usize,
                size,
                value,
                vaddr,
            ),
            MemoryRegion::IO => self.write_io(paddr, size, value, gpu),
            MemoryRegion::BIOS => {
                log::warn!(
                    "Ignoring write to BIOS ROM at 0x{:08X} (value 0x{:08X})",
                    vaddr,
                    value
                );
                Ok(())
            }
            MemoryRegion::Expansion1 => {
                log::warn!(
                    "Ignoring write to expansion 1 at 0x{:08X} (value 0x{:08X})",
                    vaddr,
                    value
                );
                Ok(())
            }
            MemoryRegion::Expansion2 => {
                self.write_expansion2(paddr, value);
                Ok(())
            }
            MemoryRegion::CacheControl => {
                if size == AccessSize::Word {
                    log::debug!("Cache control = 0x{:08X}", value);
                    self.cache_control = value;
                } else {
                    log::warn!("Ignoring {}-byte cache control write", size.bytes());
                }
                Ok(())
            }
            MemoryRegion::Unmapped => Err(EmulatorError::UnmappedAddress { address: vaddr }),
        }
    }

    /// Write BIOS data for testing purposes
    #[cfg(test)]
    pub(crate) fn write_bios_for_test(&mut self, offset: usize, data: &[u8]) {
        self.bios[offset..offset + data.len()].copy_from_slice(data);
    }
}

impl Default for Bus {
    fn default() -> Self {
        Self::new()
    }
}

/// Little-endian load of `size` bytes at `offset`
fn load_le(memory: &[u8], offset: usize, size: AccessSize, vaddr: u32) -> Result<u32> {
    let bytes = memory
        .get(offset..offset + size.bytes())
        .ok_or(EmulatorError::UnmappedAddress { address: vaddr })?;
    Ok(bytes
        .iter()
        .rev()
        .fold(0u32, |acc, &byte| (acc << 8) | byte as u32))
}

/// Little-endian store of the low `size` bytes of `value` at `offset`
fn store_le(
    memory: &mut [u8],
    offset: usize,
    size: AccessSize,
    value: u32,
    vaddr: u32,
) -> Result<()> {
    let bytes = memory
        .get_mut(offset..offset + size.bytes())
        .ok_or(EmulatorError::UnmappedAddress { address: vaddr })?;
    for (i, byte) in bytes.iter_mut().enumerate() {
        *byte = (value >> (i * 8)) as u8;
    }
    Ok(())
}
