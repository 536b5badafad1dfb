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

//! Memory region identification and address translation
//!
//! The PlayStation uses MIPS memory segments. A virtual address is turned
//! into a physical one by masking it with the entry of [`SEGMENT_MASKS`]
//! selected by its top three bits, then the physical address is classified
//! into exactly one [`MemoryRegion`].

use super::Bus;

/// Address mask per 512MB segment, indexed by `vaddr >> 29`
///
/// - KUSEG (0x00000000-0x7FFFFFFF): passed through
/// - KSEG0 (0x80000000-0x9FFFFFFF): top bit cleared
/// - KSEG1 (0xA0000000-0xBFFFFFFF): top three bits cleared
/// - KSEG2 (0xC0000000-0xFFFFFFFF): passed through (cache control)
pub const SEGMENT_MASKS: [u32; 8] = [
    0xFFFF_FFFF,
    0xFFFF_FFFF,
    0xFFFF_FFFF,
    0xFFFF_FFFF,
    0x7FFF_FFFF,
    0x1FFF_FFFF,
    0xFFFF_FFFF,
    0xFFFF_FFFF,
];

/// Memory region identification
///
/// Used to identify which memory region an address belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MemoryRegion {
    /// Main RAM (2MB, mirrored up to the expansion area)
    RAM,
    /// Expansion region 1 (parallel port ROM, absent on retail units)
    Expansion1,
    /// Scratchpad (1KB)
    Scratchpad,
    /// I/O ports
    IO,
    /// Expansion region 2 (BIOS POST display)
    Expansion2,
    /// BIOS ROM
    BIOS,
    /// Cache Control register
    CacheControl,
    /// Unmapped region
    Unmapped,
}

/// Width of a bus access
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessSize {
    Byte = 1,
    Half = 2,
    Word = 4,
}

impl AccessSize {
    #[inline(always)]
    pub fn bytes(self) -> usize {
        self as usize
    }

    /// Right-aligned mask covering the access width
    #[inline(always)]
    pub fn mask(self) -> u32 {
        match self {
            AccessSize::Byte => 0xFF,
            AccessSize::Half => 0xFFFF,
            AccessSize::Word => 0xFFFF_FFFF,
        }
    }
}

impl Bus {
    /// Translate virtual address to physical address
    ///
    /// # Example
    ///
    /// ```
    /// use psxcore::core::memory::Bus;
    ///
    /// let bus = Bus::new();
    /// assert_eq!(bus.translate_address(0x8000_1234), 0x0000_1234);
    /// assert_eq!(bus.translate_address(0xBFC0_0000), 0x1FC0_0000);
    /// assert_eq!(bus.translate_address(0xFFFE_0130), 0xFFFE_0130);
    /// ```
    #[inline(always)]
    pub fn translate_address(&self, vaddr: u32) -> u32 {
        vaddr & SEGMENT_MASKS[(vaddr >> 29) as usize]
    }

    /// Identify memory region for an address
    ///
    /// # Example
    ///
    /// ```
    /// use psxcore::core::memory::{Bus, MemoryRegion};
    ///
    /// let bus = Bus::new();
    ///
    /// assert_eq!(bus.identify_region(0x00000000), MemoryRegion::RAM);
    /// assert_eq!(bus.identify_region(0x1F800000), MemoryRegion::Scratchpad);
    /// assert_eq!(bus.identify_region(0x1F801000), MemoryRegion::IO);
    /// assert_eq!(bus.identify_region(0xBFC00000), MemoryRegion::BIOS);
    /// assert_eq!(bus.identify_region(0x1F900000), MemoryRegion::Unmapped);
    /// ```
    pub fn identify_region(&self, vaddr: u32) -> MemoryRegion {
        let paddr = self.translate_address(vaddr);

        if paddr < Self::EXP1_START {
            MemoryRegion::RAM
        } else if (Self::EXP1_START..Self::EXP1_END).contains(&paddr) {
            MemoryRegion::Expansion1
        } else if (Self::SCRATCHPAD_START..Self::SCRATCHPAD_END).contains(&paddr) {
            MemoryRegion::Scratchpad
        } else if (Self::IO_START..Self::IO_END).contains(&paddr) {
            MemoryRegion::IO
        } else if (Self::EXP2_START..Self::EXP2_END).contains(&paddr) {
            MemoryRegion::Expansion2
        } else if (Self::BIOS_START..Self::BIOS_END).contains(&paddr) {
            MemoryRegion::BIOS
        } else if paddr == Self::CACHE_CONTROL {
            MemoryRegion::CacheControl
        } else {
            MemoryRegion::Unmapped
        }
    }
}
