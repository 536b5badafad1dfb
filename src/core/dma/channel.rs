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

//! Per-channel DMA registers (MADR, BCR, CHCR)

use crate::core::bits::BitField;
use bitflags::bitflags;

bitflags! {
    /// Single-bit fields of the channel control register (CHCR)
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct ChannelFlags: u32 {
        /// Transfer direction: set = from RAM to the device
        const FROM_RAM = 1 << 0;
        /// Address step: set = -4 per word
        const DECREMENT = 1 << 1;
        /// Chopping enable (run the CPU between DMA windows)
        const CHOPPING = 1 << 8;
        /// Start/busy
        const ENABLE = 1 << 24;
        /// Manual start, required by immediate mode
        const TRIGGER = 1 << 28;
    }
}

/// Device wired to a DMA channel, by channel index
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Port {
    MdecIn = 0,
    MdecOut = 1,
    Gpu = 2,
    CdRom = 3,
    Spu = 4,
    Pio = 5,
    /// Ordering table clear
    Otc = 6,
}

impl Port {
    /// All ports in channel order
    pub const ALL: [Port; 7] = [
        Port::MdecIn,
        Port::MdecOut,
        Port::Gpu,
        Port::CdRom,
        Port::Spu,
        Port::Pio,
        Port::Otc,
    ];
}

/// Direction of a transfer relative to main RAM
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    ToRam,
    FromRam,
}

impl Direction {
    pub fn as_str(self) -> &'static str {
        match self {
            Direction::ToRam => "to RAM",
            Direction::FromRam => "from RAM",
        }
    }
}

/// CHCR synchronization mode (bits 9-10)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncMode {
    /// Transfer everything at once when triggered
    Immediate,
    /// Blocks synchronized to device requests
    SyncToRequests,
    /// GPU command lists
    LinkedList,
    Reserved,
}

/// A single DMA channel
#[derive(Debug, Clone)]
pub struct DMAChannel {
    /// MADR, 24 bits
    base_address: u32,

    /// BCR: block size in bits 0-15, block count in bits 16-31
    block_control: u32,

    /// CHCR
    channel_control: u32,

    port: Port,
}

impl DMAChannel {
    pub const SYNC_MODE: BitField = BitField::new(9, 2);
    pub const BLOCK_SIZE: BitField = BitField::new(0, 16);
    pub const BLOCK_COUNT: BitField = BitField::new(16, 16);

    /// Block size value meaning "maximum" in immediate mode
    const MAX_IMMEDIATE_WORDS: u32 = 0x1_0000;

    pub(super) fn new(port: Port) -> Self {
        Self {
            base_address: 0,
            block_control: 0,
            channel_control: 0,
            port,
        }
    }

    pub fn port(&self) -> Port {
        self.port
    }

    pub fn base_address(&self) -> u32 {
        self.base_address
    }

    pub fn set_base_address(&mut self, value: u32) {
        self.base_address = value & 0x00FF_FFFF;
    }

    pub fn block_control(&self) -> u32 {
        self.block_control
    }

    pub fn set_block_control(&mut self, value: u32) {
        self.block_control = value;
    }

    pub fn channel_control(&self) -> u32 {
        self.channel_control
    }

    pub fn set_channel_control(&mut self, value: u32) {
        self.channel_control = value;
    }

    #[inline(always)]
    pub fn flags(&self) -> ChannelFlags {
        ChannelFlags::from_bits_retain(self.channel_control)
    }

    pub fn direction(&self) -> Direction {
        if self.flags().contains(ChannelFlags::FROM_RAM) {
            Direction::FromRam
        } else {
            Direction::ToRam
        }
    }

    pub fn decrement(&self) -> bool {
        self.flags().contains(ChannelFlags::DECREMENT)
    }

    pub fn sync_mode(&self) -> SyncMode {
        match Self::SYNC_MODE.get(self.channel_control) {
            0 => SyncMode::Immediate,
            1 => SyncMode::SyncToRequests,
            2 => SyncMode::LinkedList,
            _ => SyncMode::Reserved,
        }
    }

    /// Enabled, and either triggered or not in immediate mode
    ///
    /// # Example
    ///
    /// ```
    /// use psxcore::core::dma::{ChannelFlags, DMA};
    ///
    /// let mut dma = DMA::new();
    /// let channel = dma.channel_mut(6);
    ///
    /// // Immediate mode needs the trigger bit as well
    /// channel.set_channel_control(ChannelFlags::ENABLE.bits());
    /// assert!(!channel.is_active());
    /// channel.set_channel_control((ChannelFlags::ENABLE | ChannelFlags::TRIGGER).bits());
    /// assert!(channel.is_active());
    /// ```
    pub fn is_active(&self) -> bool {
        let flags = self.flags();
        flags.contains(ChannelFlags::ENABLE)
            && (self.sync_mode() != SyncMode::Immediate || flags.contains(ChannelFlags::TRIGGER))
    }

    /// Number of words moved by a block transfer
    ///
    /// Immediate mode uses the block size alone, with 0 meaning 0x10000.
    /// Request-synced mode moves `size * count` words.
    pub fn transfer_length(&self) -> u32 {
        let size = Self::BLOCK_SIZE.get(self.block_control);
        match self.sync_mode() {
            SyncMode::Immediate if size == 0 => Self::MAX_IMMEDIATE_WORDS,
            SyncMode::Immediate => size,
            _ => size * Self::BLOCK_COUNT.get(self.block_control),
        }
    }

    /// Address step applied after each word
    pub(super) fn step(&self) -> u32 {
        if self.decrement() {
            4u32.wrapping_neg()
        } else {
            4
        }
    }

    /// Clear the enable and trigger bits
    pub(super) fn finish(&mut self) {
        let flags = self.flags() - (ChannelFlags::ENABLE | ChannelFlags::TRIGGER);
        self.channel_control = flags.bits();
        log::trace!("DMA{} finished", self.port as usize);
    }
}
