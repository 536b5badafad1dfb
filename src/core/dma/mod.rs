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

//! DMA (Direct Memory Access) Controller
//!
//! Seven channels move words between main RAM and a fixed device each:
//!
//! | Channel | Device      | Base Address |
//! |---------|-------------|--------------|
//! | 0       | MDEC In     | 0x1F801080   |
//! | 1       | MDEC Out    | 0x1F801090   |
//! | 2       | GPU         | 0x1F8010A0   |
//! | 3       | CD-ROM      | 0x1F8010B0   |
//! | 4       | SPU         | 0x1F8010C0   |
//! | 5       | PIO         | 0x1F8010D0   |
//! | 6       | OTC         | 0x1F8010E0   |
//!
//! Each channel has MADR (+0x0), BCR (+0x4) and CHCR (+0x8). DPCR sits at
//! 0x1F8010F0 and DICR at 0x1F8010F4.
//!
//! # Transfers
//!
//! A CHCR write that leaves the channel active runs the whole transfer
//! before the write returns. Only the combinations used by the BIOS and the
//! GPU path are modeled:
//!
//! - ordering table clear (channel 6, to RAM)
//! - RAM to GPU in block or linked-list mode (channel 2)
//!
//! Anything else stops emulation with
//! [`EmulatorError::UnsupportedDmaTransfer`].
//!
//! # References
//!
//! - [PSX-SPX: DMA Controller](http://problemkaputt.de/psx-spx.htm#dmacontroller)

use crate::core::bits::BitField;
use crate::core::error::{EmulatorError, Result};
use crate::core::gpu::GPU;

mod channel;

pub use channel::{ChannelFlags, DMAChannel, Direction, Port, SyncMode};

/// DMA Controller with 7 channels
///
/// # Examples
///
/// ```
/// use psxcore::core::dma::DMA;
///
/// let dma = DMA::new();
/// assert_eq!(dma.read_control(), 0x07654321);
/// ```
pub struct DMA {
    channels: [DMAChannel; 7],

    /// DPCR: per-channel priority and enable nibbles
    control: u32,

    /// DICR
    interrupt: u32,

    /// Master flag went from 0 to 1 and nobody has looked yet
    pending_irq: bool,
}

impl DMA {
    /// Physical address of channel 0 MADR
    pub const REGISTER_BASE: u32 = 0x1F80_1080;

    /// Size of the register window (7 channels + DPCR/DICR row)
    pub const REGISTER_SPAN: u32 = 0x80;

    pub const CH_GPU: usize = 2;
    pub const CH_OTC: usize = 6;

    const DPCR_OFFSET: u32 = 0x70;
    const DICR_OFFSET: u32 = 0x74;

    /// DPCR value at power-on
    const DPCR_DEFAULT: u32 = 0x0765_4321;

    /// Next-pointer that terminates ordering tables and linked lists
    pub const END_OF_LIST: u32 = 0x00FF_FFFF;

    /// RAM word address mask (wraps at 2MB, forces word alignment)
    const RAM_WORD_MASK: u32 = 0x001F_FFFC;

    /// Most nodes a terminating list can have: one header per RAM word
    const MAX_LIST_NODES: usize = (Self::RAM_WORD_MASK as usize >> 2) + 1;

    // DICR fields
    const DICR_WRITABLE: u32 = 0x00FF_FFC0;
    const DICR_FORCE: BitField = BitField::bit(15);
    const DICR_ENABLES: BitField = BitField::new(16, 7);
    const DICR_MASTER_ENABLE: BitField = BitField::bit(23);
    const DICR_FLAGS: BitField = BitField::new(24, 7);
    const DICR_MASTER_FLAG: BitField = BitField::bit(31);

    /// Create a new DMA controller
    ///
    /// All channels start inactive with the default priority ordering.
    pub fn new() -> Self {
        Self {
            channels: Port::ALL.map(DMAChannel::new),
            control: Self::DPCR_DEFAULT,
            interrupt: 0,
            pending_irq: false,
        }
    }

    /// Restore power-on state
    pub fn reset(&mut self) {
        *self = Self::new();
    }

    pub fn channel(&self, index: usize) -> &DMAChannel {
        &self.channels[index]
    }

    pub fn channel_mut(&mut self, index: usize) -> &mut DMAChannel {
        &mut self.channels[index]
    }

    /// Read DMA Control Register (DPCR)
    pub fn read_control(&self) -> u32 {
        self.control
    }

    /// Write DMA Control Register (DPCR)
    pub fn write_control(&mut self, value: u32) {
        self.control = value;
        log::trace!("DPCR = 0x{:08X}", value);
    }

    /// Read DMA Interrupt Register (DICR)
    pub fn read_interrupt(&self) -> u32 {
        self.interrupt
    }

    /// Write DMA Interrupt Register (DICR)
    ///
    /// Bits 6-23 are plain read/write. A 1 written to a flag bit (24-30)
    /// acknowledges that flag; a 0 leaves it alone. Bit 31 is recomputed.
    ///
    /// # Example
    ///
    /// ```
    /// use psxcore::core::dma::DMA;
    ///
    /// let mut dma = DMA::new();
    /// dma.write_interrupt(0x0080_8000);
    /// assert_eq!(dma.read_interrupt(), 0x8080_8000); // force sets the master flag
    /// ```
    pub fn write_interrupt(&mut self, value: u32) {
        let acknowledged = Self::DICR_FLAGS.mask() & value;
        let flags = Self::DICR_FLAGS.mask() & self.interrupt & !acknowledged;
        self.interrupt =
            (self.interrupt & Self::DICR_MASTER_FLAG.mask()) | (value & Self::DICR_WRITABLE) | flags;
        self.update_master_flag();
        log::trace!("DICR = 0x{:08X}", self.interrupt);
    }

    /// Whether the DICR master flag rose since the last call
    ///
    /// The flag is cleared by reading it.
    pub fn take_pending_irq(&mut self) -> bool {
        std::mem::take(&mut self.pending_irq)
    }

    /// Read a register by offset from [`DMA::REGISTER_BASE`]
    ///
    /// Unused offsets read 0.
    pub fn read_register(&self, offset: u32) -> u32 {
        let value = match offset {
            Self::DPCR_OFFSET => self.control,
            Self::DICR_OFFSET => self.interrupt,
            _ => match Self::channel_register(offset) {
                Some((index, 0)) => self.channels[index].base_address(),
                Some((index, 1)) => self.channels[index].block_control(),
                Some((index, 2)) => self.channels[index].channel_control(),
                _ => {
                    log::warn!("read from unused DMA register +0x{:02X}", offset);
                    0
                }
            },
        };
        log::trace!("DMA +0x{:02X} -> 0x{:08X}", offset, value);
        value
    }

    /// Write a register by offset from [`DMA::REGISTER_BASE`]
    ///
    /// A CHCR write that activates the channel performs the transfer
    /// before returning.
    ///
    /// # Errors
    ///
    /// Reserved sync modes and unmodeled device/direction combinations,
    /// plus anything the GPU rejects while consuming the transferred words.
    pub fn write_register(
        &mut self,
        offset: u32,
        value: u32,
        ram: &mut [u8],
        gpu: &mut GPU,
    ) -> Result<()> {
        log::trace!("DMA +0x{:02X} = 0x{:08X}", offset, value);
        match offset {
            Self::DPCR_OFFSET => self.write_control(value),
            Self::DICR_OFFSET => self.write_interrupt(value),
            _ => match Self::channel_register(offset) {
                Some((index, 0)) => self.channels[index].set_base_address(value),
                Some((index, 1)) => self.channels[index].set_block_control(value),
                Some((index, 2)) => {
                    self.channels[index].set_channel_control(value);
                    if self.channels[index].is_active() {
                        self.execute_transfer(index, ram, gpu)?;
                    }
                }
                _ => log::warn!(
                    "write 0x{:08X} to unused DMA register +0x{:02X} ignored",
                    value,
                    offset
                ),
            },
        }
        Ok(())
    }

    /// Split an offset into (channel, register index)
    fn channel_register(offset: u32) -> Option<(usize, u32)> {
        let index = (offset >> 4) as usize;
        (index < 7).then_some((index, (offset >> 2) & 0x3))
    }

    /// Run the transfer for an active channel and signal completion
    fn execute_transfer(&mut self, index: usize, ram: &mut [u8], gpu: &mut GPU) -> Result<()> {
        let channel = &self.channels[index];
        log::debug!(
            "DMA{} ({:?}) start: {:?} {:?}, madr=0x{:06X} bcr=0x{:08X}",
            index,
            channel.port(),
            channel.sync_mode(),
            channel.direction(),
            channel.base_address(),
            channel.block_control()
        );

        match channel.sync_mode() {
            SyncMode::Immediate | SyncMode::SyncToRequests => {
                self.transfer_block(index, ram, gpu)?
            }
            SyncMode::LinkedList => self.transfer_linked_list(index, ram, gpu)?,
            SyncMode::Reserved => return Err(EmulatorError::IllegalDmaSyncMode { channel: index }),
        }

        self.complete(index);
        Ok(())
    }

    /// Block transfer for immediate and request-synced modes
    ///
    /// Request-synced transfers run all blocks back to back.
    fn transfer_block(&mut self, index: usize, ram: &mut [u8], gpu: &mut GPU) -> Result<()> {
        let channel = &self.channels[index];
        let direction = channel.direction();
        let step = channel.step();
        let length = channel.transfer_length();
        let mut address = channel.base_address();

        match (direction, channel.port()) {
            (Direction::ToRam, Port::Otc) => {
                for remaining in (1..=length).rev() {
                    let current = address & Self::RAM_WORD_MASK;
                    let entry = if remaining == 1 {
                        Self::END_OF_LIST
                    } else {
                        current.wrapping_sub(4) & 0x001F_FFFF
                    };
                    write_ram_u32(ram, current, entry);
                    address = address.wrapping_add(step);
                }
                log::debug!("DMA{} OTC cleared {} entries", index, length);
            }
            (Direction::FromRam, Port::Gpu) => {
                for _ in 0..length {
                    let word = read_ram_u32(ram, address & Self::RAM_WORD_MASK);
                    gpu.write_gp0(word)?;
                    address = address.wrapping_add(step);
                }
                log::debug!("DMA{} sent {} words to GP0", index, length);
            }
            (direction, _) => {
                return Err(EmulatorError::UnsupportedDmaTransfer {
                    channel: index,
                    direction: direction.as_str(),
                })
            }
        }
        Ok(())
    }

    /// Walk a GPU command list
    ///
    /// Each node header holds the next-node address in bits 0-23 and the
    /// number of command words that follow it in bits 24-31.
    fn transfer_linked_list(&mut self, index: usize, ram: &mut [u8], gpu: &mut GPU) -> Result<()> {
        let channel = &self.channels[index];
        if channel.direction() != Direction::FromRam
            || channel.port() != Port::Gpu
            || channel.decrement()
        {
            return Err(EmulatorError::UnsupportedDmaTransfer {
                channel: index,
                direction: channel.direction().as_str(),
            });
        }

        let mut node = channel.base_address() & Self::RAM_WORD_MASK;
        let mut nodes = 0usize;
        let mut words = 0usize;

        loop {
            if nodes == Self::MAX_LIST_NODES {
                log::error!("DMA{} linked list loops at 0x{:08X}", index, node);
                return Err(EmulatorError::DmaLinkedListLoop {
                    channel: index,
                    address: node,
                });
            }
            let header = read_ram_u32(ram, node);
            let count = header >> 24;

            let mut address = node;
            for _ in 0..count {
                address = address.wrapping_add(4) & Self::RAM_WORD_MASK;
                gpu.write_gp0(read_ram_u32(ram, address))?;
            }
            nodes += 1;
            words += count as usize;

            let next = header & 0x00FF_FFFF;
            if next == Self::END_OF_LIST {
                break;
            }
            node = next & Self::RAM_WORD_MASK;
        }

        log::debug!(
            "DMA{} linked list done: {} nodes, {} words",
            index,
            nodes,
            words
        );
        Ok(())
    }

    /// Mark a channel complete and raise its interrupt flag
    fn complete(&mut self, index: usize) {
        self.channels[index].finish();

        let enables = Self::DICR_ENABLES.get(self.interrupt);
        if enables & (1 << index) != 0 {
            let flags = Self::DICR_FLAGS.get(self.interrupt) | (1 << index);
            self.interrupt = Self::DICR_FLAGS.set(self.interrupt, flags);
        }
        self.update_master_flag();
    }

    /// Recompute DICR bit 31
    ///
    /// Set when force (bit 15) is set, or when master enable (bit 23) is set
    /// and some channel has both its enable and flag bits set.
    fn update_master_flag(&mut self) {
        let was_set = Self::DICR_MASTER_FLAG.is_set(self.interrupt);

        let triggered =
            Self::DICR_ENABLES.get(self.interrupt) & Self::DICR_FLAGS.get(self.interrupt) != 0;
        let master = Self::DICR_FORCE.is_set(self.interrupt)
            || (Self::DICR_MASTER_ENABLE.is_set(self.interrupt) && triggered);

        self.interrupt = Self::DICR_MASTER_FLAG.set_flag(self.interrupt, master);

        if master && !was_set {
            log::debug!("DMA interrupt pending (DICR=0x{:08X})", self.interrupt);
            self.pending_irq = true;
        }
    }
}

impl Default for DMA {
    fn default() -> Self {
        Self::new()
    }
}

/// Read a word from RAM; `address` must already be word-masked
#[inline(always)]
fn read_ram_u32(ram: &[u8], address: u32) -> u32 {
    let start = address as usize;
    match ram.get(start..start + 4) {
        Some(bytes) => u32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]),
        None => {
            log::error!("DMA read out of bounds: 0x{:08X}", address);
            0
        }
    }
}

/// Write a word to RAM; `address` must already be word-masked
#[inline(always)]
fn write_ram_u32(ram: &mut [u8], address: u32, value: u32) {
    let start = address as usize;
    match ram.get_mut(start..start + 4) {
        Some(bytes) => bytes.copy_from_slice(&value.to_le_bytes()),
        None => log::error!("DMA write out of bounds: 0x{:08X}", address),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::gpu::DrawCommand;

    const RAM_SIZE: usize = 2 * 1024 * 1024;

    /// CHCR offsets
    const GPU_CHCR: u32 = 0x28;
    const OTC_CHCR: u32 = 0x68;

    fn setup() -> (DMA, Vec<u8>, GPU) {
        (DMA::new(), vec![0u8; RAM_SIZE], GPU::new())
    }

    fn put(ram: &mut [u8], address: u32, value: u32) {
        write_ram_u32(ram, address, value);
    }

    fn get(ram: &[u8], address: u32) -> u32 {
        read_ram_u32(ram, address)
    }

    #[test]
    fn test_dma_initialization() {
        let dma = DMA::new();
        assert_eq!(dma.read_control(), 0x0765_4321);
        assert_eq!(dma.read_interrupt(), 0);
        for ch in 0..7 {
            assert!(!dma.channel(ch).is_active(), "channel {} idle", ch);
            assert_eq!(dma.channel(ch).port() as usize, ch);
        }
    }

    #[test]
    fn test_register_offsets() {
        let (mut dma, mut ram, mut gpu) = setup();
        dma.write_register(0x10, 0xFF12_3456, &mut ram, &mut gpu).unwrap();
        dma.write_register(0x14, 0x0002_0010, &mut ram, &mut gpu).unwrap();
        dma.write_register(0x18, 0x0000_0201, &mut ram, &mut gpu).unwrap();

        assert_eq!(dma.read_register(0x10), 0x0012_3456, "MADR is 24 bits");
        assert_eq!(dma.read_register(0x14), 0x0002_0010);
        assert_eq!(dma.read_register(0x18), 0x0000_0201);
        assert_eq!(dma.read_register(0x1C), 0, "unused slot reads 0");
        assert_eq!(dma.read_register(0x78), 0);

        dma.write_register(0x70, 0x0000_0800, &mut ram, &mut gpu).unwrap();
        assert_eq!(dma.read_register(0x70), 0x0000_0800);
    }

    #[test]
    fn test_dicr_write_one_to_clear() {
        let mut dma = DMA::new();
        dma.interrupt = 0x7F00_0000;
        dma.write_interrupt(0x0500_0000);
        assert_eq!(dma.read_interrupt(), 0x7A00_0000, "only written flags clear");

        dma.write_interrupt(0x0000_003F);
        assert_eq!(dma.read_interrupt() & 0x3F, 0, "bits 0-5 read as zero");
    }

    #[test]
    fn test_otc_clear_builds_reverse_list() {
        let (mut dma, mut ram, mut gpu) = setup();
        dma.write_register(0x60, 0x0000_0110, &mut ram, &mut gpu).unwrap();
        dma.write_register(0x64, 4, &mut ram, &mut gpu).unwrap();
        // to RAM, decrement, immediate, enable + trigger
        dma.write_register(OTC_CHCR, 0x1100_0002, &mut ram, &mut gpu)
            .unwrap();

        assert_eq!(get(&ram, 0x110), 0x10C);
        assert_eq!(get(&ram, 0x10C), 0x108);
        assert_eq!(get(&ram, 0x108), 0x104);
        assert_eq!(get(&ram, 0x104), 0x00FF_FFFF);
        assert_eq!(get(&ram, 0x100), 0, "nothing written past the table");

        let chcr = dma.read_register(OTC_CHCR);
        assert_eq!(chcr & 0x1100_0000, 0, "enable and trigger cleared");
        assert_eq!(chcr, 0x0000_0002);
    }

    #[test]
    fn test_immediate_mode_needs_trigger() {
        let (mut dma, mut ram, mut gpu) = setup();
        dma.write_register(0x60, 0x0000_0110, &mut ram, &mut gpu).unwrap();
        dma.write_register(0x64, 1, &mut ram, &mut gpu).unwrap();
        dma.write_register(OTC_CHCR, 0x0100_0002, &mut ram, &mut gpu)
            .unwrap();

        assert_eq!(get(&ram, 0x110), 0, "not triggered, no transfer");
        assert!(dma.channel(DMA::CH_OTC).flags().contains(ChannelFlags::ENABLE));
    }

    #[test]
    fn test_gpu_block_transfer() {
        let (mut dma, mut ram, mut gpu) = setup();
        // GP0 0x02 fill rectangle: color, top-left, size
        put(&mut ram, 0x1000, 0x0200_00FF);
        put(&mut ram, 0x1004, 0x0010_0020);
        put(&mut ram, 0x1008, 0x0008_0010);

        dma.write_register(0x20, 0x1000, &mut ram, &mut gpu).unwrap();
        dma.write_register(0x24, 0x0001_0003, &mut ram, &mut gpu).unwrap();
        // from RAM, sync to requests, enable
        dma.write_register(GPU_CHCR, 0x0100_0201, &mut ram, &mut gpu)
            .unwrap();

        let commands = gpu.drain_commands();
        assert_eq!(commands.len(), 1);
        assert!(matches!(commands[0], DrawCommand::FillRect { .. }));
        assert!(!dma.channel(DMA::CH_GPU).is_active());
    }

    #[test]
    fn test_linked_list_two_nodes() {
        let (mut dma, mut ram, mut gpu) = setup();
        // Node A at 0x2000: two words, next = 0x3000
        put(&mut ram, 0x2000, 0x0200_3000);
        put(&mut ram, 0x2004, 0xE500_1805); // drawing offset (5, 3)
        put(&mut ram, 0x2008, 0xE300_0000); // drawing area top-left (0, 0)
        put(&mut ram, 0x200C, 0xFF00_0000); // not part of A
        // Node B at 0x3000: no words, end of list
        put(&mut ram, 0x3000, 0x00FF_FFFF);
        put(&mut ram, 0x3004, 0xFF00_0000); // past B's header

        dma.write_register(0x20, 0x2000, &mut ram, &mut gpu).unwrap();
        dma.write_register(GPU_CHCR, 0x0100_0401, &mut ram, &mut gpu)
            .unwrap();

        assert_eq!(gpu.drawing_offset(), (5, 3));
        assert!(!dma.channel(DMA::CH_GPU).is_active());
    }

    #[test]
    fn test_linked_list_self_link_is_fatal() {
        let (mut dma, mut ram, mut gpu) = setup();
        put(&mut ram, 0x2000, 0x0000_2000);

        dma.write_register(0x20, 0x2000, &mut ram, &mut gpu).unwrap();
        let err = dma
            .write_register(GPU_CHCR, 0x0100_0401, &mut ram, &mut gpu)
            .unwrap_err();
        assert!(matches!(
            err,
            EmulatorError::DmaLinkedListLoop {
                channel: 2,
                address: 0x2000
            }
        ));
    }

    #[test]
    fn test_linked_list_two_node_cycle_is_fatal() {
        let (mut dma, mut ram, mut gpu) = setup();
        put(&mut ram, 0x2000, 0x0100_3000);
        put(&mut ram, 0x2004, 0xE500_0000);
        put(&mut ram, 0x3000, 0x0000_2000);

        dma.write_register(0x20, 0x2000, &mut ram, &mut gpu).unwrap();
        assert!(matches!(
            dma.write_register(GPU_CHCR, 0x0100_0401, &mut ram, &mut gpu),
            Err(EmulatorError::DmaLinkedListLoop { channel: 2, .. })
        ));
    }

    #[test]
    fn test_linked_list_only_from_ram_to_gpu() {
        let (mut dma, mut ram, mut gpu) = setup();
        put(&mut ram, 0, 0x00FF_FFFF);

        let err = dma
            .write_register(0x08, 0x0100_0401, &mut ram, &mut gpu)
            .unwrap_err();
        assert!(matches!(
            err,
            EmulatorError::UnsupportedDmaTransfer { channel: 0, .. }
        ));

        // GPU channel, to RAM
        assert!(dma
            .write_register(GPU_CHCR, 0x0100_0400, &mut ram, &mut gpu)
            .is_err());
        // GPU channel, from RAM with decrement
        assert!(dma
            .write_register(GPU_CHCR, 0x0100_0403, &mut ram, &mut gpu)
            .is_err());
    }

    #[test]
    fn test_reserved_sync_mode_is_fatal() {
        let (mut dma, mut ram, mut gpu) = setup();
        let err = dma
            .write_register(GPU_CHCR, 0x0100_0601, &mut ram, &mut gpu)
            .unwrap_err();
        assert!(matches!(err, EmulatorError::IllegalDmaSyncMode { channel: 2 }));
    }

    #[test]
    fn test_unmodeled_device_is_fatal() {
        let (mut dma, mut ram, mut gpu) = setup();
        dma.write_register(0x34, 1, &mut ram, &mut gpu).unwrap();
        // CD-ROM to RAM, immediate, triggered
        let err = dma
            .write_register(0x38, 0x1100_0000, &mut ram, &mut gpu)
            .unwrap_err();
        assert!(matches!(
            err,
            EmulatorError::UnsupportedDmaTransfer {
                channel: 3,
                direction: "to RAM"
            }
        ));
    }

    #[test]
    fn test_completion_raises_pending_irq() {
        let (mut dma, mut ram, mut gpu) = setup();
        // Master enable + channel 6 enable
        dma.write_register(0x74, 0x00C0_0000, &mut ram, &mut gpu).unwrap();
        dma.write_register(0x60, 0x100, &mut ram, &mut gpu).unwrap();
        dma.write_register(0x64, 1, &mut ram, &mut gpu).unwrap();
        dma.write_register(OTC_CHCR, 0x1100_0002, &mut ram, &mut gpu)
            .unwrap();

        assert_eq!(dma.read_interrupt(), 0xC0C0_0000);
        assert!(dma.take_pending_irq());
        assert!(!dma.take_pending_irq(), "taking clears the pending flag");

        // Acknowledge channel 6
        dma.write_interrupt(0x40C0_0000);
        assert_eq!(dma.read_interrupt(), 0x00C0_0000);
    }

    #[test]
    fn test_completion_without_enable_sets_no_flag() {
        let (mut dma, mut ram, mut gpu) = setup();
        dma.write_register(0x64, 1, &mut ram, &mut gpu).unwrap();
        dma.write_register(OTC_CHCR, 0x1100_0002, &mut ram, &mut gpu)
            .unwrap();
        assert_eq!(dma.read_interrupt(), 0);
        assert!(!dma.take_pending_irq());
    }
}
