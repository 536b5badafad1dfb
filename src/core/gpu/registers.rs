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

//! GPU register type definitions
//!
//! GPUSTAT is kept as a single `u32` with one [`BitField`] constant per
//! field; the remaining drawing and display settings live in small plain
//! structs.

use crate::core::bits::BitField;

/// Generate a getter/setter pair for a GPUSTAT field
macro_rules! status_field {
    ($(#[$doc:meta])* $get:ident, $set:ident, $field:ident) => {
        $(#[$doc])*
        #[inline(always)]
        pub fn $get(self) -> u32 {
            Self::$field.get(self.0)
        }

        #[inline(always)]
        pub fn $set(&mut self, value: u32) {
            self.0 = Self::$field.set(self.0, value);
        }
    };
}

/// GPU status register (GPUSTAT, 0x1F801814)
///
/// # Example
///
/// ```
/// use psxcore::core::gpu::GpuStatus;
///
/// let mut status = GpuStatus::default();
/// status.set_dma_direction(2);
/// assert_eq!(status.dma_direction(), 2);
/// assert_eq!(status.0, 0x5C00_0000);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GpuStatus(pub u32);

impl GpuStatus {
    pub const TEXTURE_PAGE_X: BitField = BitField::new(0, 4);
    pub const TEXTURE_PAGE_Y: BitField = BitField::bit(4);
    pub const SEMI_TRANSPARENCY: BitField = BitField::new(5, 2);
    pub const TEXTURE_DEPTH: BitField = BitField::new(7, 2);
    pub const DITHER: BitField = BitField::bit(9);
    pub const DRAW_TO_DISPLAY: BitField = BitField::bit(10);
    pub const SET_MASK: BitField = BitField::bit(11);
    pub const CHECK_MASK: BitField = BitField::bit(12);
    pub const INTERLACE_FIELD: BitField = BitField::bit(13);
    pub const REVERSE: BitField = BitField::bit(14);
    pub const TEXTURE_DISABLE: BitField = BitField::bit(15);
    pub const HRES2: BitField = BitField::bit(16);
    pub const HRES1: BitField = BitField::new(17, 2);
    pub const VRES: BitField = BitField::bit(19);
    pub const VIDEO_MODE: BitField = BitField::bit(20);
    pub const COLOR_DEPTH: BitField = BitField::bit(21);
    pub const VERTICAL_INTERLACE: BitField = BitField::bit(22);
    pub const DISPLAY_DISABLED: BitField = BitField::bit(23);
    pub const IRQ: BitField = BitField::bit(24);
    pub const DMA_REQUEST: BitField = BitField::bit(25);
    pub const READY_CMD: BitField = BitField::bit(26);
    pub const READY_VRAM_SEND: BitField = BitField::bit(27);
    pub const READY_DMA: BitField = BitField::bit(28);
    pub const DMA_DIRECTION: BitField = BitField::new(29, 2);
    pub const ODD_LINE: BitField = BitField::bit(31);

    /// Only the three "ready" bits set
    pub const RESET_VALUE: u32 = 0x1C00_0000;

    status_field!(
        /// Texture page X base (N*64)
        texture_page_x, set_texture_page_x, TEXTURE_PAGE_X
    );
    status_field!(
        /// Texture page Y base (N*256)
        texture_page_y, set_texture_page_y, TEXTURE_PAGE_Y
    );
    status_field!(
        /// 0=B/2+F/2, 1=B+F, 2=B-F, 3=B+F/4
        semi_transparency, set_semi_transparency, SEMI_TRANSPARENCY
    );
    status_field!(
        /// 0=4bit, 1=8bit, 2=15bit
        texture_depth, set_texture_depth, TEXTURE_DEPTH
    );
    status_field!(dither, set_dither, DITHER);
    status_field!(draw_to_display, set_draw_to_display, DRAW_TO_DISPLAY);
    status_field!(set_mask, set_set_mask, SET_MASK);
    status_field!(check_mask, set_check_mask, CHECK_MASK);
    status_field!(interlace_field, set_interlace_field, INTERLACE_FIELD);
    status_field!(reverse, set_reverse, REVERSE);
    status_field!(texture_disable, set_texture_disable, TEXTURE_DISABLE);
    status_field!(
        /// 1 selects the 368 pixel mode
        hres2, set_hres2, HRES2
    );
    status_field!(
        /// 0=256, 1=320, 2=512, 3=640
        hres1, set_hres1, HRES1
    );
    status_field!(vres, set_vres, VRES);
    status_field!(
        /// 0=NTSC, 1=PAL
        video_mode, set_video_mode, VIDEO_MODE
    );
    status_field!(
        /// 0=15bit, 1=24bit
        color_depth, set_color_depth, COLOR_DEPTH
    );
    status_field!(vertical_interlace, set_vertical_interlace, VERTICAL_INTERLACE);
    status_field!(
        /// Inverted: 0 = display on
        display_disabled, set_display_disabled, DISPLAY_DISABLED
    );
    status_field!(irq, set_irq, IRQ);
    status_field!(dma_request, set_dma_request, DMA_REQUEST);
    status_field!(ready_cmd, set_ready_cmd, READY_CMD);
    status_field!(ready_vram_send, set_ready_vram_send, READY_VRAM_SEND);
    status_field!(ready_dma, set_ready_dma, READY_DMA);
    status_field!(
        /// 0=Off, 1=FIFO, 2=CPU to GP0, 3=GPUREAD to CPU
        dma_direction, set_dma_direction, DMA_DIRECTION
    );
    status_field!(odd_line, set_odd_line, ODD_LINE);
}

impl Default for GpuStatus {
    fn default() -> Self {
        Self(Self::RESET_VALUE)
    }
}

/// Drawing area (clipping rectangle), inclusive corners
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DrawingArea {
    pub left: u16,
    pub top: u16,
    pub right: u16,
    pub bottom: u16,
}

/// Texture window settings, all in 8-pixel steps
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TextureWindow {
    pub mask_x: u8,
    pub mask_y: u8,
    pub offset_x: u8,
    pub offset_y: u8,
}

impl TextureWindow {
    /// Pack back into the GP0(E2h) parameter layout
    pub fn to_bits(self) -> u32 {
        (self.mask_x as u32)
            | ((self.mask_y as u32) << 5)
            | ((self.offset_x as u32) << 10)
            | ((self.offset_y as u32) << 15)
    }
}

/// Start and end of a display timing range
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DisplayRange {
    pub start: u16,
    pub end: u16,
}

impl DisplayRange {
    /// Horizontal range after soft reset (GPU clock ticks)
    pub const HORIZONTAL_DEFAULT: DisplayRange = DisplayRange {
        start: 0x200,
        end: 0xC00,
    };

    /// Vertical range after soft reset (scanlines)
    pub const VERTICAL_DEFAULT: DisplayRange = DisplayRange {
        start: 0x10,
        end: 0x100,
    };
}

/// Display configuration handed to the renderer on present
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DisplayState {
    /// Top-left of the displayed area in VRAM
    pub vram_x: u16,
    pub vram_y: u16,
    pub horizontal: DisplayRange,
    pub vertical: DisplayRange,
    pub width: u16,
    pub height: u16,
    pub enabled: bool,
    pub pal: bool,
    pub interlaced: bool,
    pub color_24bit: bool,
}

impl DisplayState {
    /// Derive resolution and flags from GPUSTAT
    pub(crate) fn from_status(
        status: GpuStatus,
        vram_start: (u16, u16),
        horizontal: DisplayRange,
        vertical: DisplayRange,
    ) -> Self {
        let width = if status.hres2() != 0 {
            368
        } else {
            [256, 320, 512, 640][status.hres1() as usize]
        };
        let interlaced = status.vertical_interlace() != 0;
        let height = if interlaced && status.vres() != 0 {
            480
        } else {
            240
        };

        Self {
            vram_x: vram_start.0,
            vram_y: vram_start.1,
            horizontal,
            vertical,
            width,
            height,
            enabled: status.display_disabled() == 0,
            pal: status.video_mode() != 0,
            interlaced,
            color_24bit: status.color_depth() != 0,
        }
    }
}
