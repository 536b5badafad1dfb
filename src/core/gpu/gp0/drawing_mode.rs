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

//! GP0 Drawing Mode Commands
//!
//! This module implements GP0 commands that control drawing settings such as
//! texture page, drawing area, drawing offset, and masking behavior. Each
//! takes its parameters from the low 24 bits of the opcode word.
//!
//! # Commands
//!
//! - 0xE1: Draw Mode Setting (texture page, transparency, dithering, etc.)
//! - 0xE2: Texture Window Setting
//! - 0xE3: Set Drawing Area Top-Left
//! - 0xE4: Set Drawing Area Bottom-Right
//! - 0xE5: Set Drawing Offset
//! - 0xE6: Mask Bit Setting
//!
//! # References
//!
//! - [PSX-SPX: GP0 Drawing Settings](http://problemkaputt.de/psx-spx.htm#gpurenderattributes)

use crate::core::bits::{sign_extend, BitField};
use crate::core::gpu::{TextureWindow, GPU};

const CORNER_X: BitField = BitField::new(0, 10);
const CORNER_Y: BitField = BitField::new(10, 10);
const OFFSET_X: BitField = BitField::new(0, 11);
const OFFSET_Y: BitField = BitField::new(11, 11);

impl GPU {
    /// GP0(E1h) - Draw Mode Setting (aka "Texpage")
    ///
    /// # Command Format
    ///
    /// ```text
    /// 0xE1000000 | params
    ///   Bit 0-3:   Texture page X Base   (N*64)
    ///   Bit 4:     Texture page Y Base   (N*256, 0=0, 1=256)
    ///   Bit 5-6:   Semi Transparency     (0=B/2+F/2, 1=B+F, 2=B-F, 3=B+F/4)
    ///   Bit 7-8:   Texture page colors   (0=4bit, 1=8bit, 2=15bit)
    ///   Bit 9:     Dithering enabled     (0=Off, 1=On)
    ///   Bit 10:    Drawing to display    (0=Prohibited, 1=Allowed)
    ///   Bit 11:    Texture disable       (0=Normal, 1=Disable)
    ///   Bit 12:    Textured rect X-flip
    ///   Bit 13:    Textured rect Y-flip
    /// ```
    ///
    /// Bits 0-10 land in GPUSTAT bits 0-10 unchanged; texture disable is
    /// mirrored in GPUSTAT bit 15.
    ///
    /// # Examples
    ///
    /// ```
    /// # use psxcore::core::gpu::GPU;
    /// let mut gpu = GPU::new();
    ///
    /// // X=2 (2*64=128), Y=1 (1*256=256)
    /// gpu.write_gp0(0xE100_0012).unwrap();
    /// assert_eq!(gpu.status() & 0x1F, 0x12);
    /// ```
    pub(crate) fn gp0_draw_mode(&mut self, word: u32) {
        let status = &mut self.status;
        status.set_texture_page_x(word & 0xF);
        status.set_texture_page_y((word >> 4) & 1);
        status.set_semi_transparency((word >> 5) & 3);
        status.set_texture_depth((word >> 7) & 3);
        status.set_dither((word >> 9) & 1);
        status.set_draw_to_display((word >> 10) & 1);
        status.set_texture_disable((word >> 11) & 1);

        self.texture_x_flip = (word >> 12) & 1 != 0;
        self.texture_y_flip = (word >> 13) & 1 != 0;

        log::debug!(
            "Draw mode: page=({}, {}) depth={} semi={}",
            status.texture_page_x() * 64,
            status.texture_page_y() * 256,
            status.texture_depth(),
            status.semi_transparency()
        );
    }

    /// GP0(E2h) - Texture Window Setting
    ///
    /// ```text
    ///   Bit 0-4:   Texture window Mask X   (in 8 pixel steps)
    ///   Bit 5-9:   Texture window Mask Y   (in 8 pixel steps)
    ///   Bit 10-14: Texture window Offset X (in 8 pixel steps)
    ///   Bit 15-19: Texture window Offset Y (in 8 pixel steps)
    /// ```
    pub(crate) fn gp0_texture_window(&mut self, word: u32) {
        self.texture_window = TextureWindow {
            mask_x: (word & 0x1F) as u8,
            mask_y: ((word >> 5) & 0x1F) as u8,
            offset_x: ((word >> 10) & 0x1F) as u8,
            offset_y: ((word >> 15) & 0x1F) as u8,
        };

        log::debug!("Texture window: {:?}", self.texture_window);
    }

    /// GP0(E3h) - Set Drawing Area Top-Left
    ///
    /// X in bits 0-9, Y in bits 10-19.
    pub(crate) fn gp0_draw_area_top_left(&mut self, word: u32) {
        self.draw_area.left = CORNER_X.get(word) as u16;
        self.draw_area.top = CORNER_Y.get(word) as u16;

        log::debug!(
            "Draw area top-left: ({}, {})",
            self.draw_area.left,
            self.draw_area.top
        );
    }

    /// GP0(E4h) - Set Drawing Area Bottom-Right
    pub(crate) fn gp0_draw_area_bottom_right(&mut self, word: u32) {
        self.draw_area.right = CORNER_X.get(word) as u16;
        self.draw_area.bottom = CORNER_Y.get(word) as u16;

        log::debug!(
            "Draw area bottom-right: ({}, {})",
            self.draw_area.right,
            self.draw_area.bottom
        );
    }

    /// GP0(E5h) - Set Drawing Offset
    ///
    /// Signed 11-bit X in bits 0-10, signed 11-bit Y in bits 11-21.
    ///
    /// # Examples
    ///
    /// ```
    /// # use psxcore::core::gpu::GPU;
    /// let mut gpu = GPU::new();
    ///
    /// // x = -1 (0x7FF), y = 2
    /// gpu.write_gp0(0xE500_17FF).unwrap();
    /// assert_eq!(gpu.drawing_offset(), (-1, 2));
    /// ```
    pub(crate) fn gp0_draw_offset(&mut self, word: u32) {
        let x = sign_extend(OFFSET_X.get(word), 11) as i16;
        let y = sign_extend(OFFSET_Y.get(word), 11) as i16;
        self.draw_offset = (x, y);

        log::debug!("Draw offset: ({}, {})", x, y);
    }

    /// GP0(E6h) - Mask Bit Setting
    ///
    /// Bit 0 forces the mask bit on drawn pixels (GPUSTAT 11); bit 1 skips
    /// pixels whose mask bit is set (GPUSTAT 12).
    pub(crate) fn gp0_mask_settings(&mut self, word: u32) {
        self.status.set_set_mask(word & 1);
        self.status.set_check_mask((word >> 1) & 1);

        log::debug!("Mask settings: set={} check={}", word & 1, (word >> 1) & 1);
    }
}
