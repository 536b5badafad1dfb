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

//! GP1 display configuration commands
//!
//! Implements display settings including resolution, area, and video mode.

use super::super::registers::DisplayRange;
use super::super::GPU;

impl GPU {
    /// GP1(0x03): Display Enable
    ///
    /// # Arguments
    ///
    /// * `value` - Bit 0: 0=Enable, 1=Disable (inverted logic)
    pub(crate) fn gp1_display_enable(&mut self, value: u32) {
        self.status.set_display_disabled(value & 1);

        log::debug!(
            "Display {}",
            if value & 1 == 0 { "enabled" } else { "disabled" }
        );
    }

    /// GP1(0x05): Start of Display Area
    ///
    /// # Arguments
    ///
    /// * `value` - Bits 1-9: X coordinate (halfword aligned), Bits 10-18: Y coordinate
    pub(crate) fn gp1_display_area_start(&mut self, value: u32) {
        let x = (value & 0x3FE) as u16;
        let y = ((value >> 10) & 0x1FF) as u16;
        self.display_start = (x, y);

        log::debug!("Display area start: ({}, {})", x, y);
    }

    /// GP1(0x06): Horizontal Display Range
    ///
    /// # Arguments
    ///
    /// * `value` - Bits 0-11: X1 start, Bits 12-23: X2 end
    pub(crate) fn gp1_horizontal_display_range(&mut self, value: u32) {
        self.horizontal_range = DisplayRange {
            start: (value & 0xFFF) as u16,
            end: ((value >> 12) & 0xFFF) as u16,
        };

        log::debug!(
            "Horizontal display range: {} to {}",
            self.horizontal_range.start,
            self.horizontal_range.end
        );
    }

    /// GP1(0x07): Vertical Display Range
    ///
    /// # Arguments
    ///
    /// * `value` - Bits 0-9: Y1 start, Bits 10-19: Y2 end
    pub(crate) fn gp1_vertical_display_range(&mut self, value: u32) {
        self.vertical_range = DisplayRange {
            start: (value & 0x3FF) as u16,
            end: ((value >> 10) & 0x3FF) as u16,
        };

        log::debug!(
            "Vertical display range: {} to {}",
            self.vertical_range.start,
            self.vertical_range.end
        );
    }

    /// GP1(0x08): Display Mode
    ///
    /// # Arguments
    ///
    /// * `value` - Display mode configuration bits:
    ///   - Bits 0-1: Horizontal resolution 1 (GPUSTAT 17-18)
    ///   - Bit 2: Vertical resolution (GPUSTAT 19)
    ///   - Bit 3: Video mode, 0=NTSC 1=PAL (GPUSTAT 20)
    ///   - Bit 4: Color depth, 0=15bit 1=24bit (GPUSTAT 21)
    ///   - Bit 5: Interlace (GPUSTAT 22)
    ///   - Bit 6: Horizontal resolution 2 (GPUSTAT 16)
    ///   - Bit 7: Reverse flag (GPUSTAT 14)
    pub(crate) fn gp1_display_mode(&mut self, value: u32) {
        let status = &mut self.status;
        status.set_hres1(value & 3);
        status.set_vres((value >> 2) & 1);
        status.set_video_mode((value >> 3) & 1);
        status.set_color_depth((value >> 4) & 1);
        status.set_vertical_interlace((value >> 5) & 1);
        status.set_hres2((value >> 6) & 1);
        status.set_reverse((value >> 7) & 1);

        let display = self.display_state();
        log::debug!(
            "Display mode: {}x{} {} {}bit{}",
            display.width,
            display.height,
            if display.pal { "PAL" } else { "NTSC" },
            if display.color_24bit { 24 } else { 15 },
            if display.interlaced { " interlaced" } else { "" }
        );
    }
}
