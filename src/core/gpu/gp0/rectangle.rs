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

//! GP0 rectangle fill

use super::super::primitives::{Color, DrawCommand, FillRect};
use super::super::GPU;

impl GPU {
    /// GP0(0x02): Fill Rectangle in VRAM
    ///
    /// Words: command+color, top-left (x, y), size (width, height)
    ///
    /// The fill ignores the drawing offset, drawing area and mask settings.
    /// X and width are rounded to 16-pixel steps.
    ///
    /// # Examples
    ///
    /// ```
    /// # use psxcore::core::gpu::{DrawCommand, GPU};
    /// let mut gpu = GPU::new();
    /// gpu.write_gp0(0x0200_0000).unwrap();
    /// gpu.write_gp0(0x0008_0013).unwrap();
    /// gpu.write_gp0(0x0010_0011).unwrap();
    ///
    /// match &gpu.drain_commands()[..] {
    ///     [DrawCommand::FillRect(rect)] => {
    ///         assert_eq!((rect.x, rect.y), (0x10, 0x08));
    ///         assert_eq!((rect.width, rect.height), (0x20, 0x10));
    ///     }
    ///     other => panic!("unexpected {:?}", other),
    /// }
    /// ```
    pub(crate) fn gp0_fill_rectangle(&mut self, params: &[u32]) {
        let color = Color::from_u32(params[0]);
        let x = (params[1] & 0x3F0) as u16;
        let y = ((params[1] >> 16) & 0x1FF) as u16;
        let width = ((((params[2] & 0x3FF) + 0xF) & !0xF) & 0x7FF) as u16;
        let height = ((params[2] >> 16) & 0x1FF) as u16;

        log::debug!("Fill rectangle: ({}, {}) {}x{}", x, y, width, height);

        self.emit(DrawCommand::FillRect(FillRect {
            color,
            x,
            y,
            width,
            height,
        }));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fill(gpu: &mut GPU, words: [u32; 3]) -> FillRect {
        for word in words {
            gpu.write_gp0(word).unwrap();
        }
        match gpu.drain_commands().pop() {
            Some(DrawCommand::FillRect(rect)) => rect,
            other => panic!("expected fill, got {:?}", other),
        }
    }

    #[test]
    fn test_fill_ignores_drawing_offset() {
        let mut gpu = GPU::new();
        gpu.write_gp0(0xE500_0000 | 100 | (100 << 11)).unwrap();

        let rect = fill(&mut gpu, [0x02FF_FFFF, 0x0000_0000, 0x0010_0010]);
        assert_eq!((rect.x, rect.y), (0, 0));
        assert_eq!(rect.color, Color { r: 0xFF, g: 0xFF, b: 0xFF });
    }

    #[test]
    fn test_fill_masks_coordinates() {
        let mut gpu = GPU::new();
        let rect = fill(&mut gpu, [0x0200_0000, 0xFFFF_FFFF, 0x03FF_03FF]);
        assert_eq!(rect.x, 0x3F0);
        assert_eq!(rect.y, 0x1FF);
        assert_eq!(rect.width, 0x400);
        assert_eq!(rect.height, 0x1FF);
    }
}
