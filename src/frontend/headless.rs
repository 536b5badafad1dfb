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

//! Headless renderer
//!
//! Keeps statistics about the command stream so the emulator can run
//! without a window, in tests and on the command line.

use crate::core::gpu::{DisplayState, FillRect, ImageLoad, Renderer, Triangle};

/// Command counts for one frame
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FrameStats {
    pub triangles: u64,
    pub fills: u64,
    pub image_loads: u64,
    /// Halfwords uploaded by image loads
    pub uploaded_pixels: u64,
}

impl FrameStats {
    fn add(&mut self, other: &FrameStats) {
        self.triangles += other.triangles;
        self.fills += other.fills;
        self.image_loads += other.image_loads;
        self.uploaded_pixels += other.uploaded_pixels;
    }
}

/// Renderer that logs and counts draw commands
///
/// # Example
///
/// ```
/// use psxcore::core::gpu::{Color, FillRect, Renderer};
/// use psxcore::frontend::HeadlessRenderer;
///
/// let mut renderer = HeadlessRenderer::new();
/// renderer.fill_rect(&FillRect { color: Color::default(), x: 0, y: 0, width: 16, height: 16 });
/// assert_eq!(renderer.current().fills, 1);
/// ```
#[derive(Debug, Default)]
pub struct HeadlessRenderer {
    /// Counts since the last present
    current: FrameStats,
    /// Counts over all presented frames
    totals: FrameStats,
    frames_presented: u64,
    last_display: Option<DisplayState>,
}

impl HeadlessRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Counts accumulated since the last [`Renderer::present`]
    pub fn current(&self) -> FrameStats {
        self.current
    }

    /// Counts over all presented frames
    pub fn totals(&self) -> FrameStats {
        self.totals
    }

    pub fn frames_presented(&self) -> u64 {
        self.frames_presented
    }

    /// Display configuration of the last presented frame
    pub fn last_display(&self) -> Option<DisplayState> {
        self.last_display
    }
}

impl Renderer for HeadlessRenderer {
    fn draw_triangle(&mut self, triangle: &Triangle) {
        self.current.triangles += 1;
        log::trace!(
            "Triangle {:?} colors {:?}{}",
            triangle.vertices,
            triangle.colors,
            if triangle.semi_transparent { " (semi-transparent)" } else { "" }
        );
    }

    fn fill_rect(&mut self, rect: &FillRect) {
        self.current.fills += 1;
        log::trace!(
            "Fill {}x{} at ({}, {}) with {:?}",
            rect.width,
            rect.height,
            rect.x,
            rect.y,
            rect.color
        );
    }

    fn load_image(&mut self, image: &ImageLoad) {
        self.current.image_loads += 1;
        self.current.uploaded_pixels += image.pixels.len() as u64;
        log::debug!(
            "Image load {}x{} at ({}, {})",
            image.width,
            image.height,
            image.x,
            image.y
        );
    }

    fn present(&mut self, display: &DisplayState) {
        self.frames_presented += 1;
        self.totals.add(&self.current);

        log::debug!(
            "Frame {}: {} triangles, {} fills, {} image loads",
            self.frames_presented,
            self.current.triangles,
            self.current.fills,
            self.current.image_loads
        );

        let mode_changed = self.last_display.is_none_or(|last| {
            (last.width, last.height, last.pal, last.enabled)
                != (display.width, display.height, display.pal, display.enabled)
        });
        if mode_changed {
            log::info!(
                "Display {}x{} {}{} (VRAM origin {}, {})",
                display.width,
                display.height,
                if display.pal { "PAL" } else { "NTSC" },
                if display.enabled { "" } else { " [blanked]" },
                display.vram_x,
                display.vram_y
            );
        }

        self.last_display = Some(*display);
        self.current = FrameStats::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::gpu::{DrawCommand, GPU};

    fn feed(renderer: &mut HeadlessRenderer, gpu: &mut GPU, words: &[u32]) {
        for &word in words {
            gpu.write_gp0(word).unwrap();
        }
        for command in gpu.drain_commands() {
            renderer.submit(&command);
        }
    }

    #[test]
    fn test_counts_reset_on_present() {
        let mut renderer = HeadlessRenderer::new();
        let mut gpu = GPU::new();

        // Monochrome quad, fill, 2x1 image load
        feed(
            &mut renderer,
            &mut gpu,
            &[
                0x2800_00FF, // quad
                0,
                0x0000_0010,
                0x0010_0000,
                0x0010_0010,
                0x0200_0000, // fill
                0,
                0x0001_0010,
                0xA000_0000, // image load
                0,
                0x0001_0002,
                0x7FFF_001F,
            ],
        );

        let current = renderer.current();
        assert_eq!(current.triangles, 2);
        assert_eq!(current.fills, 1);
        assert_eq!(current.image_loads, 1);
        assert_eq!(current.uploaded_pixels, 2);

        renderer.present(&gpu.display_state());
        assert_eq!(renderer.current(), FrameStats::default());
        assert_eq!(renderer.totals().triangles, 2);
        assert_eq!(renderer.frames_presented(), 1);
        assert_eq!(renderer.last_display(), Some(gpu.display_state()));
    }

    #[test]
    fn test_totals_accumulate_across_frames() {
        let mut renderer = HeadlessRenderer::new();
        let display = GPU::new().display_state();
        let fill = DrawCommand::FillRect(FillRect {
            color: Default::default(),
            x: 0,
            y: 0,
            width: 16,
            height: 1,
        });

        for _ in 0..3 {
            renderer.submit(&fill);
            renderer.present(&display);
        }
        assert_eq!(renderer.totals().fills, 3);
        assert_eq!(renderer.frames_presented(), 3);
    }
}
