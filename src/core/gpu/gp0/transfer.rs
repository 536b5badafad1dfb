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

//! GP0 VRAM transfer commands
//!
//! CPU-to-VRAM uploads are collected in full and emitted as one
//! [`ImageLoad`]. VRAM-to-CPU read-back is accepted but not modeled.

use super::super::primitives::{DrawCommand, ImageLoad};
use super::super::{Gp0State, GPU};

/// Destination/source position: X in bits 0-9, Y in bits 16-24
fn transfer_position(word: u32) -> (u16, u16) {
    ((word & 0x3FF) as u16, ((word >> 16) & 0x1FF) as u16)
}

/// Width and height with hardware wrap-around (0 means the maximum)
fn transfer_size(word: u32) -> (u16, u16) {
    let width = ((word & 0xFFFF).wrapping_sub(1) & 0x3FF) + 1;
    let height = (((word >> 16) & 0xFFFF).wrapping_sub(1) & 0x1FF) + 1;
    (width as u16, height as u16)
}

impl GPU {
    /// GP0(0xA0): CPU→VRAM Transfer
    ///
    /// Words: command, destination (x, y), size (width, height)
    ///
    /// Subsequent GP0 words carry two 16-bit pixels each until
    /// `width * height` pixels (rounded up to an even count) have arrived.
    pub(crate) fn gp0_cpu_to_vram(&mut self, params: &[u32]) {
        let (x, y) = transfer_position(params[1]);
        let (width, height) = transfer_size(params[2]);

        let pixels = width as usize * height as usize;
        let words = pixels.div_ceil(2);

        log::debug!(
            "CPU→VRAM transfer: ({}, {}) size {}×{} ({} words)",
            x,
            y,
            width,
            height,
            words
        );

        self.pending_image = Some(ImageLoad {
            x,
            y,
            width,
            height,
            pixels: Vec::with_capacity(words * 2),
        });
        self.fetched = 0;
        self.required = words;
        self.gp0_state = Gp0State::BufferingTextureData;
    }

    /// Accept one word of image data
    pub(crate) fn receive_image_word(&mut self, word: u32) {
        if let Some(image) = self.pending_image.as_mut() {
            image.pixels.push(word as u16);
            image.pixels.push((word >> 16) as u16);
        }
        self.fetched += 1;

        if self.fetched < self.required {
            return;
        }

        self.gp0_state = Gp0State::Idle;
        self.fetched = 0;
        self.required = 0;

        if let Some(mut image) = self.pending_image.take() {
            // Drop the padding halfword of an odd-sized image
            image.pixels.truncate(image.pixel_count());
            log::debug!("CPU→VRAM transfer complete");
            self.emit(DrawCommand::ImageLoad(image));
        }
    }

    /// GP0(0xC0): VRAM→CPU Transfer
    ///
    /// Words: command, source (x, y), size (width, height)
    ///
    /// VRAM lives in the renderer, so GPUREAD keeps returning its latched
    /// value instead of pixel data.
    pub(crate) fn gp0_vram_to_cpu(&mut self, params: &[u32]) {
        let (x, y) = transfer_position(params[1]);
        let (width, height) = transfer_size(params[2]);

        log::warn!(
            "VRAM→CPU transfer ({}, {}) size {}×{} not supported, GPUREAD returns stale data",
            x,
            y,
            width,
            height
        );
    }
}
