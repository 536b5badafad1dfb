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

//! GPU (Graphics Processing Unit) command processor
//!
//! This module implements the command front end of the CXD8561 GPU. It does
//! not rasterize: GP0 words are decoded into [`DrawCommand`] values queued
//! for the external [`Renderer`], and GP1 words update the display
//! configuration.
//!
//! # Command ports
//!
//! | Address    | Write | Read    |
//! |------------|-------|---------|
//! | 0x1F801810 | GP0   | GPUREAD |
//! | 0x1F801814 | GP1   | GPUSTAT |
//!
//! # GP0 state machine
//!
//! ```text
//!            opcode with length > 0            last parameter
//!   Idle ------------------------------> BufferingParams ------> Idle
//!    ^                                          |
//!    |            last texture word             | 0xA0 image load
//!    +------------------------------- BufferingTextureData <----+
//! ```
//!
//! # References
//!
//! - [PSX-SPX: GPU](http://problemkaputt.de/psx-spx.htm#gpu)

mod gp0;
mod gp1;
mod primitives;
mod registers;
mod renderer;
#[cfg(test)]
mod tests;

pub use primitives::*;
pub use registers::*;
pub use renderer::Renderer;

use crate::core::error::Result;

/// Largest parameter count of any GP0 command (textured quad)
const MAX_PARAMS: usize = 12;

/// GP0 command-stream state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Gp0State {
    /// Next word is an opcode
    Idle,
    /// Collecting the parameters of a multi-word command
    BufferingParams,
    /// Collecting packed halfwords of a CPU-to-VRAM image
    BufferingTextureData,
}

/// GPU state representing the CXD8561 command processor
///
/// # Examples
///
/// ```
/// use psxcore::core::gpu::{DrawCommand, GPU};
///
/// let mut gpu = GPU::new();
///
/// // Monochrome triangle: color, then three vertices
/// gpu.write_gp0(0x2000_00FF).unwrap();
/// gpu.write_gp0(0x0000_0000).unwrap();
/// gpu.write_gp0(0x0000_0010).unwrap();
/// gpu.write_gp0(0x0010_0000).unwrap();
///
/// let commands = gpu.drain_commands();
/// assert!(matches!(commands.as_slice(), [DrawCommand::Triangle(_)]));
/// ```
pub struct GPU {
    /// GPU status flags (GPUSTAT)
    pub(crate) status: GpuStatus,

    /// Drawing area (clipping rectangle)
    pub(crate) draw_area: DrawingArea,

    /// Drawing offset added to every vertex
    pub(crate) draw_offset: (i16, i16),

    /// Texture window settings
    pub(crate) texture_window: TextureWindow,

    /// Textured rectangle X flip (GP0 E1h bit 12)
    pub(crate) texture_x_flip: bool,

    /// Textured rectangle Y flip (GP0 E1h bit 13)
    pub(crate) texture_y_flip: bool,

    /// First VRAM pixel shown on screen
    pub(crate) display_start: (u16, u16),

    pub(crate) horizontal_range: DisplayRange,
    pub(crate) vertical_range: DisplayRange,

    /// GP0 front-end state
    gp0_state: Gp0State,

    /// Command being buffered; `params[0]` holds its opcode word
    params: [u32; MAX_PARAMS],

    /// Words received for the current command or image
    fetched: usize,

    /// Words needed before the current command or image is complete
    required: usize,

    /// Image being collected in `BufferingTextureData`
    pending_image: Option<ImageLoad>,

    /// Value returned by GPUREAD
    gpuread: u32,

    /// Decoded draw commands waiting for the renderer
    commands: Vec<DrawCommand>,
}

impl GPU {
    /// Create a GPU in its soft-reset state
    pub fn new() -> Self {
        let mut gpu = Self {
            status: GpuStatus::default(),
            draw_area: DrawingArea::default(),
            draw_offset: (0, 0),
            texture_window: TextureWindow::default(),
            texture_x_flip: false,
            texture_y_flip: false,
            display_start: (0, 0),
            horizontal_range: DisplayRange::HORIZONTAL_DEFAULT,
            vertical_range: DisplayRange::VERTICAL_DEFAULT,
            gp0_state: Gp0State::Idle,
            params: [0; MAX_PARAMS],
            fetched: 0,
            required: 0,
            pending_image: None,
            gpuread: 0,
            commands: Vec::new(),
        };
        gpu.reset();
        gpu
    }

    /// Reset GPU to initial state
    ///
    /// Same as GP1(0x00), and also drops queued draw commands.
    pub fn reset(&mut self) {
        self.soft_reset();
        self.commands.clear();
        self.gpuread = 0;
    }

    /// Restore every configuration field and the GP0 state machine
    pub(crate) fn soft_reset(&mut self) {
        self.status = GpuStatus::default();
        self.draw_area = DrawingArea::default();
        self.draw_offset = (0, 0);
        self.texture_window = TextureWindow::default();
        self.texture_x_flip = false;
        self.texture_y_flip = false;
        self.display_start = (0, 0);
        self.horizontal_range = DisplayRange::HORIZONTAL_DEFAULT;
        self.vertical_range = DisplayRange::VERTICAL_DEFAULT;
        self.reset_command_buffer();
    }

    /// Return the GP0 front end to `Idle`, discarding partial input
    pub(crate) fn reset_command_buffer(&mut self) {
        self.gp0_state = Gp0State::Idle;
        self.params = [0; MAX_PARAMS];
        self.fetched = 0;
        self.required = 0;
        self.pending_image = None;
    }

    /// Write a word to GP0 (0x1F801810)
    ///
    /// # Errors
    ///
    /// [`EmulatorError::UnknownGp0Command`](crate::core::error::EmulatorError::UnknownGp0Command)
    /// when an opcode word selects no known command.
    pub fn write_gp0(&mut self, word: u32) -> Result<()> {
        match self.gp0_state {
            Gp0State::Idle => {
                let opcode = (word >> 24) as u8;
                let length = gp0::command_length(opcode);

                if length == 0 {
                    log::trace!("GP0 0x{:08X}", word);
                    return self.execute_immediate(opcode, word);
                }

                self.params[0] = word;
                self.fetched = 1;
                self.required = length;
                self.gp0_state = Gp0State::BufferingParams;
                Ok(())
            }
            Gp0State::BufferingParams => {
                self.params[self.fetched] = word;
                self.fetched += 1;

                if self.fetched == self.required {
                    // Dispatch may move straight into texture buffering
                    self.gp0_state = Gp0State::Idle;
                    self.fetched = 0;
                    self.execute_buffered()?;
                }
                Ok(())
            }
            Gp0State::BufferingTextureData => {
                self.receive_image_word(word);
                Ok(())
            }
        }
    }

    /// Write a word to GP1 (0x1F801814)
    ///
    /// GP1 bypasses the GP0 state machine and always takes effect at once.
    ///
    /// # Errors
    ///
    /// [`EmulatorError::UnknownGp1Command`](crate::core::error::EmulatorError::UnknownGp1Command)
    /// for opcodes outside the supported set.
    pub fn write_gp1(&mut self, word: u32) -> Result<()> {
        self.execute_gp1(word)
    }

    /// Read GPUSTAT (0x1F801814)
    pub fn status(&self) -> u32 {
        self.status.0
    }

    /// Status register as a typed value
    pub fn status_register(&self) -> GpuStatus {
        self.status
    }

    /// Read GPUREAD (0x1F801810)
    ///
    /// Returns the last GPU info response. VRAM read-back is not modeled.
    pub fn read_gpuread(&self) -> u32 {
        self.gpuread
    }

    /// Current GP0 front-end state
    pub fn gp0_state(&self) -> Gp0State {
        self.gp0_state
    }

    /// Take every queued draw command, oldest first
    pub fn drain_commands(&mut self) -> Vec<DrawCommand> {
        std::mem::take(&mut self.commands)
    }

    /// Number of draw commands waiting in the queue
    pub fn pending_commands(&self) -> usize {
        self.commands.len()
    }

    pub fn drawing_offset(&self) -> (i16, i16) {
        self.draw_offset
    }

    pub fn drawing_area(&self) -> DrawingArea {
        self.draw_area
    }

    pub fn texture_window(&self) -> TextureWindow {
        self.texture_window
    }

    /// Textured rectangle flip flags (x, y)
    pub fn texture_flip(&self) -> (bool, bool) {
        (self.texture_x_flip, self.texture_y_flip)
    }

    /// Display configuration for the renderer
    pub fn display_state(&self) -> DisplayState {
        DisplayState::from_status(
            self.status,
            self.display_start,
            self.horizontal_range,
            self.vertical_range,
        )
    }

    pub(crate) fn emit(&mut self, command: DrawCommand) {
        self.commands.push(command);
    }
}

impl Default for GPU {
    fn default() -> Self {
        Self::new()
    }
}
