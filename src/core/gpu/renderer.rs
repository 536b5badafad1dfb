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

//! Renderer collaborator interface

use super::{DisplayState, DrawCommand, FillRect, ImageLoad, Triangle};

/// Receiver of decoded draw commands
///
/// The GPU command processor owns no pixel storage. Implementations turn
/// draw commands into pixels and show a frame on [`Renderer::present`].
pub trait Renderer {
    fn draw_triangle(&mut self, triangle: &Triangle);

    fn fill_rect(&mut self, rect: &FillRect);

    /// CPU-to-VRAM upload
    fn load_image(&mut self, image: &ImageLoad);

    /// End of frame
    fn present(&mut self, display: &DisplayState);

    /// Route a queued command to its handler
    fn submit(&mut self, command: &DrawCommand) {
        match command {
            DrawCommand::Triangle(triangle) => self.draw_triangle(triangle),
            DrawCommand::FillRect(rect) => self.fill_rect(rect),
            DrawCommand::ImageLoad(image) => self.load_image(image),
        }
    }
}
