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

//! GPU primitive type definitions
//!
//! Decoded draw primitives handed from the GP0 command processor to the
//! renderer: colors, vertices, triangles, rectangle fills and image loads.

/// A 24-bit RGB color used in GPU commands
///
/// # Examples
///
/// ```
/// use psxcore::core::gpu::Color;
///
/// let color = Color::from_u32(0x00FF8040);
/// assert_eq!(color.r, 0x40);
/// assert_eq!(color.g, 0x80);
/// assert_eq!(color.b, 0xFF);
/// assert_eq!(color.to_rgb15(), (31 << 10) | (16 << 5) | 8);
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Color {
    /// Red channel (0-255)
    pub r: u8,
    /// Green channel (0-255)
    pub g: u8,
    /// Blue channel (0-255)
    pub b: u8,
}

impl Color {
    /// Create a Color from a 32-bit command word
    ///
    /// The color is encoded in the lower 24 bits:
    /// - Bits 0-7: Red
    /// - Bits 8-15: Green
    /// - Bits 16-23: Blue
    ///
    /// The command byte in bits 24-31 is ignored.
    pub fn from_u32(value: u32) -> Self {
        Self {
            r: (value & 0xFF) as u8,
            g: ((value >> 8) & 0xFF) as u8,
            b: ((value >> 16) & 0xFF) as u8,
        }
    }

    /// Convert to the 5-5-5 VRAM pixel format (bit 15 clear)
    pub fn to_rgb15(&self) -> u16 {
        let r = ((self.r as u16) >> 3) & 0x1F;
        let g = ((self.g as u16) >> 3) & 0x1F;
        let b = ((self.b as u16) >> 3) & 0x1F;
        (b << 10) | (g << 5) | r
    }
}

/// A 2D vertex position in drawing coordinates
///
/// # Examples
///
/// ```
/// use psxcore::core::gpu::Vertex;
///
/// let vertex = Vertex::from_u32(0xFFFF_0032);
/// assert_eq!(vertex.x, 50);
/// assert_eq!(vertex.y, -1);
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Vertex {
    /// X coordinate (signed 16-bit)
    pub x: i16,
    /// Y coordinate (signed 16-bit)
    pub y: i16,
}

impl Vertex {
    /// Create a Vertex from a 32-bit command word
    ///
    /// - Bits 0-15: X coordinate
    /// - Bits 16-31: Y coordinate
    pub fn from_u32(value: u32) -> Self {
        Self {
            x: value as u16 as i16,
            y: (value >> 16) as u16 as i16,
        }
    }

    /// Shift by the drawing offset
    pub fn translated(self, (dx, dy): (i16, i16)) -> Self {
        Self {
            x: self.x.wrapping_add(dx),
            y: self.y.wrapping_add(dy),
        }
    }
}

/// A triangle ready for rasterization
///
/// Flat triangles carry the same color in all three slots; Gouraud-shaded
/// triangles carry one color per vertex.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Triangle {
    pub vertices: [Vertex; 3],
    pub colors: [Color; 3],
    /// Blend with the background using the current semi-transparency mode
    pub semi_transparent: bool,
}

/// Monochrome rectangle fill in VRAM coordinates
///
/// Not affected by the drawing offset or the drawing area.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FillRect {
    pub color: Color,
    pub x: u16,
    pub y: u16,
    pub width: u16,
    pub height: u16,
}

/// CPU-to-VRAM image transfer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageLoad {
    /// Destination in VRAM (x 0-1023, y 0-511)
    pub x: u16,
    pub y: u16,
    pub width: u16,
    pub height: u16,
    /// Row-major 16-bit pixels, `width * height` of them
    pub pixels: Vec<u16>,
}

impl ImageLoad {
    /// Number of pixels the transfer carries
    pub fn pixel_count(&self) -> usize {
        self.width as usize * self.height as usize
    }
}

/// A fully decoded GP0 drawing command
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DrawCommand {
    Triangle(Triangle),
    FillRect(FillRect),
    ImageLoad(ImageLoad),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_color_ignores_command_byte() {
        assert_eq!(Color::from_u32(0x2811_2233), Color::from_u32(0x0011_2233));
        assert_eq!(
            Color::from_u32(0x0011_2233),
            Color {
                r: 0x33,
                g: 0x22,
                b: 0x11
            }
        );
    }

    #[test]
    fn test_vertex_translation_wraps() {
        let v = Vertex::from_u32(0x0010_7FFF).translated((1, -0x20));
        assert_eq!(v.x, i16::MIN);
        assert_eq!(v.y, -0x10);
    }

    #[test]
    fn test_image_pixel_count() {
        let image = ImageLoad {
            x: 0,
            y: 0,
            width: 3,
            height: 5,
            pixels: Vec::new(),
        };
        assert_eq!(image.pixel_count(), 15);
    }
}
