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

//! GP0 polygon drawing commands
//!
//! Triangles and quadrilaterals in flat, Gouraud-shaded and textured form.
//! Quads are always emitted as two triangles sharing the v2-v3 diagonal.
//! Textured polygons are emitted flat with their modulation color.

use super::super::primitives::{Color, DrawCommand, Triangle, Vertex};
use super::super::GPU;

impl GPU {
    /// Decode a vertex word and apply the drawing offset
    fn vertex(&self, word: u32) -> Vertex {
        Vertex::from_u32(word).translated(self.draw_offset)
    }

    fn emit_triangle(&mut self, vertices: [Vertex; 3], colors: [Color; 3], semi_transparent: bool) {
        self.emit(DrawCommand::Triangle(Triangle {
            vertices,
            colors,
            semi_transparent,
        }));
    }

    /// Emit (v1, v2, v3) and (v2, v3, v4)
    fn emit_quad(&mut self, vertices: [Vertex; 4], colors: [Color; 4], semi_transparent: bool) {
        self.emit_triangle(
            [vertices[0], vertices[1], vertices[2]],
            [colors[0], colors[1], colors[2]],
            semi_transparent,
        );
        self.emit_triangle(
            [vertices[1], vertices[2], vertices[3]],
            [colors[1], colors[2], colors[3]],
            semi_transparent,
        );
    }

    /// GP0(0x20/0x22): Monochrome Triangle
    ///
    /// Words: command+color, vertex1, vertex2, vertex3
    pub(crate) fn gp0_monochrome_triangle(&mut self, params: &[u32], semi_transparent: bool) {
        let color = Color::from_u32(params[0]);
        let vertices = [
            self.vertex(params[1]),
            self.vertex(params[2]),
            self.vertex(params[3]),
        ];
        self.emit_triangle(vertices, [color; 3], semi_transparent);
    }

    /// GP0(0x28/0x2A): Monochrome Quad
    ///
    /// Words: command+color, vertex1, vertex2, vertex3, vertex4
    pub(crate) fn gp0_monochrome_quad(&mut self, params: &[u32], semi_transparent: bool) {
        let color = Color::from_u32(params[0]);
        let vertices = [
            self.vertex(params[1]),
            self.vertex(params[2]),
            self.vertex(params[3]),
            self.vertex(params[4]),
        ];
        self.emit_quad(vertices, [color; 4], semi_transparent);
    }

    /// GP0(0x2C-0x2F): Textured Quad
    ///
    /// Words: command+color, vertex1, texcoord1+palette, vertex2,
    /// texcoord2+texpage, vertex3, texcoord3, vertex4, texcoord4
    ///
    /// Texture sampling is not modeled; the quad is drawn in its modulation
    /// color.
    pub(crate) fn gp0_textured_quad(&mut self, params: &[u32], semi_transparent: bool) {
        log::warn!(
            "GP0 textured quad 0x{:02X} drawn flat (clut=0x{:04X} page=0x{:04X})",
            params[0] >> 24,
            params[2] >> 16,
            params[4] >> 16
        );

        let color = Color::from_u32(params[0]);
        let vertices = [
            self.vertex(params[1]),
            self.vertex(params[3]),
            self.vertex(params[5]),
            self.vertex(params[7]),
        ];
        self.emit_quad(vertices, [color; 4], semi_transparent);
    }

    /// GP0(0x30/0x32): Gouraud-shaded Triangle
    ///
    /// Words: color1+command, vertex1, color2, vertex2, color3, vertex3
    pub(crate) fn gp0_shaded_triangle(&mut self, params: &[u32], semi_transparent: bool) {
        let colors = [
            Color::from_u32(params[0]),
            Color::from_u32(params[2]),
            Color::from_u32(params[4]),
        ];
        let vertices = [
            self.vertex(params[1]),
            self.vertex(params[3]),
            self.vertex(params[5]),
        ];
        self.emit_triangle(vertices, colors, semi_transparent);
    }

    /// GP0(0x38/0x3A): Gouraud-shaded Quad
    ///
    /// Words: color1+command, vertex1, color2, vertex2, color3, vertex3,
    /// color4, vertex4
    pub(crate) fn gp0_shaded_quad(&mut self, params: &[u32], semi_transparent: bool) {
        let colors = [
            Color::from_u32(params[0]),
            Color::from_u32(params[2]),
            Color::from_u32(params[4]),
            Color::from_u32(params[6]),
        ];
        let vertices = [
            self.vertex(params[1]),
            self.vertex(params[3]),
            self.vertex(params[5]),
            self.vertex(params[7]),
        ];
        self.emit_quad(vertices, colors, semi_transparent);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn triangles(gpu: &mut GPU) -> Vec<Triangle> {
        gpu.drain_commands()
            .into_iter()
            .map(|command| match command {
                DrawCommand::Triangle(triangle) => triangle,
                other => panic!("expected triangle, got {:?}", other),
            })
            .collect()
    }

    fn v(x: i16, y: i16) -> Vertex {
        Vertex { x, y }
    }

    #[test]
    fn test_monochrome_triangle() {
        let mut gpu = GPU::new();
        for word in [0x2200_FF00, 0x0000_0000, 0x0000_0020, 0x0020_0000] {
            gpu.write_gp0(word).unwrap();
        }

        let tris = triangles(&mut gpu);
        assert_eq!(tris.len(), 1);
        assert_eq!(tris[0].vertices, [v(0, 0), v(32, 0), v(0, 32)]);
        assert_eq!(tris[0].colors[0], Color { r: 0, g: 0xFF, b: 0 });
        assert!(tris[0].semi_transparent);
    }

    #[test]
    fn test_monochrome_quad_splits_on_shared_diagonal() {
        let mut gpu = GPU::new();
        for word in [0x2800_00FF, 0x0000_0000, 0x0000_0010, 0x0010_0000, 0x0010_0010] {
            gpu.write_gp0(word).unwrap();
        }

        let tris = triangles(&mut gpu);
        assert_eq!(tris.len(), 2);
        assert_eq!(tris[0].vertices, [v(0, 0), v(16, 0), v(0, 16)]);
        assert_eq!(tris[1].vertices, [v(16, 0), v(0, 16), v(16, 16)]);
        assert!(!tris[0].semi_transparent);
    }

    #[test]
    fn test_shaded_triangle_keeps_per_vertex_colors() {
        let mut gpu = GPU::new();
        let words = [
            0x3000_00FF, // red
            0x0000_0000,
            0x0000_FF00, // green
            0x0000_0040,
            0x00FF_0000, // blue
            0x0040_0000,
        ];
        for word in words {
            gpu.write_gp0(word).unwrap();
        }

        let tris = triangles(&mut gpu);
        assert_eq!(tris.len(), 1);
        assert_eq!(tris[0].colors[0].r, 0xFF);
        assert_eq!(tris[0].colors[1].g, 0xFF);
        assert_eq!(tris[0].colors[2].b, 0xFF);
        assert_eq!(tris[0].vertices[2], v(0, 64));
    }

    #[test]
    fn test_shaded_quad_colors_follow_vertices() {
        let mut gpu = GPU::new();
        let words = [
            0x3800_0001,
            0x0000_0000,
            0x0000_0002,
            0x0000_0001,
            0x0000_0003,
            0x0001_0000,
            0x0000_0004,
            0x0001_0001,
        ];
        for word in words {
            gpu.write_gp0(word).unwrap();
        }

        let tris = triangles(&mut gpu);
        let reds: Vec<u8> = tris.iter().flat_map(|t| t.colors.iter().map(|c| c.r)).collect();
        assert_eq!(reds, vec![1, 2, 3, 2, 3, 4]);
    }

    #[test]
    fn test_textured_quad_uses_modulation_color() {
        let mut gpu = GPU::new();
        let words = [
            0x2C80_8080, // color
            0x0000_0000, // vertex 0
            0x0000_0000, // texcoord + palette
            0x0000_0008,
            0x0000_0000, // texcoord + page
            0x0008_0000,
            0x0000_0000,
            0x0008_0008,
            0x0000_0000,
        ];
        for word in words {
            gpu.write_gp0(word).unwrap();
        }

        let tris = triangles(&mut gpu);
        assert_eq!(tris.len(), 2);
        assert!(tris
            .iter()
            .all(|t| t.colors == [Color { r: 0x80, g: 0x80, b: 0x80 }; 3]));
        assert_eq!(tris[1].vertices[2], v(8, 8));
    }

    #[test]
    fn test_drawing_offset_applied_to_vertices() {
        let mut gpu = GPU::new();
        // offset (-8, 4)
        gpu.write_gp0(0xE500_0000 | (0x7F8) | (4 << 11)).unwrap();
        for word in [0x2000_0000, 0x0010_0010, 0x0000_0000, 0xFFFF_FFFF] {
            gpu.write_gp0(word).unwrap();
        }

        let tris = triangles(&mut gpu);
        assert_eq!(tris[0].vertices, [v(8, 20), v(-8, 4), v(-9, 3)]);
    }
}
