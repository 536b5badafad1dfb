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

//! PS-X EXE executable loader
//!
//! A PlayStation executable is a 2KB header followed by the raw payload
//! that gets copied into RAM. Only the fields needed to start the program
//! are decoded.

use crate::core::error::{EmulatorError, Result};

/// PS-X EXE executable image
///
/// # Header layout (little-endian)
///
/// | Offset | Field                        |
/// |--------|------------------------------|
/// | 0x00   | `"PS-X EXE"` magic           |
/// | 0x10   | Initial PC                   |
/// | 0x14   | Initial GP (r28)             |
/// | 0x18   | Destination address in RAM   |
/// | 0x1C   | Payload size in bytes        |
/// | 0x30   | Stack base (0 = keep r29)    |
/// | 0x34   | Stack offset                 |
///
/// The payload starts at [`PsxExecutable::HEADER_SIZE`].
///
/// # Example
///
/// ```
/// use psxcore::core::loader::PsxExecutable;
///
/// let mut image = vec![0u8; 0x804];
/// image[..8].copy_from_slice(b"PS-X EXE");
/// image[0x10..0x14].copy_from_slice(&0x8001_0000u32.to_le_bytes());
/// image[0x18..0x1C].copy_from_slice(&0x8001_0000u32.to_le_bytes());
/// image[0x1C..0x20].copy_from_slice(&4u32.to_le_bytes());
///
/// let exe = PsxExecutable::parse(&image).unwrap();
/// assert_eq!(exe.pc, 0x8001_0000);
/// assert_eq!(exe.data.len(), 4);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PsxExecutable {
    /// Entry point
    pub pc: u32,
    /// Global pointer
    pub gp: u32,
    /// RAM address the payload is copied to
    pub load_address: u32,
    /// Initial stack pointer base
    pub stack_base: u32,
    /// Added to `stack_base` to form the initial stack pointer
    pub stack_offset: u32,
    /// Payload bytes
    pub data: Vec<u8>,
}

impl PsxExecutable {
    /// Header magic
    pub const MAGIC: &'static [u8; 8] = b"PS-X EXE";

    /// Size of the header preceding the payload
    pub const HEADER_SIZE: usize = 0x800;

    const PC_OFFSET: usize = 0x10;
    const GP_OFFSET: usize = 0x14;
    const DEST_OFFSET: usize = 0x18;
    const SIZE_OFFSET: usize = 0x1C;
    const STACK_BASE_OFFSET: usize = 0x30;
    const STACK_OFFSET_OFFSET: usize = 0x34;

    /// Parse an executable image
    ///
    /// # Errors
    ///
    /// [`EmulatorError::InvalidExecutable`] if the image is shorter than the
    /// header, lacks the magic, or declares a payload past its end.
    pub fn parse(image: &[u8]) -> Result<Self> {
        if image.len() < Self::HEADER_SIZE {
            return Err(invalid(format!(
                "file is {} bytes, header needs {}",
                image.len(),
                Self::HEADER_SIZE
            )));
        }

        if &image[..Self::MAGIC.len()] != Self::MAGIC {
            return Err(invalid("missing PS-X EXE magic".to_string()));
        }

        let size = read_u32(image, Self::SIZE_OFFSET) as usize;
        let end = Self::HEADER_SIZE
            .checked_add(size)
            .filter(|&end| end <= image.len())
            .ok_or_else(|| {
                invalid(format!(
                    "payload of {} bytes runs past end of file ({} bytes)",
                    size,
                    image.len()
                ))
            })?;

        Ok(Self {
            pc: read_u32(image, Self::PC_OFFSET),
            gp: read_u32(image, Self::GP_OFFSET),
            load_address: read_u32(image, Self::DEST_OFFSET),
            stack_base: read_u32(image, Self::STACK_BASE_OFFSET),
            stack_offset: read_u32(image, Self::STACK_OFFSET_OFFSET),
            data: image[Self::HEADER_SIZE..end].to_vec(),
        })
    }

    /// Initial stack pointer, if the header sets one
    pub fn initial_sp(&self) -> Option<u32> {
        (self.stack_base != 0).then(|| self.stack_base.wrapping_add(self.stack_offset))
    }
}

fn invalid(reason: String) -> EmulatorError {
    EmulatorError::InvalidExecutable { reason }
}

/// Caller guarantees `offset + 4` is inside the header
fn read_u32(image: &[u8], offset: usize) -> u32 {
    u32::from_le_bytes([
        image[offset],
        image[offset + 1],
        image[offset + 2],
        image[offset + 3],
    ])
}
