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

//! Bit-field descriptors for packed hardware registers
//!
//! Status and control registers are stored as a single `u32`. Each field is
//! described by a [`BitField`] constant holding its offset and width, and
//! read or written through [`BitField::get`] / [`BitField::set`].
//!
//! # Example
//!
//! ```
//! use psxcore::core::bits::BitField;
//!
//! const SYNC_MODE: BitField = BitField::new(9, 2);
//!
//! let raw = SYNC_MODE.set(0, 2);
//! assert_eq!(raw, 0x400);
//! assert_eq!(SYNC_MODE.get(raw), 2);
//! ```

/// A field of `width` bits starting at bit `offset`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BitField {
    /// Lowest bit of the field
    pub offset: u32,
    /// Number of bits in the field (1..=32)
    pub width: u32,
}

impl BitField {
    /// Describe a field
    pub const fn new(offset: u32, width: u32) -> Self {
        Self { offset, width }
    }

    /// Describe a single-bit field
    pub const fn bit(offset: u32) -> Self {
        Self::new(offset, 1)
    }

    /// Right-aligned mask of `width` bits
    #[inline(always)]
    pub const fn value_mask(self) -> u32 {
        if self.width >= 32 {
            u32::MAX
        } else {
            (1 << self.width) - 1
        }
    }

    /// Mask of the field in register position
    #[inline(always)]
    pub const fn mask(self) -> u32 {
        self.value_mask() << self.offset
    }

    /// Extract the field from `raw`
    #[inline(always)]
    pub const fn get(self, raw: u32) -> u32 {
        (raw >> self.offset) & self.value_mask()
    }

    /// Extract a single-bit field as a flag
    #[inline(always)]
    pub const fn is_set(self, raw: u32) -> bool {
        self.get(raw) != 0
    }

    /// Return `raw` with the field replaced by `value`
    ///
    /// Bits of `value` above the field width are discarded.
    #[inline(always)]
    pub const fn set(self, raw: u32, value: u32) -> u32 {
        (raw & !self.mask()) | ((value & self.value_mask()) << self.offset)
    }

    /// Return `raw` with a single-bit field set or cleared
    #[inline(always)]
    pub const fn set_flag(self, raw: u32, flag: bool) -> u32 {
        self.set(raw, flag as u32)
    }
}

/// Sign-extend the low `bits` bits of `value`
///
/// # Example
///
/// ```
/// use psxcore::core::bits::sign_extend;
///
/// assert_eq!(sign_extend(0x7FF, 11), -1);
/// assert_eq!(sign_extend(0x3FF, 11), 1023);
/// ```
#[inline(always)]
pub const fn sign_extend(value: u32, bits: u32) -> i32 {
    let shift = 32 - bits;
    ((value << shift) as i32) >> shift
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_masks() {
        assert_eq!(BitField::new(8, 8).mask(), 0x0000_FF00);
        assert_eq!(BitField::bit(31).mask(), 0x8000_0000);
        assert_eq!(BitField::new(0, 32).mask(), 0xFFFF_FFFF);
    }

    #[test]
    fn test_set_leaves_other_bits() {
        let field = BitField::new(4, 4);
        assert_eq!(field.set(0xFFFF_FFFF, 0), 0xFFFF_FF0F);
        assert_eq!(field.set(0, 0x1F), 0xF0, "value is truncated to width");
    }

    #[test]
    fn test_sign_extend() {
        assert_eq!(sign_extend(0x400, 11), -1024);
        assert_eq!(sign_extend(0xFFFF, 16), -1);
        assert_eq!(sign_extend(0x8000_0000, 32), i32::MIN);
    }

    proptest! {
        #[test]
        fn prop_field_round_trip(raw in any::<u32>(), value in any::<u32>(), offset in 0u32..32, width in 1u32..=32) {
            prop_assume!(offset + width <= 32);
            let field = BitField::new(offset, width);
            let updated = field.set(raw, value);
            prop_assert_eq!(field.get(updated), value & field.value_mask());
            prop_assert_eq!(updated & !field.mask(), raw & !field.mask());
        }
    }
}
