//! Point record layout
//!
//! Matches the vertex layout consumed by the compute shader and the point
//! renderer: three floats followed by one packed attribute word.

use crate::constants::attributes::{COLOR_MASK, LEVEL_MASK, LEVEL_SHIFT};
use bytemuck::{Pod, Zeroable};
use glam::Vec3;

/// Input/output point record
/// Total size: 16 bytes
#[repr(C)]
#[derive(Copy, Clone, Debug, Default, PartialEq, Pod, Zeroable)]
pub struct Point {
    pub x: f32,
    pub y: f32,
    pub z: f32,

    /// Bits 24..32 = LOD level, bits 0..24 = RGB
    pub attributes: u32,
}

impl Point {
    /// Create a point from a position, LOD level and 24-bit RGB color
    pub fn new(position: Vec3, level: u8, rgb: u32) -> Self {
        Self {
            x: position.x,
            y: position.y,
            z: position.z,
            attributes: pack_attributes(level, rgb),
        }
    }

    /// Create a point from an already packed attribute word
    pub fn from_packed(x: f32, y: f32, z: f32, attributes: u32) -> Self {
        Self { x, y, z, attributes }
    }

    #[inline]
    pub fn position(&self) -> Vec3 {
        Vec3::new(self.x, self.y, self.z)
    }

    /// LOD level from the top byte of the attribute word
    #[inline]
    pub fn level(&self) -> u8 {
        ((self.attributes & LEVEL_MASK) >> LEVEL_SHIFT) as u8
    }

    #[inline]
    pub fn color(&self) -> u32 {
        self.attributes & COLOR_MASK
    }

    /// Copy of this point re-tagged with another level
    pub fn with_level(self, level: u8) -> Self {
        Self {
            attributes: pack_attributes(level, self.color()),
            ..self
        }
    }
}

/// Pack a level and RGB color into one attribute word
#[inline]
pub fn pack_attributes(level: u8, rgb: u32) -> u32 {
    ((level as u32) << LEVEL_SHIFT) | (rgb & COLOR_MASK)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::mem;

    #[test]
    fn test_point_layout() {
        assert_eq!(mem::size_of::<Point>(), 16);
        assert_eq!(mem::align_of::<Point>(), 4);
    }

    #[test]
    fn test_attribute_packing() {
        let point = Point::new(Vec3::new(1.0, 2.0, 3.0), 7, 0x12_34_56);
        assert_eq!(point.level(), 7);
        assert_eq!(point.color(), 0x12_34_56);
        assert_eq!(point.attributes, 0x0712_3456);

        // Color bits never bleed into the level
        let point = Point::new(Vec3::ZERO, 0, 0xFFFF_FFFF);
        assert_eq!(point.level(), 0);
        assert_eq!(point.color(), 0x00FF_FFFF);

        let top = Point::from_packed(0.0, 0.0, 0.0, 0xFF00_0000);
        assert_eq!(top.level(), 255);
        assert_eq!(top.with_level(3).level(), 3);
        assert_eq!(top.with_level(3).color(), 0);
    }
}
