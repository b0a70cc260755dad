//! Floating-point RGBA colour used throughout the pixel and particle cores.

use serde::{Deserialize, Serialize};

/// An RGBA colour with `f32` channels, nominally in `[0, 1]`.
///
/// Channels outside the unit range are legal (HDR intermediates); callers
/// that need clamped values use [`ColourValue::saturated`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ColourValue {
    /// Red channel
    pub r: f32,
    /// Green channel
    pub g: f32,
    /// Blue channel
    pub b: f32,
    /// Alpha channel
    pub a: f32,
}

impl ColourValue {
    /// Opaque white.
    pub const WHITE: Self = Self::new(1.0, 1.0, 1.0, 1.0);
    /// Opaque black.
    pub const BLACK: Self = Self::new(0.0, 0.0, 0.0, 1.0);
    /// Fully transparent black.
    pub const ZERO: Self = Self::new(0.0, 0.0, 0.0, 0.0);

    /// Creates a colour from four channels.
    #[must_use]
    pub const fn new(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    /// Creates an opaque colour from three channels.
    #[must_use]
    pub const fn rgb(r: f32, g: f32, b: f32) -> Self {
        Self::new(r, g, b, 1.0)
    }

    /// Creates a colour from 8-bit channels.
    #[must_use]
    pub fn from_bytes(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self::new(
            f32::from(r) / 255.0,
            f32::from(g) / 255.0,
            f32::from(b) / 255.0,
            f32::from(a) / 255.0,
        )
    }

    /// Creates a colour from a packed `0xAARRGGBB` value.
    #[must_use]
    pub fn from_argb(argb: u32) -> Self {
        Self::from_bytes(
            (argb >> 16) as u8,
            (argb >> 8) as u8,
            argb as u8,
            (argb >> 24) as u8,
        )
    }

    /// Creates a colour from a packed `0xAABBGGRR` value.
    #[must_use]
    pub fn from_abgr(abgr: u32) -> Self {
        Self::from_bytes(
            abgr as u8,
            (abgr >> 8) as u8,
            (abgr >> 16) as u8,
            (abgr >> 24) as u8,
        )
    }

    /// Packs into `0xAARRGGBB` after saturating.
    #[must_use]
    pub fn as_argb(&self) -> u32 {
        let c = self.saturated();
        (u32::from(byte(c.a)) << 24)
            | (u32::from(byte(c.r)) << 16)
            | (u32::from(byte(c.g)) << 8)
            | u32::from(byte(c.b))
    }

    /// Packs into `0xAABBGGRR` after saturating.
    #[must_use]
    pub fn as_abgr(&self) -> u32 {
        let c = self.saturated();
        (u32::from(byte(c.a)) << 24)
            | (u32::from(byte(c.b)) << 16)
            | (u32::from(byte(c.g)) << 8)
            | u32::from(byte(c.r))
    }

    /// Packs into `0xRRGGBBAA` after saturating.
    #[must_use]
    pub fn as_rgba(&self) -> u32 {
        let c = self.saturated();
        (u32::from(byte(c.r)) << 24)
            | (u32::from(byte(c.g)) << 16)
            | (u32::from(byte(c.b)) << 8)
            | u32::from(byte(c.a))
    }

    /// Packs into `0xBBGGRRAA` after saturating.
    #[must_use]
    pub fn as_bgra(&self) -> u32 {
        let c = self.saturated();
        (u32::from(byte(c.b)) << 24)
            | (u32::from(byte(c.g)) << 16)
            | (u32::from(byte(c.r)) << 8)
            | u32::from(byte(c.a))
    }

    /// Returns the colour with every channel clamped to `[0, 1]`.
    #[must_use]
    pub fn saturated(&self) -> Self {
        Self::new(
            self.r.clamp(0.0, 1.0),
            self.g.clamp(0.0, 1.0),
            self.b.clamp(0.0, 1.0),
            self.a.clamp(0.0, 1.0),
        )
    }

    /// Linear interpolation towards `other` by `t` in `[0, 1]`.
    #[must_use]
    pub fn lerp(&self, other: Self, t: f32) -> Self {
        Self::new(
            self.r + (other.r - self.r) * t,
            self.g + (other.g - self.g) * t,
            self.b + (other.b - self.b) * t,
            self.a + (other.a - self.a) * t,
        )
    }

    /// Channel by index: 0 = r, 1 = g, 2 = b, 3 = a.
    #[must_use]
    pub fn channel(&self, index: usize) -> f32 {
        match index {
            0 => self.r,
            1 => self.g,
            2 => self.b,
            _ => self.a,
        }
    }

    /// Sets a channel by index: 0 = r, 1 = g, 2 = b, 3 = a.
    pub fn set_channel(&mut self, index: usize, value: f32) {
        match index {
            0 => self.r = value,
            1 => self.g = value,
            2 => self.b = value,
            _ => self.a = value,
        }
    }
}

impl Default for ColourValue {
    fn default() -> Self {
        Self::WHITE
    }
}

fn byte(channel: f32) -> u8 {
    (channel * 255.0).round() as u8
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_argb_round_trip() {
        let c = ColourValue::from_argb(0x8040_C020);
        assert_eq!(c.as_argb(), 0x8040_C020);
    }

    #[test]
    fn test_abgr_swaps_red_blue() {
        let c = ColourValue::from_argb(0x1122_3344);
        assert_eq!(c.as_abgr(), 0x1144_3322);
    }

    #[test]
    fn test_saturation_clamps() {
        let c = ColourValue::new(2.0, -1.0, 0.5, 1.5).saturated();
        assert_eq!(c, ColourValue::new(1.0, 0.0, 0.5, 1.0));
    }

    #[test]
    fn test_lerp_midpoint() {
        let mid = ColourValue::BLACK.lerp(ColourValue::WHITE, 0.5);
        assert!((mid.r - 0.5).abs() < 1e-6);
        assert!((mid.a - 1.0).abs() < 1e-6);
    }
}
