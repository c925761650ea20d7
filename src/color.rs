//! RGBA color with HSV conversion
//!
//! Hue is expressed in sextants, [0, 6), which keeps the conversion free of
//! the usual `* 60.0` bookkeeping.

use std::ops::Mul;

use bytemuck::{Pod, Zeroable};
use glam::Vec3;
use serde::{Deserialize, Serialize};

const HSV_TOLERANCE: f32 = 1e-9;

/// Linear RGBA color, channels in 0-1
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable, Serialize, Deserialize)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Default for Color {
    fn default() -> Self {
        Self::WHITE
    }
}

impl Color {
    pub const WHITE: Color = Color::rgba(1.0, 1.0, 1.0, 1.0);
    pub const TRANSPARENT: Color = Color::rgba(0.0, 0.0, 0.0, 0.0);
    pub const LIGHT_BLUE: Color = Color::rgb8(173, 216, 230);

    pub const fn rgba(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    pub const fn rgb(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b, a: 1.0 }
    }

    pub const fn rgb8(r: u8, g: u8, b: u8) -> Self {
        Self::rgba8(r, g, b, 255)
    }

    pub const fn rgba8(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self {
            r: r as f32 / 255.0,
            g: g as f32 / 255.0,
            b: b as f32 / 255.0,
            a: a as f32 / 255.0,
        }
    }

    /// Per-channel linear interpolation
    pub fn lerp(self, other: Color, t: f32) -> Self {
        Self {
            r: self.r + (other.r - self.r) * t,
            g: self.g + (other.g - self.g) * t,
            b: self.b + (other.b - self.b) * t,
            a: self.a + (other.a - self.a) * t,
        }
    }

    pub fn to_array(self) -> [f32; 4] {
        [self.r, self.g, self.b, self.a]
    }

    /// Convert to (hue, saturation, value), hue in [0, 6)
    pub fn to_hsv(self) -> Vec3 {
        let v = self.r.max(self.g.max(self.b));
        let chroma = v - self.r.min(self.g.min(self.b));

        if chroma.abs() < HSV_TOLERANCE {
            return Vec3::new(0.0, 0.0, v);
        }

        let s = chroma / v;

        if self.r >= self.g && self.g >= self.b {
            let mut h = (self.g - self.b) / chroma;
            if h < 0.0 {
                h += 6.0;
            }
            return Vec3::new(h, s, v);
        }
        if self.g >= self.b && self.g >= self.r {
            return Vec3::new((self.b - self.r) / chroma + 2.0, s, v);
        }
        if self.b >= self.g && self.b >= self.r {
            return Vec3::new((self.r - self.g) / chroma + 4.0, s, v);
        }
        // red is the max but blue beats green: the magenta side of the wheel
        Vec3::new((self.g - self.b) / chroma + 6.0, s, v)
    }

    /// Build an opaque color from hue (sextants), saturation and value
    pub fn from_hsv(h: f32, s: f32, v: f32) -> Self {
        if h.abs() < HSV_TOLERANCE && s.abs() < HSV_TOLERANCE {
            return Self::rgb(v, v, v);
        }

        let c = s * v;
        let x = c * (1.0 - ((h % 2.0) - 1.0).abs());
        let m = v - c;

        if h < 1.0 {
            Self::rgb(c + m, x + m, m)
        } else if h < 2.0 {
            Self::rgb(x + m, c + m, m)
        } else if h < 3.0 {
            Self::rgb(m, c + m, x + m)
        } else if h < 4.0 {
            Self::rgb(m, x + m, c + m)
        } else if h < 5.0 {
            Self::rgb(x + m, m, c + m)
        } else {
            Self::rgb(c + m, m, x + m)
        }
    }
}

/// Scales every channel, alpha included (premultiplied fade)
impl Mul<f32> for Color {
    type Output = Color;

    fn mul(self, k: f32) -> Color {
        Color::rgba(self.r * k, self.g * k, self.b * k, self.a * k)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn close(a: Color, b: Color) -> bool {
        (a.r - b.r).abs() < 1e-4 && (a.g - b.g).abs() < 1e-4 && (a.b - b.b).abs() < 1e-4
    }

    #[test]
    fn test_primary_hues() {
        assert!(close(Color::from_hsv(0.0, 1.0, 1.0), Color::rgb(1.0, 0.0, 0.0)));
        assert!(close(Color::from_hsv(2.0, 1.0, 1.0), Color::rgb(0.0, 1.0, 0.0)));
        assert!(close(Color::from_hsv(4.0, 1.0, 1.0), Color::rgb(0.0, 0.0, 1.0)));
    }

    #[test]
    fn test_gray_shortcut() {
        let c = Color::from_hsv(0.0, 0.0, 0.4);
        assert!(close(c, Color::rgb(0.4, 0.4, 0.4)));
        assert_eq!(c.to_hsv(), Vec3::new(0.0, 0.0, 0.4));
    }

    #[test]
    fn test_mul_fades_all_channels() {
        let c = Color::WHITE * 0.5;
        assert_eq!(c, Color::rgba(0.5, 0.5, 0.5, 0.5));
    }

    proptest! {
        #[test]
        fn hsv_survives_a_trip_through_rgb(h in 0.0f32..5.99, s in 0.05f32..1.0, v in 0.05f32..1.0) {
            let back = Color::from_hsv(h, s, v).to_hsv();
            prop_assert!((back.y - s).abs() < 1e-3);
            prop_assert!((back.z - v).abs() < 1e-3);
            prop_assert!(close(Color::from_hsv(back.x, back.y, back.z), Color::from_hsv(h, s, v)));
        }
    }
}
