//! Grid Wars - simulation core of a neon top-down arcade shooter
//!
//! Core modules:
//! - `sim`: Deterministic simulation (entities, particles, spring grid, collisions)
//! - `renderer`: Draw sink seam and CPU sprite batching
//! - `audio`: Sound event values handed to the host mixer
//! - `persistence`: File helpers for settings and high score
//! - `settings`: Quality presets and screen configuration

pub mod audio;
pub mod color;
pub mod highscores;
pub mod persistence;
pub mod renderer;
pub mod settings;
pub mod sim;

pub use color::Color;
pub use highscores::{FileHighScore, HighScoreStore, MemoryHighScore};
pub use settings::{QualityPreset, Settings};

use glam::Vec2;

/// Game configuration constants
pub mod consts {
    /// Simulation frames per second (one tick per frame)
    pub const FRAME_RATE: f32 = 60.0;
    /// Seconds per simulation frame
    pub const FRAME_DT: f32 = 1.0 / FRAME_RATE;

    /// Default screen dimensions
    pub const SCREEN_WIDTH: f32 = 1920.0;
    pub const SCREEN_HEIGHT: f32 = 1080.0;

    /// Largest particle pool (High preset)
    pub const MAX_PARTICLES: usize = 1024 * 25;
    /// Target number of grid point-masses covering the screen
    pub const MAX_GRID_POINTS: u32 = 2200;

    /// Entity population cap for the spawner
    pub const MAX_ENTITIES: usize = 200;
    /// Maximum black holes alive at once
    pub const MAX_BLACK_HOLES: usize = 2;
}

/// Normalized angle to [-π, π)
#[inline]
pub fn normalize_angle(mut angle: f32) -> f32 {
    use std::f32::consts::PI;
    while angle >= PI {
        angle -= 2.0 * PI;
    }
    while angle < -PI {
        angle += 2.0 * PI;
    }
    angle
}

/// Convert polar (r, theta) to cartesian (x, y)
#[inline]
pub fn polar_to_cartesian(r: f32, theta: f32) -> Vec2 {
    Vec2::new(r * theta.cos(), r * theta.sin())
}

/// Heading of a vector in radians
#[inline]
pub fn to_angle(v: Vec2) -> f32 {
    v.y.atan2(v.x)
}

/// Rescale a vector to the given length (zero stays zero)
#[inline]
pub fn scale_to(v: Vec2, length: f32) -> Vec2 {
    let len = v.length();
    if len > 0.0 { v * (length / len) } else { Vec2::ZERO }
}

/// Catmull-Rom spline through `p1..p2`, using `p0` and `p3` as tangent guides
pub fn catmull_rom(p0: Vec2, p1: Vec2, p2: Vec2, p3: Vec2, t: f32) -> Vec2 {
    let t2 = t * t;
    let t3 = t2 * t;
    0.5 * (2.0 * p1
        + (p2 - p0) * t
        + (2.0 * p0 - 5.0 * p1 + 4.0 * p2 - p3) * t2
        + (3.0 * p1 - p0 - 3.0 * p2 + p3) * t3)
}

/// Axis-aligned screen rectangle
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Rect {
    pub min: Vec2,
    pub size: Vec2,
}

impl Rect {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            min: Vec2::new(x, y),
            size: Vec2::new(width, height),
        }
    }

    /// Rectangle anchored at the origin
    pub fn from_size(size: Vec2) -> Self {
        Self { min: Vec2::ZERO, size }
    }

    #[inline]
    pub fn max(&self) -> Vec2 {
        self.min + self.size
    }

    #[inline]
    pub fn center(&self) -> Vec2 {
        self.min + self.size / 2.0
    }

    /// Grow (or shrink, for negative amounts) on every side
    pub fn inflate(&self, dx: f32, dy: f32) -> Self {
        Self {
            min: self.min - Vec2::new(dx, dy),
            size: self.size + Vec2::new(dx, dy) * 2.0,
        }
    }

    /// Integer-pixel containment: the point is truncated toward zero first,
    /// the right and bottom edges are exclusive.
    pub fn contains_point(&self, p: Vec2) -> bool {
        let (x, y) = (p.x.trunc(), p.y.trunc());
        let max = self.max();
        x >= self.min.x && x < max.x && y >= self.min.y && y < max.y
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::{FRAC_PI_2, PI};

    #[test]
    fn test_polar_and_angle_agree() {
        let v = polar_to_cartesian(5.0, FRAC_PI_2);
        assert!(v.x.abs() < 1e-5);
        assert!((v.y - 5.0).abs() < 1e-5);
        assert!((to_angle(v) - FRAC_PI_2).abs() < 1e-5);
    }

    #[test]
    fn test_scale_to_zero_vector() {
        assert_eq!(scale_to(Vec2::ZERO, 3.0), Vec2::ZERO);
        let v = scale_to(Vec2::new(3.0, 4.0), 10.0);
        assert!((v - Vec2::new(6.0, 8.0)).length() < 1e-5);
    }

    #[test]
    fn test_normalize_angle() {
        assert!((normalize_angle(3.0 * PI) + PI).abs() < 1e-5);
        assert!((normalize_angle(-FRAC_PI_2) + FRAC_PI_2).abs() < 1e-6);
    }

    #[test]
    fn test_catmull_rom_straight_line_midpoint() {
        let mid = catmull_rom(
            Vec2::new(0.0, 0.0),
            Vec2::new(1.0, 0.0),
            Vec2::new(2.0, 0.0),
            Vec2::new(3.0, 0.0),
            0.5,
        );
        assert!((mid - Vec2::new(1.5, 0.0)).length() < 1e-5);
    }

    #[test]
    fn test_rect_contains_truncates() {
        let r = Rect::new(0.0, 0.0, 100.0, 50.0);
        assert!(r.contains_point(Vec2::new(-0.5, 10.0)));
        assert!(!r.contains_point(Vec2::new(100.0, 10.0)));
        assert!(!r.contains_point(Vec2::new(103.0, 10.0)));
        let inner = r.inflate(-10.0, -10.0);
        assert_eq!(inner.min, Vec2::new(10.0, 10.0));
        assert_eq!(inner.size, Vec2::new(80.0, 30.0));
    }
}
