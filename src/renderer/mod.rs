//! Rendering seam
//!
//! The simulation never talks to a GPU. It issues sprite draw calls into a
//! [`DrawSink`]; the host maps [`SpriteKind`] handles to its own textures.
//! [`SpriteBatch`] is the CPU-side sink that packs calls into POD instances.

pub mod shapes;
pub mod vertex;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::Color;

pub use shapes::draw_line;
pub use vertex::{SpriteBatch, SpriteInstance, colors};

/// Opaque texture handle; the host owns the actual image data
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum SpriteKind {
    Player,
    Seeker,
    Wanderer,
    Bullet,
    BlackHole,
    #[default]
    LineParticle,
    Glow,
    /// 1x1 white texel, stretched for lines
    Pixel,
}

impl SpriteKind {
    /// Nominal texture size in pixels (origin and collision radii derive from it)
    pub const fn size(self) -> Vec2 {
        match self {
            SpriteKind::Player => Vec2::new(40.0, 40.0),
            SpriteKind::Seeker => Vec2::new(40.0, 40.0),
            SpriteKind::Wanderer => Vec2::new(40.0, 40.0),
            SpriteKind::Bullet => Vec2::new(16.0, 16.0),
            SpriteKind::BlackHole => Vec2::new(40.0, 40.0),
            SpriteKind::LineParticle => Vec2::new(40.0, 4.0),
            SpriteKind::Glow => Vec2::new(64.0, 32.0),
            SpriteKind::Pixel => Vec2::ONE,
        }
    }

    /// Center of the texture, the usual rotation origin
    #[inline]
    pub fn center(self) -> Vec2 {
        self.size() / 2.0
    }
}

/// Receiver of sprite draw calls
pub trait DrawSink {
    /// Draw `sprite` at `position`, rotated by `rotation` radians about
    /// `origin` (texture pixels), scaled per axis and tinted.
    fn draw(
        &mut self,
        sprite: SpriteKind,
        position: Vec2,
        rotation: f32,
        origin: Vec2,
        scale: Vec2,
        tint: Color,
    );
}
