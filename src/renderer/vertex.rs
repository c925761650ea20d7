//! Sprite instance types for batched 2D rendering

use bytemuck::{Pod, Zeroable};
use glam::Vec2;

use super::{DrawSink, SpriteKind};
use crate::Color;

/// One sprite draw, laid out for direct upload as an instance buffer
#[repr(C)]
#[derive(Copy, Clone, Debug, Pod, Zeroable)]
pub struct SpriteInstance {
    pub position: [f32; 2],
    pub origin: [f32; 2],
    pub scale: [f32; 2],
    pub rotation: f32,
    /// `SpriteKind` discriminant
    pub sprite: u32,
    pub color: [f32; 4],
}

impl SpriteInstance {
    pub fn new(
        sprite: SpriteKind,
        position: Vec2,
        rotation: f32,
        origin: Vec2,
        scale: Vec2,
        tint: Color,
    ) -> Self {
        Self {
            position: position.to_array(),
            origin: origin.to_array(),
            scale: scale.to_array(),
            rotation,
            sprite: sprite as u32,
            color: tint.to_array(),
        }
    }
}

/// CPU sprite batch; collects a frame's draw calls in submission order
#[derive(Debug, Default)]
pub struct SpriteBatch {
    instances: Vec<SpriteInstance>,
}

impl SpriteBatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            instances: Vec::with_capacity(capacity),
        }
    }

    /// Drop recorded instances, keeping the allocation for the next frame
    pub fn clear(&mut self) {
        self.instances.clear();
    }

    pub fn len(&self) -> usize {
        self.instances.len()
    }

    pub fn is_empty(&self) -> bool {
        self.instances.is_empty()
    }

    pub fn instances(&self) -> &[SpriteInstance] {
        &self.instances
    }

    /// Number of recorded draws using the given sprite
    pub fn count_of(&self, sprite: SpriteKind) -> usize {
        let id = sprite as u32;
        self.instances.iter().filter(|i| i.sprite == id).count()
    }

    /// Raw bytes for a GPU instance buffer
    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.instances)
    }
}

impl DrawSink for SpriteBatch {
    fn draw(
        &mut self,
        sprite: SpriteKind,
        position: Vec2,
        rotation: f32,
        origin: Vec2,
        scale: Vec2,
        tint: Color,
    ) {
        self.instances
            .push(SpriteInstance::new(sprite, position, rotation, origin, scale, tint));
    }
}

/// Colors for world elements
pub mod colors {
    use crate::Color;

    /// Background grid lines (dark blue, translucent)
    pub const GRID: Color = Color::rgba8(30, 30, 139, 85);
    /// Player death explosion highlight (yellow)
    pub const PLAYER_EXPLOSION: Color = Color::rgb(0.8, 0.8, 0.4);
    /// Exhaust side streams (deep red)
    pub const EXHAUST_SIDE: Color = Color::rgb8(200, 38, 9);
    /// Exhaust center stream (orange-yellow)
    pub const EXHAUST_MID: Color = Color::rgb8(255, 187, 30);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_batch_records_in_order() {
        let mut batch = SpriteBatch::new();
        batch.draw(SpriteKind::Player, Vec2::new(1.0, 2.0), 0.5, Vec2::ZERO, Vec2::ONE, Color::WHITE);
        batch.draw(SpriteKind::Glow, Vec2::ZERO, 0.0, Vec2::ZERO, Vec2::ONE, Color::WHITE);
        assert_eq!(batch.len(), 2);
        assert_eq!(batch.instances()[0].position, [1.0, 2.0]);
        assert_eq!(batch.count_of(SpriteKind::Glow), 1);
        assert_eq!(batch.as_bytes().len(), 2 * std::mem::size_of::<SpriteInstance>());

        batch.clear();
        assert!(batch.is_empty());
    }
}
