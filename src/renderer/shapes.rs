//! Line primitives built from stretched sprites

use glam::Vec2;

use super::{DrawSink, SpriteKind};
use crate::{Color, to_angle};

/// Draw a line as a 1x1 texel stretched to `length x thickness`, rotated
/// about its left-middle edge
pub fn draw_line(sink: &mut dyn DrawSink, start: Vec2, end: Vec2, color: Color, thickness: f32) {
    let delta = end - start;
    sink.draw(
        SpriteKind::Pixel,
        start,
        to_angle(delta),
        Vec2::new(0.0, 0.5),
        Vec2::new(delta.length(), thickness),
        color,
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::renderer::SpriteBatch;
    use std::f32::consts::FRAC_PI_2;

    #[test]
    fn test_line_is_stretched_pixel() {
        let mut batch = SpriteBatch::new();
        draw_line(&mut batch, Vec2::new(10.0, 10.0), Vec2::new(10.0, 40.0), Color::WHITE, 3.0);

        let line = batch.instances()[0];
        assert_eq!(line.sprite, SpriteKind::Pixel as u32);
        assert_eq!(line.scale, [30.0, 3.0]);
        assert!((line.rotation - FRAC_PI_2).abs() < 1e-5);
        assert_eq!(line.origin, [0.0, 0.5]);
    }
}
