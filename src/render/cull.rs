//! Visibility tests for drawing.

use macroquad::prelude::Vec2;

/// Colliders are drawn within this band around the screen.
pub const COLLIDER_MARGIN: f32 = 64.0;

/// Strict overlap of `pos + size` with `[0, screen.x] x [0, screen.y]`.
#[inline]
pub fn on_screen(pos: Vec2, size: (u32, u32), screen: Vec2) -> bool {
    let (w, h) = (size.0 as f32, size.1 as f32);
    pos.x + w > 0.0 && pos.x < screen.x && pos.y + h > 0.0 && pos.y < screen.y
}

/// Looser test used for collider tiles, which only know their corner.
#[inline]
pub fn collider_on_screen(pos: Vec2, screen: Vec2) -> bool {
    -COLLIDER_MARGIN < pos.x && pos.x < screen.x && -COLLIDER_MARGIN < pos.y && pos.y < screen.y
}

/// Clouds stay drawable up to one of their own sizes past each edge.
#[inline]
pub fn cloud_on_screen(pos: Vec2, size: (u32, u32), screen: Vec2) -> bool {
    let (w, h) = (size.0 as f32, size.1 as f32);
    pos.x + w > -w && pos.x < screen.x + w && pos.y + h > -h && pos.y < screen.y + h
}

/// Screen positions of the grid lines crossing the screen, for a grid whose
/// cell corners sit at `origin + k * tile_size`.
pub fn grid_lines(origin: Vec2, tile_size: u32, screen: Vec2) -> (Vec<f32>, Vec<f32>) {
    let ts = tile_size as f32;
    if ts <= 0.0 {
        return (Vec::new(), Vec::new());
    }
    let axis = |start: f32, extent: f32| {
        let mut lines = Vec::new();
        let mut p = start.rem_euclid(ts);
        while p < extent {
            lines.push(p);
            p += ts;
        }
        lines
    };
    (axis(origin.x, screen.x), axis(origin.y, screen.y))
}
