//! Cell and pixel coordinate conversions.

use macroquad::prelude::{vec2, Vec2};

/// Sub-pixel grid that `pixel - origin` is snapped to, absorbing the f32
/// round-off of `cell * tile + origin` before flooring.
const ORIGIN_SNAP: f64 = 512.0;

/// Grid coordinate of a tile within one layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct Cell {
    /// Column, growing right.
    pub col: i32,
    /// Row, growing down.
    pub row: i32,
}

impl Cell {
    /// Cell at `col`, `row`.
    #[inline]
    pub const fn new(col: i32, row: i32) -> Self {
        Cell { col, row }
    }

    /// Cell containing a scene-local pixel position (`floor(pixel / tile)`).
    #[inline]
    pub fn containing(local: Vec2, tile_size: u32) -> Self {
        let ts = tile_size as f32;
        Cell {
            col: (local.x / ts).floor() as i32,
            row: (local.y / ts).floor() as i32,
        }
    }

    /// Scene-local pixel position of the cell's top-left corner.
    #[inline]
    pub fn local_pixel(self, tile_size: u32) -> Vec2 {
        let ts = tile_size as f32;
        vec2(self.col as f32 * ts, self.row as f32 * ts)
    }
}

/// `cell * tile_size + origin`
#[inline]
pub fn cell_to_pixel(cell: Cell, tile_size: u32, origin: Vec2) -> Vec2 {
    cell.local_pixel(tile_size) + origin
}

/// `floor((pixel - origin) / tile_size)`
#[inline]
pub fn pixel_to_cell(pixel: Vec2, tile_size: u32, origin: Vec2) -> Cell {
    let snap = |p: f32, o: f32| ((p as f64 - o as f64) * ORIGIN_SNAP).round() / ORIGIN_SNAP;
    let ts = tile_size as f64;
    Cell {
        col: (snap(pixel.x, origin.x) / ts).floor() as i32,
        row: (snap(pixel.y, origin.y) / ts).floor() as i32,
    }
}

/// `local + origin`
#[inline]
pub fn free_pixel(local: Vec2, origin: Vec2) -> Vec2 {
    local + origin
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pixel_to_cell_inverts_cell_to_pixel() {
        let origins = [
            Vec2::ZERO,
            vec2(640.0, 360.0),
            vec2(-37.5, 12.25),
            vec2(0.1, -0.3),
        ];
        for origin in origins {
            for col in -20..20 {
                for row in -12..12 {
                    let cell = Cell::new(col, row);
                    let px = cell_to_pixel(cell, 64, origin);
                    assert_eq!(pixel_to_cell(px, 64, origin), cell, "origin {origin:?}");
                }
            }
        }
    }

    #[test]
    fn negative_pixels_floor_towards_negative_infinity() {
        assert_eq!(Cell::containing(vec2(-1.0, -64.0), 64), Cell::new(-1, -1));
        assert_eq!(Cell::containing(vec2(-65.0, 63.9), 64), Cell::new(-2, 0));
    }

    #[test]
    fn containing_is_a_plain_floor_at_cell_edges() {
        assert_eq!(Cell::containing(vec2(63.995, 0.0), 64), Cell::new(0, 0));
        assert_eq!(Cell::containing(vec2(64.0, -0.001), 64), Cell::new(1, -1));
        assert_eq!(pixel_to_cell(vec2(63.99, 10.0), 64, Vec2::ZERO), Cell::new(0, 0));
        assert_eq!(pixel_to_cell(vec2(703.99, 360.0), 64, vec2(640.0, 360.0)), Cell::new(0, 0));
    }

    #[test]
    fn free_pixel_matches_cell_pixel_for_aligned_offsets() {
        let origin = vec2(300.0, 200.0);
        let cell = Cell::new(3, -2);
        assert_eq!(
            free_pixel(cell.local_pixel(64), origin),
            cell_to_pixel(cell, 64, origin)
        );
    }
}
