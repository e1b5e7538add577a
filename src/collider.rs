//! Static axis-aligned obstacles.
//!
//! A collider is a tile-sized square whose solid sides are encoded by a
//! collision type string over `l`, `r`, `u`, `d`. Each solid side becomes a
//! one-pixel-thick edge rectangle.

use std::fmt;
use std::path::Path;

use macroquad::prelude::{Rect, Vec2};

/// Which sides of a collider tile are solid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct CollisionType {
    /// Left side is solid.
    pub left: bool,
    /// Right side is solid.
    pub right: bool,
    /// Top side is solid.
    pub up: bool,
    /// Bottom side is solid.
    pub down: bool,
}

impl CollisionType {
    /// All four sides.
    pub const SOLID: CollisionType = CollisionType {
        left: true,
        right: true,
        up: true,
        down: true,
    };

    /// Unknown letters are ignored.
    pub fn parse(s: &str) -> Self {
        let mut ct = CollisionType::default();
        for c in s.chars() {
            match c.to_ascii_lowercase() {
                'l' => ct.left = true,
                'r' => ct.right = true,
                'u' => ct.up = true,
                'd' => ct.down = true,
                _ => {}
            }
        }
        ct
    }

    /// Collider sprites are named after their type, e.g. `lu.png`.
    pub fn from_sprite_name(path: &str) -> Self {
        let stem = Path::new(path)
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or_default();
        Self::parse(stem)
    }

    /// No solid side.
    pub fn is_empty(&self) -> bool {
        !(self.left || self.right || self.up || self.down)
    }
}

impl fmt::Display for CollisionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (on, c) in [
            (self.left, 'l'),
            (self.right, 'r'),
            (self.up, 'u'),
            (self.down, 'd'),
        ] {
            if on {
                write!(f, "{c}")?;
            }
        }
        Ok(())
    }
}

impl From<&str> for CollisionType {
    fn from(s: &str) -> Self {
        CollisionType::parse(s)
    }
}

/// Result of [`Collider::check_collision`]: which edges a rect touches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct EdgeHits {
    /// Touches the left edge.
    pub left: bool,
    /// Touches the right edge.
    pub right: bool,
    /// Touches the top edge.
    pub up: bool,
    /// Touches the bottom edge.
    pub down: bool,
}

impl EdgeHits {
    /// Touches any edge.
    pub fn any(&self) -> bool {
        self.left || self.right || self.up || self.down
    }
}

/// Tile-sized obstacle with an edge rect per solid side.
#[derive(Debug, Clone, PartialEq)]
pub struct Collider {
    position: Vec2,
    size: f32,
    collision_type: CollisionType,
    left: Option<Rect>,
    right: Option<Rect>,
    up: Option<Rect>,
    down: Option<Rect>,
}

impl Collider {
    /// Square collider of side `size` with its top-left at `position`.
    pub fn new(position: Vec2, size: f32, collision_type: CollisionType) -> Self {
        let (x, y) = (position.x, position.y);
        let edge = |on: bool, r: Rect| on.then_some(r);
        Collider {
            position,
            size,
            collision_type,
            left: edge(collision_type.left, Rect::new(x, y, 1.0, size)),
            right: edge(collision_type.right, Rect::new(x + size - 1.0, y, 1.0, size)),
            up: edge(collision_type.up, Rect::new(x, y, size, 1.0)),
            down: edge(collision_type.down, Rect::new(x, y + size - 1.0, size, 1.0)),
        }
    }

    /// Top-left corner.
    pub fn position(&self) -> Vec2 {
        self.position
    }

    /// Side length.
    pub fn size(&self) -> f32 {
        self.size
    }

    /// Solid sides.
    pub fn collision_type(&self) -> CollisionType {
        self.collision_type
    }

    /// Full tile rect.
    pub fn bounds(&self) -> Rect {
        Rect::new(self.position.x, self.position.y, self.size, self.size)
    }

    /// Left x of the tile.
    pub fn left(&self) -> f32 {
        self.position.x
    }

    /// Right x of the tile.
    pub fn right(&self) -> f32 {
        self.position.x + self.size
    }

    /// Top y of the tile.
    pub fn top(&self) -> f32 {
        self.position.y
    }

    /// Bottom y of the tile.
    pub fn bottom(&self) -> f32 {
        self.position.y + self.size
    }

    /// Edge rects in left, right, up, down order.
    pub fn edges(&self) -> [Option<Rect>; 4] {
        [self.left, self.right, self.up, self.down]
    }

    /// Which existing edges `rect` intersects. Pure query; the caller decides
    /// how to respond.
    pub fn check_collision(&self, rect: &Rect) -> EdgeHits {
        let hit = |edge: &Option<Rect>| edge.as_ref().is_some_and(|e| intersects(e, rect));
        EdgeHits {
            left: hit(&self.left),
            right: hit(&self.right),
            up: hit(&self.up),
            down: hit(&self.down),
        }
    }
}

/// Strict overlap test: rects that only share a border do not intersect.
#[inline]
pub fn intersects(a: &Rect, b: &Rect) -> bool {
    a.x < b.x + b.w && b.x < a.x + a.w && a.y < b.y + b.h && b.y < a.y + a.h
}

#[cfg(test)]
mod tests {
    use super::*;
    use macroquad::prelude::vec2;

    #[test]
    fn parse_ignores_order_and_unknown_letters() {
        assert_eq!(CollisionType::parse("ludr"), CollisionType::SOLID);
        assert_eq!(CollisionType::parse("dx"), CollisionType { down: true, ..Default::default() });
        assert!(CollisionType::parse("").is_empty());
    }

    #[test]
    fn display_round_trips_through_parse() {
        let ct = CollisionType::parse("ud");
        assert_eq!(ct.to_string(), "ud");
        assert_eq!(CollisionType::parse(&ct.to_string()), ct);
    }

    #[test]
    fn sprite_name_gives_type() {
        let ct = CollisionType::from_sprite_name("assets/graphics/colliders/lu.png");
        assert!(ct.left && ct.up && !ct.right && !ct.down);
    }

    #[test]
    fn solid_collider_has_four_edges() {
        let c = Collider::new(vec2(128.0, 320.0), 64.0, CollisionType::SOLID);
        assert!(c.edges().iter().all(Option::is_some));
        let covering = Rect::new(128.0, 320.0, 64.0, 64.0);
        assert_eq!(
            c.check_collision(&covering),
            EdgeHits { left: true, right: true, up: true, down: true }
        );
    }

    #[test]
    fn rect_outside_tile_hits_nothing() {
        let c = Collider::new(vec2(128.0, 320.0), 64.0, CollisionType::SOLID);
        assert!(!c.check_collision(&Rect::new(0.0, 0.0, 32.0, 32.0)).any());
        // sharing the top border only
        assert!(!c.check_collision(&Rect::new(130.0, 280.0, 32.0, 40.0)).any());
    }

    #[test]
    fn absent_edges_never_report() {
        let c = Collider::new(vec2(0.0, 0.0), 64.0, CollisionType::parse("u"));
        let hits = c.check_collision(&Rect::new(-10.0, -10.0, 100.0, 100.0));
        assert_eq!(hits, EdgeHits { up: true, ..Default::default() });
    }
}
