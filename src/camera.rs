//! Damped follow camera.

use std::f32::consts::PI;

use macroquad::prelude::{vec2, Rect, Vec2};

/// Phase of the cosine ease; higher closes in faster.
pub const SMOOTHNESS: f32 = 0.2;
/// Divides the eased step.
pub const DAMPING: f32 = 1.5;

/// Fraction of the remaining distance covered each frame.
pub fn follow_factor() -> f32 {
    (1.0 - (PI * SMOOTHNESS).cos()) / DAMPING
}

/// Viewport offset that keeps a target centred on screen. The offset is
/// added to world positions to get screen positions.
#[derive(Debug, Clone, PartialEq)]
pub struct Camera {
    offset: Vec2,
    screen: Vec2,
}

impl Camera {
    /// Camera at the origin for a viewport of `screen` pixels.
    pub fn new(screen: Vec2) -> Self {
        Camera {
            offset: Vec2::ZERO,
            screen,
        }
    }

    /// Offset added to world positions.
    pub fn offset(&self) -> Vec2 {
        self.offset
    }

    /// Viewport size.
    pub fn screen(&self) -> Vec2 {
        self.screen
    }

    /// Screen-space y of the viewport centre, in offset terms.
    pub fn center_y(&self) -> f32 {
        self.offset.y + self.screen.y / 2.0
    }

    /// Offset that centres `rect`.
    pub fn target_for(&self, rect: &Rect) -> Vec2 {
        let center = rect.center();
        vec2(-center.x + self.screen.x / 2.0, -center.y + self.screen.y / 2.0)
    }

    /// Moves a fixed fraction of the way toward centring `rect`. Never
    /// overshoots.
    pub fn follow(&mut self, rect: &Rect) {
        let target = self.target_for(rect);
        self.offset += (target - self.offset) * follow_factor();
    }

    /// Jumps straight to centring `rect`.
    pub fn snap_to(&mut self, rect: &Rect) {
        self.offset = self.target_for(rect);
    }

    /// `rect` moved into screen space.
    pub fn apply(&self, rect: &Rect) -> Rect {
        rect.offset(self.offset)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn factor_matches_cosine_ease() {
        let expected = (1.0 - (PI * 0.2).cos()) / 1.5;
        assert!((follow_factor() - expected).abs() < 1e-6);
    }

    #[test]
    fn snap_centres_target() {
        let mut cam = Camera::new(vec2(1280.0, 720.0));
        let player = Rect::new(100.0, 200.0, 30.0, 60.0);
        cam.snap_to(&player);
        assert_eq!(cam.apply(&player).center(), vec2(640.0, 360.0));
    }
}
