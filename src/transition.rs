//! Circle wipe played while switching levels.

use macroquad::prelude::{Vec2, BLACK};
use tracing::debug;

use crate::render::command::DrawCommand;

/// Border growth in pixels per second.
pub const WIPE_SPEED: f32 = 1000.0;

/// Black ring closing in from the screen edge, then opening again.
#[derive(Debug, Clone, PartialEq)]
pub struct Transition {
    active: bool,
    border: f32,
    direction: f32,
    center: Vec2,
    radius: f32,
    threshold: f32,
    pending: Option<u32>,
}

impl Transition {
    /// Idle wipe centred on a `screen`-sized viewport.
    pub fn new(screen: Vec2) -> Self {
        let center = screen / 2.0;
        let radius = center.length();
        Transition {
            active: false,
            border: 0.0,
            direction: 1.0,
            center,
            radius,
            threshold: radius + 100.0,
            pending: None,
        }
    }

    /// Whether a wipe is running.
    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Current ring thickness.
    pub fn border(&self) -> f32 {
        self.border
    }

    /// Thickness at which the switch fires.
    pub fn threshold(&self) -> f32 {
        self.threshold
    }

    /// Starts closing in on a switch to `level`. Ignored mid-wipe.
    pub fn start(&mut self, level: u32) {
        if self.active {
            debug!("transition already running, ignoring switch to {level}");
            return;
        }
        self.active = true;
        self.border = 0.0;
        self.direction = 1.0;
        self.pending = Some(level);
    }

    /// Returns the level to switch to on the frame the wipe fully closes.
    pub fn update(&mut self, dt: f32) -> Option<u32> {
        if !self.active {
            return None;
        }
        self.border += WIPE_SPEED * dt * self.direction;

        let mut fired = None;
        if self.direction > 0.0 && self.border >= self.threshold {
            self.direction = -1.0;
            fired = self.pending.take();
        }
        if self.border < 0.0 {
            self.active = false;
            self.border = 0.0;
            self.direction = 1.0;
        }
        fired
    }

    /// Emits the ring while a wipe is running.
    pub fn draw(&self, out: &mut Vec<DrawCommand>) {
        if !self.active || self.border <= 0.0 {
            return;
        }
        out.push(DrawCommand::Ring {
            center: self.center,
            radius: self.radius,
            thickness: self.border.min(self.radius),
            color: BLACK,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use macroquad::prelude::vec2;

    #[test]
    fn fires_once_then_reopens() {
        let mut t = Transition::new(vec2(1280.0, 720.0));
        t.start(3);
        let mut fired = Vec::new();
        for _ in 0..200 {
            if let Some(level) = t.update(0.01) {
                fired.push(level);
            }
        }
        assert_eq!(fired, vec![3]);
        assert!(!t.is_active());
        assert_eq!(t.border(), 0.0);
    }

    #[test]
    fn threshold_is_past_the_corners() {
        let t = Transition::new(vec2(600.0, 800.0));
        assert_eq!(t.threshold(), 600.0);
    }
}
