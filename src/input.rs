//! Keyboard and mouse polling behind a trait so game and editor logic can be
//! driven by scripted input in tests.

use macroquad::prelude::*;

use crate::player::PlayerInput;

/// Source of keyboard and mouse state for one frame.
pub trait InputSource {
    /// Key held.
    fn key_down(&self, key: KeyCode) -> bool;
    /// Key went down this frame.
    fn key_pressed(&self, key: KeyCode) -> bool;
    /// Cursor in screen pixels.
    fn mouse_position(&self) -> Vec2;
    /// Left, middle, right held.
    fn mouse_buttons(&self) -> [bool; 3];
    /// Left, middle, right pressed this frame.
    fn mouse_pressed(&self) -> [bool; 3];
    /// Vertical wheel movement this frame, in notches.
    fn wheel(&self) -> f32;

    /// Either control key held.
    fn ctrl_down(&self) -> bool {
        self.key_down(KeyCode::LeftControl) || self.key_down(KeyCode::RightControl)
    }
}

/// Live input from the macroquad window.
#[derive(Debug, Default, Clone, Copy)]
pub struct MacroquadInput;

const BUTTONS: [MouseButton; 3] = [MouseButton::Left, MouseButton::Middle, MouseButton::Right];

impl InputSource for MacroquadInput {
    fn key_down(&self, key: KeyCode) -> bool {
        is_key_down(key)
    }

    fn key_pressed(&self, key: KeyCode) -> bool {
        is_key_pressed(key)
    }

    fn mouse_position(&self) -> Vec2 {
        let (x, y) = mouse_position();
        vec2(x, y)
    }

    fn mouse_buttons(&self) -> [bool; 3] {
        BUTTONS.map(is_mouse_button_down)
    }

    fn mouse_pressed(&self) -> [bool; 3] {
        BUTTONS.map(is_mouse_button_pressed)
    }

    fn wheel(&self) -> f32 {
        let (_, y) = mouse_wheel();
        if y > 0.0 {
            1.0
        } else if y < 0.0 {
            -1.0
        } else {
            0.0
        }
    }
}

/// A/D move, S slides, space or W jumps, shift sprints, J attacks.
pub fn player_input(input: &impl InputSource) -> PlayerInput {
    PlayerInput {
        left: input.key_down(KeyCode::A) || input.key_down(KeyCode::Left),
        right: input.key_down(KeyCode::D) || input.key_down(KeyCode::Right),
        down: input.key_down(KeyCode::S) || input.key_down(KeyCode::Down),
        jump: input.key_down(KeyCode::Space) || input.key_down(KeyCode::W),
        sprint: input.key_down(KeyCode::LeftShift),
        attack: input.key_pressed(KeyCode::J),
    }
}
