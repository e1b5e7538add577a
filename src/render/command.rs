//! Draw commands emitted by the headless core.

use macroquad::prelude::{Color, Rect, Vec2};

use crate::assets::ImageHandle;

/// Horizontal anchoring of [`DrawCommand::Text`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextAlign {
    /// `pos` is the left end.
    Left,
    /// `pos` is the middle.
    Center,
    /// `pos` is the right end.
    Right,
}

/// One screen-space drawing step. Scenes build lists of these; the backend
/// executes them.
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    /// Fills the whole screen.
    Clear(Color),
    /// Solid rectangle.
    FillRect {
        /// Screen rect.
        rect: Rect,
        /// Fill colour.
        color: Color,
    },
    /// Rectangle outline.
    OutlineRect {
        /// Screen rect.
        rect: Rect,
        /// Line width.
        thickness: f32,
        /// Line colour.
        color: Color,
    },
    /// Cached image at its natural size.
    Sprite {
        /// Image to draw.
        image: ImageHandle,
        /// Screen position of the top-left corner.
        dest: Vec2,
        /// Opacity, 255 opaque.
        alpha: u8,
        /// Mirror horizontally.
        flip_x: bool,
    },
    /// Straight line.
    Line {
        /// Start point.
        from: Vec2,
        /// End point.
        to: Vec2,
        /// Line width.
        thickness: f32,
        /// Line colour.
        color: Color,
    },
    /// Filled circle.
    Circle {
        /// Screen centre.
        center: Vec2,
        /// Radius in pixels.
        radius: f32,
        /// Fill colour.
        color: Color,
    },
    /// Annulus between `radius - thickness` and `radius`.
    Ring {
        /// Screen centre.
        center: Vec2,
        /// Outer radius.
        radius: f32,
        /// Ring width, inward from the outer radius.
        thickness: f32,
        /// Fill colour.
        color: Color,
    },
    /// `pos` is the baseline anchor.
    Text {
        /// String to draw.
        text: String,
        /// Baseline anchor.
        pos: Vec2,
        /// Font size.
        size: u16,
        /// Text colour.
        color: Color,
        /// How `pos` anchors the string.
        align: TextAlign,
    },
}

impl DrawCommand {
    /// Opaque, unflipped sprite.
    pub fn sprite(image: ImageHandle, dest: Vec2) -> Self {
        DrawCommand::Sprite {
            image,
            dest,
            alpha: 255,
            flip_x: false,
        }
    }
}
