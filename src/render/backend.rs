//! Macroquad side of rendering: texture decoding and draw command execution.

use std::fs;
use std::path::Path;

use macroquad::prelude::*;

use super::command::{DrawCommand, TextAlign};
use crate::assets::{AssetCache, AssetLoader};
use crate::error::AssetError;

/// Decodes image files straight into GPU textures.
#[derive(Debug, Default)]
pub struct TextureLoader;

impl AssetLoader for TextureLoader {
    type Image = Texture2D;

    fn load_image(&mut self, path: &Path) -> Result<Texture2D, AssetError> {
        let bytes = fs::read(path).map_err(|_| AssetError::Missing {
            path: path.to_path_buf(),
        })?;
        let image = Image::from_file_with_format(&bytes, None).map_err(|e| AssetError::Decode {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;
        let tex = Texture2D::from_image(&image);
        tex.set_filter(FilterMode::Nearest);
        Ok(tex)
    }

    fn image_size(&self, image: &Texture2D) -> (u32, u32) {
        (image.width() as u32, image.height() as u32)
    }

    fn fallback_image(&mut self) -> Texture2D {
        const MAGENTA: [u8; 4] = [255, 0, 255, 255];
        const BLACK: [u8; 4] = [0, 0, 0, 255];
        let pixels = [MAGENTA, BLACK, BLACK, MAGENTA].concat();
        let tex = Texture2D::from_rgba8(2, 2, &pixels);
        tex.set_filter(FilterMode::Nearest);
        tex
    }
}

/// Runs `commands` in order against the current frame.
pub fn execute(commands: &[DrawCommand], cache: &AssetCache<TextureLoader>) {
    for cmd in commands {
        match cmd {
            DrawCommand::Clear(color) => clear_background(*color),
            DrawCommand::FillRect { rect, color } => {
                draw_rectangle(rect.x, rect.y, rect.w, rect.h, *color)
            }
            DrawCommand::OutlineRect {
                rect,
                thickness,
                color,
            } => draw_rectangle_lines(rect.x, rect.y, rect.w, rect.h, *thickness, *color),
            DrawCommand::Sprite {
                image,
                dest,
                alpha,
                flip_x,
            } => {
                let Some(tex) = cache.get(*image) else {
                    continue;
                };
                draw_texture_ex(
                    tex,
                    dest.x,
                    dest.y,
                    Color::from_rgba(255, 255, 255, *alpha),
                    DrawTextureParams {
                        flip_x: *flip_x,
                        ..Default::default()
                    },
                );
            }
            DrawCommand::Line {
                from,
                to,
                thickness,
                color,
            } => draw_line(from.x, from.y, to.x, to.y, *thickness, *color),
            DrawCommand::Circle {
                center,
                radius,
                color,
            } => draw_circle(center.x, center.y, *radius, *color),
            DrawCommand::Ring {
                center,
                radius,
                thickness,
                color,
            } => {
                // macroquad strokes centred on the radius
                let r = (*radius - *thickness / 2.0).max(0.0);
                draw_circle_lines(center.x, center.y, r, *thickness, *color);
            }
            DrawCommand::Text {
                text,
                pos,
                size,
                color,
                align,
            } => {
                let width = measure_text(text, None, *size, 1.0).width;
                let x = match align {
                    TextAlign::Left => pos.x,
                    TextAlign::Center => pos.x - width / 2.0,
                    TextAlign::Right => pos.x - width,
                };
                draw_text(text, x, pos.y, *size as f32, *color);
            }
        }
    }
}

/// Sleeps off what is left of a `1 / target_fps` frame that began at
/// `frame_start` (seconds, as from `get_time`). Physics runs per frame.
pub fn pace_frame(frame_start: f64, target_fps: u32) {
    if target_fps == 0 {
        return;
    }
    let budget = 1.0 / target_fps as f64;
    let spent = get_time() - frame_start;
    #[cfg(not(target_arch = "wasm32"))]
    if spent < budget {
        std::thread::sleep(std::time::Duration::from_secs_f64(budget - spent));
    }
    #[cfg(target_arch = "wasm32")]
    let _ = (budget, spent);
}
