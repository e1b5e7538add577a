//! Editor frame building.

use macroquad::prelude::{vec2, Color, Vec2, RED};

use super::state::{Editor, ToolbarAction};
use crate::assets::{AssetCache, AssetLoader};
use crate::object::ObjectKind;
use crate::render::command::{DrawCommand, TextAlign};
use crate::render::cull::{collider_on_screen, grid_lines, on_screen};
use crate::render::parallax::editor_sky;
use crate::spatial::COLLIDER_LAYER;

const GRID_COLOR: Color = Color::new(0.82, 0.667, 0.616, 1.0);
const COORDS_COLOR: Color = Color::new(0.8, 0.0, 0.0, 1.0);
const LAYER_COLOR: Color = Color::new(0.706, 0.0, 0.0, 1.0);
const LABEL_SIZE: u16 = 16;
const READOUT_SIZE: u16 = 24;
/// Opacity lost per layer below the active one.
const LAYER_FADE: u32 = 15;

fn label_color(kind: &ObjectKind) -> Option<Color> {
    match kind {
        ObjectKind::Npc { .. } => Some(Color::from_rgba(0, 0, 255, 255)),
        ObjectKind::Item { .. } => Some(Color::from_rgba(0, 160, 0, 255)),
        ObjectKind::Event { .. } => Some(Color::from_rgba(128, 0, 128, 255)),
        ObjectKind::Enemy { .. } => Some(Color::from_rgba(255, 0, 0, 255)),
        _ => None,
    }
}

/// Opacity of `layer` while `active` is being edited.
pub fn layer_alpha(layer: u8, active: u8) -> u8 {
    let below = active.saturating_sub(layer) as u32;
    255u32.saturating_sub(LAYER_FADE * below) as u8
}

/// Builds the editor frame: backdrop, layers up to the active one,
/// colliders, grid, readouts, the menu and the toolbar.
pub fn draw_editor<L: AssetLoader>(
    editor: &Editor<'_>,
    cache: &mut AssetCache<L>,
    mouse: Vec2,
    out: &mut Vec<DrawCommand>,
) {
    let grid = editor.grid();
    let screen = editor.screen();
    let origin = editor.origin();
    let active = editor.layer();
    let ts = grid.tile_size() as f32;
    let frame = editor.animation_index();

    editor_sky(origin.y, &editor.settings().palette(), screen, out);

    for layer in 0..=active {
        let alpha = layer_alpha(layer, active);
        for (_, obj) in grid.layer(layer) {
            let pos = grid.object_pixel(obj);
            if !on_screen(pos, obj.size, screen) {
                continue;
            }
            out.push(DrawCommand::Sprite {
                image: obj.frame_image(cache, frame),
                dest: pos,
                alpha,
                flip_x: false,
            });
            if let (Some(id), Some(color)) = (
                obj.kind.display_id().filter(|id| !id.is_empty()),
                label_color(&obj.kind),
            ) {
                out.push(DrawCommand::Text {
                    text: id.to_owned(),
                    pos: vec2(pos.x + ts / 2.0, pos.y - 10.0),
                    size: LABEL_SIZE,
                    color,
                    align: TextAlign::Center,
                });
            }
        }
        if layer == COLLIDER_LAYER {
            for (cell, obj) in grid.colliders() {
                let pos = grid.cell_to_pixel(*cell);
                if collider_on_screen(pos, screen) {
                    out.push(DrawCommand::sprite(obj.image, pos));
                }
            }
        }
    }

    let (xs, ys) = grid_lines(origin, grid.tile_size(), screen);
    for x in xs {
        out.push(DrawCommand::Line {
            from: vec2(x, 0.0),
            to: vec2(x, screen.y),
            thickness: 1.0,
            color: GRID_COLOR,
        });
    }
    for y in ys {
        out.push(DrawCommand::Line {
            from: vec2(0.0, y),
            to: vec2(screen.x, y),
            thickness: 1.0,
            color: GRID_COLOR,
        });
    }

    out.push(DrawCommand::Circle {
        center: origin,
        radius: 5.0,
        color: RED,
    });

    let margin = editor.toolbar_margin();
    let right = screen.x - 2.0 * margin;
    let offset = origin - screen / 2.0;
    out.push(DrawCommand::Text {
        text: format!("X: {} Y: {}", offset.x as i32, offset.y as i32),
        pos: vec2(right, 2.0 * margin + READOUT_SIZE as f32),
        size: READOUT_SIZE,
        color: COORDS_COLOR,
        align: TextAlign::Right,
    });
    out.push(DrawCommand::Text {
        text: format!("Layer: {}", active + 1),
        pos: vec2(right, 3.0 * margin + 2.0 * READOUT_SIZE as f32),
        size: READOUT_SIZE,
        color: LAYER_COLOR,
        align: TextAlign::Right,
    });

    out.push(DrawCommand::Text {
        text: editor.title(),
        pos: vec2(screen.x / 2.0, margin + READOUT_SIZE as f32),
        size: READOUT_SIZE,
        color: LAYER_COLOR,
        align: TextAlign::Center,
    });

    editor.menu().draw(editor.catalog(), cache, out);

    for action in ToolbarAction::ALL {
        let rect = action.rect(margin);
        let image = cache.image(&action.image_path(rect.contains(mouse)));
        out.push(DrawCommand::sprite(image, rect.point()));
    }
}
