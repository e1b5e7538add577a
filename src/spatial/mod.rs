//! Scene grid: cell math, layers and the collider map.

mod cell;
mod grid;

pub use cell::{cell_to_pixel, free_pixel, pixel_to_cell, Cell};
pub use grid::{
    SceneBounds, SceneGrid, BACKGROUND_LAYERS, BOUNDS_LAYERS, COLLIDER_LAYER, FOREGROUND_LAYERS,
    GAMEPLAY_LAYERS, LAYER_COUNT, PLAYER_DRAW_LAYER, SKY_LAYER,
};
