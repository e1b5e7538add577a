//! Per-scene settings record.

use std::collections::BTreeMap;

use macroquad::prelude::Color;
use serde::{Deserialize, Serialize};

use crate::spatial::LAYER_COUNT;

/// Cell size in pixels.
pub const DEFAULT_TILE_SIZE: u32 = 64;
/// Animation frames per second.
pub const DEFAULT_ANIMATION_SPEED: f32 = 4.0;
/// Sky colour.
pub const DEFAULT_SKY_COLOR: &str = "#ddc6a1";
/// Horizon colour.
pub const DEFAULT_HORIZON_COLOR: &str = "#f5f1de";
/// Colour above the horizon.
pub const DEFAULT_HORIZON_TOP_COLOR: &str = "#d1aa9d";

/// Settings record stored next to a scene's tables.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SceneSettings {
    /// Cell size in pixels.
    pub tile_size: u32,
    /// Animation frames per second.
    pub animation_speed: f32,
    /// Per-layer camera speed pair, kept for round-tripping.
    pub camera_speed_on_layer: BTreeMap<u8, (i32, i32)>,
    /// Sky colour as `#rrggbb`.
    pub sky_color: String,
    /// Horizon colour as `#rrggbb`.
    pub horizon_color: String,
    /// Colour above the horizon as `#rrggbb`.
    pub horizon_top_color: String,
}

impl Default for SceneSettings {
    fn default() -> Self {
        SceneSettings {
            tile_size: DEFAULT_TILE_SIZE,
            animation_speed: DEFAULT_ANIMATION_SPEED,
            camera_speed_on_layer: (0..LAYER_COUNT as u8).map(|l| (l, (0, 0))).collect(),
            sky_color: DEFAULT_SKY_COLOR.into(),
            horizon_color: DEFAULT_HORIZON_COLOR.into(),
            horizon_top_color: DEFAULT_HORIZON_TOP_COLOR.into(),
        }
    }
}

/// Render colours of the sky band.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Palette {
    /// Above the band.
    pub sky: Color,
    /// Inside the band.
    pub horizon: Color,
    /// Top stripe of the band.
    pub horizon_top: Color,
}

impl Default for Palette {
    fn default() -> Self {
        Palette {
            sky: Color::from_rgba(0xdd, 0xc6, 0xa1, 0xff),
            horizon: Color::from_rgba(0xf5, 0xf1, 0xde, 0xff),
            horizon_top: Color::from_rgba(0xd1, 0xaa, 0x9d, 0xff),
        }
    }
}

impl SceneSettings {
    /// Parsed colours; unreadable entries keep the default palette colour.
    pub fn palette(&self) -> Palette {
        let base = Palette::default();
        Palette {
            sky: parse_hex_color(&self.sky_color).unwrap_or(base.sky),
            horizon: parse_hex_color(&self.horizon_color).unwrap_or(base.horizon),
            horizon_top: parse_hex_color(&self.horizon_top_color).unwrap_or(base.horizon_top),
        }
    }
}

/// `#rrggbb` or `#rrggbbaa`.
pub fn parse_hex_color(s: &str) -> Option<Color> {
    let hex = s.trim().strip_prefix('#')?;
    if !hex.is_ascii() || !(hex.len() == 6 || hex.len() == 8) {
        return None;
    }
    let byte = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).ok();
    let alpha = if hex.len() == 8 { byte(6)? } else { 0xff };
    Some(Color::from_rgba(byte(0)?, byte(2)?, byte(4)?, alpha))
}
