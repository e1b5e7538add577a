//! Row types of the tile and collider tables.

use macroquad::prelude::{vec2, Vec2};
use serde::{de, Deserialize, Deserializer, Serialize, Serializer};

/// One row of the tile table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TileRecord {
    /// Grid layer.
    pub layer: u8,
    /// JSON pixel pair, e.g. `[128, 320]`.
    pub coords: String,
    /// Sprite path.
    pub image_path: String,
    /// Frame directory, for animated tiles.
    #[serde(default)]
    pub animation_path: Option<String>,
    /// Pickup.
    #[serde(serialize_with = "write_flag", deserialize_with = "read_flag")]
    pub is_item: bool,
    /// Non-player character.
    #[serde(serialize_with = "write_flag", deserialize_with = "read_flag")]
    pub is_npc: bool,
    /// Hostile.
    #[serde(serialize_with = "write_flag", deserialize_with = "read_flag")]
    pub is_enemy: bool,
    /// Spawn marker.
    #[serde(serialize_with = "write_flag", deserialize_with = "read_flag")]
    pub is_player: bool,
    /// Trigger area.
    #[serde(serialize_with = "write_flag", deserialize_with = "read_flag")]
    pub is_event: bool,
    /// Name of a named entity.
    #[serde(default)]
    pub id: Option<String>,
    /// `(w, h)`
    pub size: String,
    /// Catalog category; older tables lack the column.
    #[serde(default)]
    pub category: Option<u16>,
}

/// One row of the collider table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColliderRecord {
    /// JSON pixel pair.
    pub coords: String,
    /// Sprite path.
    pub image_path: String,
    /// Solid sides as `l`, `r`, `u`, `d` letters.
    #[serde(default)]
    pub collider_type: String,
}

// Tables written by other tools spell booleans `True`/`False`.
fn read_flag<'de, D: Deserializer<'de>>(d: D) -> Result<bool, D::Error> {
    let raw = String::deserialize(d)?;
    match raw.trim().to_ascii_lowercase().as_str() {
        "true" | "1" => Ok(true),
        "false" | "0" | "" => Ok(false),
        other => Err(de::Error::custom(format!("invalid flag {other:?}"))),
    }
}

fn write_flag<S: Serializer>(flag: &bool, s: S) -> Result<S::Ok, S::Error> {
    s.serialize_str(if *flag { "True" } else { "False" })
}

/// `[x, y]`, integers without a fraction.
pub fn format_coords(p: Vec2) -> String {
    format!("[{}, {}]", format_number(p.x), format_number(p.y))
}

/// Reads a `[x, y]` pair.
pub fn parse_coords(s: &str) -> Result<Vec2, String> {
    let pair: [f64; 2] =
        serde_json::from_str(s.trim()).map_err(|e| format!("bad coords {s:?}: {e}"))?;
    Ok(vec2(pair[0] as f32, pair[1] as f32))
}

/// `(w, h)`.
pub fn format_size((w, h): (u32, u32)) -> String {
    format!("({w}, {h})")
}

/// Reads a `(w, h)` pair.
pub fn parse_size(s: &str) -> Result<(u32, u32), String> {
    let inner = s.trim().trim_start_matches('(').trim_end_matches(')');
    let mut parts = inner.split(',').map(str::trim);
    let mut next = || -> Result<u32, String> {
        parts
            .next()
            .ok_or_else(|| format!("bad size {s:?}"))?
            .parse::<u32>()
            .map_err(|e| format!("bad size {s:?}: {e}"))
    };
    let size = (next()?, next()?);
    if parts.next().is_some() {
        return Err(format!("bad size {s:?}: too many components"));
    }
    Ok(size)
}

// Whole numbers are written without a fraction so the tables stay readable.
fn format_number(v: f32) -> String {
    if v.fract() == 0.0 && v.abs() < 1e9 {
        format!("{}", v as i64)
    } else {
        format!("{v}")
    }
}
