//! Application configuration.
//!
//! Window, asset locations, editor defaults and player tuning. Loaded from
//! `config.json` in the working directory; anything missing falls back to
//! the defaults below.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::loader::settings::{
    SceneSettings, DEFAULT_ANIMATION_SPEED, DEFAULT_HORIZON_COLOR, DEFAULT_HORIZON_TOP_COLOR,
    DEFAULT_SKY_COLOR, DEFAULT_TILE_SIZE,
};

/// Configuration file name.
pub const CONFIG_FILE: &str = "config.json";

/// Settings shared by the game and the editor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    // === Window ===
    /// Window width in pixels
    pub window_width: u32,
    /// Window height in pixels
    pub window_height: u32,
    /// Frame cap
    pub target_fps: u32,

    // === Assets ===
    /// Directory every stored asset path is relative to
    pub asset_root: PathBuf,
    /// Level id -> scene directory table
    pub level_index: PathBuf,

    // === Editor ===
    /// Directory offered first by the editor's pickers
    pub editor_save_dir: PathBuf,
    /// Grid size for new scenes, in pixels
    pub tile_size: u32,
    /// Animation frames per second for newly created scenes
    pub animation_speed: f32,
    /// Space around menu buttons
    pub menu_margin: f32,
    /// Sky colour for new scenes
    pub sky_color: String,
    /// Horizon colour for new scenes
    pub horizon_color: String,
    /// Colour above the horizon for new scenes
    pub horizon_top_color: String,

    /// Player tuning
    pub player: PlayerParams,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            window_width: 1280,
            window_height: 720,
            target_fps: 60,

            asset_root: PathBuf::from("."),
            level_index: PathBuf::from("assets/data/levels.json"),

            editor_save_dir: PathBuf::from("assets/editor/saves"),
            tile_size: DEFAULT_TILE_SIZE,
            animation_speed: DEFAULT_ANIMATION_SPEED,
            menu_margin: 6.0,
            sky_color: DEFAULT_SKY_COLOR.into(),
            horizon_color: DEFAULT_HORIZON_COLOR.into(),
            horizon_top_color: DEFAULT_HORIZON_TOP_COLOR.into(),

            player: PlayerParams::default(),
        }
    }
}

/// Player movement and animation tuning. Velocities are pixels per frame.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerParams {
    /// Body width
    pub width: f32,
    /// Body height
    pub height: f32,
    /// Walking speed
    pub speed: f32,
    /// Speed factor while sprinting
    pub sprint_multiplier: f32,
    /// Initial upward speed of a jump
    pub jump_power: f32,
    /// Added to vertical speed every frame
    pub gravity: f32,
    /// Fall speed cap
    pub terminal_velocity: f32,
    /// Seconds
    pub slide_duration: f32,
    /// Speed factor at the start of a slide
    pub slide_boost: f32,
    /// Fraction of slide speed kept after one second
    pub slide_decay: f32,
    /// Slides end once their speed drops below this
    pub slide_stop_speed: f32,
    /// Seconds
    pub attack_duration: f32,
    /// Frames per second
    pub animation_speed: f32,
    /// Player sprite directory, one sub-directory per animation
    pub sprite_dir: String,
}

impl Default for PlayerParams {
    fn default() -> Self {
        Self {
            width: 30.0,
            height: 60.0,
            speed: 6.0,
            sprint_multiplier: 1.5,
            jump_power: 5.0,
            gravity: 0.1,
            terminal_velocity: 10.0,
            slide_duration: 0.3,
            slide_boost: 1.5,
            slide_decay: 0.1,
            slide_stop_speed: 1.0,
            attack_duration: 0.25,
            animation_speed: 15.0,
            sprite_dir: "assets/graphics/player".into(),
        }
    }
}

impl AppConfig {
    /// Load configuration from `config.json` in the working directory.
    pub fn load() -> Self {
        Self::load_from(CONFIG_FILE)
    }

    /// Load configuration from a specific path.
    /// Returns default config if the file doesn't exist or is invalid.
    pub fn load_from<P: AsRef<Path>>(path: P) -> Self {
        let path = path.as_ref();

        if !path.exists() {
            info!("Config file not found, using defaults");
            return Self::default();
        }

        let contents = match fs::read_to_string(path) {
            Ok(contents) => contents,
            Err(e) => {
                warn!("Failed to read config file: {e}");
                return Self::default();
            }
        };

        match serde_json::from_str(&contents) {
            Ok(config) => {
                info!("Loaded config from {}", path.display());
                config
            }
            Err(e) => {
                warn!("Failed to parse config file: {e}");
                Self::default()
            }
        }
    }

    /// Save configuration to a specific path.
    pub fn save_to<P: AsRef<Path>>(&self, path: P) -> io::Result<()> {
        let path = path.as_ref();

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let contents = serde_json::to_string_pretty(self)
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
        fs::write(path, contents)?;

        info!("Saved config to {}", path.display());
        Ok(())
    }

    /// Window size as floats.
    pub fn screen_size(&self) -> (f32, f32) {
        (self.window_width as f32, self.window_height as f32)
    }

    /// Settings a freshly created editor scene starts with.
    pub fn new_scene_settings(&self) -> SceneSettings {
        SceneSettings {
            tile_size: self.tile_size,
            animation_speed: self.animation_speed,
            sky_color: self.sky_color.clone(),
            horizon_color: self.horizon_color.clone(),
            horizon_top_color: self.horizon_top_color.clone(),
            ..SceneSettings::default()
        }
    }

    /// `path` resolved against the asset root.
    pub fn asset_path(&self, path: impl AsRef<Path>) -> PathBuf {
        self.asset_root.join(path)
    }
}
