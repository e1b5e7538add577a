#![warn(missing_docs)]

//! Side-scrolling platformer and level editor on Macroquad.
//!
//! Scenes are sparse 15-layer tile grids saved as CSV plus a JSON settings
//! file. The game streams the outer layers through a parallax renderer and
//! runs a kinematic player against one-sided tile colliders.

pub mod assets;
pub mod camera;
pub mod catalog;
pub mod collider;
pub mod config;
pub mod error;
pub mod input;
pub mod level;
pub mod levels;
pub mod object;
pub mod player;
pub mod spatial;
pub mod transition;

/// Scene files on disk.
pub mod loader {
    pub mod records;
    pub mod scene_store;
    pub mod settings;
}

/// Draw command building and execution.
pub mod render {
    pub mod backend;
    pub mod command;
    pub mod cull;
    pub mod parallax;
}

/// Level editor.
pub mod editor {
    pub mod draw;
    pub mod menu;
    pub mod prompt;
    pub mod state;
}

pub use assets::{AssetCache, AssetLoader, ImageHandle};
pub use catalog::{Catalog, CategoryId, Style};
pub use collider::{Collider, CollisionType};
pub use config::{AppConfig, PlayerParams};
pub use error::{AssetError, SceneError, SceneResult};
pub use level::Level;
pub use loader::scene_store::{ImportedScene, SceneStore};
pub use loader::settings::SceneSettings;
pub use object::{ObjectKind, PlacedObject};
pub use player::Player;
pub use spatial::{Cell, SceneGrid};
