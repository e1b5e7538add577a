//! A scene loaded for play.

use std::path::{Path, PathBuf};

use macroquad::prelude::{Rect, Vec2};
use rand::rngs::StdRng;
use tracing::{debug, info};

use crate::assets::{AssetCache, AssetLoader};
use crate::collider::{intersects, Collider};
use crate::error::SceneResult;
use crate::loader::scene_store::{ImportedScene, SceneStore};
use crate::loader::settings::SceneSettings;
use crate::player::{Player, PlayerSprites};
use crate::render::command::DrawCommand;
use crate::render::cull::on_screen;
use crate::render::parallax::ParallaxRenderer;
use crate::spatial::{SceneBounds, SceneGrid, COLLIDER_LAYER, GAMEPLAY_LAYERS, PLAYER_DRAW_LAYER};

/// Prefix of event ids that switch levels, e.g. `level:2`.
pub const LEVEL_EVENT_PREFIX: &str = "level:";

/// A scene prepared for play.
pub struct Level {
    path: PathBuf,
    grid: SceneGrid,
    settings: SceneSettings,
    spawn: Vec2,
    bounds: SceneBounds,
    colliders: Vec<Collider>,
    parallax: ParallaxRenderer,
    animation_clock: f32,
}

impl Level {
    /// Imports the scene stored directly in `path`.
    pub fn load<L: AssetLoader>(
        store: &SceneStore<'_>,
        path: &Path,
        cache: &mut AssetCache<L>,
        screen: Vec2,
        rng: StdRng,
    ) -> SceneResult<Self> {
        let ImportedScene { grid, settings } = store.import(path, "", cache)?;
        Ok(Self::from_scene(path, grid, settings, screen, rng))
    }

    /// Consumes the spawn marker, then derives bounds, colliders and the
    /// parallax layers.
    pub fn from_scene(
        path: impl Into<PathBuf>,
        mut grid: SceneGrid,
        settings: SceneSettings,
        screen: Vec2,
        rng: StdRng,
    ) -> Self {
        let path = path.into();
        let spawn = grid.extract_spawn(screen / 2.0);
        let bounds = grid.compute_bounds();
        let colliders = grid.runtime_colliders();
        let parallax = ParallaxRenderer::new(&grid, bounds, settings.palette(), screen, rng);
        info!(
            "level {} ready: {} colliders, bounds {}..{}",
            path.display(),
            colliders.len(),
            bounds.start,
            bounds.end
        );
        Level {
            path,
            grid,
            settings,
            spawn,
            bounds,
            colliders,
            parallax,
            animation_clock: 0.0,
        }
    }

    /// Scene directory.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Remaining objects, spawn marker removed.
    pub fn grid(&self) -> &SceneGrid {
        &self.grid
    }

    /// Scene settings.
    pub fn settings(&self) -> &SceneSettings {
        &self.settings
    }

    /// Player start, top-left.
    pub fn spawn(&self) -> Vec2 {
        self.spawn
    }

    /// Horizontal extent of the playfield.
    pub fn bounds(&self) -> SceneBounds {
        self.bounds
    }

    /// Colliders the player is tested against.
    pub fn colliders(&self) -> &[Collider] {
        &self.colliders
    }

    /// Outer layer renderer.
    pub fn parallax(&self) -> &ParallaxRenderer {
        &self.parallax
    }

    /// Advances the shared animation clock.
    pub fn advance(&mut self, dt: f32) {
        self.animation_clock += self.settings.animation_speed * dt;
    }

    /// Shared frame counter for every animated object.
    pub fn animation_index(&self) -> usize {
        self.animation_clock.max(0.0) as usize
    }

    /// Back parallax, gameplay layers with the player after layer 10, then
    /// front parallax. `camera` is the viewport offset.
    pub fn draw<L: AssetLoader>(
        &mut self,
        camera: Vec2,
        screen: Vec2,
        player: &Player,
        sprites: &PlayerSprites,
        cache: &AssetCache<L>,
        out: &mut Vec<DrawCommand>,
    ) {
        let index = self.animation_index();
        self.parallax.draw_back(camera, index, cache, out);

        let ts = self.grid.tile_size();
        for layer in GAMEPLAY_LAYERS {
            for (_, obj) in self.grid.layer(layer) {
                let pos = obj.local_position(ts) + camera;
                if on_screen(pos, obj.size, screen) {
                    out.push(DrawCommand::sprite(obj.frame_image(cache, index), pos));
                }
            }
            if layer == PLAYER_DRAW_LAYER {
                player.draw(sprites, cache, camera, out);
            }
        }

        self.parallax.draw_front(camera, index, cache, out);
    }

    /// Level number of the first `level:<n>` event the player overlaps.
    pub fn triggered_switch(&self, player: &Rect) -> Option<u32> {
        let ts = self.grid.tile_size();
        self.grid.layer(COLLIDER_LAYER).find_map(|(_, obj)| {
            let target = obj.kind.display_id()?.strip_prefix(LEVEL_EVENT_PREFIX)?;
            if !obj.kind.is_event() || !intersects(&obj.local_rect(ts), player) {
                return None;
            }
            match target.trim().parse() {
                Ok(n) => Some(n),
                Err(_) => {
                    debug!("ignoring malformed level event {target:?}");
                    None
                }
            }
        })
    }
}
