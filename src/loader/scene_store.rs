//! Scene directory persistence.
//!
//! A saved scene is a directory holding three files: the tile table, the
//! collider table and the settings record. Coordinates are scene-local pixels
//! and every path is relative to the asset root.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use super::records::{
    format_coords, format_size, parse_coords, parse_size, ColliderRecord, TileRecord,
};
use super::settings::SceneSettings;
use crate::assets::{normalize, AssetCache, AssetLoader};
use crate::catalog::{Catalog, CategoryId, Style};
use crate::collider::CollisionType;
use crate::error::{SceneError, SceneResult};
use crate::object::{ObjectKind, PlacedObject};
use crate::spatial::{Cell, SceneGrid, COLLIDER_LAYER, LAYER_COUNT};

/// Tile table file name.
pub const TILES_FILE: &str = "tiles.csv";
/// Collider table file name.
pub const COLLIDERS_FILE: &str = "colliders.csv";
/// Settings record file name.
pub const SETTINGS_FILE: &str = "settings.json";

/// Everything an import yields. Nothing is applied until it succeeds.
#[derive(Debug, Clone, PartialEq)]
pub struct ImportedScene {
    /// Tiles, entities and colliders.
    pub grid: SceneGrid,
    /// Scene settings.
    pub settings: SceneSettings,
}

/// Reads and writes scene directories, resolving sprites against a catalog.
pub struct SceneStore<'c> {
    catalog: &'c Catalog,
}

/// `dir/name`, or `dir` itself when `name` is empty.
pub fn scene_dir(dir: &Path, name: &str) -> PathBuf {
    if name.is_empty() {
        dir.to_path_buf()
    } else {
        dir.join(name)
    }
}

impl<'c> SceneStore<'c> {
    /// Store resolving sprites against `catalog`.
    pub fn new(catalog: &'c Catalog) -> Self {
        SceneStore { catalog }
    }

    /// Catalog sprites are resolved against.
    pub fn catalog(&self) -> &'c Catalog {
        self.catalog
    }

    /// Writes `grid` into `dir/name/`, creating the directory if needed.
    pub fn export(
        &self,
        dir: &Path,
        name: &str,
        grid: &SceneGrid,
        settings: &SceneSettings,
    ) -> SceneResult<PathBuf> {
        if dir.as_os_str().is_empty() || name.trim().is_empty() {
            return Err(SceneError::SaveTargetUnspecified);
        }
        let target = dir.join(name);
        fs::create_dir_all(&target).map_err(|e| SceneError::io(&target, e))?;

        let mut settings = settings.clone();
        settings.tile_size = grid.tile_size();

        write_tiles(&target.join(TILES_FILE), grid)?;
        write_colliders(&target.join(COLLIDERS_FILE), grid)?;
        write_settings(&target.join(SETTINGS_FILE), &settings)?;

        info!(
            "exported {} objects to {}",
            grid.object_count(),
            target.display()
        );
        Ok(target)
    }

    /// Reads the scene at `dir/name/`. All three files must exist.
    pub fn import<L: AssetLoader>(
        &self,
        dir: &Path,
        name: &str,
        cache: &mut AssetCache<L>,
    ) -> SceneResult<ImportedScene> {
        let source = scene_dir(dir, name);
        let tiles_path = source.join(TILES_FILE);
        let colliders_path = source.join(COLLIDERS_FILE);
        let settings_path = source.join(SETTINGS_FILE);
        for path in [&tiles_path, &settings_path, &colliders_path] {
            if !path.is_file() {
                return Err(SceneError::NotFound { path: path.clone() });
            }
        }

        let settings = read_settings(&settings_path)?;
        let mut grid = SceneGrid::new(settings.tile_size);
        self.read_tiles(&tiles_path, &mut grid, cache)?;
        self.read_colliders(&colliders_path, &mut grid, cache)?;

        info!(
            "imported {} objects from {}",
            grid.object_count(),
            source.display()
        );
        Ok(ImportedScene { grid, settings })
    }

    fn read_tiles<L: AssetLoader>(
        &self,
        path: &Path,
        grid: &mut SceneGrid,
        cache: &mut AssetCache<L>,
    ) -> SceneResult<()> {
        let tile_size = grid.tile_size();
        let mut reader = csv::Reader::from_path(path).map_err(|e| SceneError::csv(path, e))?;
        for (i, row) in reader.deserialize::<TileRecord>().enumerate() {
            let row_no = i + 1;
            let rec = row.map_err(|e| SceneError::csv(path, e))?;
            if rec.layer as usize >= LAYER_COUNT {
                return Err(SceneError::invalid(path, row_no, format!("layer {} out of range", rec.layer)));
            }
            let local = parse_coords(&rec.coords).map_err(|r| SceneError::invalid(path, row_no, r))?;
            let size = parse_size(&rec.size).map_err(|r| SceneError::invalid(path, row_no, r))?;

            let image_path = normalize(&rec.image_path);
            let (category, variant) = self.locate(rec.category.map(CategoryId), &image_path);
            let kind = kind_from_flags(&rec, category.and_then(|id| self.catalog.get(id)).map(|d| d.style));
            let animation_path = rec
                .animation_path
                .as_deref()
                .map(normalize)
                .filter(|p| !p.is_empty());

            let mut obj = PlacedObject {
                category,
                variant,
                layer: rec.layer,
                cell: Cell::containing(local, tile_size),
                free_position: None,
                kind,
                image: cache.image(&image_path),
                image_path,
                animation: animation_path.as_deref().and_then(|p| cache.animation(p)),
                animation_path,
                size,
            };
            obj.set_free_position(Some(local), tile_size);
            grid.insert(obj);
        }
        Ok(())
    }

    fn read_colliders<L: AssetLoader>(
        &self,
        path: &Path,
        grid: &mut SceneGrid,
        cache: &mut AssetCache<L>,
    ) -> SceneResult<()> {
        let tile_size = grid.tile_size();
        let mut reader = csv::Reader::from_path(path).map_err(|e| SceneError::csv(path, e))?;
        for (i, row) in reader.deserialize::<ColliderRecord>().enumerate() {
            let rec = row.map_err(|e| SceneError::csv(path, e))?;
            let local = parse_coords(&rec.coords).map_err(|r| SceneError::invalid(path, i + 1, r))?;
            let image_path = normalize(&rec.image_path);
            let (category, variant) = self.locate(None, &image_path);
            let image = cache.image(&image_path);
            grid.insert_collider(PlacedObject {
                category,
                variant,
                layer: COLLIDER_LAYER,
                cell: Cell::containing(local, tile_size),
                free_position: None,
                kind: ObjectKind::Collider(CollisionType::parse(&rec.collider_type)),
                image_path,
                image,
                animation_path: None,
                animation: None,
                size: cache.size(image),
            });
        }
        Ok(())
    }

    /// Stored category first, then a directory match against the catalog.
    fn locate(&self, stored: Option<CategoryId>, image_path: &str) -> (Option<CategoryId>, usize) {
        if let Some(id) = stored.filter(|id| self.catalog.get(*id).is_some()) {
            return (Some(id), self.catalog.variant_index(id, image_path).unwrap_or(0));
        }
        match self.catalog.resolve(image_path) {
            Some((id, variant)) => (Some(id), variant),
            None => {
                debug!("{image_path} matches no catalog category");
                (None, 0)
            }
        }
    }
}

fn kind_from_flags(rec: &TileRecord, style: Option<Style>) -> ObjectKind {
    let id = rec.id.clone().filter(|s| !s.is_empty());
    if rec.is_player {
        ObjectKind::Player
    } else if rec.is_item {
        ObjectKind::Item { id: id.unwrap_or_default() }
    } else if rec.is_npc {
        ObjectKind::Npc { id }
    } else if rec.is_enemy {
        ObjectKind::Enemy { id: id.unwrap_or_default() }
    } else if rec.is_event {
        ObjectKind::Event { id: id.unwrap_or_default() }
    } else {
        match style.map(ObjectKind::for_style) {
            Some(ObjectKind::Decoration) => ObjectKind::Decoration,
            _ => ObjectKind::Terrain,
        }
    }
}

fn write_tiles(path: &Path, grid: &SceneGrid) -> SceneResult<()> {
    let tile_size = grid.tile_size();
    let mut writer = csv::Writer::from_path(path).map_err(|e| SceneError::csv(path, e))?;
    for layer in 0..LAYER_COUNT as u8 {
        for (_, obj) in grid.layer(layer) {
            let kind = &obj.kind;
            let rec = TileRecord {
                layer,
                coords: format_coords(obj.local_position(tile_size)),
                image_path: normalize(&obj.image_path),
                animation_path: obj.animation_path.as_deref().map(normalize),
                is_item: kind.is_item(),
                is_npc: kind.is_npc(),
                is_enemy: kind.is_enemy(),
                is_player: kind.is_player(),
                is_event: kind.is_event(),
                id: kind.display_id().map(str::to_owned),
                size: format_size(obj.size),
                category: obj.category.map(|c| c.0),
            };
            writer.serialize(rec).map_err(|e| SceneError::csv(path, e))?;
        }
    }
    writer.flush().map_err(|e| SceneError::io(path, e))
}

fn write_colliders(path: &Path, grid: &SceneGrid) -> SceneResult<()> {
    let tile_size = grid.tile_size();
    let mut writer = csv::Writer::from_path(path).map_err(|e| SceneError::csv(path, e))?;
    for (cell, obj) in grid.colliders() {
        let rec = ColliderRecord {
            coords: format_coords(cell.local_pixel(tile_size)),
            image_path: normalize(&obj.image_path),
            collider_type: obj.kind.collision_type().unwrap_or_default().to_string(),
        };
        writer.serialize(rec).map_err(|e| SceneError::csv(path, e))?;
    }
    writer.flush().map_err(|e| SceneError::io(path, e))
}

fn write_settings(path: &Path, settings: &SceneSettings) -> SceneResult<()> {
    let json = serde_json::to_string_pretty(settings).map_err(|source| SceneError::Json {
        path: path.to_path_buf(),
        source,
    })?;
    fs::write(path, json).map_err(|e| SceneError::io(path, e))
}

fn read_settings(path: &Path) -> SceneResult<SceneSettings> {
    let txt = fs::read_to_string(path).map_err(|e| SceneError::io(path, e))?;
    serde_json::from_str(&txt).map_err(|source| SceneError::Json {
        path: path.to_path_buf(),
        source,
    })
}
