//! Layered scene storage.

use std::collections::BTreeMap;
use std::ops::RangeInclusive;

use macroquad::prelude::Vec2;
use tracing::{debug, warn};

use super::cell::{cell_to_pixel, free_pixel, pixel_to_cell, Cell};
use crate::collider::Collider;
use crate::object::PlacedObject;

/// Number of layers in a scene.
pub const LAYER_COUNT: usize = 15;
/// Clouds.
pub const SKY_LAYER: u8 = 1;
/// Repeating background strips, far to near.
pub const BACKGROUND_LAYERS: [u8; 2] = [2, 3];
/// Playfield layers, drawn in order.
pub const GAMEPLAY_LAYERS: RangeInclusive<u8> = 4..=12;
/// Repeating foreground strips, near to nearest.
pub const FOREGROUND_LAYERS: [u8; 2] = [13, 14];
/// Colliders, the spawn marker and other entities live here.
pub const COLLIDER_LAYER: u8 = 9;
/// The player is drawn right after this layer.
pub const PLAYER_DRAW_LAYER: u8 = 10;
/// Layers that define the playable width.
pub const BOUNDS_LAYERS: RangeInclusive<u8> = 3..=12;

/// Horizontal extent of a scene in scene-local pixels.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct SceneBounds {
    /// Leftmost scene-local x.
    pub start: f32,
    /// Rightmost scene-local x.
    pub end: f32,
}

impl SceneBounds {
    /// Extent from `start` to `end`.
    pub fn new(start: f32, end: f32) -> Self {
        SceneBounds { start, end }
    }

    /// `end - start`.
    pub fn width(&self) -> f32 {
        self.end - self.start
    }

    /// Whether the extent has no width.
    pub fn is_empty(&self) -> bool {
        self.width() <= 0.0
    }
}

/// Sparse layered map of placed objects plus the collider map.
#[derive(Debug, Clone, PartialEq)]
pub struct SceneGrid {
    tile_size: u32,
    origin: Vec2,
    layers: Vec<BTreeMap<Cell, PlacedObject>>,
    colliders: BTreeMap<Cell, PlacedObject>,
}

impl SceneGrid {
    /// Empty grid with square cells of `tile_size` pixels.
    pub fn new(tile_size: u32) -> Self {
        SceneGrid {
            tile_size,
            origin: Vec2::ZERO,
            layers: vec![BTreeMap::new(); LAYER_COUNT],
            colliders: BTreeMap::new(),
        }
    }

    /// Cell size in pixels.
    pub fn tile_size(&self) -> u32 {
        self.tile_size
    }

    /// Screen position of cell `(0, 0)`.
    pub fn origin(&self) -> Vec2 {
        self.origin
    }

    /// Moves the scene relative to the screen.
    pub fn set_origin(&mut self, origin: Vec2) {
        self.origin = origin;
    }

    /// Screen position of a cell's top-left corner.
    #[inline]
    pub fn cell_to_pixel(&self, cell: Cell) -> Vec2 {
        cell_to_pixel(cell, self.tile_size, self.origin)
    }

    /// Cell under a screen position.
    #[inline]
    pub fn pixel_to_cell(&self, pixel: Vec2) -> Cell {
        pixel_to_cell(pixel, self.tile_size, self.origin)
    }

    /// Screen position of a scene-local pixel offset.
    #[inline]
    pub fn free_pixel(&self, local: Vec2) -> Vec2 {
        free_pixel(local, self.origin)
    }

    /// Pixel position an object renders at for the current origin.
    pub fn object_pixel(&self, obj: &PlacedObject) -> Vec2 {
        match obj.free_position {
            Some(local) => self.free_pixel(local),
            None => self.cell_to_pixel(obj.cell),
        }
    }

    /// Objects of `layer` in cell order.
    pub fn layer(&self, layer: u8) -> impl Iterator<Item = (&Cell, &PlacedObject)> {
        self.layers.get(layer as usize).into_iter().flatten()
    }

    /// Object of `layer` at `cell`.
    pub fn get(&self, layer: u8, cell: Cell) -> Option<&PlacedObject> {
        self.layers.get(layer as usize)?.get(&cell)
    }

    /// Stores `obj` under its own layer and cell, returning what it replaced.
    /// Objects on layers outside the grid are dropped.
    pub fn insert(&mut self, obj: PlacedObject) -> Option<PlacedObject> {
        let Some(layer) = self.layers.get_mut(obj.layer as usize) else {
            warn!("dropping object on out-of-range layer {}", obj.layer);
            return None;
        };
        layer.insert(obj.cell, obj)
    }

    /// Removes the object of `layer` at `cell`.
    pub fn remove(&mut self, layer: u8, cell: Cell) -> Option<PlacedObject> {
        self.layers.get_mut(layer as usize)?.remove(&cell)
    }

    /// Collider at `cell`.
    pub fn collider(&self, cell: Cell) -> Option<&PlacedObject> {
        self.colliders.get(&cell)
    }

    /// Colliders in cell order.
    pub fn colliders(&self) -> impl Iterator<Item = (&Cell, &PlacedObject)> {
        self.colliders.iter()
    }

    /// Stores a collider under its cell, returning what it replaced.
    pub fn insert_collider(&mut self, obj: PlacedObject) -> Option<PlacedObject> {
        self.colliders.insert(obj.cell, obj)
    }

    /// Removes the collider at `cell`.
    pub fn remove_collider(&mut self, cell: Cell) -> Option<PlacedObject> {
        self.colliders.remove(&cell)
    }

    /// Tiles plus colliders.
    pub fn object_count(&self) -> usize {
        self.layers.iter().map(BTreeMap::len).sum::<usize>() + self.colliders.len()
    }

    /// Whether the grid holds nothing.
    pub fn is_empty(&self) -> bool {
        self.object_count() == 0
    }

    /// Removes every object and collider.
    pub fn clear(&mut self) {
        self.layers.iter_mut().for_each(BTreeMap::clear);
        self.colliders.clear();
    }

    /// Removes the spawn marker from the collider layer and makes its
    /// position the scene origin. Without one, `default` becomes the origin.
    pub fn extract_spawn(&mut self, default: Vec2) -> Vec2 {
        let spawn = self
            .layer(COLLIDER_LAYER)
            .find(|(_, obj)| obj.kind.is_player())
            .map(|(cell, _)| *cell);

        let origin = match spawn.and_then(|cell| self.remove(COLLIDER_LAYER, cell)) {
            Some(obj) => {
                let origin = obj.local_position(self.tile_size);
                debug!("spawn found at {origin}");
                origin
            }
            None => {
                warn!("scene has no player spawn, using {default}");
                default
            }
        };
        self.origin = origin;
        origin
    }

    /// Min left edge and max right edge over layers 3..=12, relative to the origin.
    pub fn compute_bounds(&self) -> SceneBounds {
        let mut extent: Option<(f32, f32)> = None;
        for layer in BOUNDS_LAYERS {
            for (_, obj) in self.layer(layer) {
                let x = self.object_pixel(obj).x;
                let right = x + obj.size.0 as f32;
                extent = Some(match extent {
                    Some((lo, hi)) => (lo.min(x), hi.max(right)),
                    None => (x, right),
                });
            }
        }
        match extent {
            Some((lo, hi)) => SceneBounds::new(lo - self.origin.x, hi - self.origin.x),
            None => SceneBounds::default(),
        }
    }

    /// Static obstacles in scene-local pixels, one per collider cell.
    pub fn runtime_colliders(&self) -> Vec<Collider> {
        let size = self.tile_size as f32;
        self.colliders
            .values()
            .filter_map(|obj| {
                let ct = obj.kind.collision_type()?;
                Some(Collider::new(obj.local_position(self.tile_size), size, ct))
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assets::ImageHandle;
    use crate::collider::CollisionType;
    use crate::object::ObjectKind;
    use macroquad::prelude::vec2;

    fn placed(layer: u8, cell: Cell, kind: ObjectKind, size: (u32, u32)) -> PlacedObject {
        PlacedObject {
            category: None,
            variant: 0,
            layer,
            cell,
            free_position: None,
            kind,
            image_path: String::new(),
            image: ImageHandle(0),
            animation_path: None,
            animation: None,
            size,
        }
    }

    #[test]
    fn spawn_is_consumed_once() {
        let mut grid = SceneGrid::new(64);
        grid.insert(placed(COLLIDER_LAYER, Cell::new(3, 2), ObjectKind::Player, (64, 64)));
        assert_eq!(grid.extract_spawn(Vec2::ZERO), vec2(192.0, 128.0));
        assert_eq!(grid.origin(), vec2(192.0, 128.0));
        assert_eq!(grid.object_count(), 0);
        assert_eq!(grid.extract_spawn(vec2(640.0, 360.0)), vec2(640.0, 360.0));
    }

    #[test]
    fn bounds_cover_layers_three_to_twelve() {
        let mut grid = SceneGrid::new(64);
        grid.insert(placed(3, Cell::new(-2, 0), ObjectKind::Terrain, (64, 64)));
        grid.insert(placed(12, Cell::new(5, 0), ObjectKind::Terrain, (100, 64)));
        // outside the bounds band
        grid.insert(placed(13, Cell::new(40, 0), ObjectKind::Terrain, (64, 64)));
        grid.set_origin(vec2(500.0, 0.0));

        let bounds = grid.compute_bounds();
        assert_eq!(bounds, SceneBounds::new(-128.0, 420.0));
        assert_eq!(bounds.width(), 548.0);
    }

    #[test]
    fn empty_scene_has_zero_bounds() {
        assert_eq!(SceneGrid::new(64).compute_bounds(), SceneBounds::new(0.0, 0.0));
    }

    #[test]
    fn colliders_become_edge_sets() {
        let mut grid = SceneGrid::new(64);
        let kind = ObjectKind::Collider(CollisionType::parse("u"));
        grid.insert_collider(placed(COLLIDER_LAYER, Cell::new(2, 5), kind, (64, 64)));
        let colliders = grid.runtime_colliders();
        assert_eq!(colliders.len(), 1);
        assert_eq!(colliders[0].top(), 320.0);
        assert_eq!(colliders[0].left(), 128.0);
    }
}
