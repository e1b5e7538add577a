//! Objects placed on the scene grid.

use macroquad::prelude::{Rect, Vec2};

use crate::assets::{AnimationHandle, AssetCache, AssetLoader, ImageHandle};
use crate::catalog::{CategoryId, Style};
use crate::collider::CollisionType;
use crate::spatial::Cell;

/// What an object is, and the payload that kind carries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ObjectKind {
    /// Plain playfield tile.
    Terrain,
    /// Scenery with no gameplay role, e.g. clouds.
    Decoration,
    /// The spawn marker. Consumed when a scene is loaded for play.
    Player,
    /// Pickup.
    Item {
        /// Item name.
        id: String,
    },
    /// Non-player character.
    Npc {
        /// Non-canonical NPCs carry no name.
        id: Option<String>,
    },
    /// Hostile character.
    Enemy {
        /// Enemy name.
        id: String,
    },
    /// Trigger area, e.g. `level:2`.
    Event {
        /// Event name.
        id: String,
    },
    /// One-sided tile collider with its solid sides.
    Collider(CollisionType),
}

impl ObjectKind {
    /// Kind given to a plain placement from a category of this style.
    ///
    /// Named kinds start with an empty id; the editor fills it in.
    pub fn for_style(style: Style) -> Self {
        match style {
            Style::Collider => ObjectKind::Collider(CollisionType::default()),
            Style::Event => ObjectKind::Event { id: String::new() },
            Style::Player => ObjectKind::Player,
            Style::Sky => ObjectKind::Decoration,
            Style::Terrain => ObjectKind::Terrain,
            Style::Npc => ObjectKind::Npc { id: None },
            Style::Item => ObjectKind::Item { id: String::new() },
            Style::Enemy => ObjectKind::Enemy { id: String::new() },
        }
    }

    /// Whether this is an [`ObjectKind::Item`].
    pub fn is_item(&self) -> bool {
        matches!(self, ObjectKind::Item { .. })
    }

    /// Whether this is an [`ObjectKind::Npc`].
    pub fn is_npc(&self) -> bool {
        matches!(self, ObjectKind::Npc { .. })
    }

    /// Whether this is an [`ObjectKind::Enemy`].
    pub fn is_enemy(&self) -> bool {
        matches!(self, ObjectKind::Enemy { .. })
    }

    /// Whether this is the spawn marker.
    pub fn is_player(&self) -> bool {
        matches!(self, ObjectKind::Player)
    }

    /// Whether this is an [`ObjectKind::Event`].
    pub fn is_event(&self) -> bool {
        matches!(self, ObjectKind::Event { .. })
    }

    /// Whether placing this kind pins the object to the collider layer.
    pub fn is_entity(&self) -> bool {
        !matches!(self, ObjectKind::Terrain | ObjectKind::Decoration)
    }

    /// Name shown in the editor and written to the `id` column.
    pub fn display_id(&self) -> Option<&str> {
        match self {
            ObjectKind::Item { id } | ObjectKind::Enemy { id } | ObjectKind::Event { id } => {
                Some(id.as_str())
            }
            ObjectKind::Npc { id } => id.as_deref(),
            _ => None,
        }
    }

    /// Solid sides, for colliders only.
    pub fn collision_type(&self) -> Option<CollisionType> {
        match self {
            ObjectKind::Collider(ct) => Some(*ct),
            _ => None,
        }
    }
}

/// An object occupying one cell of one layer.
#[derive(Debug, Clone, PartialEq)]
pub struct PlacedObject {
    /// `None` when the sprite matched no catalog category.
    pub category: Option<CategoryId>,
    /// Index into the category's variant list.
    pub variant: usize,
    /// Layer the object lives on, `0..15`.
    pub layer: u8,
    /// Storage key within the layer.
    pub cell: Cell,
    /// Exact scene-local pixel offset. When set it wins over `cell` for
    /// rendering.
    pub free_position: Option<Vec2>,
    /// What the object is.
    pub kind: ObjectKind,
    /// Sprite path relative to the asset root.
    pub image_path: String,
    /// Decoded sprite.
    pub image: ImageHandle,
    /// Frame directory relative to the asset root, for animated objects.
    pub animation_path: Option<String>,
    /// Decoded frame sequence.
    pub animation: Option<AnimationHandle>,
    /// Sprite size in pixels.
    pub size: (u32, u32),
}

impl PlacedObject {
    /// Scene-local top-left pixel.
    pub fn local_position(&self, tile_size: u32) -> Vec2 {
        self.free_position
            .unwrap_or_else(|| self.cell.local_pixel(tile_size))
    }

    /// Sets a free position; offsets that coincide with the cell corner are
    /// stored as grid placements.
    pub fn set_free_position(&mut self, local: Option<Vec2>, tile_size: u32) {
        self.free_position = local.filter(|p| *p != self.cell.local_pixel(tile_size));
    }

    /// Scene-local bounding rect.
    pub fn local_rect(&self, tile_size: u32) -> Rect {
        let p = self.local_position(tile_size);
        Rect::new(p.x, p.y, self.size.0 as f32, self.size.1 as f32)
    }

    /// Frame to draw for the shared animation counter `index`.
    pub fn frame_image<L: AssetLoader>(&self, cache: &AssetCache<L>, index: usize) -> ImageHandle {
        self.animation
            .and_then(|anim| cache.frame(anim, index))
            .unwrap_or(self.image)
    }

    /// Two placements are the same when they came from the same catalog
    /// entry and, for colliders, have the same solid sides.
    pub fn same_placement(&self, category: Option<CategoryId>, variant: usize, kind: &ObjectKind) -> bool {
        self.category == category
            && self.variant == variant
            && self.kind.collision_type() == kind.collision_type()
    }
}
