//! Table of placeable categories.
//!
//! Loaded once at startup and shared by reference with the scene store and
//! the editor. Each category names a sprite directory; its variants are the
//! `.png` files found there, ordered by file name.

use std::fmt;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::assets::{list_frames, normalize};

/// Index of a category in the [`Catalog`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CategoryId(pub u16);

impl fmt::Display for CategoryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Default behaviour of objects placed from a category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Style {
    /// One-sided tile colliders.
    Collider,
    /// Named trigger areas.
    Event,
    /// The spawn marker.
    Player,
    /// Clouds.
    Sky,
    /// Playfield tiles.
    Terrain,
    /// Non-player characters.
    Npc,
    /// Pickups.
    Item,
    /// Hostiles.
    Enemy,
}

/// One category: a sprite directory and how its objects behave.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryDef {
    /// Kind given to objects placed from this category.
    pub style: Style,
    /// Menu group; categories sharing a group share one menu button.
    pub menu: String,
    /// Directory holding the variant sprites, relative to the asset root.
    pub sprite_dir: String,
    /// Frame directory for animated categories.
    #[serde(default)]
    pub animation_dir: Option<String>,
    /// Variant file names, sorted.
    #[serde(default)]
    pub variants: Vec<String>,
}

impl CategoryDef {
    fn new(style: Style, menu: &str, sprite_dir: &str, animation_dir: Option<&str>) -> Self {
        CategoryDef {
            style,
            menu: menu.to_owned(),
            sprite_dir: sprite_dir.to_owned(),
            animation_dir: animation_dir.map(str::to_owned),
            variants: Vec::new(),
        }
    }
}

/// One button of the editor menu: a group name and the categories it cycles through.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MenuGroup {
    /// Button label.
    pub name: String,
    /// Categories the button cycles through, in catalog order.
    pub categories: Vec<CategoryId>,
}

/// Ordered category table; a [`CategoryId`] is an index into it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Catalog {
    categories: Vec<CategoryDef>,
}

const GRAPHICS: &str = "assets/graphics";

impl Catalog {
    /// Catalog over an explicit table.
    pub fn new(categories: Vec<CategoryDef>) -> Self {
        Catalog { categories }
    }

    /// The stock category table. Variant lists are empty until [`Catalog::scan`].
    pub fn builtin() -> Self {
        use Style::*;
        let tiles = |name: &str| format!("{GRAPHICS}/tiles/{name}");
        let player_idle = format!("{GRAPHICS}/player/idle");
        let water_anim = tiles("water/animation");
        let categories = vec![
            CategoryDef::new(Collider, "collider", &format!("{GRAPHICS}/colliders"), None),
            CategoryDef::new(Event, "event", &format!("{GRAPHICS}/events"), None),
            CategoryDef::new(Player, "player", &player_idle, Some(&player_idle)),
            CategoryDef::new(Sky, "sky", &format!("{GRAPHICS}/clouds"), None),
            CategoryDef::new(Terrain, "terrain", &tiles("land"), None),
            CategoryDef::new(Terrain, "water", &tiles("water"), Some(&water_anim)),
            CategoryDef::new(Terrain, "water", &tiles("water"), None),
            CategoryDef::new(Npc, "npc", &player_idle, Some(&player_idle)),
            CategoryDef::new(Terrain, "boards", &tiles("boards"), None),
            CategoryDef::new(Terrain, "danger", &tiles("danger"), None),
            CategoryDef::new(Terrain, "details", &tiles("details"), None),
            CategoryDef::new(Terrain, "dirt", &tiles("dirt"), None),
            CategoryDef::new(Terrain, "dirty_grass", &tiles("dirty_grass"), None),
            CategoryDef::new(Terrain, "earth_elements", &tiles("earth_elements"), None),
            CategoryDef::new(Terrain, "earth_elements", &tiles("earth_elements"), None),
            CategoryDef::new(Terrain, "ground", &tiles("ground"), None),
            CategoryDef::new(Terrain, "mushrooms", &tiles("mushrooms"), None),
            CategoryDef::new(Terrain, "wood", &tiles("wood"), None),
            CategoryDef::new(Terrain, "background", &format!("{GRAPHICS}/backgrounds"), None),
        ];
        Catalog { categories }
    }

    /// Fills every category's variant list from its sprite directory under `root`.
    ///
    /// Missing directories leave the category without variants.
    pub fn scan(mut self, root: &Path) -> Self {
        for def in &mut self.categories {
            match list_frames(&root.join(&def.sprite_dir)) {
                Ok(names) => {
                    debug!("{}: {} variants", def.sprite_dir, names.len());
                    def.variants = names;
                }
                Err(err) => {
                    warn!("cannot scan {}: {err}", def.sprite_dir);
                    def.variants.clear();
                }
            }
        }
        self
    }

    /// Category `id`.
    pub fn get(&self, id: CategoryId) -> Option<&CategoryDef> {
        self.categories.get(id.0 as usize)
    }

    /// Categories with their ids, in catalog order.
    pub fn iter(&self) -> impl Iterator<Item = (CategoryId, &CategoryDef)> {
        self.categories
            .iter()
            .enumerate()
            .map(|(i, def)| (CategoryId(i as u16), def))
    }

    /// Number of categories.
    pub fn len(&self) -> usize {
        self.categories.len()
    }

    /// Whether the table is empty.
    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
    }

    /// Relative path of a variant sprite.
    pub fn variant_path(&self, id: CategoryId, variant: usize) -> Option<String> {
        let def = self.get(id)?;
        let name = def.variants.get(variant)?;
        Some(format!("{}/{}", def.sprite_dir, name))
    }

    /// Position of `image_path` among the variants of `id`.
    pub fn variant_index(&self, id: CategoryId, image_path: &str) -> Option<usize> {
        let def = self.get(id)?;
        let (dir, name) = split_path(image_path);
        if !dir.ends_with(normalize(&def.sprite_dir).as_str()) {
            return None;
        }
        def.variants.iter().position(|v| *v == name)
    }

    /// Finds the first category whose sprite directory contains `image_path`.
    pub fn resolve(&self, image_path: &str) -> Option<(CategoryId, usize)> {
        self.iter()
            .filter(|(_, def)| !def.sprite_dir.is_empty())
            .find_map(|(id, _)| self.variant_index(id, image_path).map(|v| (id, v)))
    }

    /// Menu groups in first-appearance order. Categories without variants
    /// are left out, and so are groups left empty by that.
    pub fn menu_groups(&self) -> Vec<MenuGroup> {
        let mut groups: Vec<MenuGroup> = Vec::new();
        for (id, def) in self.iter() {
            if def.variants.is_empty() {
                continue;
            }
            match groups.iter_mut().find(|g| g.name == def.menu) {
                Some(group) => group.categories.push(id),
                None => groups.push(MenuGroup {
                    name: def.menu.clone(),
                    categories: vec![id],
                }),
            }
        }
        groups
    }
}

fn split_path(image_path: &str) -> (String, String) {
    let normalized = normalize(image_path);
    match normalized.rsplit_once('/') {
        Some((dir, name)) => (dir.to_owned(), name.to_owned()),
        None => (String::new(), normalized),
    }
}
