//! Editor authoring state: placement, erasing, panning and the project
//! lifecycle (save, save as, open, new).

use std::path::{Path, PathBuf};

use macroquad::prelude::{vec2, KeyCode, Rect, Vec2};
use tracing::{debug, info, warn};

use super::menu::{MenuLayout, MenuPager};
use super::prompt::UserPrompt;
use crate::assets::{AssetCache, AssetLoader};
use crate::catalog::Catalog;
use crate::collider::CollisionType;
use crate::config::AppConfig;
use crate::input::InputSource;
use crate::loader::scene_store::SceneStore;
use crate::loader::settings::SceneSettings;
use crate::object::{ObjectKind, PlacedObject};
use crate::spatial::{SceneGrid, COLLIDER_LAYER, LAYER_COUNT};

/// Name of a scene that was never saved.
pub const DEFAULT_SCENE_NAME: &str = "New scene";
/// Side of a toolbar button in pixels.
pub const TOOLBAR_BUTTON_SIZE: f32 = 32.0;
/// Pixels panned per wheel notch.
const WHEEL_PAN: f32 = 50.0;

/// Buttons of the editor toolbar, left to right.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToolbarAction {
    /// Save to the current target.
    Save,
    /// Save under a new name.
    SaveAs,
    /// Start an empty scene.
    NewProject,
    /// Load a saved scene.
    Open,
}

impl ToolbarAction {
    /// Every button, in display order.
    pub const ALL: [ToolbarAction; 4] = [
        ToolbarAction::Save,
        ToolbarAction::SaveAs,
        ToolbarAction::NewProject,
        ToolbarAction::Open,
    ];

    /// Screen rect of the button.
    pub fn rect(self, margin: f32) -> Rect {
        let i = self as usize as f32;
        Rect::new(
            margin * (i + 1.0) + TOOLBAR_BUTTON_SIZE * i,
            margin,
            TOOLBAR_BUTTON_SIZE,
            TOOLBAR_BUTTON_SIZE,
        )
    }

    /// Button sprite, plain or hovered.
    pub fn image_path(self, hovered: bool) -> String {
        let stem = match self {
            ToolbarAction::Save => "save_button",
            ToolbarAction::SaveAs => "save_as_button",
            ToolbarAction::NewProject => "new_file_button",
            ToolbarAction::Open => "open_folder_button",
        };
        format!("assets/editor/buttons/{stem}_{}.png", hovered as u8)
    }
}

/// Level editor state: the scene being edited plus menu, layer and save target.
pub struct Editor<'c> {
    store: SceneStore<'c>,
    grid: SceneGrid,
    settings: SceneSettings,
    defaults: SceneSettings,
    menu: MenuPager,
    layer: u8,
    screen: Vec2,
    toolbar_margin: f32,
    start_dir: PathBuf,
    pan_anchor: Option<Vec2>,
    save_dir: Option<PathBuf>,
    name: String,
    saved_count: usize,
    animation_clock: f32,
}

impl<'c> Editor<'c> {
    /// Empty scene centred on screen.
    pub fn new(catalog: &'c Catalog, config: &AppConfig) -> Self {
        let (w, h) = config.screen_size();
        let screen = vec2(w, h);
        let defaults = config.new_scene_settings();
        let layout = MenuLayout::new(screen, config.tile_size as f32, config.menu_margin);
        let mut grid = SceneGrid::new(defaults.tile_size);
        grid.set_origin(screen / 2.0);
        Editor {
            store: SceneStore::new(catalog),
            grid,
            settings: defaults.clone(),
            defaults,
            menu: MenuPager::new(catalog, layout),
            layer: COLLIDER_LAYER,
            screen,
            toolbar_margin: config.menu_margin,
            start_dir: config.editor_save_dir.clone(),
            pan_anchor: None,
            save_dir: None,
            name: DEFAULT_SCENE_NAME.to_owned(),
            saved_count: 0,
            animation_clock: 0.0,
        }
    }

    /// Category table.
    pub fn catalog(&self) -> &'c Catalog {
        self.store.catalog()
    }

    /// Scene being edited.
    pub fn grid(&self) -> &SceneGrid {
        &self.grid
    }

    /// Settings saved with the scene.
    pub fn settings(&self) -> &SceneSettings {
        &self.settings
    }

    /// Menu pager.
    pub fn menu(&self) -> &MenuPager {
        &self.menu
    }

    /// Menu pager, mutably.
    pub fn menu_mut(&mut self) -> &mut MenuPager {
        &mut self.menu
    }

    /// Active layer.
    pub fn layer(&self) -> u8 {
        self.layer
    }

    /// Sets the active layer, clamped to the valid range.
    pub fn set_layer(&mut self, layer: i32) {
        self.layer = layer.clamp(0, LAYER_COUNT as i32 - 1) as u8;
    }

    /// Screen position of the scene origin.
    pub fn origin(&self) -> Vec2 {
        self.grid.origin()
    }

    /// Window size.
    pub fn screen(&self) -> Vec2 {
        self.screen
    }

    /// Space around toolbar buttons.
    pub fn toolbar_margin(&self) -> f32 {
        self.toolbar_margin
    }

    /// Scene name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Directory the scene is saved into, once chosen.
    pub fn save_dir(&self) -> Option<&Path> {
        self.save_dir.as_deref()
    }

    /// Shared frame counter for animated objects.
    pub fn animation_index(&self) -> usize {
        self.animation_clock.max(0.0) as usize
    }

    /// Unsaved changes: the object count differs from the last save.
    pub fn is_dirty(&self) -> bool {
        self.grid.object_count() != self.saved_count
    }

    /// Window title, starred while dirty.
    pub fn title(&self) -> String {
        let star = if self.is_dirty() { "*" } else { "" };
        format!("{}{star} - Editor", self.name)
    }

    /// Places the active menu selection at screen position `pos`.
    ///
    /// With `free` the object keeps its exact pixel offset instead of
    /// snapping to the cell. Returns whether the scene changed.
    pub fn place_at<L: AssetLoader>(
        &mut self,
        pos: Vec2,
        free: bool,
        prompt: &mut impl UserPrompt,
        cache: &mut AssetCache<L>,
    ) -> bool {
        let catalog = self.store.catalog();
        let Some(id) = self.menu.active_category() else {
            return false;
        };
        let Some(def) = catalog.get(id) else {
            return false;
        };
        let variant = self.menu.active_variant();
        let Some(image_path) = catalog.variant_path(id, variant) else {
            warn!("category {id} has no variant {variant}");
            return false;
        };

        let cell = self.grid.pixel_to_cell(pos);
        let mut kind = ObjectKind::for_style(def.style);
        if kind.collision_type().is_some() {
            kind = ObjectKind::Collider(CollisionType::from_sprite_name(&image_path));
        }
        let is_collider = kind.collision_type().is_some();
        let layer = if kind.is_entity() { COLLIDER_LAYER } else { self.layer };

        let existing = if is_collider {
            self.grid.collider(cell)
        } else {
            self.grid.get(layer, cell)
        };
        if existing.is_some_and(|obj| obj.same_placement(Some(id), variant, &kind)) {
            return false;
        }

        let kind = match kind {
            ObjectKind::Item { .. } => ObjectKind::Item {
                id: ask_name(prompt, "Item name", "Enter the item name:"),
            },
            ObjectKind::Enemy { .. } => ObjectKind::Enemy {
                id: ask_name(prompt, "Enemy name", "Enter the enemy name:"),
            },
            ObjectKind::Event { .. } => ObjectKind::Event {
                id: ask_name(prompt, "Event name", "Enter the event name:"),
            },
            ObjectKind::Npc { .. } => {
                let id = if prompt.confirm("Canonical character", "Is this a canonical character?") {
                    prompt.ask_text("NPC name", "Enter the NPC name:")
                } else {
                    None
                };
                ObjectKind::Npc { id }
            }
            other => other,
        };

        let image = cache.image(&image_path);
        let animation = def.animation_dir.as_deref().and_then(|dir| cache.animation(dir));
        let mut obj = PlacedObject {
            category: Some(id),
            variant,
            layer,
            cell,
            free_position: None,
            kind,
            image_path,
            image,
            animation_path: def.animation_dir.clone().filter(|_| animation.is_some()),
            animation,
            size: cache.size(image),
        };

        if is_collider {
            debug!("collider {} at {cell:?}", obj.kind.collision_type().unwrap_or_default());
            self.grid.insert_collider(obj);
            return true;
        }

        if free {
            let ts = self.grid.tile_size();
            obj.set_free_position(Some(pos - self.grid.origin()), ts);
        }
        if obj.kind.is_player() {
            self.remove_spawn();
        }
        self.grid.insert(obj);
        true
    }

    fn remove_spawn(&mut self) {
        let spawn = self
            .grid
            .layer(COLLIDER_LAYER)
            .find(|(_, obj)| obj.kind.is_player())
            .map(|(cell, _)| *cell);
        if let Some(cell) = spawn {
            debug!("moving spawn away from {cell:?}");
            self.grid.remove(COLLIDER_LAYER, cell);
        }
    }

    /// Removes whatever the active layer holds at `pos`, plus the collider
    /// there when the active layer is the collider layer.
    pub fn erase_at(&mut self, pos: Vec2) -> bool {
        let cell = self.grid.pixel_to_cell(pos);
        let mut removed = self.grid.remove(self.layer, cell).is_some();
        if self.layer == COLLIDER_LAYER {
            removed |= self.grid.remove_collider(cell).is_some();
        }
        removed
    }

    /// Writes the scene, asking for a target first when there is none yet
    /// or `save_as` is set. Clean scenes are only rewritten by save-as.
    pub fn save(&mut self, save_as: bool, prompt: &mut impl UserPrompt) -> bool {
        if self.save_dir.is_none() || save_as {
            let start = self.save_dir.clone().unwrap_or_else(|| self.start_dir.clone());
            match prompt.pick_save_target(&start) {
                Some((dir, name)) => {
                    self.save_dir = Some(dir);
                    self.name = name;
                }
                None => return false,
            }
        }
        if !self.is_dirty() && !save_as {
            debug!("nothing to save");
            return true;
        }

        let Some(dir) = self.save_dir.as_deref() else {
            prompt.show_error("Save", "No directory or scene name chosen.");
            return false;
        };
        match self.store.export(dir, &self.name, &self.grid, &self.settings) {
            Ok(path) => {
                self.saved_count = self.grid.object_count();
                info!("saved scene to {}", path.display());
                true
            }
            Err(e) => {
                prompt.show_error("Save failed", &e.to_string());
                false
            }
        }
    }

    /// Offers to save unsaved work, then asks whether to leave the scene.
    pub fn confirm_discard(&mut self, prompt: &mut impl UserPrompt) -> bool {
        if !self.is_dirty() {
            return true;
        }
        if prompt.confirm("Save project", "Save changes to the current scene?") {
            self.save(false, prompt);
        }
        prompt.confirm("Close project", "Leave the current scene?")
    }

    /// Clears the scene after confirming any unsaved work is discarded.
    pub fn new_project(&mut self, prompt: &mut impl UserPrompt) -> bool {
        if !self.confirm_discard(prompt) {
            return false;
        }
        self.reset(SceneGrid::new(self.defaults.tile_size), self.defaults.clone());
        self.save_dir = None;
        self.name = DEFAULT_SCENE_NAME.to_owned();
        self.saved_count = 0;
        info!("new project");
        true
    }

    /// Opens a scene folder. On failure the current scene is left as it was.
    pub fn open<L: AssetLoader>(&mut self, prompt: &mut impl UserPrompt, cache: &mut AssetCache<L>) -> bool {
        if !self.confirm_discard(prompt) {
            return false;
        }
        let start = self.save_dir.clone().unwrap_or_else(|| self.start_dir.clone());
        let Some(folder) = prompt.pick_directory("Open scene folder", &start) else {
            prompt.show_error("Open", "No scene folder chosen.");
            return false;
        };
        let name = folder
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        let dir = folder.parent().map(Path::to_path_buf).unwrap_or_default();

        match self.store.import(&dir, &name, cache) {
            Ok(scene) => {
                self.reset(scene.grid, scene.settings);
                self.saved_count = self.grid.object_count();
                self.save_dir = Some(dir);
                self.name = name;
                true
            }
            Err(e) => {
                prompt.show_error("Open failed", &e.to_string());
                false
            }
        }
    }

    fn reset(&mut self, mut grid: SceneGrid, settings: SceneSettings) {
        grid.set_origin(self.screen / 2.0);
        self.grid = grid;
        self.settings = settings;
        self.layer = COLLIDER_LAYER;
        self.pan_anchor = None;
        self.animation_clock = 0.0;
    }

    /// Toolbar button under `pos`.
    pub fn toolbar_hit(&self, pos: Vec2) -> Option<ToolbarAction> {
        ToolbarAction::ALL
            .into_iter()
            .find(|a| a.rect(self.toolbar_margin).contains(pos))
    }

    /// Runs a toolbar button.
    pub fn run_action<L: AssetLoader>(
        &mut self,
        action: ToolbarAction,
        prompt: &mut impl UserPrompt,
        cache: &mut AssetCache<L>,
    ) {
        match action {
            ToolbarAction::Save => {
                self.save(false, prompt);
            }
            ToolbarAction::SaveAs => {
                self.save(true, prompt);
            }
            ToolbarAction::NewProject => {
                self.new_project(prompt);
            }
            ToolbarAction::Open => {
                self.open(prompt, cache);
            }
        }
    }

    /// One frame of input handling.
    pub fn update<L: AssetLoader>(
        &mut self,
        input: &impl InputSource,
        prompt: &mut impl UserPrompt,
        cache: &mut AssetCache<L>,
        dt: f32,
    ) {
        self.animation_clock += self.settings.animation_speed * dt;

        let mouse = input.mouse_position();
        let held = input.mouse_buttons();
        let pressed = input.mouse_pressed();
        let ctrl = input.ctrl_down();
        let over_menu = self.menu.contains(mouse);

        self.pan(mouse, held[1], pressed[1] && !over_menu, input.wheel(), ctrl);

        if let Some(action) = self.toolbar_hit(mouse) {
            if pressed[0] {
                self.run_action(action, prompt, cache);
            }
        } else if over_menu {
            if pressed.iter().any(|&p| p) {
                let catalog = self.store.catalog();
                self.menu.click(mouse, pressed, catalog);
            }
        } else if held[0] {
            self.place_at(mouse, ctrl, prompt, cache);
        } else if held[2] {
            self.erase_at(mouse);
        }

        self.hotkeys(input, prompt);
    }

    fn pan(&mut self, mouse: Vec2, middle_held: bool, start: bool, wheel: f32, ctrl: bool) {
        let mut origin = self.grid.origin();
        if start {
            self.pan_anchor = Some(mouse - origin);
        }
        if !middle_held {
            self.pan_anchor = None;
        }
        if wheel != 0.0 {
            if ctrl {
                origin.y -= wheel * WHEEL_PAN;
            } else {
                origin.x -= wheel * WHEEL_PAN;
            }
        }
        if let Some(anchor) = self.pan_anchor {
            origin = mouse - anchor;
        }
        self.grid.set_origin(origin);
    }

    fn hotkeys(&mut self, input: &impl InputSource, prompt: &mut impl UserPrompt) {
        let catalog = self.store.catalog();
        if input.ctrl_down() && input.key_pressed(KeyCode::S) {
            self.save(false, prompt);
        }
        if input.key_pressed(KeyCode::Up) {
            self.menu.step_page(true, catalog);
        } else if input.key_pressed(KeyCode::Down) {
            self.menu.step_page(false, catalog);
        }
        if input.key_pressed(KeyCode::Right) {
            self.menu.step_selection(true, catalog);
        } else if input.key_pressed(KeyCode::Left) {
            self.menu.step_selection(false, catalog);
        }
        if input.key_pressed(KeyCode::I) {
            self.set_layer(self.layer as i32 + 1);
        } else if input.key_pressed(KeyCode::O) {
            self.set_layer(self.layer as i32 - 1);
        }
    }
}

fn ask_name(prompt: &mut impl UserPrompt, title: &str, message: &str) -> String {
    prompt.ask_text(title, message).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assets::testing::FakeLoader;
    use crate::catalog::{CategoryDef, CategoryId, Style};
    use crate::editor::prompt::testing::ScriptedPrompt;

    fn catalog() -> Catalog {
        let def = |style, menu: &str, dir: &str, variants: &[&str]| CategoryDef {
            style,
            menu: menu.into(),
            sprite_dir: dir.into(),
            animation_dir: None,
            variants: variants.iter().map(|v| v.to_string()).collect(),
        };
        Catalog::new(vec![
            def(Style::Terrain, "terrain", "tiles/land", &["0.png", "1.png"]),
            def(Style::Collider, "collider", "colliders", &["lu.png", "u.png"]),
            def(Style::Player, "player", "player", &["0.png"]),
            def(Style::Npc, "npc", "npc", &["0.png"]),
        ])
    }

    fn setup(catalog: &Catalog) -> (Editor<'_>, AssetCache<FakeLoader>, tempfile::TempDir) {
        let dir = tempfile::tempdir().unwrap();
        let cache = AssetCache::new(FakeLoader::default(), dir.path());
        (Editor::new(catalog, &AppConfig::default()), cache, dir)
    }

    fn select(editor: &mut Editor<'_>, group: usize) {
        let pos = editor.menu().layout().slot_rect(group).center();
        let catalog = editor.catalog();
        editor.menu_mut().click(pos, [true, false, false], catalog);
    }

    fn pick_variant(editor: &mut Editor<'_>, group: usize, variant: usize) {
        let catalog = editor.catalog();
        let layout = *editor.menu().layout();
        let menu = editor.menu_mut();
        if menu.inner_mode() {
            menu.click(layout.slot_rect(0).center(), [false, false, true], catalog);
        }
        menu.click(layout.slot_rect(group).center(), [false, true, false], catalog);
        menu.click(layout.slot_rect(variant).center(), [true, false, false], catalog);
        assert_eq!(menu.active_variant(), variant);
    }

    fn save_to(editor: &mut Editor<'_>, prompt: &mut ScriptedPrompt, dir: &tempfile::TempDir) {
        prompt.directories.push_back(Some(dir.path().to_path_buf()));
        prompt.texts.push_back(Some("meadow".into()));
        assert!(editor.save(false, prompt));
        assert!(!editor.is_dirty());
    }

    #[test]
    fn repeated_placement_is_a_no_op() {
        let catalog = catalog();
        let (mut editor, mut cache, dir) = setup(&catalog);
        let mut prompt = ScriptedPrompt::default();
        editor.set_layer(5);
        let at = vec2(700.0, 400.0);

        assert!(editor.place_at(at, false, &mut prompt, &mut cache));
        assert!(editor.is_dirty());
        assert!(!editor.place_at(at, false, &mut prompt, &mut cache));
        assert_eq!(editor.grid().object_count(), 1);
        assert_eq!(editor.title(), "New scene* - Editor");

        save_to(&mut editor, &mut prompt, &dir);
        assert!(!editor.place_at(at, false, &mut prompt, &mut cache));
        assert!(!editor.is_dirty());
    }

    #[test]
    fn other_variant_replaces_occupant() {
        let catalog = catalog();
        let (mut editor, mut cache, dir) = setup(&catalog);
        let mut prompt = ScriptedPrompt::default();
        editor.set_layer(5);
        let at = vec2(700.0, 400.0);
        let cell = editor.grid().pixel_to_cell(at);

        assert!(editor.place_at(at, false, &mut prompt, &mut cache));
        save_to(&mut editor, &mut prompt, &dir);

        pick_variant(&mut editor, 0, 1);
        assert!(editor.place_at(at, false, &mut prompt, &mut cache));
        assert_eq!(editor.grid().object_count(), 1);
        let tile = editor.grid().get(5, cell).unwrap();
        assert_eq!(tile.variant, 1);
        assert!(tile.image_path.ends_with("1.png"));
        // Dirtiness follows the object count, which a swap leaves alone.
        assert!(!editor.is_dirty());
    }

    #[test]
    fn other_edge_type_replaces_collider() {
        let catalog = catalog();
        let (mut editor, mut cache, _dir) = setup(&catalog);
        let mut prompt = ScriptedPrompt::default();
        let at = vec2(650.0, 370.0);
        let cell = editor.grid().pixel_to_cell(at);

        pick_variant(&mut editor, 1, 0);
        assert!(editor.place_at(at, false, &mut prompt, &mut cache));
        assert_eq!(
            editor.grid().collider(cell).unwrap().kind,
            ObjectKind::Collider(CollisionType::parse("lu"))
        );

        pick_variant(&mut editor, 1, 1);
        assert!(editor.place_at(at, false, &mut prompt, &mut cache));
        assert!(!editor.place_at(at, false, &mut prompt, &mut cache));
        assert_eq!(editor.grid().object_count(), 1);
        let collider = editor.grid().collider(cell).unwrap();
        assert_eq!(collider.kind, ObjectKind::Collider(CollisionType::parse("u")));
        assert_eq!(collider.variant, 1);
    }

    #[test]
    fn colliders_take_type_from_sprite_and_erase_on_collider_layer() {
        let catalog = catalog();
        let (mut editor, mut cache, _dir) = setup(&catalog);
        let mut prompt = ScriptedPrompt::default();
        select(&mut editor, 1);
        let at = vec2(650.0, 370.0);

        assert!(editor.place_at(at, false, &mut prompt, &mut cache));
        let cell = editor.grid().pixel_to_cell(at);
        let collider = editor.grid().collider(cell).unwrap();
        assert_eq!(collider.kind, ObjectKind::Collider(CollisionType::parse("lu")));
        assert_eq!(collider.category, Some(CategoryId(1)));

        editor.set_layer(4);
        assert!(!editor.erase_at(at));
        editor.set_layer(COLLIDER_LAYER as i32);
        assert!(editor.erase_at(at));
        assert!(editor.grid().is_empty());
    }

    #[test]
    fn spawn_is_unique_and_pinned_to_collider_layer() {
        let catalog = catalog();
        let (mut editor, mut cache, _dir) = setup(&catalog);
        let mut prompt = ScriptedPrompt::default();
        select(&mut editor, 2);
        editor.set_layer(3);

        editor.place_at(vec2(640.0, 360.0), false, &mut prompt, &mut cache);
        editor.place_at(vec2(900.0, 360.0), false, &mut prompt, &mut cache);
        let spawns: Vec<_> = editor.grid().layer(COLLIDER_LAYER).collect();
        assert_eq!(spawns.len(), 1);
        assert_eq!(editor.grid().layer(3).count(), 0);
    }

    #[test]
    fn non_canonical_npc_has_no_name() {
        let catalog = catalog();
        let (mut editor, mut cache, _dir) = setup(&catalog);
        let mut prompt = ScriptedPrompt::default();
        select(&mut editor, 3);

        prompt.confirms.push_back(false);
        editor.place_at(vec2(640.0, 360.0), false, &mut prompt, &mut cache);
        prompt.confirms.push_back(true);
        prompt.texts.push_back(Some("Fogg".into()));
        editor.place_at(vec2(800.0, 360.0), false, &mut prompt, &mut cache);

        let ids: Vec<_> = editor
            .grid()
            .layer(COLLIDER_LAYER)
            .map(|(_, obj)| obj.kind.display_id().map(str::to_owned))
            .collect();
        assert_eq!(ids, vec![None, Some("Fogg".to_owned())]);
    }

    #[test]
    fn free_move_keeps_pixel_offset() {
        let catalog = catalog();
        let (mut editor, mut cache, _dir) = setup(&catalog);
        let mut prompt = ScriptedPrompt::default();
        editor.set_layer(6);
        editor.place_at(vec2(650.0, 375.0), true, &mut prompt, &mut cache);

        let (_, obj) = editor.grid().layer(6).next().unwrap();
        assert_eq!(obj.free_position, Some(vec2(10.0, 15.0)));
    }

    #[test]
    fn cancelled_save_target_writes_nothing() {
        let catalog = catalog();
        let (mut editor, mut cache, _dir) = setup(&catalog);
        let mut prompt = ScriptedPrompt::default();
        editor.place_at(vec2(640.0, 360.0), false, &mut prompt, &mut cache);

        assert!(!editor.save(false, &mut prompt));
        assert!(editor.is_dirty());
        assert_eq!(editor.save_dir(), None);
    }

    #[test]
    fn layer_hotkeys_clamp() {
        let catalog = catalog();
        let (mut editor, _cache, _dir) = setup(&catalog);
        editor.set_layer(20);
        assert_eq!(editor.layer(), 14);
        editor.set_layer(-1);
        assert_eq!(editor.layer(), 0);
    }
}
