mod common;

use std::path::Path;

use common::{touch, Answers, HeadlessLoader};
use macroquad::prelude::{vec2, Vec2};
use parallax_platformer::camera::Camera;
use parallax_platformer::editor::state::Editor;
use parallax_platformer::{AppConfig, AssetCache, Catalog, Level, Player, SceneError, SceneStore};
use rand::rngs::StdRng;
use rand::SeedableRng;

const SPRITES: &[&str] = &[
    "assets/graphics/colliders/u.png",
    "assets/graphics/events/0.png",
    "assets/graphics/player/idle/0.png",
    "assets/graphics/tiles/land/0.png",
];

fn config(root: &Path) -> AppConfig {
    AppConfig {
        asset_root: root.to_path_buf(),
        editor_save_dir: root.join("saves"),
        ..AppConfig::default()
    }
}

fn pick(editor: &mut Editor<'_>, group: &str) {
    let slot = editor
        .menu()
        .groups()
        .iter()
        .position(|g| g.name == group)
        .unwrap_or_else(|| panic!("no menu group {group}"));
    let pos = editor.menu().layout().slot_rect(slot).center();
    let catalog = editor.catalog();
    editor.menu_mut().click(pos, [true, false, false], catalog);
}

/// Screen position inside cell (col, row) of the editor grid.
fn cell(editor: &Editor<'_>, col: i32, row: i32) -> Vec2 {
    editor.origin() + vec2(col as f32 * 64.0 + 10.0, row as f32 * 64.0 + 10.0)
}

#[test]
fn authored_scene_plays_back() {
    let root = tempfile::tempdir().unwrap();
    touch(root.path(), SPRITES);
    let catalog = Catalog::builtin().scan(root.path());
    let config = config(root.path());
    let mut cache = AssetCache::new(HeadlessLoader, root.path());
    let mut answers = Answers::default();
    let mut editor = Editor::new(&catalog, &config);

    pick(&mut editor, "terrain");
    editor.set_layer(5);
    for col in 0..5 {
        assert!(editor.place_at(cell(&editor, col, 5), false, &mut answers, &mut cache));
    }
    pick(&mut editor, "collider");
    for col in 0..5 {
        assert!(editor.place_at(cell(&editor, col, 5), false, &mut answers, &mut cache));
    }
    pick(&mut editor, "player");
    assert!(editor.place_at(cell(&editor, 2, 3), false, &mut answers, &mut cache));
    pick(&mut editor, "event");
    answers.texts.push_back("level:2".into());
    assert!(editor.place_at(cell(&editor, 2, 4), false, &mut answers, &mut cache));

    assert_eq!(editor.grid().object_count(), 12);
    assert!(editor.title().ends_with("* - Editor"));

    answers.directories.push_back(root.path().join("saves"));
    answers.texts.push_back("cave".into());
    assert!(editor.save(false, &mut answers));
    assert!(!editor.is_dirty());
    assert_eq!(editor.title(), "cave - Editor");
    assert!(answers.errors.is_empty());

    let store = SceneStore::new(&catalog);
    let screen = vec2(1280.0, 720.0);
    let mut level = Level::load(
        &store,
        &root.path().join("saves/cave"),
        &mut cache,
        screen,
        StdRng::seed_from_u64(7),
    )
    .unwrap();
    assert_eq!(level.spawn(), vec2(128.0, 192.0));
    assert_eq!(level.colliders().len(), 5);
    assert_eq!((level.bounds().start, level.bounds().end), (0.0, 320.0));
    assert!(level.grid().layer(9).all(|(_, obj)| !obj.kind.is_player()));

    let mut player = Player::new(config.player.clone(), level.spawn());
    let mut camera = Camera::new(screen);
    camera.snap_to(&player.rect());
    for _ in 0..300 {
        player.update(level.colliders(), level.bounds(), 1.0 / 60.0);
        camera.follow(&player.rect());
        level.advance(1.0 / 60.0);
    }
    assert!(player.on_ground());
    assert_eq!(player.rect().bottom(), 320.0);
    assert!((camera.target_for(&player.rect()) - camera.offset()).length() < 1.0);
    assert_eq!(level.triggered_switch(&player.rect()), Some(2));

    assert!(editor.new_project(&mut answers));
    assert!(editor.grid().is_empty());
    answers.directories.push_back(root.path().join("saves/cave"));
    assert!(editor.open(&mut answers, &mut cache));
    assert_eq!(editor.name(), "cave");
    assert_eq!(editor.grid().object_count(), 12);
    assert!(!editor.is_dirty());
}

#[test]
fn failed_open_keeps_the_current_scene() {
    let root = tempfile::tempdir().unwrap();
    touch(root.path(), SPRITES);
    let catalog = Catalog::builtin().scan(root.path());
    let config = config(root.path());
    let mut cache = AssetCache::new(HeadlessLoader, root.path());
    let mut answers = Answers::default();
    let mut editor = Editor::new(&catalog, &config);

    pick(&mut editor, "terrain");
    editor.place_at(cell(&editor, 0, 0), false, &mut answers, &mut cache);

    // decline saving, accept closing, then point at a folder with no scene
    answers.confirms.extend([false, true]);
    answers.directories.push_back(root.path().join("nowhere"));
    assert!(!editor.open(&mut answers, &mut cache));

    assert_eq!(editor.grid().object_count(), 1);
    assert!(editor.is_dirty());
    assert_eq!(answers.errors.len(), 1);

    let err = SceneStore::new(&catalog)
        .import(&root.path().join("nowhere"), "", &mut cache)
        .unwrap_err();
    assert!(matches!(err, SceneError::NotFound { .. }));
}

#[test]
fn declining_to_close_keeps_unsaved_work() {
    let root = tempfile::tempdir().unwrap();
    touch(root.path(), SPRITES);
    let catalog = Catalog::builtin().scan(root.path());
    let config = config(root.path());
    let mut cache = AssetCache::new(HeadlessLoader, root.path());
    let mut answers = Answers::default();
    let mut editor = Editor::new(&catalog, &config);

    pick(&mut editor, "terrain");
    editor.place_at(cell(&editor, 1, 1), false, &mut answers, &mut cache);

    answers.confirms.extend([false, false]);
    assert!(!editor.new_project(&mut answers));
    assert_eq!(editor.grid().object_count(), 1);
}
