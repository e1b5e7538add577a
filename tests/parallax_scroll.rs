mod common;

use common::HeadlessLoader;
use macroquad::prelude::vec2;
use parallax_platformer::camera::{follow_factor, Camera};
use parallax_platformer::player::PlayerSprites;
use parallax_platformer::render::command::DrawCommand;
use parallax_platformer::{
    AssetCache, Cell, ImageHandle, Level, ObjectKind, PlacedObject, Player, PlayerParams,
    SceneGrid, SceneSettings,
};
use rand::rngs::StdRng;
use rand::SeedableRng;

fn tile(layer: u8, col: i32, row: i32, image: u32) -> PlacedObject {
    PlacedObject {
        category: None,
        variant: 0,
        layer,
        cell: Cell::new(col, row),
        free_position: None,
        kind: ObjectKind::Terrain,
        image_path: String::new(),
        image: ImageHandle(image),
        animation_path: None,
        animation: None,
        size: (64, 64),
    }
}

#[test]
fn foreground_strip_wraps_while_scrolling() {
    let mut grid = SceneGrid::new(64);
    for col in 0..10 {
        grid.insert(tile(5, col, 8, 1));
    }
    grid.insert(tile(13, 0, 2, 7));
    let screen = vec2(1280.0, 720.0);
    let mut level = Level::from_scene(
        "memory",
        grid,
        SceneSettings::default(),
        screen,
        StdRng::seed_from_u64(3),
    );
    assert_eq!((level.bounds().start, level.bounds().end), (0.0, 640.0));

    let dir = tempfile::tempdir().unwrap();
    let cache = AssetCache::new(HeadlessLoader, dir.path());
    let player = Player::new(PlayerParams::default(), level.spawn());
    let sprites = PlayerSprites::default();

    let mut drawn = 0;
    let mut out = Vec::new();
    for step in 0..1500 {
        let camera = vec2(-5.0 * step as f32, 0.0);
        out.clear();
        level.draw(camera, screen, &player, &sprites, &cache, &mut out);

        let strip = &level.parallax().foregrounds()[0];
        let x = strip.screen_x(&strip.tiles()[0]);
        assert!(x >= -64.0 - 5.0 && x <= screen.x, "step {step}: tile at {x}");
        drawn += out
            .iter()
            .filter(|c| matches!(c, DrawCommand::Sprite { image: ImageHandle(7), .. }))
            .count();
    }
    assert!(drawn > 0);
}

#[test]
fn background_recycling_keeps_apparent_position() {
    let mut grid = SceneGrid::new(64);
    for col in 0..10 {
        grid.insert(tile(5, col, 8, 1));
    }
    grid.insert(tile(2, 3, 1, 4));
    let screen = vec2(1280.0, 720.0);
    let mut level = Level::from_scene(
        "memory",
        grid,
        SceneSettings::default(),
        screen,
        StdRng::seed_from_u64(9),
    );
    let dir = tempfile::tempdir().unwrap();
    let cache = AssetCache::new(HeadlessLoader, dir.path());
    let player = Player::new(PlayerParams::default(), level.spawn());
    let sprites = PlayerSprites::default();

    let period = 640.0;
    let mut out = Vec::new();
    for step in 0..2000 {
        let camera = vec2(-6.0 * step as f32, 0.0);
        out.clear();
        level.draw(camera, screen, &player, &sprites, &cache, &mut out);

        let strip = &level.parallax().backgrounds()[0];
        assert_eq!(strip.period(level.bounds()), period);
        let x = strip.screen_x(&strip.tiles()[0]);
        let expected = 192.0 + camera.x * strip.delay() * strip.delay();
        let drift = (x - expected).rem_euclid(period);
        assert!(drift < 0.01 || period - drift < 0.01, "step {step}: {x} vs {expected}");
        assert!(x >= -64.0 - 2.0, "step {step}: tile left behind at {x}");
    }
}

#[test]
fn camera_closes_in_without_overshoot() {
    let mut camera = Camera::new(vec2(1280.0, 720.0));
    let player = Player::new(PlayerParams::default(), vec2(2000.0, -300.0));
    let target = camera.target_for(&player.rect());

    let mut last = (target - camera.offset()).length();
    for _ in 0..120 {
        camera.follow(&player.rect());
        let gap = target - camera.offset();
        assert!(gap.length() <= last);
        assert!(gap.x <= 0.0 && gap.y >= 0.0);
        last = gap.length();
    }
    assert!(last < 1.0);
    assert!(follow_factor() > 0.0 && follow_factor() < 1.0);
}
