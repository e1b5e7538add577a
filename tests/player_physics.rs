use macroquad::prelude::vec2;
use parallax_platformer::player::PlayerInput;
use parallax_platformer::spatial::SceneBounds;
use parallax_platformer::{Collider, CollisionType, Player, PlayerParams};

const DT: f32 = 1.0 / 60.0;

fn floor(y: f32, cols: i32) -> Vec<Collider> {
    (0..cols)
        .map(|i| Collider::new(vec2(i as f32 * 64.0, y), 64.0, CollisionType::parse("u")))
        .collect()
}

#[test]
fn tall_player_lands_on_single_collider() {
    let collider = [Collider::new(vec2(128.0, 320.0), 64.0, CollisionType::parse("u"))];
    let params = PlayerParams {
        width: 32.0,
        height: 103.0,
        ..PlayerParams::default()
    };
    let mut player = Player::new(params, vec2(140.0, 100.0));
    player.set_velocity(vec2(0.0, 5.0));

    for _ in 0..120 {
        player.update(&collider, SceneBounds::default(), DT);
    }
    assert_eq!(player.rect().bottom(), 320.0);
    assert!(player.on_ground());
}

#[test]
fn terminal_velocity_fall_does_not_tunnel() {
    let ground = floor(500.0, 4);
    let mut player = Player::new(PlayerParams::default(), vec2(100.0, -2000.0));
    player.set_velocity(vec2(0.0, 10.0));

    for _ in 0..600 {
        player.update(&ground, SceneBounds::default(), DT);
        assert!(player.rect().bottom() <= 500.0);
        assert!(player.velocity().y <= player.params().terminal_velocity);
    }
    assert_eq!(player.rect().bottom(), 500.0);
    assert!(player.on_ground());
}

#[test]
fn running_right_stops_at_scene_end() {
    let ground = floor(320.0, 4);
    let bounds = SceneBounds::new(0.0, 100.0);
    let params = PlayerParams {
        width: 32.0,
        ..PlayerParams::default()
    };
    let mut player = Player::new(params, vec2(10.0, 260.0));
    let input = PlayerInput {
        right: true,
        sprint: true,
        ..PlayerInput::default()
    };

    for _ in 0..300 {
        player.handle_input(&input, bounds);
        player.update(&ground, bounds, DT);
        assert!(player.rect().right() <= 100.0);
    }
    assert_eq!(player.rect().right(), 100.0);
}

#[test]
fn slide_runs_out_and_leaves_no_speed() {
    let ground = floor(320.0, 10);
    let mut player = Player::new(PlayerParams::default(), vec2(100.0, 260.0));
    player.update(&ground, SceneBounds::default(), DT);
    assert!(player.on_ground());

    let slide = PlayerInput {
        right: true,
        down: true,
        ..PlayerInput::default()
    };
    player.handle_input(&slide, SceneBounds::default());
    assert!(player.is_sliding());
    assert!(player.velocity().x > player.params().speed);

    for _ in 0..30 {
        player.update(&ground, SceneBounds::default(), DT);
    }
    assert!(!player.is_sliding());
    assert_eq!(player.velocity().x, 0.0);
}
