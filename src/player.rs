//! Player controller: input, gravity, collision response and animation.
//!
//! One frame runs [`Player::handle_input`] then [`Player::update`]. Update
//! applies gravity, resolves collisions axis by axis against the predicted
//! rect, commits the position, clamps it to the scene bounds and finally
//! picks the animation.

use std::collections::HashMap;

use macroquad::prelude::{vec2, Color, Rect, Vec2};

use crate::assets::{AnimationHandle, AssetCache, AssetLoader, ImageHandle};
use crate::collider::Collider;
use crate::config::PlayerParams;
use crate::render::command::DrawCommand;
use crate::spatial::SceneBounds;

/// Tolerance for "was already on this side of the edge".
const EDGE_EPSILON: f32 = 0.5;
/// Downward speed after bumping a ceiling, so the player drops away from it.
const CEILING_BOUNCE: f32 = 0.1;

const FALLBACK_COLOR: Color = Color::new(1.0, 0.0, 0.0, 1.0);

/// Coarse movement state, derived from the controller flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlayerState {
    /// Standing still on the ground.
    Idle,
    /// Moving on the ground.
    Walking,
    /// Moving on the ground while sprinting.
    Running,
    /// Airborne.
    Jumping,
    /// Sliding; horizontal control is locked.
    Sliding,
    /// Attacking; horizontal control is locked.
    Attacking,
}

/// Frame sequence to draw.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AnimationKey {
    /// Standing.
    Idle,
    /// Walking.
    Walk,
    /// Sprinting.
    Run,
    /// Airborne.
    Jump,
    /// Sliding.
    Slide,
    /// Attacking on the ground.
    Attack,
    /// Attacking in the air.
    AirAttack,
}

impl AnimationKey {
    /// Every key, in loading order.
    pub const ALL: [AnimationKey; 7] = [
        AnimationKey::Idle,
        AnimationKey::Walk,
        AnimationKey::Run,
        AnimationKey::Jump,
        AnimationKey::Slide,
        AnimationKey::Attack,
        AnimationKey::AirAttack,
    ];

    /// Sub-directory of the player sprite dir holding this sequence.
    pub fn dir_name(self) -> &'static str {
        match self {
            AnimationKey::Idle => "idle",
            AnimationKey::Walk => "walk",
            AnimationKey::Run => "run",
            AnimationKey::Jump => "jump",
            AnimationKey::Slide => "slide",
            AnimationKey::Attack => "attack",
            AnimationKey::AirAttack => "air_attack",
        }
    }

    /// Jump and attack sequences hold their last frame.
    pub fn loops(self) -> bool {
        !matches!(
            self,
            AnimationKey::Jump | AnimationKey::Attack | AnimationKey::AirAttack
        )
    }
}

/// Animation for a set of state flags.
pub fn select_animation(
    sliding: bool,
    attacking: bool,
    on_ground: bool,
    moving: bool,
    sprinting: bool,
) -> AnimationKey {
    if attacking {
        if on_ground {
            AnimationKey::Attack
        } else {
            AnimationKey::AirAttack
        }
    } else if sliding {
        AnimationKey::Slide
    } else if !on_ground {
        AnimationKey::Jump
    } else if moving && sprinting {
        AnimationKey::Run
    } else if moving {
        AnimationKey::Walk
    } else {
        AnimationKey::Idle
    }
}

/// Direction the sprite faces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Facing {
    /// Flipped sprite.
    Left,
    /// Sprite as drawn on disk.
    #[default]
    Right,
}

/// Controls held this frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PlayerInput {
    /// Move left.
    pub left: bool,
    /// Move right.
    pub right: bool,
    /// Slide when combined with a direction.
    pub down: bool,
    /// Jump when on the ground.
    pub jump: bool,
    /// Multiply speed while moving.
    pub sprint: bool,
    /// Start an attack.
    pub attack: bool,
}

/// Kinematic player body.
#[derive(Debug, Clone, PartialEq)]
pub struct Player {
    params: PlayerParams,
    rect: Rect,
    velocity: Vec2,
    on_ground: bool,
    facing: Facing,
    sprinting: bool,
    slide_timer: f32,
    slide_speed: f32,
    attack_timer: f32,
    animation: AnimationKey,
    frame_time: f32,
}

impl Player {
    /// Player at rest with its top-left at `spawn`.
    pub fn new(params: PlayerParams, spawn: Vec2) -> Self {
        let rect = Rect::new(spawn.x, spawn.y, params.width, params.height);
        Player {
            params,
            rect,
            velocity: Vec2::ZERO,
            on_ground: false,
            facing: Facing::Right,
            sprinting: false,
            slide_timer: 0.0,
            slide_speed: 0.0,
            attack_timer: 0.0,
            animation: AnimationKey::Idle,
            frame_time: 0.0,
        }
    }

    /// Puts the player at `spawn` at rest.
    pub fn respawn(&mut self, spawn: Vec2) {
        *self = Player::new(self.params.clone(), spawn);
    }

    /// Tuning values.
    pub fn params(&self) -> &PlayerParams {
        &self.params
    }

    /// Body rect in scene pixels.
    pub fn rect(&self) -> Rect {
        self.rect
    }

    /// Moves the body without touching velocity.
    pub fn set_rect(&mut self, rect: Rect) {
        self.rect = rect;
    }

    /// Per-frame velocity in pixels.
    pub fn velocity(&self) -> Vec2 {
        self.velocity
    }

    /// Overrides velocity.
    pub fn set_velocity(&mut self, velocity: Vec2) {
        self.velocity = velocity;
    }

    /// Whether the last update ended standing on a collider.
    pub fn on_ground(&self) -> bool {
        self.on_ground
    }

    /// Current facing.
    pub fn facing(&self) -> Facing {
        self.facing
    }

    /// Whether a slide is running.
    pub fn is_sliding(&self) -> bool {
        self.slide_timer > 0.0
    }

    /// Whether an attack is running.
    pub fn is_attacking(&self) -> bool {
        self.attack_timer > 0.0
    }

    /// Sequence picked by the last update.
    pub fn animation(&self) -> AnimationKey {
        self.animation
    }

    /// Movement state; attack wins over slide, slide over airborne.
    pub fn state(&self) -> PlayerState {
        if self.is_attacking() {
            PlayerState::Attacking
        } else if self.is_sliding() {
            PlayerState::Sliding
        } else if !self.on_ground {
            PlayerState::Jumping
        } else if self.velocity.x != 0.0 && self.sprinting {
            PlayerState::Running
        } else if self.velocity.x != 0.0 {
            PlayerState::Walking
        } else {
            PlayerState::Idle
        }
    }

    /// Turns held controls into velocity, slides, jumps and attacks.
    ///
    /// Sliding and attacking both freeze horizontal control until they end.
    pub fn handle_input(&mut self, input: &PlayerInput, bounds: SceneBounds) {
        if input.attack && !self.is_attacking() {
            self.attack_timer = self.params.attack_duration;
        }

        if !self.is_sliding() && !self.is_attacking() {
            let dir: f32 = match (input.left, input.right) {
                (true, false) => -1.0,
                (false, true) => 1.0,
                _ => 0.0,
            };
            if dir < 0.0 {
                self.facing = Facing::Left;
            } else if dir > 0.0 {
                self.facing = Facing::Right;
            }

            let blocked = !bounds.is_empty()
                && ((dir < 0.0 && self.rect.left() <= bounds.start)
                    || (dir > 0.0 && self.rect.right() >= bounds.end));
            let moving = dir != 0.0 && !blocked;

            self.sprinting = moving && input.sprint;
            let mut speed = self.params.speed;
            if self.sprinting {
                speed *= self.params.sprint_multiplier;
            }
            self.velocity.x = if moving { dir * speed } else { 0.0 };

            if input.down && moving && self.on_ground {
                self.slide_timer = self.params.slide_duration;
                self.slide_speed = self.velocity.x * self.params.slide_boost;
                self.velocity.x = self.slide_speed;
            }
        }

        if input.jump && self.on_ground {
            self.velocity.y = -self.params.jump_power;
            self.on_ground = false;
            self.end_slide();
        }
    }

    /// Advances one frame: timers, gravity, collision, bounds clamp and animation.
    pub fn update(&mut self, colliders: &[Collider], bounds: SceneBounds, dt: f32) {
        self.tick_timers(dt);

        self.velocity.y = (self.velocity.y + self.params.gravity).min(self.params.terminal_velocity);

        let mut next = self.rect;
        next.y += self.velocity.y;
        self.on_ground = false;
        for c in colliders {
            let hits = c.check_collision(&next);
            if hits.up && self.velocity.y >= 0.0 && self.rect.bottom() <= c.top() + EDGE_EPSILON {
                next.y = c.top() - next.h;
                self.velocity.y = 0.0;
                self.on_ground = true;
            } else if hits.down && self.velocity.y < 0.0 && self.rect.top() >= c.bottom() - EDGE_EPSILON {
                next.y = c.bottom();
                self.velocity.y = CEILING_BOUNCE;
            }
        }

        next.x += self.velocity.x;
        let mut hit_wall = false;
        for c in colliders {
            let hits = c.check_collision(&next);
            if hits.left && self.velocity.x > 0.0 && self.rect.right() <= c.left() + EDGE_EPSILON {
                next.x = c.left() - next.w;
                hit_wall = true;
            } else if hits.right && self.velocity.x < 0.0 && self.rect.left() >= c.right() - EDGE_EPSILON {
                next.x = c.right();
                hit_wall = true;
            }
        }
        if hit_wall {
            self.end_slide();
            self.velocity.x = 0.0;
        }

        self.rect = next;
        if !bounds.is_empty() {
            let max_x = (bounds.end - self.rect.w).max(bounds.start);
            self.rect.x = self.rect.x.clamp(bounds.start, max_x);
        }

        let key = select_animation(
            self.is_sliding(),
            self.is_attacking(),
            self.on_ground,
            self.velocity.x != 0.0,
            self.sprinting,
        );
        if key != self.animation {
            self.animation = key;
            self.frame_time = 0.0;
        }
        self.frame_time += self.params.animation_speed * dt;
    }

    /// Frame of the current sequence for a sequence of `len` frames.
    pub fn frame_index(&self, len: usize) -> usize {
        if len == 0 {
            return 0;
        }
        let i = self.frame_time.max(0.0) as usize;
        if self.animation.loops() {
            i % len
        } else {
            i.min(len - 1)
        }
    }

    /// Emits the current frame, bottom-centered on the body.
    pub fn draw<L: AssetLoader>(
        &self,
        sprites: &PlayerSprites,
        cache: &AssetCache<L>,
        offset: Vec2,
        out: &mut Vec<DrawCommand>,
    ) {
        let screen = self.rect.offset(offset);
        let Some(image) = sprites.frame(cache, self) else {
            out.push(DrawCommand::FillRect {
                rect: screen,
                color: FALLBACK_COLOR,
            });
            return;
        };
        let (w, h) = cache.size(image);
        let dest = vec2(
            screen.center().x - w as f32 / 2.0,
            screen.bottom() - h as f32,
        );
        out.push(DrawCommand::Sprite {
            image,
            dest,
            alpha: 255,
            flip_x: self.facing == Facing::Left,
        });
    }

    fn tick_timers(&mut self, dt: f32) {
        if self.attack_timer > 0.0 {
            self.attack_timer = (self.attack_timer - dt).max(0.0);
        }
        if self.is_sliding() {
            self.slide_timer -= dt;
            self.slide_speed *= self.params.slide_decay.powf(dt);
            if self.slide_timer <= 0.0 || self.slide_speed.abs() < self.params.slide_stop_speed {
                self.end_slide();
            } else {
                self.velocity.x = self.slide_speed;
            }
        }
    }

    fn end_slide(&mut self) {
        if self.slide_speed != 0.0 {
            self.velocity.x = 0.0;
        }
        self.slide_timer = 0.0;
        self.slide_speed = 0.0;
    }
}

/// Frame sequences for each animation key that has one on disk.
#[derive(Debug, Clone, Default)]
pub struct PlayerSprites {
    sequences: HashMap<AnimationKey, AnimationHandle>,
}

impl PlayerSprites {
    /// Loads the sequences under `dir`, one sub-directory per key.
    pub fn load<L: AssetLoader>(cache: &mut AssetCache<L>, dir: &str) -> Self {
        let sequences = AnimationKey::ALL
            .iter()
            .filter_map(|&key| {
                let handle = cache.animation(&format!("{dir}/{}", key.dir_name()))?;
                Some((key, handle))
            })
            .collect();
        PlayerSprites { sequences }
    }

    /// Whether no sequence was found.
    pub fn is_empty(&self) -> bool {
        self.sequences.is_empty()
    }

    /// Frame to draw for `player`.
    pub fn frame<L: AssetLoader>(&self, cache: &AssetCache<L>, player: &Player) -> Option<ImageHandle> {
        let handle = *self.sequences.get(&player.animation())?;
        let frames = cache.frames(handle);
        frames.get(player.frame_index(frames.len())).copied()
    }
}
