//! Sky band, clouds and the repeating background/foreground strips.
//!
//! Each layer follows the camera with its own coupling. The sky eases with a
//! cosine factor, clouds track linearly and drift on their own, and the
//! background and foreground strips are placed proportionally to the camera
//! offset and wrap around horizontally to look endless.

use std::f32::consts::PI;
use std::ops::RangeInclusive;

use macroquad::prelude::{vec2, Rect, Vec2};
use rand::rngs::StdRng;
use rand::Rng;

use super::command::DrawCommand;
use super::cull::cloud_on_screen;
use crate::assets::{AnimationHandle, AssetCache, AssetLoader, ImageHandle};
use crate::loader::settings::Palette;
use crate::object::PlacedObject;
use crate::spatial::{SceneBounds, SceneGrid, BACKGROUND_LAYERS, FOREGROUND_LAYERS, SKY_LAYER};

/// Easing phase of the sky band.
pub const SKY_DELAY: f32 = 0.25;
/// Camera coupling of the cloud layer.
pub const CLOUD_DELAY: f32 = 0.1;
/// Camera coupling of background layers 2 and 3.
pub const BACKGROUND_DELAYS: [f32; 2] = [0.5, 0.3];
/// Camera coupling of foreground layers 13 and 14.
pub const FOREGROUND_DELAYS: [f32; 2] = [0.8, 0.85];

const CLOUD_SPEED: RangeInclusive<f32> = 0.2..=0.5;
const CLOUD_Y_OFFSET: RangeInclusive<f32> = -200.0..=150.0;
// Per-frame drift is `speed * 60 * 0.01`.
const CLOUD_STEP: f32 = 0.6;
const CLOUD_BASE_Y: f32 = 100.0;
const CLOUD_RISE: f32 = 0.05;

const HORIZON_OVERDRAW: f32 = 18.0;

/// A grid object copied out for parallax drawing. Its position moves as the
/// strip wraps around.
#[derive(Debug, Clone, PartialEq)]
pub struct ParallaxTile {
    /// Scene-local top-left; shifted by whole periods on wrap.
    pub local: Vec2,
    /// Sprite size in pixels.
    pub size: (u32, u32),
    /// Sprite.
    pub image: ImageHandle,
    /// Frame sequence, for animated tiles.
    pub animation: Option<AnimationHandle>,
}

impl ParallaxTile {
    /// Copy of `obj` at its scene-local position.
    pub fn from_object(obj: &PlacedObject, tile_size: u32) -> Self {
        ParallaxTile {
            local: obj.local_position(tile_size),
            size: obj.size,
            image: obj.image,
            animation: obj.animation,
        }
    }

    fn width(&self) -> f32 {
        self.size.0 as f32
    }

    fn frame<L: AssetLoader>(&self, cache: &AssetCache<L>, index: usize) -> ImageHandle {
        self.animation
            .and_then(|anim| cache.frame(anim, index))
            .unwrap_or(self.image)
    }
}

/// Ground rect and horizon lines hanging from `top`.
pub fn horizon_band(top: f32, palette: &Palette, screen: Vec2, out: &mut Vec<DrawCommand>) {
    out.push(DrawCommand::FillRect {
        rect: Rect::new(0.0, top, screen.x, screen.y + HORIZON_OVERDRAW),
        color: palette.horizon,
    });
    for (dy, h) in [(0.0, 10.0), (-7.0, 4.0), (-13.0, 2.0)] {
        out.push(DrawCommand::FillRect {
            rect: Rect::new(0.0, top + dy, screen.x, h),
            color: palette.horizon_top,
        });
    }
}

/// Editor backdrop: the horizon sits on the scene origin.
pub fn editor_sky(origin_y: f32, palette: &Palette, screen: Vec2, out: &mut Vec<DrawCommand>) {
    out.push(DrawCommand::Clear(palette.sky));
    if origin_y > screen.y + HORIZON_OVERDRAW {
        return;
    }
    if origin_y >= -HORIZON_OVERDRAW {
        horizon_band(origin_y - 5.0, palette, screen, out);
    } else {
        out.push(DrawCommand::Clear(palette.horizon));
    }
}

/// Sky colour plus the horizon band, eased toward the camera.
#[derive(Debug, Clone, PartialEq)]
pub struct SkyBand {
    tracked: Vec2,
}

impl SkyBand {
    /// Band tracking from `start`.
    pub fn new(start: Vec2) -> Self {
        SkyBand { tracked: start }
    }

    /// Eased tracking position.
    pub fn tracked(&self) -> Vec2 {
        self.tracked
    }

    /// Eases one frame toward `target_y`.
    pub fn track(&mut self, target_y: f32) {
        self.tracked.y += (target_y - self.tracked.y) * (1.0 - (PI * SKY_DELAY).cos());
    }

    /// Screen y of the ground's top edge.
    pub fn ground_top(&self, camera: Vec2) -> f32 {
        self.tracked.y - camera.y + 30.0
    }

    /// Clears to the sky colour and emits the horizon band.
    pub fn draw(&self, camera: Vec2, palette: &Palette, screen: Vec2, out: &mut Vec<DrawCommand>) {
        out.push(DrawCommand::Clear(palette.sky));
        horizon_band(self.ground_top(camera), palette, screen, out);
    }
}

/// One drifting cloud.
#[derive(Debug, Clone, PartialEq)]
pub struct Cloud {
    /// Sprite and scene-local position.
    pub tile: ParallaxTile,
    /// Drift speed factor.
    pub speed: f32,
    /// Accumulated drift in pixels.
    pub offset: f32,
    /// Random vertical offset, redrawn on wrap.
    pub y_offset: f32,
}

/// Drifting clouds from the sky layer.
#[derive(Debug, Clone, PartialEq)]
pub struct CloudLayer {
    tracked: Vec2,
    clouds: Vec<Cloud>,
}

impl CloudLayer {
    /// Clouds spread over `bounds` with random speed and height.
    pub fn new<R: Rng>(tiles: Vec<ParallaxTile>, bounds: SceneBounds, start: Vec2, rng: &mut R) -> Self {
        let clouds = tiles
            .into_iter()
            .map(|tile| Cloud {
                tile,
                speed: rng.gen_range(CLOUD_SPEED),
                offset: rng.gen_range(bounds.start..=bounds.end),
                y_offset: rng.gen_range(CLOUD_Y_OFFSET),
            })
            .collect();
        CloudLayer { tracked: start, clouds }
    }

    /// Every cloud.
    pub fn clouds(&self) -> &[Cloud] {
        &self.clouds
    }

    /// Screen position of `cloud`.
    pub fn screen_position(&self, cloud: &Cloud) -> Vec2 {
        vec2(
            cloud.tile.local.x + cloud.offset,
            CLOUD_BASE_Y + cloud.y_offset + self.tracked.y * CLOUD_RISE,
        )
    }

    /// Advances every cloud one frame, sending the ones past the right end
    /// back before the left end with a fresh height.
    pub fn step<R: Rng>(&mut self, target_y: f32, bounds: SceneBounds, screen: Vec2, rng: &mut R) {
        self.tracked.y += (target_y - self.tracked.y) * CLOUD_DELAY;
        for cloud in &mut self.clouds {
            cloud.offset += cloud.speed * CLOUD_STEP;
            let w = cloud.tile.width();
            let x = cloud.tile.local.x + cloud.offset;
            if x > bounds.end / 2.0 + screen.x + w {
                cloud.offset = bounds.start - screen.x - w;
                cloud.y_offset = rng.gen_range(CLOUD_Y_OFFSET);
            }
        }
    }

    fn draw<L: AssetLoader>(&self, index: usize, cache: &AssetCache<L>, screen: Vec2, out: &mut Vec<DrawCommand>) {
        for cloud in &self.clouds {
            let pos = self.screen_position(cloud);
            if cloud_on_screen(pos, cloud.tile.size, screen) {
                out.push(DrawCommand::sprite(cloud.tile.frame(cache, index), pos));
            }
        }
    }
}

/// Which side of the playfield a strip is on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Depth {
    /// Behind the playfield.
    Background,
    /// In front of the playfield.
    Foreground,
}

/// A strip of tiles that repeats horizontally.
#[derive(Debug, Clone, PartialEq)]
pub struct RepeatingLayer {
    /// Grid layer the strip was copied from.
    pub layer: u8,
    depth: Depth,
    delay: f32,
    vector: Vec2,
    tiles: Vec<ParallaxTile>,
}

impl RepeatingLayer {
    /// Strip of `tiles` with camera coupling `delay`.
    pub fn new(layer: u8, depth: Depth, delay: f32, tiles: Vec<ParallaxTile>, start: Vec2) -> Self {
        RepeatingLayer {
            layer,
            depth,
            delay,
            vector: start,
            tiles,
        }
    }

    /// Tiles in their current wrapped positions.
    pub fn tiles(&self) -> &[ParallaxTile] {
        &self.tiles
    }

    /// Camera coupling.
    pub fn delay(&self) -> f32 {
        self.delay
    }

    /// Follows the camera for one frame.
    pub fn track(&mut self, camera: Vec2) {
        self.vector.x = camera.x * self.delay;
        self.vector.y = match self.depth {
            Depth::Background => camera.y - camera.y * self.delay + 200.0,
            Depth::Foreground => camera.y - camera.y * (self.delay * 0.7) + 60.0,
        };
    }

    /// Screen x of `tile`.
    pub fn screen_x(&self, tile: &ParallaxTile) -> f32 {
        match self.depth {
            Depth::Background => tile.local.x + self.vector.x * self.delay,
            Depth::Foreground => tile.local.x + self.vector.x,
        }
    }

    /// Screen y of `tile`.
    pub fn screen_y(&self, tile: &ParallaxTile) -> f32 {
        self.vector.y + tile.local.y
    }

    /// Horizontal distance a tile jumps when it wraps.
    pub fn period(&self, bounds: SceneBounds) -> f32 {
        bounds.width() * self.tiles.len() as f32
    }

    /// Moves tiles that left the screen by one period toward the other side.
    pub fn recycle(&mut self, bounds: SceneBounds, screen_width: f32) {
        let period = self.period(bounds);
        for i in 0..self.tiles.len() {
            let x = self.screen_x(&self.tiles[i]);
            self.tiles[i].local.x += wrap_shift(x, self.tiles[i].width(), period, screen_width);
        }
    }

    fn draw<L: AssetLoader>(
        &mut self,
        index: usize,
        bounds: SceneBounds,
        cache: &AssetCache<L>,
        screen: Vec2,
        out: &mut Vec<DrawCommand>,
    ) {
        match self.depth {
            Depth::Background => self.draw_filled(index, bounds, cache, screen, out),
            Depth::Foreground => {
                for tile in &self.tiles {
                    let pos = vec2(self.screen_x(tile), self.screen_y(tile));
                    if wrap_shift(pos.x, tile.width(), 1.0, screen.x) == 0.0 {
                        out.push(DrawCommand::sprite(tile.frame(cache, index), pos));
                    }
                }
                self.recycle(bounds, screen.x);
            }
        }
    }

    // Each tile is repeated left and right until the row has no gaps.
    fn draw_filled<L: AssetLoader>(
        &mut self,
        index: usize,
        bounds: SceneBounds,
        cache: &AssetCache<L>,
        screen: Vec2,
        out: &mut Vec<DrawCommand>,
    ) {
        let period = self.period(bounds);
        for i in 0..self.tiles.len() {
            let tile = &self.tiles[i];
            let (x, y, w) = (self.screen_x(tile), self.screen_y(tile), tile.width());
            let image = tile.frame(cache, index);
            out.push(DrawCommand::sprite(image, vec2(x, y)));

            self.tiles[i].local.x += wrap_shift(x, w, period, screen.x);

            if w <= 0.0 {
                continue;
            }
            let mut right = x;
            while right < screen.x {
                right += w;
                out.push(DrawCommand::sprite(image, vec2(right, y)));
            }
            let mut left = x;
            while left >= 0.0 {
                left -= w;
                out.push(DrawCommand::sprite(image, vec2(left, y)));
            }
        }
    }
}

/// Shift for a tile at screen `x`: `+period` once it is fully off the left
/// edge, `-period` once it is past the right edge.
pub fn wrap_shift(x: f32, width: f32, period: f32, screen_width: f32) -> f32 {
    if x < -width {
        period
    } else if x > screen_width {
        -period
    } else {
        0.0
    }
}

/// Sky, clouds and the repeating strips of one level.
pub struct ParallaxRenderer {
    sky: SkyBand,
    clouds: CloudLayer,
    backgrounds: Vec<RepeatingLayer>,
    foregrounds: Vec<RepeatingLayer>,
    bounds: SceneBounds,
    palette: Palette,
    screen: Vec2,
    rng: StdRng,
}

impl ParallaxRenderer {
    /// Copies the sky, background and foreground layers out of `grid`.
    pub fn new(grid: &SceneGrid, bounds: SceneBounds, palette: Palette, screen: Vec2, mut rng: StdRng) -> Self {
        let ts = grid.tile_size();
        let start = grid.origin();
        let tiles_of = |layer: u8| -> Vec<ParallaxTile> {
            grid.layer(layer)
                .map(|(_, obj)| ParallaxTile::from_object(obj, ts))
                .collect()
        };
        let strips = |layers: [u8; 2], delays: [f32; 2], depth: Depth| -> Vec<RepeatingLayer> {
            layers
                .iter()
                .zip(delays)
                .map(|(&layer, delay)| RepeatingLayer::new(layer, depth, delay, tiles_of(layer), start))
                .collect()
        };

        ParallaxRenderer {
            sky: SkyBand::new(start),
            clouds: CloudLayer::new(tiles_of(SKY_LAYER), bounds, start, &mut rng),
            backgrounds: strips(BACKGROUND_LAYERS, BACKGROUND_DELAYS, Depth::Background),
            foregrounds: strips(FOREGROUND_LAYERS, FOREGROUND_DELAYS, Depth::Foreground),
            bounds,
            palette,
            screen,
            rng,
        }
    }

    /// Sky band.
    pub fn sky(&self) -> &SkyBand {
        &self.sky
    }

    /// Cloud layer.
    pub fn clouds(&self) -> &CloudLayer {
        &self.clouds
    }

    /// Background strips, far to near.
    pub fn backgrounds(&self) -> &[RepeatingLayer] {
        &self.backgrounds
    }

    /// Foreground strips, near to nearest.
    pub fn foregrounds(&self) -> &[RepeatingLayer] {
        &self.foregrounds
    }

    /// Sky, clouds and background strips. `camera` is the viewport offset.
    pub fn draw_back<L: AssetLoader>(
        &mut self,
        camera: Vec2,
        index: usize,
        cache: &AssetCache<L>,
        out: &mut Vec<DrawCommand>,
    ) {
        let target_y = camera.y + self.screen.y / 2.0;

        self.sky.track(target_y);
        self.sky.draw(camera, &self.palette, self.screen, out);

        self.clouds.step(target_y, self.bounds, self.screen, &mut self.rng);
        self.clouds.draw(index, cache, self.screen, out);

        for strip in &mut self.backgrounds {
            strip.track(camera);
            strip.draw(index, self.bounds, cache, self.screen, out);
        }
    }

    /// Foreground strips, drawn after the playfield.
    pub fn draw_front<L: AssetLoader>(
        &mut self,
        camera: Vec2,
        index: usize,
        cache: &AssetCache<L>,
        out: &mut Vec<DrawCommand>,
    ) {
        for strip in &mut self.foregrounds {
            strip.track(camera);
            strip.draw(index, self.bounds, cache, self.screen, out);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    fn tile(x: f32, w: u32) -> ParallaxTile {
        ParallaxTile {
            local: vec2(x, 0.0),
            size: (w, 64),
            image: ImageHandle(0),
            animation: None,
        }
    }

    #[test]
    fn sky_eases_by_cosine_factor() {
        let mut sky = SkyBand::new(Vec2::ZERO);
        sky.track(100.0);
        let k = 1.0 - (PI * 0.25).cos();
        assert!((sky.tracked().y - 100.0 * k).abs() < 1e-4);
    }

    #[test]
    fn foreground_wraps_without_drawing_off_screen_tiles() {
        let bounds = SceneBounds::new(0.0, 500.0);
        let mut strip = RepeatingLayer::new(13, Depth::Foreground, 0.8, vec![tile(-200.0, 64)], Vec2::ZERO);
        strip.track(Vec2::ZERO);
        assert_eq!(strip.screen_x(&strip.tiles()[0]), -200.0);
        strip.recycle(bounds, 1280.0);
        assert_eq!(strip.tiles()[0].local.x, 300.0);
    }

    #[test]
    fn clouds_restart_left_of_the_scene() {
        let bounds = SceneBounds::new(-100.0, 200.0);
        let mut rng = StdRng::seed_from_u64(7);
        let mut layer = CloudLayer::new(vec![tile(0.0, 50)], bounds, Vec2::ZERO, &mut rng);
        let cloud = &layer.clouds()[0];
        assert!(CLOUD_SPEED.contains(&cloud.speed));
        assert!((-100.0..=200.0).contains(&cloud.offset));

        layer.clouds[0].offset = 100.0 + 1280.0 + 50.0;
        layer.step(0.0, bounds, vec2(1280.0, 720.0), &mut rng);
        let cloud = &layer.clouds()[0];
        assert_eq!(cloud.offset, -100.0 - 1280.0 - 50.0);
        assert!(CLOUD_Y_OFFSET.contains(&cloud.y_offset));
    }
}
