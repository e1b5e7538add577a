use anyhow::{Context, Result};
use macroquad::prelude::*;
use parallax_platformer::camera::Camera;
use parallax_platformer::input::{player_input, MacroquadInput};
use parallax_platformer::levels::LevelIndex;
use parallax_platformer::player::PlayerSprites;
use parallax_platformer::render::backend::{execute, pace_frame, TextureLoader};
use parallax_platformer::transition::Transition;
use parallax_platformer::{AppConfig, AssetCache, Catalog, Level, Player, SceneStore};
use ::rand::rngs::StdRng;
use ::rand::SeedableRng;
use tracing::{error, info};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

fn window_conf() -> Conf {
    let config = AppConfig::load();
    Conf {
        window_title: "Parallax Platformer".into(),
        window_width: config.window_width as i32,
        window_height: config.window_height as i32,
        window_resizable: false,
        ..Default::default()
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("parallax_platformer=info"));
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(filter)
        .init();
}

fn load_level(
    store: &SceneStore<'_>,
    index: &LevelIndex,
    id: u32,
    config: &AppConfig,
    cache: &mut AssetCache<TextureLoader>,
    screen: Vec2,
) -> Result<Level> {
    let dir = index
        .path_for(id)
        .with_context(|| format!("level {id} is not in the level index"))?;
    let path = config.asset_path(dir);
    let level = Level::load(store, &path, cache, screen, StdRng::from_entropy())
        .with_context(|| format!("loading level {id} from {}", path.display()))?;
    info!("entered level {id}");
    Ok(level)
}

async fn run() -> Result<()> {
    let config = AppConfig::load();
    let (w, h) = config.screen_size();
    let screen = vec2(w, h);

    let catalog = Catalog::builtin().scan(&config.asset_root);
    let store = SceneStore::new(&catalog);
    let mut cache = AssetCache::new(TextureLoader, config.asset_root.clone());

    let index_path = config.asset_path(&config.level_index);
    let index = LevelIndex::load(&index_path)
        .with_context(|| format!("reading level index {}", index_path.display()))?;
    let first = index.first().context("the level index lists no levels")?;
    let mut level = load_level(&store, &index, first, &config, &mut cache, screen)?;

    let sprites = PlayerSprites::load(&mut cache, &config.player.sprite_dir);
    if sprites.is_empty() {
        info!("no player sprites under {}, drawing a box", config.player.sprite_dir);
    }
    let mut player = Player::new(config.player.clone(), level.spawn());
    let mut camera = Camera::new(screen);
    camera.snap_to(&player.rect());
    let mut transition = Transition::new(screen);

    let input = MacroquadInput;
    let mut commands = Vec::new();
    loop {
        let frame_start = get_time();
        let dt = get_frame_time();
        if is_key_pressed(KeyCode::Escape) {
            break;
        }

        if !transition.is_active() {
            player.handle_input(&player_input(&input), level.bounds());
        }
        player.update(level.colliders(), level.bounds(), dt);
        camera.follow(&player.rect());
        level.advance(dt);

        if let Some(next) = level.triggered_switch(&player.rect()) {
            transition.start(next);
        }
        if let Some(next) = transition.update(dt) {
            match load_level(&store, &index, next, &config, &mut cache, screen) {
                Ok(loaded) => {
                    level = loaded;
                    player.respawn(level.spawn());
                    camera.snap_to(&player.rect());
                }
                Err(e) => error!("{e:#}"),
            }
        }

        commands.clear();
        level.draw(camera.offset(), screen, &player, &sprites, &cache, &mut commands);
        transition.draw(&mut commands);
        execute(&commands, &cache);

        pace_frame(frame_start, config.target_fps);
        next_frame().await;
    }
    Ok(())
}

#[macroquad::main(window_conf)]
async fn main() {
    init_tracing();
    info!("starting, version {}", env!("CARGO_PKG_VERSION"));
    if let Err(e) = run().await {
        error!("{e:#}");
        std::process::exit(1);
    }
}
