use anyhow::Result;
use macroquad::prelude::*;
use parallax_platformer::editor::draw::draw_editor;
use parallax_platformer::editor::prompt::DialogPrompt;
use parallax_platformer::editor::state::Editor;
use parallax_platformer::input::{InputSource, MacroquadInput};
use parallax_platformer::render::backend::{execute, pace_frame, TextureLoader};
use parallax_platformer::{AppConfig, AssetCache, Catalog};
use tracing::{error, info};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

fn window_conf() -> Conf {
    let config = AppConfig::load();
    Conf {
        window_title: "Scene Editor".into(),
        window_width: config.window_width as i32,
        window_height: config.window_height as i32,
        window_resizable: false,
        ..Default::default()
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("parallax_platformer=info,editor=info"));
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(filter)
        .init();
}

async fn run() -> Result<()> {
    let config = AppConfig::load();
    let catalog = Catalog::builtin().scan(&config.asset_root);
    info!("catalog has {} categories", catalog.len());

    let mut cache = AssetCache::new(TextureLoader, config.asset_root.clone());
    let mut editor = Editor::new(&catalog, &config);
    let mut prompt = DialogPrompt;
    let input = MacroquadInput;

    prevent_quit();
    let mut commands = Vec::new();
    loop {
        let frame_start = get_time();
        if is_quit_requested() && editor.confirm_discard(&mut prompt) {
            break;
        }

        editor.update(&input, &mut prompt, &mut cache, get_frame_time());

        commands.clear();
        draw_editor(&editor, &mut cache, input.mouse_position(), &mut commands);
        execute(&commands, &cache);

        pace_frame(frame_start, config.target_fps);
        next_frame().await;
    }
    info!("editor closed");
    Ok(())
}

#[macroquad::main(window_conf)]
async fn main() {
    init_tracing();
    if let Err(e) = run().await {
        error!("{e:#}");
        std::process::exit(1);
    }
}
