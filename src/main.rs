use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use snake_tui::auth::AuthService;
use snake_tui::game::GameConfig;
use snake_tui::modes::PlayMode;
use snake_tui::render::{GlyphSet, Renderer};
use snake_tui::store::{ProfileStore, STORE_FILE};

#[derive(Parser)]
#[command(name = "snake-tui")]
#[command(version, about = "Terminal Snake with per-user score tracking")]
struct Cli {
    /// Side length of the square grid
    #[arg(long, default_value = "20")]
    grid: usize,

    /// Initial tick interval in milliseconds
    #[arg(long)]
    speed: Option<u64>,

    /// Directory holding the profile file (defaults to the current directory)
    #[arg(long)]
    data_dir: Option<PathBuf>,

    /// Force the plain-ASCII board glyphs
    #[arg(long)]
    ascii: bool,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    let mut config = GameConfig::with_grid_size(cli.grid);
    if let Some(speed) = cli.speed {
        config.initial_tick_ms = speed.max(config.min_tick_ms);
    }

    let store_path = cli.data_dir.unwrap_or_default().join(STORE_FILE);
    let auth = AuthService::new(ProfileStore::open(store_path));

    let glyphs = if cli.ascii {
        GlyphSet::ascii()
    } else {
        GlyphSet::detect()
    };

    let mut mode = PlayMode::new(config, auth, Renderer::new(glyphs));
    mode.run().await
}
