//! voxtris: volumetric block-placement puzzle in the terminal.

mod app;
mod input;
mod theme;
mod ui;

use anyhow::{Context, Result};
use app::App;
use clap::{Parser, ValueEnum};
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};
use voxtris::EngineConfig;
use voxtris::config::DEFAULT_GRID_SIZE;

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(args.log_file.as_deref())?;
    let theme = load_theme(args.theme.as_deref(), args.palette);
    let config = EngineConfig {
        grid_size: args.size,
        spawn_height: args.spawn_height,
    };
    config.validate()?;
    let mut app = App::new(args, config, theme)?;
    app.run()?;
    Ok(())
}

/// Log to a file when asked; stderr would draw over the alternate screen.
fn init_logging(path: Option<&Path>) -> Result<()> {
    let Some(path) = path else {
        return Ok(());
    };
    let file = std::fs::File::create(path)
        .with_context(|| format!("creating log file {}", path.display()))?;
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .target(env_logger::Target::Pipe(Box::new(file)))
        .init();
    Ok(())
}

/// Theme from file, or the built-in one in the chosen palette when the file is unreadable.
fn load_theme(path: Option<&Path>, palette: Palette) -> theme::Theme {
    theme::Theme::load(path, palette).unwrap_or_else(|err| {
        log::warn!("theme not loaded ({err}), using defaults");
        theme::Theme::default_for_palette(palette)
    })
}

/// Volumetric block-placement puzzle in the terminal.
#[derive(Debug, Parser)]
#[command(
    name = "voxtris",
    version,
    about = "3D block-placement puzzle in the terminal. Pieces lock only against existing structure; full layers clear.",
    long_about = "voxtris drops pieces into a cubic grid, drawn as horizontal slices (top layer first).\n\n\
        A piece locks when a downward move is blocked and one of its blocks touches a placed block \
        face to face. A layer with every cell filled is cleared; blocks above stay where they are.\n\n\
        CONTROLS:\n  Left/Right h/l  Move along x      Up/Down k/j   Move along z\n  \
        Space/Enter     Move down         x / y / z     Rotate about axis\n  \
        n               Skip piece        r             Restart   q / Esc  Quit"
)]
pub struct Args {
    /// Grid side length (cells per axis). Clamped so the slices fit the terminal.
    #[arg(short, long, default_value_t = DEFAULT_GRID_SIZE, value_name = "N")]
    pub size: usize,

    /// World height where new pieces appear. Defaults to two cells above the grid.
    #[arg(long, value_name = "Y")]
    pub spawn_height: Option<i32>,

    /// Seed for the piece bag (random if not set).
    #[arg(long, value_name = "SEED")]
    pub seed: Option<u32>,

    /// Path to theme file (btop-style theme[key]=\"value\").
    #[arg(short, long, value_name = "FILE")]
    pub theme: Option<PathBuf>,

    /// Colour palette: normal (theme), high-contrast, or colorblind.
    #[arg(long, default_value = "normal")]
    pub palette: Palette,

    /// Target render frames per second.
    #[arg(long, default_value = "30.0", value_name = "RATE")]
    pub frame_rate: f64,

    /// Write logs here (level from RUST_LOG, default info).
    #[arg(long, value_name = "FILE")]
    pub log_file: Option<PathBuf>,
}

impl Args {
    pub fn bag_seed(&self) -> u32 {
        self.seed.unwrap_or_else(|| {
            SystemTime::now()
                .duration_since(UNIX_EPOCH)
                .map(|d| d.subsec_nanos())
                .unwrap_or(0x1234_5678)
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum Palette {
    #[default]
    Normal,

    #[value(alias = "highcontrast", alias = "contrast")]
    HighContrast,

    #[value(alias = "colourblind")]
    Colorblind,
}
