//! cubeclear — headless driver for the 3D cluster-clearing puzzle.

mod app;
mod input;
mod view;

use anyhow::Result;
use app::App;
use clap::{Parser, ValueEnum};
use cubeclear::{Color, DEFAULT_SIZE, GameConfig, Palette};
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| "cubeclear=warn".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    let config = args.game_config()?;
    let mut app = App::new(&config, args.format, args.quiet)?;
    app.run()?;
    Ok(())
}

/// 3D cluster-clearing puzzle, driven by text commands on stdin.
#[derive(Debug, Parser)]
#[command(
    name = "cubeclear",
    version,
    about = "3D cluster-clearing puzzle. Pick a cell to select its colour cluster, pick it again to remove it.",
    long_about = "cubeclear is the game core of a 3D cluster-clearing puzzle with a line-based driver.\n\n\
        The cube is SIZE x SIZE x SIZE coloured cells. Picking a cell selects every cell of the same \
        colour connected to it (diagonals count). Picking a selected cell again removes the cluster \
        for n^(n-1) points; the cells above fall down. Reach the target score to level up.\n\n\
        COMMANDS (one per line on stdin):\n  pick X Y Z (p)   remove (r)   clear (c)   reset\n  \
        show (s)   snapshot (json)   status   help (?)   quit (q)\n\n\
        Logging goes to stderr; set RUST_LOG=cubeclear=debug to trace selections and gravity."
)]
pub struct Args {
    /// Edge length of the cube.
    #[arg(short, long, default_value_t = DEFAULT_SIZE, value_name = "N")]
    pub size: usize,

    /// Seed for reproducible grids (reset draws from the same stream).
    #[arg(long, value_name = "U64")]
    pub seed: Option<u64>,

    /// Palette: colour names, letters or #rrggbb, comma-separated. Defaults to all six.
    #[arg(short, long, value_delimiter = ',', value_name = "COLOURS")]
    pub colors: Vec<Color>,

    /// Reply format: readable text or one JSON object per line.
    #[arg(short, long, default_value = "text")]
    pub format: OutputFormat,

    /// Text mode: do not print the cube after every command.
    #[arg(short, long)]
    pub quiet: bool,
}

impl Args {
    fn game_config(&self) -> Result<GameConfig> {
        let palette = if self.colors.is_empty() {
            Palette::default()
        } else {
            Palette::new(self.colors.clone())?
        };
        let config = GameConfig {
            size: self.size,
            palette,
            seed: self.seed,
        };
        config.validate()?;
        Ok(config)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Text,
    #[value(alias = "jsonl")]
    Json,
}
