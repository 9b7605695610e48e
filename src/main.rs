//! tetrotui — classic falling-piece puzzle game in the terminal.

mod app;
mod game;
mod input;
mod pieces;
mod theme;
mod ui;

use anyhow::Result;
use app::App;
use clap::Parser;
use pieces::PieceKind;
use std::time::Duration;

/// Options derived from the CLI that drive a game session.
#[derive(Debug, Clone)]
pub struct GameConfig {
    pub width: usize,
    pub height: usize,
    pub tick: Duration,
    pub reset_delay: Duration,
    pub first_piece: Option<PieceKind>,
}

fn main() -> Result<()> {
    let args = Args::parse();
    let theme = theme::Theme::load(args.theme.as_deref()).unwrap_or_default();
    let config = GameConfig {
        // A playfield narrower or shorter than the widest piece matrix would
        // end every session on spawn.
        width: args.width.max(4) as usize,
        height: args.height.max(4) as usize,
        tick: Duration::from_millis(args.tick_ms),
        reset_delay: Duration::from_millis(args.reset_delay_ms),
        first_piece: args.first_piece,
    };
    let mut app = App::new(config, theme);
    app.run()?;
    Ok(())
}

/// Classic falling-piece puzzle game in the terminal.
#[derive(Debug, Parser)]
#[command(
    name = "tetrotui",
    version,
    about = "Classic falling-piece puzzle in the terminal. Stack tetrominoes and clear full rows.",
    long_about = "Tetrotui is a terminal rendition of the classic falling-piece puzzle.\n\n\
        Pieces fall at a fixed tick; steer them into place and clear complete rows.\n\n\
        CONTROLS:\n  Left/Right (h/l)  Move    Up (k/x)  Rotate CW   z  Rotate CCW\n  Down (j)  Soft drop    P  Pause menu    Q / Esc  Quit\n\n\
        While paused, Up/Down pick Resume or Reset and Enter confirms. Use --theme to load a btop-style theme file."
)]
pub struct Args {
    /// Playfield width in columns.
    #[arg(long, default_value = "12", value_name = "COLS")]
    pub width: u16,

    /// Playfield height in rows.
    #[arg(long, default_value = "20", value_name = "ROWS")]
    pub height: u16,

    /// Gravity tick period in ms (one automatic downward step).
    #[arg(long, default_value = "1000", value_name = "MS")]
    pub tick_ms: u64,

    /// Delay in ms between selecting Reset and the fresh session starting.
    #[arg(long, default_value = "1500", value_name = "MS")]
    pub reset_delay_ms: u64,

    /// Force the first piece of each session for practice (one of O I Z S L J T).
    #[arg(long, value_name = "SYMBOL", value_parser = parse_piece_symbol)]
    pub first_piece: Option<PieceKind>,

    /// Path to theme file (btop-style theme[key]="value"). Uses the classic
    /// palette if not set.
    #[arg(short, long, value_name = "FILE")]
    pub theme: Option<std::path::PathBuf>,
}

fn parse_piece_symbol(s: &str) -> Result<PieceKind, String> {
    let mut chars = s.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) => PieceKind::from_symbol(c.to_ascii_uppercase())
            .ok_or_else(|| format!("unknown piece symbol: {s}")),
        _ => Err(format!("unknown piece symbol: {s}")),
    }
}
