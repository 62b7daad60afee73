use std::fs::File;
use std::panic;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use anyhow::{Context, Result};
use clap::Parser;
use grid_snake::config::GameConfig;
use grid_snake::game::{GameState, GameStatus};
use grid_snake::governor::FrameGovernor;
use grid_snake::input::InputHandler;
use grid_snake::score::ScoreBoard;
use grid_snake::terminal_runtime::{TerminalSession, restore_terminal};
use grid_snake::ui::hud::HudInfo;
use tracing::info;

#[derive(Debug, Parser)]
#[command(version, about)]
struct Cli {
    /// JSON config file; defaults to the per-user config when present.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Grid width in cells.
    #[arg(long)]
    width: Option<u16>,

    /// Grid height in cells.
    #[arg(long)]
    height: Option<u16>,

    /// Simulation ticks per second.
    #[arg(long)]
    tps: Option<u32>,

    /// Seed for item placement, for reproducible games.
    #[arg(long)]
    seed: Option<u64>,

    /// Write logs to this file (the terminal is taken by the game).
    #[arg(long = "log-file")]
    log_file: Option<PathBuf>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    if let Some(path) = &cli.log_file {
        init_tracing(path)?;
    }

    let config = load_config(&cli)?;

    let state = match cli.seed {
        Some(seed) => GameState::new_with_seed(config, seed),
        None => GameState::new(config),
    }
    .context("invalid configuration")?;

    install_panic_hook();

    let (score, scores) = run(state)?;
    println!(
        "Game ended. Final score: {score}, high score: {}",
        scores.high_score()
    );
    Ok(())
}

fn init_tracing(path: &Path) -> Result<()> {
    let file = File::create(path)
        .with_context(|| format!("failed to create log file {}", path.display()))?;

    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_ansi(false)
        .with_writer(Mutex::new(file))
        .try_init();
    Ok(())
}

fn load_config(cli: &Cli) -> Result<GameConfig> {
    let mut config = match &cli.config {
        Some(path) => GameConfig::load(path)?,
        None => GameConfig::load_default()?,
    };

    if let Some(width) = cli.width {
        config.grid.width = width;
    }
    if let Some(height) = cli.height {
        config.grid.height = height;
    }
    if let Some(tps) = cli.tps {
        config.ticks_per_second = tps;
    }

    Ok(config)
}

/// Drives input, tick, draw and pacing until the player quits.
///
/// Returns the last game's score and the session's score board.
fn run(mut state: GameState) -> Result<(u32, ScoreBoard)> {
    let mut session = TerminalSession::enter().context("failed to set up terminal")?;
    let mut input = InputHandler::new();
    let mut governor = FrameGovernor::new(state.config().ticks_per_second);
    let mut scores = ScoreBoard::new();

    info!(config = ?state.config(), "game loop started");

    let mut snapshot = state.snapshot();
    loop {
        let frame_input = input.drain().context("failed to read input")?;
        if frame_input.quit {
            break;
        }

        if frame_input.restart && state.is_over() {
            state.reset();
        }
        if let Some(direction) = frame_input.direction {
            state.handle_input(direction);
        }

        let was_over = state.is_over();
        // Nothing moves until the player picks a first direction.
        snapshot = if state.status == GameStatus::Ready {
            state.snapshot()
        } else {
            state.tick()
        };

        if !was_over && snapshot.status == GameStatus::GameOver && scores.record(snapshot.score) {
            info!(high_score = scores.high_score(), "new high score");
        }

        session
            .draw(
                &snapshot,
                HudInfo {
                    high_score: scores.high_score(),
                },
            )
            .context("failed to draw frame")?;

        governor.wait();
    }

    Ok((snapshot.score, scores))
}

fn install_panic_hook() {
    let default_hook = panic::take_hook();

    panic::set_hook(Box::new(move |panic_info| {
        restore_terminal();
        default_hook(panic_info);
    }));
}
