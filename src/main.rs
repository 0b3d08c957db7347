//! Headless match runner (default binary).
//!
//! Replays a command script against a seeded session and prints the final board and
//! stats. Tokens are command names (`MOVE_LEFT`, `hardDrop`, ...) plus three extras:
//! `gravity` for one gravity step, `lock` to expire the lock delay, and
//! `use:<ITEM>:<row>:<col>` to fire an inventory item.

use std::str::FromStr;

use anyhow::{bail, Context, Result};
use clap::{Parser, ValueEnum};
use tracing::{info, Level};
use tracing_subscriber::prelude::*;

use blockfall::core::{Difficulty, GameModeConfig};
use blockfall::engine::GameSession;
use blockfall::types::{GameCommand, ItemKind};

#[derive(Debug, Copy, Clone, Eq, PartialEq, ValueEnum)]
#[value(rename_all = "kebab-case")]
enum Mode {
    Classic,
    Arcade,
    Hard,
    Relax,
}

impl Mode {
    fn config(self) -> GameModeConfig {
        match self {
            Mode::Classic => GameModeConfig::classic(),
            Mode::Arcade => GameModeConfig::arcade(),
            Mode::Hard => GameModeConfig::hard_mode(),
            Mode::Relax => GameModeConfig::relax_mode(),
        }
    }
}

#[derive(Debug, Parser)]
struct Cli {
    #[arg(short = 'v', long, action = clap::ArgAction::Count, help = "Increase verbosity level (default WARN, -v = INFO, -vv = DEBUG, -vvv = TRACE)")]
    verbose: u8,

    #[arg(long, default_value = "1", help = "Seed for pieces and items")]
    seed: u64,

    #[arg(long, value_enum, default_value = "classic", help = "Preset to play")]
    mode: Mode,

    #[arg(long, help = "Difficulty preset applied on top of the mode (EASY, NORMAL, HARD)")]
    difficulty: Option<String>,

    #[arg(long, help = "JSON game mode config; overrides --mode")]
    config: Option<String>,

    #[arg(long, help = "File with whitespace or comma separated commands")]
    script: Option<String>,

    #[arg(help = "Commands to run after the script")]
    commands: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Step {
    Command(GameCommand),
    Gravity,
    Lock,
    UseItem { kind: ItemKind, row: i8, col: i8 },
}

impl FromStr for Step {
    type Err = anyhow::Error;

    fn from_str(token: &str) -> Result<Self> {
        if token.eq_ignore_ascii_case("gravity") {
            return Ok(Step::Gravity);
        }
        if token.eq_ignore_ascii_case("lock") {
            return Ok(Step::Lock);
        }
        if let Some(rest) = token.strip_prefix("use:") {
            let parts: Vec<&str> = rest.split(':').collect();
            let [item, row, col] = parts.as_slice() else {
                bail!("expected use:<ITEM>:<row>:<col>, got {token:?}");
            };
            let kind = ItemKind::from_str(item).with_context(|| format!("unknown item {item:?}"))?;
            let row = row.parse().with_context(|| format!("bad row in {token:?}"))?;
            let col = col.parse().with_context(|| format!("bad column in {token:?}"))?;
            return Ok(Step::UseItem { kind, row, col });
        }
        GameCommand::from_str(token)
            .map(Step::Command)
            .with_context(|| format!("unknown command {token:?}"))
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let verbosity = cli.verbose.saturating_add(2).clamp(1, 5);
    let level = Level::from_str(verbosity.to_string().as_str())?;
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .with(tracing_subscriber::filter::LevelFilter::from_level(level))
        .init();

    let config = load_config(&cli)?;
    let steps = load_steps(&cli)?;
    info!(
        gameplay = ?config.gameplay_type,
        difficulty = config.difficulty.as_str(),
        drop_speed = config.effective_drop_speed(),
        lock_delay_ms = config.effective_lock_delay_ms(),
        seed = cli.seed,
        steps = steps.len(),
        "starting match"
    );

    let mut session = GameSession::seeded(config, cli.seed).context("invalid game mode config")?;
    for step in steps {
        if session.state().game_over {
            break;
        }
        match step {
            Step::Command(command) => {
                session.apply(command);
            }
            Step::Gravity => {
                session.gravity();
            }
            Step::Lock => {
                session.lock();
            }
            Step::UseItem { kind, row, col } => {
                let effect = session.use_item(kind, row, col);
                info!(success = effect.success, "{}", effect.message);
            }
        }
    }

    let state = session.state();
    print!("{}", state.board.render());
    println!("score: {}", state.score);
    println!("lines: {}", state.lines);
    println!("level: {}", state.level);
    println!("pieces: {}", state.piece_id);
    if !state.inventory.is_empty() {
        let held: Vec<&str> = state.inventory.iter().map(ItemKind::as_str).collect();
        println!("inventory: {}", held.join(", "));
    }
    if let Some(reason) = &state.game_over_reason {
        println!("game over: {reason}");
    }
    Ok(())
}

fn load_config(cli: &Cli) -> Result<GameModeConfig> {
    let config = match &cli.config {
        Some(path) => {
            let text = std::fs::read_to_string(path)
                .with_context(|| format!("failed to read config {path}"))?;
            serde_json::from_str(&text).with_context(|| format!("failed to parse config {path}"))?
        }
        None => cli.mode.config(),
    };
    Ok(match &cli.difficulty {
        Some(name) => config.with_difficulty(Difficulty::from_name(name)),
        None => config,
    })
}

fn load_steps(cli: &Cli) -> Result<Vec<Step>> {
    let mut tokens = Vec::new();
    if let Some(path) = &cli.script {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read script {path}"))?;
        tokens.extend(
            text.split(|c: char| c.is_whitespace() || c == ',')
                .filter(|t| !t.is_empty())
                .map(str::to_owned),
        );
    }
    tokens.extend(cli.commands.iter().cloned());
    tokens.iter().map(|t| t.parse()).collect()
}
