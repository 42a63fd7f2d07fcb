//! Terminal host for the Zen Garden simulation.
//!
//! Wires the garden controller to a wall clock, a file-backed save, and a
//! line-oriented text interface.
//!
//! # Startup Sequence
//!
//! 1. Load configuration from `zengarden.yaml` (or the path in
//!    `ZENGARDEN_CONFIG`, or the first argument)
//! 2. Initialize structured logging (tracing) on stderr
//! 3. Open the garden from the save directory
//! 4. Run the loop: a periodic growth tick plus one command per input line
//! 5. Exit on `quit`, end of input, or Ctrl-C

mod command;
mod error;
mod render;

use std::path::PathBuf;
use std::time::Duration;

use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::time::MissedTickBehavior;
use tracing::{debug, info, warn};
use tracing_subscriber::EnvFilter;

use zengarden_core::config::LoggingConfig;
use zengarden_core::{FileStore, Garden, GameConfig, StateStore};
use zengarden_types::EpochMillis;

use crate::command::{Command, HELP};
use crate::error::EngineError;

/// Default configuration file, relative to the working directory.
const DEFAULT_CONFIG_PATH: &str = "zengarden.yaml";

/// Application entry point.
///
/// # Errors
///
/// Returns an error if configuration is invalid or the terminal fails.
#[tokio::main]
async fn main() -> Result<(), EngineError> {
    // 1. Load configuration.
    let (config, config_path) = load_config()?;

    // 2. Initialize structured logging.
    init_logging(&config.logging);
    info!("zengarden starting");
    match &config_path {
        Some(path) => info!(path = %path.display(), "Configuration loaded"),
        None => info!("Config file not found, using defaults"),
    }

    // 3. Open the garden.
    let tick_interval_ms = config.garden.tick_interval_ms;
    let store = FileStore::new(config.persistence.save_dir.clone());
    info!(
        save_dir = %store.dir().display(),
        key = config.persistence.key,
        tick_interval_ms,
        restock_interval_ms = config.garden.restock_interval_ms,
        "Opening garden"
    );
    let mut garden = Garden::open(config, store, now_millis())?;
    print_notices(&mut garden);
    println!("{}", render::render(&garden.snapshot(now_millis()), garden.catalog()));
    println!("Type `help` for commands.");

    // 4. Run the loop.
    let mut ticker = tokio::time::interval(Duration::from_millis(tick_interval_ms));
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    loop {
        tokio::select! {
            _ = ticker.tick() => {
                let summary = garden.tick(now_millis());
                if summary.restocked || !summary.grown.is_empty() {
                    print_notices(&mut garden);
                }
            }
            line = lines.next_line() => {
                let Some(line) = line? else {
                    debug!("Input closed");
                    break;
                };
                if handle_line(&mut garden, &line)? == Flow::Quit {
                    break;
                }
            }
            _ = tokio::signal::ctrl_c() => {
                info!("Interrupted");
                break;
            }
        }
    }

    // 5. Shut down.
    if let Some(err) = garden.last_save_error() {
        warn!(error = %err, "Last save did not succeed");
    }
    info!(money = garden.state().money, "zengarden shutdown complete");
    Ok(())
}

/// Whether the loop keeps going after a line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Flow {
    Continue,
    Quit,
}

/// Parse and run one line of player input.
fn handle_line<S: StateStore>(garden: &mut Garden<S>, line: &str) -> Result<Flow, EngineError> {
    if line.trim().is_empty() {
        return Ok(Flow::Continue);
    }
    let command = match line.parse::<Command>() {
        Ok(command) => command,
        Err(err) => {
            println!("{err}. Type `help` for commands.");
            return Ok(Flow::Continue);
        }
    };

    let now = now_millis();
    match command {
        Command::Action(action) => {
            if let Err(err) = action.apply(garden, now) {
                debug!(error = %err, ?action, "Action rejected");
            }
            print_notices(garden);
            println!("{}", render::render(&garden.snapshot(now), garden.catalog()));
        }
        Command::Show => println!("{}", render::render(&garden.snapshot(now), garden.catalog())),
        Command::Json => println!("{}", serde_json::to_string_pretty(&garden.snapshot(now))?),
        Command::Help => println!("{HELP}"),
        Command::Quit => return Ok(Flow::Quit),
    }
    Ok(Flow::Continue)
}

fn print_notices<S: StateStore>(garden: &mut Garden<S>) {
    let notices = garden.drain_notices();
    if !notices.is_empty() {
        println!("{}", render::render_notices(&notices));
    }
}

/// Wall-clock time in epoch milliseconds.
fn now_millis() -> EpochMillis {
    EpochMillis::try_from(chrono::Utc::now().timestamp_millis()).unwrap_or(0)
}

/// Initialize the tracing subscriber. `RUST_LOG` overrides the configured
/// level.
fn init_logging(config: &LoggingConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.level));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(true);
    if config.json {
        builder.json().init();
    } else {
        builder.init();
    }
}

/// Load the game configuration.
///
/// Returns the path it was read from, or `None` when no file exists and
/// defaults are used.
fn load_config() -> Result<(GameConfig, Option<PathBuf>), EngineError> {
    let path = std::env::var_os("ZENGARDEN_CONFIG")
        .map(PathBuf::from)
        .or_else(|| std::env::args_os().nth(1).map(PathBuf::from))
        .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_PATH));
    if path.exists() {
        let config = GameConfig::from_file(&path)?;
        Ok((config, Some(path)))
    } else {
        Ok((GameConfig::default(), None))
    }
}
