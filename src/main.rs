use std::io::{self, BufWriter, Write};
use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;
use torus_snake::config::{self, ConfigError, ConfigOverrides, GameConfig};
use torus_snake::game::SimulationEngine;
use torus_snake::input::{poll_input, GameInput};
use torus_snake::logging::{self, LogSink};
use torus_snake::scheduler::TickScheduler;
use torus_snake::terminal_runtime::TerminalSession;
use tracing::info;

const FRAME_INTERVAL: Duration = Duration::from_millis(16);

#[derive(Debug, Parser)]
#[command(version, about)]
struct Cli {
    /// Board width in cells.
    #[arg(long)]
    width: Option<u16>,

    /// Board height in cells.
    #[arg(long)]
    height: Option<u16>,

    /// Ticks per second.
    #[arg(long)]
    fps: Option<u32>,

    /// Body length at the start of every round.
    #[arg(long = "length")]
    starting_length: Option<usize>,

    /// Seed for food placement.
    #[arg(long)]
    seed: Option<u64>,

    /// Config file to read instead of the default location.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Append log output to this file.
    #[arg(long = "log-file")]
    log_file: Option<PathBuf>,

    /// Run this many ticks without a terminal and print each snapshot as JSON.
    #[arg(long, value_name = "TICKS")]
    headless: Option<u64>,
}

impl Cli {
    fn overrides(&self) -> ConfigOverrides {
        ConfigOverrides {
            width: self.width,
            height: self.height,
            fps: self.fps,
            starting_length: self.starting_length,
            seed: self.seed,
        }
    }
}

fn main() -> io::Result<()> {
    let cli = Cli::parse();

    let sink = match (&cli.log_file, cli.headless) {
        (Some(path), _) => LogSink::File(path),
        (None, Some(_)) => LogSink::Stderr,
        (None, None) => LogSink::Discard,
    };
    logging::init(sink)?;

    let config = resolve_config(&cli).map_err(invalid_input)?;
    let engine = SimulationEngine::new(config).map_err(invalid_input)?;
    info!(?config, "configuration loaded");

    match cli.headless {
        Some(ticks) => run_headless(engine, ticks),
        None => run_interactive(engine, config.tick_period()),
    }
}

fn resolve_config(cli: &Cli) -> Result<GameConfig, ConfigError> {
    let file_overrides = match &cli.config {
        Some(path) => config::load_overrides(path)?,
        None => config::load_default_overrides()?,
    };

    let mut config = GameConfig::default();
    config.apply(&file_overrides);
    config.apply(&cli.overrides());
    config.validate()?;
    Ok(config)
}

fn run_headless(mut engine: SimulationEngine, ticks: u64) -> io::Result<()> {
    let mut out = BufWriter::new(io::stdout().lock());

    for _ in 0..ticks {
        engine.step();
        serde_json::to_writer(&mut out, &engine.snapshot())?;
        out.write_all(b"\n")?;
    }

    out.flush()
}

fn run_interactive(engine: SimulationEngine, period: Duration) -> io::Result<()> {
    let mut session = TerminalSession::enter()?;
    let scheduler = TickScheduler::spawn(engine, period)?;

    loop {
        session.draw(&scheduler.snapshot())?;

        match poll_input(FRAME_INTERVAL)? {
            Some(GameInput::Quit) => break,
            Some(GameInput::Direction(direction)) => scheduler.request_heading(direction),
            None => {}
        }
    }

    if let Some(engine) = scheduler.shutdown() {
        info!(score = engine.score(), "game closed");
    }
    Ok(())
}

fn invalid_input(error: ConfigError) -> io::Error {
    io::Error::new(io::ErrorKind::InvalidInput, error)
}
