//! Replays recorded controller and world state through the automation layer.
//!
//! Usage:
//!   hubshot-replay [--config config.json] [--level debug] demos/seek_and_shoot.json
//!
//! The scenario is a JSON array of ticks, each `{ "dt_ms": 10, "gamepad": {..}, "world": {..} }`.
//! Every field is optional. One output frame is printed to stdout per tick, as a JSON line.

mod logger;

use std::{
    fs,
    io::{BufWriter, Write},
    path::{Path, PathBuf},
    time::Duration,
};

use anyhow::{Context, Result};
use clap::Parser;
use hubshot::prelude::*;
use log::{LevelFilter, info, warn};
use serde::Deserialize;

#[derive(Parser)]
#[command(name = "hubshot-replay")]
#[command(about = "Replay gamepad and world recordings through the hubshot automation layer")]
struct Args {
    /// Path to a JSON automation config. Defaults are used when omitted.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Path to the JSON scenario to replay.
    scenario: PathBuf,

    /// Minimum log level written to stderr.
    #[arg(long, default_value = "info")]
    level: LevelFilter,
}

/// One recorded control-loop tick.
#[derive(Debug, Deserialize)]
struct Tick {
    /// Time since the previous tick. Falls back to the configured tick interval.
    #[serde(default)]
    dt_ms: Option<u64>,
    #[serde(default)]
    gamepad: GamepadState,
    #[serde(default)]
    world: WorldState,
}

fn load_config(path: Option<&Path>) -> Result<AssistConfig> {
    let Some(path) = path else {
        return Ok(AssistConfig::default());
    };

    let text = fs::read_to_string(path)
        .with_context(|| format!("failed reading config {}", path.display()))?;

    AssistConfig::from_json(&text)
        .inspect_err(|error| warn!("Rejected config {}: {error}", path.display()))
        .with_context(|| format!("invalid config {}", path.display()))
}

fn load_scenario(path: &Path) -> Result<Vec<Tick>> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("failed reading scenario {}", path.display()))?;

    serde_json::from_str(&text).with_context(|| format!("invalid scenario {}", path.display()))
}

fn main() -> Result<()> {
    let args = Args::parse();
    logger::init(args.level).context("failed installing logger")?;

    let config = load_config(args.config.as_deref())?;
    let ticks = load_scenario(&args.scenario)?;
    let default_dt = config.tick_interval();

    let mut orchestrator = Orchestrator::new(&config).context("failed building automation")?;

    info!(
        "Replaying {} ticks from {} in {} mode",
        ticks.len(),
        args.scenario.display(),
        orchestrator.cargo_mode()
    );

    let mut out = BufWriter::new(std::io::stdout().lock());

    for tick in &ticks {
        let dt = tick.dt_ms.map_or(default_dt, Duration::from_millis);
        let frame = orchestrator.tick(dt, &tick.gamepad, &tick.world);

        serde_json::to_writer(&mut out, &frame).context("failed encoding frame")?;
        writeln!(out).context("failed writing frame")?;
    }

    out.flush().context("failed flushing output")?;

    info!(
        "Finished in {} mode, climb phase {:?}",
        orchestrator.cargo_mode(),
        orchestrator.climb_phase()
    );

    Ok(())
}
