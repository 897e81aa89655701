//! Headless dungeon runner.
//!
//! Composition root that assembles content, the engine and an autopilot
//! player, then plays rounds until the game ends or the round limit is hit.
//!
//! # Examples
//!
//! ```bash
//! # Fixed seed, quiet, dump the final state
//! cargo run -p delve-sim -- --seed 42 --quiet --dump-json final.json
//!
//! # Save after the run, then continue later
//! cargo run -p delve-sim -- --save-dir saves --rounds 100
//! cargo run -p delve-sim -- --save-dir saves --resume --rounds 100
//! ```

mod autopilot;
mod cli;
mod console;

use std::fs::File;
use std::io::BufWriter;

use anyhow::{Context, Result};
use clap::Parser;
use delve_content::ContentFactory;
use delve_runtime::{Engine, FileSaveRepository};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::filter::LevelFilter;

use crate::autopilot::Autopilot;
use crate::cli::Args;
use crate::console::ConsoleSink;

fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let args = Args::parse();
    setup_logging();

    // 1. Content
    let factory = match &args.data_dir {
        Some(dir) => ContentFactory::new(dir),
        None => ContentFactory::bundled(),
    };
    let config = factory.load_config()?;
    let catalog = factory.load_catalog()?;

    // 2. Engine
    let sink = ConsoleSink::new(config.message_capacity, !args.quiet);
    let mut engine = Engine::builder(sink)
        .config(config)
        .catalog(catalog)
        .seed(args.seed)
        .build()
        .context("failed to build the engine")?;

    // 3. Optional save slot
    let repository = args
        .save_dir
        .as_ref()
        .map(FileSaveRepository::new)
        .transpose()
        .context("failed to open the save directory")?;
    if args.resume {
        if let Some(repository) = &repository {
            if !engine.load(repository, &args.slot)? {
                tracing::warn!(slot = %args.slot, "no save found, starting a new game");
            }
        }
    }

    // 4. Play
    tracing::info!(seed = args.seed, rounds = args.rounds, "starting run");
    let mut pilot = Autopilot::default();
    let mut played = 0;
    while played < args.rounds && !engine.is_game_over() {
        engine.run_round(&mut pilot)?;
        played += 1;
    }

    let state = engine.state();
    match state.player() {
        Some(player) => tracing::info!(
            rounds = played,
            depth = state.floor().depth,
            level = player.level.current_level,
            hp = player.fighter.hp(),
            alive = player.alive,
            victory = state.victory,
            "run finished"
        ),
        None => tracing::warn!(rounds = played, "run finished without a player"),
    }

    // 5. Outputs
    if let Some(repository) = &repository {
        engine.save(repository, &args.slot)?;
    }
    if let Some(path) = &args.dump_json {
        let file = File::create(path)
            .with_context(|| format!("failed to create {}", path.display()))?;
        serde_json::to_writer_pretty(BufWriter::new(file), engine.state())?;
        tracing::info!(path = %path.display(), "state written as json");
    }
    if let Some(path) = &args.snapshot {
        std::fs::write(path, engine.snapshot()?)
            .with_context(|| format!("failed to write {}", path.display()))?;
        tracing::info!(path = %path.display(), "snapshot written");
    }
    tracing::debug!(messages = engine.sink().log().len(), "narration kept");

    Ok(())
}

/// Logs go to stderr so narration on stdout stays clean. `RUST_LOG`
/// overrides the default `info` level.
fn setup_logging() {
    let filter = EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy();
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}
