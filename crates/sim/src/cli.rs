//! Command line arguments.
//!
//! Every flag can also come from a `DELVE_*` environment variable, which
//! `main` loads from a `.env` file first when one exists.
use std::path::PathBuf;

use clap::Parser;

/// Headless dungeon run driven by the autopilot
#[derive(Debug, Parser)]
#[command(name = "delve-sim")]
#[command(about = "Runs the dungeon simulation without a terminal UI", long_about = None)]
#[command(version)]
pub struct Args {
    /// Game seed; the same seed replays the same game
    #[arg(long, env = "DELVE_SEED", default_value_t = 0)]
    pub seed: u64,

    /// Maximum number of rounds to play
    #[arg(long, env = "DELVE_ROUNDS", default_value_t = 500)]
    pub rounds: u64,

    /// Content directory (defaults to the bundled data)
    #[arg(long, env = "DELVE_DATA_DIR", value_name = "DIR")]
    pub data_dir: Option<PathBuf>,

    /// Directory for save files; enables saving at the end of the run
    #[arg(long, env = "DELVE_SAVE_DIR", value_name = "DIR")]
    pub save_dir: Option<PathBuf>,

    /// Save slot used for saving and resuming
    #[arg(long, env = "DELVE_SLOT", default_value = "autosave")]
    pub slot: String,

    /// Continue from the save slot instead of starting a new game
    #[arg(long, requires = "save_dir")]
    pub resume: bool,

    /// Write the final game state as pretty JSON
    #[arg(long, value_name = "FILE")]
    pub dump_json: Option<PathBuf>,

    /// Write the final game state as a binary snapshot
    #[arg(long, value_name = "FILE")]
    pub snapshot: Option<PathBuf>,

    /// Do not print narration lines
    #[arg(short, long)]
    pub quiet: bool,
}
