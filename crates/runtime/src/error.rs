//! Errors surfaced by the engine loop.
//!
//! Expected refusals never show up here: the loop narrates them and moves
//! on. Everything in [`EngineError`] ends the round.
use thiserror::Error;

use delve_core::config::ConfigError;
use delve_core::state::SnapshotError;
use delve_core::{EntityId, ExecuteError, OracleError};

pub use crate::repository::RepositoryError;

pub type Result<T> = std::result::Result<T, EngineError>;

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("engine requires a content catalog before building")]
    MissingCatalog,

    #[error("invalid game configuration")]
    Config(#[from] ConfigError),

    #[error("no floor blueprint for depth {0}")]
    NoFloor(u32),

    #[error("failed to initialize game state from content")]
    InitialState(#[source] OracleError),

    #[error("action of {actor} failed")]
    Execute {
        actor: EntityId,
        #[source]
        source: ExecuteError,
    },

    #[error(transparent)]
    Snapshot(#[from] SnapshotError),

    #[error(transparent)]
    Repository(#[from] RepositoryError),
}
