//! Runtime orchestration for the deterministic dungeon simulation.
//!
//! This crate wires the pure rules of `delve-core` to the collaborators they
//! leave open: the round loop that owns the energy scheduler, the monster
//! behaviours, a grid field-of-view and pathfinding oracle, the narration
//! log and save files. Consumers embed [`Engine`] and feed it a
//! [`DecisionSource`] for the player.
//!
//! Modules are organized by responsibility:
//! - [`engine`] hosts the round loop and its builder
//! - [`decision`] defines how player intent enters the loop
//! - [`ai`] implements the monster behaviours
//! - [`vision`] provides field of view, line of sight and paths
//! - [`log`] and [`narration`] turn events into user-visible lines
//! - [`selection`] validates raw inventory input
//! - [`repository`] persists whole-game saves
pub mod ai;
pub mod decision;
pub mod engine;
pub mod error;
pub mod log;
pub mod narration;
pub mod repository;
pub mod selection;
pub mod vision;

pub use decision::{DecisionContext, DecisionSource, ScriptedDecisions, WaitDecisions};
pub use engine::{Activation, Engine, EngineBuilder};
pub use error::{EngineError, Result};
pub use log::MessageLog;
pub use repository::{
    FileSaveRepository, InMemorySaveRepository, RepositoryError, SaveGame, SaveRepository,
};
pub use selection::SelectionError;
pub use vision::GridVision;
