//! Persistence for whole-game saves.
//!
//! Repositories store [`SaveGame`] records under string slots. The rules
//! never see them: the engine captures a save from its state and restores
//! the state from a loaded one.

mod error;
mod file;
mod memory;

pub use error::{RepositoryError, Result};
pub use file::FileSaveRepository;
pub use memory::InMemorySaveRepository;

use delve_core::GameState;

/// Save file layout version. Bumped whenever `GameState` changes shape.
pub const SAVE_FORMAT_VERSION: u32 = 1;

/// One saved game with enough metadata to list it without decoding
/// everything twice.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct SaveGame {
    pub format_version: u32,
    pub round: u64,
    pub depth: u32,
    pub state: GameState,
}

impl SaveGame {
    pub fn capture(state: &GameState) -> Self {
        Self {
            format_version: SAVE_FORMAT_VERSION,
            round: state.turn.round,
            depth: state.floor().depth,
            state: state.clone(),
        }
    }

    /// # Errors
    ///
    /// Returns `RepositoryError::IncompatibleVersion` for saves written by
    /// another layout version.
    pub fn into_state(self) -> Result<GameState> {
        if self.format_version != SAVE_FORMAT_VERSION {
            return Err(RepositoryError::IncompatibleVersion {
                found: self.format_version,
                expected: SAVE_FORMAT_VERSION,
            });
        }
        Ok(self.state)
    }
}

/// Storage for saved games, keyed by slot name.
pub trait SaveRepository: Send + Sync {
    fn save(&self, slot: &str, save: &SaveGame) -> Result<()>;

    /// `None` when the slot was never written.
    fn load(&self, slot: &str) -> Result<Option<SaveGame>>;

    fn exists(&self, slot: &str) -> bool;

    fn delete(&self, slot: &str) -> Result<()>;

    /// Slot names, sorted.
    fn list_slots(&self) -> Result<Vec<String>> {
        Ok(vec![])
    }
}
