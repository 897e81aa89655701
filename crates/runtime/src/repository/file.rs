//! File-based save repository.

use std::fs;
use std::path::{Path, PathBuf};

use super::{RepositoryError, Result, SaveGame, SaveRepository};

const EXTENSION: &str = "sav";

/// Stores each slot as `{slot}.sav` (bincode) inside one directory.
///
/// Writes go to a temporary file first and are renamed into place, so a
/// crash mid-save never leaves a truncated slot behind.
pub struct FileSaveRepository {
    base_dir: PathBuf,
}

impl FileSaveRepository {
    pub fn new(base_dir: impl AsRef<Path>) -> Result<Self> {
        let base_dir = base_dir.as_ref().to_path_buf();
        fs::create_dir_all(&base_dir)?;
        Ok(Self { base_dir })
    }

    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    fn slot_path(&self, slot: &str) -> Result<PathBuf> {
        let valid = !slot.is_empty()
            && slot
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
        if !valid {
            return Err(RepositoryError::InvalidSlot(slot.to_owned()));
        }
        Ok(self.base_dir.join(format!("{slot}.{EXTENSION}")))
    }
}

impl SaveRepository for FileSaveRepository {
    fn save(&self, slot: &str, save: &SaveGame) -> Result<()> {
        let path = self.slot_path(slot)?;
        let temp_path = path.with_extension("sav.tmp");

        let bytes =
            bincode::serialize(save).map_err(|e| RepositoryError::Serialization(e.to_string()))?;
        fs::write(&temp_path, bytes)?;
        fs::rename(&temp_path, &path)?;

        tracing::debug!(slot, round = save.round, path = %path.display(), "saved game");
        Ok(())
    }

    fn load(&self, slot: &str) -> Result<Option<SaveGame>> {
        let path = self.slot_path(slot)?;
        if !path.exists() {
            return Ok(None);
        }

        let bytes = fs::read(&path)?;
        let save: SaveGame = bincode::deserialize(&bytes)
            .map_err(|e| RepositoryError::Serialization(e.to_string()))?;

        tracing::debug!(slot, round = save.round, "loaded game");
        Ok(Some(save))
    }

    fn exists(&self, slot: &str) -> bool {
        self.slot_path(slot).is_ok_and(|path| path.exists())
    }

    fn delete(&self, slot: &str) -> Result<()> {
        let path = self.slot_path(slot)?;
        if path.exists() {
            fs::remove_file(&path)?;
            tracing::debug!(slot, "deleted save");
        }
        Ok(())
    }

    fn list_slots(&self) -> Result<Vec<String>> {
        let mut slots = Vec::new();
        for entry in fs::read_dir(&self.base_dir)? {
            let path = entry?.path();
            if path.extension().and_then(|ext| ext.to_str()) == Some(EXTENSION)
                && let Some(stem) = path.file_stem().and_then(|stem| stem.to_str())
            {
                slots.push(stem.to_owned());
            }
        }
        slots.sort_unstable();
        Ok(slots)
    }
}
