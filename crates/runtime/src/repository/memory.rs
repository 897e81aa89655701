//! In-memory save repository for tests and throwaway runs.

use std::collections::BTreeMap;
use std::sync::RwLock;

use super::{RepositoryError, Result, SaveGame, SaveRepository};

#[derive(Default)]
pub struct InMemorySaveRepository {
    saves: RwLock<BTreeMap<String, SaveGame>>,
}

impl InMemorySaveRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SaveRepository for InMemorySaveRepository {
    fn save(&self, slot: &str, save: &SaveGame) -> Result<()> {
        let mut saves = self
            .saves
            .write()
            .map_err(|_| RepositoryError::LockPoisoned)?;
        saves.insert(slot.to_owned(), save.clone());
        Ok(())
    }

    fn load(&self, slot: &str) -> Result<Option<SaveGame>> {
        let saves = self
            .saves
            .read()
            .map_err(|_| RepositoryError::LockPoisoned)?;
        Ok(saves.get(slot).cloned())
    }

    fn exists(&self, slot: &str) -> bool {
        self.saves
            .read()
            .map(|saves| saves.contains_key(slot))
            .unwrap_or(false)
    }

    fn delete(&self, slot: &str) -> Result<()> {
        let mut saves = self
            .saves
            .write()
            .map_err(|_| RepositoryError::LockPoisoned)?;
        saves.remove(slot);
        Ok(())
    }

    fn list_slots(&self) -> Result<Vec<String>> {
        let saves = self
            .saves
            .read()
            .map_err(|_| RepositoryError::LockPoisoned)?;
        Ok(saves.keys().cloned().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use delve_core::{FloorState, GameState};

    #[test]
    fn stores_clones_per_slot() {
        let repo = InMemorySaveRepository::new();
        let state = GameState::new(5, FloorState::walled_room(1, 4, 4));
        repo.save("quick", &SaveGame::capture(&state)).unwrap();

        assert!(repo.exists("quick"));
        assert_eq!(repo.load("quick").unwrap().unwrap().state, state);
        assert_eq!(repo.list_slots().unwrap(), vec!["quick"]);
        assert_eq!(repo.load("other").unwrap(), None);
    }

    #[test]
    fn rejects_saves_from_other_layouts() {
        let state = GameState::new(5, FloorState::walled_room(1, 4, 4));
        let mut save = SaveGame::capture(&state);
        save.format_version = 99;
        assert!(matches!(
            save.into_state(),
            Err(RepositoryError::IncompatibleVersion { found: 99, .. })
        ));
    }
}
