//! Content factory for building the catalog from data files.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use delve_core::{ActorTemplate, FloorBlueprint, GameConfig, ItemTemplate};
use serde::{Deserialize, Serialize};

use crate::catalog::Catalog;
use crate::loaders::{ActorLoader, ConfigLoader, ItemLoader, LoadResult, MapLoader, read_file};

/// Floor order of the dungeon, entrance first.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DungeonManifest {
    pub floors: Vec<String>,
}

/// Content factory that loads all game content from a data directory.
///
/// # Directory Structure
///
/// ```text
/// data_dir/
/// ├── config.toml
/// ├── items.ron
/// ├── actors.ron
/// ├── dungeon.ron
/// └── floors/
///     ├── entrance.ron
///     └── crypt.ron
/// ```
pub struct ContentFactory {
    data_dir: PathBuf,
}

impl ContentFactory {
    /// Creates a new content factory pointing to a data directory.
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    /// Factory over the data directory shipped with this crate.
    pub fn bundled() -> Self {
        Self::new(concat!(env!("CARGO_MANIFEST_DIR"), "/data"))
    }

    /// Load game configuration from `config.toml`.
    pub fn load_config(&self) -> LoadResult<GameConfig> {
        let path = self.data_dir.join("config.toml");
        ConfigLoader::load(&path)
    }

    /// Load item templates from `items.ron`.
    pub fn load_items(&self) -> LoadResult<BTreeMap<String, ItemTemplate>> {
        let path = self.data_dir.join("items.ron");
        ItemLoader::load(&path)
    }

    /// Load actor templates from `actors.ron`, resolving starting items
    /// against `items`.
    pub fn load_actors(
        &self,
        items: &BTreeMap<String, ItemTemplate>,
    ) -> LoadResult<Vec<(String, ActorTemplate)>> {
        let path = self.data_dir.join("actors.ron");
        ActorLoader::load(&path, items)
    }

    /// Load a single floor from `floors/{floor_name}.ron`.
    pub fn load_floor(&self, floor_name: &str) -> LoadResult<FloorBlueprint> {
        let path = self.data_dir.join("floors").join(format!("{}.ron", floor_name));
        MapLoader::load(&path)
    }

    /// Load every floor listed in `dungeon.ron`, entrance first.
    pub fn load_floors(&self) -> LoadResult<Vec<FloorBlueprint>> {
        let path = self.data_dir.join("dungeon.ron");
        let content = read_file(&path)?;
        let manifest: DungeonManifest = ron::from_str(&content)
            .map_err(|e| anyhow::anyhow!("Failed to parse dungeon manifest RON: {}", e))?;
        if manifest.floors.is_empty() {
            anyhow::bail!("Dungeon manifest lists no floors");
        }
        manifest
            .floors
            .iter()
            .map(|name| self.load_floor(name))
            .collect()
    }

    /// Loads items, actors and floors into a validated catalog.
    pub fn load_catalog(&self) -> LoadResult<Catalog> {
        let items = self.load_items()?;
        let actors = self.load_actors(&items)?;
        let floors = self.load_floors()?;

        let mut catalog = Catalog::new();
        for (key, template) in items {
            catalog.insert_item(key, template);
        }
        for (key, template) in actors {
            catalog.insert_actor(key, template);
        }
        for floor in floors {
            catalog.push_floor(floor);
        }
        catalog
            .validate()
            .map_err(|e| anyhow::anyhow!("Content in {} is inconsistent: {}", self.data_dir.display(), e))?;

        tracing::info!(
            data_dir = %self.data_dir.display(),
            depths = catalog.depth_count(),
            "content loaded"
        );
        Ok(catalog)
    }

    /// Returns the data directory path.
    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }
}
