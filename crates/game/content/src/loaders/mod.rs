//! Content loaders for reading game data from files.
//!
//! This module provides loaders that convert RON/TOML files into templates,
//! floor blueprints and the game configuration. [`ContentFactory`] ties them
//! together into a validated [`crate::Catalog`].

pub mod actors;
pub mod config;
pub mod factory;
pub mod item;
pub mod map;

pub use actors::{ActorLoader, StartingItemRef};
pub use config::ConfigLoader;
pub use factory::{ContentFactory, DungeonManifest};
pub use item::ItemLoader;
pub use map::{FloorPrefab, MapLoader};

use std::path::Path;

/// Common result type for loaders.
pub type LoadResult<T> = anyhow::Result<T>;

/// Helper function to read file contents.
pub(crate) fn read_file(path: &Path) -> LoadResult<String> {
    std::fs::read_to_string(path)
        .map_err(|e| anyhow::anyhow!("Failed to read file {}: {}", path.display(), e))
}
