//! Data-driven content definitions and loaders.
//!
//! This crate turns data files into the templates and floor blueprints the
//! rules consume:
//! - Item templates (RON)
//! - Actor templates with their starting kit (RON)
//! - Floor prefabs drawn as ASCII rows (RON)
//! - Game configuration (TOML)
//!
//! Everything ends up in a [`Catalog`], which implements the core's
//! catalog and floor oracles. Content never appears in game state; spawning
//! always builds fresh instances from the immutable templates held here.

pub mod catalog;

#[cfg(feature = "loaders")]
pub mod loaders;

pub use catalog::Catalog;

#[cfg(feature = "loaders")]
pub use loaders::{ActorLoader, ConfigLoader, ContentFactory, ItemLoader, MapLoader};
