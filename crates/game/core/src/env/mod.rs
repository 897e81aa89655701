//! Collaborators the rules depend on but do not implement.
//!
//! Oracles expose randomness, vision, content templates and floor
//! blueprints. The [`GameEnv`] aggregate bundles them so the engine can
//! access everything it needs without hard coupling to concrete
//! implementations; nothing here is a process-wide singleton.
mod actors;
mod error;
mod items;
mod map;
mod messages;
mod rng;
mod vision;

pub use actors::{ActorTemplate, ActorTemplateBuilder, CatalogOracle, FighterStats, StartingItem};
pub use error::OracleError;
pub use items::ItemTemplate;
pub use map::{FloorBlueprint, FloorOracle, SpawnKind, SpawnSpec};
pub use messages::{ColorTag, Message, MessageSink};
pub use rng::{Dice, PcgRng, RngOracle, compute_seed};
pub use vision::VisionOracle;

use crate::config::GameConfig;

/// Aggregates the read-only collaborators required by the action pipeline.
#[derive(Clone, Copy)]
pub struct GameEnv<'a> {
    config: &'a GameConfig,
    rng: &'a dyn RngOracle,
    vision: Option<&'a dyn VisionOracle>,
    catalog: Option<&'a dyn CatalogOracle>,
    floors: Option<&'a dyn FloorOracle>,
}

impl<'a> GameEnv<'a> {
    pub fn new(config: &'a GameConfig, rng: &'a dyn RngOracle) -> Self {
        Self {
            config,
            rng,
            vision: None,
            catalog: None,
            floors: None,
        }
    }

    #[must_use]
    pub fn with_vision(mut self, vision: &'a dyn VisionOracle) -> Self {
        self.vision = Some(vision);
        self
    }

    #[must_use]
    pub fn with_catalog(mut self, catalog: &'a dyn CatalogOracle) -> Self {
        self.catalog = Some(catalog);
        self
    }

    #[must_use]
    pub fn with_floors(mut self, floors: &'a dyn FloorOracle) -> Self {
        self.floors = Some(floors);
        self
    }

    pub fn config(&self) -> &'a GameConfig {
        self.config
    }

    pub fn rng(&self) -> &'a dyn RngOracle {
        self.rng
    }

    /// # Errors
    ///
    /// Returns `OracleError::VisionNotAvailable` if no vision oracle was provided.
    pub fn vision(&self) -> Result<&'a dyn VisionOracle, OracleError> {
        self.vision.ok_or(OracleError::VisionNotAvailable)
    }

    /// # Errors
    ///
    /// Returns `OracleError::CatalogNotAvailable` if no catalog was provided.
    pub fn catalog(&self) -> Result<&'a dyn CatalogOracle, OracleError> {
        self.catalog.ok_or(OracleError::CatalogNotAvailable)
    }

    /// # Errors
    ///
    /// Returns `OracleError::FloorsNotAvailable` if no floor oracle was provided.
    pub fn floors(&self) -> Result<&'a dyn FloorOracle, OracleError> {
        self.floors.ok_or(OracleError::FloorsNotAvailable)
    }
}

impl core::fmt::Debug for GameEnv<'_> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("GameEnv")
            .field("config", self.config)
            .field("vision", &self.vision.is_some())
            .field("catalog", &self.catalog.is_some())
            .field("floors", &self.floors.is_some())
            .finish()
    }
}
