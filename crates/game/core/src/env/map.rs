//! Floor blueprints supplied by the map generator.
//!
//! Generation algorithms are out of scope for the rules; a [`FloorOracle`]
//! hands over a finished grid plus the entities to place on it.

use crate::state::{Position, TileFlags};

#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SpawnKind {
    Actor(String),
    Item(String),
}

#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SpawnSpec {
    pub position: Position,
    pub kind: SpawnKind,
}

#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FloorBlueprint {
    pub name: String,
    pub width: u32,
    pub height: u32,
    /// Row-major, `width * height` entries.
    pub tiles: Vec<TileFlags>,
    pub upstairs: Option<Position>,
    pub downstairs: Option<Position>,
    /// Where the player appears when the game starts on this floor.
    pub player_start: Option<Position>,
    pub spawns: Vec<SpawnSpec>,
}

pub trait FloorOracle {
    /// Blueprint for the floor at `depth` (1 = entrance), or `None` past
    /// the last floor.
    fn floor(&self, depth: u32) -> Option<FloorBlueprint>;
}
