//! Floor prefab loader.
//!
//! Floors are drawn as rows of ASCII glyphs:
//!
//! | glyph | tile |
//! |---|---|
//! | `#` or space | wall |
//! | `.` | floor |
//! | `+` | closed door |
//! | `'` | open door |
//! | `<` | upstairs (leads deeper) |
//! | `>` | downstairs (leads back up) |
//! | `@` | floor, player start |
//!
//! Any glyph listed in the prefab's legend is a floor tile carrying a spawn.

use std::collections::BTreeMap;
use std::path::Path;

use delve_core::{FloorBlueprint, Position, SpawnKind, SpawnSpec, TileFlags};
use serde::{Deserialize, Serialize};

use crate::loaders::{LoadResult, read_file};

/// Floor prefab structure for RON files.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FloorPrefab {
    pub name: String,
    pub rows: Vec<String>,
    #[serde(default)]
    pub legend: BTreeMap<char, SpawnKind>,
}

/// Loader for floor prefabs from RON files.
pub struct MapLoader;

impl MapLoader {
    /// Load a prefab from a RON file and turn it into a blueprint.
    pub fn load(path: &Path) -> LoadResult<FloorBlueprint> {
        let content = read_file(path)?;
        let prefab: FloorPrefab = ron::from_str(&content)
            .map_err(|e| anyhow::anyhow!("Failed to parse floor RON {}: {}", path.display(), e))?;
        Self::build(&prefab)
    }

    /// Converts the ASCII rows into a tile grid, stair coordinates and a
    /// spawn list.
    ///
    /// # Errors
    ///
    /// Fails on empty or ragged rows, unknown glyphs and repeated stairs or
    /// start markers.
    pub fn build(prefab: &FloorPrefab) -> LoadResult<FloorBlueprint> {
        let height = prefab.rows.len();
        let width = prefab.rows.first().map_or(0, |row| row.chars().count());
        if width == 0 || height == 0 {
            anyhow::bail!("Floor '{}' has no tiles", prefab.name);
        }

        let mut blueprint = FloorBlueprint {
            name: prefab.name.clone(),
            width: width as u32,
            height: height as u32,
            tiles: Vec::with_capacity(width * height),
            upstairs: None,
            downstairs: None,
            player_start: None,
            spawns: Vec::new(),
        };

        for (y, row) in prefab.rows.iter().enumerate() {
            if row.chars().count() != width {
                anyhow::bail!(
                    "Floor '{}' row {} has {} tiles, expected {}",
                    prefab.name,
                    y,
                    row.chars().count(),
                    width
                );
            }
            for (x, glyph) in row.chars().enumerate() {
                let position = Position::new(x as i32, y as i32);
                let tile = match glyph {
                    '#' | ' ' => TileFlags::WALL,
                    '.' => TileFlags::FLOOR,
                    '+' => TileFlags::CLOSED_DOOR,
                    '\'' => TileFlags::OPEN_DOOR,
                    '<' => {
                        mark(&mut blueprint.upstairs, position, "upstairs", &prefab.name)?;
                        TileFlags::FLOOR
                    }
                    '>' => {
                        mark(&mut blueprint.downstairs, position, "downstairs", &prefab.name)?;
                        TileFlags::FLOOR
                    }
                    '@' => {
                        mark(&mut blueprint.player_start, position, "player start", &prefab.name)?;
                        TileFlags::FLOOR
                    }
                    other => match prefab.legend.get(&other) {
                        Some(kind) => {
                            blueprint.spawns.push(SpawnSpec {
                                position,
                                kind: kind.clone(),
                            });
                            TileFlags::FLOOR
                        }
                        None => anyhow::bail!(
                            "Floor '{}' uses unknown glyph '{}' at {}",
                            prefab.name,
                            other,
                            position
                        ),
                    },
                };
                blueprint.tiles.push(tile);
            }
        }

        Ok(blueprint)
    }
}

fn mark(slot: &mut Option<Position>, position: Position, what: &str, floor: &str) -> LoadResult<()> {
    if let Some(previous) = slot.replace(position) {
        anyhow::bail!("Floor '{}' has a second {} at {} (first at {})", floor, what, position, previous);
    }
    Ok(())
}
