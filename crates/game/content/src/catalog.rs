//! In-memory content catalog.

use std::collections::BTreeMap;

use delve_core::{
    ActorTemplate, AiKind, CatalogOracle, FloorBlueprint, FloorOracle, ItemTemplate, OracleError,
    SpawnKind,
};

/// Templates by key plus the ordered list of floor blueprints.
///
/// Floors are indexed by depth: the first pushed blueprint is depth 1.
#[derive(Clone, Debug, Default)]
pub struct Catalog {
    actors: BTreeMap<String, ActorTemplate>,
    items: BTreeMap<String, ItemTemplate>,
    floors: Vec<FloorBlueprint>,
}

impl Catalog {
    /// Key of the player-controlled template.
    pub const PLAYER_KEY: &'static str = "player";

    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert_actor(&mut self, key: impl Into<String>, template: ActorTemplate) {
        self.actors.insert(key.into(), template);
    }

    pub fn insert_item(&mut self, key: impl Into<String>, template: ItemTemplate) {
        self.items.insert(key.into(), template);
    }

    /// Appends a floor below the existing ones and returns its depth.
    pub fn push_floor(&mut self, blueprint: FloorBlueprint) -> u32 {
        self.floors.push(blueprint);
        self.floors.len() as u32
    }

    pub fn player(&self) -> Option<&ActorTemplate> {
        self.actors.get(Self::PLAYER_KEY)
    }

    pub fn actor_keys(&self) -> impl Iterator<Item = &str> {
        self.actors.keys().map(String::as_str)
    }

    pub fn item_keys(&self) -> impl Iterator<Item = &str> {
        self.items.keys().map(String::as_str)
    }

    pub fn depth_count(&self) -> u32 {
        self.floors.len() as u32
    }

    /// Checks that a player template exists and that every floor spawn and
    /// summon names a known template.
    ///
    /// # Errors
    ///
    /// Returns the first unknown key.
    pub fn validate(&self) -> Result<(), OracleError> {
        if self.player().is_none() {
            return Err(OracleError::ActorTemplateNotFound(Self::PLAYER_KEY.into()));
        }
        for blueprint in &self.floors {
            for spawn in &blueprint.spawns {
                match &spawn.kind {
                    SpawnKind::Actor(key) if !self.actors.contains_key(key) => {
                        return Err(OracleError::ActorTemplateNotFound(key.clone()));
                    }
                    SpawnKind::Item(key) if !self.items.contains_key(key) => {
                        return Err(OracleError::ItemTemplateNotFound(key.clone()));
                    }
                    _ => {}
                }
            }
        }
        for template in self.actors.values() {
            if let Some(AiKind::Summoner { minion, .. }) = &template.ai {
                if !self.actors.contains_key(minion) {
                    return Err(OracleError::ActorTemplateNotFound(minion.clone()));
                }
            }
        }
        Ok(())
    }
}

impl CatalogOracle for Catalog {
    fn actor(&self, key: &str) -> Option<&ActorTemplate> {
        self.actors.get(key)
    }

    fn item(&self, key: &str) -> Option<&ItemTemplate> {
        self.items.get(key)
    }
}

impl FloorOracle for Catalog {
    fn floor(&self, depth: u32) -> Option<FloorBlueprint> {
        let index = depth.checked_sub(1)? as usize;
        self.floors.get(index).cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use delve_core::{Consumable, ItemKind, Position, SpawnSpec, TileFlags};

    fn blueprint(name: &str, spawns: Vec<SpawnSpec>) -> FloorBlueprint {
        FloorBlueprint {
            name: name.into(),
            width: 3,
            height: 1,
            tiles: vec![TileFlags::FLOOR; 3],
            upstairs: None,
            downstairs: None,
            player_start: Some(Position::new(0, 0)),
            spawns,
        }
    }

    fn catalog() -> Catalog {
        let mut catalog = Catalog::new();
        catalog.insert_actor(
            Catalog::PLAYER_KEY,
            ActorTemplate::builder("Player").player(26).build(),
        );
        catalog.insert_actor("orc", ActorTemplate::builder("Orc").build());
        catalog.insert_item(
            "potion",
            ItemTemplate::new(
                "Health Potion",
                '!',
                ItemKind::Consumable(Consumable::Healing { amount: 5 }),
            ),
        );
        catalog
    }

    #[test]
    fn floors_are_indexed_from_depth_one() {
        let mut catalog = catalog();
        assert_eq!(catalog.push_floor(blueprint("first", Vec::new())), 1);
        assert_eq!(catalog.push_floor(blueprint("second", Vec::new())), 2);

        assert!(catalog.floor(0).is_none());
        assert_eq!(catalog.floor(1).unwrap().name, "first");
        assert_eq!(catalog.floor(2).unwrap().name, "second");
        assert!(catalog.floor(3).is_none());
    }

    #[test]
    fn validate_reports_unknown_spawn_keys() {
        let mut catalog = catalog();
        catalog.push_floor(blueprint(
            "first",
            vec![SpawnSpec {
                position: Position::new(1, 0),
                kind: SpawnKind::Actor("dragon".into()),
            }],
        ));
        assert_eq!(
            catalog.validate(),
            Err(OracleError::ActorTemplateNotFound("dragon".into()))
        );
    }

    #[test]
    fn validate_checks_summoned_minions() {
        let mut catalog = catalog();
        assert_eq!(catalog.validate(), Ok(()));
        catalog.insert_actor(
            "vampire",
            ActorTemplate::builder("Vampire")
                .ai(AiKind::Summoner {
                    minion: "bat".into(),
                    count: 4,
                    radius: 3,
                })
                .build(),
        );
        assert_eq!(
            catalog.validate(),
            Err(OracleError::ActorTemplateNotFound("bat".into()))
        );
    }

    #[test]
    fn validate_requires_a_player() {
        let catalog = Catalog::new();
        assert!(catalog.validate().is_err());
    }
}
