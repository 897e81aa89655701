//! Actor catalog loader.
//!
//! Loads actor templates (the player and every monster) from RON files and
//! resolves their starting kit against the item catalog.

use std::collections::BTreeMap;
use std::path::Path;

use delve_core::{ActorTemplate, ItemTemplate, StartingItem};
use serde::{Deserialize, Serialize};

use crate::loaders::{LoadResult, read_file};

/// Reference to an item template carried from the start.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StartingItemRef {
    pub key: String,
    #[serde(default)]
    pub equipped: bool,
}

/// Loader for actor catalog from RON files.
pub struct ActorLoader;

impl ActorLoader {
    /// Load actor catalog from a RON file.
    ///
    /// RON format: `Vec<(String, ActorTemplate, Vec<StartingItemRef>)>`
    ///
    /// Starting items are written by key and replaced by copies of the
    /// matching item template, so the loaded template is self-contained.
    ///
    /// # Returns
    ///
    /// Returns a Vec of (actor_key, ActorTemplate) in file order.
    pub fn load(
        path: &Path,
        items: &BTreeMap<String, ItemTemplate>,
    ) -> LoadResult<Vec<(String, ActorTemplate)>> {
        let content = read_file(path)?;
        Self::parse(&content, items)
    }

    pub fn parse(
        content: &str,
        items: &BTreeMap<String, ItemTemplate>,
    ) -> LoadResult<Vec<(String, ActorTemplate)>> {
        let raw_data: Vec<(String, ActorTemplate, Vec<StartingItemRef>)> =
            ron::from_str(content)
                .map_err(|e| anyhow::anyhow!("Failed to parse actor catalog RON: {}", e))?;

        let mut actors = Vec::with_capacity(raw_data.len());
        for (actor_key, mut template, kit) in raw_data {
            for entry in kit {
                let item = items.get(&entry.key).ok_or_else(|| {
                    anyhow::anyhow!(
                        "Failed to resolve starting item '{}' for actor '{}': unknown item",
                        entry.key,
                        actor_key
                    )
                })?;
                template.starting_items.push(StartingItem {
                    item: item.clone(),
                    equipped: entry.equipped,
                });
            }
            if template.stats.max_hp <= 0 {
                anyhow::bail!("Actor '{}' must have positive max_hp", actor_key);
            }
            actors.push((actor_key, template));
        }

        Ok(actors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use delve_core::{AiKind, Equippable, ItemKind, StatusKind};

    fn items() -> BTreeMap<String, ItemTemplate> {
        let mut items = BTreeMap::new();
        items.insert(
            "dagger".to_string(),
            ItemTemplate::new(
                "Dagger",
                '/',
                ItemKind::Equippable(Equippable::Weapon {
                    power_bonus: 2,
                    accuracy_bonus: 0,
                    damage: None,
                }),
            ),
        );
        items
    }

    #[test]
    fn resolves_starting_kit_and_behaviour() {
        let actors = ActorLoader::parse(
            r#"[
                ("player", (
                    name: "Player",
                    glyph: '@',
                    color: (255, 255, 255),
                    stats: (max_hp: 30, power: 2, defense: 10),
                    inventory_capacity: 26,
                    level_up_base: 200,
                    level_up_factor: 150,
                ), [(key: "dagger", equipped: true)]),
                ("zombie", (
                    name: "Zombie",
                    glyph: 'z',
                    color: (63, 127, 63),
                    stats: (max_hp: 8, power: 1, accuracy: 80, speed: 70),
                    ai: Some(MeleeChaser),
                    on_hit: [(effect: (kind: Grappled, duration: 1), chance: 0.9)],
                    xp_given: 35,
                ), []),
            ]"#,
            &items(),
        )
        .unwrap();

        let (key, player) = &actors[0];
        assert_eq!(key, "player");
        assert!(player.ai.is_none());
        assert_eq!(player.starting_items.len(), 1);
        assert!(player.starting_items[0].equipped);
        assert_eq!(player.stats.accuracy, 100);

        let (_, zombie) = &actors[1];
        assert_eq!(zombie.ai, Some(AiKind::MeleeChaser));
        assert_eq!(zombie.stats.speed, 70);
        assert_eq!(zombie.on_hit[0].effect.kind, StatusKind::Grappled);
    }

    #[test]
    fn unknown_starting_item_is_an_error() {
        let error = ActorLoader::parse(
            r#"[("ghoul", (name: "Ghoul", glyph: 'G', color: (0, 127, 0)), [(key: "axe")])]"#,
            &items(),
        )
        .unwrap_err();
        assert!(error.to_string().contains("'axe'"));
    }
}
