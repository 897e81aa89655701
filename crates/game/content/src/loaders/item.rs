//! Item catalog loader.

use std::collections::BTreeMap;
use std::path::Path;

use delve_core::ItemTemplate;
use serde::{Deserialize, Serialize};

use crate::loaders::{LoadResult, read_file};

/// Item catalog structure for RON files.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ItemCatalog {
    pub items: BTreeMap<String, ItemTemplate>,
}

/// Loader for item catalog from RON files.
pub struct ItemLoader;

impl ItemLoader {
    /// Load item templates keyed by content key.
    ///
    /// RON format: `(items: { "dagger": (name: "Dagger", ...), ... })`
    pub fn load(path: &Path) -> LoadResult<BTreeMap<String, ItemTemplate>> {
        let content = read_file(path)?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> LoadResult<BTreeMap<String, ItemTemplate>> {
        let catalog: ItemCatalog = ron::from_str(content)
            .map_err(|e| anyhow::anyhow!("Failed to parse item catalog RON: {}", e))?;
        Ok(catalog.items)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use delve_core::{AmmoType, Consumable, Equippable, ItemKind};

    #[test]
    fn parses_consumables_and_equipment() {
        let items = ItemLoader::parse(
            r#"(
                items: {
                    "potion": (
                        name: "Health Potion",
                        glyph: '!',
                        color: (127, 0, 255),
                        kind: Consumable(Healing(amount: 5)),
                    ),
                    "bow": (
                        name: "Bow",
                        glyph: ')',
                        color: (80, 191, 255),
                        kind: Equippable(Ranged(ranged_bonus: 3, ammo: Arrow)),
                    ),
                },
            )"#,
        )
        .unwrap();

        assert_eq!(
            items["potion"].kind,
            ItemKind::Consumable(Consumable::Healing { amount: 5 })
        );
        match &items["bow"].kind {
            ItemKind::Equippable(Equippable::Ranged { ammo, damage, .. }) => {
                assert_eq!(*ammo, AmmoType::Arrow);
                assert_eq!(damage.max, 0);
            }
            other => panic!("unexpected kind {other:?}"),
        }
    }

    #[test]
    fn reports_malformed_input() {
        let error = ItemLoader::parse("(items: { \"x\": (name: 3) })").unwrap_err();
        assert!(error.to_string().contains("item catalog"));
    }
}
