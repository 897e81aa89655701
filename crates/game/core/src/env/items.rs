//! Item templates.

use crate::state::{EntityId, ItemKind, ItemState, Rgb};

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ItemTemplate {
    pub name: String,
    pub glyph: char,
    pub color: Rgb,
    pub kind: ItemKind,
}

impl ItemTemplate {
    pub fn new(name: impl Into<String>, glyph: char, kind: ItemKind) -> Self {
        Self {
            name: name.into(),
            glyph,
            color: Rgb::WHITE,
            kind,
        }
    }

    /// Fresh instance with its own id.
    pub fn instantiate(&self, id: EntityId) -> ItemState {
        ItemState {
            id,
            name: self.name.clone(),
            glyph: self.glyph,
            color: self.color,
            kind: self.kind.clone(),
        }
    }
}
