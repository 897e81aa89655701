use super::{DamageRange, EntityId, Rgb};

/// A concrete item instance. Owned either by an inventory or by a floor.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ItemState {
    pub id: EntityId,
    pub name: String,
    pub glyph: char,
    pub color: Rgb,
    pub kind: ItemKind,
}

impl ItemState {
    pub fn equippable(&self) -> Option<&Equippable> {
        match &self.kind {
            ItemKind::Equippable(equippable) => Some(equippable),
            ItemKind::Consumable(_) => None,
        }
    }

    pub fn equippable_mut(&mut self) -> Option<&mut Equippable> {
        match &mut self.kind {
            ItemKind::Equippable(equippable) => Some(equippable),
            ItemKind::Consumable(_) => None,
        }
    }

    pub fn consumable(&self) -> Option<&Consumable> {
        match &self.kind {
            ItemKind::Consumable(consumable) => Some(consumable),
            ItemKind::Equippable(_) => None,
        }
    }

    pub fn is_healing(&self) -> bool {
        matches!(self.consumable(), Some(Consumable::Healing { .. }))
    }
}

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ItemKind {
    Consumable(Consumable),
    Equippable(Equippable),
}

/// Single-use effects. The item is removed from the inventory once the
/// effect resolves.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Consumable {
    Healing {
        amount: i32,
    },
    PowerBoost {
        amount: i32,
        duration: u32,
    },
    DefenseBoost {
        amount: i32,
        duration: u32,
    },
    /// Strikes the closest visible enemy within `range`.
    Lightning {
        damage: i32,
        range: u32,
    },
    /// Damages every living actor within `radius` of the target tile.
    AreaDamage {
        damage: i32,
        radius: u32,
        hits_user: bool,
    },
    Confusion {
        turns: u32,
    },
    MapReveal,
}

impl Consumable {
    /// Whether activation requires a target tile.
    pub fn needs_target(&self) -> bool {
        matches!(self, Self::AreaDamage { .. } | Self::Confusion { .. })
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum AmmoType {
    #[strum(to_string = "arrows")]
    Arrow,
    #[strum(to_string = "bolts")]
    Bolt,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum EquipmentSlot {
    #[strum(to_string = "weapon")]
    Weapon,
    #[strum(to_string = "armor")]
    Armor,
    #[strum(to_string = "ranged weapon")]
    Ranged,
    #[strum(to_string = "ammunition")]
    Ammo,
}

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Equippable {
    Weapon {
        power_bonus: i32,
        #[cfg_attr(feature = "serde", serde(default))]
        accuracy_bonus: i32,
        /// Replaces the wielder's natural damage range when present.
        #[cfg_attr(feature = "serde", serde(default))]
        damage: Option<DamageRange>,
    },
    Armor {
        defense_bonus: i32,
    },
    Ranged {
        ranged_bonus: i32,
        ammo: AmmoType,
        #[cfg_attr(feature = "serde", serde(default = "DamageRange::none"))]
        damage: DamageRange,
    },
    Ammo {
        ammo: AmmoType,
        amount: u32,
    },
}

impl Equippable {
    pub fn slot(&self) -> EquipmentSlot {
        match self {
            Self::Weapon { .. } => EquipmentSlot::Weapon,
            Self::Armor { .. } => EquipmentSlot::Armor,
            Self::Ranged { .. } => EquipmentSlot::Ranged,
            Self::Ammo { .. } => EquipmentSlot::Ammo,
        }
    }
}
