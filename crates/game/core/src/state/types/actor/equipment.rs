//! Equipment slots for actors.
//!
//! Slots hold item ids only. The items themselves stay in the owner's
//! inventory, so equipping never moves ownership.

use crate::state::types::{EntityId, EquipmentSlot};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Equipment {
    pub weapon: Option<EntityId>,
    pub armor: Option<EntityId>,
    pub ranged: Option<EntityId>,
    pub ammo: Option<EntityId>,
}

impl Equipment {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn get(&self, slot: EquipmentSlot) -> Option<EntityId> {
        match slot {
            EquipmentSlot::Weapon => self.weapon,
            EquipmentSlot::Armor => self.armor,
            EquipmentSlot::Ranged => self.ranged,
            EquipmentSlot::Ammo => self.ammo,
        }
    }

    fn slot_mut(&mut self, slot: EquipmentSlot) -> &mut Option<EntityId> {
        match slot {
            EquipmentSlot::Weapon => &mut self.weapon,
            EquipmentSlot::Armor => &mut self.armor,
            EquipmentSlot::Ranged => &mut self.ranged,
            EquipmentSlot::Ammo => &mut self.ammo,
        }
    }

    /// Puts `item` into `slot`, returning the previous occupant.
    pub fn equip(&mut self, slot: EquipmentSlot, item: EntityId) -> Option<EntityId> {
        self.slot_mut(slot).replace(item)
    }

    pub fn unequip(&mut self, slot: EquipmentSlot) -> Option<EntityId> {
        self.slot_mut(slot).take()
    }

    /// Slot currently holding `item`, if any.
    pub fn slot_of(&self, item: EntityId) -> Option<EquipmentSlot> {
        [
            EquipmentSlot::Weapon,
            EquipmentSlot::Armor,
            EquipmentSlot::Ranged,
            EquipmentSlot::Ammo,
        ]
        .into_iter()
        .find(|&slot| self.get(slot) == Some(item))
    }

    pub fn is_equipped(&self, item: EntityId) -> bool {
        self.slot_of(item).is_some()
    }

    pub fn equipped_ids(&self) -> impl Iterator<Item = EntityId> {
        [self.weapon, self.armor, self.ranged, self.ammo]
            .into_iter()
            .flatten()
    }
}
