//! Actor-related state types.
//!
//! - ActorState: a living (or dead) creature on a floor
//! - Fighter: combat stats and the energy budget
//! - Level: experience and level-up curve
//! - Equipment / Inventory / Status: owned sub-components

pub mod equipment;
pub mod inventory;
pub mod status;

pub use equipment::Equipment;
pub use inventory::InventoryState;
pub use status::{
    OnHitEffect, OnHitEffects, StatusEffect, StatusEffectInstance, StatusEffects, StatusKind,
};

use super::{
    AmmoType, Controller, DamageRange, EntityId, EquipmentSlot, Equippable, ItemState, Position,
    Rgb,
};
use crate::env::ActorTemplate;

/// Combat stats and the energy budget of an actor.
///
/// `hp` is kept in `[0, max_hp]`; it can only be lowered through
/// [`crate::lifecycle::apply_damage`], which owns the death transition.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Fighter {
    hp: i32,
    max_hp: i32,
    pub base_power: i32,
    pub base_defense: i32,
    pub base_accuracy: i32,
    /// Energy gained at the start of every round.
    pub base_speed: i32,
    /// Natural damage range used when no weapon overrides it.
    pub damage: DamageRange,
    pub power_boost: i32,
    pub defense_boost: i32,
    pub energy: i32,
    pub bleeds: bool,
}

impl Fighter {
    /// # Panics
    ///
    /// Panics if `max_hp` is not positive.
    pub fn new(max_hp: i32, power: i32, defense: i32) -> Self {
        assert!(max_hp > 0, "max_hp must be positive, got {max_hp}");
        Self {
            hp: max_hp,
            max_hp,
            base_power: power,
            base_defense: defense,
            base_accuracy: 100,
            base_speed: 100,
            damage: DamageRange::default(),
            power_boost: 0,
            defense_boost: 0,
            energy: 0,
            bleeds: true,
        }
    }

    pub fn hp(&self) -> i32 {
        self.hp
    }

    pub fn max_hp(&self) -> i32 {
        self.max_hp
    }

    pub fn is_full_health(&self) -> bool {
        self.hp >= self.max_hp
    }

    /// Clamps into `[0, max_hp]` and returns the new value.
    pub(crate) fn set_hp(&mut self, value: i32) -> i32 {
        self.hp = value.clamp(0, self.max_hp);
        self.hp
    }

    pub fn increase_max_hp(&mut self, amount: i32) {
        self.max_hp += amount;
        assert!(self.max_hp > 0, "max_hp must stay positive");
        self.hp = (self.hp + amount).clamp(0, self.max_hp);
    }
}

/// Experience tracking. Monsters use `xp_given` only; the player levels up.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Level {
    pub current_level: u32,
    pub current_xp: u32,
    /// Zero disables levelling for this actor.
    pub level_up_base: u32,
    pub level_up_factor: u32,
    /// Experience awarded to the player when this actor dies.
    pub xp_given: u32,
}

impl Level {
    pub fn experience_to_next_level(&self) -> u32 {
        self.level_up_base + self.current_level * self.level_up_factor
    }

    pub fn requires_level_up(&self) -> bool {
        self.level_up_base > 0 && self.current_xp >= self.experience_to_next_level()
    }

    /// Adds experience; returns true if a level-up became available.
    pub fn add_xp(&mut self, xp: u32) -> bool {
        if xp == 0 || self.level_up_base == 0 {
            return false;
        }
        self.current_xp += xp;
        self.requires_level_up()
    }

    pub fn increase_level(&mut self) {
        self.current_xp = self
            .current_xp
            .saturating_sub(self.experience_to_next_level());
        self.current_level += 1;
    }
}

/// Scripted consequence of an actor's death.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum DeathTrigger {
    /// Killing this actor wins the game.
    Victory,
}

/// Complete actor state.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ActorState {
    pub id: EntityId,
    pub name: String,
    pub glyph: char,
    pub color: Rgb,
    pub remains_color: Rgb,
    pub position: Position,
    pub fighter: Fighter,
    pub controller: Controller,
    pub inventory: InventoryState,
    pub equipment: Equipment,
    pub status: StatusEffects,
    pub on_hit: OnHitEffects,
    pub level: Level,
    pub alive: bool,
    pub blocks_movement: bool,
    pub on_death: Option<DeathTrigger>,
}

impl ActorState {
    /// Builds a fresh instance from an immutable template.
    ///
    /// Starting items are cloned into the new inventory with ids drawn from
    /// `next_id`, so nothing is shared with the template or other spawns.
    pub fn from_template(
        id: EntityId,
        template: &ActorTemplate,
        position: Position,
        mut next_id: impl FnMut() -> EntityId,
    ) -> Self {
        let stats = &template.stats;
        let mut fighter = Fighter::new(stats.max_hp, stats.power, stats.defense);
        fighter.base_accuracy = stats.accuracy;
        fighter.base_speed = stats.speed;
        fighter.damage = stats.damage;
        fighter.bleeds = stats.bleeds;

        let mut actor = Self {
            id,
            name: template.name.clone(),
            glyph: template.glyph,
            color: template.color,
            remains_color: template.remains_color,
            position,
            fighter,
            controller: template.controller(),
            inventory: InventoryState::with_capacity(template.inventory_capacity),
            equipment: Equipment::empty(),
            status: StatusEffects::empty(),
            on_hit: template.on_hit.iter().copied().collect(),
            level: Level {
                level_up_base: template.level_up_base,
                level_up_factor: template.level_up_factor,
                xp_given: template.xp_given,
                ..Level::default()
            },
            alive: true,
            blocks_movement: true,
            on_death: template.on_death,
        };

        for starting in &template.starting_items {
            let item = starting.item.instantiate(next_id());
            let item_id = item.id;
            let slot = item.equippable().map(Equippable::slot);
            if actor.inventory.insert(item).is_ok() && starting.equipped {
                if let Some(slot) = slot {
                    actor.equipment.equip(slot, item_id);
                }
            }
        }
        actor
    }

    pub fn is_player(&self) -> bool {
        self.id.is_player()
    }

    pub fn equipped(&self, slot: EquipmentSlot) -> Option<&ItemState> {
        self.equipment
            .get(slot)
            .and_then(|id| self.inventory.get(id))
    }

    fn equipped_stats(&self) -> impl Iterator<Item = &Equippable> {
        self.equipment
            .equipped_ids()
            .filter_map(|id| self.inventory.get(id))
            .filter_map(ItemState::equippable)
    }

    pub fn power(&self) -> i32 {
        let bonus: i32 = self
            .equipped_stats()
            .map(|stats| match stats {
                Equippable::Weapon { power_bonus, .. } => *power_bonus,
                _ => 0,
            })
            .sum();
        self.fighter.base_power + bonus + self.fighter.power_boost
    }

    pub fn defense(&self) -> i32 {
        let bonus: i32 = self
            .equipped_stats()
            .map(|stats| match stats {
                Equippable::Armor { defense_bonus } => *defense_bonus,
                _ => 0,
            })
            .sum();
        self.fighter.base_defense + bonus + self.fighter.defense_boost
    }

    pub fn accuracy(&self) -> i32 {
        let bonus: i32 = self
            .equipped_stats()
            .map(|stats| match stats {
                Equippable::Weapon { accuracy_bonus, .. } => *accuracy_bonus,
                _ => 0,
            })
            .sum();
        self.fighter.base_accuracy + bonus
    }

    /// Damage range rolled for melee: the weapon's if it defines one.
    pub fn melee_damage_range(&self) -> DamageRange {
        match self.equipped(EquipmentSlot::Weapon).and_then(ItemState::equippable) {
            Some(Equippable::Weapon {
                damage: Some(range),
                ..
            }) => *range,
            _ => self.fighter.damage,
        }
    }

    /// Equipped launcher as `(bonus, ammo type, damage range)`.
    pub fn ranged_weapon(&self) -> Option<(i32, AmmoType, DamageRange)> {
        match self.equipped(EquipmentSlot::Ranged)?.equippable()? {
            Equippable::Ranged {
                ranged_bonus,
                ammo,
                damage,
            } => Some((*ranged_bonus, *ammo, *damage)),
            _ => None,
        }
    }

    /// Equipped ammunition as `(type, remaining)`.
    pub fn ammo(&self) -> Option<(AmmoType, u32)> {
        match self.equipped(EquipmentSlot::Ammo)?.equippable()? {
            Equippable::Ammo { ammo, amount } => Some((*ammo, *amount)),
            _ => None,
        }
    }
}
