//! Authoritative game state representation.
//!
//! This module owns the data structures that describe floors, actors, items
//! and turn bookkeeping. Runtime layers clone or query this state but mutate
//! it through the engine, the lifecycle helpers and the status engine.
pub mod types;
#[cfg(feature = "serde")]
mod snapshot;

use std::collections::BTreeMap;

pub use types::{
    ActorState, AiKind, AiMemory, AiState, AmmoType, BoostStat, Consumable, Controller,
    DamageRange, DeathTrigger, DelayedEffect, Direction, EntityId, Equipment, EquipmentSlot,
    Equippable, Fighter, FloorState, GroundItem, InventoryState, ItemKind, ItemState, Level,
    OnHitEffect, OnHitEffects, Position, Rgb, ScheduledEffect, StatusEffect,
    StatusEffectInstance, StatusEffects, StatusKind, TileFlags, TurnScheduler, TurnState,
};

use crate::env::compute_seed;

#[cfg(feature = "serde")]
pub use snapshot::SnapshotError;

/// Every floor generated so far, keyed by depth.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct WorldState {
    floors: BTreeMap<u32, FloorState>,
    current_depth: u32,
}

impl WorldState {
    pub fn new(first: FloorState) -> Self {
        let current_depth = first.depth;
        let mut floors = BTreeMap::new();
        floors.insert(current_depth, first);
        Self {
            floors,
            current_depth,
        }
    }

    pub fn current_depth(&self) -> u32 {
        self.current_depth
    }

    pub fn current(&self) -> &FloorState {
        &self.floors[&self.current_depth]
    }

    pub fn current_mut(&mut self) -> &mut FloorState {
        self.floors
            .get_mut(&self.current_depth)
            .expect("current floor is always present")
    }

    pub fn floor(&self, depth: u32) -> Option<&FloorState> {
        self.floors.get(&depth)
    }

    pub fn floor_mut(&mut self, depth: u32) -> Option<&mut FloorState> {
        self.floors.get_mut(&depth)
    }

    pub fn has_floor(&self, depth: u32) -> bool {
        self.floors.contains_key(&depth)
    }

    /// Stores a newly generated floor. An existing floor at that depth is
    /// kept.
    pub fn insert_floor(&mut self, floor: FloorState) {
        self.floors.entry(floor.depth).or_insert(floor);
    }

    /// Makes `depth` the current floor. Returns false if it was never
    /// generated.
    pub fn set_current(&mut self, depth: u32) -> bool {
        if !self.floors.contains_key(&depth) {
            return false;
        }
        self.current_depth = depth;
        true
    }

    pub fn floors(&self) -> impl Iterator<Item = &FloorState> {
        self.floors.values()
    }

    pub fn floors_mut(&mut self) -> impl Iterator<Item = &mut FloorState> {
        self.floors.values_mut()
    }
}

/// Everything that survives a save: rebuilding an engine from this value
/// and the same content continues the game identically.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GameState {
    /// Fixed at game start; mixed with `turn.nonce` for every roll.
    pub game_seed: u64,

    /// Next id to hand out. Ids are never reused.
    next_entity_id: u32,

    pub turn: TurnState,
    pub world: WorldState,

    /// Set once a victory trigger fires.
    pub victory: bool,
}

impl GameState {
    pub fn new(game_seed: u64, first_floor: FloorState) -> Self {
        Self {
            game_seed,
            next_entity_id: 1,
            turn: TurnState::new(),
            world: WorldState::new(first_floor),
            victory: false,
        }
    }

    /// Allocates a new unique EntityId.
    ///
    /// # Panics
    ///
    /// Panics if we've exhausted all available IDs.
    pub fn allocate_entity_id(&mut self) -> EntityId {
        while self.next_entity_id == EntityId::PLAYER.0 || self.next_entity_id == EntityId::SYSTEM.0
        {
            self.next_entity_id = self
                .next_entity_id
                .checked_add(1)
                .expect("EntityId overflow");
        }

        let id = EntityId(self.next_entity_id);
        self.next_entity_id = self
            .next_entity_id
            .checked_add(1)
            .expect("EntityId overflow");

        id
    }

    pub fn floor(&self) -> &FloorState {
        self.world.current()
    }

    pub fn floor_mut(&mut self) -> &mut FloorState {
        self.world.current_mut()
    }

    /// Actor on the current floor.
    pub fn actor(&self, id: EntityId) -> Option<&ActorState> {
        self.floor().actors.get(&id)
    }

    pub fn actor_mut(&mut self, id: EntityId) -> Option<&mut ActorState> {
        self.floor_mut().actors.get_mut(&id)
    }

    pub fn player(&self) -> Option<&ActorState> {
        self.actor(EntityId::PLAYER)
    }

    pub fn is_alive(&self, id: EntityId) -> bool {
        self.actor(id).is_some_and(|actor| actor.alive)
    }

    /// The game ends when the player dies or a victory trigger fires.
    pub fn is_game_over(&self) -> bool {
        self.victory || !self.is_alive(EntityId::PLAYER)
    }

    /// Seed for one random roll made by `actor` during the current action.
    pub fn roll_seed(&self, actor: EntityId, context: u32) -> u64 {
        compute_seed(self.game_seed, self.turn.nonce, actor.0, context)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn entity_ids_are_monotonic_and_skip_player() {
        let mut state = GameState::new(0, FloorState::walled_room(1, 4, 4));
        let first = state.allocate_entity_id();
        let second = state.allocate_entity_id();
        assert_eq!(first, EntityId(1));
        assert!(second > first);
    }

    #[test]
    fn world_switches_only_to_known_floors() {
        let mut world = WorldState::new(FloorState::walled_room(1, 4, 4));
        assert!(!world.set_current(2));
        world.insert_floor(FloorState::walled_room(2, 6, 6));
        assert!(world.set_current(2));
        assert_eq!(world.current().width(), 6);
    }
}
