//! Structured record of what an action (or a round boundary) did.
//!
//! Events carry display names so that narration can be produced without
//! looking the entities up again; corpses get renamed on death.

use crate::combat::AttackOutcome;
use crate::state::{BoostStat, EntityId, EquipmentSlot, Position, StatusKind};

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum GameEvent {
    Moved {
        actor: EntityId,
        from: Position,
        to: Position,
    },
    ItemUnderfoot {
        actor: EntityId,
        item: String,
    },
    DoorOpened {
        actor: EntityId,
        position: Position,
    },
    Attacked {
        attacker: EntityId,
        attacker_name: String,
        target: EntityId,
        target_name: String,
        outcome: AttackOutcome,
        ranged: bool,
    },
    Bled {
        target: EntityId,
        tiles: Vec<Position>,
    },
    Died {
        entity: EntityId,
        name: String,
        position: Position,
    },
    XpGained {
        actor: EntityId,
        amount: u32,
        level_up_ready: bool,
    },
    LeveledUp {
        actor: EntityId,
        level: u32,
    },
    StatusApplied {
        target: EntityId,
        name: String,
        kind: StatusKind,
    },
    StatusRefreshed {
        target: EntityId,
        kind: StatusKind,
    },
    StatusExpired {
        target: EntityId,
        name: String,
        kind: StatusKind,
    },
    Healed {
        actor: EntityId,
        name: String,
        amount: i32,
    },
    PickedUp {
        actor: EntityId,
        item: String,
    },
    Dropped {
        actor: EntityId,
        item: String,
    },
    Equipped {
        actor: EntityId,
        item: String,
        slot: EquipmentSlot,
    },
    Unequipped {
        actor: EntityId,
        item: String,
        slot: EquipmentSlot,
    },
    ItemConsumed {
        actor: EntityId,
        item: String,
    },
    BoostStarted {
        actor: EntityId,
        stat: BoostStat,
        amount: i32,
    },
    BoostFaded {
        actor: EntityId,
        stat: BoostStat,
        source: String,
    },
    LightningStruck {
        target: EntityId,
        name: String,
        damage: i32,
    },
    Scorched {
        target: EntityId,
        name: String,
        damage: i32,
    },
    MapRevealed,
    Summoned {
        summoner: EntityId,
        name: String,
        count: u32,
    },
    Pounced {
        actor: EntityId,
        name: String,
        to: Position,
    },
    FloorChanged {
        depth: u32,
        ascended: bool,
    },
    Victory,
}
