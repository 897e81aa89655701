//! Action domain.
//!
//! An [`Action`] is an immutable command bound to one actor: what to do
//! ([`ActionKind`]) and how much energy it costs. Each kind is backed by a
//! transition struct implementing [`ActionTransition`]; the engine drives it
//! through `pre_validate -> exhaust -> apply -> post_validate`.
//!
//! # Module Structure
//!
//! - `movement`: wait, move, open door, bump
//! - `combat`: melee, ranged, pounce
//! - `inventory`: pick up, drop, equip, use item, quick heal
//! - `stairs`: floor transitions
//! - `progression`: level up, summon

mod combat;
mod inventory;
mod movement;
mod progression;
mod stairs;
mod transition;

pub use combat::{AttackError, MeleeAction, PounceAction, RangedAction};
pub use inventory::{
    DropAction, EquipAction, InventoryError, PickupAction, QuickHealAction, UseItemAction,
};
pub use movement::{BumpAction, DoorError, MoveAction, MoveError, OpenDoorAction, WaitAction};
pub use progression::{LevelUpAction, LevelUpChoice, LevelUpError, SummonAction, SummonError};
pub use stairs::{StairsError, TakeStairsAction};
pub use transition::{ActionContext, ActionTransition};

use crate::config::GameConfig;
use crate::state::{Direction, EntityId, GameState, Position};

#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ActionKind {
    Wait(WaitAction),
    Move(MoveAction),
    Bump(BumpAction),
    OpenDoor(OpenDoorAction),
    Melee(MeleeAction),
    Ranged(RangedAction),
    Pounce(PounceAction),
    Pickup(PickupAction),
    Drop(DropAction),
    Equip(EquipAction),
    UseItem(UseItemAction),
    QuickHeal(QuickHealAction),
    TakeStairs(TakeStairsAction),
    Summon(SummonAction),
    LevelUp(LevelUpAction),
}

impl ActionKind {
    pub fn default_cost(&self, config: &GameConfig) -> i32 {
        match self {
            Self::Summon(_) => GameConfig::SUMMON_COST,
            Self::LevelUp(_) => 0,
            _ => config.default_action_cost,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Wait(_) => "wait",
            Self::Move(_) => "move",
            Self::Bump(_) => "bump",
            Self::OpenDoor(_) => "open_door",
            Self::Melee(_) => "melee",
            Self::Ranged(_) => "ranged",
            Self::Pounce(_) => "pounce",
            Self::Pickup(_) => "pickup",
            Self::Drop(_) => "drop",
            Self::Equip(_) => "equip",
            Self::UseItem(_) => "use_item",
            Self::QuickHeal(_) => "quick_heal",
            Self::TakeStairs(_) => "take_stairs",
            Self::Summon(_) => "summon",
            Self::LevelUp(_) => "level_up",
        }
    }

    /// Replaces a composite kind with the concrete one it stands for in the
    /// current state. Bumps resolve to melee, open-door or move; every other
    /// kind is returned unchanged.
    pub fn resolve(self, actor: EntityId, state: &GameState) -> Self {
        match self {
            Self::Bump(bump) => bump.resolve(actor, state),
            other => other,
        }
    }
}

/// One attempted command of one actor.
///
/// Constructed by a decision source for exactly one execution attempt.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Action {
    pub actor: EntityId,
    pub cost: i32,
    pub kind: ActionKind,
}

impl Action {
    /// Action costing the kind's default energy.
    pub fn new(actor: EntityId, kind: ActionKind, config: &GameConfig) -> Self {
        let cost = kind.default_cost(config);
        Self { actor, cost, kind }
    }

    pub fn with_cost(actor: EntityId, kind: ActionKind, cost: i32) -> Self {
        Self { actor, cost, kind }
    }

    pub fn wait(actor: EntityId, config: &GameConfig) -> Self {
        Self::new(actor, ActionKind::Wait(WaitAction), config)
    }

    pub fn bump(actor: EntityId, direction: Direction, config: &GameConfig) -> Self {
        Self::new(actor, ActionKind::Bump(BumpAction::new(direction)), config)
    }

    pub fn ranged(actor: EntityId, target: Position, config: &GameConfig) -> Self {
        Self::new(actor, ActionKind::Ranged(RangedAction::new(target)), config)
    }

    /// True iff the actor can pay for this action right now.
    pub fn can_perform(&self, state: &GameState) -> bool {
        state
            .actor(self.actor)
            .is_some_and(|actor| actor.fighter.energy >= self.cost)
    }
}
