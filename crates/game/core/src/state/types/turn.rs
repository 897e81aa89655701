use std::collections::BTreeMap;

use super::{EntityId, TurnScheduler};
use crate::action::Action;

/// Stat raised by a temporary boost.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum BoostStat {
    #[strum(to_string = "power")]
    Power,
    #[strum(to_string = "defense")]
    Defense,
}

/// Work deferred to a later round. Stored as data so snapshots carry it.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum DelayedEffect {
    /// Undo a boost granted by a consumable.
    RevertBoost {
        target: EntityId,
        stat: BoostStat,
        amount: i32,
        source: String,
    },
}

#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ScheduledEffect {
    pub due_round: u64,
    pub effect: DelayedEffect,
}

/// Round bookkeeping for the energy scheduler.
#[derive(Clone, Debug, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TurnState {
    /// Rounds started so far.
    pub round: u64,

    /// Sequential action identifier, incremented after every executed
    /// action. Mixed into random seeds so each roll is reproducible.
    pub nonce: u64,

    /// Actor whose activation is in progress.
    pub current_actor: Option<EntityId>,

    pub scheduler: TurnScheduler,

    /// Chosen actions that could not be afforded yet, keyed by actor.
    pub deferred: BTreeMap<EntityId, Action>,

    /// Timer wheel of `(due round, effect)` pairs.
    pub scheduled: Vec<ScheduledEffect>,
}

impl TurnState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queues `effect` to fire `delay` rounds from now.
    pub fn schedule(&mut self, delay: u64, effect: DelayedEffect) {
        self.scheduled.push(ScheduledEffect {
            due_round: self.round + delay,
            effect,
        });
    }

    /// Removes and returns every effect due at or before `round`, in the
    /// order they were scheduled.
    pub fn take_due(&mut self, round: u64) -> Vec<DelayedEffect> {
        let (due, pending): (Vec<_>, Vec<_>) = std::mem::take(&mut self.scheduled)
            .into_iter()
            .partition(|scheduled| scheduled.due_round <= round);
        self.scheduled = pending;
        due.into_iter().map(|scheduled| scheduled.effect).collect()
    }
}
