//! Status effect data carried by actors.
//!
//! The container only stores instances; application side effects and
//! reversal live in [`crate::effects`].
//!
//! # Duration
//!
//! Durations count completed turns of the afflicted actor. Each tick
//! lowers `remaining` by one and an instance is expired once it hits zero.
//!
//! # Reapplication
//!
//! At most one instance per [`StatusKind`] is active. Reapplying a kind
//! refreshes the existing instance to the longer of the two remaining
//! durations instead of stacking a second copy.

use arrayvec::ArrayVec;

use crate::config::GameConfig;
use crate::state::types::Controller;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum StatusKind {
    /// Held in place; movement is refused until it wears off.
    #[strum(to_string = "grappled")]
    Grappled,

    /// Decision source replaced by a random walk.
    #[strum(to_string = "confused")]
    Confused,

    /// Instantly heals the attacker that inflicted it. Never lingers.
    #[strum(to_string = "drained")]
    BloodDrain { amount: i32 },
}

impl StatusKind {
    /// Instant kinds resolve on application and never occupy a slot.
    pub fn is_instant(self) -> bool {
        matches!(self, Self::BloodDrain { .. })
    }

    /// Kind identity ignoring potency, used for deduplication.
    pub fn same_kind(self, other: Self) -> bool {
        core::mem::discriminant(&self) == core::mem::discriminant(&other)
    }
}

/// Immutable definition of an effect: what it does and for how long.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StatusEffect {
    pub kind: StatusKind,
    pub duration: u32,
}

impl StatusEffect {
    pub const fn new(kind: StatusKind, duration: u32) -> Self {
        Self { kind, duration }
    }
}

/// Effect an attacker may inflict on a successful hit.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct OnHitEffect {
    pub effect: StatusEffect,
    /// Trigger probability in [0, 1].
    pub chance: f64,
}

pub type OnHitEffects = ArrayVec<OnHitEffect, { GameConfig::MAX_ON_HIT_EFFECTS }>;

/// An active effect on one actor.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StatusEffectInstance {
    pub effect: StatusEffect,
    pub remaining: u32,
    /// Decision source to restore when a confusion ends.
    pub prior_controller: Option<Controller>,
}

#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StatusEffects {
    active: ArrayVec<StatusEffectInstance, { GameConfig::MAX_STATUS_EFFECTS }>,
    /// Set while grappled; movement checks read this flag.
    pub grappled: bool,
}

impl StatusEffects {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.active.is_empty()
    }

    pub fn len(&self) -> usize {
        self.active.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &StatusEffectInstance> {
        self.active.iter()
    }

    pub fn get(&self, kind: StatusKind) -> Option<&StatusEffectInstance> {
        self.active
            .iter()
            .find(|instance| instance.effect.kind.same_kind(kind))
    }

    pub fn has(&self, kind: StatusKind) -> bool {
        self.get(kind).is_some()
    }

    /// Extends an active instance of the same kind. Returns false if none.
    pub fn refresh(&mut self, effect: StatusEffect) -> bool {
        match self
            .active
            .iter_mut()
            .find(|instance| instance.effect.kind.same_kind(effect.kind))
        {
            Some(existing) => {
                existing.remaining = existing.remaining.max(effect.duration);
                true
            }
            None => false,
        }
    }

    /// Inserts a new instance, handing it back when every slot is taken.
    pub fn insert(
        &mut self,
        instance: StatusEffectInstance,
    ) -> Result<(), StatusEffectInstance> {
        self.active
            .try_push(instance)
            .map_err(|error| error.element())
    }

    /// Decrements every instance and removes those that reached zero.
    ///
    /// Returned instances have been detached exactly once; the caller runs
    /// their reversal.
    pub fn advance(&mut self) -> Vec<StatusEffectInstance> {
        for instance in self.active.iter_mut() {
            instance.remaining = instance.remaining.saturating_sub(1);
        }
        let mut expired = Vec::new();
        let mut index = 0;
        while index < self.active.len() {
            if self.active[index].remaining == 0 {
                expired.push(self.active.remove(index));
            } else {
                index += 1;
            }
        }
        expired
    }

    /// Drops every instance without reversal. Used when the holder dies.
    pub fn clear(&mut self) {
        self.active.clear();
        self.grappled = false;
    }
}
