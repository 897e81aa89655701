//! Stateless randomness.
//!
//! Nothing random is ever stored: every roll hashes
//! `(game_seed, nonce, actor, context)` into a seed and feeds it through an
//! [`RngOracle`]. Replaying the same actions from the same game seed
//! therefore replays the same hits, damage and wandering.

use crate::state::{EntityId, GameState};

/// Maps a seed to a value. Must be a pure function of the seed.
pub trait RngOracle: Send + Sync {
    fn next_u32(&self, seed: u64) -> u32;

    /// Inclusive `[min, max]`; collapses to `min` when the range is empty.
    fn range(&self, seed: u64, min: u32, max: u32) -> u32 {
        if min >= max {
            return min;
        }
        min + self.next_u32(seed) % (max - min + 1)
    }

    /// Uniform in `[0, 1)`.
    fn unit(&self, seed: u64) -> f64 {
        f64::from(self.next_u32(seed)) / (f64::from(u32::MAX) + 1.0)
    }

    /// Uniform in `[0, 100)`, for percentage thresholds.
    fn percent(&self, seed: u64) -> f64 {
        self.unit(seed) * 100.0
    }

    fn chance(&self, seed: u64, chance: f64) -> bool {
        self.unit(seed) < chance
    }
}

/// One LCG step followed by the PCG-XSH-RR output permutation.
#[derive(Clone, Copy, Debug, Default)]
pub struct PcgRng;

impl PcgRng {
    const MULTIPLIER: u64 = 6_364_136_223_846_793_005;
    const INCREMENT: u64 = 1_442_695_040_888_963_407;
}

impl RngOracle for PcgRng {
    fn next_u32(&self, seed: u64) -> u32 {
        let state = seed
            .wrapping_mul(Self::MULTIPLIER)
            .wrapping_add(Self::INCREMENT);
        let mixed = (((state >> 18) ^ state) >> 27) as u32;
        mixed.rotate_right((state >> 59) as u32)
    }
}

/// Hashes the roll coordinates into a single seed.
///
/// `context` separates independent rolls made during the same action; see
/// [`crate::combat::roll`] for the ones attacks use.
pub fn compute_seed(game_seed: u64, nonce: u64, actor_id: u32, context: u32) -> u64 {
    let mut hash = game_seed
        ^ nonce.wrapping_mul(0x9e37_79b9_7f4a_7c15)
        ^ u64::from(actor_id).wrapping_mul(0x517c_c1b7_2722_0a95)
        ^ u64::from(context).wrapping_mul(0x85eb_ca6b);
    // murmur3 finalizer
    hash ^= hash >> 33;
    hash = hash.wrapping_mul(0xff51_afd7_ed55_8ccd);
    hash ^ (hash >> 33)
}

/// Rolls bound to one entity at one point of the action sequence.
///
/// Every roll made through a `Dice` is a pure function of
/// `(game_seed, nonce, actor, context)`; callers pick a distinct context
/// per roll.
#[derive(Clone, Copy)]
pub struct Dice<'a> {
    rng: &'a dyn RngOracle,
    game_seed: u64,
    nonce: u64,
    actor: u32,
}

impl<'a> Dice<'a> {
    pub fn new(rng: &'a dyn RngOracle, game_seed: u64, nonce: u64, actor: EntityId) -> Self {
        Self {
            rng,
            game_seed,
            nonce,
            actor: actor.0,
        }
    }

    /// Dice for `actor` at the state's current nonce.
    pub fn for_actor(rng: &'a dyn RngOracle, state: &GameState, actor: EntityId) -> Self {
        Self::new(rng, state.game_seed, state.turn.nonce, actor)
    }

    pub fn seed(&self, context: u32) -> u64 {
        compute_seed(self.game_seed, self.nonce, self.actor, context)
    }

    pub fn unit(&self, context: u32) -> f64 {
        self.rng.unit(self.seed(context))
    }

    pub fn percent(&self, context: u32) -> f64 {
        self.rng.percent(self.seed(context))
    }

    pub fn chance(&self, context: u32, chance: f64) -> bool {
        self.rng.chance(self.seed(context), chance)
    }

    pub fn range(&self, context: u32, min: u32, max: u32) -> u32 {
        self.rng.range(self.seed(context), min, max)
    }
}
