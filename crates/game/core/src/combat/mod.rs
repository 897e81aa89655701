//! Combat resolution.
//!
//! Rolling an attack is pure: [`resolve_melee_attack`] and
//! [`resolve_ranged_attack`] read two actors and a set of dice and return an
//! [`AttackRoll`]. [`apply_attack`] then writes the outcome into the world:
//! damage through the lifecycle, on-hit statuses, bleeding.
//!
//! Hit chance is `accuracy * base^defense` (ranged attacks add twice the
//! distance to the exponent); damage is a triangular roll plus power.

pub mod apply;
pub mod damage;
pub mod hit;
pub mod resolve;
pub mod roll;

pub use apply::{CombatReport, apply_attack};
pub use damage::{clamp_damage, triangular};
pub use hit::{check_hit, hit_probability, ranged_hit_probability};
pub use resolve::{AttackOutcome, AttackRoll, resolve_melee_attack, resolve_ranged_attack};
