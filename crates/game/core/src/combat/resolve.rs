//! Attack resolution: pure functions over two actors and a set of dice.

use crate::config::GameConfig;
use crate::env::Dice;
use crate::state::ActorState;

use super::damage::{clamp_damage, triangular};
use super::hit::{check_hit, hit_probability, ranged_hit_probability};
use super::roll;

/// Outcome of an attack attempt.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum AttackOutcome {
    Miss,
    /// Connected, but the damage total was zero or negative.
    NoDamage,
    Hit { damage: i32 },
}

impl AttackOutcome {
    pub fn damage(self) -> i32 {
        match self {
            Self::Hit { damage } => damage,
            Self::Miss | Self::NoDamage => 0,
        }
    }
}

/// Dice results of one attack, before anything is applied to the world.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AttackRoll {
    /// Percentage chance to hit.
    pub probability: f64,
    /// The [0, 100) roll compared against `probability`.
    pub roll: f64,
    pub outcome: AttackOutcome,
}

fn finish(probability: f64, roll: f64, raw_damage: impl FnOnce() -> i32) -> AttackRoll {
    let outcome = if !check_hit(probability, roll) {
        AttackOutcome::Miss
    } else {
        match clamp_damage(raw_damage()) {
            0 => AttackOutcome::NoDamage,
            damage => AttackOutcome::Hit { damage },
        }
    };
    AttackRoll {
        probability,
        roll,
        outcome,
    }
}

/// Melee: weapon (or natural) damage roll plus power.
pub fn resolve_melee_attack(
    attacker: &ActorState,
    defender: &ActorState,
    dice: &Dice<'_>,
    config: &GameConfig,
) -> AttackRoll {
    let probability = hit_probability(
        attacker.accuracy(),
        defender.defense(),
        config.hit_chance_base,
    );
    finish(probability, dice.percent(roll::HIT), || {
        triangular(attacker.melee_damage_range(), dice.unit(roll::DAMAGE)) + attacker.power()
    })
}

/// Ranged: a launcher contributes its bonus and damage roll; actors that
/// shoot without one (spitters, archers of the deep) use their power.
pub fn resolve_ranged_attack(
    attacker: &ActorState,
    defender: &ActorState,
    dice: &Dice<'_>,
    config: &GameConfig,
) -> AttackRoll {
    let distance = attacker.position.euclidean(defender.position);
    let probability = ranged_hit_probability(
        attacker.accuracy(),
        defender.defense(),
        distance,
        config.hit_chance_base,
    );
    finish(probability, dice.percent(roll::HIT), || {
        match attacker.ranged_weapon() {
            Some((bonus, _, range)) => triangular(range, dice.unit(roll::DAMAGE)) + bonus,
            None => attacker.power(),
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::env::{ActorTemplate, PcgRng};
    use crate::state::{EntityId, Position};

    fn pair() -> (ActorState, ActorState) {
        let mut next = 10;
        let mut ids = || {
            next += 1;
            EntityId(next)
        };
        let fighter = ActorTemplate::builder("Fighter")
            .stats(30, 5, 0)
            .accuracy(100)
            .build();
        let dummy = ActorTemplate::builder("Dummy").stats(10, 0, 0).build();
        (
            ActorState::from_template(EntityId(1), &fighter, Position::new(2, 2), &mut ids),
            ActorState::from_template(EntityId(2), &dummy, Position::new(3, 2), &mut ids),
        )
    }

    #[test]
    fn same_dice_same_melee_result() {
        let (attacker, defender) = pair();
        let config = GameConfig::default();
        let rng = PcgRng;
        for nonce in 0..50 {
            let dice = Dice::new(&rng, 99, nonce, attacker.id);
            let first = resolve_melee_attack(&attacker, &defender, &dice, &config);
            let again = resolve_melee_attack(
                &attacker,
                &defender,
                &Dice::new(&rng, 99, nonce, attacker.id),
                &config,
            );
            assert_eq!(first, again);
        }
    }

    #[test]
    fn certain_hits_roll_within_the_damage_range() {
        let (attacker, defender) = pair();
        let config = GameConfig::default().with_hit_chance_base(1.0);
        let rng = PcgRng;
        let damages: Vec<i32> = (0..200)
            .map(|nonce| {
                let dice = Dice::new(&rng, 7, nonce, attacker.id);
                resolve_melee_attack(&attacker, &defender, &dice, &config)
                    .outcome
                    .damage()
            })
            .collect();
        assert!(damages.iter().all(|damage| (5..=7).contains(damage)));
        assert!(damages.windows(2).any(|pair| pair[0] != pair[1]));
    }
}
