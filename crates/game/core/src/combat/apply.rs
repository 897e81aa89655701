//! Writes a rolled attack into the world.

use crate::effects::{self, Application};
use crate::env::{Dice, GameEnv};
use crate::event::GameEvent;
use crate::lifecycle;
use crate::state::{Direction, EntityId, GameState, Position};

use super::{AttackOutcome, AttackRoll, roll};

/// What an applied attack changed.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct CombatReport {
    pub damage: i32,
    pub killed: bool,
    /// On-hit effects that landed, in declaration order.
    pub statuses: Vec<Application>,
    pub stained: Vec<Position>,
}

/// Applies `attack` made by `attacker` against `target`.
///
/// On a hit the damage goes through [`lifecycle::apply_damage`]. On-hit
/// effects of the attacker are then rolled one by one and land only on a
/// target that is still alive; instant ones (blood drain) benefit the
/// attacker. A bleeding target stains its tile and, sometimes, one
/// orthogonal neighbour.
pub fn apply_attack(
    state: &mut GameState,
    env: &GameEnv<'_>,
    attacker: EntityId,
    target: EntityId,
    attack: AttackRoll,
    ranged: bool,
    events: &mut Vec<GameEvent>,
) -> CombatReport {
    let (Some(attacker_state), Some(target_state)) = (state.actor(attacker), state.actor(target))
    else {
        return CombatReport::default();
    };
    let on_hit = attacker_state.on_hit.clone();
    let bleeds = target_state.fighter.bleeds;
    let target_position = target_state.position;

    events.push(GameEvent::Attacked {
        attacker,
        attacker_name: attacker_state.name.clone(),
        target,
        target_name: target_state.name.clone(),
        outcome: attack.outcome,
        ranged,
    });

    let AttackOutcome::Hit { damage } = attack.outcome else {
        return CombatReport::default();
    };

    let dealt = lifecycle::apply_damage(state, target, damage, attacker, events);
    let mut report = CombatReport {
        damage: dealt.dealt,
        killed: dealt.killed,
        ..CombatReport::default()
    };

    let dice = Dice::for_actor(env.rng(), state, attacker);
    for (index, effect) in on_hit.iter().enumerate() {
        if !dice.chance(roll::ON_HIT + index as u32, effect.chance) {
            continue;
        }
        let applied = if effect.effect.kind.is_instant() || state.is_alive(target) {
            effects::apply_status(state, target, effect.effect, attacker, events)
        } else {
            Application::Ignored
        };
        if applied != Application::Ignored {
            report.statuses.push(applied);
        }
    }

    if bleeds {
        report.stained = bleed(state, &dice, env.config().bleed_spread_chance, target_position);
        if !report.stained.is_empty() {
            events.push(GameEvent::Bled {
                target,
                tiles: report.stained.clone(),
            });
        }
    }
    report
}

fn bleed(state: &mut GameState, dice: &Dice<'_>, spread_chance: f64, at: Position) -> Vec<Position> {
    let floor = state.floor_mut();
    let mut stained = Vec::with_capacity(2);
    if floor.stain(at) {
        stained.push(at);
    }
    if dice.chance(roll::BLEED_SPREAD, spread_chance) {
        let neighbours: Vec<Position> = Direction::ORTHOGONAL
            .iter()
            .map(|&direction| at.step(direction))
            .filter(|&position| floor.is_walkable(position))
            .collect();
        if !neighbours.is_empty() {
            let pick = dice.range(roll::BLEED_DIRECTION, 0, neighbours.len() as u32 - 1) as usize;
            if floor.stain(neighbours[pick]) {
                stained.push(neighbours[pick]);
            }
        }
    }
    stained
}
