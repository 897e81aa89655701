//! Status effect lifecycle: apply, tick, expire.
//!
//! ```text
//! Applied -> (tick)* -> Expired
//! ```
//!
//! Application installs the side effect (grapple flag, swapped controller)
//! once; reapplying an active kind only refreshes its duration. Expiry runs
//! the matching reversal exactly once.

use crate::event::GameEvent;
use crate::lifecycle;
use crate::state::{
    AiKind, ActorState, BoostStat, Controller, DelayedEffect, EntityId, GameState, StatusEffect,
    StatusEffectInstance, StatusKind,
};

/// What [`apply_status`] did.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Application {
    Applied,
    /// Same kind already active; only the duration changed.
    Refreshed,
    /// Instant kind resolved on the spot.
    Instant,
    /// Target missing or dead, zero duration, or no free slot.
    Ignored,
}

/// Applies `effect` to `target`. `source` is the entity that caused it and
/// receives instant benefits such as blood drain.
pub fn apply_status(
    state: &mut GameState,
    target: EntityId,
    effect: StatusEffect,
    source: EntityId,
    events: &mut Vec<GameEvent>,
) -> Application {
    if let StatusKind::BloodDrain { amount } = effect.kind {
        lifecycle::heal(state, source, amount, events);
        return Application::Instant;
    }

    let Some(actor) = state.actor_mut(target).filter(|actor| actor.alive) else {
        return Application::Ignored;
    };
    if effect.duration == 0 {
        return Application::Ignored;
    }

    if actor.status.refresh(effect) {
        events.push(GameEvent::StatusRefreshed {
            target,
            kind: effect.kind,
        });
        return Application::Refreshed;
    }

    let mut instance = StatusEffectInstance {
        effect,
        remaining: effect.duration,
        prior_controller: None,
    };
    install(actor, &mut instance);

    if let Err(mut rejected) = actor.status.insert(instance) {
        tracing::debug!(target = %target, kind = %effect.kind, "status slots full, effect dropped");
        revert(actor, &mut rejected);
        return Application::Ignored;
    }

    events.push(GameEvent::StatusApplied {
        target,
        name: actor.name.clone(),
        kind: effect.kind,
    });
    Application::Applied
}

/// Advances every effect on `actor` by one completed turn and expires
/// those that ran out. Returns the number of expired effects.
pub fn tick(state: &mut GameState, actor_id: EntityId, events: &mut Vec<GameEvent>) -> usize {
    let Some(actor) = state.actor_mut(actor_id) else {
        return 0;
    };
    let expired = actor.status.advance();
    let count = expired.len();
    for mut instance in expired {
        revert(actor, &mut instance);
        events.push(GameEvent::StatusExpired {
            target: actor_id,
            name: actor.name.clone(),
            kind: instance.effect.kind,
        });
    }
    count
}

/// Runs a delayed effect whose round has come.
pub fn fire_delayed(state: &mut GameState, effect: DelayedEffect, events: &mut Vec<GameEvent>) {
    match effect {
        DelayedEffect::RevertBoost {
            target,
            stat,
            amount,
            source,
        } => {
            let Some(actor) = state.world.floors_mut().find_map(|floor| floor.actors.get_mut(&target))
            else {
                return;
            };
            match stat {
                BoostStat::Power => actor.fighter.power_boost -= amount,
                BoostStat::Defense => actor.fighter.defense_boost -= amount,
            }
            if actor.alive {
                events.push(GameEvent::BoostFaded {
                    actor: target,
                    stat,
                    source,
                });
            }
        }
    }
}

fn install(actor: &mut ActorState, instance: &mut StatusEffectInstance) {
    match instance.effect.kind {
        StatusKind::Grappled => actor.status.grappled = true,
        StatusKind::Confused => {
            let prior = std::mem::replace(
                &mut actor.controller,
                Controller::ai(AiKind::ConfusedWalk),
            );
            instance.prior_controller = Some(prior);
        }
        StatusKind::BloodDrain { .. } => {}
    }
}

fn revert(actor: &mut ActorState, instance: &mut StatusEffectInstance) {
    match instance.effect.kind {
        StatusKind::Grappled => actor.status.grappled = false,
        StatusKind::Confused => {
            if let Some(prior) = instance.prior_controller.take() {
                if actor.alive {
                    actor.controller = prior;
                }
            }
        }
        StatusKind::BloodDrain { .. } => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::env::ActorTemplate;
    use crate::state::{FloorState, Position};

    fn state_with_monster() -> (GameState, EntityId) {
        let mut state = GameState::new(1, FloorState::walled_room(1, 8, 8));
        let template = ActorTemplate::builder("orc").stats(10, 3, 0).build();
        let id = lifecycle::spawn_actor(&mut state, &template, Position::new(2, 2))
            .expect("free tile");
        (state, id)
    }

    fn expired_count(events: &[GameEvent]) -> usize {
        events
            .iter()
            .filter(|event| matches!(event, GameEvent::StatusExpired { .. }))
            .count()
    }

    #[test]
    fn three_turn_effect_expires_on_third_tick() {
        let (mut state, id) = state_with_monster();
        let mut events = Vec::new();
        let effect = StatusEffect::new(StatusKind::Grappled, 3);

        assert_eq!(
            apply_status(&mut state, id, effect, EntityId::PLAYER, &mut events),
            Application::Applied
        );
        assert!(state.actor(id).unwrap().status.grappled);

        tick(&mut state, id, &mut events);
        tick(&mut state, id, &mut events);
        assert!(state.actor(id).unwrap().status.has(StatusKind::Grappled));
        assert_eq!(expired_count(&events), 0);

        tick(&mut state, id, &mut events);
        let actor = state.actor(id).unwrap();
        assert!(!actor.status.has(StatusKind::Grappled));
        assert!(!actor.status.grappled);
        assert_eq!(expired_count(&events), 1);

        tick(&mut state, id, &mut events);
        assert_eq!(expired_count(&events), 1);
    }

    #[test]
    fn confusion_swaps_and_restores_controller() {
        let (mut state, id) = state_with_monster();
        let mut events = Vec::new();
        let effect = StatusEffect::new(StatusKind::Confused, 1);

        apply_status(&mut state, id, effect, EntityId::PLAYER, &mut events);
        assert_eq!(
            state.actor(id).unwrap().controller.ai_kind(),
            Some(&AiKind::ConfusedWalk)
        );

        tick(&mut state, id, &mut events);
        assert_eq!(
            state.actor(id).unwrap().controller.ai_kind(),
            Some(&AiKind::MeleeChaser)
        );
    }

    #[test]
    fn reapplying_refreshes_without_second_side_effect() {
        let (mut state, id) = state_with_monster();
        let mut events = Vec::new();

        apply_status(
            &mut state,
            id,
            StatusEffect::new(StatusKind::Confused, 2),
            EntityId::PLAYER,
            &mut events,
        );
        let second = apply_status(
            &mut state,
            id,
            StatusEffect::new(StatusKind::Confused, 4),
            EntityId::PLAYER,
            &mut events,
        );
        assert_eq!(second, Application::Refreshed);

        let actor = state.actor(id).unwrap();
        assert_eq!(actor.status.len(), 1);
        let instance = actor.status.get(StatusKind::Confused).unwrap();
        assert_eq!(instance.remaining, 4);
        assert_eq!(
            instance
                .prior_controller
                .as_ref()
                .and_then(Controller::ai_kind),
            Some(&AiKind::MeleeChaser)
        );
        let applied = events
            .iter()
            .filter(|event| matches!(event, GameEvent::StatusApplied { .. }))
            .count();
        assert_eq!(applied, 1);
    }

    #[test]
    fn blood_drain_heals_source_instead_of_lingering() {
        let (mut state, bat) = state_with_monster();
        let victim_template = ActorTemplate::builder("rat").stats(5, 0, 0).build();
        let victim =
            lifecycle::spawn_actor(&mut state, &victim_template, Position::new(3, 3)).unwrap();
        let mut events = Vec::new();
        lifecycle::apply_damage(&mut state, bat, 4, EntityId::SYSTEM, &mut events);

        let outcome = apply_status(
            &mut state,
            victim,
            StatusEffect::new(StatusKind::BloodDrain { amount: 3 }, 0),
            bat,
            &mut events,
        );
        assert_eq!(outcome, Application::Instant);
        assert_eq!(state.actor(bat).unwrap().fighter.hp(), 9);
        assert!(state.actor(victim).unwrap().status.is_empty());
    }

    #[test]
    fn dead_targets_receive_nothing() {
        let (mut state, id) = state_with_monster();
        let mut events = Vec::new();
        lifecycle::apply_damage(&mut state, id, 50, EntityId::PLAYER, &mut events);

        let outcome = apply_status(
            &mut state,
            id,
            StatusEffect::new(StatusKind::Grappled, 3),
            EntityId::PLAYER,
            &mut events,
        );
        assert_eq!(outcome, Application::Ignored);
    }
}
