//! Action execution pipeline.
//!
//! The [`GameEngine`] is the authoritative reducer for [`GameState`]. It
//! checks that the actor may act, resolves composite actions, drives the
//! transition phases and surfaces rich error information for the runtime.
//! Turn order itself is decided by the runtime's loop, which owns the
//! decision sources.

mod errors;
mod transition;

pub use errors::{ExecuteError, TransitionPhase, TransitionPhaseError};

use crate::action::{Action, ActionKind};
use crate::effects;
use crate::env::GameEnv;
use crate::event::GameEvent;
use crate::state::{EntityId, GameState};

/// Outcome of one successfully performed action.
#[derive(Clone, Debug, PartialEq)]
pub struct ActionReport {
    pub actor: EntityId,
    /// The concrete kind that ran; bumps appear as what they resolved to.
    pub kind: ActionKind,
    pub cost: i32,
    pub events: Vec<GameEvent>,
}

/// Applies actions to a borrowed [`GameState`].
///
/// Every action goes through the same pipeline:
/// validate actor -> resolve -> pre_validate -> exhaust -> apply ->
/// post_validate. An `Impossible` failure can only come out of
/// `pre_validate`, so it never costs energy.
pub struct GameEngine<'a> {
    state: &'a mut GameState,
}

impl<'a> GameEngine<'a> {
    pub fn new(state: &'a mut GameState) -> Self {
        Self { state }
    }

    pub fn state(&self) -> &GameState {
        self.state
    }

    /// Performs `action`. The nonce advances after every success so each
    /// action draws fresh random numbers.
    ///
    /// # Errors
    ///
    /// Returns `ExecuteError` if the actor may not act or the action fails;
    /// use [`ExecuteError::is_impossible`] to tell refusals from bugs.
    pub fn perform(
        &mut self,
        env: &GameEnv<'_>,
        action: &Action,
    ) -> Result<ActionReport, ExecuteError> {
        self.validate_actor(action)?;

        let kind = action.kind.clone().resolve(action.actor, self.state);
        let events =
            transition::execute_transition(&kind, action.actor, action.cost, self.state, env)?;

        self.state.turn.nonce += 1;
        tracing::trace!(
            actor = %action.actor,
            action = kind.as_str(),
            cost = action.cost,
            events = events.len(),
            "action performed"
        );

        Ok(ActionReport {
            actor: action.actor,
            kind,
            cost: action.cost,
            events,
        })
    }

    /// Fires every scheduled effect due at `round`.
    pub fn fire_due_effects(&mut self, round: u64) -> Vec<GameEvent> {
        let mut events = Vec::new();
        for effect in self.state.turn.take_due(round) {
            effects::fire_delayed(self.state, effect, &mut events);
        }
        events
    }

    fn validate_actor(&self, action: &Action) -> Result<(), ExecuteError> {
        let actor = self
            .state
            .actor(action.actor)
            .filter(|actor| actor.alive)
            .ok_or(ExecuteError::ActorNotFound(action.actor))?;

        let current = self.state.turn.current_actor;
        if current.is_some_and(|current| current != action.actor) {
            return Err(ExecuteError::ActorNotCurrent {
                actor: action.actor,
                current,
            });
        }

        if actor.fighter.energy < action.cost {
            return Err(ExecuteError::NotEnoughEnergy {
                actor: action.actor,
                energy: actor.fighter.energy,
                cost: action.cost,
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::action::{ActionKind, MoveAction, PickupAction, RangedAction};
    use crate::config::GameConfig;
    use crate::env::{ActorTemplate, ItemTemplate, PcgRng, VisionOracle};
    use crate::error::GameError;
    use crate::lifecycle;
    use crate::state::{
        ActorState, AmmoType, DamageRange, Direction, Equippable, FloorState, ItemKind, Position,
    };

    /// Everything is visible and nothing blocks sight.
    struct ClearSight;

    impl VisionOracle for ClearSight {
        fn refresh(&mut self, _floor: &FloorState, _viewer: Position, _radius: u32) {}

        fn is_visible(&self, _position: Position) -> bool {
            true
        }

        fn line_of_sight_clear(&self, _floor: &FloorState, _from: Position, _to: Position) -> bool {
            true
        }

        fn path_to(&self, _floor: &FloorState, _from: Position, _to: Position) -> Vec<Position> {
            Vec::new()
        }
    }

    fn archer(arrows: u32) -> ActorTemplate {
        let bow = ItemTemplate::new(
            "short bow",
            '}',
            ItemKind::Equippable(Equippable::Ranged {
                ranged_bonus: 1,
                ammo: AmmoType::Arrow,
                damage: DamageRange::new(1, 3),
            }),
        );
        let quiver = ItemTemplate::new(
            "arrows",
            '/',
            ItemKind::Equippable(Equippable::Ammo {
                ammo: AmmoType::Arrow,
                amount: arrows,
            }),
        );
        ActorTemplate::builder("player")
            .player(26)
            .stats(30, 2, 1)
            .item(bow, true)
            .item(quiver, true)
            .build()
    }

    fn arena(arrows: u32) -> (GameState, EntityId, EntityId) {
        let mut state = GameState::new(5, FloorState::walled_room(1, 10, 10));
        let mut next_item = 1000;
        let hero = ActorState::from_template(
            EntityId::PLAYER,
            &archer(arrows),
            Position::new(2, 2),
            || {
                next_item += 1;
                EntityId(next_item)
            },
        );
        state.floor_mut().actors.insert(EntityId::PLAYER, hero);
        let dummy = ActorTemplate::builder("dummy").stats(50, 0, 0).build();
        let target = lifecycle::spawn_actor(&mut state, &dummy, Position::new(6, 2)).unwrap();
        state.actor_mut(EntityId::PLAYER).unwrap().fighter.energy = 300;
        (state, EntityId::PLAYER, target)
    }

    #[test]
    fn impossible_keeps_energy_and_nonce() {
        let (mut state, hero, _) = arena(1);
        let config = GameConfig::default();
        let rng = PcgRng;
        let env = GameEnv::new(&config, &rng);
        let action = Action::new(hero, ActionKind::Move(MoveAction::new(Direction::North)), &config);
        state.actor_mut(hero).unwrap().position = Position::new(2, 1);

        let error = GameEngine::new(&mut state).perform(&env, &action).unwrap_err();
        assert!(error.is_impossible());
        assert_eq!(error.reason().as_deref(), Some("That way is blocked."));
        assert_eq!(state.actor(hero).unwrap().fighter.energy, 300);
        assert_eq!(state.turn.nonce, 0);
    }

    #[test]
    fn success_costs_exactly_the_action_cost() {
        let (mut state, hero, _) = arena(1);
        let config = GameConfig::default();
        let rng = PcgRng;
        let env = GameEnv::new(&config, &rng);
        let action = Action::bump(hero, Direction::South, &config);

        let report = GameEngine::new(&mut state).perform(&env, &action).unwrap();
        assert_eq!(report.kind, ActionKind::Move(MoveAction::new(Direction::South)));
        assert_eq!(state.actor(hero).unwrap().fighter.energy, 200);
        assert_eq!(state.actor(hero).unwrap().position, Position::new(2, 3));
        assert_eq!(state.turn.nonce, 1);
    }

    #[test]
    fn last_arrow_is_spent_then_refused() {
        let (mut state, hero, target) = arena(1);
        let config = GameConfig::default();
        let rng = PcgRng;
        let vision = ClearSight;
        let env = GameEnv::new(&config, &rng).with_vision(&vision);
        let target_position = state.actor(target).unwrap().position;
        let shot = Action::ranged(hero, target_position, &config);

        GameEngine::new(&mut state).perform(&env, &shot).unwrap();
        assert_eq!(state.actor(hero).unwrap().ammo(), Some((AmmoType::Arrow, 0)));
        assert_eq!(state.actor(hero).unwrap().fighter.energy, 200);

        let error = GameEngine::new(&mut state).perform(&env, &shot).unwrap_err();
        assert_eq!(error.reason().as_deref(), Some("No ammo left."));
        assert_eq!(state.actor(hero).unwrap().fighter.energy, 200);
    }

    #[test]
    fn shooting_yourself_is_refused() {
        let (mut state, hero, _) = arena(3);
        let config = GameConfig::default();
        let rng = PcgRng;
        let vision = ClearSight;
        let env = GameEnv::new(&config, &rng).with_vision(&vision);
        let own = state.actor(hero).unwrap().position;
        let action = Action::new(hero, ActionKind::Ranged(RangedAction::new(own)), &config);

        let error = GameEngine::new(&mut state).perform(&env, &action).unwrap_err();
        assert_eq!(error.reason().as_deref(), Some("You cannot attack yourself!"));
    }

    #[test]
    fn unaffordable_action_is_rejected_before_validation() {
        let (mut state, hero, _) = arena(1);
        state.actor_mut(hero).unwrap().fighter.energy = 40;
        let config = GameConfig::default();
        let rng = PcgRng;
        let env = GameEnv::new(&config, &rng);
        let action = Action::new(hero, ActionKind::Pickup(PickupAction), &config);

        let error = GameEngine::new(&mut state).perform(&env, &action).unwrap_err();
        assert!(matches!(error, ExecuteError::NotEnoughEnergy { energy: 40, cost: 100, .. }));
        assert!(!action.can_perform(&state));
    }

    #[test]
    fn only_the_current_actor_may_act() {
        let (mut state, hero, target) = arena(1);
        state.turn.current_actor = Some(target);
        let config = GameConfig::default();
        let rng = PcgRng;
        let env = GameEnv::new(&config, &rng);

        let error = GameEngine::new(&mut state)
            .perform(&env, &Action::wait(hero, &config))
            .unwrap_err();
        assert!(error.severity().is_internal());
    }
}
