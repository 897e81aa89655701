//! Action transition dispatch and execution logic.

use crate::action::{ActionContext, ActionKind, ActionTransition};
use crate::env::GameEnv;
use crate::event::GameEvent;
use crate::state::{EntityId, GameState};

use super::errors::{ExecuteError, TransitionPhase, TransitionPhaseError};

/// Drives one transition through the pipeline.
///
/// Phases:
/// 1. `pre_validate` - every `Impossible` check, state untouched
/// 2. exhaust - the actor pays `cost`
/// 3. `apply` - mutate the game state
/// 4. `post_validate` - verify postconditions after mutation
#[inline]
fn drive_transition<T>(
    transition: &T,
    actor: EntityId,
    cost: i32,
    state: &mut GameState,
    env: &GameEnv<'_>,
) -> Result<Vec<GameEvent>, TransitionPhaseError<T::Error>>
where
    T: ActionTransition,
{
    transition
        .pre_validate(actor, state, env)
        .map_err(|error| TransitionPhaseError::new(TransitionPhase::PreValidate, error))?;

    if let Some(actor_state) = state.actor_mut(actor) {
        actor_state.fighter.energy -= cost;
    }

    let mut ctx = ActionContext::new(actor, state, env);
    transition
        .apply(&mut ctx)
        .map_err(|error| TransitionPhaseError::new(TransitionPhase::Apply, error))?;
    let events = ctx.events;

    transition
        .post_validate(actor, state, env)
        .map_err(|error| TransitionPhaseError::new(TransitionPhase::PostValidate, error))?;

    Ok(events)
}

/// Routes a concrete (already resolved) kind to its transition.
pub(super) fn execute_transition(
    kind: &ActionKind,
    actor: EntityId,
    cost: i32,
    state: &mut GameState,
    env: &GameEnv<'_>,
) -> Result<Vec<GameEvent>, ExecuteError> {
    match kind {
        ActionKind::Wait(transition) => {
            drive_transition(transition, actor, cost, state, env).map_err(ExecuteError::Wait)
        }
        ActionKind::Move(transition) => {
            drive_transition(transition, actor, cost, state, env).map_err(ExecuteError::Move)
        }
        ActionKind::Bump(bump) => {
            let resolved = bump.resolve(actor, state);
            execute_transition(&resolved, actor, cost, state, env)
        }
        ActionKind::OpenDoor(transition) => {
            drive_transition(transition, actor, cost, state, env).map_err(ExecuteError::Door)
        }
        ActionKind::Melee(transition) => {
            drive_transition(transition, actor, cost, state, env).map_err(ExecuteError::Attack)
        }
        ActionKind::Ranged(transition) => {
            drive_transition(transition, actor, cost, state, env).map_err(ExecuteError::Attack)
        }
        ActionKind::Pounce(transition) => {
            drive_transition(transition, actor, cost, state, env).map_err(ExecuteError::Attack)
        }
        ActionKind::Pickup(transition) => {
            drive_transition(transition, actor, cost, state, env).map_err(ExecuteError::Inventory)
        }
        ActionKind::Drop(transition) => {
            drive_transition(transition, actor, cost, state, env).map_err(ExecuteError::Inventory)
        }
        ActionKind::Equip(transition) => {
            drive_transition(transition, actor, cost, state, env).map_err(ExecuteError::Inventory)
        }
        ActionKind::UseItem(transition) => {
            drive_transition(transition, actor, cost, state, env).map_err(ExecuteError::Inventory)
        }
        ActionKind::QuickHeal(transition) => {
            drive_transition(transition, actor, cost, state, env).map_err(ExecuteError::Inventory)
        }
        ActionKind::TakeStairs(transition) => {
            drive_transition(transition, actor, cost, state, env).map_err(ExecuteError::Stairs)
        }
        ActionKind::Summon(transition) => {
            drive_transition(transition, actor, cost, state, env).map_err(ExecuteError::Summon)
        }
        ActionKind::LevelUp(transition) => {
            drive_transition(transition, actor, cost, state, env).map_err(ExecuteError::LevelUp)
        }
    }
}
