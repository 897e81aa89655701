use crate::action::{ActionContext, ActionKind, ActionTransition};
use crate::env::GameEnv;
use crate::error::{ErrorSeverity, GameError, NeverError};
use crate::event::GameEvent;
use crate::state::{Direction, EntityId, GameState, Position};

use super::MeleeAction;

#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
pub enum MoveError {
    #[error("actor {0} not found")]
    ActorNotFound(EntityId),

    #[error("You can't move while being grappled!")]
    Grappled,

    #[error("That way is blocked.")]
    Blocked { destination: Position },

    #[error("actor {actor} did not arrive at {expected}")]
    PositionDesync { actor: EntityId, expected: Position },
}

impl GameError for MoveError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            Self::Grappled | Self::Blocked { .. } => ErrorSeverity::Impossible,
            Self::ActorNotFound(_) | Self::PositionDesync { .. } => ErrorSeverity::Internal,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
pub enum DoorError {
    #[error("actor {0} not found")]
    ActorNotFound(EntityId),

    #[error("There is no door there.")]
    NoDoor { position: Position },
}

impl GameError for DoorError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            Self::NoDoor { .. } => ErrorSeverity::Impossible,
            Self::ActorNotFound(_) => ErrorSeverity::Internal,
        }
    }
}

/// Passes the turn.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct WaitAction;

impl ActionTransition for WaitAction {
    type Error = NeverError;

    fn apply(&self, _ctx: &mut ActionContext<'_, '_>) -> Result<(), Self::Error> {
        Ok(())
    }
}

/// One step in a direction.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MoveAction {
    pub direction: Direction,
}

impl MoveAction {
    pub fn new(direction: Direction) -> Self {
        Self { direction }
    }
}

impl ActionTransition for MoveAction {
    type Error = MoveError;

    fn pre_validate(
        &self,
        actor: EntityId,
        state: &GameState,
        _env: &GameEnv<'_>,
    ) -> Result<(), Self::Error> {
        let actor_state = state.actor(actor).ok_or(MoveError::ActorNotFound(actor))?;
        if actor_state.status.grappled {
            return Err(MoveError::Grappled);
        }
        let destination = actor_state.position.step(self.direction);
        if !state.floor().is_free(destination) {
            return Err(MoveError::Blocked { destination });
        }
        Ok(())
    }

    fn apply(&self, ctx: &mut ActionContext<'_, '_>) -> Result<(), Self::Error> {
        let actor = ctx.actor;
        let actor_state = ctx
            .actor_state_mut()
            .ok_or(MoveError::ActorNotFound(actor))?;
        let from = actor_state.position;
        let to = from.step(self.direction);
        actor_state.position = to;
        let is_player = actor_state.is_player();

        ctx.emit(GameEvent::Moved { actor, from, to });
        if is_player {
            let underfoot = ctx
                .state
                .floor()
                .items_at(to)
                .next()
                .map(|ground| ground.item.name.clone());
            if let Some(item) = underfoot {
                ctx.emit(GameEvent::ItemUnderfoot { actor, item });
            }
        }
        Ok(())
    }

    fn post_validate(
        &self,
        actor: EntityId,
        state: &GameState,
        _env: &GameEnv<'_>,
    ) -> Result<(), Self::Error> {
        let actor_state = state.actor(actor).ok_or(MoveError::ActorNotFound(actor))?;
        let blocker = state.floor().blocking_actor_at(actor_state.position);
        match blocker {
            Some(found) if found.id == actor => Ok(()),
            _ => Err(MoveError::PositionDesync {
                actor,
                expected: actor_state.position,
            }),
        }
    }
}

/// Opens the closed door in a direction.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct OpenDoorAction {
    pub direction: Direction,
}

impl OpenDoorAction {
    fn door(&self, actor: EntityId, state: &GameState) -> Result<Position, DoorError> {
        let actor_state = state.actor(actor).ok_or(DoorError::ActorNotFound(actor))?;
        Ok(actor_state.position.step(self.direction))
    }
}

impl ActionTransition for OpenDoorAction {
    type Error = DoorError;

    fn pre_validate(
        &self,
        actor: EntityId,
        state: &GameState,
        _env: &GameEnv<'_>,
    ) -> Result<(), Self::Error> {
        let position = self.door(actor, state)?;
        if !state.floor().tile(position).is_closed_door() {
            return Err(DoorError::NoDoor { position });
        }
        Ok(())
    }

    fn apply(&self, ctx: &mut ActionContext<'_, '_>) -> Result<(), Self::Error> {
        let position = self.door(ctx.actor, ctx.state)?;
        if !ctx.state.floor_mut().open_door(position) {
            return Err(DoorError::NoDoor { position });
        }
        ctx.emit(GameEvent::DoorOpened {
            actor: ctx.actor,
            position,
        });
        Ok(())
    }
}

/// Directional input resolved against the world at execution time.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BumpAction {
    pub direction: Direction,
}

impl BumpAction {
    pub fn new(direction: Direction) -> Self {
        Self { direction }
    }

    /// A living body ahead means melee, a closed door means opening it,
    /// anything else is a plain move.
    pub fn resolve(&self, actor: EntityId, state: &GameState) -> ActionKind {
        let Some(origin) = state.actor(actor).map(|actor| actor.position) else {
            return ActionKind::Move(MoveAction::new(self.direction));
        };
        let destination = origin.step(self.direction);
        let floor = state.floor();
        if floor
            .blocking_actor_at(destination)
            .is_some_and(|target| target.alive)
        {
            ActionKind::Melee(MeleeAction::new(self.direction))
        } else if floor.tile(destination).is_closed_door() {
            ActionKind::OpenDoor(OpenDoorAction {
                direction: self.direction,
            })
        } else {
            ActionKind::Move(MoveAction::new(self.direction))
        }
    }
}
