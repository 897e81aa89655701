use crate::action::{ActionContext, ActionTransition};
use crate::env::{GameEnv, OracleError};
use crate::error::{ErrorSeverity, GameError};
use crate::event::GameEvent;
use crate::lifecycle;
use crate::state::{EntityId, GameState};

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum StairsError {
    #[error("actor {0} not found")]
    ActorNotFound(EntityId),

    #[error("There are no stairs here.")]
    NoStairs,

    #[error("The way is sealed.")]
    Sealed,

    #[error(transparent)]
    Oracle(#[from] OracleError),
}

impl GameError for StairsError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            Self::NoStairs | Self::Sealed => ErrorSeverity::Impossible,
            Self::ActorNotFound(_) | Self::Oracle(_) => ErrorSeverity::Internal,
        }
    }
}

/// Takes the stairs under the actor.
///
/// Upstairs lead to `depth + 1`, downstairs back to `depth - 1`. Unvisited
/// floors are built from the floor oracle; visited ones are reused as
/// they were left. The traveller arrives on the matching stairs of the new
/// floor (or the nearest free tile) and the running round ends.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TakeStairsAction;

impl TakeStairsAction {
    /// `(destination depth, ascending)`.
    fn destination(actor: EntityId, state: &GameState) -> Result<(u32, bool), StairsError> {
        let position = state
            .actor(actor)
            .filter(|actor| actor.alive)
            .ok_or(StairsError::ActorNotFound(actor))?
            .position;
        let floor = state.floor();
        let depth = floor.depth;
        if floor.upstairs == Some(position) {
            Ok((depth + 1, true))
        } else if floor.downstairs == Some(position) {
            if depth <= 1 {
                return Err(StairsError::Sealed);
            }
            Ok((depth - 1, false))
        } else {
            Err(StairsError::NoStairs)
        }
    }
}

impl ActionTransition for TakeStairsAction {
    type Error = StairsError;

    fn pre_validate(
        &self,
        actor: EntityId,
        state: &GameState,
        env: &GameEnv<'_>,
    ) -> Result<(), Self::Error> {
        let (depth, _) = Self::destination(actor, state)?;
        if !state.world.has_floor(depth) && env.floors()?.floor(depth).is_none() {
            return Err(StairsError::Sealed);
        }
        Ok(())
    }

    fn apply(&self, ctx: &mut ActionContext<'_, '_>) -> Result<(), Self::Error> {
        let actor = ctx.actor;
        let (depth, ascended) = Self::destination(actor, ctx.state)?;

        if !ctx.state.world.has_floor(depth) {
            let blueprint = ctx.env.floors()?.floor(depth).ok_or(StairsError::Sealed)?;
            let catalog = ctx.env.catalog()?;
            let floor = lifecycle::materialize_floor(ctx.state, depth, &blueprint, catalog)?;
            ctx.state.world.insert_floor(floor);
        }

        let mut traveller = ctx
            .state
            .floor_mut()
            .actors
            .remove(&actor)
            .ok_or(StairsError::ActorNotFound(actor))?;
        ctx.state.turn.scheduler.clear();
        ctx.state.turn.deferred.clear();
        ctx.state.world.set_current(depth);

        let floor = ctx.state.floor_mut();
        let stairs = if ascended {
            floor.downstairs
        } else {
            floor.upstairs
        };
        let arrival = stairs
            .or_else(|| floor.first_walkable())
            .and_then(|target| floor.nearest_free(target))
            .unwrap_or(traveller.position);
        traveller.position = arrival;
        floor.actors.insert(actor, traveller);

        tracing::info!(depth, ascended, "changed floor");
        ctx.emit(GameEvent::FloorChanged { depth, ascended });
        Ok(())
    }

    fn post_validate(
        &self,
        actor: EntityId,
        state: &GameState,
        _env: &GameEnv<'_>,
    ) -> Result<(), Self::Error> {
        state
            .actor(actor)
            .map(|_| ())
            .ok_or(StairsError::ActorNotFound(actor))
    }
}
