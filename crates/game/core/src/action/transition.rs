use crate::env::GameEnv;
use crate::error::GameError;
use crate::event::GameEvent;
use crate::state::{ActorState, EntityId, GameState};

/// Mutable view handed to [`ActionTransition::apply`].
pub struct ActionContext<'s, 'e> {
    pub actor: EntityId,
    pub state: &'s mut GameState,
    pub env: &'s GameEnv<'e>,
    pub events: Vec<GameEvent>,
}

impl<'s, 'e> ActionContext<'s, 'e> {
    pub fn new(actor: EntityId, state: &'s mut GameState, env: &'s GameEnv<'e>) -> Self {
        Self {
            actor,
            state,
            env,
            events: Vec::new(),
        }
    }

    pub fn emit(&mut self, event: GameEvent) {
        self.events.push(event);
    }

    pub fn actor_state(&self) -> Option<&ActorState> {
        self.state.actor(self.actor)
    }

    pub fn actor_state_mut(&mut self) -> Option<&mut ActorState> {
        self.state.actor_mut(self.actor)
    }
}

/// Defines how a concrete action variant mutates game state.
///
/// Every precondition that may fail with an `Impossible` error belongs in
/// `pre_validate`, which runs before energy is spent; `apply` assumes those
/// checks passed and only fails on broken invariants.
pub trait ActionTransition {
    type Error: GameError;

    /// Validates pre-conditions using the state **before** mutation.
    fn pre_validate(
        &self,
        _actor: EntityId,
        _state: &GameState,
        _env: &GameEnv<'_>,
    ) -> Result<(), Self::Error> {
        Ok(())
    }

    /// Applies the action by mutating the game state directly.
    fn apply(&self, ctx: &mut ActionContext<'_, '_>) -> Result<(), Self::Error>;

    /// Validates post-conditions using the state **after** mutation.
    fn post_validate(
        &self,
        _actor: EntityId,
        _state: &GameState,
        _env: &GameEnv<'_>,
    ) -> Result<(), Self::Error> {
        Ok(())
    }
}
