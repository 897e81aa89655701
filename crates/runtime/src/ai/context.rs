//! Read-only blackboard for one monster decision.
use delve_core::{
    Action, ActionKind, ActorState, Dice, Direction, EntityId, GameEnv, GameState, Position,
};

/// Everything a behaviour may look at while choosing an action.
///
/// Behaviours never mutate the world; the only thing they write is the
/// actor's [`delve_core::AiMemory`], which the engine stores back after the
/// decision.
pub struct AiContext<'a> {
    pub actor: &'a ActorState,
    pub state: &'a GameState,
    pub env: GameEnv<'a>,
}

impl<'a> AiContext<'a> {
    pub fn new(actor: &'a ActorState, state: &'a GameState, env: GameEnv<'a>) -> Self {
        Self { actor, state, env }
    }

    pub fn id(&self) -> EntityId {
        self.actor.id
    }

    pub fn position(&self) -> Position {
        self.actor.position
    }

    /// The living player on this floor, the only thing monsters hunt.
    pub fn target(&self) -> Option<&'a ActorState> {
        self.state.player().filter(|player| player.alive)
    }

    /// Whether this monster stands in the player's field of view. Sight is
    /// symmetric on the grid, so this doubles as "the monster sees the
    /// player".
    pub fn in_view(&self) -> bool {
        self.env
            .vision()
            .is_ok_and(|vision| vision.is_visible(self.actor.position))
    }

    pub fn distance_to(&self, other: Position) -> u32 {
        self.actor.position.chebyshev(other)
    }

    /// Steps towards `to`, nearest first; empty when unreachable.
    pub fn path_to(&self, to: Position) -> Vec<Position> {
        self.env
            .vision()
            .map(|vision| vision.path_to(self.state.floor(), self.actor.position, to))
            .unwrap_or_default()
    }

    /// Dice private to this actor at the current action nonce.
    pub fn dice(&self) -> Dice<'a> {
        Dice::for_actor(self.env.rng(), self.state, self.actor.id)
    }

    pub fn random_direction(&self, context: u32) -> Direction {
        let index = self.dice().range(context, 0, Direction::ALL.len() as u32 - 1);
        Direction::ALL[index as usize]
    }

    pub fn action(&self, kind: ActionKind) -> Action {
        Action::new(self.actor.id, kind, self.env.config())
    }

    pub fn wait(&self) -> Action {
        Action::wait(self.actor.id, self.env.config())
    }
}
