//! Abstraction for sourcing player intent.
//!
//! The engine asks a [`DecisionSource`] whenever the player-controlled actor
//! is selected. This is the single point where the loop waits for the
//! outside world; monsters decide through [`crate::ai`] instead.
use std::collections::VecDeque;

use delve_core::{Action, ActionKind, ActorState, EntityId, GameConfig, GameState, VisionOracle};

/// Read-only view handed to a decision source for one activation.
#[derive(Clone, Copy)]
pub struct DecisionContext<'a> {
    pub actor: EntityId,
    pub state: &'a GameState,
    pub config: &'a GameConfig,
    pub vision: &'a dyn VisionOracle,
}

impl<'a> DecisionContext<'a> {
    pub fn actor_state(&self) -> Option<&'a ActorState> {
        self.state.actor(self.actor)
    }

    /// Binds `kind` to the acting entity at its default cost.
    pub fn action(&self, kind: ActionKind) -> Action {
        Action::new(self.actor, kind, self.config)
    }
}

/// Trait for providing the player's actions.
///
/// Different implementations can handle:
/// - Interactive input from a terminal or UI
/// - Scripted or replayed command lists
/// - An autopilot for headless runs
pub trait DecisionSource {
    /// The action to attempt next, or `None` if the actor will not act
    /// again this round.
    fn next_action(&mut self, ctx: &DecisionContext<'_>) -> Option<Action>;

    /// Called when the last action was refused. The refusal has already
    /// been narrated; the actor stays queued and will be asked again.
    fn on_rejected(&mut self, _action: &Action, _reason: &str) {}
}

/// Always waits. Useful for tests or as a fallback.
#[derive(Clone, Copy, Debug, Default)]
pub struct WaitDecisions;

impl DecisionSource for WaitDecisions {
    fn next_action(&mut self, ctx: &DecisionContext<'_>) -> Option<Action> {
        Some(Action::wait(ctx.actor, ctx.config))
    }
}

/// Replays a fixed list of action kinds, then passes.
///
/// Refusals are recorded so callers can assert on them.
#[derive(Clone, Debug, Default)]
pub struct ScriptedDecisions {
    queue: VecDeque<ActionKind>,
    rejections: Vec<String>,
}

impl ScriptedDecisions {
    pub fn new(kinds: impl IntoIterator<Item = ActionKind>) -> Self {
        Self {
            queue: kinds.into_iter().collect(),
            rejections: Vec::new(),
        }
    }

    pub fn push(&mut self, kind: ActionKind) {
        self.queue.push_back(kind);
    }

    pub fn remaining(&self) -> usize {
        self.queue.len()
    }

    pub fn rejections(&self) -> &[String] {
        &self.rejections
    }
}

impl DecisionSource for ScriptedDecisions {
    fn next_action(&mut self, ctx: &DecisionContext<'_>) -> Option<Action> {
        self.queue.pop_front().map(|kind| ctx.action(kind))
    }

    fn on_rejected(&mut self, _action: &Action, reason: &str) {
        self.rejections.push(reason.to_owned());
    }
}
