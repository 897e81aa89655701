//! Error types for the action execution pipeline.

use crate::action::{
    AttackError, DoorError, InventoryError, LevelUpError, MoveError, StairsError, SummonError,
};
use crate::error::{ErrorSeverity, GameError, NeverError};
use crate::state::EntityId;

/// Identifies which stage of the transition pipeline produced an error.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TransitionPhase {
    PreValidate,
    Apply,
    PostValidate,
}

impl TransitionPhase {
    pub fn as_str(&self) -> &'static str {
        match self {
            TransitionPhase::PreValidate => "pre_validate",
            TransitionPhase::Apply => "apply",
            TransitionPhase::PostValidate => "post_validate",
        }
    }
}

/// Associates a transition phase with the underlying error.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TransitionPhaseError<E> {
    pub phase: TransitionPhase,
    pub error: E,
}

impl<E> TransitionPhaseError<E> {
    pub fn new(phase: TransitionPhase, error: E) -> Self {
        Self { phase, error }
    }
}

impl<E: GameError> TransitionPhaseError<E> {
    /// An `Impossible` error only counts as such before anything changed;
    /// after exhaustion every failure is an invariant violation.
    fn severity(&self) -> ErrorSeverity {
        match (self.phase, self.error.severity()) {
            (TransitionPhase::PreValidate, severity) => severity,
            (_, ErrorSeverity::Fatal) => ErrorSeverity::Fatal,
            _ => ErrorSeverity::Internal,
        }
    }
}

impl<E: std::fmt::Display> std::fmt::Display for TransitionPhaseError<E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} failed: {}", self.phase.as_str(), self.error)
    }
}

impl<E: std::fmt::Display + std::fmt::Debug> std::error::Error for TransitionPhaseError<E> {}

/// Errors surfaced while executing an action through the game engine.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ExecuteError {
    #[error("wait action failed: {0}")]
    Wait(TransitionPhaseError<NeverError>),

    #[error("move action failed: {0}")]
    Move(TransitionPhaseError<MoveError>),

    #[error("open door action failed: {0}")]
    Door(TransitionPhaseError<DoorError>),

    #[error("attack action failed: {0}")]
    Attack(TransitionPhaseError<AttackError>),

    #[error("inventory action failed: {0}")]
    Inventory(TransitionPhaseError<InventoryError>),

    #[error("stairs action failed: {0}")]
    Stairs(TransitionPhaseError<StairsError>),

    #[error("summon action failed: {0}")]
    Summon(TransitionPhaseError<SummonError>),

    #[error("level up action failed: {0}")]
    LevelUp(TransitionPhaseError<LevelUpError>),

    #[error("actor {0} is not on the current floor or is dead")]
    ActorNotFound(EntityId),

    #[error("invalid actor: action actor {actor} does not match current turn actor {current:?}")]
    ActorNotCurrent {
        actor: EntityId,
        current: Option<EntityId>,
    },

    #[error("actor {actor} has {energy} energy, action costs {cost}")]
    NotEnoughEnergy {
        actor: EntityId,
        energy: i32,
        cost: i32,
    },
}

impl ExecuteError {
    /// The message shown to the acting side, for `Impossible` and
    /// `InvalidInput` failures.
    pub fn reason(&self) -> Option<String> {
        fn text<E: GameError>(inner: &TransitionPhaseError<E>) -> String {
            inner.error.to_string()
        }
        if !self.severity().is_recoverable() {
            return None;
        }
        Some(match self {
            Self::Wait(inner) => text(inner),
            Self::Move(inner) => text(inner),
            Self::Door(inner) => text(inner),
            Self::Attack(inner) => text(inner),
            Self::Inventory(inner) => text(inner),
            Self::Stairs(inner) => text(inner),
            Self::Summon(inner) => text(inner),
            Self::LevelUp(inner) => text(inner),
            other => other.to_string(),
        })
    }

    pub fn is_impossible(&self) -> bool {
        self.severity() == ErrorSeverity::Impossible
    }

    pub fn phase(&self) -> Option<TransitionPhase> {
        match self {
            Self::Wait(inner) => Some(inner.phase),
            Self::Move(inner) => Some(inner.phase),
            Self::Door(inner) => Some(inner.phase),
            Self::Attack(inner) => Some(inner.phase),
            Self::Inventory(inner) => Some(inner.phase),
            Self::Stairs(inner) => Some(inner.phase),
            Self::Summon(inner) => Some(inner.phase),
            Self::LevelUp(inner) => Some(inner.phase),
            _ => None,
        }
    }
}

impl GameError for ExecuteError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            Self::Wait(inner) => inner.severity(),
            Self::Move(inner) => inner.severity(),
            Self::Door(inner) => inner.severity(),
            Self::Attack(inner) => inner.severity(),
            Self::Inventory(inner) => inner.severity(),
            Self::Stairs(inner) => inner.severity(),
            Self::Summon(inner) => inner.severity(),
            Self::LevelUp(inner) => inner.severity(),
            Self::NotEnoughEnergy { .. } => ErrorSeverity::Impossible,
            Self::ActorNotFound(_) | Self::ActorNotCurrent { .. } => ErrorSeverity::Internal,
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::Wait(_) => "EXECUTE_WAIT",
            Self::Move(_) => "EXECUTE_MOVE",
            Self::Door(_) => "EXECUTE_DOOR",
            Self::Attack(_) => "EXECUTE_ATTACK",
            Self::Inventory(_) => "EXECUTE_INVENTORY",
            Self::Stairs(_) => "EXECUTE_STAIRS",
            Self::Summon(_) => "EXECUTE_SUMMON",
            Self::LevelUp(_) => "EXECUTE_LEVEL_UP",
            Self::ActorNotFound(_) => "EXECUTE_ACTOR_NOT_FOUND",
            Self::ActorNotCurrent { .. } => "EXECUTE_ACTOR_NOT_CURRENT",
            Self::NotEnoughEnergy { .. } => "EXECUTE_NOT_ENOUGH_ENERGY",
        }
    }
}
