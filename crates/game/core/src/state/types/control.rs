//! Decision sources attached to actors.
//!
//! The core only stores which behaviour drives an actor and the memory that
//! behaviour keeps between turns. The decision logic itself lives in the
//! runtime, which reads and writes [`AiState`] around each activation.

use super::Position;

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Controller {
    /// Actions come from the external input adapter.
    Player,
    Ai(AiState),
    /// Corpses and other actors that never act.
    Inert,
}

impl Controller {
    pub fn ai(kind: AiKind) -> Self {
        Self::Ai(AiState::new(kind))
    }

    pub fn is_player(&self) -> bool {
        matches!(self, Self::Player)
    }

    pub fn ai_kind(&self) -> Option<&AiKind> {
        match self {
            Self::Ai(state) => Some(&state.kind),
            _ => None,
        }
    }
}

/// Closed set of monster behaviours.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum AiKind {
    /// Walks towards the player once seen and attacks when adjacent.
    MeleeChaser,
    /// Never moves; shoots the player whenever it is in view.
    StaticRanged,
    /// Alternates between flying away from the player and chasing it,
    /// switching phase every `min_period..=max_period` turns.
    FleeThenEngage { min_period: u32, max_period: u32 },
    /// Stumbles in a random direction every turn.
    ConfusedWalk,
    /// Calls `count` minions around itself the first time it sees the
    /// player, then behaves like a chaser.
    Summoner {
        minion: String,
        count: u32,
        radius: u32,
    },
    /// Leaps onto the player from up to `reach` tiles away.
    Pouncer { reach: u32 },
}

/// Per-actor scratch memory used by the behaviours.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AiMemory {
    /// Remaining steps of the current path, nearest first.
    pub path: Vec<Position>,
    /// Current phase of `FleeThenEngage`.
    pub engaged: bool,
    /// Turns left in the current phase.
    pub phase_turns: u32,
    pub summoned: bool,
}

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AiState {
    pub kind: AiKind,
    #[cfg_attr(feature = "serde", serde(default))]
    pub memory: AiMemory,
}

impl AiState {
    pub fn new(kind: AiKind) -> Self {
        Self {
            kind,
            memory: AiMemory::default(),
        }
    }
}
