//! Shared error classification.
//!
//! Each action owns its error enum (`MoveError`, `AttackError`, ...). They
//! all implement [`GameError`], which lets the engine loop tell an expected
//! refusal apart from a broken invariant without matching on variants.

/// How the loop should react to a failed action.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ErrorSeverity {
    /// The precondition does not hold right now ("That way is blocked.").
    /// The actor keeps its energy and may try something else.
    Impossible,
    /// The request names something that is not there, such as an item the
    /// actor does not carry.
    InvalidInput,
    /// State inconsistency; a bug.
    Internal,
    /// The game cannot continue.
    Fatal,
}

impl ErrorSeverity {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Impossible => "impossible",
            Self::InvalidInput => "invalid_input",
            Self::Internal => "internal",
            Self::Fatal => "fatal",
        }
    }

    /// Scoped to a single attempt; the game goes on.
    pub const fn is_recoverable(&self) -> bool {
        matches!(self, Self::Impossible | Self::InvalidInput)
    }

    pub const fn is_internal(&self) -> bool {
        matches!(self, Self::Internal | Self::Fatal)
    }
}

/// Implemented by every error a transition can raise.
///
/// The `Display` text of an [`ErrorSeverity::Impossible`] error is shown to
/// the player as is, so it reads as a sentence.
pub trait GameError: core::fmt::Display + core::fmt::Debug {
    fn severity(&self) -> ErrorSeverity;

    /// Stable identifier for logs.
    fn error_code(&self) -> &'static str {
        core::any::type_name::<Self>()
    }
}

/// Error of transitions that cannot fail.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error("unreachable")]
pub enum NeverError {}

impl GameError for NeverError {
    fn severity(&self) -> ErrorSeverity {
        match *self {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn refusals_are_recoverable_bugs_are_not() {
        assert!(ErrorSeverity::Impossible.is_recoverable());
        assert!(ErrorSeverity::InvalidInput.is_recoverable());
        assert!(!ErrorSeverity::Internal.is_recoverable());
        assert!(ErrorSeverity::Fatal.is_internal());
        assert!(!ErrorSeverity::Impossible.is_internal());
    }
}
