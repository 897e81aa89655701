//! Validation of raw inventory selections coming from an input adapter.
//!
//! Inventory slots are addressed by letter, `a` being the first item.
//! Malformed selections never reach the action pipeline; they surface as
//! [`ErrorSeverity::InvalidInput`] so the adapter can report them and wait
//! for new input.
use delve_core::{ActorState, ColorTag, ErrorSeverity, GameError, ItemState, MessageSink};

#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
pub enum SelectionError {
    #[error("Invalid entry.")]
    NotALetter(char),

    #[error("Invalid entry.")]
    EmptySlot(usize),

    #[error("Your inventory is empty.")]
    EmptyInventory,
}

impl GameError for SelectionError {
    fn severity(&self) -> ErrorSeverity {
        ErrorSeverity::InvalidInput
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::NotALetter(_) => "SELECTION_NOT_A_LETTER",
            Self::EmptySlot(_) => "SELECTION_EMPTY_SLOT",
            Self::EmptyInventory => "SELECTION_EMPTY_INVENTORY",
        }
    }
}

impl SelectionError {
    /// Reports the error to the player.
    pub fn report(&self, sink: &mut dyn MessageSink) {
        sink.add_message(self.to_string(), ColorTag::InvalidInput);
    }
}

/// Zero-based slot index for an inventory letter.
pub fn slot_index(letter: char) -> Result<usize, SelectionError> {
    if letter.is_ascii_lowercase() {
        Ok(letter as usize - 'a' as usize)
    } else {
        Err(SelectionError::NotALetter(letter))
    }
}

/// Letter shown next to the item in `index`.
pub fn slot_letter(index: usize) -> Option<char> {
    u8::try_from(index)
        .ok()
        .filter(|index| *index < 26)
        .map(|index| char::from(b'a' + index))
}

/// The item under `letter` in the actor's inventory.
pub fn select_item(actor: &ActorState, letter: char) -> Result<&ItemState, SelectionError> {
    if actor.inventory.is_empty() {
        return Err(SelectionError::EmptyInventory);
    }
    let index = slot_index(letter)?;
    actor
        .inventory
        .slot(index)
        .ok_or(SelectionError::EmptySlot(index))
}
