//! Opaque binary snapshots of the whole game state.
//!
//! The encoding is bincode over the serde derives; the core has no opinion
//! on where the bytes go.

use super::GameState;

#[derive(Debug, thiserror::Error)]
pub enum SnapshotError {
    #[error("failed to encode game state: {0}")]
    Encode(#[source] bincode::Error),

    #[error("failed to decode game state: {0}")]
    Decode(#[source] bincode::Error),
}

impl GameState {
    /// # Errors
    ///
    /// Returns `SnapshotError::Encode` if serialization fails.
    pub fn to_snapshot(&self) -> Result<Vec<u8>, SnapshotError> {
        bincode::serialize(self).map_err(SnapshotError::Encode)
    }

    /// # Errors
    ///
    /// Returns `SnapshotError::Decode` if the bytes are not a snapshot.
    pub fn from_snapshot(bytes: &[u8]) -> Result<Self, SnapshotError> {
        bincode::deserialize(bytes).map_err(SnapshotError::Decode)
    }
}
