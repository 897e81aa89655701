//! Error types raised by save repositories.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("save repository lock was poisoned")]
    LockPoisoned,

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(String),

    #[error("invalid save slot name {0:?}")]
    InvalidSlot(String),

    #[error("save format {found} is not supported (expected {expected})")]
    IncompatibleVersion { found: u32, expected: u32 },
}

pub type Result<T> = std::result::Result<T, RepositoryError>;
