//! Registrant store errors.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Storage I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Invalid storage key: {0}")]
    InvalidKey(String),
}

/// Returned by [`crate::DedupStore::register`] when the identifier was seen before.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Registrant already recorded: {0}")]
pub struct DuplicateRegistrant(pub String);
