//! Prize draw errors.

use thiserror::Error;

/// Rejected outcome table configuration.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum OutcomeTableError {
    #[error("Outcome table must contain at least one outcome")]
    Empty,

    #[error("Invalid weight {weight} for outcome '{label}'")]
    InvalidWeight { label: String, weight: f64 },

    #[error("Unknown outcome table preset: {0}")]
    UnknownPreset(String),
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DrawError {
    /// The session already spent its draw. Carries the locked index.
    #[error("Draw already used (outcome {index})")]
    AlreadyUsed { index: usize },
}
