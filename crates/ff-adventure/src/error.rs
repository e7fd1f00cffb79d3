//! Error types for adventure sessions.

use thiserror::Error;

/// Result type for adventure operations.
pub type AdventureResult<T> = Result<T, AdventureError>;

/// Errors that can occur while running an adventure.
#[derive(Debug, Error)]
pub enum AdventureError {
    /// A game rule refused the operation.
    #[error("{0}")]
    Rule(#[from] ff_mechanics::RuleError),

    /// The save store could not be read or written.
    #[error("persistence failure: {0}")]
    Persistence(String),

    /// A snapshot could not be encoded or decoded.
    #[error("snapshot JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// A command line could not be understood.
    #[error("{0}")]
    InvalidCommand(String),
}

impl AdventureError {
    /// Whether this is a refusal by the game rules rather than an I/O problem.
    pub fn is_rule(&self) -> bool {
        matches!(self, Self::Rule(_))
    }
}
