//! Error types for the rules engine.

use crate::encounter::EncounterId;

/// Errors that can occur during rules operations.
///
/// Every variant is recoverable. Apart from [`RuleError::EncounterNotFound`]
/// and guards on the manual steppers, the engine also writes a readable line
/// to the event log before returning the error.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RuleError {
    /// An operation needs rolled stats but the sheet is still unrolled.
    #[error("roll stats first")]
    StatsNotRolled,

    /// A provision was eaten with none left.
    #[error("no provisions left")]
    NoProvisions,

    /// The adventure's potion has already been drunk.
    #[error("potion already used this adventure")]
    AlreadyUsed,

    /// The potion was drunk before one was chosen.
    #[error("choose a potion first")]
    NoPotionChosen,

    /// Combat was requested without an active encounter.
    #[error("no active monster selected")]
    NoActiveEncounter,

    /// The active encounter is defeated or escaped.
    #[error("active monster is not in 'active' status")]
    EncounterNotActive,

    /// Creation or command parameters were malformed.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// No encounter has the given id.
    #[error("encounter '{0}' not found")]
    EncounterNotFound(EncounterId),
}

/// Convenience result type for rules operations.
pub type RuleResult<T> = Result<T, RuleError>;
