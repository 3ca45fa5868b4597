//! Error types for choice resolution.

use thiserror::Error;

/// Errors raised while reading, resolving or undoing pending choices.
///
/// Every variant is raised synchronously by the component that detects it
/// and is meant to reach the caller unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ChoiceError {
    /// The choice id does not decode to the five identity fields.
    #[error("Malformed choice id '{id}': {reason}")]
    MalformedIdentity { id: String, reason: String },

    /// The submitted selection breaks the choice's constraints.
    #[error("Invalid selection: {0}")]
    SelectionInvalid(String),

    /// Undo attempted on an irreversible choice or after its window closed.
    #[error("Choice cannot be undone: {0}")]
    NotUndoable(String),

    /// The id decoded, but the character has no such choice right now.
    #[error("No pending choice with id '{0}'")]
    ChoiceNotFound(String),

    /// No character with this id is loaded.
    #[error("Character not found: {0}")]
    CharacterNotFound(String),
}

impl ChoiceError {
    pub fn invalid(message: impl Into<String>) -> Self {
        ChoiceError::SelectionInvalid(message.into())
    }

    pub fn malformed(id: impl Into<String>, reason: impl Into<String>) -> Self {
        ChoiceError::MalformedIdentity {
            id: id.into(),
            reason: reason.into(),
        }
    }

    pub fn not_undoable(message: impl Into<String>) -> Self {
        ChoiceError::NotUndoable(message.into())
    }
}

pub type Result<T, E = ChoiceError> = std::result::Result<T, E>;
