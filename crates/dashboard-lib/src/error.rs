//! Error types for dashboard actions

use thiserror::Error;

/// A client name rejected before any request is sent
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Please enter a valid name.")]
    Empty,

    #[error("Name may not contain the character {0:?}.")]
    ForbiddenCharacter(char),

    #[error("Name may not be longer than {max} characters.")]
    TooLong { max: usize },

    #[error("The new name is the same as the current name.")]
    Unchanged,
}

/// Failure talking to the manager backend
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("failed to send request: {0}")]
    Transport(String),

    #[error("API error ({status}): {body}")]
    Status { status: u16, body: String },

    #[error("failed to parse response: {0}")]
    Decode(String),

    #[error("invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),
}

/// Failure of a user-triggered action
#[derive(Debug, Error)]
pub enum ActionError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("request failed: {0}")]
    Request(#[from] ApiError),

    #[error("another action is still in progress")]
    Busy,

    #[error("page session closed before the request completed")]
    Cancelled,
}

impl ActionError {
    /// Whether the failure happened before any request was issued
    pub fn is_local(&self) -> bool {
        matches!(self, ActionError::Validation(_) | ActionError::Busy)
    }
}
