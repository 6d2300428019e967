//! Error types for permission construction
//!
//! Every error here comes from a bad policy definition upstream: an action
//! list that is blank or names an action that does not exist. Checking a
//! permission never fails; only building one can.

use thiserror::Error;

/// Permission construction error types.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PermissionError {
    /// The action list was empty.
    #[error("Actions cannot be blank")]
    BlankActions,

    /// The action list contained a token that is not a known action.
    #[error("Unrecognized action: {0:?}")]
    UnrecognizedAction(String),

    /// A policy configuration entry could not be read.
    #[error("Invalid policy entry {key}: {message}")]
    InvalidPolicy {
        /// Policy key or entry that failed.
        key: String,
        /// Error message.
        message: String,
    },
}

/// Result type for permission operations.
pub type PermissionResult<T> = Result<T, PermissionError>;

impl PermissionError {
    /// Check if this is an invalid-action error (blank or unrecognized action list).
    pub fn is_invalid_action(&self) -> bool {
        matches!(
            self,
            PermissionError::BlankActions | PermissionError::UnrecognizedAction(_)
        )
    }

    /// The offending action token, if this is an invalid-action error.
    ///
    /// A blank action list reports the empty token.
    pub fn token(&self) -> Option<&str> {
        match self {
            PermissionError::BlankActions => Some(""),
            PermissionError::UnrecognizedAction(token) => Some(token),
            PermissionError::InvalidPolicy { .. } => None,
        }
    }

    /// Get error code for diagnostics.
    pub fn error_code(&self) -> &'static str {
        match self {
            PermissionError::BlankActions => "BLANK_ACTIONS",
            PermissionError::UnrecognizedAction(_) => "UNRECOGNIZED_ACTION",
            PermissionError::InvalidPolicy { .. } => "INVALID_POLICY",
        }
    }
}
