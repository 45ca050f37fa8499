//! Social error types
//!
//! Errors surfaced by the mutators, the comment ledger, the notification
//! emitter and the engine.

use thiserror::Error;
use trellis_core::{StorageError, TimeError};

/// Errors from social operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SocialError {
    /// A referenced user, post, comment or notification does not exist.
    #[error("{entity} {id} not found")]
    NotFound {
        /// Kind of record that was missing
        entity: &'static str,
        /// Identifier that was looked up
        id: String,
    },

    /// The requester may not perform this action on the record.
    #[error("not authorized: {message}")]
    Authorization {
        /// What was refused
        message: String,
    },

    /// A user tried to follow themselves.
    #[error("user {id} cannot follow themselves")]
    SelfReference {
        /// The offending user
        id: String,
    },

    /// Input failed validation.
    #[error("invalid input: {message}")]
    Validation {
        /// What was wrong with the input
        message: String,
    },

    /// A two-document mutation was left half applied. Fatal.
    #[error("consistency failure: {message} (compensated: {compensated})")]
    Consistency {
        /// What failed
        message: String,
        /// Whether the compensating reversal of the first write succeeded
        compensated: bool,
    },

    /// The document store failed.
    #[error("storage error: {0}")]
    Storage(#[from] StorageError),

    /// The clock failed.
    #[error("time error: {0}")]
    Time(#[from] TimeError),
}

impl SocialError {
    /// Create a not found error.
    pub fn not_found(entity: &'static str, id: impl ToString) -> Self {
        Self::NotFound {
            entity,
            id: id.to_string(),
        }
    }

    /// Create an authorization error.
    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::Authorization {
            message: message.into(),
        }
    }

    /// Create a self-reference error.
    pub fn self_reference(id: impl ToString) -> Self {
        Self::SelfReference { id: id.to_string() }
    }

    /// Create a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    /// Create a consistency error.
    pub fn consistency(message: impl Into<String>, compensated: bool) -> Self {
        Self::Consistency {
            message: message.into(),
            compensated,
        }
    }

    /// Whether the error leaves the store in a state needing operator
    /// attention.
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::Consistency { .. })
    }

    /// Text safe to show to the requesting user.
    ///
    /// Client errors carry their reason; infrastructure failures collapse to
    /// a generic message.
    pub fn user_message(&self) -> String {
        match self {
            Self::NotFound { entity, .. } => format!("The requested {entity} does not exist"),
            Self::Authorization { message } => format!("Not allowed: {message}"),
            Self::SelfReference { .. } => "You cannot follow yourself".to_string(),
            Self::Validation { message } => message.clone(),
            Self::Consistency { .. } | Self::Storage(_) | Self::Time(_) => {
                "An internal error occurred, please try again later".to_string()
            }
        }
    }
}

/// Result alias for social operations.
pub type SocialResult<T> = Result<T, SocialError>;
