//! Domain-level error types.
//!
//! These errors are transport agnostic. Inbound adapters map them to HTTP
//! problem documents or any other protocol-specific envelope.

use thiserror::Error as ThisError;

use super::user::{UserId, UserValidationError};

/// Outcome of a failed user operation.
///
/// # Examples
/// ```
/// use user_service::domain::{Error, UserId};
///
/// let err = Error::not_found(UserId::new(9));
/// assert_eq!(err.to_string(), "user 9 does not exist");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, ThisError)]
#[non_exhaustive]
pub enum Error {
    /// Input violates a field policy.
    #[error("{0}")]
    Validation(#[from] UserValidationError),
    /// Username or email is already taken by another record.
    #[error("a user with this username or email already exists")]
    Conflict,
    /// No record exists for the identifier.
    #[error("user {id} does not exist")]
    NotFound { id: UserId },
    /// A framework-level failure carrying its own status code.
    #[error("{message}")]
    Upstream { status: u16, message: String },
    /// The record store failed to complete the operation.
    #[error("user storage failed: {message}")]
    Storage { message: String },
}

impl Error {
    /// Convenience constructor for [`Error::Conflict`].
    pub fn conflict() -> Self {
        Self::Conflict
    }

    /// Convenience constructor for [`Error::NotFound`].
    pub fn not_found(id: UserId) -> Self {
        Self::NotFound { id }
    }

    /// Convenience constructor for [`Error::Upstream`].
    pub fn upstream(status: u16, message: impl Into<String>) -> Self {
        Self::Upstream {
            status,
            message: message.into(),
        }
    }

    /// Convenience constructor for [`Error::Storage`].
    pub fn storage(message: impl Into<String>) -> Self {
        Self::Storage {
            message: message.into(),
        }
    }
}
