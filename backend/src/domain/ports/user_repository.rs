//! Driven port for user record storage.
//!
//! The store owns identifier generation and enforces that username and email
//! are each unique across all records.

use async_trait::async_trait;

use crate::domain::{EmailAddress, NewUser, User, UserChanges, UserId, Username};

use super::define_port_error;

define_port_error! {
    /// Errors raised by user repository adapters.
    pub enum UserPersistenceError {
        /// No record exists for the identifier.
        NotFound { id: i64 } => "user record {id} not found",
        /// The write would break username or email uniqueness.
        Duplicate => "user record violates a uniqueness constraint",
        /// The store could not complete the operation.
        Storage { message: String } => "user store failed: {message}",
    }
}

/// Lookup criteria understood by [`UserRepository::find`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UserFilter {
    /// Match a single record by identifier.
    ById(UserId),
    /// Match any record sharing the username or the email.
    ///
    /// `None` criteria are ignored. A record whose id equals `excluding` never
    /// matches, so updates can check uniqueness against everyone else.
    ByUsernameOrEmail {
        username: Option<Username>,
        email: Option<EmailAddress>,
        excluding: Option<UserId>,
    },
}

impl UserFilter {
    /// Whether `user` satisfies this filter.
    pub fn matches(&self, user: &User) -> bool {
        match self {
            Self::ById(id) => user.id() == *id,
            Self::ByUsernameOrEmail {
                username,
                email,
                excluding,
            } => {
                if excluding.is_some_and(|id| id == user.id()) {
                    return false;
                }
                username.as_ref().is_some_and(|name| name == user.username())
                    || email.as_ref().is_some_and(|mail| mail == user.email())
            }
        }
    }
}

/// Abstract CRUD over user records.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Every stored record in identifier order.
    async fn list(&self) -> Result<Vec<User>, UserPersistenceError>;

    /// First record satisfying `filter`, if any.
    async fn find(&self, filter: &UserFilter) -> Result<Option<User>, UserPersistenceError>;

    /// Store a new record and return it with its generated identifier.
    async fn insert(&self, user: NewUser) -> Result<User, UserPersistenceError>;

    /// Apply a partial update in place and return the updated record.
    async fn update(
        &self,
        id: UserId,
        changes: UserChanges,
    ) -> Result<User, UserPersistenceError>;

    /// Remove a record and return it as it was before deletion.
    async fn delete(&self, id: UserId) -> Result<User, UserPersistenceError>;
}
