//! Driving port for user mutations.

use async_trait::async_trait;

use crate::domain::{Error, NewUser, User, UserChanges, UserId};

/// Domain use-case port for creating, changing, and removing users.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UsersCommand: Send + Sync {
    /// Store a new user unless the username or email is taken.
    async fn create_user(&self, user: NewUser) -> Result<User, Error>;

    /// Apply a partial update to an existing user.
    async fn update_user(&self, id: UserId, changes: UserChanges) -> Result<User, Error>;

    /// Remove a user and return the removed record.
    async fn delete_user(&self, id: UserId) -> Result<User, Error>;
}
