//! Driving port for read-only user use-cases.
//!
//! Inbound adapters call this port to read user records without importing
//! the storage layer.

use async_trait::async_trait;

use crate::domain::{Error, User, UserId};

/// Domain use-case port for reading users.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UsersQuery: Send + Sync {
    /// Every stored user.
    async fn list_users(&self) -> Result<Vec<User>, Error>;

    /// A single user, or [`Error::NotFound`].
    async fn find_user(&self, id: UserId) -> Result<User, Error>;
}
