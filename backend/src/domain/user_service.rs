//! User domain service.
//!
//! Implements the user driving ports on top of a [`UserRepository`]: it
//! enforces uniqueness before writes and maps storage failures onto the
//! domain [`Error`] taxonomy.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::info;

use crate::domain::ports::{
    UserFilter, UserPersistenceError, UserRepository, UsersCommand, UsersQuery,
};
use crate::domain::{Error, NewUser, User, UserChanges, UserId};

impl From<UserPersistenceError> for Error {
    fn from(value: UserPersistenceError) -> Self {
        match value {
            UserPersistenceError::NotFound { id } => Error::not_found(UserId::new(id)),
            UserPersistenceError::Duplicate => Error::conflict(),
            UserPersistenceError::Storage { message } => Error::storage(message),
        }
    }
}

/// User service implementing [`UsersQuery`] and [`UsersCommand`].
#[derive(Clone)]
pub struct UserService<R> {
    repository: Arc<R>,
}

impl<R> UserService<R> {
    /// Create a service backed by `repository`.
    pub fn new(repository: Arc<R>) -> Self {
        Self { repository }
    }
}

impl<R> UserService<R>
where
    R: UserRepository,
{
    async fn existing(&self, id: UserId) -> Result<User, Error> {
        self.repository
            .find(&UserFilter::ById(id))
            .await?
            .ok_or_else(|| Error::not_found(id))
    }

    async fn ensure_unique(&self, filter: UserFilter) -> Result<(), Error> {
        match self.repository.find(&filter).await? {
            Some(_) => Err(Error::conflict()),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl<R> UsersQuery for UserService<R>
where
    R: UserRepository,
{
    async fn list_users(&self) -> Result<Vec<User>, Error> {
        Ok(self.repository.list().await?)
    }

    async fn find_user(&self, id: UserId) -> Result<User, Error> {
        self.existing(id).await
    }
}

#[async_trait]
impl<R> UsersCommand for UserService<R>
where
    R: UserRepository,
{
    async fn create_user(&self, user: NewUser) -> Result<User, Error> {
        self.ensure_unique(UserFilter::ByUsernameOrEmail {
            username: Some(user.username.clone()),
            email: Some(user.email.clone()),
            excluding: None,
        })
        .await?;

        let created = self.repository.insert(user).await?;
        info!(user_id = %created.id(), "user created");
        Ok(created)
    }

    async fn update_user(&self, id: UserId, changes: UserChanges) -> Result<User, Error> {
        self.existing(id).await?;

        if changes.touches_unique_fields() {
            self.ensure_unique(UserFilter::ByUsernameOrEmail {
                username: changes.username.clone(),
                email: changes.email.clone(),
                excluding: Some(id),
            })
            .await?;
        }

        let updated = self.repository.update(id, changes).await?;
        info!(user_id = %updated.id(), "user updated");
        Ok(updated)
    }

    async fn delete_user(&self, id: UserId) -> Result<User, Error> {
        let deleted = self.repository.delete(id).await?;
        info!(user_id = %deleted.id(), "user deleted");
        Ok(deleted)
    }
}

#[cfg(test)]
#[path = "user_service_tests.rs"]
mod tests;
