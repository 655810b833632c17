//! Mutex-guarded in-memory implementation of [`UserRepository`].

use std::collections::BTreeMap;
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;

use crate::domain::ports::{UserFilter, UserPersistenceError, UserRepository};
use crate::domain::{NewUser, User, UserChanges, UserId};

#[derive(Debug)]
struct UserTable {
    next_id: i64,
    rows: BTreeMap<UserId, User>,
}

impl Default for UserTable {
    fn default() -> Self {
        Self {
            next_id: 1,
            rows: BTreeMap::new(),
        }
    }
}

impl UserTable {
    fn clashes(&self, candidate: &User) -> bool {
        let filter = UserFilter::ByUsernameOrEmail {
            username: Some(candidate.username().clone()),
            email: Some(candidate.email().clone()),
            excluding: Some(candidate.id()),
        };
        self.rows.values().any(|row| filter.matches(row))
    }
}

/// User store holding every record in process memory.
///
/// Identifiers start at 1 and are never reused. Uniqueness of username and
/// email is enforced on every write. The lock is never held across an await
/// point.
#[derive(Debug, Default)]
pub struct InMemoryUserRepository {
    table: Mutex<UserTable>,
}

impl InMemoryUserRepository {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    fn table(&self) -> Result<MutexGuard<'_, UserTable>, UserPersistenceError> {
        self.table
            .lock()
            .map_err(|_| UserPersistenceError::storage("user table lock poisoned"))
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn list(&self) -> Result<Vec<User>, UserPersistenceError> {
        Ok(self.table()?.rows.values().cloned().collect())
    }

    async fn find(&self, filter: &UserFilter) -> Result<Option<User>, UserPersistenceError> {
        let table = self.table()?;
        Ok(table.rows.values().find(|row| filter.matches(row)).cloned())
    }

    async fn insert(&self, user: NewUser) -> Result<User, UserPersistenceError> {
        let mut table = self.table()?;
        let record = User::new(UserId::new(table.next_id), user);
        if table.clashes(&record) {
            return Err(UserPersistenceError::duplicate());
        }
        table.next_id += 1;
        table.rows.insert(record.id(), record.clone());
        Ok(record)
    }

    async fn update(
        &self,
        id: UserId,
        changes: UserChanges,
    ) -> Result<User, UserPersistenceError> {
        let mut table = self.table()?;
        let current = table
            .rows
            .get(&id)
            .cloned()
            .ok_or_else(|| UserPersistenceError::not_found(id))?;
        let updated = current.with_changes(changes);
        if table.clashes(&updated) {
            return Err(UserPersistenceError::duplicate());
        }
        table.rows.insert(id, updated.clone());
        Ok(updated)
    }

    async fn delete(&self, id: UserId) -> Result<User, UserPersistenceError> {
        self.table()?
            .rows
            .remove(&id)
            .ok_or_else(|| UserPersistenceError::not_found(id))
    }
}
