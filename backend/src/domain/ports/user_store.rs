//! Port for the user roster held by the records store.

use async_trait::async_trait;

use crate::domain::{User, UserId, UserPatch};

use super::StoreError;

/// CRUD access to the user roster.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Fetch the full roster.
    async fn list_users(&self) -> Result<Vec<User>, StoreError>;

    /// Persist a new user. `user` carries a client-proposed identifier; the
    /// returned record holds whichever identifier the store kept.
    async fn create_user(&self, user: &User) -> Result<User, StoreError>;

    /// Apply a partial update and return the stored record.
    async fn update_user(&self, id: &UserId, patch: &UserPatch) -> Result<User, StoreError>;

    /// Remove a user.
    async fn delete_user(&self, id: &UserId) -> Result<(), StoreError>;
}
