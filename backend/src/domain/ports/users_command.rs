//! Driving port for user mutations.

use async_trait::async_trait;

use crate::domain::{Error, NewUser, User, UserChanges, UserId};

/// Domain use-case port for creating, updating, and deleting users.
///
/// E-mail collisions surface as `validation_failed` errors with the message
/// `Email is already in use`; unknown ids surface as `not_found`.
#[async_trait]
pub trait UsersCommand: Send + Sync {
    /// Register a new user.
    async fn create_user(&self, request: NewUser) -> Result<User, Error>;

    /// Apply changes to an existing user.
    async fn update_user(&self, id: &UserId, changes: UserChanges) -> Result<User, Error>;

    /// Remove a user.
    async fn delete_user(&self, id: &UserId) -> Result<(), Error>;
}
