//! Port abstraction for user persistence adapters and their errors.
use async_trait::async_trait;

use crate::domain::{EmailAddress, User, UserId};

use super::define_port_error;

define_port_error! {
    /// Persistence errors raised by user repository adapters.
    pub enum UserPersistenceError {
        /// Repository connection could not be established.
        Connection { message: String } => "user repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "user repository query failed: {message}",
        /// The unique e-mail constraint rejected the write.
        DuplicateEmail { email: String } => "email {email} is already registered",
    }
}

/// Driven port over the user store.
///
/// Implementations must reject a write that would give two records the same
/// e-mail address with [`UserPersistenceError::DuplicateEmail`].
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Every stored user, oldest first.
    async fn list(&self) -> Result<Vec<User>, UserPersistenceError>;

    /// Fetch a user by identifier.
    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, UserPersistenceError>;

    /// Fetch a user by normalised e-mail address.
    async fn find_by_email(
        &self,
        email: &EmailAddress,
    ) -> Result<Option<User>, UserPersistenceError>;

    /// Store a new user record.
    async fn insert(&self, user: &User) -> Result<(), UserPersistenceError>;

    /// Overwrite an existing record. Returns `false` when no record has the
    /// user's id.
    async fn update(&self, user: &User) -> Result<bool, UserPersistenceError>;

    /// Remove a record. Returns `false` when no record had the id.
    async fn delete(&self, id: &UserId) -> Result<bool, UserPersistenceError>;
}
