//! User management use-cases.
//!
//! `UserService` implements the driving ports over the `UserRepository` and
//! `PasswordHasher` driven ports. E-mail ownership is checked before every
//! write; the repository's unique constraint is mapped to the same error so a
//! concurrent writer that slips past the pre-check still sees a 422.
//!
//! Hashing and verification run on tokio's blocking pool so a slow key
//! derivation never stalls the async worker serving other requests.

use std::sync::Arc;

use async_trait::async_trait;
use tokio::task;
use tracing::{debug, error, info};
use zeroize::Zeroizing;

use super::ports::{
    LoginService, PasswordHashError, PasswordHasher, UserPersistenceError, UserRepository,
    UsersCommand, UsersQuery,
};
use super::{
    EmailAddress, Error, LoginCredentials, NewUser, Password, PasswordHash, User, UserChanges,
    UserId,
};

/// Message returned when an e-mail address belongs to another record.
pub const EMAIL_IN_USE_MESSAGE: &str = "Email is already in use";

const USER_NOT_FOUND_MESSAGE: &str = "User not found";
const INVALID_CREDENTIALS_MESSAGE: &str = "invalid credentials";

/// Domain service backing the users API.
#[derive(Clone)]
pub struct UserService {
    repository: Arc<dyn UserRepository>,
    hasher: Arc<dyn PasswordHasher>,
}

impl UserService {
    /// Build the service from its driven ports.
    pub fn new(repository: Arc<dyn UserRepository>, hasher: Arc<dyn PasswordHasher>) -> Self {
        Self { repository, hasher }
    }

    /// Ensure no record other than `owner` holds `email`.
    async fn ensure_email_available(
        &self,
        email: &EmailAddress,
        owner: Option<&UserId>,
    ) -> Result<(), Error> {
        let existing = self
            .repository
            .find_by_email(email)
            .await
            .map_err(map_persistence_error)?;
        match existing {
            Some(user) if Some(user.id()) != owner => Err(email_in_use()),
            _ => Ok(()),
        }
    }

    async fn hash_password(&self, password: Password) -> Result<PasswordHash, Error> {
        let hasher = Arc::clone(&self.hasher);
        task::spawn_blocking(move || hasher.hash(&password))
            .await
            .map_err(map_join_error)?
            .map_err(map_hash_error)
    }

    async fn verify_password(&self, candidate: &str, hash: PasswordHash) -> Result<bool, Error> {
        let hasher = Arc::clone(&self.hasher);
        let candidate = Zeroizing::new(candidate.to_owned());
        task::spawn_blocking(move || hasher.verify(&candidate, &hash))
            .await
            .map_err(map_join_error)?
            .map_err(map_hash_error)
    }

    async fn find_existing(&self, id: &UserId) -> Result<User, Error> {
        self.repository
            .find_by_id(id)
            .await
            .map_err(map_persistence_error)?
            .ok_or_else(user_not_found)
    }
}

fn email_in_use() -> Error {
    Error::validation(EMAIL_IN_USE_MESSAGE)
}

fn user_not_found() -> Error {
    Error::not_found(USER_NOT_FOUND_MESSAGE)
}

fn map_persistence_error(error: UserPersistenceError) -> Error {
    match error {
        UserPersistenceError::Connection { message } => Error::service_unavailable(message),
        UserPersistenceError::Query { message } => Error::internal(message),
        UserPersistenceError::DuplicateEmail { .. } => email_in_use(),
    }
}

fn map_hash_error(error: PasswordHashError) -> Error {
    error!(%error, "password hashing failed");
    Error::internal(error.to_string())
}

fn map_join_error(error: task::JoinError) -> Error {
    error!(%error, "password hashing task did not complete");
    Error::internal(error.to_string())
}

#[async_trait]
impl UsersQuery for UserService {
    async fn list_users(&self) -> Result<Vec<User>, Error> {
        self.repository.list().await.map_err(map_persistence_error)
    }

    async fn get_user(&self, id: &UserId) -> Result<User, Error> {
        self.find_existing(id).await
    }
}

#[async_trait]
impl UsersCommand for UserService {
    async fn create_user(&self, request: NewUser) -> Result<User, Error> {
        self.ensure_email_available(request.email(), None).await?;

        let hash = self.hash_password(request.password().clone()).await?;
        let user = User::register(UserId::random(), request.email().clone(), hash);

        self.repository
            .insert(&user)
            .await
            .map_err(map_persistence_error)?;
        info!(user_id = %user.id(), "user created");
        Ok(user)
    }

    async fn update_user(&self, id: &UserId, changes: UserChanges) -> Result<User, Error> {
        let current = self.find_existing(id).await?;
        if changes.is_empty() {
            return Ok(current);
        }

        if let Some(email) = changes.email() {
            self.ensure_email_available(email, Some(id)).await?;
        }
        let password_hash = match changes.password() {
            Some(password) => Some(self.hash_password(password.clone()).await?),
            None => None,
        };
        let updated = current.with_changes(changes.email().cloned(), password_hash);

        let found = self
            .repository
            .update(&updated)
            .await
            .map_err(map_persistence_error)?;
        if !found {
            // Deleted between the read and the write.
            return Err(user_not_found());
        }
        info!(user_id = %id, "user updated");
        Ok(updated)
    }

    async fn delete_user(&self, id: &UserId) -> Result<(), Error> {
        let removed = self
            .repository
            .delete(id)
            .await
            .map_err(map_persistence_error)?;
        if removed {
            info!(user_id = %id, "user deleted");
            Ok(())
        } else {
            Err(user_not_found())
        }
    }
}

#[async_trait]
impl LoginService for UserService {
    async fn authenticate(&self, credentials: &LoginCredentials) -> Result<UserId, Error> {
        let Ok(email) = EmailAddress::new(credentials.email()) else {
            return Err(Error::unauthorized(INVALID_CREDENTIALS_MESSAGE));
        };
        let Some(user) = self
            .repository
            .find_by_email(&email)
            .await
            .map_err(map_persistence_error)?
        else {
            debug!("login attempted for unknown email");
            return Err(Error::unauthorized(INVALID_CREDENTIALS_MESSAGE));
        };

        let verified = self
            .verify_password(credentials.password(), user.password_hash().clone())
            .await?;
        if verified {
            Ok(*user.id())
        } else {
            Err(Error::unauthorized(INVALID_CREDENTIALS_MESSAGE))
        }
    }
}
