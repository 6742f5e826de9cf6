//! Builders for the HTTP state and startup seeding.

use std::sync::Arc;

use tracing::info;

use backend::domain::ports::{PasswordHasher, UserRepository, UsersCommand};
use backend::domain::{EMAIL_IN_USE_MESSAGE, Error, ErrorCode, NewUser, UserService};
use backend::inbound::http::state::HttpState;
use backend::outbound::memory::InMemoryUserRepository;
use backend::outbound::persistence::{DbPool, DieselUserRepository};
use backend::outbound::security::Argon2PasswordHasher;

use super::ServerConfig;

/// Select the user repository: PostgreSQL when a pool is configured,
/// otherwise process memory.
fn build_user_repository(pool: Option<&DbPool>) -> Arc<dyn UserRepository> {
    match pool {
        Some(pool) => Arc::new(DieselUserRepository::new(pool.clone())),
        None => {
            info!("no database configured; users are kept in memory");
            Arc::new(InMemoryUserRepository::new())
        }
    }
}

/// Assemble the user service behind every HTTP port.
pub(super) fn build_user_service(config: &ServerConfig) -> UserService {
    build_user_service_with(
        build_user_repository(config.db_pool.as_ref()),
        Arc::new(Argon2PasswordHasher::new()),
    )
}

fn build_user_service_with(
    repository: Arc<dyn UserRepository>,
    hasher: Arc<dyn PasswordHasher>,
) -> UserService {
    UserService::new(repository, hasher)
}

/// Wrap the user service and token issuer in the handler state.
pub(super) fn build_http_state(config: &ServerConfig, service: UserService) -> HttpState {
    HttpState::from_user_service(service, config.tokens.clone())
}

/// Create the bootstrap account, tolerating one that already exists.
///
/// # Errors
/// Propagates any failure other than the email already being registered.
pub(super) async fn bootstrap_admin(
    users: &dyn UsersCommand,
    admin: Option<NewUser>,
) -> Result<(), Error> {
    let Some(admin) = admin else {
        return Ok(());
    };
    let email = admin.email().to_string();
    match users.create_user(admin).await {
        Ok(user) => {
            info!(user_id = %user.id(), email = %email, "bootstrap account created");
            Ok(())
        }
        Err(err)
            if err.code() == ErrorCode::ValidationFailed
                && err.message() == EMAIL_IN_USE_MESSAGE =>
        {
            info!(email = %email, "bootstrap account already present");
            Ok(())
        }
        Err(err) => Err(err),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use backend::domain::ports::{PasswordHashError, UsersQuery};
    use backend::domain::{Password, PasswordHash, User, UserChanges, UserId};
    use rstest::{fixture, rstest};

    struct PlainHasher;

    impl PasswordHasher for PlainHasher {
        fn hash(&self, password: &Password) -> Result<PasswordHash, PasswordHashError> {
            Ok(PasswordHash::new(format!("plain${}", password.expose())))
        }

        fn verify(&self, password: &str, hash: &PasswordHash) -> Result<bool, PasswordHashError> {
            Ok(hash.as_str() == format!("plain${password}"))
        }
    }

    /// Command port whose store is always down.
    struct UnavailableUsers;

    #[async_trait]
    impl UsersCommand for UnavailableUsers {
        async fn create_user(&self, _request: NewUser) -> Result<User, Error> {
            Err(Error::service_unavailable("database unavailable"))
        }

        async fn update_user(&self, _id: &UserId, _changes: UserChanges) -> Result<User, Error> {
            Err(Error::service_unavailable("database unavailable"))
        }

        async fn delete_user(&self, _id: &UserId) -> Result<(), Error> {
            Err(Error::service_unavailable("database unavailable"))
        }
    }

    #[fixture]
    fn service() -> UserService {
        build_user_service_with(build_user_repository(None), Arc::new(PlainHasher))
    }

    fn admin() -> NewUser {
        NewUser::try_from_parts("admin@example.com", "admin-password").expect("valid admin")
    }

    #[rstest]
    #[tokio::test]
    async fn bootstrap_creates_missing_account(service: UserService) {
        bootstrap_admin(&service, Some(admin()))
            .await
            .expect("bootstrap succeeds");

        let users = service.list_users().await.expect("list succeeds");
        assert_eq!(users.len(), 1);
        assert_eq!(users[0].email().as_ref(), "admin@example.com");
    }

    #[rstest]
    #[tokio::test]
    async fn bootstrap_is_idempotent(service: UserService) {
        bootstrap_admin(&service, Some(admin())).await.expect("first run");
        bootstrap_admin(&service, Some(admin())).await.expect("second run");

        assert_eq!(service.list_users().await.expect("list").len(), 1);
    }

    #[rstest]
    #[tokio::test]
    async fn bootstrap_without_account_is_a_no_op(service: UserService) {
        bootstrap_admin(&service, None).await.expect("no-op");
        assert!(service.list_users().await.expect("list").is_empty());
    }

    #[rstest]
    #[tokio::test]
    async fn bootstrap_propagates_store_failures() {
        let err = bootstrap_admin(&UnavailableUsers, Some(admin()))
            .await
            .expect_err("store failure propagates");
        assert_eq!(err.code(), ErrorCode::ServiceUnavailable);
    }
}
