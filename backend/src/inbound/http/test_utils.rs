//! Test helpers for inbound HTTP components.

use std::sync::Arc;

use actix_web::web;
use rstest::fixture;

use crate::domain::ports::{PasswordHashError, PasswordHasher, TokenService};
use crate::domain::{AccessToken, Password, PasswordHash, UserId, UserService};
use crate::outbound::memory::InMemoryUserRepository;
use crate::outbound::security::JwtTokenService;

use super::state::HttpState;

/// Reversible hasher so handler tests skip Argon2's deliberate cost.
pub struct PlainTextHasher;

impl PasswordHasher for PlainTextHasher {
    fn hash(&self, password: &Password) -> Result<PasswordHash, PasswordHashError> {
        Ok(PasswordHash::new(format!("plain${}", password.expose())))
    }

    fn verify(&self, password: &str, hash: &PasswordHash) -> Result<bool, PasswordHashError> {
        Ok(hash.as_str() == format!("plain${password}"))
    }
}

/// HTTP state over an empty in-memory store plus the token service backing it.
pub struct TestContext {
    pub tokens: Arc<JwtTokenService>,
    pub state: HttpState,
}

impl TestContext {
    /// State wrapped for `App::app_data`.
    pub fn data(&self) -> web::Data<HttpState> {
        web::Data::new(self.state.clone())
    }

    /// Issue a token for an arbitrary caller.
    pub fn token(&self) -> AccessToken {
        self.tokens
            .issue(&UserId::random())
            .expect("test token issues")
    }
}

#[fixture]
pub fn test_context() -> TestContext {
    let tokens = Arc::new(JwtTokenService::new(b"handler-test-secret", "users-api", 600));
    let service = UserService::new(
        Arc::new(InMemoryUserRepository::new()),
        Arc::new(PlainTextHasher),
    );
    let state = HttpState::from_user_service(service, tokens.clone());
    TestContext { tokens, state }
}
