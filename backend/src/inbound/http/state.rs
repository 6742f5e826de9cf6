//! Shared HTTP adapter state.
//!
//! HTTP handlers accept this state via `actix_web::web::Data` so they only
//! depend on domain ports (use-cases) and remain testable without I/O.

use std::sync::Arc;

use crate::domain::UserService;
use crate::domain::ports::{LoginService, TokenService, UsersCommand, UsersQuery};

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    pub users_query: Arc<dyn UsersQuery>,
    pub users_command: Arc<dyn UsersCommand>,
    pub login: Arc<dyn LoginService>,
    pub tokens: Arc<dyn TokenService>,
}

impl HttpState {
    /// Wire every user-facing port to a single [`UserService`].
    ///
    /// # Examples
    /// ```
    /// use std::sync::Arc;
    ///
    /// use backend::domain::UserService;
    /// use backend::inbound::http::state::HttpState;
    /// use backend::outbound::memory::InMemoryUserRepository;
    /// use backend::outbound::security::{Argon2PasswordHasher, JwtTokenService};
    ///
    /// let service = UserService::new(
    ///     Arc::new(InMemoryUserRepository::new()),
    ///     Arc::new(Argon2PasswordHasher::new()),
    /// );
    /// let tokens = JwtTokenService::new(b"secret", "users-api", 3600);
    /// let state = HttpState::from_user_service(service, Arc::new(tokens));
    /// let _query = state.users_query.clone();
    /// ```
    pub fn from_user_service(service: UserService, tokens: Arc<dyn TokenService>) -> Self {
        let service = Arc::new(service);
        Self {
            users_query: service.clone(),
            users_command: service.clone(),
            login: service,
            tokens,
        }
    }
}
