//! HTTP server configuration object and helpers.

use std::net::SocketAddr;
use std::sync::Arc;

use backend::domain::NewUser;
use backend::domain::ports::TokenService;
use backend::outbound::persistence::DbPool;

/// Builder-style configuration for creating the HTTP server.
pub struct ServerConfig {
    pub(crate) bind_addr: SocketAddr,
    pub(crate) tokens: Arc<dyn TokenService>,
    pub(crate) db_pool: Option<DbPool>,
    pub(crate) admin: Option<NewUser>,
}

impl ServerConfig {
    /// Construct a server configuration bound to `bind_addr`, issuing tokens
    /// through `tokens`.
    #[must_use]
    pub fn new(bind_addr: SocketAddr, tokens: Arc<dyn TokenService>) -> Self {
        Self {
            bind_addr,
            tokens,
            db_pool: None,
            admin: None,
        }
    }

    /// Attach a database connection pool for the user repository.
    ///
    /// Without a pool the server keeps users in process memory.
    #[must_use]
    pub fn with_db_pool(mut self, pool: DbPool) -> Self {
        self.db_pool = Some(pool);
        self
    }

    /// Seed an account at startup unless its email is already registered.
    #[must_use]
    pub fn with_admin(mut self, admin: Option<NewUser>) -> Self {
        self.admin = admin;
        self
    }

    /// Return the socket address the server will bind to.
    #[must_use]
    pub fn bind_addr(&self) -> SocketAddr {
        self.bind_addr
    }
}
