//! Server settings loaded via OrthoConfig.
//!
//! Values come from CLI flags, `USERS_*` environment variables, or a
//! configuration file, with the usual OrthoConfig precedence.

use ortho_config::OrthoConfig;
use serde::Deserialize;
use tracing::warn;

use crate::domain::{NewUser, UserValidationError};

const DEFAULT_HOST: &str = "0.0.0.0";
const DEFAULT_PORT: u16 = 3000;
const DEFAULT_JWT_ISSUER: &str = "users-api";
const DEFAULT_JWT_TTL_SECS: u64 = 3600;
const DEFAULT_POOL_SIZE: u32 = 10;
const EPHEMERAL_SECRET_LEN: usize = 32;

/// Failures turning raw settings into usable server configuration.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SettingsError {
    /// Release builds refuse to start without a signing secret.
    #[error("USERS_JWT_SECRET must be set")]
    MissingJwtSecret,
    /// Only one of the admin bootstrap fields was supplied.
    #[error("USERS_ADMIN_EMAIL and USERS_ADMIN_PASSWORD must be set together")]
    IncompleteAdminAccount,
    /// The admin bootstrap account failed validation.
    #[error("invalid admin account: {0}")]
    InvalidAdminAccount(UserValidationError),
}

/// Configuration values for the users API server.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "USERS")]
pub struct ServerSettings {
    /// Interface to bind. Defaults to all interfaces.
    pub host: Option<String>,
    /// TCP port to listen on.
    pub port: Option<u16>,
    /// PostgreSQL URL. When absent the server keeps users in memory.
    pub database_url: Option<String>,
    /// Maximum number of pooled database connections.
    pub database_pool_size: Option<u32>,
    /// HS256 signing secret for access tokens.
    pub jwt_secret: Option<String>,
    /// `iss` claim stamped on and required of every token.
    pub jwt_issuer: Option<String>,
    /// Token lifetime in seconds.
    pub jwt_ttl_secs: Option<u64>,
    /// E-mail of an account created at start-up if not yet registered.
    pub admin_email: Option<String>,
    /// Password for the bootstrap account.
    pub admin_password: Option<String>,
}

impl ServerSettings {
    /// Interface to bind.
    pub fn host(&self) -> &str {
        self.host.as_deref().unwrap_or(DEFAULT_HOST)
    }

    /// Port to bind.
    pub fn port(&self) -> u16 {
        self.port.unwrap_or(DEFAULT_PORT)
    }

    /// Database URL, ignoring blank values.
    pub fn database_url(&self) -> Option<&str> {
        self.database_url
            .as_deref()
            .map(str::trim)
            .filter(|url| !url.is_empty())
    }

    /// Maximum pool size.
    pub fn database_pool_size(&self) -> u32 {
        self.database_pool_size.unwrap_or(DEFAULT_POOL_SIZE)
    }

    /// Token issuer.
    pub fn jwt_issuer(&self) -> &str {
        self.jwt_issuer.as_deref().unwrap_or(DEFAULT_JWT_ISSUER)
    }

    /// Token lifetime in seconds.
    pub fn jwt_ttl_secs(&self) -> u64 {
        self.jwt_ttl_secs.unwrap_or(DEFAULT_JWT_TTL_SECS)
    }

    /// Signing secret bytes.
    ///
    /// Debug builds fall back to a random per-process secret, so tokens do
    /// not survive a restart.
    ///
    /// # Errors
    ///
    /// [`SettingsError::MissingJwtSecret`] in release builds when no secret
    /// is configured.
    pub fn jwt_secret(&self) -> Result<Vec<u8>, SettingsError> {
        match self.jwt_secret.as_deref().filter(|s| !s.is_empty()) {
            Some(secret) => Ok(secret.as_bytes().to_vec()),
            None if cfg!(debug_assertions) => {
                warn!("USERS_JWT_SECRET not set; using an ephemeral signing secret (dev only)");
                Ok((0..EPHEMERAL_SECRET_LEN).map(|_| rand::random::<u8>()).collect())
            }
            None => Err(SettingsError::MissingJwtSecret),
        }
    }

    /// Bootstrap account to ensure at start-up, if configured.
    ///
    /// # Errors
    ///
    /// Fails when only one of the two fields is set or the values do not
    /// pass user validation.
    pub fn admin_account(&self) -> Result<Option<NewUser>, SettingsError> {
        match (self.admin_email.as_deref(), self.admin_password.as_deref()) {
            (None, None) => Ok(None),
            (Some(email), Some(password)) => NewUser::try_from_parts(email, password)
                .map(Some)
                .map_err(SettingsError::InvalidAdminAccount),
            _ => Err(SettingsError::IncompleteAdminAccount),
        }
    }
}
