//! Driven port for issuing and checking bearer tokens.

use crate::domain::{AccessToken, UserId};

use super::define_port_error;

define_port_error! {
    /// Failures raised by token adapters.
    pub enum TokenError {
        /// The token has passed its expiry time.
        Expired => "token has expired",
        /// The token is malformed, has a bad signature, or names no user.
        Invalid { message: String } => "token is invalid: {message}",
        /// A token could not be signed.
        Encode { message: String } => "token could not be issued: {message}",
    }
}

/// Mint and verify access tokens identifying a user.
pub trait TokenService: Send + Sync {
    /// Sign a token whose subject is `user_id`.
    fn issue(&self, user_id: &UserId) -> Result<AccessToken, TokenError>;

    /// Check a presented token and return its subject.
    fn verify(&self, token: &str) -> Result<UserId, TokenError>;
}
