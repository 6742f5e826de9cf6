//! Domain ports defining the edges of the hexagon.
//!
//! Driving ports (`UsersQuery`, `UsersCommand`, `LoginService`) are called by
//! inbound adapters. Driven ports (`UserRepository`, `PasswordHasher`,
//! `TokenService`) are implemented by outbound adapters. Each driven port
//! exposes strongly typed errors so adapters map their failures into
//! predictable variants.

mod macros;
pub(crate) use macros::define_port_error;

mod login_service;
mod password_hasher;
mod token_service;
mod user_repository;
mod users_command;
mod users_query;

pub use login_service::LoginService;
#[cfg(test)]
pub use password_hasher::MockPasswordHasher;
pub use password_hasher::{PasswordHashError, PasswordHasher};
pub use token_service::{TokenError, TokenService};
#[cfg(test)]
pub use user_repository::MockUserRepository;
pub use user_repository::{UserPersistenceError, UserRepository};
pub use users_command::UsersCommand;
pub use users_query::UsersQuery;
