//! Domain primitives, aggregates, and use-case services.
//!
//! Purpose: Define strongly typed domain entities used by the API and
//! persistence layers. Keep types immutable and document invariants and
//! serialisation contracts (serde) in each type's Rustdoc.
//!
//! Public surface:
//! - Error / ErrorCode: transport-agnostic failure payload.
//! - User, UserId, EmailAddress, Password, PasswordHash: the user aggregate.
//! - NewUser / UserChanges: validated command inputs.
//! - LoginCredentials / AccessToken: authentication primitives.
//! - UserService: implementation of the driving ports.

pub mod auth;
pub mod error;
pub mod ports;
pub mod trace_id;
pub mod user;
pub mod user_service;

pub use self::auth::{AccessToken, LoginCredentials, LoginValidationError};
pub use self::error::{Error, ErrorCode};
pub use self::trace_id::{TRACE_ID_HEADER, TraceId};
pub use self::user::{
    EmailAddress, NewUser, Password, PasswordHash, User, UserChanges, UserId,
    UserValidationError,
};
pub use self::user_service::{EMAIL_IN_USE_MESSAGE, UserService};
