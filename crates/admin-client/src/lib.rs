//! Administrative client for the users API.
//!
//! [`api::UsersApi`] is the port the client talks through; [`api::HttpUsersApi`]
//! implements it over `reqwest`. [`list_state::UserListState`] keeps the
//! fetched list and its loading flag, and [`render`] turns users into a plain
//! text grid for the `users-admin` binary.

pub mod api;
pub mod error;
pub mod list_state;
pub mod model;
pub mod render;

pub use api::{HttpUsersApi, UsersApi};
pub use error::ClientError;
pub use list_state::UserListState;
pub use model::{AccessToken, User, UserDraft, UserPatch};
