//! Process-local adapters used when no database is configured.
//!
//! State lives behind a `tokio::sync::RwLock` and disappears with the
//! process. The server falls back to these adapters for local development and
//! the HTTP integration tests drive them directly.

mod user_repository;

pub use user_repository::InMemoryUserRepository;
