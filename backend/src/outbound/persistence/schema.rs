//! Diesel table definitions for the PostgreSQL schema.
//!
//! Mirrors `migrations/`. Regenerate with `diesel print-schema` after adding a
//! migration.

diesel::table! {
    /// Registered users. `email` carries a unique index.
    users (id) {
        /// Primary key: UUID v4 identifier.
        id -> Uuid,
        /// Normalised (trimmed, lower-case) e-mail address.
        #[max_length = 254]
        email -> Varchar,
        /// Argon2id PHC string.
        #[max_length = 255]
        password_hash -> Varchar,
        /// Record creation timestamp.
        created_at -> Timestamptz,
        /// Last modification timestamp.
        updated_at -> Timestamptz,
    }
}
