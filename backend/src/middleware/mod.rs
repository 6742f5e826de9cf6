//! Request middleware.

pub mod cors;
pub mod trace;

pub use cors::Cors;
pub use trace::Trace;
