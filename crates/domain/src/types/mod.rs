//! Typed records mapped from the service's permit payloads
//!
//! The service speaks one big dynamic JSON shape (a permit with nested
//! permit medias); responses decode into a generic `serde_json::Value` tree
//! first and the constructors here map slices of that tree into typed
//! records, failing closed with a `Parse` error on any shape violation.

pub mod account;
pub mod favorite;
pub mod permit;
pub mod reservation;
pub mod zone;

pub(crate) mod parse;

// Re-export record types for convenience
pub use account::Account;
pub use favorite::Favorite;
pub use permit::MediaDefaults;
pub use reservation::Reservation;
pub use zone::Zone;
