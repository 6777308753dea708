//! Tracker database bootstrap.
//!
//! # Responsibility
//! - Open SQLite connections that carry the `parcel` table.
//! - Upgrade older tracker files in place.
//!
//! # Invariants
//! - The schema version lives in `PRAGMA user_version`.
//! - The parcel store needs only the table, not this bootstrap; callers may
//!   create the schema themselves.

mod error;
pub mod migrations;
mod open;

pub use error::{DbError, DbResult};
pub use open::{open_db, open_db_in_memory};
