//! Repository layer abstractions and persistence implementations.
//!
//! # Responsibility
//! - Define the data access contract for parcel records.
//! - Isolate SQLite query details from service orchestration.
//!
//! # Invariants
//! - Store writes validate parcels before persistence.
//! - Store APIs return semantic errors (`NotFound`) in addition to DB
//!   transport errors.

pub mod parcel_repo;
