//! Domain model for tracked parcels.
//!
//! # Responsibility
//! - Define the parcel record and its status vocabulary.
//! - Keep field validation next to the data it guards.
//!
//! # Invariants
//! - Every stored parcel is identified by a store-assigned `ParcelNumber`.
//! - Deletion is permanent; there is no tombstone state.

pub mod parcel;
