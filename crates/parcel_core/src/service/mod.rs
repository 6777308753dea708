//! Core use-case services.
//!
//! # Responsibility
//! - Orchestrate store calls into tracker-level use cases.
//! - Keep CLI callers decoupled from storage details.

pub mod parcel_service;
