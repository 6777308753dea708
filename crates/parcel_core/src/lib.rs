//! Core persistence and use-case logic for the parcel tracker.
//! The `parcel` table is accessed only through `repo::parcel_repo`.

pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;

pub use logging::{default_log_level, init_logging, logging_status};
pub use model::parcel::{
    now_rfc3339, ClientId, Parcel, ParcelNumber, ParcelStatus, ParcelValidationError,
};
pub use repo::parcel_repo::{ParcelStore, RepoError, RepoResult, SqliteParcelStore};
pub use service::parcel_service::{ParcelService, ParcelServiceError, ParcelServiceResult};
