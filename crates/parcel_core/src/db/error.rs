//! Error type for tracker database bootstrap.

use std::error::Error;
use std::fmt::{Display, Formatter};

pub type DbResult<T> = Result<T, DbError>;

/// Failures while opening, migrating, or querying the tracker database.
#[derive(Debug)]
pub enum DbError {
    /// Storage failure reported by SQLite.
    Storage(rusqlite::Error),
    /// The file was written by a newer tracker build.
    SchemaTooNew { found: u32, supported: u32 },
}

impl Display for DbError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Storage(err) => write!(f, "parcel storage failure: {err}"),
            Self::SchemaTooNew { found, supported } => write!(
                f,
                "parcel schema version {found} is newer than this build supports ({supported})"
            ),
        }
    }
}

impl Error for DbError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Storage(err) => Some(err),
            Self::SchemaTooNew { .. } => None,
        }
    }
}

impl From<rusqlite::Error> for DbError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Storage(value)
    }
}
