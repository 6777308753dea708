//! Parcel store contracts and SQLite implementation.
//!
//! # Responsibility
//! - Provide CRUD APIs over the `parcel` table.
//! - Keep SQL details inside the persistence boundary.
//!
//! # Invariants
//! - `number` is assigned by SQLite on insert and never written afterwards.
//! - Inserts require an RFC3339 `created_at`; address and status are stored
//!   verbatim.
//! - Read paths reject rows with a malformed `created_at` instead of masking
//!   them.
//! - Updates and deletes of a missing `number` succeed without effect.
//! - No status transition rules live here; see `service::parcel_service`.

use crate::db::DbError;
use crate::model::parcel::{ClientId, Parcel, ParcelNumber, ParcelStatus, ParcelValidationError};
use rusqlite::{params, Connection, OptionalExtension, Row};
use std::error::Error;
use std::fmt::{Display, Formatter};

const PARCEL_TABLE: &str = "parcel";
const PARCEL_COLUMNS: [&str; 5] = ["number", "client", "status", "address", "created_at"];

const PARCEL_SELECT_SQL: &str = "SELECT
    number,
    client,
    status,
    address,
    created_at
FROM parcel";

pub type RepoResult<T> = Result<T, RepoError>;

/// Repository error for parcel persistence and query operations.
#[derive(Debug)]
pub enum RepoError {
    Validation(ParcelValidationError),
    /// Storage failure reported by SQLite.
    Db(DbError),
    NotFound(ParcelNumber),
    InvalidData(String),
    MissingRequiredTable(&'static str),
    MissingRequiredColumn {
        table: &'static str,
        column: &'static str,
    },
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::Db(err) => write!(f, "{err}"),
            Self::NotFound(number) => write!(f, "parcel not found: {number}"),
            Self::InvalidData(message) => write!(f, "invalid persisted parcel data: {message}"),
            Self::MissingRequiredTable(table) => write!(f, "missing required table `{table}`"),
            Self::MissingRequiredColumn { table, column } => {
                write!(f, "missing required column `{table}.{column}`")
            }
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Db(err) => Some(err),
            Self::NotFound(_)
            | Self::InvalidData(_)
            | Self::MissingRequiredTable(_)
            | Self::MissingRequiredColumn { .. } => None,
        }
    }
}

impl From<ParcelValidationError> for RepoError {
    fn from(value: ParcelValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Storage(value))
    }
}

/// Store interface for parcel records.
pub trait ParcelStore {
    /// Inserts a parcel and returns the number assigned by storage.
    ///
    /// `parcel.number` is ignored, whatever its value.
    fn add(&self, parcel: &Parcel) -> RepoResult<ParcelNumber>;
    /// Gets one parcel, failing with `NotFound` when no row matches.
    fn get(&self, number: ParcelNumber) -> RepoResult<Parcel>;
    /// Lists every parcel owned by `client`. Callers must not rely on order.
    fn get_by_client(&self, client: ClientId) -> RepoResult<Vec<Parcel>>;
    fn set_address(&self, number: ParcelNumber, address: &str) -> RepoResult<()>;
    fn set_status(&self, number: ParcelNumber, status: ParcelStatus) -> RepoResult<()>;
    /// Permanently removes a parcel. Missing numbers are not an error.
    fn delete(&self, number: ParcelNumber) -> RepoResult<()>;
}

impl<S: ParcelStore + ?Sized> ParcelStore for &S {
    fn add(&self, parcel: &Parcel) -> RepoResult<ParcelNumber> {
        (**self).add(parcel)
    }

    fn get(&self, number: ParcelNumber) -> RepoResult<Parcel> {
        (**self).get(number)
    }

    fn get_by_client(&self, client: ClientId) -> RepoResult<Vec<Parcel>> {
        (**self).get_by_client(client)
    }

    fn set_address(&self, number: ParcelNumber, address: &str) -> RepoResult<()> {
        (**self).set_address(number, address)
    }

    fn set_status(&self, number: ParcelNumber, status: ParcelStatus) -> RepoResult<()> {
        (**self).set_status(number, status)
    }

    fn delete(&self, number: ParcelNumber) -> RepoResult<()> {
        (**self).delete(number)
    }
}

/// SQLite-backed parcel store over a caller-owned connection.
pub struct SqliteParcelStore<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteParcelStore<'conn> {
    /// Constructs a store from a connection that already carries the
    /// `parcel` schema.
    ///
    /// # Errors
    /// - `MissingRequiredTable` / `MissingRequiredColumn` when the schema is
    ///   absent or incomplete.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_parcel_connection_ready(conn)?;
        Ok(Self { conn })
    }
}

impl ParcelStore for SqliteParcelStore<'_> {
    fn add(&self, parcel: &Parcel) -> RepoResult<ParcelNumber> {
        parcel.validate()?;

        self.conn.execute(
            "INSERT INTO parcel (
                client,
                status,
                address,
                created_at
            ) VALUES (?1, ?2, ?3, ?4);",
            params![
                parcel.client,
                parcel.status.as_str(),
                parcel.address.as_str(),
                parcel.created_at.as_str(),
            ],
        )?;

        Ok(self.conn.last_insert_rowid())
    }

    fn get(&self, number: ParcelNumber) -> RepoResult<Parcel> {
        let parcel = self
            .conn
            .query_row(
                &format!("{PARCEL_SELECT_SQL} WHERE number = ?1;"),
                [number],
                |row| Ok(parse_parcel_row(row)),
            )
            .optional()?;

        match parcel {
            Some(parsed) => parsed,
            None => Err(RepoError::NotFound(number)),
        }
    }

    fn get_by_client(&self, client: ClientId) -> RepoResult<Vec<Parcel>> {
        let mut stmt = self.conn.prepare(&format!(
            "{PARCEL_SELECT_SQL} WHERE client = ?1 ORDER BY number ASC;"
        ))?;

        let mut rows = stmt.query([client])?;
        let mut parcels = Vec::new();
        while let Some(row) = rows.next()? {
            parcels.push(parse_parcel_row(row)?);
        }

        Ok(parcels)
    }

    fn set_address(&self, number: ParcelNumber, address: &str) -> RepoResult<()> {
        self.conn.execute(
            "UPDATE parcel SET address = ?1 WHERE number = ?2;",
            params![address, number],
        )?;

        Ok(())
    }

    fn set_status(&self, number: ParcelNumber, status: ParcelStatus) -> RepoResult<()> {
        self.conn.execute(
            "UPDATE parcel SET status = ?1 WHERE number = ?2;",
            params![status.as_str(), number],
        )?;

        Ok(())
    }

    fn delete(&self, number: ParcelNumber) -> RepoResult<()> {
        self.conn
            .execute("DELETE FROM parcel WHERE number = ?1;", [number])?;

        Ok(())
    }
}

fn parse_parcel_row(row: &Row<'_>) -> RepoResult<Parcel> {
    let parcel = Parcel {
        number: row.get("number")?,
        client: row.get("client")?,
        status: ParcelStatus::from(row.get::<_, String>("status")?),
        address: row.get("address")?,
        created_at: row.get("created_at")?,
    };
    parcel
        .validate()
        .map_err(|err| RepoError::InvalidData(format!("parcel {}: {err}", parcel.number)))?;
    Ok(parcel)
}

fn ensure_parcel_connection_ready(conn: &Connection) -> RepoResult<()> {
    if !table_exists(conn, PARCEL_TABLE)? {
        return Err(RepoError::MissingRequiredTable(PARCEL_TABLE));
    }

    for column in PARCEL_COLUMNS {
        if !table_has_column(conn, PARCEL_TABLE, column)? {
            return Err(RepoError::MissingRequiredColumn {
                table: PARCEL_TABLE,
                column,
            });
        }
    }

    Ok(())
}

fn table_exists(conn: &Connection, table: &str) -> RepoResult<bool> {
    let exists: i64 = conn.query_row(
        "SELECT EXISTS(
            SELECT 1
            FROM sqlite_master
            WHERE type = 'table' AND name = ?1
        );",
        [table],
        |row| row.get(0),
    )?;
    Ok(exists == 1)
}

fn table_has_column(conn: &Connection, table: &str, column: &str) -> RepoResult<bool> {
    let mut stmt = conn.prepare(&format!("PRAGMA table_info({table});"))?;
    let mut rows = stmt.query([])?;
    while let Some(row) = rows.next()? {
        let current: String = row.get(1)?;
        if current == column {
            return Ok(true);
        }
    }
    Ok(false)
}

#[cfg(test)]
mod tests {
    use super::{parse_parcel_row, RepoError};
    use rusqlite::Connection;

    fn raw_row_conn(status: &str, created_at: &str) -> Connection {
        let conn = Connection::open_in_memory().unwrap();
        conn.execute_batch(
            "CREATE TABLE parcel (
                number INTEGER PRIMARY KEY AUTOINCREMENT,
                client INTEGER NOT NULL,
                status TEXT NOT NULL,
                address TEXT NOT NULL,
                created_at TEXT NOT NULL
            );",
        )
        .unwrap();
        conn.execute(
            "INSERT INTO parcel (client, status, address, created_at) VALUES (7, ?1, 'dock 4', ?2);",
            [status, created_at],
        )
        .unwrap();
        conn
    }

    fn parse_first(conn: &Connection) -> Result<super::Parcel, RepoError> {
        let mut stmt = conn.prepare(super::PARCEL_SELECT_SQL).unwrap();
        let mut rows = stmt.query([]).unwrap();
        let row = rows.next().unwrap().unwrap();
        parse_parcel_row(row)
    }

    #[test]
    fn parse_keeps_unknown_status_and_blank_address() {
        let conn = raw_row_conn("lost", "2024-05-01T10:00:00Z");
        conn.execute("UPDATE parcel SET address = '';", []).unwrap();

        let parcel = parse_first(&conn).unwrap();
        assert_eq!(parcel.status, super::ParcelStatus::Other("lost".to_string()));
        assert_eq!(parcel.address, "");
    }

    #[test]
    fn parse_rejects_malformed_timestamp() {
        let conn = raw_row_conn("sent", "01/05/2024");
        let err = parse_first(&conn).unwrap_err();
        assert!(matches!(err, RepoError::InvalidData(_)));
    }

    #[test]
    fn parse_accepts_valid_row() {
        let conn = raw_row_conn("sent", "2024-05-01T10:00:00Z");
        let parcel = parse_first(&conn).unwrap();
        assert_eq!(parcel.number, 1);
        assert_eq!(parcel.client, 7);
        assert_eq!(parcel.address, "dock 4");
    }
}
