//! Parcel schema upgrades.
//!
//! `SCHEMA_STEPS[i]` upgrades a database from version `i` to `i + 1`, so the
//! latest version is the number of steps. Step 1 creates the `parcel` table
//! read by the parcel store.

use crate::db::{DbError, DbResult};
use log::{debug, info};
use rusqlite::Connection;

const SCHEMA_STEPS: &[&str] = &[include_str!("0001_init.sql")];

/// Returns the newest schema version this build can write.
pub fn latest_version() -> u32 {
    SCHEMA_STEPS.len() as u32
}

/// Brings the database up to [`latest_version`] inside one transaction.
///
/// # Errors
/// - `SchemaTooNew` when the file was written by a newer build.
pub fn apply_migrations(conn: &mut Connection) -> DbResult<()> {
    let found = schema_version(conn)?;
    let pending = pending_steps(found)?;
    if pending.is_empty() {
        return Ok(());
    }

    let tx = conn.transaction()?;
    for (version, sql) in pending {
        tx.execute_batch(sql)?;
        tx.pragma_update(None, "user_version", version)?;
        debug!("event=db_migrate module=db status=ok version={version}");
    }
    tx.commit()?;

    info!(
        "event=db_migrate module=db status=done from_version={found} to_version={}",
        latest_version()
    );
    Ok(())
}

fn pending_steps(found: u32) -> DbResult<Vec<(u32, &'static str)>> {
    let supported = latest_version();
    if found > supported {
        return Err(DbError::SchemaTooNew { found, supported });
    }

    Ok(SCHEMA_STEPS
        .iter()
        .zip(1..)
        .skip(found as usize)
        .map(|(sql, version)| (version, *sql))
        .collect())
}

fn schema_version(conn: &Connection) -> DbResult<u32> {
    Ok(conn.pragma_query_value(None, "user_version", |row| row.get(0))?)
}

#[cfg(test)]
mod tests {
    use super::{apply_migrations, latest_version, pending_steps, schema_version};
    use crate::db::DbError;
    use rusqlite::Connection;

    #[test]
    fn fresh_database_needs_every_step_in_order() {
        let versions: Vec<u32> = pending_steps(0)
            .unwrap()
            .into_iter()
            .map(|(version, _)| version)
            .collect();
        assert_eq!(versions, (1..=latest_version()).collect::<Vec<_>>());
        assert!(pending_steps(latest_version()).unwrap().is_empty());
    }

    #[test]
    fn newer_schema_is_refused() {
        let err = pending_steps(latest_version() + 1).unwrap_err();
        assert!(matches!(
            err,
            DbError::SchemaTooNew { found, supported } if found == supported + 1
        ));
    }

    #[test]
    fn apply_migrations_twice_keeps_latest_version() {
        let mut conn = Connection::open_in_memory().unwrap();
        apply_migrations(&mut conn).unwrap();
        apply_migrations(&mut conn).unwrap();
        assert_eq!(schema_version(&conn).unwrap(), latest_version());
    }
}
