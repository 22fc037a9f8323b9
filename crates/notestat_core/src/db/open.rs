//! Connection bootstrap utilities for SQLite.
//!
//! # Responsibility
//! - Open file or in-memory SQLite connections.
//! - Configure connection pragmas required by the note store.
//! - Trigger schema migrations before returning a usable connection.
//!
//! # Invariants
//! - Returned connections have `foreign_keys=ON` so tag rows cascade with
//!   their note.
//! - Returned connections have migrations fully applied.

use super::migrations::apply_migrations;
use super::{DbError, DbResult};
use log::{error, info};
use rusqlite::Connection;
use std::path::Path;
use std::time::{Duration, Instant};

const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// Location reported for in-memory stores.
const MEMORY_LOCATION: &str = ":memory:";

/// Opens a SQLite database file and applies all pending migrations.
///
/// # Side effects
/// - Creates the file when it does not exist yet.
/// - Emits `db_open` logging events with duration and status.
pub fn open_db(path: impl AsRef<Path>) -> DbResult<Connection> {
    let path = path.as_ref();
    open_with("file", path.display().to_string(), || Connection::open(path))
}

/// Opens an in-memory SQLite database and applies all pending migrations.
///
/// Every call yields an independent, empty database.
pub fn open_db_in_memory() -> DbResult<Connection> {
    open_with(
        "memory",
        MEMORY_LOCATION.to_string(),
        Connection::open_in_memory,
    )
}

fn open_with(
    mode: &'static str,
    location: String,
    connect: impl FnOnce() -> rusqlite::Result<Connection>,
) -> DbResult<Connection> {
    let started_at = Instant::now();
    info!("event=db_open module=db status=start mode={mode}");

    let result = connect()
        .map_err(|source| DbError::Open { location, source })
        .and_then(|mut conn| bootstrap_connection(&mut conn).map(|()| conn));

    match &result {
        Ok(_) => info!(
            "event=db_open module=db status=ok mode={mode} duration_ms={}",
            started_at.elapsed().as_millis()
        ),
        Err(err) => error!(
            "event=db_open module=db status=error mode={mode} duration_ms={} error_code={} error={err}",
            started_at.elapsed().as_millis(),
            error_code(err)
        ),
    }
    result
}

fn bootstrap_connection(conn: &mut Connection) -> DbResult<()> {
    conn.execute_batch("PRAGMA foreign_keys = ON;")
        .map_err(|source| DbError::Pragma {
            pragma: "foreign_keys",
            source,
        })?;
    conn.busy_timeout(BUSY_TIMEOUT)
        .map_err(|source| DbError::Pragma {
            pragma: "busy_timeout",
            source,
        })?;
    apply_migrations(conn)
}

fn error_code(err: &DbError) -> &'static str {
    match err {
        DbError::Open { .. } => "db_open_failed",
        DbError::Pragma { .. } => "db_pragma_failed",
        DbError::Migration { .. } => "db_migration_failed",
        DbError::SchemaTooNew { .. } => "db_schema_too_new",
        DbError::Sqlite(_) => "db_bootstrap_failed",
    }
}
