//! Note store bootstrap: connection setup and schema versioning.
//!
//! # Responsibility
//! - Hand out connections whose `notes`/`note_tags` schema is current.
//! - Report which bootstrap step failed and for which database location.
//!
//! # Invariants
//! - Schema version lives in `PRAGMA user_version`.
//! - A store written by a newer schema is never opened.

use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod migrations;
mod open;

pub use open::{open_db, open_db_in_memory};

pub type DbResult<T> = Result<T, DbError>;

/// Failure while opening or querying the note store.
#[derive(Debug)]
pub enum DbError {
    /// The database at `location` could not be opened or created.
    Open {
        location: String,
        source: rusqlite::Error,
    },
    /// A required connection pragma was rejected.
    Pragma {
        pragma: &'static str,
        source: rusqlite::Error,
    },
    /// Schema migration `version` failed and was rolled back.
    Migration {
        version: u32,
        source: rusqlite::Error,
    },
    /// The store was written by a newer build.
    SchemaTooNew { found: u32, supported: u32 },
    /// Note query or write failure on an opened store.
    Sqlite(rusqlite::Error),
}

impl Display for DbError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Open { location, source } => {
                write!(f, "cannot open note store at `{location}`: {source}")
            }
            Self::Pragma { pragma, source } => {
                write!(f, "note store rejected pragma `{pragma}`: {source}")
            }
            Self::Migration { version, source } => {
                write!(f, "note store migration {version} failed: {source}")
            }
            Self::SchemaTooNew { found, supported } => write!(
                f,
                "note store schema version {found} is newer than supported {supported}"
            ),
            Self::Sqlite(err) => write!(f, "note store query failed: {err}"),
        }
    }
}

impl Error for DbError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Open { source, .. }
            | Self::Pragma { source, .. }
            | Self::Migration { source, .. } => Some(source),
            Self::Sqlite(err) => Some(err),
            Self::SchemaTooNew { .. } => None,
        }
    }
}

impl From<rusqlite::Error> for DbError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Sqlite(value)
    }
}
