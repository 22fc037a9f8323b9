//! Note repository contract and SQLite implementation.
//!
//! # Responsibility
//! - Provide save/find/delete and paginated listing over the `notes` table.
//! - Own tag-link replacement (`note_tags`) with atomic semantics.
//!
//! # Invariants
//! - `save` inserts unknown ids and overwrites title/text/tags of known ids;
//!   `created_at` is written once on insert.
//! - Listing order is `created_at DESC, id ASC`.
//! - Tag filters match notes whose tag set intersects the requested set.
//! - Read paths reject invalid persisted state instead of masking it.

use crate::db::DbError;
use crate::model::note::{Note, NoteId};
use crate::model::page::{Page, PageRequest};
use crate::model::tag::Tag;
use chrono::{DateTime, Utc};
use rusqlite::types::Value;
use rusqlite::{params, params_from_iter, Connection, Row};
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

const NOTE_SELECT_SQL: &str = "SELECT
    id,
    title,
    text,
    created_at
FROM notes";

pub type RepoResult<T> = Result<T, RepoError>;

/// Repository error for note persistence and query operations.
#[derive(Debug)]
pub enum RepoError {
    Db(DbError),
    NotFound(NoteId),
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
            Self::Db(err) => write!(f, "{err}"),
            Self::NotFound(id) => write!(f, "note not found: {id}"),
            Self::InvalidData(message) => write!(f, "invalid persisted note data: {message}"),
            Self::MissingRequiredTable(table) => {
                write!(f, "note storage is missing table `{table}`")
            }
            Self::MissingRequiredColumn { table, column } => {
                write!(f, "note storage table `{table}` is missing column `{column}`")
            }
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            _ => None,
        }
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Storage contract consumed by the note service.
pub trait NoteRepository {
    /// Inserts or overwrites `note` and returns the stored record.
    fn save(&self, note: &Note) -> RepoResult<Note>;
    /// Gets one note by id.
    fn find_by_id(&self, id: NoteId) -> RepoResult<Option<Note>>;
    /// Removes `note` by identity. Fails with `NotFound` when nothing was removed.
    fn delete(&self, note: &Note) -> RepoResult<()>;
    /// Lists every note, newest first.
    fn find_all(&self, request: PageRequest) -> RepoResult<Page<Note>>;
    /// Lists notes carrying at least one of `tags`, newest first.
    fn find_by_tags_in(&self, tags: &[Tag], request: PageRequest) -> RepoResult<Page<Note>>;
    /// Total number of stored notes.
    fn count(&self) -> RepoResult<u64>;
}

/// SQLite-backed note repository.
pub struct SqliteNoteRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteNoteRepository<'conn> {
    /// Constructs a repository from a migrated/ready connection.
    ///
    /// # Errors
    /// - Returns `MissingRequiredTable`/`MissingRequiredColumn` when the
    ///   connection was not bootstrapped through [`crate::db::open_db`].
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_note_connection_ready(conn)?;
        Ok(Self { conn })
    }

    fn query_page(
        &self,
        filter_sql: &str,
        filter_values: Vec<Value>,
        request: PageRequest,
    ) -> RepoResult<Page<Note>> {
        let count_sql = format!("SELECT COUNT(*) FROM notes{filter_sql};");
        let total: i64 = self.conn.query_row(
            &count_sql,
            params_from_iter(filter_values.iter()),
            |row| row.get(0),
        )?;
        let total = u64::try_from(total)
            .map_err(|_| RepoError::InvalidData(format!("negative note count `{total}`")))?;

        let offset = i64::try_from(request.offset()).map_err(|_| {
            RepoError::InvalidData(format!("page offset overflow for page {}", request.page))
        })?;
        let sql = format!(
            "{NOTE_SELECT_SQL}{filter_sql} ORDER BY created_at DESC, id ASC LIMIT ? OFFSET ?;"
        );
        let mut bind_values = filter_values;
        bind_values.push(Value::Integer(i64::from(request.size)));
        bind_values.push(Value::Integer(offset));

        let mut stmt = self.conn.prepare(&sql)?;
        let mut rows = stmt.query(params_from_iter(bind_values))?;
        let mut notes = Vec::new();
        while let Some(row) = rows.next()? {
            notes.push(self.parse_note_row(row)?);
        }

        Ok(Page::new(notes, total, request))
    }

    fn parse_note_row(&self, row: &Row<'_>) -> RepoResult<Note> {
        let id_text: String = row.get("id")?;
        let id = parse_uuid(&id_text)?;
        let created_at: i64 = row.get("created_at")?;
        let created_date = parse_created_at(created_at)?;
        let tags = load_tags_for_note(self.conn, &id_text)?;
        Ok(Note::with_id(
            id,
            row.get::<_, String>("title")?,
            row.get::<_, String>("text")?,
            created_date,
            tags,
        ))
    }
}

impl NoteRepository for SqliteNoteRepository<'_> {
    fn save(&self, note: &Note) -> RepoResult<Note> {
        let id_text = note.id.to_string();
        let tx = self.conn.unchecked_transaction()?;

        tx.execute(
            "INSERT INTO notes (id, title, text, created_at)
             VALUES (?1, ?2, ?3, ?4)
             ON CONFLICT(id) DO UPDATE SET
                title = excluded.title,
                text = excluded.text;",
            params![
                id_text.as_str(),
                note.title.as_str(),
                note.text.as_str(),
                note.created_date.timestamp_millis(),
            ],
        )?;

        tx.execute(
            "DELETE FROM note_tags WHERE note_id = ?1;",
            [id_text.as_str()],
        )?;
        for (position, tag) in note.tags.iter().enumerate() {
            let position = i64::try_from(position)
                .map_err(|_| RepoError::InvalidData(format!("tag position overflow `{position}`")))?;
            tx.execute(
                "INSERT OR IGNORE INTO note_tags (note_id, tag, position)
                 VALUES (?1, ?2, ?3);",
                params![id_text.as_str(), tag.as_str(), position],
            )?;
        }

        tx.commit()?;

        self.find_by_id(note.id)?.ok_or_else(|| {
            RepoError::InvalidData(format!("saved note `{id_text}` missing in read-back"))
        })
    }

    fn find_by_id(&self, id: NoteId) -> RepoResult<Option<Note>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{NOTE_SELECT_SQL} WHERE id = ?1;"))?;
        let mut rows = stmt.query([id.to_string()])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(self.parse_note_row(row)?));
        }

        Ok(None)
    }

    fn delete(&self, note: &Note) -> RepoResult<()> {
        let id_text = note.id.to_string();
        let tx = self.conn.unchecked_transaction()?;
        tx.execute(
            "DELETE FROM note_tags WHERE note_id = ?1;",
            [id_text.as_str()],
        )?;
        let changed = tx.execute("DELETE FROM notes WHERE id = ?1;", [id_text.as_str()])?;
        if changed == 0 {
            return Err(RepoError::NotFound(note.id));
        }
        tx.commit()?;
        Ok(())
    }

    fn find_all(&self, request: PageRequest) -> RepoResult<Page<Note>> {
        self.query_page("", Vec::new(), request)
    }

    fn find_by_tags_in(&self, tags: &[Tag], request: PageRequest) -> RepoResult<Page<Note>> {
        if tags.is_empty() {
            return Ok(Page::empty(request));
        }

        let placeholders = vec!["?"; tags.len()].join(", ");
        let filter_sql = format!(
            " WHERE EXISTS (
                SELECT 1
                FROM note_tags nt
                WHERE nt.note_id = notes.id
                  AND nt.tag IN ({placeholders})
            )"
        );
        let filter_values = tags
            .iter()
            .map(|tag| Value::Text(tag.as_str().to_string()))
            .collect();
        self.query_page(&filter_sql, filter_values, request)
    }

    fn count(&self) -> RepoResult<u64> {
        let total: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM notes;", [], |row| row.get(0))?;
        u64::try_from(total)
            .map_err(|_| RepoError::InvalidData(format!("negative note count `{total}`")))
    }
}

fn parse_uuid(value: &str) -> RepoResult<NoteId> {
    Uuid::parse_str(value)
        .map_err(|_| RepoError::InvalidData(format!("invalid uuid value `{value}` in notes.id")))
}

fn parse_created_at(value: i64) -> RepoResult<DateTime<Utc>> {
    DateTime::from_timestamp_millis(value).ok_or_else(|| {
        RepoError::InvalidData(format!("invalid timestamp `{value}` in notes.created_at"))
    })
}

fn load_tags_for_note(conn: &Connection, note_id: &str) -> RepoResult<Vec<Tag>> {
    let mut stmt = conn.prepare(
        "SELECT tag
         FROM note_tags
         WHERE note_id = ?1
         ORDER BY position ASC;",
    )?;
    let mut rows = stmt.query([note_id])?;
    let mut tags = Vec::new();
    while let Some(row) = rows.next()? {
        let value: String = row.get(0)?;
        let tag = Tag::parse(&value).map_err(|_| {
            RepoError::InvalidData(format!("invalid tag `{value}` in note_tags.tag"))
        })?;
        tags.push(tag);
    }
    Ok(tags)
}

fn ensure_note_connection_ready(conn: &Connection) -> RepoResult<()> {
    const REQUIRED: &[(&str, &[&str])] = &[
        ("notes", &["id", "title", "text", "created_at"]),
        ("note_tags", &["note_id", "tag", "position"]),
    ];

    for &(table, columns) in REQUIRED {
        if !table_exists(conn, table)? {
            return Err(RepoError::MissingRequiredTable(table));
        }
        for &column in columns {
            if !table_has_column(conn, table, column)? {
                return Err(RepoError::MissingRequiredColumn { table, column });
            }
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
