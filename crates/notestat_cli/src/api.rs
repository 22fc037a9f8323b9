//! Request/response API consumed by the command line front-end.
//!
//! # Responsibility
//! - Map each note use-case 1:1 onto a transport call.
//! - Project domain notes into detail/list-item shapes.
//! - Translate service errors into transport outcomes.
//!
//! # Invariants
//! - `NoteNotFound` and unparseable ids become a not-found outcome.
//! - `InvalidTag` becomes a bad-request outcome carrying the tag message.
//! - Blank title or text is rejected as a bad request before any lookup.
//! - Storage faults become an internal outcome; nothing is swallowed.

use chrono::{DateTime, Utc};
use notestat_core::{
    Note, NoteId, NoteRepository, NoteService, NoteServiceError, Page, PageRequest, Tag,
    WordFrequencyTable,
};
use serde::Serialize;
use std::fmt::Display;
use uuid::Uuid;

const NOTE_NOT_FOUND: &str = "Note not found";

/// Outcome class of a failed call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApiErrorKind {
    BadRequest,
    NotFound,
    Internal,
}

impl ApiErrorKind {
    pub fn status(self) -> u16 {
        match self {
            Self::BadRequest => 400,
            Self::NotFound => 404,
            Self::Internal => 500,
        }
    }

    pub fn reason(self) -> &'static str {
        match self {
            Self::BadRequest => "Bad Request",
            Self::NotFound => "Not Found",
            Self::Internal => "Internal Server Error",
        }
    }

    /// Process exit code reported by the CLI.
    pub fn exit_code(self) -> u8 {
        match self {
            Self::Internal => 1,
            Self::BadRequest => 2,
            Self::NotFound => 4,
        }
    }
}

/// Transport-level failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiError {
    pub kind: ApiErrorKind,
    pub message: String,
}

impl ApiError {
    pub fn not_found() -> Self {
        Self {
            kind: ApiErrorKind::NotFound,
            message: NOTE_NOT_FOUND.to_string(),
        }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self {
            kind: ApiErrorKind::BadRequest,
            message: message.into(),
        }
    }

    pub fn internal(err: impl Display) -> Self {
        Self {
            kind: ApiErrorKind::Internal,
            message: err.to_string(),
        }
    }

    /// Error body rendered on stderr.
    pub fn body(&self) -> ErrorBody<'_> {
        ErrorBody {
            status: self.kind.status(),
            error: self.kind.reason(),
            message: self.message.as_str(),
        }
    }
}

impl From<NoteServiceError> for ApiError {
    fn from(value: NoteServiceError) -> Self {
        match value {
            NoteServiceError::NoteNotFound(_) => Self::not_found(),
            NoteServiceError::InvalidTag(err) => Self::bad_request(err.to_string()),
            NoteServiceError::Repo(err) => Self::internal(err),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ErrorBody<'a> {
    pub status: u16,
    pub error: &'static str,
    pub message: &'a str,
}

/// Full note projection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NoteDto {
    pub id: String,
    pub title: String,
    pub created_date: DateTime<Utc>,
    pub text: String,
    pub tags: Vec<String>,
}

impl From<Note> for NoteDto {
    fn from(note: Note) -> Self {
        Self {
            id: note.id.to_string(),
            title: note.title,
            created_date: note.created_date,
            text: note.text,
            tags: note.tags.iter().map(|tag| tag.as_str().to_string()).collect(),
        }
    }
}

/// List projection: no text, no tags.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NoteListItemDto {
    pub id: String,
    pub title: String,
    pub created_date: DateTime<Utc>,
}

impl From<Note> for NoteListItemDto {
    fn from(note: Note) -> Self {
        Self {
            id: note.id.to_string(),
            title: note.title,
            created_date: note.created_date,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PageDto<T> {
    pub content: Vec<T>,
    pub total_elements: u64,
    pub total_pages: u64,
    pub number: u32,
    pub size: u32,
}

impl<T> From<Page<T>> for PageDto<T> {
    fn from(page: Page<T>) -> Self {
        let total_pages = page.total_pages();
        Self {
            content: page.items,
            total_elements: page.total_elements,
            total_pages,
            number: page.page,
            size: page.size,
        }
    }
}

/// Parses an external id; anything that is not a UUID cannot name a note.
pub fn parse_note_id(raw: &str) -> Result<NoteId, ApiError> {
    Uuid::parse_str(raw.trim()).map_err(|_| ApiError::not_found())
}

/// Rejects empty or whitespace-only required fields.
fn require_not_blank(field: &str, value: &str) -> Result<(), ApiError> {
    if value.trim().is_empty() {
        return Err(ApiError::bad_request(format!("{field}: must not be blank")));
    }
    Ok(())
}

fn validate_note_body(title: &str, text: &str) -> Result<(), ApiError> {
    require_not_blank("title", title)?;
    require_not_blank("text", text)
}

pub fn create_note<R: NoteRepository>(
    service: &NoteService<R>,
    title: String,
    text: String,
    tags: &[String],
) -> Result<NoteDto, ApiError> {
    validate_note_body(&title, &text)?;
    let note = service.create_note(title, text, Some(tags))?;
    Ok(note.into())
}

pub fn list_notes<R: NoteRepository>(
    service: &NoteService<R>,
    tags: &[String],
    page: u32,
    size: u32,
) -> Result<PageDto<NoteListItemDto>, ApiError> {
    let page = service.list_notes(Some(tags), PageRequest::new(page, size))?;
    Ok(page.map(NoteListItemDto::from).into())
}

pub fn get_note<R: NoteRepository>(
    service: &NoteService<R>,
    raw_id: &str,
) -> Result<NoteDto, ApiError> {
    let id = parse_note_id(raw_id)?;
    Ok(service.get_note(id)?.into())
}

pub fn update_note<R: NoteRepository>(
    service: &NoteService<R>,
    raw_id: &str,
    title: String,
    text: String,
    tags: &[String],
) -> Result<NoteDto, ApiError> {
    validate_note_body(&title, &text)?;
    let id = parse_note_id(raw_id)?;
    Ok(service.update_note(id, title, text, Some(tags))?.into())
}

pub fn delete_note<R: NoteRepository>(
    service: &NoteService<R>,
    raw_id: &str,
) -> Result<(), ApiError> {
    let id = parse_note_id(raw_id)?;
    service.delete_note(id)?;
    Ok(())
}

pub fn note_stats<R: NoteRepository>(
    service: &NoteService<R>,
    raw_id: &str,
) -> Result<WordFrequencyTable, ApiError> {
    let id = parse_note_id(raw_id)?;
    Ok(service.note_stats(id)?)
}

/// Store diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CountDto {
    pub total_elements: u64,
}

pub fn count_notes<R: NoteRepository>(service: &NoteService<R>) -> Result<CountDto, ApiError> {
    Ok(CountDto {
        total_elements: service.count_notes()?,
    })
}

/// Names of every accepted tag.
pub fn allowed_tags() -> Vec<&'static str> {
    Tag::ALL.iter().map(|tag| tag.as_str()).collect()
}

/// Renders a response value as pretty JSON.
pub fn render<T: Serialize + ?Sized>(value: &T) -> Result<String, ApiError> {
    serde_json::to_string_pretty(value).map_err(ApiError::internal)
}

#[cfg(test)]
mod tests {
    use super::{
        allowed_tags, count_notes, create_note, delete_note, get_note, list_notes, note_stats, parse_note_id,
        render, update_note, ApiError, ApiErrorKind,
    };
    use notestat_core::db::open_db_in_memory;
    use notestat_core::{NoteService, SqliteNoteRepository};
    use rusqlite::params;

    fn tags(values: &[&str]) -> Vec<String> {
        values.iter().map(|value| (*value).to_string()).collect()
    }

    #[test]
    fn create_and_get_project_full_note() {
        let conn = open_db_in_memory().unwrap();
        let service = NoteService::new(SqliteNoteRepository::try_new(&conn).unwrap());

        let created = create_note(
            &service,
            "Title".to_string(),
            "Body".to_string(),
            &tags(&["business", "Important"]),
        )
        .unwrap();
        assert_eq!(created.tags, vec!["BUSINESS", "IMPORTANT"]);

        let loaded = get_note(&service, &created.id).unwrap();
        assert_eq!(loaded, created);

        let json: serde_json::Value = serde_json::from_str(&render(&loaded).unwrap()).unwrap();
        assert_eq!(json["title"], "Title");
        assert!(json["createdDate"].is_string());
        assert_eq!(json["tags"][1], "IMPORTANT");
    }

    #[test]
    fn invalid_tag_maps_to_bad_request_with_message() {
        let conn = open_db_in_memory().unwrap();
        let service = NoteService::new(SqliteNoteRepository::try_new(&conn).unwrap());

        let err = create_note(
            &service,
            "Bad".to_string(),
            "text".to_string(),
            &tags(&["wrongtag"]),
        )
        .unwrap_err();
        assert_eq!(err.kind, ApiErrorKind::BadRequest);
        assert_eq!(err.kind.exit_code(), 2);
        assert_eq!(
            err.message,
            "Invalid tag provided: 'WRONGTAG'. Allowed tags are: BUSINESS, PERSONAL, IMPORTANT."
        );
    }

    #[test]
    fn blank_title_or_text_is_bad_request_and_stores_nothing() {
        let conn = open_db_in_memory().unwrap();
        let service = NoteService::new(SqliteNoteRepository::try_new(&conn).unwrap());

        let err = create_note(&service, "   ".into(), String::new(), &[]).unwrap_err();
        assert_eq!(err, ApiError::bad_request("title: must not be blank"));
        assert_eq!(err.kind.exit_code(), 2);

        let err = create_note(&service, "Title".into(), "\t\n".into(), &[]).unwrap_err();
        assert_eq!(err.message, "text: must not be blank");
        assert_eq!(service.count_notes().unwrap(), 0);

        let created = create_note(&service, "Title".into(), "Body".into(), &[]).unwrap();
        let err = update_note(&service, &created.id, "New".into(), " ".into(), &[]).unwrap_err();
        assert_eq!(err.kind, ApiErrorKind::BadRequest);
        assert_eq!(get_note(&service, &created.id).unwrap().text, "Body");

        let missing = uuid::Uuid::new_v4().to_string();
        let err = update_note(&service, &missing, String::new(), "x".into(), &[]).unwrap_err();
        assert_eq!(err.kind, ApiErrorKind::BadRequest);
    }

    #[test]
    fn unknown_and_malformed_ids_map_to_not_found() {
        let conn = open_db_in_memory().unwrap();
        let service = NoteService::new(SqliteNoteRepository::try_new(&conn).unwrap());

        let missing = uuid::Uuid::new_v4().to_string();
        assert_eq!(get_note(&service, &missing).unwrap_err(), ApiError::not_found());
        assert_eq!(
            get_note(&service, "not-a-uuid").unwrap_err(),
            ApiError::not_found()
        );
        assert_eq!(
            delete_note(&service, &missing).unwrap_err().kind,
            ApiErrorKind::NotFound
        );
        assert_eq!(
            note_stats(&service, &missing).unwrap_err().message,
            "Note not found"
        );
        assert!(parse_note_id(&format!(" {missing} ")).is_ok());
    }

    #[test]
    fn list_projects_items_without_text_and_reports_paging() {
        let conn = open_db_in_memory().unwrap();
        let service = NoteService::new(SqliteNoteRepository::try_new(&conn).unwrap());

        let older = create_note(&service, "older".into(), "x".into(), &tags(&["personal"])).unwrap();
        let newer = create_note(&service, "newer".into(), "y".into(), &[]).unwrap();
        conn.execute(
            "UPDATE notes SET created_at = ?2 WHERE id = ?1;",
            params![older.id, 1_000_i64],
        )
        .unwrap();
        conn.execute(
            "UPDATE notes SET created_at = ?2 WHERE id = ?1;",
            params![newer.id, 2_000_i64],
        )
        .unwrap();

        let page = list_notes(&service, &[], 0, 1).unwrap();
        assert_eq!(page.content.len(), 1);
        assert_eq!(page.content[0].title, "newer");
        assert_eq!(page.total_elements, 2);
        assert_eq!(page.total_pages, 2);
        assert_eq!((page.number, page.size), (0, 1));

        let json: serde_json::Value = serde_json::from_str(&render(&page).unwrap()).unwrap();
        assert!(json["content"][0].get("text").is_none());
        assert_eq!(json["totalElements"], 2);

        let personal = list_notes(&service, &tags(&["PERSONAL"]), 0, 20).unwrap();
        assert_eq!(personal.content.len(), 1);
        assert_eq!(personal.content[0].id, older.id);
    }

    #[test]
    fn update_and_delete_flow() {
        let conn = open_db_in_memory().unwrap();
        let service = NoteService::new(SqliteNoteRepository::try_new(&conn).unwrap());

        let created = create_note(&service, "Old".into(), "Old text".into(), &[]).unwrap();
        let updated = update_note(
            &service,
            &created.id,
            "New".into(),
            "New text".into(),
            &tags(&["important"]),
        )
        .unwrap();
        assert_eq!(updated.id, created.id);
        assert_eq!(updated.created_date, created.created_date);
        assert_eq!(updated.tags, vec!["IMPORTANT"]);

        assert_eq!(count_notes(&service).unwrap().total_elements, 1);
        delete_note(&service, &created.id).unwrap();
        assert_eq!(count_notes(&service).unwrap().total_elements, 0);
        assert_eq!(
            get_note(&service, &created.id).unwrap_err().kind,
            ApiErrorKind::NotFound
        );
    }

    #[test]
    fn stats_render_in_ranking_order() {
        let conn = open_db_in_memory().unwrap();
        let service = NoteService::new(SqliteNoteRepository::try_new(&conn).unwrap());

        let created = create_note(
            &service,
            "t".into(),
            "note is just a NOTE. Note, note is great just Great!".into(),
            &[],
        )
        .unwrap();
        let table = note_stats(&service, &created.id).unwrap();
        let compact = serde_json::to_string(&table).unwrap();
        assert_eq!(compact, r#"{"note":4,"great":2,"is":2,"just":2,"a":1}"#);
    }

    #[test]
    fn error_body_carries_status_and_reason() {
        let body = serde_json::to_value(ApiError::not_found().body()).unwrap();
        assert_eq!(body["status"], 404);
        assert_eq!(body["error"], "Not Found");
        assert_eq!(body["message"], "Note not found");
    }

    #[test]
    fn allowed_tags_lists_vocabulary() {
        assert_eq!(allowed_tags(), vec!["BUSINESS", "PERSONAL", "IMPORTANT"]);
    }
}
