//! Note use-case service.
//!
//! # Responsibility
//! - Provide note create/update/delete/get/list/stats/count APIs.
//! - Convert raw tag input into the closed vocabulary.
//! - Stamp creation time and delegate persistence to a `NoteRepository`.
//!
//! # Invariants
//! - `update_note` replaces title, text and tags; id and creation time are
//!   preserved.
//! - Existence is checked before any mutation; a missing id is reported as
//!   `NoteNotFound`, never as a generic fault.
//! - Lists are ordered newest first.
//! - The service keeps no state between calls.
//! - Log lines carry ids and counts only, never note content.

use crate::model::note::{Note, NoteId};
use crate::model::page::{Page, PageRequest};
use crate::model::tag::{parse_tags, InvalidTag};
use crate::repo::note_repo::{NoteRepository, RepoError};
use crate::stats::word_freq::{word_frequencies, WordFrequencyTable};
use log::{debug, info, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Service error for note use-cases.
#[derive(Debug)]
pub enum NoteServiceError {
    /// Raw tag input names no vocabulary member.
    InvalidTag(InvalidTag),
    /// Target note does not exist.
    NoteNotFound(NoteId),
    /// Persistence-layer failure.
    Repo(RepoError),
}

impl NoteServiceError {
    /// Stable machine-readable code used in log lines.
    pub fn code(&self) -> &'static str {
        match self {
            Self::InvalidTag(_) => "invalid_tag",
            Self::NoteNotFound(_) => "note_not_found",
            Self::Repo(_) => "repo_failure",
        }
    }
}

impl Display for NoteServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidTag(err) => write!(f, "{err}"),
            Self::NoteNotFound(id) => write!(f, "note not found: {id}"),
            Self::Repo(err) => write!(f, "{err}"),
        }
    }
}

impl Error for NoteServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::InvalidTag(err) => Some(err),
            Self::Repo(err) => Some(err),
            Self::NoteNotFound(_) => None,
        }
    }
}

impl From<InvalidTag> for NoteServiceError {
    fn from(value: InvalidTag) -> Self {
        Self::InvalidTag(value)
    }
}

impl From<RepoError> for NoteServiceError {
    fn from(value: RepoError) -> Self {
        match value {
            RepoError::NotFound(id) => Self::NoteNotFound(id),
            other => Self::Repo(other),
        }
    }
}

pub type NoteServiceResult<T> = Result<T, NoteServiceError>;

/// Note service facade over repository implementations.
pub struct NoteService<R: NoteRepository> {
    repo: R,
}

impl<R: NoteRepository> NoteService<R> {
    /// Creates a service using the provided repository implementation.
    pub fn new(repo: R) -> Self {
        Self { repo }
    }


    /// Creates one note stamped with the current time.
    ///
    /// Title and text are stored as given, empty strings included.
    pub fn create_note(
        &self,
        title: impl Into<String>,
        text: impl Into<String>,
        raw_tags: Option<&[String]>,
    ) -> NoteServiceResult<Note> {
        let result = parse_tags(raw_tags)
            .map_err(NoteServiceError::from)
            .and_then(|tags| {
                let note = Note::new(title, text, tags);
                Ok(self.repo.save(&note)?)
            });
        match &result {
            Ok(note) => info!(
                "event=note_create module=note_service status=ok note_id={} tag_count={}",
                note.id,
                note.tags.len()
            ),
            Err(err) => log_failure("note_create", None, err),
        }
        result
    }

    /// Replaces title, text and tags of an existing note.
    pub fn update_note(
        &self,
        id: NoteId,
        title: impl Into<String>,
        text: impl Into<String>,
        raw_tags: Option<&[String]>,
    ) -> NoteServiceResult<Note> {
        let result = self.load(id).and_then(|mut note| {
            let tags = parse_tags(raw_tags)?;
            note.title = title.into();
            note.text = text.into();
            note.set_tags(tags);
            Ok(self.repo.save(&note)?)
        });
        match &result {
            Ok(note) => info!(
                "event=note_update module=note_service status=ok note_id={} tag_count={}",
                note.id,
                note.tags.len()
            ),
            Err(err) => log_failure("note_update", Some(id), err),
        }
        result
    }

    /// Deletes an existing note.
    pub fn delete_note(&self, id: NoteId) -> NoteServiceResult<()> {
        let result = self
            .load(id)
            .and_then(|note| Ok(self.repo.delete(&note)?));
        match &result {
            Ok(()) => info!("event=note_delete module=note_service status=ok note_id={id}"),
            Err(err) => log_failure("note_delete", Some(id), err),
        }
        result
    }

    /// Gets one note by id.
    pub fn get_note(&self, id: NoteId) -> NoteServiceResult<Note> {
        let result = self.load(id);
        match &result {
            Ok(_) => debug!("event=note_get module=note_service status=ok note_id={id}"),
            Err(err) => log_failure("note_get", Some(id), err),
        }
        result
    }

    /// Lists notes newest first, optionally restricted to notes carrying at
    /// least one of `raw_tags`.
    pub fn list_notes(
        &self,
        raw_tags: Option<&[String]>,
        request: PageRequest,
    ) -> NoteServiceResult<Page<Note>> {
        let result = match raw_tags {
            Some(values) if !values.is_empty() => parse_tags(Some(values))
                .map_err(NoteServiceError::from)
                .and_then(|tags| Ok(self.repo.find_by_tags_in(&tags, request)?)),
            _ => self.repo.find_all(request).map_err(NoteServiceError::from),
        };
        match &result {
            Ok(page) => debug!(
                "event=note_list module=note_service status=ok page={} size={} items={} total={}",
                page.page,
                page.size,
                page.items.len(),
                page.total_elements
            ),
            Err(err) => log_failure("note_list", None, err),
        }
        result
    }

    /// Computes the ranked word frequencies of a note's text.
    pub fn note_stats(&self, id: NoteId) -> NoteServiceResult<WordFrequencyTable> {
        let result = self.load(id).map(|note| word_frequencies(&note.text));
        match &result {
            Ok(table) => debug!(
                "event=note_stats module=note_service status=ok note_id={id} distinct_words={}",
                table.len()
            ),
            Err(err) => log_failure("note_stats", Some(id), err),
        }
        result
    }

    /// Number of stored notes.
    pub fn count_notes(&self) -> NoteServiceResult<u64> {
        let result = self.repo.count().map_err(NoteServiceError::from);
        match &result {
            Ok(total) => debug!("event=note_count module=note_service status=ok total={total}"),
            Err(err) => log_failure("note_count", None, err),
        }
        result
    }

    fn load(&self, id: NoteId) -> NoteServiceResult<Note> {
        self.repo
            .find_by_id(id)?
            .ok_or(NoteServiceError::NoteNotFound(id))
    }
}

fn log_failure(event: &str, id: Option<NoteId>, err: &NoteServiceError) {
    let note_id = id.map_or_else(|| "-".to_string(), |id| id.to_string());
    match err {
        NoteServiceError::Repo(_) => warn!(
            "event={event} module=note_service status=error note_id={note_id} error_code={} error={err}",
            err.code()
        ),
        _ => info!(
            "event={event} module=note_service status=rejected note_id={note_id} error_code={}",
            err.code()
        ),
    }
}
