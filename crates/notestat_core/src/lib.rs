//! Core domain logic for notestat.
//! This crate is the single source of truth for note, tag and statistics
//! invariants.

pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;
pub mod stats;

pub use logging::{default_log_level, init_logging, logging_status, LoggingError};
pub use model::note::{Note, NoteId};
pub use model::page::{normalize_page_size, Page, PageRequest, DEFAULT_PAGE_SIZE};
pub use model::tag::{parse_tags, InvalidTag, Tag};
pub use repo::note_repo::{NoteRepository, RepoError, RepoResult, SqliteNoteRepository};
pub use service::note_service::{NoteService, NoteServiceError};
pub use stats::word_freq::{
    optional_word_frequencies, word_frequencies, WordCount, WordFrequencyTable,
};

/// Minimal health-check API for early integration.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
