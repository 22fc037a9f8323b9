//! Repository layer abstractions and persistence implementations.
//!
//! # Responsibility
//! - Define the narrow storage contract the note service depends on.
//! - Isolate SQLite query details from service orchestration.
//!
//! # Invariants
//! - Repository APIs return semantic errors (`NotFound`) in addition to DB
//!   transport errors.
//! - Paginated reads are ordered by creation time, newest first.

pub mod note_repo;
