//! Domain model for notes, tags and paginated results.
//!
//! # Responsibility
//! - Define canonical data structures used by core business logic.
//! - Keep storage and transport shapes out of the domain types.
//!
//! # Invariants
//! - Every note is identified by a stable `NoteId`.
//! - Tags always belong to the closed `Tag` vocabulary.

pub mod note;
pub mod page;
pub mod tag;
