//! Note domain model.
//!
//! # Responsibility
//! - Define the canonical note record handled by service and storage.
//! - Keep tag-set normalization in one place.
//!
//! # Invariants
//! - `id` is stable and never reused for another note.
//! - `created_date` is set once at creation and carries millisecond
//!   precision, matching what storage can round-trip.
//! - `tags` holds no duplicates; first occurrence order is kept.

use crate::model::tag::Tag;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Stable identifier for a note.
pub type NoteId = Uuid;

/// Short textual note with a closed set of tags.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Note {
    pub id: NoteId,
    pub title: String,
    pub text: String,
    /// Creation instant, UTC, truncated to milliseconds.
    pub created_date: DateTime<Utc>,
    pub tags: Vec<Tag>,
}

impl Note {
    /// Creates a new note with a generated id, stamped with the current time.
    pub fn new(title: impl Into<String>, text: impl Into<String>, tags: Vec<Tag>) -> Self {
        Self::with_id(Uuid::new_v4(), title, text, now_millis(), tags)
    }

    /// Creates a note with a caller-provided identity and creation time.
    ///
    /// Used by storage read paths where identity already exists.
    pub fn with_id(
        id: NoteId,
        title: impl Into<String>,
        text: impl Into<String>,
        created_date: DateTime<Utc>,
        tags: Vec<Tag>,
    ) -> Self {
        Self {
            id,
            title: title.into(),
            text: text.into(),
            created_date,
            tags: dedup_tags(tags),
        }
    }

    /// Replaces the full tag set.
    pub fn set_tags(&mut self, tags: Vec<Tag>) {
        self.tags = dedup_tags(tags);
    }

    /// Returns whether this note carries at least one of `tags`.
    pub fn has_any_tag(&self, tags: &[Tag]) -> bool {
        self.tags.iter().any(|tag| tags.contains(tag))
    }
}

/// Current UTC time with sub-millisecond precision dropped.
pub fn now_millis() -> DateTime<Utc> {
    let now = Utc::now();
    DateTime::from_timestamp_millis(now.timestamp_millis()).unwrap_or(now)
}

fn dedup_tags(tags: Vec<Tag>) -> Vec<Tag> {
    let mut unique = Vec::with_capacity(tags.len());
    for tag in tags {
        if !unique.contains(&tag) {
            unique.push(tag);
        }
    }
    unique
}

#[cfg(test)]
mod tests {
    use super::{now_millis, Note};
    use crate::model::tag::Tag;

    #[test]
    fn new_note_collapses_duplicate_tags_in_first_seen_order() {
        let note = Note::new(
            "title",
            "text",
            vec![Tag::Personal, Tag::Business, Tag::Personal],
        );
        assert_eq!(note.tags, vec![Tag::Personal, Tag::Business]);
    }

    #[test]
    fn created_date_has_millisecond_precision() {
        let stamp = now_millis();
        assert_eq!(stamp.timestamp_subsec_nanos() % 1_000_000, 0);
    }

    #[test]
    fn has_any_tag_uses_intersection_semantics() {
        let note = Note::new("t", "x", vec![Tag::Business, Tag::Important]);
        assert!(note.has_any_tag(&[Tag::Personal, Tag::Important]));
        assert!(!note.has_any_tag(&[Tag::Personal]));
        assert!(!note.has_any_tag(&[]));
    }

    #[test]
    fn note_serializes_with_camel_case_fields() {
        let note = Note::new("t", "x", vec![Tag::Business]);
        let json = serde_json::to_value(&note).unwrap();
        assert!(json.get("createdDate").is_some());
        assert_eq!(json["tags"][0], "BUSINESS");
    }
}
