//! Closed tag vocabulary for notes.
//!
//! # Responsibility
//! - Define the only tags a note may carry.
//! - Parse raw user input into tags case-insensitively.
//!
//! # Invariants
//! - The vocabulary is closed: `BUSINESS`, `PERSONAL`, `IMPORTANT`.
//! - Raw input is upper-cased before matching; surrounding whitespace is
//!   not trimmed and therefore fails the match.
//! - A batch parse either succeeds for every element or fails as a whole.

use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::str::FromStr;

/// Classification attached to a note.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Tag {
    Business,
    Personal,
    Important,
}

impl Tag {
    /// Every member of the vocabulary, in declaration order.
    pub const ALL: [Tag; 3] = [Tag::Business, Tag::Personal, Tag::Important];

    /// Canonical external name, also used as the persisted value.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Business => "BUSINESS",
            Self::Personal => "PERSONAL",
            Self::Important => "IMPORTANT",
        }
    }

    /// Parses one raw tag, ignoring letter case.
    ///
    /// # Errors
    /// - Returns [`InvalidTag`] carrying the upper-cased input when it names
    ///   no vocabulary member.
    pub fn parse(raw: &str) -> Result<Self, InvalidTag> {
        let normalized = raw.to_uppercase();
        Self::ALL
            .into_iter()
            .find(|tag| tag.as_str() == normalized)
            .ok_or(InvalidTag { raw: normalized })
    }
}

impl Display for Tag {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Tag {
    type Err = InvalidTag;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

/// Raw tag value that matches no vocabulary member.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvalidTag {
    raw: String,
}

impl InvalidTag {
    /// Offending value after upper-case normalization.
    pub fn raw(&self) -> &str {
        self.raw.as_str()
    }

    /// Full set of accepted tags.
    pub fn allowed(&self) -> &'static [Tag] {
        &Tag::ALL
    }
}

impl Display for InvalidTag {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "Invalid tag provided: '{}'. Allowed tags are: ", self.raw)?;
        for (idx, tag) in self.allowed().iter().enumerate() {
            if idx > 0 {
                f.write_str(", ")?;
            }
            f.write_str(tag.as_str())?;
        }
        f.write_str(".")
    }
}

impl Error for InvalidTag {}

/// Parses a batch of raw tags in input order.
///
/// Absent input yields an empty list. The first invalid element aborts the
/// whole batch.
pub fn parse_tags<S: AsRef<str>>(raw: Option<&[S]>) -> Result<Vec<Tag>, InvalidTag> {
    match raw {
        None => Ok(Vec::new()),
        Some(values) => values
            .iter()
            .map(|value| Tag::parse(value.as_ref()))
            .collect(),
    }
}
