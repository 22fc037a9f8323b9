//! Word-frequency ranking.
//!
//! # Responsibility
//! - Tokenize free text into words and count them case-insensitively.
//! - Rank the counts deterministically.
//!
//! # Invariants
//! - A word starts with a letter and continues with letters, digits,
//!   apostrophes, hyphens or underscores. Everything else is a delimiter.
//! - Words are lower-cased before counting.
//! - Entries are ordered by count descending, then word ascending
//!   (code-point order).
//! - Blank input yields an empty table.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::ser::{Serialize, SerializeMap, Serializer};
use std::cmp::Ordering;
use std::collections::HashMap;

static WORD_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\p{L}+[\p{L}\p{N}'\-_]*").expect("valid word regex"));

/// One ranked `(word, count)` entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WordCount {
    pub word: String,
    pub count: u32,
}

impl WordCount {
    pub fn new(word: impl Into<String>, count: u32) -> Self {
        Self {
            word: word.into(),
            count,
        }
    }
}

/// Ranked word counts for one text.
///
/// Serializes as a map whose key order equals the ranking order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WordFrequencyTable {
    entries: Vec<WordCount>,
}

impl WordFrequencyTable {
    /// Ranked entries.
    pub fn entries(&self) -> &[WordCount] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Count for `word`, which must already be lower-case.
    pub fn get(&self, word: &str) -> Option<u32> {
        self.entries
            .iter()
            .find(|entry| entry.word == word)
            .map(|entry| entry.count)
    }

    /// Words in ranking order.
    pub fn words(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|entry| entry.word.as_str())
    }

    pub fn iter(&self) -> std::slice::Iter<'_, WordCount> {
        self.entries.iter()
    }

    pub fn into_entries(self) -> Vec<WordCount> {
        self.entries
    }
}

impl<'a> IntoIterator for &'a WordFrequencyTable {
    type Item = &'a WordCount;
    type IntoIter = std::slice::Iter<'a, WordCount>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

impl Serialize for WordFrequencyTable {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for entry in &self.entries {
            map.serialize_entry(&entry.word, &entry.count)?;
        }
        map.end()
    }
}

/// Counts and ranks the words of `text`.
pub fn word_frequencies(text: &str) -> WordFrequencyTable {
    if text.trim().is_empty() {
        return WordFrequencyTable::default();
    }

    let mut counts: HashMap<String, u32> = HashMap::new();
    for token in WORD_RE.find_iter(text) {
        *counts.entry(token.as_str().to_lowercase()).or_insert(0) += 1;
    }

    let mut entries = counts
        .into_iter()
        .map(|(word, count)| WordCount { word, count })
        .collect::<Vec<_>>();
    entries.sort_by(rank_order);

    WordFrequencyTable { entries }
}

/// Same as [`word_frequencies`], treating absent text as blank.
pub fn optional_word_frequencies(text: Option<&str>) -> WordFrequencyTable {
    text.map(word_frequencies).unwrap_or_default()
}

fn rank_order(left: &WordCount, right: &WordCount) -> Ordering {
    right
        .count
        .cmp(&left.count)
        .then_with(|| left.word.cmp(&right.word))
}

#[cfg(test)]
mod tests {
    use super::{optional_word_frequencies, word_frequencies, WordCount};

    fn pairs(text: &str) -> Vec<(String, u32)> {
        word_frequencies(text)
            .into_entries()
            .into_iter()
            .map(|WordCount { word, count }| (word, count))
            .collect()
    }

    fn owned(expected: &[(&str, u32)]) -> Vec<(String, u32)> {
        expected
            .iter()
            .map(|(word, count)| ((*word).to_string(), *count))
            .collect()
    }

    #[test]
    fn blank_and_absent_text_yield_empty_table() {
        assert!(optional_word_frequencies(None).is_empty());
        assert!(word_frequencies("").is_empty());
        assert!(word_frequencies("   ").is_empty());
        assert!(word_frequencies("\n\t ").is_empty());
    }

    #[test]
    fn counts_case_insensitively_and_breaks_ties_alphabetically() {
        assert_eq!(
            pairs("The word WORD is just a word."),
            owned(&[("word", 3), ("a", 1), ("is", 1), ("just", 1), ("the", 1)])
        );
    }

    #[test]
    fn ranks_repeated_words_first() {
        assert_eq!(
            pairs("note is just a NOTE. Note, note is great just Great!"),
            owned(&[("note", 4), ("great", 2), ("is", 2), ("just", 2), ("a", 1)])
        );
    }

    #[test]
    fn joins_underscores_and_hyphens_but_splits_on_other_punctuation() {
        assert_eq!(
            pairs("First_word-second_word.Third:word"),
            owned(&[("first_word-second_word", 1), ("third", 1), ("word", 1)])
        );
    }

    #[test]
    fn drops_numbers_and_keeps_apostrophes() {
        let table = word_frequencies(
            "This is a note with numbers 123-456 and punctuation!!! and dash-es. Great's",
        );
        assert_eq!(
            table.words().collect::<Vec<_>>(),
            vec![
                "and",
                "a",
                "dash-es",
                "great's",
                "is",
                "note",
                "numbers",
                "punctuation",
                "this",
                "with"
            ]
        );
        assert_eq!(table.get("and"), Some(2));
    }

    #[test]
    fn token_must_start_with_letter() {
        assert_eq!(
            pairs("-abc 'quoted 9lives x9 dash- trail_"),
            owned(&[
                ("abc", 1),
                ("dash-", 1),
                ("lives", 1),
                ("quoted", 1),
                ("trail_", 1),
                ("x9", 1)
            ])
        );
    }

    #[test]
    fn handles_non_ascii_letters() {
        assert_eq!(
            pairs("Über über ÜBER café"),
            owned(&[("über", 3), ("café", 1)])
        );
    }

    #[test]
    fn repeated_calls_are_identical() {
        let text = "b a c b a b";
        assert_eq!(word_frequencies(text), word_frequencies(text));
    }

    #[test]
    fn serializes_as_ordered_object() {
        let table = word_frequencies("zeta zeta alpha");
        let json = serde_json::to_string(&table).unwrap();
        assert_eq!(json, r#"{"zeta":2,"alpha":1}"#);
    }
}
