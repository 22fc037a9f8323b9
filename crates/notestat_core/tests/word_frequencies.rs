use notestat_core::{optional_word_frequencies, word_frequencies, WordFrequencyTable};

const SAMPLES: &[&str] = &[
    "The word WORD is just a word.",
    "note is just a NOTE. Note, note is great just Great!",
    "First_word-second_word.Third:word",
    "This is a note with numbers 123-456 and punctuation!!! and dash-es. Great's",
    "zebra apple zebra mango apple zebra kiwi kiwi banana",
    "Ärger ärger Zoo zoo Äpfel äpfel apfel",
    "--- ''' ___ 42 7up up-- it's it's it's",
];

fn assert_ranked(table: &WordFrequencyTable) {
    for pair in table.entries().windows(2) {
        let (left, right) = (&pair[0], &pair[1]);
        assert!(
            left.count > right.count || (left.count == right.count && left.word <= right.word),
            "entries out of order: {left:?} before {right:?}"
        );
    }
}

#[test]
fn every_sample_is_ranked_by_count_then_word() {
    for sample in SAMPLES {
        assert_ranked(&word_frequencies(sample));
    }
}

#[test]
fn counts_sum_to_token_total_and_words_are_lowercase() {
    let table = word_frequencies("zebra apple zebra mango apple zebra kiwi kiwi banana");
    let total: u32 = table.iter().map(|entry| entry.count).sum();
    assert_eq!(total, 9);
    assert!(table.words().all(|word| word == word.to_lowercase()));
    assert_eq!(
        table.words().collect::<Vec<_>>(),
        vec!["zebra", "apple", "kiwi", "banana", "mango"]
    );
}

#[test]
fn blank_inputs_are_equivalent() {
    let empty = WordFrequencyTable::default();
    assert_eq!(optional_word_frequencies(None), empty);
    assert_eq!(word_frequencies(""), empty);
    assert_eq!(word_frequencies("   "), empty);
}

#[test]
fn punctuation_only_text_yields_empty_table() {
    assert!(word_frequencies("... !!! 123 456 -- ''").is_empty());
}

#[test]
fn output_is_stable_across_calls() {
    for sample in SAMPLES {
        assert_eq!(word_frequencies(sample), word_frequencies(sample));
    }
}

#[test]
fn leading_symbols_are_stripped_but_inner_ones_kept() {
    let table = word_frequencies("--- ''' ___ 42 7up up-- it's it's it's");
    assert_eq!(table.get("it's"), Some(3));
    assert_eq!(table.get("up"), Some(1));
    assert_eq!(table.get("up--"), Some(1));
    assert_eq!(table.len(), 3);
}

#[test]
fn serialized_key_order_matches_ranking() {
    let table = word_frequencies("note is just a NOTE. Note, note is great just Great!");
    let json = serde_json::to_string(&table).unwrap();
    assert_eq!(json, r#"{"note":4,"great":2,"is":2,"just":2,"a":1}"#);
}
