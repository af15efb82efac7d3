// File: src/evaluation.rs
use crate::core::assignment::ChordMapDocument;
use crate::core::frequency::FrequencyTable;
use regex::Regex;
use serde::Serialize;
use std::collections::HashSet;
use std::fmt;
use std::sync::OnceLock;
use tracing::info;

/// How a corpus word can be produced with a chord map.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Category {
    ChordableWord,
    ChordableNgram,
    NotChordable,
}

impl Category {
    pub const ALL: [Category; 3] =
        [Category::ChordableWord, Category::ChordableNgram, Category::NotChordable];

    /// Penalty points for one occurrence in this category.
    pub fn penalty(self) -> u64 {
        match self {
            Category::ChordableWord => 1,
            Category::ChordableNgram => 2,
            Category::NotChordable => 3,
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Category::ChordableWord => write!(f, "Chordable word"),
            Category::ChordableNgram => write!(f, "Chordable ngram"),
            Category::NotChordable => write!(f, "Not chordable"),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct EvaluationReport {
    pub min_frequency: u64,
    pub unique_words: usize,
    /// Distinct words meeting `min_frequency`.
    pub frequent_words: usize,
    /// Occurrences skipped because the word is in the ignore list.
    pub ignored: u64,
    /// Occurrences classified.
    pub processed: u64,
    pub total_score: u64,
    pub chordable_word: u64,
    pub chordable_ngram: u64,
    pub not_chordable: u64,
    /// Non-chordable words by descending occurrence count, ties lexicographic.
    pub not_chordable_words: Vec<(String, u64)>,
}

impl EvaluationReport {
    pub fn rare_words(&self) -> usize {
        self.unique_words - self.frequent_words
    }

    pub fn count(&self, category: Category) -> u64 {
        match category {
            Category::ChordableWord => self.chordable_word,
            Category::ChordableNgram => self.chordable_ngram,
            Category::NotChordable => self.not_chordable,
        }
    }

    pub fn average_score(&self) -> f64 {
        if self.processed == 0 {
            0.0
        } else {
            self.total_score as f64 / self.processed as f64
        }
    }

    /// Share of classified occurrences reachable by a word chord or n-gram pair.
    pub fn coverage_percent(&self) -> f64 {
        if self.processed == 0 {
            0.0
        } else {
            (self.chordable_word + self.chordable_ngram) as f64 / self.processed as f64 * 100.0
        }
    }

    fn record(&mut self, category: Category, n: u64) {
        self.processed += n;
        self.total_score += category.penalty() * n;
        match category {
            Category::ChordableWord => self.chordable_word += n,
            Category::ChordableNgram => self.chordable_ngram += n,
            Category::NotChordable => self.not_chordable += n,
        }
    }
}

fn word_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"\b\p{Alphabetic}+\b").expect("static pattern"))
}

/// Lowercased alphabetic runs of free text, in order.
pub fn corpus_words(text: &str) -> Vec<String> {
    let lower = text.to_lowercase();
    word_pattern().find_iter(&lower).map(|m| m.as_str().to_string()).collect()
}

/// Newline-delimited ignore list: trimmed, lowercased, blanks skipped.
pub fn parse_ignore_list(text: &str) -> HashSet<String> {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_lowercase)
        .collect()
}

/// True when `word` splits into a non-empty prefix and suffix that are both
/// n-grams. Split points are tried left to right.
pub fn splits_into_ngrams(word: &str, ngrams: &HashSet<&str>) -> bool {
    word.char_indices()
        .skip(1)
        .any(|(i, _)| ngrams.contains(&word[..i]) && ngrams.contains(&word[i..]))
}

pub fn classify(word: &str, chords: &ChordMapDocument, ngrams: &HashSet<&str>) -> Category {
    if chords.words.contains_key(word) {
        Category::ChordableWord
    } else if splits_into_ngrams(word, ngrams) {
        Category::ChordableNgram
    } else {
        Category::NotChordable
    }
}

/// Scores how well `chords` covers a corpus.
///
/// Every occurrence of a word seen at least `min_frequency` times and not in
/// `ignore` is classified and penalized.
pub fn evaluate(
    chords: &ChordMapDocument,
    corpus: &[String],
    ignore: &HashSet<String>,
    min_frequency: u64,
) -> EvaluationReport {
    let frequencies: FrequencyTable = corpus.iter().collect();
    let ngrams: HashSet<&str> = chords.ngrams.iter().map(String::as_str).collect();

    let mut report = EvaluationReport {
        min_frequency,
        unique_words: frequencies.len(),
        ..Default::default()
    };
    let mut not_chordable = FrequencyTable::new();

    for (word, n) in frequencies.iter().filter(|&(_, n)| n >= min_frequency) {
        report.frequent_words += 1;
        if ignore.contains(word) {
            report.ignored += n;
            continue;
        }
        let category = classify(word, chords, &ngrams);
        if category == Category::NotChordable {
            not_chordable.add(word, n);
        }
        report.record(category, n);
    }
    report.not_chordable_words = not_chordable.ranked();

    info!(
        processed = report.processed,
        total_score = report.total_score,
        coverage = report.coverage_percent(),
        "evaluation finished"
    );
    report
}

#[cfg(test)]
mod tests {
    use super::*;

    fn document(words: &[(&str, &str)], ngrams: &[&str]) -> ChordMapDocument {
        ChordMapDocument {
            words: words.iter().map(|(w, c)| (w.to_string(), c.to_string())).collect(),
            ngrams: ngrams.iter().map(|n| n.to_string()).collect(),
        }
    }

    #[test]
    fn test_corpus_words_are_lowercase_alphabetic_runs() {
        assert_eq!(corpus_words("The cat, the DOG! 42 år"), vec!["the", "cat", "the", "dog", "år"]);
        assert!(corpus_words("abc1").is_empty());
    }

    #[test]
    fn test_split_requires_both_pieces() {
        let ngrams: HashSet<&str> = ["br", "ead"].into_iter().collect();
        assert!(splits_into_ngrams("bread", &ngrams));
        assert!(!splits_into_ngrams("breads", &ngrams));
        assert!(!splits_into_ngrams("br", &ngrams));
    }

    #[test]
    fn test_classification_priority() {
        let chords = document(&[("the", "eht")], &["th", "e", "br", "ead"]);
        let ngrams: HashSet<&str> = chords.ngrams.iter().map(String::as_str).collect();
        assert_eq!(classify("the", &chords, &ngrams), Category::ChordableWord);
        assert_eq!(classify("bread", &chords, &ngrams), Category::ChordableNgram);
        assert_eq!(classify("cat", &chords, &ngrams), Category::NotChordable);
    }

    #[test]
    fn test_ignore_list_parsing() {
        let ignore = parse_ignore_list("  The \n\nAND\n");
        assert!(ignore.contains("the"));
        assert!(ignore.contains("and"));
        assert_eq!(ignore.len(), 2);
    }
}
