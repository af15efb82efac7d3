// File: src/core/frequency.rs
use crate::core::fingers::FingerMap;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Shortest and longest n-gram windows taken from each word.
pub const NGRAM_LENGTHS: [usize; 2] = [2, 3];

/// A multiset tally that remembers first-seen order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FrequencyTable {
    entries: Vec<(String, u64)>,
    #[serde(skip)]
    index: HashMap<String, usize>,
}

impl FrequencyTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds `n` occurrences of `token`.
    pub fn add(&mut self, token: &str, n: u64) {
        match self.index.get(token) {
            Some(&idx) => self.entries[idx].1 += n,
            None => {
                self.index.insert(token.to_string(), self.entries.len());
                self.entries.push((token.to_string(), n));
            }
        }
    }

    pub fn get(&self, token: &str) -> u64 {
        self.index.get(token).map_or(0, |&idx| self.entries[idx].1)
    }

    pub fn contains(&self, token: &str) -> bool {
        self.index.contains_key(token)
    }

    /// Number of distinct tokens.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Sum of all counts.
    pub fn total(&self) -> u64 {
        self.entries.iter().map(|(_, n)| n).sum()
    }

    /// Entries in first-seen order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, u64)> {
        self.entries.iter().map(|(t, n)| (t.as_str(), *n))
    }

    /// Entries by descending count, ties broken lexicographically ascending.
    pub fn ranked(&self) -> Vec<(String, u64)> {
        let mut ranked = self.entries.clone();
        ranked.sort_by(|(a, na), (b, nb)| nb.cmp(na).then_with(|| a.cmp(b)));
        ranked
    }

    /// Rebuilds the lookup index after deserialization.
    pub(crate) fn reindex(&mut self) {
        self.index = self
            .entries
            .iter()
            .enumerate()
            .map(|(idx, (t, _))| (t.clone(), idx))
            .collect();
    }
}

impl<S: AsRef<str>> FromIterator<S> for FrequencyTable {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        let mut table = Self::new();
        for token in iter {
            table.add(token.as_ref(), 1);
        }
        table
    }
}

/// Tallies words, lowercasing them first.
pub fn count_words<I, S>(words: I) -> FrequencyTable
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    words.into_iter().map(|w| w.as_ref().to_lowercase()).collect()
}

/// Tallies every overlapping 2- and 3-character window of every word that is
/// itself chordable.
pub fn count_ngrams<I, S>(words: I, fingers: &FingerMap) -> FrequencyTable
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut table = FrequencyTable::new();
    for word in words {
        let chars: Vec<char> = word.as_ref().chars().collect();
        for n in NGRAM_LENGTHS {
            for window in chars.windows(n) {
                let ngram: String = window.iter().collect();
                if fingers.is_chordable(&ngram) {
                    table.add(&ngram, 1);
                }
            }
        }
    }
    table
}
