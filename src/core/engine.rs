use crate::config::AnalysisConfig;
use crate::core::assignment::{assign, ChordMap};
use crate::core::fingers::FingerMap;
use crate::core::frequency::{count_ngrams, count_words, FrequencyTable};
use crate::core::ngram::{candidate_set, score_ngrams, top_ngrams};
use crate::core::tokenizer::{Tokenizer, TokenizerRules};
use crate::core::types::{KeyEvent, NgramScore, Word};
use crate::error::Result;
use serde::{Deserialize, Serialize};
use tracing::info;

/// Word and n-gram tallies from one pass over a word stream.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FrequencySnapshot {
    pub words: FrequencyTable,
    pub ngrams: FrequencyTable,
}

/// Everything an analysis pass produces.
#[derive(Debug, Clone)]
pub struct Analysis {
    pub chord_map: ChordMap,
    pub ngram_scores: Vec<NgramScore>,
}

// The engine composes the pipeline stages over one finger table.
pub struct ChordEngine {
    pub fingers: FingerMap,
    pub rules: TokenizerRules,
    top_words: usize,
    top_ngrams: usize,
}

impl ChordEngine {
    pub fn new(fingers: FingerMap) -> Self {
        let defaults = AnalysisConfig::default();
        Self {
            fingers,
            rules: TokenizerRules::default(),
            top_words: defaults.top_words,
            top_ngrams: defaults.top_ngrams,
        }
    }

    pub fn from_config(config: &AnalysisConfig) -> Result<Self> {
        Ok(Self {
            fingers: config.finger_map()?,
            rules: config.tokenizer_rules(),
            top_words: config.top_words,
            top_ngrams: config.top_ngrams,
        })
    }

    pub fn with_limits(mut self, top_words: usize, top_ngrams: usize) -> Self {
        self.top_words = top_words;
        self.top_ngrams = top_ngrams;
        self
    }

    pub fn tokenize<I>(&self, events: I) -> Vec<Word>
    where
        I: IntoIterator<Item = KeyEvent>,
    {
        Tokenizer::new(events.into_iter(), &self.rules).collect()
    }

    /// Tallies words and chordable n-grams.
    pub fn count(&self, words: &[Word]) -> FrequencySnapshot {
        let snapshot = FrequencySnapshot {
            words: count_words(words),
            ngrams: count_ngrams(words, &self.fingers),
        };
        info!(
            words = snapshot.words.total(),
            unique_words = snapshot.words.len(),
            ngrams = snapshot.ngrams.len(),
            "frequency model built"
        );
        snapshot
    }

    /// Assigns word chords and picks the top n-grams from existing tallies.
    pub fn build(&self, snapshot: &FrequencySnapshot) -> Analysis {
        let mut chord_map = assign(&snapshot.words.ranked(), &self.fingers, self.top_words);
        let candidates = candidate_set(&snapshot.ngrams);
        let ngram_scores = score_ngrams(&snapshot.ngrams, &snapshot.words, &candidates, &self.fingers);
        chord_map.ngrams = top_ngrams(&ngram_scores, self.top_ngrams);

        info!(
            assigned = chord_map.len(),
            rejected = chord_map.rejections.len(),
            ngrams = chord_map.ngrams.len(),
            "chord map built"
        );
        Analysis { chord_map, ngram_scores }
    }

    /// Full pipeline from raw key events.
    pub fn analyze<I>(&self, events: I) -> (FrequencySnapshot, Analysis)
    where
        I: IntoIterator<Item = KeyEvent>,
    {
        let words = self.tokenize(events);
        let snapshot = self.count(&words);
        let analysis = self.build(&snapshot);
        (snapshot, analysis)
    }
}

impl Default for ChordEngine {
    fn default() -> Self {
        Self::new(FingerMap::default())
    }
}
