// File: src/core/assignment.rs
use crate::core::fingers::{signature_of, FingerMap};
use crate::core::types::{Assignment, ChordKind, ChordSignature, RejectReason, Rejection, Word};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};
use std::ops::ControlFlow;
use tracing::debug;

/// Minimum number of keys in any chord.
pub const MIN_CHORD_KEYS: usize = 2;

/// The set of chord signatures already handed out during one assignment pass.
#[derive(Debug, Clone, Default)]
pub struct SignatureRegistry {
    used: HashSet<ChordSignature>,
}

impl SignatureRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_used(&self, signature: &ChordSignature) -> bool {
        self.used.contains(signature)
    }

    /// Claims a signature; returns false when it was already taken.
    pub fn claim(&mut self, signature: ChordSignature) -> bool {
        self.used.insert(signature)
    }

    pub fn len(&self) -> usize {
        self.used.len()
    }

    pub fn is_empty(&self) -> bool {
        self.used.is_empty()
    }
}

/// Result of an assignment pass: collision-free word chords plus the chosen
/// n-grams, and the ranked words that were passed over.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ChordMap {
    pub assignments: Vec<Assignment>,
    pub ngrams: Vec<String>,
    pub rejections: Vec<Rejection>,
}

impl ChordMap {
    pub fn chord_for(&self, word: &str) -> Option<&ChordSignature> {
        self.assignments.iter().find(|a| a.word == word).map(|a| &a.chord)
    }

    pub fn len(&self) -> usize {
        self.assignments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.assignments.is_empty()
    }

    /// The interchange form of this map.
    pub fn to_document(&self) -> ChordMapDocument {
        ChordMapDocument {
            words: self
                .assignments
                .iter()
                .map(|a| (a.word.clone(), a.chord.as_str().to_string()))
                .collect(),
            ngrams: self.ngrams.clone(),
        }
    }
}

/// The on-disk chord map: `{"words": {word: chord}, "ngrams": [..]}`.
///
/// `words` is a sorted map so the serialized document is byte-identical for
/// identical inputs.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChordMapDocument {
    pub words: BTreeMap<Word, String>,
    pub ngrams: Vec<String>,
}

/// Accumulator threaded through the greedy pass.
#[derive(Debug, Default)]
struct AssignState {
    registry: SignatureRegistry,
    assignments: Vec<Assignment>,
    rejections: Vec<Rejection>,
}

impl AssignState {
    fn reject(mut self, word: &str, count: u64, reason: RejectReason) -> Self {
        debug!(word, count, %reason, "word left without a chord");
        self.rejections.push(Rejection { word: word.to_string(), count, reason });
        self
    }

    fn accept(mut self, word: &str, count: u64, chord: ChordSignature, kind: ChordKind) -> Self {
        self.registry.claim(chord.clone());
        self.assignments.push(Assignment { word: word.to_string(), chord, count, kind });
        self
    }

    /// One greedy step: natural chord first, then one-letter subsets in
    /// ascending order of the removed letter.
    fn step(self, word: &str, count: u64, fingers: &FingerMap) -> Self {
        if !fingers.is_chordable(word) {
            return self.reject(word, count, RejectReason::NotChordable);
        }

        let natural = signature_of(word);
        if natural.len() < MIN_CHORD_KEYS {
            return self.reject(word, count, RejectReason::TooShort);
        }
        if !self.registry.is_used(&natural) {
            return self.accept(word, count, natural, ChordKind::Natural);
        }

        let subset = natural
            .keys()
            .map(|key| natural.without(key))
            .find(|candidate| {
                candidate.len() >= MIN_CHORD_KEYS
                    && fingers.is_chordable(candidate.as_str())
                    && !self.registry.is_used(candidate)
            });

        match subset {
            Some(chord) => {
                debug!(word, natural = %natural, subset = %chord, "collision resolved with subset chord");
                self.accept(word, count, chord, ChordKind::Subset)
            }
            None => self.reject(word, count, RejectReason::CollisionExhausted),
        }
    }
}

/// Greedily gives the highest-ranked words a unique chord each.
///
/// `ranked` must already be ordered (descending count, ties lexicographic).
/// Stops once `top_n` words hold a chord. A signature, once taken, is never
/// reassigned, so earlier words always win collisions.
pub fn assign(ranked: &[(Word, u64)], fingers: &FingerMap, top_n: usize) -> ChordMap {
    let state = ranked.iter().try_fold(AssignState::default(), |state, (word, count)| {
        if state.assignments.len() >= top_n {
            ControlFlow::Break(state)
        } else {
            ControlFlow::Continue(state.step(word, *count, fingers))
        }
    });
    let state = match state {
        ControlFlow::Break(state) | ControlFlow::Continue(state) => state,
    };

    ChordMap {
        assignments: state.assignments,
        ngrams: Vec::new(),
        rejections: state.rejections,
    }
}
