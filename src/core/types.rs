// src/core/types.rs
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

/// A finalized word assembled by the tokenizer. Always lowercase.
pub type Word = String;

/// One logged input action, in time order.
///
/// Logs record printable keys as themselves (`"a"`, `"."`) and everything
/// else as a bracketed name (`"<space>"`, `"<backspace>"`, `"<ctrl>"`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum KeyEvent {
    Char(char),
    Named(String),
}

impl KeyEvent {
    /// Classifies a raw log token. Exactly one character means a key press of
    /// that character; anything longer is a named control token.
    pub fn parse(raw: &str) -> Self {
        let mut chars = raw.chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) => KeyEvent::Char(c),
            _ => KeyEvent::Named(raw.to_string()),
        }
    }

    /// The character this event appends to a word, if any. Controls,
    /// invisible format characters, private-use characters and every
    /// separator except the plain space are not printable.
    pub fn printable(&self) -> Option<char> {
        match self {
            KeyEvent::Char(c) if is_printable(*c) => Some(*c),
            _ => None,
        }
    }
}

fn is_printable(c: char) -> bool {
    if c == ' ' {
        return true;
    }
    !(c.is_control() || c.is_whitespace() || is_format_or_private(c))
}

// Unicode Cf (format) and Co (private use) ranges.
fn is_format_or_private(c: char) -> bool {
    matches!(
        c,
        '\u{00AD}'
            | '\u{0600}'..='\u{0605}'
            | '\u{061C}'
            | '\u{06DD}'
            | '\u{070F}'
            | '\u{0890}'..='\u{0891}'
            | '\u{08E2}'
            | '\u{180E}'
            | '\u{200B}'..='\u{200F}'
            | '\u{202A}'..='\u{202E}'
            | '\u{2060}'..='\u{2064}'
            | '\u{2066}'..='\u{206F}'
            | '\u{E000}'..='\u{F8FF}'
            | '\u{FEFF}'
            | '\u{FFF9}'..='\u{FFFB}'
            | '\u{110BD}'
            | '\u{110CD}'
            | '\u{13430}'..='\u{1343F}'
            | '\u{1BCA0}'..='\u{1BCA3}'
            | '\u{1D173}'..='\u{1D17A}'
            | '\u{E0001}'
            | '\u{E0020}'..='\u{E007F}'
            | '\u{F0000}'..='\u{FFFFD}'
            | '\u{100000}'..='\u{10FFFD}'
    )
}

impl From<&str> for KeyEvent {
    fn from(raw: &str) -> Self {
        KeyEvent::parse(raw)
    }
}

impl fmt::Display for KeyEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            KeyEvent::Char(c) => write!(f, "{}", c),
            KeyEvent::Named(name) => write!(f, "{}", name),
        }
    }
}

/// A hand-scoped finger label such as `left_index` or `right_pinky`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FingerId(String);

/// Length of the label prefix that names the hand.
const HAND_PREFIX_LEN: usize = 5;

impl FingerId {
    pub fn new(label: impl Into<String>) -> Self {
        Self(label.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The hand this finger belongs to: the first five characters of the label.
    pub fn hand(&self) -> &str {
        match self.0.char_indices().nth(HAND_PREFIX_LEN) {
            Some((idx, _)) => &self.0[..idx],
            None => &self.0,
        }
    }
}

impl fmt::Display for FingerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Canonical key set of a chord: distinct characters in ascending order.
///
/// Two tokens over the same letter set share a signature, which is where
/// assignment collisions come from.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ChordSignature(String);

impl ChordSignature {
    pub fn of(token: &str) -> Self {
        token.chars().collect()
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Number of keys in the chord.
    pub fn len(&self) -> usize {
        self.0.chars().count()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = char> + '_ {
        self.0.chars()
    }

    /// The signature with one key removed.
    pub fn without(&self, key: char) -> Self {
        self.keys().filter(|&c| c != key).collect()
    }
}

impl FromIterator<char> for ChordSignature {
    fn from_iter<I: IntoIterator<Item = char>>(iter: I) -> Self {
        let keys: BTreeSet<char> = iter.into_iter().collect();
        Self(keys.into_iter().collect())
    }
}

impl fmt::Display for ChordSignature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// How a word obtained its chord.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ChordKind {
    /// The word's full distinct-letter set.
    Natural,
    /// The natural set minus one letter, used after a collision.
    Subset,
}

/// One word that received a chord.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Assignment {
    pub word: Word,
    pub chord: ChordSignature,
    pub count: u64,
    pub kind: ChordKind,
}

/// Why a ranked word was left out of the chord map.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RejectReason {
    /// A letter is missing from the finger table or two letters share a finger.
    NotChordable,
    /// Fewer than two distinct keys.
    TooShort,
    /// The natural chord and every one-letter subset are already taken.
    CollisionExhausted,
}

impl fmt::Display for RejectReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RejectReason::NotChordable => write!(f, "not chordable"),
            RejectReason::TooShort => write!(f, "too short"),
            RejectReason::CollisionExhausted => write!(f, "collision, no subset"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rejection {
    pub word: Word,
    pub count: u64,
    pub reason: RejectReason,
}

/// Ranking record for one candidate n-gram.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NgramScore {
    pub ngram: String,
    /// Occurrences across the corpus.
    pub frequency: u64,
    /// Frequency-weighted count of words this n-gram rebuilds with another candidate.
    pub pair_score: u64,
    /// `pair_score` times the cross-hand multiplier.
    pub total_score: f64,
}
