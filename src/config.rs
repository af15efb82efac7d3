// File: src/config.rs
use crate::core::fingers::FingerMap;
use crate::core::tokenizer::{TokenizerRules, DEFAULT_BOUNDARIES, DEFAULT_DELETE_KEY};
use crate::error::{ChordError, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

pub const DEFAULT_MIN_FREQUENCY: u64 = 2;
pub const DEFAULT_TOP_WORDS: usize = 200;
pub const DEFAULT_TOP_NGRAMS: usize = 100;

/// Tunables for analysis and evaluation. Every field has a default, so a
/// config file only needs the values it changes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    /// Words below this corpus frequency are not evaluated.
    pub min_frequency: u64,
    /// Number of words that receive a chord.
    pub top_words: usize,
    /// Number of n-grams exported with the chord map.
    pub top_ngrams: usize,
    pub boundaries: Vec<String>,
    pub delete_key: String,
    /// `finger -> keys`; the built-in layout is used when absent.
    pub fingers: Option<BTreeMap<String, Vec<String>>>,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            min_frequency: DEFAULT_MIN_FREQUENCY,
            top_words: DEFAULT_TOP_WORDS,
            top_ngrams: DEFAULT_TOP_NGRAMS,
            boundaries: DEFAULT_BOUNDARIES.iter().map(|b| b.to_string()).collect(),
            delete_key: DEFAULT_DELETE_KEY.to_string(),
            fingers: None,
        }
    }
}

impl AnalysisConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path).map_err(|e| ChordError::io(path, e))?;
        serde_json::from_str(&text).map_err(|e| ChordError::json(path, e))
    }

    /// Replaces the finger table with one read from a standalone JSON file.
    pub fn load_fingers(&mut self, path: &Path) -> Result<()> {
        let text = fs::read_to_string(path).map_err(|e| ChordError::io(path, e))?;
        let layout = serde_json::from_str(&text).map_err(|e| ChordError::json(path, e))?;
        self.fingers = Some(layout);
        Ok(())
    }

    pub fn finger_map(&self) -> Result<FingerMap> {
        match &self.fingers {
            Some(layout) => FingerMap::from_layout(layout),
            None => Ok(FingerMap::default()),
        }
    }

    pub fn tokenizer_rules(&self) -> TokenizerRules {
        TokenizerRules::new(&self.boundaries, &self.delete_key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_config_keeps_defaults() {
        let config: AnalysisConfig = serde_json::from_str(r#"{"top_words": 50}"#).unwrap();
        assert_eq!(config.top_words, 50);
        assert_eq!(config.top_ngrams, DEFAULT_TOP_NGRAMS);
        assert_eq!(config.min_frequency, DEFAULT_MIN_FREQUENCY);
        assert!(config.finger_map().unwrap().finger_of('t').is_some());
    }

    #[test]
    fn test_custom_fingers() {
        let config: AnalysisConfig = serde_json::from_str(
            r#"{"fingers": {"left_index": ["a"], "right_index": ["b"]}}"#,
        )
        .unwrap();
        let fingers = config.finger_map().unwrap();
        assert_eq!(fingers.len(), 2);
        assert!(fingers.is_chordable("ab"));
        assert!(!fingers.is_chordable("abc"));
    }

    #[test]
    fn test_multi_char_key_is_rejected() {
        let config: AnalysisConfig =
            serde_json::from_str(r#"{"fingers": {"left_index": ["ab"]}}"#).unwrap();
        assert!(config.finger_map().is_err());
    }
}
