// File: src/core/fingers.rs
use crate::core::types::{ChordSignature, FingerId};
use crate::error::{ChordError, Result};
use std::collections::{BTreeMap, HashSet};

/// Colemak-DH on a split keyboard, with the Swedish vowels on the right pinky.
const DEFAULT_LAYOUT: &[(&str, &[char])] = &[
    ("left_pinky", &['q', 'a', 'z']),
    ("left_ring", &['w', 'r', 'x']),
    ("left_middle", &['f', 's', 'c']),
    ("left_index", &['p', 't', 'd', 'b', 'g', 'v']),
    ("right_index", &['j', 'm', 'k', 'l', 'n', 'h']),
    ("right_middle", &['u', 'e']),
    ("right_ring", &['y', 'i']),
    ("right_pinky", &['ö', 'o', 'å', 'ä']),
];

/// Which finger presses each key. A key belongs to at most one finger.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FingerMap {
    keys: BTreeMap<char, FingerId>,
}

impl FingerMap {
    /// Builds the table from `finger -> keys` groups, rejecting a key claimed
    /// by two fingers.
    pub fn from_groups<I, K>(groups: I) -> Result<Self>
    where
        I: IntoIterator<Item = (FingerId, K)>,
        K: IntoIterator<Item = char>,
    {
        let mut keys = BTreeMap::new();
        for (finger, group) in groups {
            if finger.as_str().is_empty() {
                return Err(ChordError::InvalidFingerMap("empty finger label".to_string()));
            }
            for key in group {
                let key = key.to_lowercase().next().unwrap_or(key);
                if let Some(previous) = keys.insert(key, finger.clone()) {
                    if previous != finger {
                        return Err(ChordError::InvalidFingerMap(format!(
                            "key '{}' assigned to both {} and {}",
                            key, previous, finger
                        )));
                    }
                }
            }
        }
        Ok(Self { keys })
    }

    /// Parses the JSON layout form: `{"left_index": ["t", "d"], ...}`.
    pub fn from_layout(layout: &BTreeMap<String, Vec<String>>) -> Result<Self> {
        let mut groups = Vec::with_capacity(layout.len());
        for (finger, keys) in layout {
            let mut chars = Vec::with_capacity(keys.len());
            for key in keys {
                let mut it = key.chars();
                match (it.next(), it.next()) {
                    (Some(c), None) => chars.push(c),
                    _ => {
                        return Err(ChordError::InvalidFingerMap(format!(
                            "'{}' on {} is not a single key",
                            key, finger
                        )))
                    }
                }
            }
            groups.push((FingerId::new(finger.as_str()), chars));
        }
        Self::from_groups(groups)
    }

    pub fn finger_of(&self, key: char) -> Option<&FingerId> {
        self.keys.get(&key)
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    /// A token is chordable when every letter has a finger and no two
    /// distinct letters share one. Repeating a letter does not disqualify.
    pub fn is_chordable(&self, token: &str) -> bool {
        let mut seen_keys = HashSet::new();
        let mut used_fingers = HashSet::new();
        for key in token.chars() {
            if !seen_keys.insert(key) {
                continue;
            }
            match self.keys.get(&key) {
                Some(finger) if used_fingers.insert(finger) => {}
                _ => return false,
            }
        }
        true
    }

    /// True when the token's keys span more than one hand.
    pub fn is_cross_hand(&self, token: &str) -> bool {
        let hands: HashSet<&str> = token
            .chars()
            .filter_map(|c| self.keys.get(&c))
            .map(FingerId::hand)
            .collect();
        hands.len() > 1
    }
}

impl Default for FingerMap {
    fn default() -> Self {
        let keys = DEFAULT_LAYOUT
            .iter()
            .flat_map(|(finger, keys)| keys.iter().map(move |&k| (k, FingerId::new(*finger))))
            .collect();
        Self { keys }
    }
}

/// Canonical chord signature of a token. Only meaningful once the token has
/// passed [`FingerMap::is_chordable`].
pub fn signature_of(token: &str) -> ChordSignature {
    ChordSignature::of(token)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_layout_covers_letters() {
        let fingers = FingerMap::default();
        assert_eq!(fingers.finger_of('t').map(FingerId::as_str), Some("left_index"));
        assert_eq!(fingers.finger_of('ö').map(FingerId::as_str), Some("right_pinky"));
        assert!(fingers.finger_of('1').is_none());
    }

    #[test]
    fn test_distinct_fingers_are_chordable() {
        let fingers = FingerMap::default();
        // t=left_index, h=right_index, e=right_middle
        assert!(fingers.is_chordable("the"));
        // t and d both on left_index
        assert!(!fingers.is_chordable("td"));
    }

    #[test]
    fn test_repeated_letter_is_not_a_conflict() {
        let fingers = FingerMap::default();
        assert!(fingers.is_chordable("tee"));
    }

    #[test]
    fn test_unknown_character_disqualifies() {
        let fingers = FingerMap::default();
        assert!(!fingers.is_chordable("a1"));
    }

    #[test]
    fn test_duplicate_key_is_rejected() {
        let groups = vec![
            (FingerId::new("left_index"), vec!['a']),
            (FingerId::new("right_index"), vec!['a']),
        ];
        assert!(FingerMap::from_groups(groups).is_err());
    }

    #[test]
    fn test_empty_finger_label_is_rejected() {
        assert!(FingerMap::from_groups(vec![(FingerId::new(""), vec!['a'])]).is_err());
    }

    #[test]
    fn test_cross_hand() {
        let fingers = FingerMap::default();
        assert!(fingers.is_cross_hand("th"));
        assert!(!fingers.is_cross_hand("ta"));
        assert!(!fingers.is_cross_hand("eu"));
    }
}
