// Integration tests: key events through tokenizer, frequency model and assignment

use chord_core::core::assignment::MIN_CHORD_KEYS;
use chord_core::core::tokenizer::{tokenize, TokenizerRules};
use chord_core::core::types::{FingerId, KeyEvent};
use chord_core::{assign, ChordEngine, FingerMap};
use std::collections::HashSet;

/// Spells each word key by key with `<space>` between them.
fn typed(text: &str) -> Vec<KeyEvent> {
    let mut events = Vec::new();
    for (i, word) in text.split(' ').enumerate() {
        if i > 0 {
            events.push(KeyEvent::parse("<space>"));
        }
        events.extend(word.chars().map(KeyEvent::Char));
    }
    events
}

fn sample_log() -> Vec<KeyEvent> {
    typed(
        "the cat sat on the mat and the dog ate the hat then the net and the ten \
         tea ate eat tae the cat and a hen in the den then the end",
    )
}

// ============ Tokenizer laws ============

#[test]
fn test_tokenizer_boundary_law() {
    let rules = TokenizerRules::default();
    assert_eq!(tokenize(typed("cat dog"), &rules), vec!["cat", "dog"]);
}

#[test]
fn test_tokenizer_backspace_law() {
    let rules = TokenizerRules::default();
    let events = ["c", "a", "<backspace>", "t"].map(KeyEvent::parse);
    assert_eq!(tokenize(events, &rules), vec!["ct"]);
}

#[test]
fn test_tokenizer_trailing_word_law() {
    let rules = TokenizerRules::default();
    assert_eq!(tokenize(typed("hi"), &rules), vec!["hi"]);
}

#[test]
fn test_tokenizer_custom_boundaries() {
    let rules = TokenizerRules::new(["-"], "<del>");
    let events = ["a", "b", "-", "c", "<del>", "d", "<space>", "e"].map(KeyEvent::parse);
    // <space> is not a boundary here and is not printable either, so it is skipped.
    assert_eq!(tokenize(events, &rules), vec!["ab", "de"]);
}

// ============ Assignment invariants ============

#[test]
fn test_pipeline_is_deterministic() {
    let engine = ChordEngine::default();
    let (_, first) = engine.analyze(sample_log());
    let (_, second) = engine.analyze(sample_log());

    let first_json = serde_json::to_string_pretty(&first.chord_map.to_document()).unwrap();
    let second_json = serde_json::to_string_pretty(&second.chord_map.to_document()).unwrap();
    assert_eq!(first_json, second_json);
    assert_eq!(first.chord_map, second.chord_map);
}

#[test]
fn test_signatures_are_unique() {
    let engine = ChordEngine::default();
    let (_, analysis) = engine.analyze(sample_log());

    let mut seen = HashSet::new();
    for a in &analysis.chord_map.assignments {
        assert!(seen.insert(a.chord.clone()), "chord {} assigned twice", a.chord);
    }
}

#[test]
fn test_every_chord_has_two_keys() {
    let engine = ChordEngine::default();
    let (_, analysis) = engine.analyze(sample_log());
    assert!(!analysis.chord_map.is_empty());
    for a in &analysis.chord_map.assignments {
        assert!(a.chord.len() >= MIN_CHORD_KEYS, "{} got {}", a.word, a.chord);
    }
}

#[test]
fn test_assigned_words_use_distinct_fingers() {
    let engine = ChordEngine::default();
    let (_, analysis) = engine.analyze(sample_log());
    for a in &analysis.chord_map.assignments {
        let fingers: HashSet<&FingerId> = a
            .word
            .chars()
            .collect::<HashSet<char>>()
            .into_iter()
            .map(|c| engine.fingers.finger_of(c).expect("assigned word has unmapped key"))
            .collect();
        assert_eq!(fingers.len(), a.word.chars().collect::<HashSet<char>>().len());
    }
}

#[test]
fn test_anagram_collision_keeps_first_assignment() {
    let fingers = FingerMap::default();
    // "eat", "ate", "tea", "tae" share {a,e,t}
    let ranked = vec![
        ("ate".to_string(), 9),
        ("eat".to_string(), 5),
        ("tea".to_string(), 4),
        ("tae".to_string(), 3),
    ];
    let map = assign(&ranked, &fingers, 10);

    assert_eq!(map.chord_for("ate").map(|c| c.as_str()), Some("aet"));
    // Subsets tried by removing 'a', then 'e', then 't'.
    assert_eq!(map.chord_for("eat").map(|c| c.as_str()), Some("et"));
    assert_eq!(map.chord_for("tea").map(|c| c.as_str()), Some("at"));
    // {a,e}: a is left_pinky, e is right_middle, so still chordable.
    assert_eq!(map.chord_for("tae").map(|c| c.as_str()), Some("ae"));
}

#[test]
fn test_cat_and_bat_do_not_collide() {
    let fingers = FingerMap::from_groups(vec![
        (FingerId::new("left_pinky"), vec!['c']),
        (FingerId::new("left_ring"), vec!['a']),
        (FingerId::new("left_index"), vec!['t']),
        (FingerId::new("right_index"), vec!['b']),
    ])
    .unwrap();
    let ranked = vec![("cat".to_string(), 3), ("bat".to_string(), 2)];
    let map = assign(&ranked, &fingers, 10);
    assert_eq!(map.chord_for("cat").map(|c| c.as_str()), Some("act"));
    assert_eq!(map.chord_for("bat").map(|c| c.as_str()), Some("abt"));
}

#[test]
fn test_snapshot_rebuild_matches_direct_analysis() {
    let engine = ChordEngine::default().with_limits(5, 10);
    let (snapshot, direct) = engine.analyze(sample_log());
    let rebuilt = engine.build(&snapshot);
    assert_eq!(direct.chord_map, rebuilt.chord_map);
    assert!(rebuilt.chord_map.len() <= 5);
    assert!(rebuilt.chord_map.ngrams.len() <= 10);
}

#[test]
fn test_ngram_scores_sorted() {
    let engine = ChordEngine::default();
    let (_, analysis) = engine.analyze(sample_log());
    for pair in analysis.ngram_scores.windows(2) {
        assert!(pair[0].total_score >= pair[1].total_score);
    }
    let exported: Vec<&str> = analysis.chord_map.ngrams.iter().map(String::as_str).collect();
    let best: Vec<&str> = analysis
        .ngram_scores
        .iter()
        .take(exported.len())
        .map(|s| s.ngram.as_str())
        .collect();
    assert_eq!(exported, best);
}
