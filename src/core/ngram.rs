// File: src/core/ngram.rs
use crate::core::fingers::FingerMap;
use crate::core::frequency::FrequencyTable;
use crate::core::types::NgramScore;
use std::collections::HashSet;

/// Score multiplier for n-grams whose keys span both hands.
pub const CROSS_HAND_BONUS: f64 = 1.2;

/// Frequency-weighted number of words this n-gram rebuilds together with one
/// other candidate: the word starts with the n-gram and the rest is a
/// candidate, or ends with it and the front is a candidate. A word matching
/// both ways counts twice.
pub fn pair_score(ngram: &str, words: &FrequencyTable, candidates: &HashSet<&str>) -> u64 {
    let mut score = 0;
    for (word, freq) in words.iter() {
        if word.len() <= ngram.len() {
            continue;
        }
        if let Some(suffix) = word.strip_prefix(ngram) {
            if candidates.contains(suffix) {
                score += freq;
            }
        }
        if let Some(prefix) = word.strip_suffix(ngram) {
            if candidates.contains(prefix) {
                score += freq;
            }
        }
    }
    score
}

pub fn cross_hand_multiplier(ngram: &str, fingers: &FingerMap) -> f64 {
    if fingers.is_cross_hand(ngram) {
        CROSS_HAND_BONUS
    } else {
        1.0
    }
}

/// Every n-gram in the table, as a pairing candidate set.
pub fn candidate_set(ngrams: &FrequencyTable) -> HashSet<&str> {
    ngrams.iter().map(|(ngram, _)| ngram).collect()
}

/// Ranks every n-gram in `ngrams` by its value as a compound-chord building
/// block, pairing only against `candidates`.
///
/// The result is sorted by descending total score; equal scores keep the
/// table's first-seen order.
pub fn score_ngrams(
    ngrams: &FrequencyTable,
    words: &FrequencyTable,
    candidates: &HashSet<&str>,
    fingers: &FingerMap,
) -> Vec<NgramScore> {
    let mut scores: Vec<NgramScore> = ngrams
        .iter()
        .map(|(ngram, frequency)| {
            let pair_score = pair_score(ngram, words, candidates);
            NgramScore {
                ngram: ngram.to_string(),
                frequency,
                pair_score,
                total_score: pair_score as f64 * cross_hand_multiplier(ngram, fingers),
            }
        })
        .collect();

    scores.sort_by(|a, b| b.total_score.total_cmp(&a.total_score));
    scores
}

/// The `top_n` best n-gram strings, in score order.
pub fn top_ngrams(scores: &[NgramScore], top_n: usize) -> Vec<String> {
    scores.iter().take(top_n).map(|s| s.ngram.clone()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::frequency::{count_ngrams, count_words};

    #[test]
    fn test_pair_score_counts_prefix_and_suffix_matches() {
        let words = count_words(["then", "then", "other"]);
        let candidates: HashSet<&str> = ["th", "en", "ot", "her"].into_iter().collect();
        // "then" = th + en (twice), "other" = ot + her
        assert_eq!(pair_score("th", &words, &candidates), 2);
        assert_eq!(pair_score("en", &words, &candidates), 2);
        assert_eq!(pair_score("her", &words, &candidates), 1);
    }

    #[test]
    fn test_pair_score_ignores_words_not_longer_than_ngram() {
        let words = count_words(["th"]);
        let candidates: HashSet<&str> = ["th"].into_iter().collect();
        assert_eq!(pair_score("th", &words, &candidates), 0);
    }

    #[test]
    fn test_cross_hand_multiplier() {
        let fingers = FingerMap::default();
        assert_eq!(cross_hand_multiplier("th", &fingers), CROSS_HAND_BONUS);
        assert_eq!(cross_hand_multiplier("st", &fingers), 1.0);
    }

    #[test]
    fn test_scores_sorted_descending() {
        let fingers = FingerMap::default();
        let corpus = ["then", "then", "then", "hen"];
        let words = count_words(corpus);
        let ngrams = count_ngrams(corpus, &fingers);
        let scores = score_ngrams(&ngrams, &words, &candidate_set(&ngrams), &fingers);
        assert_eq!(scores.len(), ngrams.len());
        for pair in scores.windows(2) {
            assert!(pair[0].total_score >= pair[1].total_score);
        }
    }

    #[test]
    fn test_equal_scores_keep_first_seen_order() {
        let fingers = FingerMap::default();
        let corpus = ["then", "hen", "ten"];
        let words = count_words(corpus);
        let ngrams = count_ngrams(corpus, &fingers);
        let seen: Vec<&str> = ngrams.iter().map(|(n, _)| n).collect();
        assert_eq!(seen, vec!["th", "he", "en", "the", "te", "ten"]);

        let scores = score_ngrams(&ngrams, &words, &candidate_set(&ngrams), &fingers);
        let order: Vec<&str> = scores.iter().map(|s| s.ngram.as_str()).collect();
        assert_eq!(order, vec!["th", "en", "he", "the", "te", "ten"]);
        assert_eq!(scores[0].total_score, CROSS_HAND_BONUS);
        assert_eq!(scores[1].total_score, 1.0);
        assert!(scores[2..].iter().all(|s| s.total_score == 0.0));
    }

    #[test]
    fn test_candidate_set_limits_pairing() {
        let fingers = FingerMap::default();
        let corpus = ["then", "then"];
        let words = count_words(corpus);
        let ngrams = count_ngrams(corpus, &fingers);

        let all = score_ngrams(&ngrams, &words, &candidate_set(&ngrams), &fingers);
        let narrow: HashSet<&str> = ["th"].into_iter().collect();
        let limited = score_ngrams(&ngrams, &words, &narrow, &fingers);

        let pair = |scores: &[NgramScore], ngram: &str| {
            scores.iter().find(|s| s.ngram == ngram).map(|s| s.pair_score)
        };
        // "then" = th + en: with "en" excluded, "th" pairs with nothing.
        assert_eq!(pair(&all, "th"), Some(2));
        assert_eq!(pair(&limited, "th"), Some(0));
        assert_eq!(pair(&all, "en"), Some(2));
        assert_eq!(pair(&limited, "en"), Some(2));
    }
}
