//! Best-effort "similar journals" lookup.
//!
//! A word-overlap scoring heuristic for the UI's "did you mean" convenience.
//! This is deliberately separate from the merge: identity resolution is exact
//! normalized-key matching only, and nothing in the merge path calls into
//! this module.

use crate::model::UnifiedJournal;
use crate::normalize::normalize_key;

/// A candidate journal with its overlap score
#[derive(Debug, Clone, PartialEq)]
pub struct SimilarMatch<'a> {
    pub journal: &'a UnifiedJournal,
    pub score: u32,
}

/// Score a single candidate against the search words.
///
/// Exact word hit 10, candidate word containing a search word 5, search word
/// containing a candidate word 3; prefix match bonus 20; exact key match
/// bonus 50.
fn score_candidate(candidate_key: &str, search_key: &str, search_words: &[&str]) -> u32 {
    let candidate_words: Vec<&str> = candidate_key.split(' ').collect();
    let mut score = 0u32;

    for search_word in search_words {
        for candidate_word in &candidate_words {
            if candidate_word == search_word {
                score += 10;
            } else if candidate_word.contains(search_word) {
                score += 5;
            } else if search_word.contains(candidate_word) {
                score += 3;
            }
        }
    }

    if candidate_key.starts_with(search_key) {
        score += 20;
    }
    if candidate_key == search_key {
        score += 50;
    }

    score
}

/// Find up to `limit` journals whose names overlap the search term.
///
/// Words of three characters or fewer are ignored; a search of only short
/// words yields nothing. Results are ordered by score descending, ties by
/// display name ascending.
pub fn find_similar<'a>(
    records: &'a [UnifiedJournal],
    search_term: &str,
    limit: usize,
) -> Vec<SimilarMatch<'a>> {
    let search_key = normalize_key(search_term);
    let search_words: Vec<&str> = search_key.split(' ').filter(|w| w.len() > 2).collect();
    if search_words.is_empty() {
        return Vec::new();
    }

    let mut scored: Vec<SimilarMatch<'a>> = records
        .iter()
        .map(|journal| SimilarMatch {
            score: score_candidate(&journal.key, &search_key, &search_words),
            journal,
        })
        .filter(|m| m.score > 0)
        .collect();

    scored.sort_by(|a, b| {
        b.score
            .cmp(&a.score)
            .then_with(|| a.journal.display_name.cmp(&b.journal.display_name))
    });
    scored.truncate(limit);
    scored
}
