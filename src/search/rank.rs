//! Final ranking and selection.
//!
//! Candidates sort by score descending with original order preserved on
//! ties. Selection is two-tiered: everything at or above the threshold
//! first, then if the list is still short, backfill from the non-negative
//! candidates below it. Excluded candidates never appear, even when the
//! list comes up short.

use std::cmp::Reverse;

use crate::config::RankingConfig;
use crate::models::{Book, ScoredCandidate};

/// Select up to `max_results` books from scored candidates
pub fn rank(
    mut candidates: Vec<ScoredCandidate>,
    is_fiction: bool,
    max_results: usize,
    config: &RankingConfig,
) -> Vec<Book> {
    candidates.retain(|c| !c.is_excluded());
    candidates.sort_by_key(|c| Reverse(c.score));

    let threshold = if is_fiction {
        config.fiction_threshold
    } else {
        config.nonfiction_threshold
    };

    let mut selected: Vec<Book> = Vec::with_capacity(max_results.min(candidates.len()));
    let mut backfill: Vec<Book> = Vec::new();

    for candidate in candidates {
        if candidate.score >= threshold {
            if selected.len() < max_results {
                selected.push(candidate.book);
            }
        } else if candidate.score >= 0 {
            backfill.push(candidate.book);
        }
    }

    for book in backfill {
        if selected.len() >= max_results {
            break;
        }
        selected.push(book);
    }

    selected
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Book, SourceType, EXCLUDED_SCORE, FICTION_FLOOR_SCORE};

    fn candidate(id: &str, score: i32) -> ScoredCandidate {
        ScoredCandidate {
            book: Book::new(id, format!("Title {}", id), SourceType::GoogleBooks),
            score,
        }
    }

    fn config() -> RankingConfig {
        RankingConfig::default()
    }

    #[test]
    fn test_sorted_and_bounded() {
        let candidates = vec![candidate("a", 30), candidate("b", 50), candidate("c", 40)];
        let ranked = rank(candidates, false, 2, &config());
        let ids: Vec<_> = ranked.iter().map(|b| b.id.as_str()).collect();
        assert_eq!(ids, vec!["google_books:b", "google_books:c"]);
    }

    #[test]
    fn test_backfill_from_below_threshold() {
        // Only one candidate clears the nonfiction threshold of 20
        let candidates = vec![candidate("a", 25), candidate("b", 12), candidate("c", 3)];
        let ranked = rank(candidates, false, 3, &config());
        let ids: Vec<_> = ranked.iter().map(|b| b.id.as_str()).collect();
        assert_eq!(ids, vec!["google_books:a", "google_books:b", "google_books:c"]);
    }

    #[test]
    fn test_negative_scores_never_backfill() {
        let candidates = vec![candidate("a", 25), candidate("b", -2)];
        let ranked = rank(candidates, false, 5, &config());
        assert_eq!(ranked.len(), 1);
    }

    #[test]
    fn test_excluded_never_selected() {
        let candidates = vec![
            candidate("a", EXCLUDED_SCORE),
            candidate("b", FICTION_FLOOR_SCORE),
        ];
        assert!(rank(candidates, true, 10, &config()).is_empty());
    }

    #[test]
    fn test_fiction_uses_lower_threshold() {
        let candidates = vec![candidate("a", 15)];
        assert_eq!(rank(candidates.clone(), false, 5, &config()).len(), 1); // via backfill
        // At 15 the fiction path admits it first-tier; either way it appears
        assert_eq!(rank(candidates, true, 5, &config()).len(), 1);
    }

    #[test]
    fn test_tie_preserves_arrival_order() {
        let candidates = vec![candidate("x", 30), candidate("y", 30), candidate("z", 30)];
        let ranked = rank(candidates, false, 3, &config());
        let ids: Vec<_> = ranked.iter().map(|b| b.id.as_str()).collect();
        assert_eq!(ids, vec!["google_books:x", "google_books:y", "google_books:z"]);
    }
}
