//! Fiction scoring pipeline.
//!
//! Replaces the keyword/known-work/metadata/category rules entirely when a
//! query asks for fiction. Order matters: hard exclusion of definitively
//! non-fiction titles first, then the commentary penalty, then the
//! positive-evidence requirement, then the genre and landmark bonuses.

use crate::models::{Book, SearchQuery, EXCLUDED_SCORE, FICTION_FLOOR_SCORE};
use crate::scoring::tables::{
    COMMENTARY_TERMS, FICTION_EVIDENCE_TERMS, FICTION_GENRES, FICTION_LANDMARKS,
    NONFICTION_EXCLUDE_TERMS,
};
use crate::scoring::{contains_any, irrelevance_penalty};

/// Large bonus for a curated landmark work or author
pub const LANDMARK_BONUS: i32 = 40;
/// Fraction of the landmark bonus left for commentary on a landmark
pub const LANDMARK_COMMENTARY_BONUS: i32 = 10;
/// Bonus for matching a sub-genre the query asked for
pub const GENRE_BONUS: i32 = 15;
/// Penalty for works that look like commentary rather than the work itself
pub const COMMENTARY_PENALTY: i32 = 15;

/// Score a candidate for a fiction query
pub fn score_fiction(book: &Book, query: &SearchQuery) -> i32 {
    let title = book.title.to_lowercase();

    // Definitively technical titles are out no matter what matched
    if contains_any(&title, NONFICTION_EXCLUDE_TERMS) {
        return EXCLUDED_SCORE;
    }

    let commentary = contains_any(&title, COMMENTARY_TERMS);
    let landmark = landmark_match(book);

    // A record has to show some positive evidence of being fiction: genre
    // or fiction vocabulary in the title/categories, or a curated landmark
    // match. Absence is a softer exclusion than the hard sentinel.
    if !has_fiction_evidence(book) && !landmark {
        return FICTION_FLOOR_SCORE;
    }

    let mut score: i32 = 0;

    if commentary {
        score -= COMMENTARY_PENALTY;
    }

    if requested_genre_matches(book, query) {
        score += GENRE_BONUS;
    }

    if landmark {
        score += if commentary {
            LANDMARK_COMMENTARY_BONUS
        } else {
            LANDMARK_BONUS
        };
    }

    score + irrelevance_penalty(book)
}

/// Whether the record shows positive evidence of fiction-ness in its title
/// or category metadata
fn has_fiction_evidence(book: &Book) -> bool {
    let title = book.title.to_lowercase();
    if contains_any(&title, FICTION_EVIDENCE_TERMS) {
        return true;
    }
    if FICTION_GENRES
        .iter()
        .any(|g| contains_any(&title, g.vocabulary))
    {
        return true;
    }
    book.categories.iter().any(|c| {
        let c = c.to_lowercase();
        contains_any(&c, FICTION_EVIDENCE_TERMS)
            || FICTION_GENRES.iter().any(|g| contains_any(&c, g.vocabulary))
    })
}

/// Whether the book matches a sub-genre the query's keywords asked for
fn requested_genre_matches(book: &Book, query: &SearchQuery) -> bool {
    let wanted: Vec<_> = FICTION_GENRES
        .iter()
        .filter(|g| {
            let raw = query.raw.to_lowercase();
            contains_any(&raw, g.vocabulary)
                || query
                    .keywords
                    .iter()
                    .any(|k| contains_any(&k.to_lowercase(), g.vocabulary))
        })
        .collect();
    if wanted.is_empty() {
        return false;
    }
    let title = book.title.to_lowercase();
    let categories: Vec<String> = book.categories.iter().map(|c| c.to_lowercase()).collect();
    wanted.iter().any(|g| {
        contains_any(&title, g.vocabulary)
            || categories.iter().any(|c| contains_any(c, g.vocabulary))
    })
}

/// Whether the book matches a curated landmark title or author
fn landmark_match(book: &Book) -> bool {
    let title = book.title.to_lowercase();
    FICTION_LANDMARKS.iter().any(|work| {
        title.contains(&work.title.to_lowercase())
            || book
                .authors
                .iter()
                .any(|a| a.to_lowercase().contains(&work.author.to_lowercase()))
    })
}
