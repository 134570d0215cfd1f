//! Cross-provider deduplication.
//!
//! Providers routinely return the same work with slightly different titles
//! ("Machine Learning (2nd Edition)" vs "Machine Learning: An Introduction").
//! The primary key is a fixed-length prefix of the normalized title plus the
//! normalized author list; a secondary containment check catches
//! subtitle-only differences the key misses. Collisions keep the record with
//! the higher completeness score and merge the loser's fields into it.

use std::collections::HashMap;

use strsim::jaro_winkler;

use crate::models::Book;
use crate::utils::text::normalize_title;

const KEY_PREFIX_LEN: usize = 12;
const CONTAINMENT_MIN_LEN: usize = 6;
const SIMILARITY_THRESHOLD: f64 = 0.95;

/// Collapse near-duplicate records, preserving first-seen order of the
/// surviving records
pub fn dedup_books(books: Vec<Book>) -> Vec<Book> {
    let mut survivors: Vec<(String, Book)> = Vec::new();
    let mut key_index: HashMap<String, usize> = HashMap::new();

    let total = books.len();
    for book in books {
        let normalized = normalize_title(&book.title);
        let key = dedup_key(&normalized, &book);

        if let Some(&index) = key_index.get(&key) {
            merge_into(&mut survivors[index], normalized, book);
            continue;
        }

        if let Some(index) = survivors.iter().position(|(existing_title, existing)| {
            titles_match(existing_title, &normalized) && authors_compatible(existing, &book)
        }) {
            merge_into(&mut survivors[index], normalized, book);
            continue;
        }

        key_index.insert(key, survivors.len());
        survivors.push((normalized, book));
    }

    if survivors.len() < total {
        tracing::debug!(before = total, after = survivors.len(), "deduplicated candidates");
    }
    survivors.into_iter().map(|(_, book)| book).collect()
}

/// Primary dedup key: normalized-title prefix plus sorted normalized authors
fn dedup_key(normalized_title: &str, book: &Book) -> String {
    let prefix: String = normalized_title.chars().take(KEY_PREFIX_LEN).collect();
    let mut authors: Vec<String> = book
        .authors
        .iter()
        .map(|a| a.to_lowercase().split_whitespace().collect::<Vec<_>>().join(" "))
        .filter(|a| !a.is_empty())
        .collect();
    authors.sort();
    format!("{}|{}", prefix, authors.join(";"))
}

/// Secondary duplicate check: full containment of one normalized title in
/// the other, only when both are long enough to make containment meaningful,
/// with a similarity fallback for near-identical strings
fn titles_match(a: &str, b: &str) -> bool {
    if a == b {
        return true;
    }
    let len_a = a.chars().count();
    let len_b = b.chars().count();
    if len_a < CONTAINMENT_MIN_LEN || len_b < CONTAINMENT_MIN_LEN {
        return false;
    }
    if a.contains(b) || b.contains(a) {
        return true;
    }
    jaro_winkler(a, b) >= SIMILARITY_THRESHOLD
}

/// Similar titles by different authors are different books ("Machine
/// Learning" exists many times over). Records with no author information
/// stay mergeable.
fn authors_compatible(a: &Book, b: &Book) -> bool {
    if a.authors.is_empty() || b.authors.is_empty() {
        return true;
    }
    a.authors.iter().any(|x| {
        let x = x.to_lowercase();
        b.authors
            .iter()
            .any(|y| {
                let y = y.to_lowercase();
                x.contains(&y) || y.contains(&x)
            })
    })
}

/// Keep the more complete of the pair and fold the other's fields in
fn merge_into(slot: &mut (String, Book), incoming_normalized: String, incoming: Book) {
    let (existing_normalized, existing) = slot;
    if incoming.completeness() > existing.completeness() {
        let merged = incoming.merged_with(existing);
        *slot = (incoming_normalized, merged);
    } else {
        let merged = existing.merged_with(&incoming);
        *slot = (existing_normalized.clone(), merged);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{BookBuilder, SourceType};

    #[test]
    fn test_identical_normalized_titles_collapse() {
        let sparse = BookBuilder::new("1", "Machine Learning", SourceType::OpenLibrary)
            .author("Tom Mitchell")
            .build();
        let complete = BookBuilder::new("2", "Machine Learning (1st Edition)", SourceType::GoogleBooks)
            .author("Tom Mitchell")
            .description("the classic text")
            .thumbnail_url("https://example.com/c.jpg")
            .average_rating(4.5)
            .build();

        let deduped = dedup_books(vec![sparse, complete]);
        assert_eq!(deduped.len(), 1);
        // The more complete record survives
        assert_eq!(deduped[0].id, "google_books:2");
        assert_eq!(deduped[0].description.as_deref(), Some("the classic text"));
    }

    #[test]
    fn test_merge_unions_fields() {
        let with_rating = BookBuilder::new("1", "Deep Learning", SourceType::GoogleBooks)
            .author("Ian Goodfellow")
            .description("d")
            .thumbnail_url("https://x/c.jpg")
            .average_rating(4.7)
            .build();
        let with_publisher = BookBuilder::new("2", "Deep Learning", SourceType::OpenLibrary)
            .author("Ian Goodfellow")
            .publisher("MIT Press")
            .build();

        let deduped = dedup_books(vec![with_rating, with_publisher]);
        assert_eq!(deduped.len(), 1);
        // Survivor keeps its own fields and gains the loser's publisher
        assert_eq!(deduped[0].average_rating, Some(4.7));
        assert_eq!(deduped[0].publisher.as_deref(), Some("MIT Press"));
    }

    #[test]
    fn test_subtitle_containment_merges() {
        let short = BookBuilder::new("1", "The Pragmatic Programmer", SourceType::OpenLibrary)
            .author("Andrew Hunt")
            .build();
        let long = BookBuilder::new(
            "2",
            "The Pragmatic Programmer, 20th Anniversary",
            SourceType::GoogleBooks,
        )
        .author("Andrew Hunt")
        .description("journey to mastery")
        .build();

        let deduped = dedup_books(vec![short, long]);
        assert_eq!(deduped.len(), 1);
    }

    #[test]
    fn test_short_titles_not_overmerged() {
        // "Go" is contained in "Gone" but both are far below the containment
        // minimum, so they stay distinct
        let a = BookBuilder::new("1", "Go", SourceType::GoogleBooks).author("X").build();
        let b = BookBuilder::new("2", "Gone", SourceType::OpenLibrary).author("Y").build();
        let deduped = dedup_books(vec![a, b]);
        assert_eq!(deduped.len(), 2);
    }

    #[test]
    fn test_contained_title_different_author_stays() {
        let mitchell = BookBuilder::new("1", "Machine Learning", SourceType::GoogleBooks)
            .author("Tom Mitchell")
            .build();
        let geron = BookBuilder::new("2", "Hands-On Machine Learning", SourceType::GoogleBooks)
            .author("Aurélien Géron")
            .build();
        let deduped = dedup_books(vec![mitchell, geron]);
        assert_eq!(deduped.len(), 2);
    }

    #[test]
    fn test_distinct_books_survive() {
        let a = BookBuilder::new("1", "Introduction to Algorithms", SourceType::GoogleBooks)
            .author("Thomas H. Cormen")
            .build();
        let b = BookBuilder::new("2", "The Algorithm Design Manual", SourceType::GoogleBooks)
            .author("Steven Skiena")
            .build();
        let deduped = dedup_books(vec![a, b]);
        assert_eq!(deduped.len(), 2);
    }

    #[test]
    fn test_first_seen_order_preserved() {
        let books: Vec<_> = ["Alpha Systems Book", "Beta Systems Book", "Gamma Systems Book"]
            .iter()
            .enumerate()
            .map(|(i, t)| {
                BookBuilder::new(i.to_string(), *t, SourceType::GoogleBooks)
                    .author("A")
                    .build()
            })
            .collect();
        let deduped = dedup_books(books);
        let titles: Vec<_> = deduped.iter().map(|b| b.title.as_str()).collect();
        assert_eq!(titles, vec!["Alpha Systems Book", "Beta Systems Book", "Gamma Systems Book"]);
    }

    #[test]
    fn test_empty_input() {
        assert!(dedup_books(vec![]).is_empty());
    }
}
