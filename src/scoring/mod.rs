//! Multi-factor relevance scoring.
//!
//! Each heuristic is a pure function `(Book, Query) -> signed contribution`;
//! [`score_book`] applies them in a fixed precedence and sums the survivors.
//! Two sentinel values exclude a candidate outright: [`EXCLUDED_SCORE`]
//! (hard) and [`FICTION_FLOOR_SCORE`] (fiction records with no evidence of
//! being fiction). Sentinel-scored candidates never surface downstream.

mod fiction;
pub mod tables;

pub use fiction::score_fiction;

use crate::models::{Book, ScoredCandidate, SearchQuery, EXCLUDED_SCORE};
use crate::utils::text::{alphanumeric_ratio, detect_language};

use tables::{
    category_for, IRRELEVANT_TERMS, LOW_QUALITY_TERMS, PRACTICAL_TERMS, THEORETICAL_TERMS,
};

/// Fixed bonus for matching a landmark work/author in the category table
pub const KNOWN_WORK_BONUS: i32 = 50;

const DESCRIPTION_ONLY_PENALTY: i32 = 5;
const TRUSTED_PROVIDER_BONUS: i32 = 5;
const IRRELEVANT_PENALTY: i32 = 20;
const LOW_QUALITY_PENALTY: i32 = 10;

/// Case-insensitive "does the text contain any of these terms". Callers
/// pass already-lowercased text.
pub(crate) fn contains_any(lower_text: &str, terms: &[&str]) -> bool {
    terms.iter().any(|t| lower_text.contains(t))
}

/// Pre-scoring validity check. Rejected records are invalid, not merely
/// low-scoring: mostly-punctuation titles (encoding corruption), titles
/// shorter than two characters, and records carrying no metadata at all.
pub fn passes_quality_filter(book: &Book) -> bool {
    let title = book.title.trim();
    let title_len = title.chars().count();
    if title_len < 2 {
        return false;
    }
    // Short titles are often legitimately symbol-heavy ("C++", "C#"), so the
    // corruption threshold relaxes for them; "????" still has ratio 0.0
    let min_ratio = if title_len <= 4 { 0.25 } else { 0.5 };
    if alphanumeric_ratio(title) < min_ratio {
        return false;
    }
    let has_any_metadata = !book.authors.is_empty()
        || book.description.is_some()
        || book.thumbnail_url.is_some()
        || book.average_rating.is_some();
    has_any_metadata
}

/// Score one candidate against the query. Fiction queries dispatch to the
/// fiction pipeline, which replaces every rule except the language gate and
/// the irrelevance penalty.
pub fn score_book(book: &Book, query: &SearchQuery) -> i32 {
    // Language gate: a strict preference conflict excludes immediately
    if let Some(required) = query.language.code() {
        if detect_language(book.language.as_deref(), &book.title) != required {
            return EXCLUDED_SCORE;
        }
    }

    if query.is_fiction {
        return score_fiction(book, query);
    }

    let mut score = match keyword_relevance(book, query) {
        // A non-fiction book matching zero keywords anywhere is irrelevant
        None => return EXCLUDED_SCORE,
        Some(s) => s,
    };

    score += known_work_bonus(book, query);
    score += metadata_quality(book);
    score += category_adjustment(book, query);
    score += irrelevance_penalty(book);
    score
}

/// Score and filter a batch, dropping invalid records before scoring
pub fn score_candidates(books: Vec<Book>, query: &SearchQuery) -> Vec<ScoredCandidate> {
    books
        .into_iter()
        .filter(passes_quality_filter)
        .map(|book| {
            let score = score_book(&book, query);
            ScoredCandidate { book, score }
        })
        .collect()
}

/// Keyword relevance: title matches outweigh description matches,
/// contributions scale with keyword length, and broad coverage earns a
/// bonus. Returns `None` when nothing matched anywhere.
fn keyword_relevance(book: &Book, query: &SearchQuery) -> Option<i32> {
    if query.keywords.is_empty() {
        return Some(0);
    }

    let title = book.title.to_lowercase();
    let description = book
        .description
        .as_deref()
        .unwrap_or_default()
        .to_lowercase();

    let mut score: i32 = 0;
    let mut matched = 0usize;
    let mut title_matched = false;

    for keyword in &query.keywords {
        let kw = keyword.to_lowercase();
        if kw.is_empty() {
            continue;
        }
        // Longer, more specific keywords weigh more
        let length_weight = (kw.chars().count() as i32).min(10);
        if title.contains(&kw) {
            score += 12 + 2 * length_weight;
            matched += 1;
            title_matched = true;
        } else if description.contains(&kw) {
            score += 4 + length_weight;
            matched += 1;
        }
    }

    if matched == 0 {
        return None;
    }

    // Coverage bonus: fraction of keywords matched anywhere
    let coverage = matched as f32 / query.keywords.len() as f32;
    score += (coverage * 20.0) as i32;

    // Description-only matches are worth keeping but rank below any title hit
    if !title_matched {
        score -= DESCRIPTION_ONLY_PENALTY;
    }

    Some(score)
}

/// Large fixed bonus for canonical/landmark works of the query's topic area
fn known_work_bonus(book: &Book, query: &SearchQuery) -> i32 {
    let Some(category) = category_for(&query.raw) else {
        return 0;
    };
    let title = book.title.to_lowercase();
    let is_known = category.known_works.iter().any(|work| {
        title.contains(&work.title.to_lowercase())
            || book
                .authors
                .iter()
                .any(|a| a.to_lowercase().contains(&work.author.to_lowercase()))
    });
    if is_known {
        KNOWN_WORK_BONUS
    } else {
        0
    }
}

/// Small additive bonuses for metadata quality and provider trust
fn metadata_quality(book: &Book) -> i32 {
    let mut score = 0;
    if book.has_real_author() {
        score += 3;
    }
    if book.thumbnail_url.is_some() {
        score += 2;
    }
    if book.average_rating.is_some_and(|r| r >= 3.0) {
        score += 3;
    }
    if let Some(count) = book.ratings_count {
        // Log-scaled: 10 ratings ~ +3, 10k ratings ~ +12
        score += ((count as f32 + 1.0).log10() * 3.0) as i32;
    }
    if provider_trusts_ratings(book) {
        score += TRUSTED_PROVIDER_BONUS;
    }
    score
}

fn provider_trusts_ratings(book: &Book) -> bool {
    matches!(book.source, crate::models::SourceType::GoogleBooks)
}

/// Theoretical queries favor principles/architecture titles and dock
/// beginner/tutorial ones; practical queries do the reverse.
fn category_adjustment(book: &Book, query: &SearchQuery) -> i32 {
    let title = book.title.to_lowercase();
    let theoretical_hit = contains_any(&title, THEORETICAL_TERMS);
    let practical_hit = contains_any(&title, PRACTICAL_TERMS);

    let mut score = 0;
    if query.is_theoretical {
        if theoretical_hit {
            score += 8;
        }
        if practical_hit {
            score -= 4;
        }
    } else {
        if practical_hit {
            score += 8;
        }
        if theoretical_hit {
            score -= 4;
        }
    }
    score
}

/// Flat penalties for unrelated-domain vocabulary and aggregation artifacts
pub(crate) fn irrelevance_penalty(book: &Book) -> i32 {
    let title = book.title.to_lowercase();
    let mut score = 0;
    if contains_any(&title, IRRELEVANT_TERMS) {
        score -= IRRELEVANT_PENALTY;
    }
    if contains_any(&title, LOW_QUALITY_TERMS) {
        score -= LOW_QUALITY_PENALTY;
    }
    score
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{BookBuilder, LangPref, SourceType, FICTION_FLOOR_SCORE};

    fn query(raw: &str, keywords: &[&str]) -> SearchQuery {
        let mut q = SearchQuery::new(raw);
        q.keywords = keywords.iter().map(|s| s.to_string()).collect();
        q
    }

    #[test]
    fn test_language_gate_excludes() {
        let zh_book = BookBuilder::new("1", "机器学习", SourceType::Douban)
            .language("zh")
            .author("周志华")
            .build();
        let mut q = query("machine learning", &["machine learning"]);
        q.language = LangPref::En;
        assert_eq!(score_book(&zh_book, &q), EXCLUDED_SCORE);

        q.language = LangPref::Any;
        assert!(score_book(&zh_book, &q) > EXCLUDED_SCORE);
    }

    #[test]
    fn test_title_match_beats_description_match() {
        let title_hit = BookBuilder::new("1", "Machine Learning Basics", SourceType::GoogleBooks)
            .author("A")
            .build();
        let desc_hit = BookBuilder::new("2", "Statistical Methods", SourceType::GoogleBooks)
            .author("A")
            .description("an overview of machine learning")
            .build();
        let q = query("machine learning", &["machine learning"]);
        assert!(score_book(&title_hit, &q) > score_book(&desc_hit, &q));
    }

    #[test]
    fn test_zero_keyword_match_excluded() {
        let book = BookBuilder::new("1", "French Cooking", SourceType::GoogleBooks)
            .author("A")
            .description("recipes")
            .build();
        let q = query("machine learning", &["machine learning"]);
        assert_eq!(score_book(&book, &q), EXCLUDED_SCORE);
    }

    #[test]
    fn test_known_work_bonus_dominates() {
        let canonical = BookBuilder::new("1", "Introduction to Algorithms", SourceType::GoogleBooks)
            .author("Thomas H. Cormen")
            .build();
        let generic = BookBuilder::new("2", "Fun with Algorithms", SourceType::GoogleBooks)
            .author("Someone Else")
            .build();
        let q = query("algorithms", &["algorithms"]);
        let diff = score_book(&canonical, &q) - score_book(&generic, &q);
        assert!(diff >= KNOWN_WORK_BONUS, "diff was {}", diff);
    }

    #[test]
    fn test_metadata_quality_monotonic() {
        let bare = BookBuilder::new("1", "Machine Learning Notes", SourceType::OpenLibrary)
            .author("A")
            .build();
        let rich = BookBuilder::new("2", "Machine Learning Notes", SourceType::OpenLibrary)
            .author("A")
            .thumbnail_url("https://example.com/c.jpg")
            .average_rating(4.4)
            .ratings_count(10_000)
            .build();
        let q = query("machine learning", &["machine learning"]);
        assert!(score_book(&rich, &q) > score_book(&bare, &q));
    }

    #[test]
    fn test_trusted_provider_bonus() {
        let trusted = BookBuilder::new("1", "Machine Learning", SourceType::GoogleBooks)
            .author("A")
            .build();
        let other = BookBuilder::new("1", "Machine Learning", SourceType::OpenLibrary)
            .author("A")
            .build();
        let q = query("machine learning", &["machine learning"]);
        assert!(score_book(&trusted, &q) > score_book(&other, &q));
    }

    #[test]
    fn test_theoretical_adjustment_flips() {
        let principles = BookBuilder::new("1", "Database Internals", SourceType::GoogleBooks)
            .author("A")
            .build();
        let tutorial = BookBuilder::new("2", "Database Tutorial", SourceType::GoogleBooks)
            .author("A")
            .build();
        let mut q = query("database", &["database"]);

        q.is_theoretical = true;
        assert!(score_book(&principles, &q) > score_book(&tutorial, &q));

        q.is_theoretical = false;
        assert!(score_book(&tutorial, &q) > score_book(&principles, &q));
    }

    #[test]
    fn test_irrelevant_vocabulary_penalized() {
        let clean = BookBuilder::new("1", "Algorithms Unlocked", SourceType::GoogleBooks)
            .author("A")
            .build();
        let noisy = BookBuilder::new("2", "Algorithms Magazine Digest", SourceType::GoogleBooks)
            .author("A")
            .build();
        let q = query("algorithms", &["algorithms"]);
        assert!(score_book(&clean, &q) > score_book(&noisy, &q));
    }

    #[test]
    fn test_quality_filter() {
        let corrupt = BookBuilder::new("1", "????###", SourceType::OpenLibrary)
            .author("A")
            .build();
        assert!(!passes_quality_filter(&corrupt));

        let short = BookBuilder::new("2", "A", SourceType::OpenLibrary).author("A").build();
        assert!(!passes_quality_filter(&short));

        let no_metadata = crate::models::Book::new("3", "Plain Title", SourceType::OpenLibrary);
        assert!(!passes_quality_filter(&no_metadata));

        let fine = BookBuilder::new("4", "Plain Title", SourceType::OpenLibrary)
            .author("Jane Doe")
            .build();
        assert!(passes_quality_filter(&fine));
    }

    #[test]
    fn test_quality_filter_keeps_symbol_heavy_short_titles() {
        let cpp = BookBuilder::new("1", "C++", SourceType::GoogleBooks)
            .author("Bjarne Stroustrup")
            .build();
        assert!(passes_quality_filter(&cpp));

        let csharp = BookBuilder::new("2", "C#", SourceType::GoogleBooks)
            .author("Jon Skeet")
            .build();
        assert!(passes_quality_filter(&csharp));

        // All-punctuation stays out even at short lengths
        let junk = BookBuilder::new("3", "????", SourceType::OpenLibrary)
            .author("A")
            .build();
        assert!(!passes_quality_filter(&junk));
    }

    #[test]
    fn test_fiction_dispatch() {
        let book = BookBuilder::new("1", "Python Programming Fundamentals", SourceType::GoogleBooks)
            .author("A")
            .description("science fiction appears here")
            .build();
        let mut q = query("science fiction novel", &["science fiction"]);
        q.is_fiction = true;
        assert_eq!(score_book(&book, &q), EXCLUDED_SCORE);
    }

    #[test]
    fn test_score_candidates_drops_invalid() {
        let q = query("machine learning", &["machine learning"]);
        let books = vec![
            BookBuilder::new("1", "Machine Learning", SourceType::GoogleBooks)
                .author("Tom Mitchell")
                .build(),
            crate::models::Book::new("2", "##??", SourceType::OpenLibrary),
        ];
        let scored = score_candidates(books, &q);
        assert_eq!(scored.len(), 1);
        assert!(scored[0].score > FICTION_FLOOR_SCORE);
    }
}
