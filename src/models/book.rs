//! Book model representing a record from any catalog provider.

use serde::{Deserialize, Serialize};

/// The provider/catalog where the book was found
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceType {
    GoogleBooks,
    OpenLibrary,
    Douban,
    #[serde(untagged)]
    Other(String),
}

impl SourceType {
    /// Returns the display name of the provider
    pub fn name(&self) -> &str {
        match self {
            SourceType::GoogleBooks => "Google Books",
            SourceType::OpenLibrary => "Open Library",
            SourceType::Douban => "Douban",
            SourceType::Other(s) => s,
        }
    }

    /// Returns the provider identifier (used to namespace book ids)
    pub fn id(&self) -> &str {
        match self {
            SourceType::GoogleBooks => "google_books",
            SourceType::OpenLibrary => "open_library",
            SourceType::Douban => "douban",
            SourceType::Other(s) => s,
        }
    }
}

impl std::fmt::Display for SourceType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// A book record from any catalog provider.
///
/// This struct is the canonical format every provider adapter maps into,
/// so downstream stages (dedup, scoring, ranking) only ever see one shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Book {
    /// Globally unique identifier, namespaced as `<provider-id>:<native-id>`
    pub id: String,

    /// Book title
    pub title: String,

    /// Author names
    pub authors: Vec<String>,

    /// Description or synopsis
    pub description: Option<String>,

    /// Detected language code ("en", "zh", ...)
    pub language: Option<String>,

    /// Provider where the record was found
    pub source: SourceType,

    /// Cover thumbnail URL (https)
    pub thumbnail_url: Option<String>,

    /// Average community rating
    pub average_rating: Option<f32>,

    /// Number of ratings behind the average
    pub ratings_count: Option<u32>,

    /// Publication date (provider-native format)
    pub published_date: Option<String>,

    /// Publisher name
    pub publisher: Option<String>,

    /// Subject/genre categories
    pub categories: Vec<String>,
}

impl Book {
    /// Create a new book with required fields, namespacing the id by source
    pub fn new(native_id: impl AsRef<str>, title: impl Into<String>, source: SourceType) -> Self {
        Self {
            id: format!("{}:{}", source.id(), native_id.as_ref()),
            title: title.into(),
            authors: Vec::new(),
            description: None,
            language: None,
            source,
            thumbnail_url: None,
            average_rating: None,
            ratings_count: None,
            published_date: None,
            publisher: None,
            categories: Vec::new(),
        }
    }

    /// Count of the metadata fields that matter for picking a dedup survivor:
    /// non-empty description, thumbnail present, rating present.
    pub fn completeness(&self) -> u32 {
        let mut score = 0;
        if self.description.as_deref().is_some_and(|d| !d.trim().is_empty()) {
            score += 1;
        }
        if self.thumbnail_url.is_some() {
            score += 1;
        }
        if self.average_rating.is_some() {
            score += 1;
        }
        score
    }

    /// Whether the record has a usable (non-placeholder) author
    pub fn has_real_author(&self) -> bool {
        self.authors.iter().any(|a| {
            let a = a.trim();
            !a.is_empty() && a != "Unknown" && a != "unknown" && a != "佚名" && a != "N/A"
        })
    }

    /// Merge a duplicate into this record, producing a new record that keeps
    /// this record's identity but takes the union of the more complete
    /// fields. Neither input is mutated.
    pub fn merged_with(&self, other: &Book) -> Book {
        let mut out = self.clone();
        if out.description.as_deref().map_or(true, |d| d.trim().is_empty()) {
            out.description = other.description.clone();
        }
        if out.thumbnail_url.is_none() {
            out.thumbnail_url = other.thumbnail_url.clone();
        }
        if out.average_rating.is_none() {
            out.average_rating = other.average_rating;
            out.ratings_count = other.ratings_count;
        }
        if out.language.is_none() {
            out.language = other.language.clone();
        }
        if out.published_date.is_none() {
            out.published_date = other.published_date.clone();
        }
        if out.publisher.is_none() {
            out.publisher = other.publisher.clone();
        }
        if out.authors.is_empty() {
            out.authors = other.authors.clone();
        }
        if out.categories.is_empty() {
            out.categories = other.categories.clone();
        }
        out
    }
}

/// Builder for constructing Book records in provider adapters
#[derive(Debug, Clone)]
pub struct BookBuilder {
    book: Book,
}

impl BookBuilder {
    /// Create a new builder with required fields
    pub fn new(native_id: impl AsRef<str>, title: impl Into<String>, source: SourceType) -> Self {
        Self {
            book: Book::new(native_id, title, source),
        }
    }

    /// Set authors
    pub fn authors(mut self, authors: Vec<String>) -> Self {
        self.book.authors = authors;
        self
    }

    /// Add a single author
    pub fn author(mut self, author: impl Into<String>) -> Self {
        self.book.authors.push(author.into());
        self
    }

    /// Set description
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.book.description = Some(description.into());
        self
    }

    /// Set language code
    pub fn language(mut self, language: impl Into<String>) -> Self {
        self.book.language = Some(language.into());
        self
    }

    /// Set thumbnail URL
    pub fn thumbnail_url(mut self, url: impl Into<String>) -> Self {
        self.book.thumbnail_url = Some(url.into());
        self
    }

    /// Set average rating
    pub fn average_rating(mut self, rating: f32) -> Self {
        self.book.average_rating = Some(rating);
        self
    }

    /// Set ratings count
    pub fn ratings_count(mut self, count: u32) -> Self {
        self.book.ratings_count = Some(count);
        self
    }

    /// Set publication date
    pub fn published_date(mut self, date: impl Into<String>) -> Self {
        self.book.published_date = Some(date.into());
        self
    }

    /// Set publisher
    pub fn publisher(mut self, publisher: impl Into<String>) -> Self {
        self.book.publisher = Some(publisher.into());
        self
    }

    /// Set categories
    pub fn categories(mut self, categories: Vec<String>) -> Self {
        self.book.categories = categories;
        self
    }

    /// Build the Book
    pub fn build(self) -> Book {
        self.book
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_book_builder() {
        let book = BookBuilder::new("abc123", "Test Book", SourceType::GoogleBooks)
            .author("Jane Doe")
            .description("A test description.")
            .average_rating(4.2)
            .ratings_count(120)
            .thumbnail_url("https://example.com/cover.jpg")
            .build();

        assert_eq!(book.id, "google_books:abc123");
        assert_eq!(book.title, "Test Book");
        assert_eq!(book.authors, vec!["Jane Doe"]);
        assert_eq!(book.average_rating, Some(4.2));
    }

    #[test]
    fn test_completeness() {
        let bare = Book::new("1", "Bare", SourceType::OpenLibrary);
        assert_eq!(bare.completeness(), 0);

        let full = BookBuilder::new("2", "Full", SourceType::GoogleBooks)
            .description("text")
            .thumbnail_url("https://example.com/c.jpg")
            .average_rating(4.0)
            .build();
        assert_eq!(full.completeness(), 3);

        let empty_description = BookBuilder::new("3", "Half", SourceType::Douban)
            .description("   ")
            .build();
        assert_eq!(empty_description.completeness(), 0);
    }

    #[test]
    fn test_merged_with_takes_missing_fields() {
        let sparse = Book::new("1", "Title", SourceType::OpenLibrary);
        let rich = BookBuilder::new("2", "Title", SourceType::GoogleBooks)
            .author("Jane Doe")
            .description("desc")
            .average_rating(4.5)
            .ratings_count(10)
            .publisher("Acme Press")
            .build();

        let merged = sparse.merged_with(&rich);
        // Identity stays with the receiver
        assert_eq!(merged.id, "open_library:1");
        assert_eq!(merged.description.as_deref(), Some("desc"));
        assert_eq!(merged.average_rating, Some(4.5));
        assert_eq!(merged.ratings_count, Some(10));
        assert_eq!(merged.authors, vec!["Jane Doe"]);
        // Inputs untouched
        assert!(sparse.description.is_none());
    }

    #[test]
    fn test_merged_with_keeps_existing_fields() {
        let a = BookBuilder::new("1", "Title", SourceType::GoogleBooks)
            .description("original")
            .build();
        let b = BookBuilder::new("2", "Title", SourceType::Douban)
            .description("other")
            .build();

        assert_eq!(a.merged_with(&b).description.as_deref(), Some("original"));
    }

    #[test]
    fn test_has_real_author() {
        let mut book = Book::new("1", "T", SourceType::GoogleBooks);
        assert!(!book.has_real_author());
        book.authors = vec!["Unknown".to_string()];
        assert!(!book.has_real_author());
        book.authors = vec!["佚名".to_string()];
        assert!(!book.has_real_author());
        book.authors = vec!["Andrew Hunt".to_string()];
        assert!(book.has_real_author());
    }
}
