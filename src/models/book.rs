//! Book model and the book listing query
//!
//! This module provides:
//! - `Book` entity and its create/update input types
//! - `BookQuery`, the validated set of predicates for the book listing
//! - `BookOrdering`, the allow-listed sort selector

use serde::{Deserialize, Serialize};

/// Book entity. Belongs to exactly one author.
///
/// The author reference serializes as `author` on the wire, matching the
/// create/update input shape.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Book {
    /// Unique identifier
    pub id: i64,
    /// Book title
    pub title: String,
    /// Year of publication
    pub publication_year: i32,
    /// Owning author id
    #[serde(rename = "author")]
    pub author_id: i64,
}

impl Book {
    /// Create a new Book. The ID will be set to 0 and assigned by the
    /// database.
    pub fn new(title: String, publication_year: i32, author_id: i64) -> Self {
        Self {
            id: 0,
            title,
            publication_year,
            author_id,
        }
    }
}

/// Input for creating a book
#[derive(Debug, Clone, Deserialize)]
pub struct CreateBookInput {
    pub title: String,
    pub publication_year: i32,
    /// Author id the book belongs to
    pub author: i64,
}

/// Input for updating a book. Absent fields keep their current value, so
/// the same type serves both full and partial updates.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateBookInput {
    pub title: Option<String>,
    pub publication_year: Option<i32>,
    pub author: Option<i64>,
}

/// Raw query-string parameters of the book listing, exactly as received.
///
/// Every field is an optional string: numeric values are parsed (and
/// rejected with a field-level error when malformed) when building a
/// `BookQuery`, not during extraction.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct BookListParams {
    pub author: Option<String>,
    pub title: Option<String>,
    pub title_contains: Option<String>,
    pub publication_year: Option<String>,
    pub publication_year_min: Option<String>,
    pub publication_year_max: Option<String>,
    pub author_name: Option<String>,
    pub search: Option<String>,
    pub ordering: Option<String>,
}

/// Validated predicates for the book listing.
///
/// Every specified filter narrows the result (logical AND); unspecified
/// fields impose no constraint. `search` is an additional OR-group over
/// title and author name. The query is read-only.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BookQuery {
    /// Exact author id
    pub author: Option<i64>,
    /// Exact title
    pub title: Option<String>,
    /// Case-insensitive title substring
    pub title_contains: Option<String>,
    /// Exact publication year
    pub publication_year: Option<i32>,
    /// Inclusive lower year bound
    pub publication_year_min: Option<i32>,
    /// Inclusive upper year bound
    pub publication_year_max: Option<i32>,
    /// Case-insensitive author name substring
    pub author_name: Option<String>,
    /// Free-text search over title OR author name
    pub search: Option<String>,
    /// Sort selector
    pub ordering: BookOrdering,
}

/// Sort key allow-list for the book listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrderKey {
    Title,
    PublicationYear,
}

/// Sort selector: an allow-listed key plus direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BookOrdering {
    pub key: OrderKey,
    pub descending: bool,
}

impl Default for BookOrdering {
    /// Ascending by title.
    fn default() -> Self {
        Self {
            key: OrderKey::Title,
            descending: false,
        }
    }
}

impl BookOrdering {
    /// Parse an ordering parameter. A leading `-` flips to descending.
    /// Returns `None` for keys outside the allow-list.
    pub fn parse(value: &str) -> Option<Self> {
        let (descending, key) = match value.strip_prefix('-') {
            Some(rest) => (true, rest),
            None => (false, value),
        };

        let key = match key {
            "title" => OrderKey::Title,
            "publication_year" => OrderKey::PublicationYear,
            _ => return None,
        };

        Some(Self { key, descending })
    }

    /// Column the key maps to in the listing query.
    pub fn column(&self) -> &'static str {
        match self.key {
            OrderKey::Title => "b.title",
            OrderKey::PublicationYear => "b.publication_year",
        }
    }

    /// SQL direction keyword.
    pub fn direction(&self) -> &'static str {
        if self.descending {
            "DESC"
        } else {
            "ASC"
        }
    }
}
