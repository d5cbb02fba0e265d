//! Author model

use serde::{Deserialize, Serialize};

use crate::models::Book;

/// Author entity representing a book author.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Author {
    /// Unique identifier
    pub id: i64,
    /// Author name
    pub name: String,
}

impl Author {
    /// Create a new Author. The ID will be set to 0 and assigned by the
    /// database.
    pub fn new(name: String) -> Self {
        Self { id: 0, name }
    }
}

/// An author together with all their books, for nested listings.
#[derive(Debug, Clone, Serialize)]
pub struct AuthorWithBooks {
    #[serde(flatten)]
    pub author: Author,
    pub books: Vec<Book>,
}

impl AuthorWithBooks {
    pub fn new(author: Author, books: Vec<Book>) -> Self {
        Self { author, books }
    }
}

/// Input for creating an author
#[derive(Debug, Clone, Deserialize)]
pub struct CreateAuthorInput {
    pub name: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_author_new() {
        let author = Author::new("Ursula K. Le Guin".to_string());
        assert_eq!(author.id, 0);
        assert_eq!(author.name, "Ursula K. Le Guin");
    }
}
