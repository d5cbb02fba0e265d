//! Library and librarian models

use serde::{Deserialize, Serialize};

/// Library entity. Holds books through an independent many-to-many
/// relation; shelving or unshelving a book never deletes the book.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Library {
    /// Unique identifier
    pub id: i64,
    /// Library name
    pub name: String,
}

impl Library {
    /// Create a new Library. The ID will be set to 0 and assigned by the
    /// database.
    pub fn new(name: String) -> Self {
        Self { id: 0, name }
    }
}

/// Librarian entity. Belongs to exactly one library.
///
/// "One librarian per library" is a documented convention, not a database
/// constraint; lookups return the first librarian row for the library.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Librarian {
    /// Unique identifier
    pub id: i64,
    /// Librarian name
    pub name: String,
    /// Library this librarian staffs
    #[serde(rename = "library")]
    pub library_id: i64,
}

impl Librarian {
    pub fn new(name: String, library_id: i64) -> Self {
        Self {
            id: 0,
            name,
            library_id,
        }
    }
}

/// Input for creating a library
#[derive(Debug, Clone, Deserialize)]
pub struct CreateLibraryInput {
    pub name: String,
}

/// Input for assigning a librarian to a library
#[derive(Debug, Clone, Deserialize)]
pub struct CreateLibrarianInput {
    pub name: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_library_new() {
        let library = Library::new("Central Library".to_string());
        assert_eq!(library.id, 0);
        assert_eq!(library.name, "Central Library");
    }

    #[test]
    fn test_librarian_new() {
        let librarian = Librarian::new("Sarah Johnson".to_string(), 3);
        assert_eq!(librarian.library_id, 3);
    }
}
