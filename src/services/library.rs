//! Library service
//!
//! Libraries, their shelved books, and librarian staffing. Shelving is an
//! independent many-to-many relation; removing a book from a library never
//! deletes the book row.

use anyhow::Context;
use std::sync::Arc;

use crate::db::repositories::{BookRepository, LibraryRepository};
use crate::models::{
    Book, CreateLibrarianInput, CreateLibraryInput, Librarian, Library,
};
use crate::services::FieldErrors;

/// Error types for library service operations
#[derive(Debug, thiserror::Error)]
pub enum LibraryServiceError {
    /// Validation error with field-level messages
    #[error("Validation failed: {0}")]
    Validation(FieldErrors),

    /// Library not found
    #[error("Library not found: {0}")]
    LibraryNotFound(i64),

    /// Book not found
    #[error("Book not found: {0}")]
    BookNotFound(i64),

    /// The library has no librarian assigned
    #[error("Library {0} has no librarian")]
    NoLibrarian(i64),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

/// Library service
pub struct LibraryService {
    library_repo: Arc<dyn LibraryRepository>,
    book_repo: Arc<dyn BookRepository>,
}

impl LibraryService {
    /// Create a new library service
    pub fn new(
        library_repo: Arc<dyn LibraryRepository>,
        book_repo: Arc<dyn BookRepository>,
    ) -> Self {
        Self {
            library_repo,
            book_repo,
        }
    }

    /// All libraries ordered by name.
    pub async fn list(&self) -> Result<Vec<Library>, LibraryServiceError> {
        self.library_repo
            .list()
            .await
            .context("Failed to list libraries")
            .map_err(Into::into)
    }

    /// One library together with its shelved books, ordered by title.
    pub async fn get_with_books(
        &self,
        id: i64,
    ) -> Result<(Library, Vec<Book>), LibraryServiceError> {
        let library = self.get(id).await?;
        let books = self
            .library_repo
            .books(library.id)
            .await
            .context("Failed to list library books")?;
        Ok((library, books))
    }

    /// Create a library.
    pub async fn create(&self, input: CreateLibraryInput) -> Result<Library, LibraryServiceError> {
        let name = validate_name(&input.name).map_err(LibraryServiceError::Validation)?;
        self.library_repo
            .create(&Library::new(name))
            .await
            .context("Failed to create library")
            .map_err(Into::into)
    }

    /// Shelve a book in a library. Already-shelved books are a no-op.
    pub async fn add_book(&self, library_id: i64, book_id: i64) -> Result<(), LibraryServiceError> {
        self.get(library_id).await?;
        self.book_repo
            .get_by_id(book_id)
            .await
            .context("Failed to get book")?
            .ok_or(LibraryServiceError::BookNotFound(book_id))?;

        self.library_repo
            .add_book(library_id, book_id)
            .await
            .context("Failed to shelve book")?;
        Ok(())
    }

    /// Remove a book from a library's shelves. The book itself survives.
    pub async fn remove_book(
        &self,
        library_id: i64,
        book_id: i64,
    ) -> Result<(), LibraryServiceError> {
        self.get(library_id).await?;
        self.library_repo
            .remove_book(library_id, book_id)
            .await
            .context("Failed to unshelve book")?;
        Ok(())
    }

    /// Assign a librarian to a library.
    pub async fn assign_librarian(
        &self,
        library_id: i64,
        input: CreateLibrarianInput,
    ) -> Result<Librarian, LibraryServiceError> {
        self.get(library_id).await?;
        let name = validate_name(&input.name).map_err(LibraryServiceError::Validation)?;
        self.library_repo
            .create_librarian(&Librarian::new(name, library_id))
            .await
            .context("Failed to create librarian")
            .map_err(Into::into)
    }

    /// The librarian staffing a library.
    pub async fn librarian(&self, library_id: i64) -> Result<Librarian, LibraryServiceError> {
        self.get(library_id).await?;
        self.library_repo
            .librarian_for(library_id)
            .await
            .context("Failed to get librarian")?
            .ok_or(LibraryServiceError::NoLibrarian(library_id))
    }

    async fn get(&self, id: i64) -> Result<Library, LibraryServiceError> {
        self.library_repo
            .get_by_id(id)
            .await
            .context("Failed to get library")?
            .ok_or(LibraryServiceError::LibraryNotFound(id))
    }
}

fn validate_name(raw: &str) -> Result<String, FieldErrors> {
    let name = raw.trim();
    if name.is_empty() {
        return Err(FieldErrors::single("name", "Name cannot be empty."));
    }
    if name.chars().count() > 100 {
        return Err(FieldErrors::single("name", "Name cannot exceed 100 characters."));
    }
    Ok(name.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::repositories::{
        AuthorRepository, SqlxAuthorRepository, SqlxBookRepository, SqlxLibraryRepository,
    };
    use crate::db::{create_test_pool, migrations};
    use crate::models::Author;

    async fn setup() -> (LibraryService, Arc<dyn BookRepository>, i64) {
        let pool = create_test_pool().await.expect("Failed to create test pool");
        migrations::run_migrations(&pool)
            .await
            .expect("Failed to run migrations");

        let author = SqlxAuthorRepository::boxed(pool.clone())
            .create(&Author::new("Shelf Author".to_string()))
            .await
            .expect("Failed to create author");

        let book_repo = SqlxBookRepository::boxed(pool.clone());
        let service = LibraryService::new(SqlxLibraryRepository::boxed(pool), book_repo.clone());
        (service, book_repo, author.id)
    }

    fn library_input(name: &str) -> CreateLibraryInput {
        CreateLibraryInput {
            name: name.to_string(),
        }
    }

    #[tokio::test]
    async fn test_create_and_shelve() {
        let (service, book_repo, author_id) = setup().await;
        let library = service
            .create(library_input("Central Library"))
            .await
            .expect("Create failed");
        let book = book_repo
            .create(&Book::new("Dune".to_string(), 1965, author_id))
            .await
            .unwrap();

        service.add_book(library.id, book.id).await.expect("Shelve failed");
        // Idempotent
        service.add_book(library.id, book.id).await.expect("Reshelve failed");

        let (found, books) = service.get_with_books(library.id).await.unwrap();
        assert_eq!(found.name, "Central Library");
        assert_eq!(books.len(), 1);
    }

    #[tokio::test]
    async fn test_shelving_checks_both_sides() {
        let (service, book_repo, author_id) = setup().await;
        let library = service.create(library_input("Branch")).await.unwrap();
        let book = book_repo
            .create(&Book::new("Real Book".to_string(), 2000, author_id))
            .await
            .unwrap();

        assert!(matches!(
            service.add_book(999, book.id).await,
            Err(LibraryServiceError::LibraryNotFound(999))
        ));
        assert!(matches!(
            service.add_book(library.id, 999).await,
            Err(LibraryServiceError::BookNotFound(999))
        ));
    }

    #[tokio::test]
    async fn test_unshelve_keeps_the_book() {
        let (service, book_repo, author_id) = setup().await;
        let library = service.create(library_input("Branch")).await.unwrap();
        let book = book_repo
            .create(&Book::new("Kept".to_string(), 2000, author_id))
            .await
            .unwrap();
        service.add_book(library.id, book.id).await.unwrap();

        service.remove_book(library.id, book.id).await.expect("Unshelve failed");

        let (_, books) = service.get_with_books(library.id).await.unwrap();
        assert!(books.is_empty());
        assert!(book_repo.get_by_id(book.id).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_librarian_assignment_and_lookup() {
        let (service, _, _) = setup().await;
        let library = service.create(library_input("Staffed")).await.unwrap();

        assert!(matches!(
            service.librarian(library.id).await,
            Err(LibraryServiceError::NoLibrarian(_))
        ));

        service
            .assign_librarian(
                library.id,
                CreateLibrarianInput {
                    name: "Michael Brown".to_string(),
                },
            )
            .await
            .expect("Assign failed");

        let librarian = service.librarian(library.id).await.expect("Lookup failed");
        assert_eq!(librarian.name, "Michael Brown");
        assert_eq!(librarian.library_id, library.id);
    }

    #[tokio::test]
    async fn test_create_rejects_blank_name() {
        let (service, _, _) = setup().await;
        assert!(matches!(
            service.create(library_input("  ")).await,
            Err(LibraryServiceError::Validation(_))
        ));
    }
}
