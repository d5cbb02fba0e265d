//! Author service
//!
//! Authors are listed with their books nested, so catalog clients get the
//! one-to-many relation in a single response.

use anyhow::Context;
use std::sync::Arc;

use crate::db::repositories::{AuthorRepository, BookRepository};
use crate::models::{Author, AuthorWithBooks, CreateAuthorInput};
use crate::services::FieldErrors;

/// Error types for author service operations
#[derive(Debug, thiserror::Error)]
pub enum AuthorServiceError {
    /// Validation error with field-level messages
    #[error("Validation failed: {0}")]
    Validation(FieldErrors),

    /// Author not found
    #[error("Author not found: {0}")]
    NotFound(i64),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

/// Author service
pub struct AuthorService {
    author_repo: Arc<dyn AuthorRepository>,
    book_repo: Arc<dyn BookRepository>,
}

impl AuthorService {
    /// Create a new author service
    pub fn new(author_repo: Arc<dyn AuthorRepository>, book_repo: Arc<dyn BookRepository>) -> Self {
        Self {
            author_repo,
            book_repo,
        }
    }

    /// All authors ordered by name, each with their books nested.
    pub async fn list_with_books(&self) -> Result<Vec<AuthorWithBooks>, AuthorServiceError> {
        let authors = self
            .author_repo
            .list()
            .await
            .context("Failed to list authors")?;

        let mut result = Vec::with_capacity(authors.len());
        for author in authors {
            let books = self
                .book_repo
                .list_by_author(author.id)
                .await
                .context("Failed to list author books")?;
            result.push(AuthorWithBooks::new(author, books));
        }
        Ok(result)
    }

    /// One author with their books nested.
    pub async fn get_with_books(&self, id: i64) -> Result<AuthorWithBooks, AuthorServiceError> {
        let author = self
            .author_repo
            .get_by_id(id)
            .await
            .context("Failed to get author")?
            .ok_or(AuthorServiceError::NotFound(id))?;

        let books = self
            .book_repo
            .list_by_author(author.id)
            .await
            .context("Failed to list author books")?;
        Ok(AuthorWithBooks::new(author, books))
    }

    /// Create an author.
    pub async fn create(&self, input: CreateAuthorInput) -> Result<Author, AuthorServiceError> {
        let name = input.name.trim();
        let mut errors = FieldErrors::new();
        if name.is_empty() {
            errors.add("name", "Name cannot be empty.");
        } else if name.chars().count() > 100 {
            errors.add("name", "Name cannot exceed 100 characters.");
        }
        errors.into_result().map_err(AuthorServiceError::Validation)?;

        self.author_repo
            .create(&Author::new(name.to_string()))
            .await
            .context("Failed to create author")
            .map_err(Into::into)
    }

    /// Delete an author along with all their books.
    pub async fn delete(&self, id: i64) -> Result<(), AuthorServiceError> {
        self.author_repo
            .get_by_id(id)
            .await
            .context("Failed to get author")?
            .ok_or(AuthorServiceError::NotFound(id))?;

        self.author_repo
            .delete(id)
            .await
            .context("Failed to delete author")?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::repositories::{SqlxAuthorRepository, SqlxBookRepository};
    use crate::db::{create_test_pool, migrations};
    use crate::models::Book;

    async fn setup() -> (AuthorService, Arc<dyn BookRepository>) {
        let pool = create_test_pool().await.expect("Failed to create test pool");
        migrations::run_migrations(&pool)
            .await
            .expect("Failed to run migrations");

        let book_repo = SqlxBookRepository::boxed(pool.clone());
        let service = AuthorService::new(SqlxAuthorRepository::boxed(pool), book_repo.clone());
        (service, book_repo)
    }

    #[tokio::test]
    async fn test_list_nests_books_under_authors() {
        let (service, book_repo) = setup().await;
        let author = service
            .create(CreateAuthorInput {
                name: "N.K. Jemisin".to_string(),
            })
            .await
            .expect("Create failed");
        book_repo
            .create(&Book::new("The Fifth Season".to_string(), 2015, author.id))
            .await
            .unwrap();
        book_repo
            .create(&Book::new("The Obelisk Gate".to_string(), 2016, author.id))
            .await
            .unwrap();

        let listed = service.list_with_books().await.expect("List failed");
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].books.len(), 2);

        let one = service.get_with_books(author.id).await.expect("Get failed");
        assert_eq!(one.author.name, "N.K. Jemisin");
        assert_eq!(one.books.len(), 2);
    }

    #[tokio::test]
    async fn test_create_rejects_blank_name() {
        let (service, _) = setup().await;
        let result = service
            .create(CreateAuthorInput {
                name: "   ".to_string(),
            })
            .await;
        assert!(matches!(result, Err(AuthorServiceError::Validation(_))));
    }

    #[tokio::test]
    async fn test_delete_removes_books_too() {
        let (service, book_repo) = setup().await;
        let author = service
            .create(CreateAuthorInput {
                name: "To Remove".to_string(),
            })
            .await
            .unwrap();
        let book = book_repo
            .create(&Book::new("Gone Soon".to_string(), 2001, author.id))
            .await
            .unwrap();

        service.delete(author.id).await.expect("Delete failed");

        assert!(matches!(
            service.get_with_books(author.id).await,
            Err(AuthorServiceError::NotFound(_))
        ));
        assert!(book_repo.get_by_id(book.id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_delete_missing_author_is_not_found() {
        let (service, _) = setup().await;
        assert!(matches!(
            service.delete(555).await,
            Err(AuthorServiceError::NotFound(555))
        ));
    }
}
