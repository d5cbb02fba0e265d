//! Book service
//!
//! Business logic for the book catalog:
//! - parsing raw listing parameters into a validated `BookQuery`
//! - create/update validation (publication year, author reference)
//!
//! Malformed numeric parameters and unknown ordering keys are rejected with
//! a field-level validation error rather than silently ignored, so a typo'd
//! filter never quietly returns the unfiltered collection.

use anyhow::Context;
use chrono::{Datelike, Utc};
use std::sync::Arc;

use crate::db::repositories::{AuthorRepository, BookRepository};
use crate::models::{Book, BookListParams, BookOrdering, BookQuery, CreateBookInput, UpdateBookInput};
use crate::services::FieldErrors;

/// Error types for book service operations
#[derive(Debug, thiserror::Error)]
pub enum BookServiceError {
    /// Validation error with field-level messages
    #[error("Validation failed: {0}")]
    Validation(FieldErrors),

    /// Book not found
    #[error("Book not found: {0}")]
    NotFound(i64),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

/// Parse raw listing parameters into a validated query.
///
/// Unspecified parameters impose no constraint. Numeric parameters must
/// parse as integers and `ordering` must name an allow-listed key;
/// violations collect into field-level errors.
pub fn parse_book_query(params: &BookListParams) -> Result<BookQuery, FieldErrors> {
    let mut errors = FieldErrors::new();
    let mut query = BookQuery {
        title: params.title.clone(),
        title_contains: params.title_contains.clone(),
        author_name: params.author_name.clone(),
        search: params.search.clone(),
        ..Default::default()
    };

    query.author = parse_int(&params.author, "author", &mut errors);
    query.publication_year = parse_int(&params.publication_year, "publication_year", &mut errors);
    query.publication_year_min =
        parse_int(&params.publication_year_min, "publication_year_min", &mut errors);
    query.publication_year_max =
        parse_int(&params.publication_year_max, "publication_year_max", &mut errors);

    if let Some(ordering) = &params.ordering {
        match BookOrdering::parse(ordering) {
            Some(parsed) => query.ordering = parsed,
            None => errors.add("ordering", "Ordering must be one of: title, publication_year."),
        }
    }

    errors.into_result().map(|_| query)
}

fn parse_int<T: std::str::FromStr>(
    value: &Option<String>,
    field: &str,
    errors: &mut FieldErrors,
) -> Option<T> {
    match value {
        Some(raw) => match raw.trim().parse() {
            Ok(parsed) => Some(parsed),
            Err(_) => {
                errors.add(field, "Enter a valid integer.");
                None
            }
        },
        None => None,
    }
}

/// Book service
pub struct BookService {
    book_repo: Arc<dyn BookRepository>,
    author_repo: Arc<dyn AuthorRepository>,
}

impl BookService {
    /// Create a new book service
    pub fn new(book_repo: Arc<dyn BookRepository>, author_repo: Arc<dyn AuthorRepository>) -> Self {
        Self {
            book_repo,
            author_repo,
        }
    }

    /// Run the filtered/searched/ordered listing.
    pub async fn list(&self, params: &BookListParams) -> Result<Vec<Book>, BookServiceError> {
        let query = parse_book_query(params).map_err(BookServiceError::Validation)?;
        self.book_repo
            .query(&query)
            .await
            .context("Failed to list books")
            .map_err(Into::into)
    }

    /// Get a book by id.
    pub async fn get(&self, id: i64) -> Result<Book, BookServiceError> {
        self.book_repo
            .get_by_id(id)
            .await
            .context("Failed to get book")?
            .ok_or(BookServiceError::NotFound(id))
    }

    /// Create a book after validating it.
    pub async fn create(&self, input: CreateBookInput) -> Result<Book, BookServiceError> {
        let mut errors = validate_fields(&input.title, input.publication_year);
        self.check_author(input.author, &mut errors).await?;
        errors.into_result().map_err(BookServiceError::Validation)?;

        let book = self
            .book_repo
            .create(&Book::new(
                input.title.trim().to_string(),
                input.publication_year,
                input.author,
            ))
            .await
            .context("Failed to create book")?;
        Ok(book)
    }

    /// Update a book. Absent input fields keep their current value; present
    /// fields pass through the same validation as creation.
    pub async fn update(&self, id: i64, input: UpdateBookInput) -> Result<Book, BookServiceError> {
        let mut book = self.get(id).await?;

        if let Some(title) = input.title {
            book.title = title;
        }
        if let Some(year) = input.publication_year {
            book.publication_year = year;
        }
        if let Some(author) = input.author {
            book.author_id = author;
        }

        let mut errors = validate_fields(&book.title, book.publication_year);
        self.check_author(book.author_id, &mut errors).await?;
        errors.into_result().map_err(BookServiceError::Validation)?;

        book.title = book.title.trim().to_string();
        self.book_repo
            .update(&book)
            .await
            .context("Failed to update book")?;
        Ok(book)
    }

    /// Delete a book. The author is untouched.
    pub async fn delete(&self, id: i64) -> Result<(), BookServiceError> {
        // Distinguish 404 from a successful delete
        self.get(id).await?;
        self.book_repo
            .delete(id)
            .await
            .context("Failed to delete book")?;
        Ok(())
    }

    async fn check_author(
        &self,
        author_id: i64,
        errors: &mut FieldErrors,
    ) -> Result<(), BookServiceError> {
        let exists = self
            .author_repo
            .get_by_id(author_id)
            .await
            .context("Failed to check author")?
            .is_some();
        if !exists {
            errors.add("author", format!("Author {} does not exist.", author_id));
        }
        Ok(())
    }
}

/// Field checks shared by create and update. The year bound is read from
/// the clock at validation time, never cached.
fn validate_fields(title: &str, publication_year: i32) -> FieldErrors {
    let mut errors = FieldErrors::new();

    let title = title.trim();
    if title.is_empty() {
        errors.add("title", "Title cannot be empty.");
    } else if title.chars().count() > 200 {
        errors.add("title", "Title cannot exceed 200 characters.");
    }

    let current_year = Utc::now().year();
    if publication_year > current_year {
        errors.add("publication_year", "Publication year cannot be in the future.");
    }

    errors
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::repositories::{SqlxAuthorRepository, SqlxBookRepository};
    use crate::db::{create_test_pool, migrations};
    use crate::models::Author;

    async fn setup() -> (BookService, i64) {
        let pool = create_test_pool().await.expect("Failed to create test pool");
        migrations::run_migrations(&pool)
            .await
            .expect("Failed to run migrations");

        let author_repo = SqlxAuthorRepository::boxed(pool.clone());
        let author = author_repo
            .create(&Author::new("Octavia Butler".to_string()))
            .await
            .expect("Failed to create author");

        let service = BookService::new(SqlxBookRepository::boxed(pool), author_repo);
        (service, author.id)
    }

    fn input(title: &str, year: i32, author: i64) -> CreateBookInput {
        CreateBookInput {
            title: title.to_string(),
            publication_year: year,
            author,
        }
    }

    #[tokio::test]
    async fn test_create_with_current_year_succeeds() {
        let (service, author_id) = setup().await;
        let current_year = Utc::now().year();

        let book = service
            .create(input("Kindred", current_year, author_id))
            .await
            .expect("Create should succeed");

        assert!(book.id > 0);
        assert_eq!(book.publication_year, current_year);
    }

    #[tokio::test]
    async fn test_create_with_next_year_fails() {
        let (service, author_id) = setup().await;
        let next_year = Utc::now().year() + 1;

        let result = service.create(input("From The Future", next_year, author_id)).await;

        match result {
            Err(BookServiceError::Validation(errors)) => {
                assert_eq!(
                    errors.get("publication_year"),
                    Some("Publication year cannot be in the future.")
                );
            }
            other => panic!("Expected validation error, got {:?}", other.map(|b| b.id)),
        }
    }

    #[tokio::test]
    async fn test_create_with_unknown_author_fails() {
        let (service, _) = setup().await;

        let result = service.create(input("Orphan Book", 2000, 99999)).await;

        match result {
            Err(BookServiceError::Validation(errors)) => {
                assert!(errors.get("author").is_some());
            }
            other => panic!("Expected validation error, got {:?}", other.map(|b| b.id)),
        }
    }

    #[tokio::test]
    async fn test_partial_update_revalidates_year() {
        let (service, author_id) = setup().await;
        let book = service
            .create(input("Parable of the Sower", 1993, author_id))
            .await
            .unwrap();

        let result = service
            .update(
                book.id,
                UpdateBookInput {
                    publication_year: Some(Utc::now().year() + 5),
                    ..Default::default()
                },
            )
            .await;
        assert!(matches!(result, Err(BookServiceError::Validation(_))));

        // A valid partial update keeps the other fields
        let updated = service
            .update(
                book.id,
                UpdateBookInput {
                    publication_year: Some(1994),
                    ..Default::default()
                },
            )
            .await
            .expect("Update should succeed");
        assert_eq!(updated.title, "Parable of the Sower");
        assert_eq!(updated.publication_year, 1994);
    }

    #[tokio::test]
    async fn test_update_missing_book_is_not_found() {
        let (service, _) = setup().await;
        let result = service.update(424242, UpdateBookInput::default()).await;
        assert!(matches!(result, Err(BookServiceError::NotFound(424242))));
    }

    #[tokio::test]
    async fn test_delete_missing_book_is_not_found() {
        let (service, _) = setup().await;
        let result = service.delete(424242).await;
        assert!(matches!(result, Err(BookServiceError::NotFound(424242))));
    }

    #[test]
    fn test_parse_query_accepts_valid_params() {
        let params = BookListParams {
            author: Some("3".to_string()),
            publication_year_min: Some("2000".to_string()),
            publication_year_max: Some("2020".to_string()),
            ordering: Some("-publication_year".to_string()),
            ..Default::default()
        };

        let query = parse_book_query(&params).expect("Parse should succeed");
        assert_eq!(query.author, Some(3));
        assert_eq!(query.publication_year_min, Some(2000));
        assert_eq!(query.publication_year_max, Some(2020));
        assert!(query.ordering.descending);
    }

    #[test]
    fn test_parse_query_rejects_malformed_numbers() {
        let params = BookListParams {
            publication_year_min: Some("twenty-twenty".to_string()),
            ..Default::default()
        };

        let errors = parse_book_query(&params).expect_err("Parse should fail");
        assert_eq!(errors.get("publication_year_min"), Some("Enter a valid integer."));
    }

    #[test]
    fn test_parse_query_rejects_unknown_ordering() {
        let params = BookListParams {
            ordering: Some("id".to_string()),
            ..Default::default()
        };

        let errors = parse_book_query(&params).expect_err("Parse should fail");
        assert!(errors.get("ordering").is_some());
    }

    #[test]
    fn test_parse_query_empty_params_impose_no_constraint() {
        let query = parse_book_query(&BookListParams::default()).unwrap();
        assert_eq!(query, BookQuery::default());
    }
}
