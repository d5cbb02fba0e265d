//! Book repository
//!
//! Database operations for books, including the filtered/searched/ordered
//! listing behind `GET /api/books/list`. The listing translates a validated
//! `BookQuery` into a single SQL statement: structured filters combine with
//! AND, the free-text search adds an OR-group over title and author name,
//! and ordering is restricted to the allow-listed columns.

use anyhow::{Context, Result};
use async_trait::async_trait;
use sqlx::{QueryBuilder, Row, Sqlite, SqlitePool};
use std::sync::Arc;

use crate::models::{Book, BookQuery};

/// Book repository trait
#[async_trait]
pub trait BookRepository: Send + Sync {
    /// Create a new book
    async fn create(&self, book: &Book) -> Result<Book>;

    /// Get book by ID
    async fn get_by_id(&self, id: i64) -> Result<Option<Book>>;

    /// Update a book
    async fn update(&self, book: &Book) -> Result<()>;

    /// Delete a book
    async fn delete(&self, id: i64) -> Result<()>;

    /// List all books by an author, ordered by title
    async fn list_by_author(&self, author_id: i64) -> Result<Vec<Book>>;

    /// Run the filtered listing query. Read-only.
    async fn query(&self, query: &BookQuery) -> Result<Vec<Book>>;
}

/// SQLx-based book repository implementation
pub struct SqlxBookRepository {
    pool: SqlitePool,
}

impl SqlxBookRepository {
    /// Create a new SQLx book repository
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Create a boxed repository for use with dependency injection
    pub fn boxed(pool: SqlitePool) -> Arc<dyn BookRepository> {
        Arc::new(Self::new(pool))
    }
}

#[async_trait]
impl BookRepository for SqlxBookRepository {
    async fn create(&self, book: &Book) -> Result<Book> {
        let result = sqlx::query(
            "INSERT INTO books (title, publication_year, author_id) VALUES (?, ?, ?)",
        )
        .bind(&book.title)
        .bind(book.publication_year)
        .bind(book.author_id)
        .execute(&self.pool)
        .await
        .context("Failed to create book")?;

        Ok(Book {
            id: result.last_insert_rowid(),
            title: book.title.clone(),
            publication_year: book.publication_year,
            author_id: book.author_id,
        })
    }

    async fn get_by_id(&self, id: i64) -> Result<Option<Book>> {
        let row = sqlx::query(
            "SELECT id, title, publication_year, author_id FROM books WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .context("Failed to get book by ID")?;

        Ok(row.map(|row| row_to_book(&row)))
    }

    async fn update(&self, book: &Book) -> Result<()> {
        sqlx::query(
            "UPDATE books SET title = ?, publication_year = ?, author_id = ? WHERE id = ?",
        )
        .bind(&book.title)
        .bind(book.publication_year)
        .bind(book.author_id)
        .bind(book.id)
        .execute(&self.pool)
        .await
        .context("Failed to update book")?;

        Ok(())
    }

    async fn delete(&self, id: i64) -> Result<()> {
        sqlx::query("DELETE FROM books WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await
            .context("Failed to delete book")?;

        Ok(())
    }

    async fn list_by_author(&self, author_id: i64) -> Result<Vec<Book>> {
        let rows = sqlx::query(
            r#"
            SELECT id, title, publication_year, author_id
            FROM books
            WHERE author_id = ?
            ORDER BY title
            "#,
        )
        .bind(author_id)
        .fetch_all(&self.pool)
        .await
        .context("Failed to list books by author")?;

        Ok(rows.iter().map(row_to_book).collect())
    }

    async fn query(&self, query: &BookQuery) -> Result<Vec<Book>> {
        let mut builder: QueryBuilder<Sqlite> = QueryBuilder::new(
            "SELECT b.id, b.title, b.publication_year, b.author_id \
             FROM books b \
             JOIN authors a ON a.id = b.author_id \
             WHERE 1 = 1",
        );

        if let Some(author) = query.author {
            builder.push(" AND b.author_id = ").push_bind(author);
        }
        if let Some(title) = &query.title {
            builder.push(" AND b.title = ").push_bind(title.clone());
        }
        if let Some(fragment) = &query.title_contains {
            builder
                .push(" AND b.title LIKE ")
                .push_bind(like_pattern(fragment));
        }
        if let Some(year) = query.publication_year {
            builder.push(" AND b.publication_year = ").push_bind(year);
        }
        if let Some(min) = query.publication_year_min {
            builder.push(" AND b.publication_year >= ").push_bind(min);
        }
        if let Some(max) = query.publication_year_max {
            builder.push(" AND b.publication_year <= ").push_bind(max);
        }
        if let Some(name) = &query.author_name {
            builder
                .push(" AND a.name LIKE ")
                .push_bind(like_pattern(name));
        }

        // Free-text search is an extra AND constraint: title OR author name
        if let Some(term) = &query.search {
            let pattern = like_pattern(term);
            builder
                .push(" AND (b.title LIKE ")
                .push_bind(pattern.clone())
                .push(" OR a.name LIKE ")
                .push_bind(pattern)
                .push(")");
        }

        // Ordering columns come from the allow-list, never from user input
        builder.push(" ORDER BY ");
        builder.push(query.ordering.column());
        builder.push(" ");
        builder.push(query.ordering.direction());
        builder.push(", b.id ASC");

        let rows = builder
            .build()
            .fetch_all(&self.pool)
            .await
            .context("Failed to query books")?;

        Ok(rows.iter().map(row_to_book).collect())
    }
}

/// SQLite LIKE is case-insensitive for ASCII, which gives the icontains
/// semantics the listing needs.
fn like_pattern(fragment: &str) -> String {
    format!("%{}%", fragment)
}

fn row_to_book(row: &sqlx::sqlite::SqliteRow) -> Book {
    Book {
        id: row.get("id"),
        title: row.get("title"),
        publication_year: row.get("publication_year"),
        author_id: row.get("author_id"),
    }
}
