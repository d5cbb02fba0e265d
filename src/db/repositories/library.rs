//! Library repository
//!
//! Database operations for libraries, their shelved books, and librarians.
//! The library/book relation is an independent join table; shelving and
//! unshelving never touch the book rows themselves.

use anyhow::{Context, Result};
use async_trait::async_trait;
use sqlx::{Row, SqlitePool};
use std::sync::Arc;

use crate::models::{Book, Librarian, Library};

/// Library repository trait
#[async_trait]
pub trait LibraryRepository: Send + Sync {
    /// Create a new library
    async fn create(&self, library: &Library) -> Result<Library>;

    /// Get library by ID
    async fn get_by_id(&self, id: i64) -> Result<Option<Library>>;

    /// List all libraries ordered by name
    async fn list(&self) -> Result<Vec<Library>>;

    /// Shelve a book in a library. Idempotent.
    async fn add_book(&self, library_id: i64, book_id: i64) -> Result<()>;

    /// Remove a book from a library's shelves
    async fn remove_book(&self, library_id: i64, book_id: i64) -> Result<()>;

    /// All books shelved in a library, ordered by title
    async fn books(&self, library_id: i64) -> Result<Vec<Book>>;

    /// Create a librarian for a library
    async fn create_librarian(&self, librarian: &Librarian) -> Result<Librarian>;

    /// The librarian staffing a library, if any. One-per-library is a
    /// convention, so this returns the first row.
    async fn librarian_for(&self, library_id: i64) -> Result<Option<Librarian>>;
}

/// SQLx-based library repository implementation
pub struct SqlxLibraryRepository {
    pool: SqlitePool,
}

impl SqlxLibraryRepository {
    /// Create a new SQLx library repository
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Create a boxed repository for use with dependency injection
    pub fn boxed(pool: SqlitePool) -> Arc<dyn LibraryRepository> {
        Arc::new(Self::new(pool))
    }
}

#[async_trait]
impl LibraryRepository for SqlxLibraryRepository {
    async fn create(&self, library: &Library) -> Result<Library> {
        let result = sqlx::query("INSERT INTO libraries (name) VALUES (?)")
            .bind(&library.name)
            .execute(&self.pool)
            .await
            .context("Failed to create library")?;

        Ok(Library {
            id: result.last_insert_rowid(),
            name: library.name.clone(),
        })
    }

    async fn get_by_id(&self, id: i64) -> Result<Option<Library>> {
        let row = sqlx::query("SELECT id, name FROM libraries WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .context("Failed to get library by ID")?;

        Ok(row.map(|row| Library {
            id: row.get("id"),
            name: row.get("name"),
        }))
    }

    async fn list(&self) -> Result<Vec<Library>> {
        let rows = sqlx::query("SELECT id, name FROM libraries ORDER BY name")
            .fetch_all(&self.pool)
            .await
            .context("Failed to list libraries")?;

        Ok(rows
            .iter()
            .map(|row| Library {
                id: row.get("id"),
                name: row.get("name"),
            })
            .collect())
    }

    async fn add_book(&self, library_id: i64, book_id: i64) -> Result<()> {
        sqlx::query("INSERT OR IGNORE INTO library_books (library_id, book_id) VALUES (?, ?)")
            .bind(library_id)
            .bind(book_id)
            .execute(&self.pool)
            .await
            .context("Failed to add book to library")?;

        Ok(())
    }

    async fn remove_book(&self, library_id: i64, book_id: i64) -> Result<()> {
        sqlx::query("DELETE FROM library_books WHERE library_id = ? AND book_id = ?")
            .bind(library_id)
            .bind(book_id)
            .execute(&self.pool)
            .await
            .context("Failed to remove book from library")?;

        Ok(())
    }

    async fn books(&self, library_id: i64) -> Result<Vec<Book>> {
        let rows = sqlx::query(
            r#"
            SELECT b.id, b.title, b.publication_year, b.author_id
            FROM books b
            INNER JOIN library_books lb ON b.id = lb.book_id
            WHERE lb.library_id = ?
            ORDER BY b.title
            "#,
        )
        .bind(library_id)
        .fetch_all(&self.pool)
        .await
        .context("Failed to list library books")?;

        Ok(rows
            .iter()
            .map(|row| Book {
                id: row.get("id"),
                title: row.get("title"),
                publication_year: row.get("publication_year"),
                author_id: row.get("author_id"),
            })
            .collect())
    }

    async fn create_librarian(&self, librarian: &Librarian) -> Result<Librarian> {
        let result = sqlx::query("INSERT INTO librarians (name, library_id) VALUES (?, ?)")
            .bind(&librarian.name)
            .bind(librarian.library_id)
            .execute(&self.pool)
            .await
            .context("Failed to create librarian")?;

        Ok(Librarian {
            id: result.last_insert_rowid(),
            name: librarian.name.clone(),
            library_id: librarian.library_id,
        })
    }

    async fn librarian_for(&self, library_id: i64) -> Result<Option<Librarian>> {
        let row = sqlx::query(
            "SELECT id, name, library_id FROM librarians WHERE library_id = ? ORDER BY id LIMIT 1",
        )
        .bind(library_id)
        .fetch_optional(&self.pool)
        .await
        .context("Failed to get librarian for library")?;

        Ok(row.map(|row| Librarian {
            id: row.get("id"),
            name: row.get("name"),
            library_id: row.get("library_id"),
        }))
    }
}
