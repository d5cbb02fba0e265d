//! Post repository
//!
//! Database operations for blog posts. Listings are newest-first by
//! publication date.

use anyhow::{Context, Result};
use async_trait::async_trait;
use sqlx::{Row, SqlitePool};
use std::sync::Arc;

use crate::models::Post;

/// Post repository trait
#[async_trait]
pub trait PostRepository: Send + Sync {
    /// Create a new post
    async fn create(&self, post: &Post) -> Result<Post>;

    /// Get post by ID
    async fn get_by_id(&self, id: i64) -> Result<Option<Post>>;

    /// Update a post
    async fn update(&self, post: &Post) -> Result<()>;

    /// Delete a post. Comments and tag associations are removed by cascade.
    async fn delete(&self, id: i64) -> Result<()>;

    /// List posts newest-first
    async fn list(&self, offset: i64, limit: i64) -> Result<Vec<Post>>;

    /// Count all posts
    async fn count(&self) -> Result<i64>;

    /// Search posts by title or content, newest-first
    async fn search(&self, keyword: &str, offset: i64, limit: i64) -> Result<Vec<Post>>;

    /// Count search results
    async fn count_search(&self, keyword: &str) -> Result<i64>;

    /// Posts carrying a tag, newest-first
    async fn list_by_tag(&self, tag_id: i64) -> Result<Vec<Post>>;
}

/// SQLx-based post repository implementation
pub struct SqlxPostRepository {
    pool: SqlitePool,
}

impl SqlxPostRepository {
    /// Create a new SQLx post repository
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Create a boxed repository for use with dependency injection
    pub fn boxed(pool: SqlitePool) -> Arc<dyn PostRepository> {
        Arc::new(Self::new(pool))
    }
}

#[async_trait]
impl PostRepository for SqlxPostRepository {
    async fn create(&self, post: &Post) -> Result<Post> {
        let result = sqlx::query(
            "INSERT INTO posts (title, content, published_date, author_id) VALUES (?, ?, ?, ?)",
        )
        .bind(&post.title)
        .bind(&post.content)
        .bind(post.published_date)
        .bind(post.author_id)
        .execute(&self.pool)
        .await
        .context("Failed to create post")?;

        Ok(Post {
            id: result.last_insert_rowid(),
            title: post.title.clone(),
            content: post.content.clone(),
            published_date: post.published_date,
            author_id: post.author_id,
        })
    }

    async fn get_by_id(&self, id: i64) -> Result<Option<Post>> {
        let row = sqlx::query(
            "SELECT id, title, content, published_date, author_id FROM posts WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .context("Failed to get post by ID")?;

        Ok(row.map(|row| row_to_post(&row)))
    }

    async fn update(&self, post: &Post) -> Result<()> {
        sqlx::query("UPDATE posts SET title = ?, content = ? WHERE id = ?")
            .bind(&post.title)
            .bind(&post.content)
            .bind(post.id)
            .execute(&self.pool)
            .await
            .context("Failed to update post")?;

        Ok(())
    }

    async fn delete(&self, id: i64) -> Result<()> {
        // Comments and post_tags rows are deleted automatically due to
        // ON DELETE CASCADE
        sqlx::query("DELETE FROM posts WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await
            .context("Failed to delete post")?;

        Ok(())
    }

    async fn list(&self, offset: i64, limit: i64) -> Result<Vec<Post>> {
        let rows = sqlx::query(
            r#"
            SELECT id, title, content, published_date, author_id
            FROM posts
            ORDER BY published_date DESC, id DESC
            LIMIT ? OFFSET ?
            "#,
        )
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await
        .context("Failed to list posts")?;

        Ok(rows.iter().map(row_to_post).collect())
    }

    async fn count(&self) -> Result<i64> {
        let row: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM posts")
            .fetch_one(&self.pool)
            .await
            .context("Failed to count posts")?;
        Ok(row.0)
    }

    async fn search(&self, keyword: &str, offset: i64, limit: i64) -> Result<Vec<Post>> {
        let pattern = format!("%{}%", keyword);
        let rows = sqlx::query(
            r#"
            SELECT id, title, content, published_date, author_id
            FROM posts
            WHERE title LIKE ? OR content LIKE ?
            ORDER BY published_date DESC, id DESC
            LIMIT ? OFFSET ?
            "#,
        )
        .bind(&pattern)
        .bind(&pattern)
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await
        .context("Failed to search posts")?;

        Ok(rows.iter().map(row_to_post).collect())
    }

    async fn count_search(&self, keyword: &str) -> Result<i64> {
        let pattern = format!("%{}%", keyword);
        let row: (i64,) =
            sqlx::query_as("SELECT COUNT(*) FROM posts WHERE title LIKE ? OR content LIKE ?")
                .bind(&pattern)
                .bind(&pattern)
                .fetch_one(&self.pool)
                .await
                .context("Failed to count search results")?;
        Ok(row.0)
    }

    async fn list_by_tag(&self, tag_id: i64) -> Result<Vec<Post>> {
        let rows = sqlx::query(
            r#"
            SELECT p.id, p.title, p.content, p.published_date, p.author_id
            FROM posts p
            INNER JOIN post_tags pt ON p.id = pt.post_id
            WHERE pt.tag_id = ?
            ORDER BY p.published_date DESC, p.id DESC
            "#,
        )
        .bind(tag_id)
        .fetch_all(&self.pool)
        .await
        .context("Failed to list posts by tag")?;

        Ok(rows.iter().map(row_to_post).collect())
    }
}

fn row_to_post(row: &sqlx::sqlite::SqliteRow) -> Post {
    Post {
        id: row.get("id"),
        title: row.get("title"),
        content: row.get("content"),
        published_date: row.get("published_date"),
        author_id: row.get("author_id"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{create_test_pool, migrations};

    async fn setup_test_repo() -> (SqlitePool, SqlxPostRepository) {
        let pool = create_test_pool().await.expect("Failed to create test pool");
        migrations::run_migrations(&pool)
            .await
            .expect("Failed to run migrations");
        let repo = SqlxPostRepository::new(pool.clone());
        (pool, repo)
    }

    async fn create_test_user(pool: &SqlitePool) -> i64 {
        let result = sqlx::query(
            "INSERT INTO users (username, email, password_hash, created_at) VALUES (?, ?, ?, ?)",
        )
        .bind("testuser")
        .bind("test@example.com")
        .bind("hash123")
        .bind(chrono::Utc::now())
        .execute(pool)
        .await
        .expect("Failed to create test user");
        result.last_insert_rowid()
    }

    #[tokio::test]
    async fn test_create_and_get_post() {
        let (pool, repo) = setup_test_repo().await;
        let user_id = create_test_user(&pool).await;

        let created = repo
            .create(&Post::new("Hello".to_string(), "World".to_string(), user_id))
            .await
            .expect("Failed to create post");

        assert!(created.id > 0);

        let found = repo
            .get_by_id(created.id)
            .await
            .expect("Failed to get post")
            .expect("Post not found");
        assert_eq!(found.title, "Hello");
        assert_eq!(found.author_id, user_id);
    }

    #[tokio::test]
    async fn test_list_newest_first() {
        let (pool, repo) = setup_test_repo().await;
        let user_id = create_test_user(&pool).await;

        for i in 1..=3 {
            repo.create(&Post::new(
                format!("Post {}", i),
                "content".to_string(),
                user_id,
            ))
            .await
            .expect("Failed to create post");
        }

        let posts = repo.list(0, 10).await.expect("Failed to list posts");
        assert_eq!(posts.len(), 3);
        assert_eq!(posts[0].title, "Post 3");
        assert_eq!(posts[2].title, "Post 1");
        assert_eq!(repo.count().await.unwrap(), 3);
    }

    #[tokio::test]
    async fn test_search_matches_title_and_content() {
        let (pool, repo) = setup_test_repo().await;
        let user_id = create_test_user(&pool).await;

        repo.create(&Post::new(
            "Rust tips".to_string(),
            "borrow checker".to_string(),
            user_id,
        ))
        .await
        .unwrap();
        repo.create(&Post::new(
            "Cooking".to_string(),
            "rust-colored pans".to_string(),
            user_id,
        ))
        .await
        .unwrap();
        repo.create(&Post::new(
            "Gardening".to_string(),
            "tomatoes".to_string(),
            user_id,
        ))
        .await
        .unwrap();

        let posts = repo.search("rust", 0, 10).await.expect("Search failed");
        assert_eq!(posts.len(), 2);
        assert_eq!(repo.count_search("rust").await.unwrap(), 2);
    }

    #[tokio::test]
    async fn test_delete_post_cascades_to_comments() {
        let (pool, repo) = setup_test_repo().await;
        let user_id = create_test_user(&pool).await;
        let post = repo
            .create(&Post::new("Hello".to_string(), "World".to_string(), user_id))
            .await
            .expect("Failed to create post");

        sqlx::query(
            "INSERT INTO comments (post_id, author_id, content, created_at, updated_at) VALUES (?, ?, ?, ?, ?)",
        )
        .bind(post.id)
        .bind(user_id)
        .bind("nice post!")
        .bind(chrono::Utc::now())
        .bind(chrono::Utc::now())
        .execute(&pool)
        .await
        .expect("Failed to insert comment");

        repo.delete(post.id).await.expect("Failed to delete post");

        let row: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM comments WHERE post_id = ?")
            .bind(post.id)
            .fetch_one(&pool)
            .await
            .expect("Failed to count comments");
        assert_eq!(row.0, 0);
    }
}
