//! Tag repository
//!
//! Database operations for tags. Tag names arrive already normalized
//! (trimmed, lowercased) from the tag service; the UNIQUE constraint on
//! `tags.name` is what keeps concurrent get-or-create calls from creating
//! duplicate rows.

use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::Utc;
use sqlx::{Row, SqlitePool};
use std::sync::Arc;

use crate::models::Tag;

/// Tag repository trait
#[async_trait]
pub trait TagRepository: Send + Sync {
    /// Get the tag with the given normalized name, creating it if absent.
    /// Race-safe: two concurrent calls for the same new name yield the
    /// same single row.
    async fn get_or_create(&self, name: &str) -> Result<Tag>;

    /// Get tag by normalized name
    async fn get_by_name(&self, name: &str) -> Result<Option<Tag>>;

    /// List all tags ordered by name
    async fn list(&self) -> Result<Vec<Tag>>;

    /// Tags on a post, ordered by name
    async fn tags_for_post(&self, post_id: i64) -> Result<Vec<Tag>>;

    /// Replace a post's full tag set with the given tags. Clears existing
    /// associations first, so tags absent from `tag_ids` are dropped.
    async fn replace_for_post(&self, post_id: i64, tag_ids: &[i64]) -> Result<()>;
}

/// SQLx-based tag repository implementation
pub struct SqlxTagRepository {
    pool: SqlitePool,
}

impl SqlxTagRepository {
    /// Create a new SQLx tag repository
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Create a boxed repository for use with dependency injection
    pub fn boxed(pool: SqlitePool) -> Arc<dyn TagRepository> {
        Arc::new(Self::new(pool))
    }
}

#[async_trait]
impl TagRepository for SqlxTagRepository {
    async fn get_or_create(&self, name: &str) -> Result<Tag> {
        // Upsert, not check-then-insert: on a lost race the conflict clause
        // makes the insert a no-op and the select below finds the winner's row.
        sqlx::query("INSERT INTO tags (name, created_at) VALUES (?, ?) ON CONFLICT(name) DO NOTHING")
            .bind(name)
            .bind(Utc::now())
            .execute(&self.pool)
            .await
            .context("Failed to upsert tag")?;

        let row = sqlx::query("SELECT id, name, created_at FROM tags WHERE name = ?")
            .bind(name)
            .fetch_one(&self.pool)
            .await
            .context("Failed to fetch upserted tag")?;

        Ok(row_to_tag(&row))
    }

    async fn get_by_name(&self, name: &str) -> Result<Option<Tag>> {
        let row = sqlx::query("SELECT id, name, created_at FROM tags WHERE name = ?")
            .bind(name)
            .fetch_optional(&self.pool)
            .await
            .context("Failed to get tag by name")?;

        Ok(row.map(|row| row_to_tag(&row)))
    }

    async fn list(&self) -> Result<Vec<Tag>> {
        let rows = sqlx::query("SELECT id, name, created_at FROM tags ORDER BY name")
            .fetch_all(&self.pool)
            .await
            .context("Failed to list tags")?;

        Ok(rows.iter().map(row_to_tag).collect())
    }

    async fn tags_for_post(&self, post_id: i64) -> Result<Vec<Tag>> {
        let rows = sqlx::query(
            r#"
            SELECT t.id, t.name, t.created_at
            FROM tags t
            INNER JOIN post_tags pt ON t.id = pt.tag_id
            WHERE pt.post_id = ?
            ORDER BY t.name
            "#,
        )
        .bind(post_id)
        .fetch_all(&self.pool)
        .await
        .context("Failed to get tags for post")?;

        Ok(rows.iter().map(row_to_tag).collect())
    }

    async fn replace_for_post(&self, post_id: i64, tag_ids: &[i64]) -> Result<()> {
        let mut tx = self
            .pool
            .begin()
            .await
            .context("Failed to begin transaction")?;

        sqlx::query("DELETE FROM post_tags WHERE post_id = ?")
            .bind(post_id)
            .execute(&mut *tx)
            .await
            .context("Failed to clear post tags")?;

        for tag_id in tag_ids {
            sqlx::query("INSERT OR IGNORE INTO post_tags (post_id, tag_id) VALUES (?, ?)")
                .bind(post_id)
                .bind(tag_id)
                .execute(&mut *tx)
                .await
                .context("Failed to associate tag with post")?;
        }

        tx.commit().await.context("Failed to commit tag replacement")?;

        Ok(())
    }
}

fn row_to_tag(row: &sqlx::sqlite::SqliteRow) -> Tag {
    Tag {
        id: row.get("id"),
        name: row.get("name"),
        created_at: row.get("created_at"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::repositories::{PostRepository, SqlxPostRepository};
    use crate::db::{create_test_pool, migrations};
    use crate::models::Post;

    async fn setup_test_repo() -> (SqlitePool, SqlxTagRepository) {
        let pool = create_test_pool().await.expect("Failed to create test pool");
        migrations::run_migrations(&pool)
            .await
            .expect("Failed to run migrations");
        let repo = SqlxTagRepository::new(pool.clone());
        (pool, repo)
    }

    async fn create_test_post(pool: &SqlitePool) -> i64 {
        let result = sqlx::query(
            "INSERT INTO users (username, email, password_hash, created_at) VALUES (?, ?, ?, ?)",
        )
        .bind("tagger")
        .bind("tagger@example.com")
        .bind("hash")
        .bind(Utc::now())
        .execute(pool)
        .await
        .expect("Failed to create user");
        let user_id = result.last_insert_rowid();

        SqlxPostRepository::new(pool.clone())
            .create(&Post::new("Post".to_string(), "Body".to_string(), user_id))
            .await
            .expect("Failed to create post")
            .id
    }

    #[tokio::test]
    async fn test_get_or_create_creates_once() {
        let (_pool, repo) = setup_test_repo().await;

        let first = repo.get_or_create("django").await.expect("First call failed");
        let second = repo.get_or_create("django").await.expect("Second call failed");

        assert!(first.id > 0);
        assert_eq!(first.id, second.id);

        let tags = repo.list().await.expect("Failed to list tags");
        assert_eq!(tags.len(), 1);
    }

    #[tokio::test]
    async fn test_list_ordered_by_name() {
        let (_pool, repo) = setup_test_repo().await;

        repo.get_or_create("zig").await.unwrap();
        repo.get_or_create("ada").await.unwrap();
        repo.get_or_create("ml").await.unwrap();

        let tags = repo.list().await.expect("Failed to list tags");
        let names: Vec<&str> = tags.iter().map(|t| t.name.as_str()).collect();
        assert_eq!(names, vec!["ada", "ml", "zig"]);
    }

    #[tokio::test]
    async fn test_replace_for_post_is_a_full_replace() {
        let (pool, repo) = setup_test_repo().await;
        let post_id = create_test_post(&pool).await;

        let rust = repo.get_or_create("rust").await.unwrap();
        let web = repo.get_or_create("web").await.unwrap();
        let db = repo.get_or_create("db").await.unwrap();

        repo.replace_for_post(post_id, &[rust.id, web.id])
            .await
            .expect("First replace failed");
        let names: Vec<String> = repo
            .tags_for_post(post_id)
            .await
            .unwrap()
            .into_iter()
            .map(|t| t.name)
            .collect();
        assert_eq!(names, vec!["rust", "web"]);

        // Dropping "web" from the set removes the association
        repo.replace_for_post(post_id, &[rust.id, db.id])
            .await
            .expect("Second replace failed");
        let names: Vec<String> = repo
            .tags_for_post(post_id)
            .await
            .unwrap()
            .into_iter()
            .map(|t| t.name)
            .collect();
        assert_eq!(names, vec!["db", "rust"]);

        // The unassociated tag row itself survives
        assert!(repo.get_by_name("web").await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_replace_for_post_empty_clears_all() {
        let (pool, repo) = setup_test_repo().await;
        let post_id = create_test_post(&pool).await;
        let tag = repo.get_or_create("solo").await.unwrap();
        repo.replace_for_post(post_id, &[tag.id]).await.unwrap();

        repo.replace_for_post(post_id, &[]).await.unwrap();

        assert!(repo.tags_for_post(post_id).await.unwrap().is_empty());
    }
}
