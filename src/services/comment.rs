//! Comment service
//!
//! Comments on blog posts. Anyone may read them, any authenticated user
//! may comment on any post, and only a comment's author may edit or
//! delete it.

use anyhow::Context;
use chrono::Utc;
use std::sync::Arc;

use crate::db::repositories::{CommentRepository, PostRepository};
use crate::models::{Comment, CreateCommentInput};
use crate::services::FieldErrors;

/// Shortest accepted comment body, after trimming
const COMMENT_MIN_LEN: usize = 5;

/// Error types for comment service operations
#[derive(Debug, thiserror::Error)]
pub enum CommentServiceError {
    /// Validation error with field-level messages
    #[error("Validation failed: {0}")]
    Validation(FieldErrors),

    /// Comment not found
    #[error("Comment not found: {0}")]
    NotFound(i64),

    /// The post being commented on does not exist
    #[error("Post not found: {0}")]
    PostNotFound(i64),

    /// Acting user is not the comment's author
    #[error("User {user_id} does not own comment {comment_id}")]
    Forbidden { user_id: i64, comment_id: i64 },

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

/// Comment service
pub struct CommentService {
    comment_repo: Arc<dyn CommentRepository>,
    post_repo: Arc<dyn PostRepository>,
}

impl CommentService {
    /// Create a new comment service
    pub fn new(
        comment_repo: Arc<dyn CommentRepository>,
        post_repo: Arc<dyn PostRepository>,
    ) -> Self {
        Self {
            comment_repo,
            post_repo,
        }
    }

    /// Comments on a post, oldest-first.
    pub async fn list_for_post(&self, post_id: i64) -> Result<Vec<Comment>, CommentServiceError> {
        self.check_post(post_id).await?;
        self.comment_repo
            .list_by_post(post_id)
            .await
            .context("Failed to list comments")
            .map_err(Into::into)
    }

    /// Comment on a post as `author_id`.
    pub async fn create(
        &self,
        post_id: i64,
        author_id: i64,
        input: CreateCommentInput,
    ) -> Result<Comment, CommentServiceError> {
        self.check_post(post_id).await?;
        let content = validate_content(&input.content).map_err(CommentServiceError::Validation)?;

        self.comment_repo
            .create(&Comment::new(post_id, author_id, content))
            .await
            .context("Failed to create comment")
            .map_err(Into::into)
    }

    /// Edit a comment. Only its author may do so.
    pub async fn update(
        &self,
        id: i64,
        user_id: i64,
        input: CreateCommentInput,
    ) -> Result<Comment, CommentServiceError> {
        let mut comment = self.owned_comment(id, user_id).await?;
        comment.content = validate_content(&input.content).map_err(CommentServiceError::Validation)?;
        comment.updated_at = Utc::now();

        self.comment_repo
            .update(&comment)
            .await
            .context("Failed to update comment")?;
        Ok(comment)
    }

    /// Delete a comment. Only its author may do so.
    pub async fn delete(&self, id: i64, user_id: i64) -> Result<(), CommentServiceError> {
        let comment = self.owned_comment(id, user_id).await?;
        self.comment_repo
            .delete(comment.id)
            .await
            .context("Failed to delete comment")?;
        Ok(())
    }

    async fn check_post(&self, post_id: i64) -> Result<(), CommentServiceError> {
        self.post_repo
            .get_by_id(post_id)
            .await
            .context("Failed to get post")?
            .ok_or(CommentServiceError::PostNotFound(post_id))?;
        Ok(())
    }

    async fn owned_comment(&self, id: i64, user_id: i64) -> Result<Comment, CommentServiceError> {
        let comment = self
            .comment_repo
            .get_by_id(id)
            .await
            .context("Failed to get comment")?
            .ok_or(CommentServiceError::NotFound(id))?;

        if comment.author_id != user_id {
            return Err(CommentServiceError::Forbidden {
                user_id,
                comment_id: id,
            });
        }
        Ok(comment)
    }
}

fn validate_content(raw: &str) -> Result<String, FieldErrors> {
    let content = raw.trim();
    if content.chars().count() < COMMENT_MIN_LEN {
        return Err(FieldErrors::single(
            "content",
            format!("Comment must be at least {} characters long.", COMMENT_MIN_LEN),
        ));
    }
    Ok(content.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::repositories::{SqlxCommentRepository, SqlxPostRepository};
    use crate::db::{create_test_pool, migrations};
    use crate::models::Post;
    use sqlx::SqlitePool;

    async fn setup() -> (SqlitePool, CommentService, i64, i64) {
        let pool = create_test_pool().await.expect("Failed to create test pool");
        migrations::run_migrations(&pool)
            .await
            .expect("Failed to run migrations");

        let user_id = create_user(&pool, "commenter").await;
        let post = SqlxPostRepository::new(pool.clone())
            .create(&Post::new("Post".to_string(), "Body".to_string(), user_id))
            .await
            .expect("Failed to create post");

        let service = CommentService::new(
            SqlxCommentRepository::boxed(pool.clone()),
            SqlxPostRepository::boxed(pool.clone()),
        );
        (pool, service, user_id, post.id)
    }

    async fn create_user(pool: &SqlitePool, username: &str) -> i64 {
        let result = sqlx::query(
            "INSERT INTO users (username, email, password_hash, created_at) VALUES (?, ?, ?, ?)",
        )
        .bind(username)
        .bind(format!("{}@example.com", username))
        .bind("hash")
        .bind(chrono::Utc::now())
        .execute(pool)
        .await
        .expect("Failed to create user");
        result.last_insert_rowid()
    }

    fn input(content: &str) -> CreateCommentInput {
        CreateCommentInput {
            content: content.to_string(),
        }
    }

    #[tokio::test]
    async fn test_comment_roundtrip() {
        let (_pool, service, user_id, post_id) = setup().await;

        let comment = service
            .create(post_id, user_id, input("  great write-up  "))
            .await
            .expect("Create failed");
        assert_eq!(comment.content, "great write-up");

        let listed = service.list_for_post(post_id).await.unwrap();
        assert_eq!(listed.len(), 1);
    }

    #[tokio::test]
    async fn test_short_comment_rejected() {
        let (_pool, service, user_id, post_id) = setup().await;
        let result = service.create(post_id, user_id, input("hi")).await;
        assert!(matches!(result, Err(CommentServiceError::Validation(_))));
    }

    #[tokio::test]
    async fn test_comment_on_missing_post() {
        let (_pool, service, user_id, _) = setup().await;
        let result = service.create(12345, user_id, input("where am i?")).await;
        assert!(matches!(result, Err(CommentServiceError::PostNotFound(12345))));
    }

    #[tokio::test]
    async fn test_only_author_may_edit_or_delete() {
        let (pool, service, user_id, post_id) = setup().await;
        let other_id = create_user(&pool, "other").await;
        let comment = service
            .create(post_id, user_id, input("original text"))
            .await
            .unwrap();

        assert!(matches!(
            service.update(comment.id, other_id, input("hijacked text")).await,
            Err(CommentServiceError::Forbidden { .. })
        ));
        assert!(matches!(
            service.delete(comment.id, other_id).await,
            Err(CommentServiceError::Forbidden { .. })
        ));

        let updated = service
            .update(comment.id, user_id, input("edited text"))
            .await
            .expect("Owner update failed");
        assert_eq!(updated.content, "edited text");
        assert!(updated.updated_at >= updated.created_at);

        service
            .delete(comment.id, user_id)
            .await
            .expect("Owner delete failed");
        assert!(service.list_for_post(post_id).await.unwrap().is_empty());
    }
}
