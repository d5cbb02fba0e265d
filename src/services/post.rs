//! Post service
//!
//! Blog post CRUD with ownership enforcement. Reads are open; a post can
//! only be updated or deleted by the user who created it. Tag input is
//! forwarded to the tag service, which owns normalization and association.

use anyhow::Context;
use std::sync::Arc;

use crate::db::repositories::PostRepository;
use crate::models::{CreatePostInput, Post, Tag, UpdatePostInput};
use crate::services::{FieldErrors, TagService, TagServiceError};

/// Upper bound on posts per listing page
pub const MAX_PAGE_SIZE: i64 = 50;

/// Error types for post service operations
#[derive(Debug, thiserror::Error)]
pub enum PostServiceError {
    /// Validation error with field-level messages
    #[error("Validation failed: {0}")]
    Validation(FieldErrors),

    /// Post not found
    #[error("Post not found: {0}")]
    NotFound(i64),

    /// Acting user is not the post's author
    #[error("User {user_id} does not own post {post_id}")]
    Forbidden { user_id: i64, post_id: i64 },

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl From<TagServiceError> for PostServiceError {
    fn from(err: TagServiceError) -> Self {
        match err {
            TagServiceError::Validation(errors) => PostServiceError::Validation(errors),
            TagServiceError::NotFound(name) => {
                PostServiceError::Internal(anyhow::anyhow!("Tag vanished during sync: {}", name))
            }
            TagServiceError::Internal(err) => PostServiceError::Internal(err),
        }
    }
}

/// One page of a post listing
#[derive(Debug, Clone, serde::Serialize)]
pub struct PostPage {
    pub posts: Vec<Post>,
    pub total: i64,
    pub page: i64,
    pub page_size: i64,
}

/// Post service
pub struct PostService {
    post_repo: Arc<dyn PostRepository>,
    tag_service: Arc<TagService>,
}

impl PostService {
    /// Create a new post service
    pub fn new(post_repo: Arc<dyn PostRepository>, tag_service: Arc<TagService>) -> Self {
        Self {
            post_repo,
            tag_service,
        }
    }

    /// List posts newest-first, optionally filtered by a keyword matched
    /// against title and content. Page numbers start at 1; out-of-range
    /// page sizes are clamped.
    pub async fn list(
        &self,
        page: i64,
        page_size: i64,
        keyword: Option<&str>,
    ) -> Result<PostPage, PostServiceError> {
        let page = page.max(1);
        let page_size = page_size.clamp(1, MAX_PAGE_SIZE);
        let offset = (page - 1) * page_size;

        let keyword = keyword.map(str::trim).filter(|k| !k.is_empty());
        let (posts, total) = match keyword {
            Some(keyword) => {
                let posts = self
                    .post_repo
                    .search(keyword, offset, page_size)
                    .await
                    .context("Failed to search posts")?;
                let total = self
                    .post_repo
                    .count_search(keyword)
                    .await
                    .context("Failed to count search results")?;
                (posts, total)
            }
            None => {
                let posts = self
                    .post_repo
                    .list(offset, page_size)
                    .await
                    .context("Failed to list posts")?;
                let total = self.post_repo.count().await.context("Failed to count posts")?;
                (posts, total)
            }
        };

        Ok(PostPage {
            posts,
            total,
            page,
            page_size,
        })
    }

    /// Get a post with its tags.
    pub async fn get(&self, id: i64) -> Result<(Post, Vec<Tag>), PostServiceError> {
        let post = self
            .post_repo
            .get_by_id(id)
            .await
            .context("Failed to get post")?
            .ok_or(PostServiceError::NotFound(id))?;
        let tags = self.tag_service.tags_for_post(post.id).await?;
        Ok((post, tags))
    }

    /// Create a post owned by `author_id` and attach its tags.
    pub async fn create(
        &self,
        author_id: i64,
        input: CreatePostInput,
    ) -> Result<(Post, Vec<Tag>), PostServiceError> {
        validate_fields(&input.title, &input.content).map_err(PostServiceError::Validation)?;

        let post = self
            .post_repo
            .create(&Post::new(
                input.title.trim().to_string(),
                input.content,
                author_id,
            ))
            .await
            .context("Failed to create post")?;
        let tags = self.tag_service.sync_post_tags(post.id, &input.tags).await?;

        tracing::info!("User {} published post {}", author_id, post.id);
        Ok((post, tags))
    }

    /// Update a post. Only its author may do so; a present `tags` value
    /// replaces the post's full tag set.
    pub async fn update(
        &self,
        id: i64,
        user_id: i64,
        input: UpdatePostInput,
    ) -> Result<(Post, Vec<Tag>), PostServiceError> {
        let mut post = self.owned_post(id, user_id).await?;

        if let Some(title) = input.title {
            post.title = title;
        }
        if let Some(content) = input.content {
            post.content = content;
        }
        validate_fields(&post.title, &post.content).map_err(PostServiceError::Validation)?;

        post.title = post.title.trim().to_string();
        self.post_repo
            .update(&post)
            .await
            .context("Failed to update post")?;

        let tags = match input.tags {
            Some(tags) => self.tag_service.sync_post_tags(post.id, &tags).await?,
            None => self.tag_service.tags_for_post(post.id).await?,
        };
        Ok((post, tags))
    }

    /// Delete a post. Only its author may do so; comments and tag
    /// associations go with it.
    pub async fn delete(&self, id: i64, user_id: i64) -> Result<(), PostServiceError> {
        let post = self.owned_post(id, user_id).await?;
        self.post_repo
            .delete(post.id)
            .await
            .context("Failed to delete post")?;
        Ok(())
    }

    async fn owned_post(&self, id: i64, user_id: i64) -> Result<Post, PostServiceError> {
        let post = self
            .post_repo
            .get_by_id(id)
            .await
            .context("Failed to get post")?
            .ok_or(PostServiceError::NotFound(id))?;

        if post.author_id != user_id {
            return Err(PostServiceError::Forbidden {
                user_id,
                post_id: id,
            });
        }
        Ok(post)
    }
}

fn validate_fields(title: &str, content: &str) -> Result<(), FieldErrors> {
    let mut errors = FieldErrors::new();

    let title = title.trim();
    if title.is_empty() {
        errors.add("title", "Title cannot be empty.");
    } else if title.chars().count() > 200 {
        errors.add("title", "Title cannot exceed 200 characters.");
    }
    if content.trim().is_empty() {
        errors.add("content", "Content cannot be empty.");
    }

    errors.into_result()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::repositories::{SqlxPostRepository, SqlxTagRepository};
    use crate::db::{create_test_pool, migrations};
    use sqlx::SqlitePool;

    async fn setup() -> (SqlitePool, PostService) {
        let pool = create_test_pool().await.expect("Failed to create test pool");
        migrations::run_migrations(&pool)
            .await
            .expect("Failed to run migrations");

        let tag_service = Arc::new(TagService::new(
            SqlxTagRepository::boxed(pool.clone()),
            SqlxPostRepository::boxed(pool.clone()),
        ));
        let service = PostService::new(SqlxPostRepository::boxed(pool.clone()), tag_service);
        (pool, service)
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

    fn post_input(title: &str, tags: &str) -> CreatePostInput {
        CreatePostInput {
            title: title.to_string(),
            content: "Some content".to_string(),
            tags: tags.to_string(),
        }
    }

    #[tokio::test]
    async fn test_create_attaches_normalized_tags() {
        let (pool, service) = setup().await;
        let user_id = create_user(&pool, "writer").await;

        let (post, tags) = service
            .create(user_id, post_input("Hello", "Django, python,  web-development "))
            .await
            .expect("Create failed");

        assert_eq!(post.author_id, user_id);
        let names: Vec<&str> = tags.iter().map(|t| t.name.as_str()).collect();
        assert_eq!(names, vec!["django", "python", "web-development"]);
    }

    #[tokio::test]
    async fn test_update_by_owner_replaces_tags() {
        let (pool, service) = setup().await;
        let user_id = create_user(&pool, "writer").await;
        let (post, _) = service
            .create(user_id, post_input("Hello", "rust, web"))
            .await
            .unwrap();

        let (updated, tags) = service
            .update(
                post.id,
                user_id,
                UpdatePostInput {
                    title: Some("Hello again".to_string()),
                    tags: Some("rust, databases".to_string()),
                    ..Default::default()
                },
            )
            .await
            .expect("Update failed");

        assert_eq!(updated.title, "Hello again");
        let names: Vec<&str> = tags.iter().map(|t| t.name.as_str()).collect();
        assert_eq!(names, vec!["databases", "rust"]);
    }

    #[tokio::test]
    async fn test_update_without_tags_keeps_them() {
        let (pool, service) = setup().await;
        let user_id = create_user(&pool, "writer").await;
        let (post, _) = service
            .create(user_id, post_input("Hello", "rust"))
            .await
            .unwrap();

        let (_, tags) = service
            .update(
                post.id,
                user_id,
                UpdatePostInput {
                    content: Some("New body".to_string()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        assert_eq!(tags.len(), 1);
        assert_eq!(tags[0].name, "rust");
    }

    #[tokio::test]
    async fn test_non_owner_cannot_update_or_delete() {
        let (pool, service) = setup().await;
        let owner = create_user(&pool, "owner").await;
        let intruder = create_user(&pool, "intruder").await;
        let (post, _) = service.create(owner, post_input("Mine", "")).await.unwrap();

        let update = service
            .update(post.id, intruder, UpdatePostInput::default())
            .await;
        assert!(matches!(update, Err(PostServiceError::Forbidden { .. })));

        let delete = service.delete(post.id, intruder).await;
        assert!(matches!(delete, Err(PostServiceError::Forbidden { .. })));

        // Still readable and intact
        let (found, _) = service.get(post.id).await.unwrap();
        assert_eq!(found.title, "Mine");
    }

    #[tokio::test]
    async fn test_list_paginates_and_searches() {
        let (pool, service) = setup().await;
        let user_id = create_user(&pool, "writer").await;
        for i in 1..=3 {
            service
                .create(user_id, post_input(&format!("Post {}", i), ""))
                .await
                .unwrap();
        }

        let page = service.list(1, 2, None).await.expect("List failed");
        assert_eq!(page.posts.len(), 2);
        assert_eq!(page.total, 3);
        assert_eq!(page.posts[0].title, "Post 3");

        let page2 = service.list(2, 2, None).await.unwrap();
        assert_eq!(page2.posts.len(), 1);

        let filtered = service.list(1, 10, Some("Post 2")).await.unwrap();
        assert_eq!(filtered.total, 1);
        assert_eq!(filtered.posts[0].title, "Post 2");
    }

    #[tokio::test]
    async fn test_missing_post_is_not_found() {
        let (pool, service) = setup().await;
        let user_id = create_user(&pool, "writer").await;
        assert!(matches!(
            service.get(404).await,
            Err(PostServiceError::NotFound(404))
        ));
        assert!(matches!(
            service.delete(404, user_id).await,
            Err(PostServiceError::NotFound(404))
        ));
    }
}
