//! Tag service
//!
//! Tag name normalization and the post↔tag association. Tag input arrives
//! as one comma-separated string; `parse_tag_input` turns it into a clean,
//! deduplicated list of canonical names, and `sync_post_tags` makes that
//! list the post's complete tag set.

use anyhow::Context;
use std::sync::Arc;

use crate::db::repositories::{PostRepository, TagRepository};
use crate::models::{Post, Tag};
use crate::services::FieldErrors;

/// Shortest accepted tag name, after trimming.
const TAG_MIN_LEN: usize = 2;
/// Longest accepted tag name, after trimming.
const TAG_MAX_LEN: usize = 50;

/// Error types for tag service operations
#[derive(Debug, thiserror::Error)]
pub enum TagServiceError {
    /// Validation error with field-level messages
    #[error("Validation failed: {0}")]
    Validation(FieldErrors),

    /// Tag not found
    #[error("Tag not found: {0}")]
    NotFound(String),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

/// Normalize a comma-separated tag string into canonical tag names.
///
/// Each segment is trimmed; empty segments are dropped. Surviving names
/// must be between 2 and 50 characters and are lowercased. Duplicates
/// (after normalization) collapse, keeping first-seen order.
pub fn parse_tag_input(raw: &str) -> Result<Vec<String>, FieldErrors> {
    let mut names = Vec::new();

    for segment in raw.split(',') {
        let trimmed = segment.trim();
        if trimmed.is_empty() {
            continue;
        }

        let len = trimmed.chars().count();
        if len < TAG_MIN_LEN || len > TAG_MAX_LEN {
            return Err(FieldErrors::single(
                "tags",
                format!(
                    "Tag '{}' must be between {} and {} characters.",
                    trimmed, TAG_MIN_LEN, TAG_MAX_LEN
                ),
            ));
        }

        let name = trimmed.to_lowercase();
        if !names.contains(&name) {
            names.push(name);
        }
    }

    Ok(names)
}

/// Tag service
pub struct TagService {
    tag_repo: Arc<dyn TagRepository>,
    post_repo: Arc<dyn PostRepository>,
}

impl TagService {
    /// Create a new tag service
    pub fn new(tag_repo: Arc<dyn TagRepository>, post_repo: Arc<dyn PostRepository>) -> Self {
        Self {
            tag_repo,
            post_repo,
        }
    }

    /// List all tags, ordered by name.
    pub async fn list(&self) -> Result<Vec<Tag>, TagServiceError> {
        self.tag_repo
            .list()
            .await
            .context("Failed to list tags")
            .map_err(Into::into)
    }

    /// Look a tag up by name (matched after normalization) together with
    /// the posts carrying it, newest-first.
    pub async fn get_with_posts(&self, name: &str) -> Result<(Tag, Vec<Post>), TagServiceError> {
        let normalized = name.trim().to_lowercase();
        let tag = self
            .tag_repo
            .get_by_name(&normalized)
            .await
            .context("Failed to get tag")?
            .ok_or_else(|| TagServiceError::NotFound(normalized))?;

        let posts = self
            .post_repo
            .list_by_tag(tag.id)
            .await
            .context("Failed to list posts for tag")?;
        Ok((tag, posts))
    }

    /// Tags on a post, ordered by name.
    pub async fn tags_for_post(&self, post_id: i64) -> Result<Vec<Tag>, TagServiceError> {
        self.tag_repo
            .tags_for_post(post_id)
            .await
            .context("Failed to get tags for post")
            .map_err(Into::into)
    }

    /// Make the given comma-separated string the post's complete tag set.
    ///
    /// Names are normalized, missing tag rows are created, and associations
    /// not named in the input are removed. An empty string clears all tags.
    pub async fn sync_post_tags(&self, post_id: i64, raw: &str) -> Result<Vec<Tag>, TagServiceError> {
        let names = parse_tag_input(raw).map_err(TagServiceError::Validation)?;

        let mut tags = Vec::with_capacity(names.len());
        for name in &names {
            let tag = self
                .tag_repo
                .get_or_create(name)
                .await
                .context("Failed to get or create tag")?;
            tags.push(tag);
        }

        let ids: Vec<i64> = tags.iter().map(|t| t.id).collect();
        self.tag_repo
            .replace_for_post(post_id, &ids)
            .await
            .context("Failed to replace post tags")?;

        Ok(tags)
    }
}
