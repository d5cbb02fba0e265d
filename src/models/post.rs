//! Blog post model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Blog post entity. Belongs to one user (its author) and carries a set of
/// tags through the post_tags relation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Post {
    /// Unique identifier
    pub id: i64,
    /// Post title
    pub title: String,
    /// Post body
    pub content: String,
    /// Set once at creation time
    pub published_date: DateTime<Utc>,
    /// Owning user id
    pub author_id: i64,
}

impl Post {
    /// Create a new Post stamped with the current time. The ID will be set
    /// to 0 and assigned by the database.
    pub fn new(title: String, content: String, author_id: i64) -> Self {
        Self {
            id: 0,
            title,
            content,
            published_date: Utc::now(),
            author_id,
        }
    }
}

/// Input for creating a post. `tags` is the free-text comma-separated tag
/// list; it is normalized by the tag service before association.
#[derive(Debug, Clone, Deserialize)]
pub struct CreatePostInput {
    pub title: String,
    pub content: String,
    #[serde(default)]
    pub tags: String,
}

/// Input for updating a post. Absent fields keep their current value;
/// a present `tags` value replaces the post's full tag set.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdatePostInput {
    pub title: Option<String>,
    pub content: Option<String>,
    pub tags: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_post_new() {
        let post = Post::new("Hello".to_string(), "World".to_string(), 1);
        assert_eq!(post.id, 0);
        assert_eq!(post.author_id, 1);
    }
}
