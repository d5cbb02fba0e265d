//! Comment model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Comment entity. Belongs to one post and one user (its author).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Comment {
    /// Unique identifier
    pub id: i64,
    /// Post this comment belongs to
    pub post_id: i64,
    /// Owning user id
    pub author_id: i64,
    /// Comment body
    pub content: String,
    /// Creation timestamp
    pub created_at: DateTime<Utc>,
    /// Last update timestamp
    pub updated_at: DateTime<Utc>,
}

impl Comment {
    /// Create a new Comment stamped with the current time. The ID will be
    /// set to 0 and assigned by the database.
    pub fn new(post_id: i64, author_id: i64, content: String) -> Self {
        let now = Utc::now();
        Self {
            id: 0,
            post_id,
            author_id,
            content,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Input for creating or updating a comment
#[derive(Debug, Clone, Deserialize)]
pub struct CreateCommentInput {
    pub content: String,
}
