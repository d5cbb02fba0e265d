//! Shared API response types
//!
//! Response structures used across multiple endpoints. Catalog entities
//! (books, authors, libraries) serialize straight from their models; the
//! types here cover responses that compose extra data, like a post with
//! its tags or a library with its shelf.

use serde::Serialize;

use crate::models::{Book, Library, Post, Tag, User};

/// Response for user info. Never exposes the password hash.
#[derive(Debug, Serialize)]
pub struct UserResponse {
    pub id: i64,
    pub username: String,
    pub email: String,
    pub created_at: String,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            username: user.username,
            email: user.email,
            created_at: user.created_at.to_rfc3339(),
        }
    }
}

/// Response for successful authentication
#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub user: UserResponse,
    pub token: String,
}

/// Full post response, optionally with tag names attached
#[derive(Debug, Serialize)]
pub struct PostResponse {
    pub id: i64,
    pub title: String,
    pub content: String,
    pub published_date: String,
    pub author: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
}

impl From<Post> for PostResponse {
    fn from(post: Post) -> Self {
        Self {
            id: post.id,
            title: post.title,
            content: post.content,
            published_date: post.published_date.to_rfc3339(),
            author: post.author_id,
            tags: None,
        }
    }
}

impl PostResponse {
    /// Attach tag names to the response
    pub fn with_tags(mut self, tags: Vec<Tag>) -> Self {
        self.tags = Some(tags.into_iter().map(|t| t.name).collect());
        self
    }
}

/// Paginated post list response
#[derive(Debug, Serialize)]
pub struct PostListResponse {
    pub posts: Vec<PostResponse>,
    pub total: i64,
    pub page: i64,
    pub page_size: i64,
    pub total_pages: i64,
}

impl PostListResponse {
    pub fn new(posts: Vec<Post>, total: i64, page: i64, page_size: i64) -> Self {
        let total_pages = if total == 0 {
            0
        } else {
            (total + page_size - 1) / page_size
        };
        Self {
            posts: posts.into_iter().map(Into::into).collect(),
            total,
            page,
            page_size,
            total_pages,
        }
    }
}

/// A library together with its shelved books
#[derive(Debug, Serialize)]
pub struct LibraryDetailResponse {
    pub id: i64,
    pub name: String,
    pub books: Vec<Book>,
}

impl LibraryDetailResponse {
    pub fn new(library: Library, books: Vec<Book>) -> Self {
        Self {
            id: library.id,
            name: library.name,
            books,
        }
    }
}

/// A tag together with the posts carrying it
#[derive(Debug, Serialize)]
pub struct TagDetailResponse {
    pub id: i64,
    pub name: String,
    pub posts: Vec<PostResponse>,
}

impl TagDetailResponse {
    pub fn new(tag: Tag, posts: Vec<Post>) -> Self {
        Self {
            id: tag.id,
            name: tag.name,
            posts: posts.into_iter().map(Into::into).collect(),
        }
    }
}
