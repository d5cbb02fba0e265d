//! Data models
//!
//! Entity types persisted by the repository layer, plus the input types
//! accepted by the service layer.

pub mod author;
pub mod book;
pub mod comment;
pub mod library;
pub mod post;
pub mod session;
pub mod tag;
pub mod user;

pub use author::{Author, AuthorWithBooks, CreateAuthorInput};
pub use book::{Book, BookListParams, BookOrdering, BookQuery, CreateBookInput, OrderKey, UpdateBookInput};
pub use comment::{Comment, CreateCommentInput};
pub use library::{CreateLibrarianInput, CreateLibraryInput, Librarian, Library};
pub use post::{CreatePostInput, Post, UpdatePostInput};
pub use session::Session;
pub use tag::Tag;
pub use user::User;
