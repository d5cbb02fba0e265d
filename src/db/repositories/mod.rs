//! Repository layer
//!
//! One trait per entity defining the data-access interface, each with a
//! SQLx-backed implementation. Services depend on the traits (`Arc<dyn ...>`),
//! never on the implementations.

pub mod author;
pub mod book;
pub mod comment;
pub mod library;
pub mod post;
pub mod session;
pub mod tag;
pub mod user;

pub use author::{AuthorRepository, SqlxAuthorRepository};
pub use book::{BookRepository, SqlxBookRepository};
pub use comment::{CommentRepository, SqlxCommentRepository};
pub use library::{LibraryRepository, SqlxLibraryRepository};
pub use post::{PostRepository, SqlxPostRepository};
pub use session::{SessionRepository, SqlxSessionRepository};
pub use tag::{SqlxTagRepository, TagRepository};
pub use user::{SqlxUserRepository, UserRepository};
