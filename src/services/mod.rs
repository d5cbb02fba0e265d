//! Services layer - business logic
//!
//! Services implement the business rules on top of the repository traits:
//! validation, ownership checks, and coordination across entities. Each
//! service has its own error enum; validation failures carry a field→message
//! mapping that the API layer returns verbatim.

pub mod author;
pub mod book;
pub mod comment;
pub mod library;
pub mod password;
pub mod post;
pub mod tag;
pub mod user;

pub use author::{AuthorService, AuthorServiceError};
pub use book::{parse_book_query, BookService, BookServiceError};
pub use comment::{CommentService, CommentServiceError};
pub use library::{LibraryService, LibraryServiceError};
pub use password::{hash_password, verify_password};
pub use post::{PostPage, PostService, PostServiceError};
pub use tag::{parse_tag_input, TagService, TagServiceError};
pub use user::{LoginInput, RegisterInput, UserService, UserServiceError};

use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;

/// Field-level validation errors, keyed by input field name.
///
/// Collected during validation and surfaced to API clients as a JSON object
/// in the error `details`, so a caller can attribute each message to the
/// field that caused it.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct FieldErrors(BTreeMap<String, String>);

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    /// A single-field error.
    pub fn single(field: &str, message: impl Into<String>) -> Self {
        let mut errors = Self::new();
        errors.add(field, message);
        errors
    }

    /// Record an error for a field. The first message per field wins.
    pub fn add(&mut self, field: &str, message: impl Into<String>) {
        self.0.entry(field.to_string()).or_insert_with(|| message.into());
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Message recorded for a field, if any.
    pub fn get(&self, field: &str) -> Option<&str> {
        self.0.get(field).map(String::as_str)
    }

    /// Ok when no errors were collected.
    pub fn into_result(self) -> Result<(), FieldErrors> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(self)
        }
    }

    /// The field→message mapping as a JSON object.
    pub fn to_json(&self) -> serde_json::Value {
        serde_json::to_value(&self.0).unwrap_or_else(|_| serde_json::json!({}))
    }
}

impl fmt::Display for FieldErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for (field, message) in &self.0 {
            if !first {
                write!(f, "; ")?;
            }
            write!(f, "{}: {}", field, message)?;
            first = false;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_field_errors_are_ok() {
        assert!(FieldErrors::new().into_result().is_ok());
    }

    #[test]
    fn test_first_message_per_field_wins() {
        let mut errors = FieldErrors::new();
        errors.add("title", "first");
        errors.add("title", "second");
        assert_eq!(errors.get("title"), Some("first"));
    }

    #[test]
    fn test_display_joins_fields() {
        let mut errors = FieldErrors::new();
        errors.add("a", "bad");
        errors.add("b", "worse");
        assert_eq!(errors.to_string(), "a: bad; b: worse");
    }
}
